//! Canned knowledge: topics, their trigger keywords and responses.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Key of the greeting entry. It has no keywords and only opens conversations.
pub const GREETING_KEY: &str = "salutation";

pub const DEFAULT_GREETING: &str = "Bonjour ! Je suis l'assistant virtuel de Triton West Africa SARL. Comment puis-je vous aider aujourd'hui ?";

pub const DEFAULT_FALLBACK: &str = "Je ne suis pas sûr de bien comprendre votre question. Pourriez-vous la reformuler ou souhaitez-vous que je vous redirige vers notre équipe pour une assistance personnalisée ?";

pub const DELIVERY_RESPONSE: &str = "Délais de livraison : Abidjan 24-48h, Côte d'Ivoire 3-5 jours, Afrique de l'Ouest 7-14 jours. Livraisons express disponibles.";

/// A named intent with its canned response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub key: String,
    pub response: String,
    /// Lowercase substrings; any one of them selects this topic.
    pub keywords: Vec<String>,
}

impl Topic {
    pub fn new(key: &str, response: &str, keywords: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            response: response.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

/// Ordered topic list plus the greeting and fallback strings.
///
/// Order matters: the matcher picks the first topic whose keywords hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub greeting: String,
    pub fallback: String,
    pub topics: Vec<Topic>,
}

impl KnowledgeBase {
    /// The site's built-in knowledge.
    pub fn builtin() -> Self {
        let topics = vec![
            Topic::new(
                "produits alimentaires",
                "Nous proposons une large gamme de produits alimentaires : confiseries (Hershey's, Chivito, Freegells), biscuits, snacks, boissons et conserves. Tous nos produits respectent les normes internationales de qualité.",
                &["produit", "alimentaire", "nourriture"],
            ),
            Topic::new(
                "pneumatiques",
                "Nous sommes distributeurs exclusifs de Double King et partenaires de Kapsen. Notre gamme couvre voitures particulières, utilitaires et poids lourds avec conseil technique personnalisé.",
                &["pneu", "pneumatique", "roue"],
            ),
            Topic::new(
                "livraison",
                DELIVERY_RESPONSE,
                &["livraison", "délai", "transport"],
            ),
            Topic::new(
                "contact",
                "Vous pouvez nous joindre au (+225) 27 21 35 96 72 ou (+225) 07 07 16 18 30, par email à tritontreichville@gmail.com ou nous rendre visite Avenue 19, Rue 7, Zone 2, Treichville, Abidjan.",
                &["contact", "téléphone", "adresse"],
            ),
            Topic::new(
                "devis",
                "Pour obtenir un devis personnalisé, contactez-nous en précisant vos besoins spécifiques. Nous vous répondrons sous 24h avec une proposition adaptée.",
                &["devis", "prix", "tarif"],
            ),
            Topic::new(
                "qualite",
                "Nous appliquons des contrôles qualité stricts : certifications HACCP et ISO, respect de la chaîne du froid, sélection rigoureuse des fournisseurs.",
                &["qualité", "certification", "contrôle"],
            ),
            Topic::new(
                "paiement",
                "Nous acceptons virements bancaires, chèques d'entreprise et lettres de crédit. Facilités de paiement pour clients réguliers.",
                &["paiement", "facture", "règlement"],
            ),
            Topic::new(
                "partenariat",
                "Pour devenir distributeur partenaire, contactez notre service commercial avec vos références d'entreprise et zone de couverture souhaitée.",
                &["partenaire", "distributeur", "collaboration"],
            ),
        ];

        Self {
            greeting: DEFAULT_GREETING.to_string(),
            fallback: DEFAULT_FALLBACK.to_string(),
            topics,
        }
    }

    /// Parse a knowledge base from JSON. Keywords are lowercased on load.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut kb: Self = serde_json::from_str(json)?;
        for topic in &mut kb.topics {
            for keyword in &mut topic.keywords {
                *keyword = keyword.to_lowercase();
            }
        }
        Ok(kb)
    }

    /// Load from a JSON file at startup.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw).map_err(|e| ConfigError::Knowledge {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Look up a topic by key. The greeting key resolves to the greeting.
    pub fn response_for(&self, key: &str) -> Option<&str> {
        if key == GREETING_KEY {
            return Some(&self.greeting);
        }
        self.topics
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.response.as_str())
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn builtin_has_eight_topics_in_priority_order() {
        let kb = KnowledgeBase::builtin();
        let keys: Vec<&str> = kb.topics.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "produits alimentaires",
                "pneumatiques",
                "livraison",
                "contact",
                "devis",
                "qualite",
                "paiement",
                "partenariat",
            ]
        );
    }

    #[test]
    fn response_for_greeting_and_topics() {
        let kb = KnowledgeBase::builtin();
        assert_eq!(kb.response_for(GREETING_KEY), Some(DEFAULT_GREETING));
        assert_eq!(kb.response_for("livraison"), Some(DELIVERY_RESPONSE));
        assert_eq!(kb.response_for("missing"), None);
    }

    #[test]
    fn from_json_lowercases_keywords() {
        let json = r#"{
            "greeting": "Hi",
            "fallback": "Sorry",
            "topics": [
                { "key": "hours", "response": "9 to 5", "keywords": ["OPENING", "Hours"] }
            ]
        }"#;
        let kb = KnowledgeBase::from_json(json).unwrap();
        assert_eq!(kb.topics[0].keywords, vec!["opening", "hours"]);
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&KnowledgeBase::builtin()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let kb = KnowledgeBase::load(file.path()).unwrap();
        assert_eq!(kb, KnowledgeBase::builtin());
    }

    #[test]
    fn load_rejects_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = KnowledgeBase::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Knowledge { .. }));
    }
}
