//! Contact submission payload and the two HTML emails it produces.

use serde::Deserialize;

use super::escape::{escape_html, escape_multiline};

/// JSON body of `POST /api/contact`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    pub subject: String,
    pub message: String,
}

/// An email ready for the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
}

pub const CONFIRMATION_SUBJECT: &str = "Confirmation de réception - Triton West Africa";

/// Notification for the operator inbox. Replies go to the submitter.
pub fn operator_notification(
    submission: &ContactSubmission,
    from: &str,
    operator_inbox: &str,
) -> OutboundEmail {
    let company = submission
        .company
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(|c| {
            format!(
                r#"<p style="margin: 10px 0;"><strong>Entreprise:</strong> {}</p>"#,
                escape_html(c)
            )
        })
        .unwrap_or_default();

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
  <h1 style="color: #0D2C54; border-bottom: 3px solid #1AB8CA; padding-bottom: 10px;">Nouveau message de contact</h1>
  <div style="background-color: #f5f6f8; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <p style="margin: 10px 0;"><strong>Nom:</strong> {name}</p>
    <p style="margin: 10px 0;"><strong>Email:</strong> {email}</p>
    {company}
    <p style="margin: 10px 0;"><strong>Sujet:</strong> {subject}</p>
  </div>
  <div style="margin: 20px 0;">
    <h3 style="color: #0D2C54;">Message:</h3>
    <p style="line-height: 1.6; color: #333;">{message}</p>
  </div>
  <div style="margin-top: 30px; padding-top: 20px; border-top: 1px solid #ddd;">
    <p style="color: #999; font-size: 12px;">Ce message a été envoyé depuis le formulaire de contact du site web Triton West Africa</p>
  </div>
</div>"#,
        name = escape_html(&submission.name),
        email = escape_html(&submission.email),
        company = company,
        subject = escape_html(&submission.subject),
        message = escape_multiline(&submission.message),
    );

    OutboundEmail {
        from: from.to_string(),
        to: operator_inbox.to_string(),
        reply_to: Some(submission.email.clone()),
        subject: format!(
            "Nouveau message de contact: {}",
            escape_html(&submission.subject)
        ),
        html,
    }
}

/// Receipt sent back to the submitter.
pub fn submitter_confirmation(submission: &ContactSubmission, from: &str) -> OutboundEmail {
    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
  <h1 style="color: #0D2C54; border-bottom: 3px solid #1AB8CA; padding-bottom: 10px;">Message bien reçu !</h1>
  <p style="line-height: 1.6; color: #333;">Bonjour {name},</p>
  <p style="line-height: 1.6; color: #333;">Nous avons bien reçu votre message concernant "<strong>{subject}</strong>".</p>
  <p style="line-height: 1.6; color: #333;">Notre équipe vous contactera dans les plus brefs délais pour répondre à votre demande.</p>
  <div style="background-color: #f5f6f8; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <h3 style="color: #0D2C54; margin-top: 0;">Votre message:</h3>
    <p style="line-height: 1.6; color: #666;">{message}</p>
  </div>
  <p style="line-height: 1.6; color: #333;">Cordialement,<br><strong>L'équipe Triton West Africa</strong></p>
  <div style="margin-top: 30px; padding-top: 20px; border-top: 1px solid #ddd;">
    <p style="color: #1AB8CA; font-weight: bold;">Triton West Africa</p>
    <p style="color: #666; font-size: 14px; margin: 5px 0;">Avenue 19, Rue 7, Zone 2<br>Treichville, Abidjan, Côte d'Ivoire<br>Tél: (+225) 27 21 35 96 72 / (+225) 07 07 16 18 30</p>
  </div>
</div>"#,
        name = escape_html(&submission.name),
        subject = escape_html(&submission.subject),
        message = escape_multiline(&submission.message),
    );

    OutboundEmail {
        from: from.to_string(),
        to: submission.email.clone(),
        reply_to: None,
        subject: CONFIRMATION_SUBJECT.to_string(),
        html,
    }
}
