use std::sync::Arc;

use triton_web::chat::{IntentMatcher, KnowledgeBase};
use triton_web::config::ServerConfig;
use triton_web::contact::limiter::spawn_sweep_task;
use triton_web::contact::{ContactState, MailBackend, MailConfig, RateLimiter, SweepPolicy, create_mailer};
use triton_web::server;

#[tokio::main]
async fn main() -> triton_web::error::Result<()> {
    // Install rustls crypto provider before any TLS usage
    let _ = rustls::crypto::ring::default_provider().install_default();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServerConfig::from_env()?;

    let knowledge = match &config.knowledge_path {
        Some(path) => KnowledgeBase::load(path)?,
        None => KnowledgeBase::builtin(),
    };
    let topic_count = knowledge.topics.len();
    let matcher = IntentMatcher::new(knowledge);

    // `triton-web chat` runs the assistant on stdin/stdout instead of serving
    if std::env::args().nth(1).as_deref() == Some("chat") {
        triton_web::chat::cli::run(matcher).await?;
        return Ok(());
    }

    let mail = MailConfig::from_env()?;
    let backend_name = match &mail.backend {
        MailBackend::Smtp(s) => format!("smtp ({}:{})", s.host, s.port),
        MailBackend::Resend(s) => format!("resend ({})", s.api_url),
        MailBackend::Log => "log (emails are not delivered)".to_string(),
    };

    eprintln!("🌊 triton-web v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Chat: {} topics", topic_count);
    eprintln!(
        "   Contact: {} submissions / {}s per client",
        config.rate_limit.max_submissions,
        config.rate_limit.window.num_seconds()
    );
    eprintln!("   Mail: {}", backend_name);
    eprintln!("   HTTP: http://0.0.0.0:{}\n", config.port);

    let limiter = Arc::new(RateLimiter::with_system_clock(config.rate_limit.clone()));
    if let SweepPolicy::Periodic { interval } = config.rate_limit.sweep {
        let _sweep_handle = spawn_sweep_task(Arc::clone(&limiter), interval);
    }

    let contact = ContactState {
        limiter,
        mailer: create_mailer(mail.backend),
        from: mail.from,
        operator_inbox: mail.operator_inbox,
    };

    let app = server::app(matcher, contact);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "HTTP server started");
    axum::serve(listener, app).await?;

    Ok(())
}
