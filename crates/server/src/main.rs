use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use folio_api::AppState;
use folio_config::{Cli, LogFormat, StorageBackend};
use folio_const::auth::DEFAULT_TOKEN_TTL_DAYS;
use folio_core::{
    EmailService, FileStore, GoogleOAuth, IdGenerator, Mailer, MockEmailSender, SmtpEmailService,
    TokenIssuer, logging,
};
use folio_storage::{StorageConfig, create_storage_backend};

/// Fallback signing secret for dev-mode runs without `--jwt-secret`.
const DEV_JWT_SECRET: &str = "folio-dev-secret";

/// Map the config's log format onto the logging module, resolving `auto`
/// by whether stdout is a terminal.
fn log_format(choice: LogFormat) -> logging::LogFormat {
    let on_terminal = std::io::IsTerminal::is_terminal(&std::io::stdout());
    match choice {
        LogFormat::Json => logging::LogFormat::Json,
        LogFormat::Text => logging::LogFormat::Full,
        LogFormat::Auto if on_terminal => logging::LogFormat::Full,
        LogFormat::Auto => logging::LogFormat::Json,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config;

    config.validate()?;

    let log_config = logging::LogConfig {
        format: log_format(config.log_format),
        filter: Some(config.log_level.clone()),
        ..Default::default()
    };
    if let Err(e) = logging::init_logging(log_config) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Folio");
    if config.is_dev_mode() {
        tracing::info!("Development mode enabled via --dev-mode: using memory storage");
    }

    // Storage backend
    let storage_config = match config.effective_storage() {
        StorageBackend::Memory => StorageConfig::memory(),
        StorageBackend::File => StorageConfig::file(config.data_path.clone()),
    };
    let storage = Arc::new(create_storage_backend(&storage_config)?);
    tracing::info!(backend = %config.effective_storage(), "Storage initialized");

    // Single-instance deployment; the worker ID only matters when several
    // generators mint IDs concurrently
    IdGenerator::init(1).map_err(|e| anyhow::anyhow!("Failed to initialize ID generator: {e}"))?;

    // Uploaded file store
    let files = Arc::new(FileStore::new(config.upload_dir.clone()).await?);

    // Token signing
    let secret = match config.jwt_secret.as_deref() {
        Some(secret) => secret,
        // config.validate() only permits a missing secret in dev-mode
        None => {
            tracing::warn!("No --jwt-secret configured, using the dev-mode fallback secret");
            DEV_JWT_SECRET
        },
    };
    let ttl_days = if config.token_ttl_days > 0 {
        config.token_ttl_days
    } else {
        DEFAULT_TOKEN_TTL_DAYS
    };
    let issuer = Arc::new(TokenIssuer::new(secret, ttl_days));

    // Outbound email: real SMTP when configured, otherwise a mock sink so
    // reset flows still work in development
    let email_service = if config.is_email_enabled() {
        let smtp = SmtpEmailService::new(
            &config.email_host,
            config.email_port,
            config.email_username.as_deref().unwrap_or_default(),
            config.email_password.as_deref().unwrap_or_default(),
            config.email_from_address.clone(),
            config.email_from_name.clone(),
            config.email_insecure,
        )?;
        tracing::info!(
            host = %config.email_host,
            port = config.email_port,
            insecure = config.email_insecure,
            "Email service initialized"
        );
        EmailService::new(Box::new(smtp))
    } else {
        tracing::info!("Email not configured, reset codes will not be delivered");
        EmailService::new(Box::new(MockEmailSender::new()))
    };
    let mailer = Mailer::spawn(Arc::new(email_service));

    // Google OAuth, when fully configured
    let oauth = if config.is_oauth_enabled() {
        // config.validate() guarantees all three fields are present together
        match (&config.google_client_id, &config.google_client_secret, &config.google_redirect_url)
        {
            (Some(id), Some(secret), Some(redirect)) => {
                tracing::info!("Google login enabled");
                Some(Arc::new(GoogleOAuth::new(id.clone(), secret.clone(), redirect.clone())))
            },
            _ => None,
        }
    } else {
        tracing::info!("Google login not configured");
        None
    };

    let state = AppState::builder()
        .storage(storage)
        .config(Arc::new(config))
        .issuer(issuer)
        .mailer(mailer)
        .maybe_oauth(oauth)
        .files(files)
        .build();

    folio_api::serve(state).await?;

    tracing::info!("Shutting down gracefully");
    Ok(())
}
