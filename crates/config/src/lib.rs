//! # Folio Configuration
//!
//! One flat `Config` struct doing double duty: `clap::Parser` for the server
//! binary (flags with `FOLIO__*` env fallbacks) and `bon::Builder` for tests
//! that want a config without touching the process environment.
//!
//! ```no_run
//! use folio_config::{Cli, Config};
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! let config = cli.config;
//! config.validate().expect("invalid configuration");
//! ```
//!
//! ```no_run
//! use folio_config::{Config, StorageBackend};
//!
//! let config = Config::builder()
//!     .storage(StorageBackend::Memory)
//!     .jwt_secret("test-secret")
//!     .build();
//! ```

#![deny(unsafe_code)]

use std::{net::SocketAddr, path::PathBuf};

use bon::Builder;
use clap::Parser;
use folio_const::auth::DEFAULT_TOKEN_TTL_DAYS;
use folio_types::error::{Error, Result};

const DEFAULT_LISTEN: &str = "127.0.0.1:8080";
const DEFAULT_DATA_PATH: &str = "./data/folio.redb";
const DEFAULT_UPLOAD_DIR: &str = "./data/uploads";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_EMAIL_FROM_ADDRESS: &str = "noreply@folio.dev";
const DEFAULT_EMAIL_FROM_NAME: &str = "Folio";
const DEFAULT_EMAIL_PORT: u16 = 587;

/// Where entity records live
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum StorageBackend {
    /// Everything in process memory, gone on restart
    Memory,
    /// A single redb file on disk
    #[default]
    File,
}

/// How the server renders its logs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum LogFormat {
    /// Text on a terminal, JSON when stdout is piped
    #[default]
    Auto,
    /// Always JSON
    Json,
    /// Always plain text
    Text,
}

/// Top-level CLI; the config flags are flattened into it
#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,
}

/// Server configuration
///
/// Every field can come from a flag or its `FOLIO__*` environment variable,
/// flags winning. Secrets carry `hide_env_values` so `--help` never prints
/// them.
#[derive(Debug, Clone, Builder, Parser)]
#[command(name = "folio")]
#[command(version)]
#[builder(on(String, into))]
pub struct Config {
    // HTTP server
    /// Address and port to bind
    #[arg(long = "listen", env = "FOLIO__LISTEN", default_value = DEFAULT_LISTEN)]
    #[builder(default = default_listen())]
    pub listen: SocketAddr,

    /// Log filter directive, e.g. `info` or `debug,folio_core=trace`
    #[arg(long = "log-level", env = "FOLIO__LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    #[builder(default = DEFAULT_LOG_LEVEL.to_string())]
    pub log_level: String,

    /// auto, json, or text
    #[arg(long = "log-format", env = "FOLIO__LOG_FORMAT", value_enum, default_value = "auto")]
    #[builder(default)]
    pub log_format: LogFormat,

    // Tokens
    /// Access token signing secret; mandatory unless running --dev-mode
    #[arg(long = "jwt-secret", env = "FOLIO__JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Days an access token stays valid
    #[arg(long = "token-ttl-days", env = "FOLIO__TOKEN_TTL_DAYS", default_value_t = DEFAULT_TOKEN_TTL_DAYS)]
    #[builder(default = DEFAULT_TOKEN_TTL_DAYS)]
    pub token_ttl_days: i64,

    // Storage
    /// memory or file
    #[arg(long = "storage", env = "FOLIO__STORAGE", value_enum, default_value = "file")]
    #[builder(default)]
    pub storage: StorageBackend,

    /// Path of the redb database, for --storage file
    #[arg(long = "data-path", env = "FOLIO__DATA_PATH", default_value = DEFAULT_DATA_PATH)]
    #[builder(default = PathBuf::from(DEFAULT_DATA_PATH))]
    pub data_path: PathBuf,

    /// Directory holding uploaded profile images and resumes
    #[arg(long = "upload-dir", env = "FOLIO__UPLOAD_DIR", default_value = DEFAULT_UPLOAD_DIR)]
    #[builder(default = PathBuf::from(DEFAULT_UPLOAD_DIR))]
    pub upload_dir: PathBuf,

    // SMTP
    /// SMTP relay host; leave empty to run without outbound email
    #[arg(long = "email-host", env = "FOLIO__EMAIL_HOST", default_value = "")]
    #[builder(default)]
    pub email_host: String,

    /// SMTP relay port
    #[arg(long = "email-port", env = "FOLIO__EMAIL_PORT", default_value_t = DEFAULT_EMAIL_PORT)]
    #[builder(default = DEFAULT_EMAIL_PORT)]
    pub email_port: u16,

    /// SMTP auth user
    #[arg(long = "email-username", env = "FOLIO__EMAIL_USERNAME")]
    pub email_username: Option<String>,

    /// SMTP auth password
    #[arg(long = "email-password", env = "FOLIO__EMAIL_PASSWORD", hide_env_values = true)]
    pub email_password: Option<String>,

    /// Sender address on outgoing mail
    #[arg(long = "email-from-address", env = "FOLIO__EMAIL_FROM_ADDRESS", default_value = DEFAULT_EMAIL_FROM_ADDRESS)]
    #[builder(default = DEFAULT_EMAIL_FROM_ADDRESS.to_string())]
    pub email_from_address: String,

    /// Sender display name on outgoing mail
    #[arg(long = "email-from-name", env = "FOLIO__EMAIL_FROM_NAME", default_value = DEFAULT_EMAIL_FROM_NAME)]
    #[builder(default = DEFAULT_EMAIL_FROM_NAME.to_string())]
    pub email_from_name: String,

    /// Talk plain SMTP without TLS, for a local catch-all relay
    #[arg(long = "email-insecure", env = "FOLIO__EMAIL_INSECURE")]
    #[builder(default)]
    pub email_insecure: bool,

    // Google login
    /// OAuth client ID; leave all three google flags unset to disable
    #[arg(long = "google-client-id", env = "FOLIO__GOOGLE_CLIENT_ID")]
    pub google_client_id: Option<String>,

    /// OAuth client secret
    #[arg(
        long = "google-client-secret",
        env = "FOLIO__GOOGLE_CLIENT_SECRET",
        hide_env_values = true
    )]
    pub google_client_secret: Option<String>,

    /// Callback URL registered with Google
    #[arg(long = "google-redirect-url", env = "FOLIO__GOOGLE_REDIRECT_URL")]
    pub google_redirect_url: Option<String>,

    // Modes
    /// Development mode: memory storage and an optional JWT secret.
    /// Deliberately flag-only, with no env fallback.
    #[arg(long = "dev-mode")]
    #[builder(default)]
    pub dev_mode: bool,
}

fn default_listen() -> SocketAddr {
    #[allow(clippy::expect_used)]
    DEFAULT_LISTEN.parse().expect("valid default listen address")
}

impl Config {
    /// Check the rules individual field parsers cannot express
    ///
    /// Call once after parsing, before wiring anything up: token secret
    /// presence, all-or-nothing OAuth flags, SMTP credential pairing.
    pub fn validate(&self) -> Result<()> {
        if !self.dev_mode {
            match self.jwt_secret.as_deref() {
                None => return Err(Error::config("--jwt-secret is required outside dev-mode")),
                Some("") => return Err(Error::config("--jwt-secret must not be empty")),
                Some(_) => {},
            }
        }

        if self.token_ttl_days <= 0 {
            return Err(Error::config("--token-ttl-days must be positive"));
        }

        let oauth_flags = [
            self.google_client_id.is_some(),
            self.google_client_secret.is_some(),
            self.google_redirect_url.is_some(),
        ];
        if oauth_flags.contains(&true) && oauth_flags.contains(&false) {
            return Err(Error::config(
                "--google-client-id, --google-client-secret, and --google-redirect-url must be set together",
            ));
        }
        if let Some(redirect) = self.google_redirect_url.as_deref() {
            if !redirect.starts_with("http://") && !redirect.starts_with("https://") {
                return Err(Error::config(
                    "--google-redirect-url must start with http:// or https://",
                ));
            }
        }

        if self.is_email_enabled()
            && (self.email_username.is_none() || self.email_password.is_none())
            && !self.email_insecure
        {
            return Err(Error::config(
                "--email-username and --email-password are required unless --email-insecure",
            ));
        }

        Ok(())
    }

    /// True when an SMTP host has been configured
    pub fn is_email_enabled(&self) -> bool {
        !self.email_host.is_empty()
    }

    /// True when all three Google flags are present
    pub fn is_oauth_enabled(&self) -> bool {
        self.google_client_id.is_some()
            && self.google_client_secret.is_some()
            && self.google_redirect_url.is_some()
    }

    /// The backend to actually run with; dev-mode pins it to memory
    pub fn effective_storage(&self) -> StorageBackend {
        if self.dev_mode { StorageBackend::Memory } else { self.storage }
    }

    pub fn is_dev_mode(&self) -> bool {
        self.dev_mode
    }
}
