//! Configuration
//!
//! Every setting can come from a flag or from the environment; a `.env` file
//! in the working directory is loaded first.

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use rusty_money::iso::{self, Currency};
use storefront::support::{Responder, ScriptError};
use thiserror::Error;

use crate::{
    backend::BackendConfig,
    session::{Session, UserId},
};

/// Errors raised while resolving configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The store currency is not an ISO 4217 code.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// The chat script could not be loaded.
    #[error(transparent)]
    ChatScript(#[from] ScriptError),
}

/// Log output format.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Backend connection settings.
#[derive(Debug, Args)]
pub struct BackendArgs {
    /// Backend project URL
    #[arg(long, env = "BACKEND_URL")]
    pub backend_url: String,

    /// Backend anonymous API key
    #[arg(long, env = "BACKEND_ANON_KEY", hide_env_values = true)]
    pub backend_anon_key: String,

    /// Access token of the signed-in user
    #[arg(long, env = "STOREFRONT_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,
}

/// Storefront settings.
#[derive(Debug, Args)]
pub struct StorefrontConfig {
    #[command(flatten)]
    pub backend: BackendArgs,

    /// Id of the signed-in user; anonymous when omitted
    #[arg(long, env = "STOREFRONT_USER_ID")]
    pub user_id: Option<String>,

    /// Where the cart is kept between runs
    #[arg(long, env = "STOREFRONT_CART_PATH", default_value = ".storefront-cart.json")]
    pub cart_path: PathBuf,

    /// ISO 4217 code of the store currency
    #[arg(long, env = "STOREFRONT_CURRENCY", default_value = "INR")]
    pub currency: String,

    /// YAML script replacing the support assistant's replies
    #[arg(long, env = "CHAT_SCRIPT")]
    pub chat_script: Option<PathBuf>,

    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl StorefrontConfig {
    /// Load the `.env` file if present. Call before parsing.
    pub fn load_env() {
        _ = dotenvy::dotenv();
    }

    /// Backend client settings.
    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            url: self.backend.backend_url.clone(),
            anon_key: self.backend.backend_anon_key.clone(),
            access_token: self
                .backend
                .access_token
                .clone()
                .filter(|token| !token.trim().is_empty()),
        }
    }

    /// Session for the configured user.
    pub fn session(&self) -> Session {
        self.user_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(UserId::new)
            .into()
    }

    /// Store currency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] for codes outside ISO 4217.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        iso::find(&self.currency.trim().to_uppercase())
            .ok_or_else(|| ConfigError::UnknownCurrency(self.currency.clone()))
    }

    /// Cart file path.
    pub fn cart_path(&self) -> &Path {
        &self.cart_path
    }

    /// Support assistant, from the chat script when one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ChatScript`] if the script cannot be loaded.
    pub fn responder(&self) -> Result<Responder, ConfigError> {
        match &self.chat_script {
            Some(path) => Ok(Responder::load(path)?),
            None => Ok(Responder::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        config: StorefrontConfig,
    }

    fn parse(args: &[&str]) -> Result<StorefrontConfig, clap::Error> {
        let base = [
            "storefront",
            "--backend-url",
            "https://project.example.co",
            "--backend-anon-key",
            "anon",
        ];

        TestCli::try_parse_from(base.iter().chain(args)).map(|cli| cli.config)
    }

    #[test]
    fn currency_defaults_to_rupees() -> TestResult {
        let config = parse(&["--currency", "inr"])?;

        assert_eq!(config.currency()?, iso::INR);

        Ok(())
    }

    #[test]
    fn unknown_currency_is_rejected() -> TestResult {
        let config = parse(&["--currency", "XYZ"])?;

        assert!(matches!(
            config.currency(),
            Err(ConfigError::UnknownCurrency(code)) if code == "XYZ"
        ));

        Ok(())
    }

    #[test]
    fn blank_user_is_anonymous() -> TestResult {
        let config = parse(&["--user-id", "  "])?;

        assert_eq!(config.session(), Session::anonymous());

        let config = parse(&["--user-id", "u-1"])?;

        assert_eq!(config.session(), Session::authenticated(UserId::new("u-1")));

        Ok(())
    }

    #[test]
    fn chat_script_replaces_default_responder() -> TestResult {
        let mut script = tempfile::NamedTempFile::new()?;

        writeln!(script, "rules:\n  - keyword: refund\n    response: Refunds take 5 days.")?;

        let path = script.path().to_string_lossy().into_owned();
        let config = parse(&["--chat-script", &path])?;

        assert_eq!(config.responder()?.reply("refund?"), "Refunds take 5 days.");

        Ok(())
    }
}
