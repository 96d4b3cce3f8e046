//! Server configuration module

use clap::Parser;
use driftworks::{
    money::{self, MoneyError},
    vouchers::ValidityWindow,
};
use driftworks_app::{context::AppConfig, payments::PaymentsConfig as GatewayConfig};

use crate::config::{
    commerce::CommerceConfig,
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    payments::PaymentsConfig,
    server::ServerRuntimeConfig,
};

pub(crate) mod commerce;
pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod payments;
pub(crate) mod server;

/// Driftworks JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "driftworks-json", about = "Driftworks JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Payment provider settings.
    #[command(flatten)]
    pub payments: PaymentsConfig,

    /// Currency and voucher settings.
    #[command(flatten)]
    pub commerce: CommerceConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Settings the application services are built from.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured currency is not supported.
    pub fn app_config(&self) -> Result<AppConfig, MoneyError> {
        Ok(AppConfig {
            database_url: self.database.database_url.clone(),
            payments: GatewayConfig {
                api_url: self.payments.payments_api_url.clone(),
                secret_key: self.payments.payments_secret_key.clone(),
            },
            validity: ValidityWindow::days(self.commerce.voucher_validity_days),
            currency: money::currency(&self.commerce.currency)?,
            migrate: self.database.database_migrate,
        })
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::EUR;
    use testresult::TestResult;

    use super::*;

    const REQUIRED: [&str; 7] = [
        "driftworks-json",
        "--database-url",
        "postgres://localhost/driftworks",
        "--payments-secret-key",
        "sk_test",
        "--payments-webhook-secret",
        "whsec_test",
    ];

    #[test]
    fn defaults_to_euro_and_a_year_of_validity() -> TestResult {
        let config = ServerConfig::try_parse_from(REQUIRED)?;
        let app = config.app_config()?;

        assert_eq!(app.currency, EUR);
        assert_eq!(app.validity, ValidityWindow::days(365));
        assert!(!app.migrate);
        assert_eq!(config.socket_addr(), "0.0.0.0:8698");

        Ok(())
    }

    #[test]
    fn unknown_currency_is_rejected() -> TestResult {
        let config = ServerConfig::try_parse_from(REQUIRED.into_iter().chain(["--currency", "XYZ"]))?;

        assert!(matches!(
            config.app_config(),
            Err(MoneyError::UnknownCurrency(code)) if code == "XYZ"
        ));

        Ok(())
    }
}
