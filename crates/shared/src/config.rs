//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Ledger policy configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Display formatting configuration.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_url() -> String {
    "sqlite://emanet.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

/// Ledger policy: trash retention and the balance comparison tolerance.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Days a trashed record stays restorable.
    #[serde(default = "default_trash_retention_days")]
    pub trash_retention_days: u32,
    /// Slack allowed when a withdrawal or repayment is compared against the
    /// available balance.
    #[serde(default = "default_balance_tolerance")]
    pub balance_tolerance: Decimal,
}

fn default_trash_retention_days() -> u32 {
    30
}

fn default_balance_tolerance() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            trash_retention_days: default_trash_retention_days(),
            balance_tolerance: default_balance_tolerance(),
        }
    }
}

/// Number formatting for display. Defaults follow the `tr-TR` locale.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Fraction digits shown.
    #[serde(default = "default_decimals")]
    pub decimals: u32,
    /// Thousands group separator.
    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: String,
    /// Decimal separator.
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: String,
    /// Suffix for currency-denominated value types.
    #[serde(default = "default_currency_code")]
    pub currency_code: String,
}

fn default_decimals() -> u32 {
    2
}

fn default_thousands_separator() -> String {
    ".".to_string()
}

fn default_decimal_separator() -> String {
    ",".to_string()
}

fn default_currency_code() -> String {
    "TL".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            decimals: default_decimals(),
            thousands_separator: default_thousands_separator(),
            decimal_separator: default_decimal_separator(),
            currency_code: default_currency_code(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("EMANET").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
