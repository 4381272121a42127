//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Balance engine configuration.
    #[serde(default)]
    pub balance: BalanceConfig,
    /// PIX merchant configuration used for payment codes.
    #[serde(default)]
    pub pix: PixConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
///
/// Tokens are issued by the identity provider; this service only validates them.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Shared secret used to verify token signatures.
    pub secret: String,
    /// Lifetime of tokens minted by [`crate::JwtService::generate_access_token`].
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

/// Balance engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceConfig {
    /// Holding period before approved capital becomes withdrawable.
    #[serde(default = "default_maturity_window_days")]
    pub maturity_window_days: u32,
    /// IANA time zone used to turn timestamps into business dates.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            maturity_window_days: default_maturity_window_days(),
            timezone: default_timezone(),
        }
    }
}

impl BalanceConfig {
    /// Parses the configured time zone.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a known IANA zone.
    pub fn tz(&self) -> Result<chrono_tz::Tz, config::ConfigError> {
        self.timezone.parse::<chrono_tz::Tz>().map_err(|_| {
            config::ConfigError::Message(format!("unknown time zone: {}", self.timezone))
        })
    }
}

fn default_maturity_window_days() -> u32 {
    90
}

fn default_timezone() -> String {
    "America/Sao_Paulo".to_string()
}

/// PIX merchant data embedded in generated payment codes.
#[derive(Debug, Clone, Deserialize)]
pub struct PixConfig {
    /// Receiving PIX key (CPF/CNPJ, e-mail, phone or random key).
    #[serde(default)]
    pub key: String,
    /// Merchant name, truncated to 25 characters in the payload.
    #[serde(default = "default_merchant_name")]
    pub merchant_name: String,
    /// Merchant city, truncated to 15 characters in the payload.
    #[serde(default = "default_merchant_city")]
    pub merchant_city: String,
}

impl Default for PixConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            merchant_name: default_merchant_name(),
            merchant_city: default_merchant_city(),
        }
    }
}

fn default_merchant_name() -> String {
    "VERTICE".to_string()
}

fn default_merchant_city() -> String {
    "SAO PAULO".to_string()
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
            .add_source(config::Environment::with_prefix("VERTICE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
