use crate::scoring::occupancy::{TierMap, TierMapError};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub rules: RulesConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            rules: RulesConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Which rule tables to load and how to bucket scores into tiers.
///
/// Without table paths the compiled-in tables are used. A replacement table must be
/// accompanied by `DD_RULES_VERSION` so results stay attributable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RulesConfig {
    pub version: Option<String>,
    pub category_table: Option<PathBuf>,
    pub jurisdiction_table: Option<PathBuf>,
    pub tier_map: TierMap,
    pub score_cache: bool,
}

impl RulesConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let version = non_empty_var("DD_RULES_VERSION");
        let category_table = non_empty_var("DD_CATEGORY_TABLE").map(PathBuf::from);
        let jurisdiction_table = non_empty_var("DD_JURISDICTION_TABLE").map(PathBuf::from);

        if version.is_none() && (category_table.is_some() || jurisdiction_table.is_some()) {
            return Err(ConfigError::MissingRulesVersion);
        }

        let tier_map = match non_empty_var("DD_TIER_MAP") {
            Some(raw) => raw
                .parse()
                .map_err(|source| ConfigError::InvalidTierMap { source })?,
            None => TierMap::default(),
        };

        let score_cache = match non_empty_var("DD_SCORE_CACHE") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidFlag {
                name: "DD_SCORE_CACHE",
                value: raw,
            })?,
            None => false,
        };

        Ok(Self {
            version,
            category_table,
            jurisdiction_table,
            tier_map,
            score_cache,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    MissingRulesVersion,
    InvalidTierMap { source: TierMapError },
    InvalidFlag { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::MissingRulesVersion => write!(
                f,
                "DD_RULES_VERSION is required when DD_CATEGORY_TABLE or DD_JURISDICTION_TABLE is set"
            ),
            ConfigError::InvalidTierMap { source } => write!(f, "DD_TIER_MAP is invalid: {source}"),
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{name} must be true or false, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidTierMap { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::MissingRulesVersion
            | ConfigError::InvalidFlag { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for name in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "DD_RULES_VERSION",
            "DD_CATEGORY_TABLE",
            "DD_JURISDICTION_TABLE",
            "DD_TIER_MAP",
            "DD_SCORE_CACHE",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.rules, RulesConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn rules_section_reads_tables_tiers_and_cache() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("DD_RULES_VERSION", "2026.01-custom");
        env::set_var("DD_JURISDICTION_TABLE", "/etc/dd/jurisdictions.csv");
        env::set_var("DD_TIER_MAP", "1,2,2,3,3,4,5,5");
        env::set_var("DD_SCORE_CACHE", "yes");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.rules.version.as_deref(), Some("2026.01-custom"));
        assert_eq!(
            config.rules.jurisdiction_table,
            Some(PathBuf::from("/etc/dd/jurisdictions.csv"))
        );
        assert_eq!(config.rules.category_table, None);
        assert_eq!(config.rules.tier_map.levels(), [1, 2, 2, 3, 3, 4, 5, 5]);
        assert!(config.rules.score_cache);
        reset_env();
    }

    #[test]
    fn replacement_table_requires_version() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("DD_CATEGORY_TABLE", "./categories.csv");
        let error = AppConfig::load().expect_err("version required");
        assert!(matches!(error, ConfigError::MissingRulesVersion));
        reset_env();
    }

    #[test]
    fn invalid_tier_map_and_flag_are_rejected() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("DD_TIER_MAP", "5,4,3,2,1,1,1,1");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidTierMap {
                source: TierMapError::NotMonotonic
            })
        ));

        reset_env();
        env::set_var("DD_SCORE_CACHE", "sometimes");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidFlag { name: "DD_SCORE_CACHE", .. })
        ));
        reset_env();
    }
}
