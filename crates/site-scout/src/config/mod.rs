use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

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
    pub sources: SourcesConfig,
    pub collector: CollectorConfig,
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
            sources: SourcesConfig::from_env()?,
            collector: CollectorConfig::from_env()?,
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

/// Endpoints and credentials for the third-party data sources.
#[derive(Debug, Clone)]
pub struct SourcesConfig {
    pub nominatim_url: String,
    pub census_url: String,
    pub census_api_key: Option<String>,
    pub overpass_url: String,
    pub attom_url: String,
    pub attom_api_key: Option<String>,
    pub hunter_url: String,
    pub hunter_api_key: Option<String>,
    pub user_agent: String,
    /// Minimum spacing between geocoder requests; zero disables the throttle.
    pub geocoder_rate_limit: Duration,
}

impl SourcesConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let rate_limit_ms: u64 = env_parse("GEOCODER_RATE_LIMIT_MS", 1_000)?;

        Ok(Self {
            nominatim_url: env_or("NOMINATIM_URL", "https://nominatim.openstreetmap.org/search"),
            census_url: env_or("CENSUS_URL", "https://api.census.gov/data"),
            census_api_key: env_opt("CENSUS_API_KEY"),
            overpass_url: env_or("OVERPASS_URL", "https://overpass-api.de/api/interpreter"),
            attom_url: env_or(
                "ATTOM_URL",
                "https://api.gateway.attomdata.com/propertyapi/v1.0.0",
            ),
            attom_api_key: env_opt("ATTOM_API_KEY"),
            hunter_url: env_or("HUNTER_URL", "https://api.hunter.io/v2"),
            hunter_api_key: env_opt("HUNTER_API_KEY"),
            user_agent: env_or("HTTP_USER_AGENT", "site-scout/0.1"),
            geocoder_rate_limit: Duration::from_millis(rate_limit_ms),
        })
    }
}

/// Knobs for the per-run metric collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectorConfig {
    pub search_radius_meters: u32,
    pub commercial_radius_miles: f64,
    pub competitor_tag: String,
    pub portfolio_csv: Option<PathBuf>,
    pub concurrency: usize,
    /// `None` keeps memoized lookups for the lifetime of the process.
    pub cache_ttl: Option<Duration>,
    /// Upper bound on entries held by each memo cache.
    pub cache_capacity: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            search_radius_meters: 5_000,
            commercial_radius_miles: 1.0,
            competitor_tag: "office=coworking".to_string(),
            portfolio_csv: None,
            concurrency: 4,
            cache_ttl: Some(Duration::from_secs(3_600)),
            cache_capacity: 4_096,
        }
    }
}

impl CollectorConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let cache_ttl_secs: u64 = env_parse("CACHE_TTL_SECS", 3_600)?;
        let concurrency: usize = env_parse("COLLECTOR_CONCURRENCY", defaults.concurrency)?;
        let cache_capacity: usize = env_parse("CACHE_MAX_ENTRIES", defaults.cache_capacity)?;

        Ok(Self {
            search_radius_meters: env_parse("SEARCH_RADIUS_METERS", defaults.search_radius_meters)?,
            commercial_radius_miles: env_parse(
                "COMMERCIAL_RADIUS_MILES",
                defaults.commercial_radius_miles,
            )?,
            competitor_tag: env_or("COMPETITOR_TAG", &defaults.competitor_tag),
            portfolio_csv: env_opt("PORTFOLIO_CSV").map(PathBuf::from),
            concurrency: concurrency.max(1),
            cache_ttl: (cache_ttl_secs > 0).then(|| Duration::from_secs(cache_ttl_secs)),
            cache_capacity: cache_capacity.max(1),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_parse<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env_opt(key) {
        Some(value) => value
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
        None => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be numeric (got '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
