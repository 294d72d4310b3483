use config::{Config, Environment};

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Postgres connection string; the in-memory store is used when unset.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub port: u16,
    pub environment: String,
    pub frontend_urls: Vec<String>,
    pub seed_demo_data: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingVariable(String),
    InvalidFormat(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVariable(var) => write!(f, "Missing environment variable: {}", var),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound(key) => ConfigError::MissingVariable(key.to_uppercase()),
            other => ConfigError::InvalidFormat(other.to_string()),
        }
    }
}

const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let source = Config::builder()
            .add_source(Environment::default().try_parsing(true))
            .build()?;

        Self::from_source(&source)
    }

    /// Reads settings from lower-cased keys (`database_url`, `server_port`, ...).
    pub fn from_source(source: &Config) -> Result<Self, ConfigError> {
        let database_url = source
            .get_string("database_url")
            .ok()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let port = match source.get_int("server_port") {
            Ok(port) => u16::try_from(port).map_err(|_| {
                ConfigError::InvalidFormat("SERVER_PORT must be a valid port number".to_string())
            })?,
            Err(config::ConfigError::NotFound(_)) => 8080,
            Err(_) => {
                return Err(ConfigError::InvalidFormat(
                    "SERVER_PORT must be a valid port number".to_string(),
                ))
            }
        };

        let database_max_connections = match source.get_int("database_max_connections") {
            Ok(n) if n > 0 => n as u32,
            Err(config::ConfigError::NotFound(_)) => 5,
            _ => {
                return Err(ConfigError::InvalidFormat(
                    "DATABASE_MAX_CONNECTIONS must be a positive number".to_string(),
                ))
            }
        };

        let seed_demo_data = match source.get_bool("seed_demo_data") {
            Ok(flag) => flag,
            Err(config::ConfigError::NotFound(_)) => false,
            Err(_) => {
                return Err(ConfigError::InvalidFormat(
                    "SEED_DEMO_DATA must be true or false".to_string(),
                ))
            }
        };

        let environment = source
            .get_string("environment")
            .unwrap_or_else(|_| "development".to_string());

        // Parse allowed origins
        let frontend_urls = source
            .get_string("cors_allowed_origins")
            .unwrap_or_else(|_| DEFAULT_ORIGINS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(AppConfig {
            database_url,
            database_max_connections,
            port,
            environment,
            frontend_urls,
            seed_demo_data,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
