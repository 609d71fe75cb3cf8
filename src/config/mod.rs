use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

use crate::domain::AdminCredentials;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub default_email: String,
    pub default_password: String,
    pub session_marker: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    #[serde(default = "default_seed_on_startup")]
    pub on_startup: bool,
}

fn default_seed_on_startup() -> bool {
    true
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self { on_startup: default_seed_on_startup() }
    }
}

impl AuthConfig {
    /// Credentials written by the seed initializer when no admin record exists.
    pub fn default_credentials(&self) -> AdminCredentials {
        AdminCredentials {
            email: self.default_email.clone(),
            password: self.default_password.clone(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // A missing .env file is fine; anything it sets feeds the Environment source below.
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // Start with default values
            .set_default("database.url", "sqlite://academy.db")?
            .set_default("database.max_connections", 5)?
            .set_default("auth.default_email", "admin@school.com")?
            .set_default("auth.default_password", "admin123")?
            .set_default("auth.session_marker", "mock-jwt-token")?
            .set_default("seed.on_startup", true)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Add environment variables (with ACADEMY__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("ACADEMY").separator("__"))

            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://academy.db".to_string(),
                max_connections: 5,
            },
            auth: AuthConfig {
                default_email: "admin@school.com".to_string(),
                default_password: "admin123".to_string(),
                session_marker: "mock-jwt-token".to_string(),
            },
            seed: SeedConfig::default(),
        }
    }
}
