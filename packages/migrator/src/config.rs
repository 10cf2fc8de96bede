use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Postgres connection string. Required; there is no sensible default.
    pub url: String,
}

/// Storage host used when composing canonical references.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Base URL of the storage host. Default: the Supabase project the
    /// images were uploaded to.
    #[serde(default = "default_storage_base_url")]
    pub base_url: String,
}

fn default_storage_base_url() -> String {
    "https://qgtwkhkmdsaypnsnrpbf.supabase.co".into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_url: default_storage_base_url(),
        }
    }
}

/// Migration job configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("MIGRATOR_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let mut builder = Config::builder()
            .set_default("storage.base_url", default_storage_base_url())?
            // Load from config/config.toml
            .add_source(File::with_name(&config_path).required(false))
            // Override from environment (e.g., MIGRATOR__DATABASE__URL)
            .add_source(Environment::with_prefix("MIGRATOR").separator("__"));

        // The job has always been driven by a bare DATABASE_URL variable;
        // keep honoring it as the strongest override.
        if let Ok(url) = std::env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", url)?;
        }

        builder.build()?.try_deserialize()
    }
}
