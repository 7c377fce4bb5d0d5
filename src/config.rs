use crate::logic::MissingPolicy;
use log::LevelFilter;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub schema: SchemaConfig,
    pub input: InputConfig,
    pub assign: AssignConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// JSON schema document; the seed schema is used when unset
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// JSON object of attribute values; the seed input is used when unset
    pub path: Option<String>,
    pub class: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignConfig {
    pub missing: MissingPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: None,
            class: "Order".to_string(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional `modelx` config file and
    /// `MODELX_*` environment variables
    pub fn load() -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Add default configuration
        config = config.add_source(config::Config::try_from(&AppConfig::default())?);

        // Add config file if it exists
        config = config.add_source(config::File::with_name("modelx").required(false));

        // Add environment variables with prefix "MODELX_"
        config = config.add_source(
            config::Environment::with_prefix("MODELX")
                .separator("_")
                .prefix_separator("_"),
        );

        let config = config.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        Ok(app_config)
    }

    /// Log level filter, `info` when the configured level is not recognised
    pub fn log_level(&self) -> LevelFilter {
        self.log.level.parse().unwrap_or(LevelFilter::Info)
    }
}
