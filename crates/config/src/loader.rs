//! Loading `AppConfig` from files and the environment

use crate::{AppConfig, ConfigError, Result};
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use std::path::Path;

fn format_for(path: &Path) -> Option<FileFormat> {
    match path.extension().and_then(|e| e.to_str())? {
        "toml" => Some(FileFormat::Toml),
        "yaml" | "yml" => Some(FileFormat::Yaml),
        "json" => Some(FileFormat::Json),
        _ => None,
    }
}

/// Entry points for loading the application configuration.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Read one config file, picking the parser from its extension
    /// (`.toml`, `.yaml`/`.yml`, or `.json`).
    pub fn from_file(path: &Path) -> Result<AppConfig> {
        let format = format_for(path).ok_or_else(|| {
            ConfigError::LoadError(format!("unrecognized config file: {}", path.display()))
        })?;
        let content = std::fs::read_to_string(path)?;

        match format {
            FileFormat::Toml => Self::from_toml(&content),
            FileFormat::Yaml => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }

    pub fn from_toml(content: &str) -> Result<AppConfig> {
        toml::from_str(content).map_err(ConfigError::from)
    }

    pub fn from_yaml(content: &str) -> Result<AppConfig> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    pub fn from_json(content: &str) -> Result<AppConfig> {
        serde_json::from_str(content).map_err(ConfigError::from)
    }

    /// Read configuration from `WORKLIST_SYNC_*` environment variables,
    /// e.g. `WORKLIST_SYNC_LOGGING_LEVEL=debug`.
    pub fn from_env() -> Result<AppConfig> {
        Self::from_env_with_prefix("WORKLIST_SYNC")
    }

    pub fn from_env_with_prefix(prefix: &str) -> Result<AppConfig> {
        Config::builder()
            .add_source(Environment::with_prefix(prefix).separator("_"))
            .build()?
            .try_deserialize()
            .map_err(ConfigError::from)
    }

    /// Overlay one configuration on another.
    ///
    /// Scalar sections are taken from the overlay wholesale;
    /// classification extensions are unioned so a deployment file and an
    /// override can each contribute lists.
    pub fn merge(base: AppConfig, overlay: AppConfig) -> AppConfig {
        let mut classification = base.classification;
        classification
            .extra_queue_required
            .extend(overlay.classification.extra_queue_required);
        classification
            .extra_bypass_eligible
            .extend(overlay.classification.extra_bypass_eligible);

        AppConfig {
            logging: overlay.logging,
            scheduler: overlay.scheduler,
            consistency: overlay.consistency,
            metrics: overlay.metrics,
            classification,
        }
    }

    /// File first, then env overrides with the given prefix. Absent env
    /// configuration is not an error.
    pub fn from_file_with_env(path: &Path, env_prefix: &str) -> Result<AppConfig> {
        let from_file = Self::from_file(path)?;
        match Self::from_env_with_prefix(env_prefix) {
            Ok(from_env) => Ok(Self::merge(from_file, from_env)),
            Err(_) => Ok(from_file),
        }
    }

    /// Multi-source loading through the `config` crate's builder.
    pub fn builder() -> ConfigLoaderBuilder {
        ConfigLoaderBuilder {
            builder: Config::builder(),
        }
    }
}

/// Accumulates file and environment sources; later sources win.
pub struct ConfigLoaderBuilder {
    builder: ConfigBuilder<config::builder::DefaultState>,
}

impl ConfigLoaderBuilder {
    pub fn add_file(mut self, path: &Path, required: bool) -> Self {
        let format = format_for(path).unwrap_or(FileFormat::Toml);
        self.builder = self
            .builder
            .add_source(File::from(path).format(format).required(required));
        self
    }

    pub fn add_env(mut self, prefix: &str) -> Self {
        self.builder = self
            .builder
            .add_source(Environment::with_prefix(prefix).separator("_"));
        self
    }

    pub fn build(self) -> Result<AppConfig> {
        self.builder
            .build()?
            .try_deserialize()
            .map_err(ConfigError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_toml() {
        let toml = r#"
            [logging]
            level = "debug"
            json = true

            [scheduler]
            max_samples_per_category = 50
            persist_samples = false

            [consistency]
            window_secs = 60
            max_entries = 128

            [metrics]
            enabled = true
            bind_addr = "0.0.0.0"
            port = 9100

            [classification.extra_queue_required]
            billing = ["void-invoice"]
        "#;

        let config = ConfigLoader::from_toml(toml).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.scheduler.max_samples_per_category, 50);
        assert_eq!(config.consistency.window_secs, 60);
        assert_eq!(
            config.classification.extra_queue_required["billing"],
            vec!["void-invoice"]
        );
    }

    #[test]
    fn test_load_from_yaml() {
        let yaml = r#"
logging:
  level: debug
  json: false

scheduler:
  max_samples_per_category: 75
  persist_samples: true

consistency:
  window_secs: 45
  max_entries: 64

metrics:
  enabled: false
  bind_addr: "127.0.0.1"
  port: 9464
        "#;

        let config = ConfigLoader::from_yaml(yaml).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.scheduler.max_samples_per_category, 75);
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn test_load_from_json() {
        let json = r#"
{
  "logging": { "level": "warn", "json": true },
  "consistency": { "window_secs": 15, "max_entries": 32 }
}
        "#;

        let config = ConfigLoader::from_json(json).unwrap();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.consistency.window_secs, 15);
        // Unspecified sections fall back to defaults
        assert_eq!(config.scheduler.max_samples_per_category, 200);
    }

    #[test]
    fn test_load_from_file() {
        let toml = r#"
[logging]
level = "debug"
        "#;

        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(toml.as_bytes()).unwrap();

        let config = ConfigLoader::from_file(file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_unrecognized_extension_is_refused() {
        let err = ConfigLoader::from_file(Path::new("worklist-sync.ini")).unwrap_err();
        assert!(err.to_string().contains("worklist-sync.ini"));
    }

    #[test]
    fn test_merge_configs() {
        let mut base = AppConfig::default();
        base.classification
            .extra_queue_required
            .insert("billing".to_string(), vec!["void-invoice".to_string()]);

        let mut overlay = AppConfig::default();
        overlay.logging.level = "debug".to_string();
        overlay
            .classification
            .extra_queue_required
            .insert("generic".to_string(), vec!["bulk-edit".to_string()]);

        let merged = ConfigLoader::merge(base, overlay);
        assert_eq!(merged.logging.level, "debug");
        assert_eq!(merged.classification.extra_queue_required.len(), 2);
    }
}
