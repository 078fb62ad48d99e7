//! # Varsel Configuration System
//!
//! Hierarchical configuration management for the Varsel disaster monitor.
//!
//! ## Features
//! - **Unified Configuration**: Single source of truth across all components
//! - **Validation**: Runtime validation of thresholds and window parameters
//! - **Environment Awareness**: Per-environment overrides plus `VARSEL_*`
//!   environment variables

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod core;
mod detection;
mod error;
mod telemetry;
mod validation;

pub use self::core::CoreConfig;
pub use self::core::EventBusConfig;
pub use detection::DetectionConfig;
pub use detection::FallbackConfig;
pub use detection::SpikeConfig;
pub use detection::ThresholdConfig;
pub use error::ConfigError;
pub use telemetry::TelemetryConfig;

/// Top-level configuration container for all Varsel components.
#[derive(Debug, Serialize, Deserialize, Validate, Default)]
pub struct VarselConfig {
    /// Core system configuration (event bus sizing).
    #[validate(nested)]
    #[serde(default)]
    pub core: CoreConfig,

    /// Detection engine thresholds and spike parameters.
    #[validate(nested)]
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Telemetry and observability configuration.
    #[validate(nested)]
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl VarselConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/varsel.yaml` - base settings. If missing, defaults are used.
    /// 3. `config/<environment>.yaml` - environment-specific overrides.
    /// 4. `VARSEL_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(VarselConfig::default()));

        if Path::new("config/varsel.yaml").exists() {
            figment = figment.merge(Yaml::file("config/varsel.yaml"));
        }

        let env = std::env::var("VARSEL_ENV").unwrap_or_else(|_| "production".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        figment
            .merge(Env::prefixed("VARSEL_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }

    /// Load configuration from a specific path for testing/validation.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(
                path.to_string_lossy().to_string(),
            )));
        }

        Figment::from(Serialized::defaults(VarselConfig::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("VARSEL_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_validation() {
        let config = VarselConfig::default();
        config.validate().expect("Default config should validate");
    }

    #[test]
    fn environment_override() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("VARSEL_CORE__EVENT_BUS__CAPACITY", "8192");
            let config = VarselConfig::load().expect("load should succeed");
            assert_eq!(config.core.event_bus.capacity, 8192);
            Ok(())
        });
    }

    #[test]
    fn yaml_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "varsel.yaml",
                r#"
detection:
  spike:
    min_count: 7
"#,
            )?;
            let config = VarselConfig::load_from_path("varsel.yaml").expect("load should succeed");
            assert_eq!(config.detection.spike.min_count, 7);
            assert_eq!(config.detection.spike.window_ms, 10_000);
            Ok(())
        });
    }

    #[test]
    fn missing_path_is_an_error() {
        assert!(matches!(
            VarselConfig::load_from_path("no/such/file.yaml"),
            Err(ConfigError::FileNotFound(_))
        ));
    }

    #[test]
    fn invalid_yaml_values_fail_validation() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "varsel.yaml",
                r#"
detection:
  min_severity: urgent
"#,
            )?;
            let result = VarselConfig::load_from_path("varsel.yaml");
            assert!(matches!(result, Err(ConfigError::Validation(_))));
            Ok(())
        });
    }
}
