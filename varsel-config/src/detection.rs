//! Detection engine configuration.
//!
//! Every constant the engine compares a reading against lives here, so rule
//! behavior is tunable per deployment without touching rule code.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Detection engine configuration parameters.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct DetectionConfig {
    /// Per-source threshold constants.
    #[validate(nested)]
    #[serde(default)]
    pub thresholds: ThresholdConfig,

    /// Social-text spike detection parameters.
    #[validate(nested)]
    #[serde(default)]
    pub spike: SpikeConfig,

    /// Coordinate synthesis fallback for events without location data.
    #[validate(nested)]
    #[serde(default)]
    pub fallback: FallbackConfig,

    /// Minimum severity forwarded to alert sinks.
    #[validate(custom(function = validation::validate_severity))]
    #[serde(default = "default_min_severity")]
    pub min_severity: String,
}

fn default_min_severity() -> String {
    "medium".into()
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdConfig::default(),
            spike: SpikeConfig::default(),
            fallback: FallbackConfig::default(),
            min_severity: default_min_severity(),
        }
    }
}

/// Threshold constants for the history-free rules. No hysteresis.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct ThresholdConfig {
    /// Temperature (°C) at or above which a fire alert fires.
    #[validate(range(min = 0.0, max = 200.0))]
    #[serde(default = "default_fire_temp")]
    pub fire_temp: f64,

    /// Temperature (°C) at or above which a heat-risk alert fires.
    #[validate(range(min = 0.0, max = 200.0))]
    #[serde(default = "default_heat_temp")]
    pub heat_temp: f64,

    /// Water gauge level at or above which a flood alert fires.
    #[validate(range(min = 0.0, max = 1000.0))]
    #[serde(default = "default_flood_level")]
    pub flood_level: f64,

    /// Margin above `flood_level` that escalates flood severity to critical.
    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(default = "default_flood_critical_margin")]
    pub flood_critical_margin: f64,

    /// Magnitude at or above which an earthquake is critical.
    #[validate(range(min = 0.0, max = 10.0))]
    #[serde(default = "default_quake_strong")]
    pub quake_strong: f64,

    /// Magnitude at or above which an earthquake is high severity.
    #[validate(range(min = 0.0, max = 10.0))]
    #[serde(default = "default_quake_moderate")]
    pub quake_moderate: f64,
}

fn default_fire_temp() -> f64 {
    45.0
}
fn default_heat_temp() -> f64 {
    38.0
}
fn default_flood_level() -> f64 {
    8.0
}
fn default_flood_critical_margin() -> f64 {
    3.0
}
fn default_quake_strong() -> f64 {
    6.0
}
fn default_quake_moderate() -> f64 {
    4.5
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            fire_temp: default_fire_temp(),
            heat_temp: default_heat_temp(),
            flood_level: default_flood_level(),
            flood_critical_margin: default_flood_critical_margin(),
            quake_strong: default_quake_strong(),
            quake_moderate: default_quake_moderate(),
        }
    }
}

/// Sliding-window spike detection parameters.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct SpikeConfig {
    /// Window duration in milliseconds.
    #[validate(range(min = 1000, max = 3_600_000))]
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// Matching entries within the window required to trigger an alert.
    #[validate(range(min = 2, max = 10_000))]
    #[serde(default = "default_min_count")]
    pub min_count: usize,
}

fn default_window_ms() -> u64 {
    10_000
}
fn default_min_count() -> usize {
    5
}

impl Default for SpikeConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            min_count: default_min_count(),
        }
    }
}

/// Base point and jitter bound for synthesized coordinates.
///
/// When an alert's triggering event carries no location, the engine invents a
/// point near this base so downstream consumers always get a mappable alert.
/// Explicit here because fabricated geodata is a deliberate trade-off.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct FallbackConfig {
    #[validate(range(min = -90.0, max = 90.0))]
    #[serde(default = "default_base_lat")]
    pub base_lat: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    #[serde(default = "default_base_lng")]
    pub base_lng: f64,

    /// Maximum offset, in degrees, applied per axis.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_jitter_deg")]
    pub jitter_deg: f64,
}

fn default_base_lat() -> f64 {
    28.7041
}
fn default_base_lng() -> f64 {
    77.1025
}
fn default_jitter_deg() -> f64 {
    0.1
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            base_lat: default_base_lat(),
            base_lng: default_base_lng(),
            jitter_deg: default_jitter_deg(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn valid_default_detection_config() {
        let config = DetectionConfig::default();
        config.validate().expect("Default config should be valid");
    }

    #[test]
    fn default_thresholds_match_rule_constants() {
        let thresholds = ThresholdConfig::default();
        assert_eq!(thresholds.fire_temp, 45.0);
        assert_eq!(thresholds.heat_temp, 38.0);
        assert_eq!(thresholds.flood_level, 8.0);
        assert_eq!(thresholds.flood_critical_margin, 3.0);
        assert_eq!(thresholds.quake_strong, 6.0);
        assert_eq!(thresholds.quake_moderate, 4.5);
    }

    #[test]
    fn invalid_spike_window_rejected() {
        let mut config = DetectionConfig::default();
        config.spike.window_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_min_severity_rejected() {
        let mut config = DetectionConfig::default();
        config.min_severity = "urgent".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_base_point_rejected() {
        let mut config = DetectionConfig::default();
        config.fallback.base_lat = 123.0;
        assert!(config.validate().is_err());
    }
}
