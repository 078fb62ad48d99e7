//! ## varsel-detection::rules
//! **History-free threshold rules for sensor and report events**
//!
//! Each rule maps one reading directly to at most one outcome, independent
//! of anything the engine has seen before. Thresholds come from
//! [`ThresholdConfig`]; no hysteresis.

use varsel_config::ThresholdConfig;
use varsel_core::alert::{AlertCategory, Severity};

use crate::error::DetectionError;

/// What a rule decided: which alert to build, minus coordinates/timestamp.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleOutcome {
    pub category: AlertCategory,
    pub severity: Severity,
    pub reason: String,
}

fn ensure_finite(field: &'static str, value: f64) -> Result<(), DetectionError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(DetectionError::NonFiniteReading { field, value })
    }
}

/// Temperature in °C: at `fire_temp` and above a fire alert, between
/// `heat_temp` and `fire_temp` a heat-risk alert, below that nothing.
pub fn evaluate_temperature(
    temperature: f64,
    thresholds: &ThresholdConfig,
) -> Result<Option<RuleOutcome>, DetectionError> {
    ensure_finite("temperature", temperature)?;

    if temperature >= thresholds.fire_temp {
        return Ok(Some(RuleOutcome {
            category: AlertCategory::Fire,
            severity: Severity::Critical,
            reason: format!("Extreme temperature {}°C, possible fire", temperature),
        }));
    }
    if temperature >= thresholds.heat_temp {
        return Ok(Some(RuleOutcome {
            category: AlertCategory::Temperature,
            severity: Severity::High,
            reason: format!("High temperature {}°C", temperature),
        }));
    }
    Ok(None)
}

/// Water gauge level: flood at `flood_level`, critical once the level clears
/// the critical margin on top of it.
pub fn evaluate_water_level(
    level: f64,
    thresholds: &ThresholdConfig,
) -> Result<Option<RuleOutcome>, DetectionError> {
    ensure_finite("level", level)?;

    if level < thresholds.flood_level {
        return Ok(None);
    }
    let severity = if level >= thresholds.flood_level + thresholds.flood_critical_margin {
        Severity::Critical
    } else {
        Severity::High
    };
    Ok(Some(RuleOutcome {
        category: AlertCategory::Flood,
        severity,
        reason: format!("Water level {} - flood risk", level),
    }))
}

/// Seismic magnitude: critical at `quake_strong`, high at `quake_moderate`.
pub fn evaluate_magnitude(
    magnitude: f64,
    thresholds: &ThresholdConfig,
) -> Result<Option<RuleOutcome>, DetectionError> {
    ensure_finite("magnitude", magnitude)?;

    if magnitude >= thresholds.quake_strong {
        return Ok(Some(RuleOutcome {
            category: AlertCategory::Earthquake,
            severity: Severity::Critical,
            reason: format!("Strong earthquake magnitude {:.1}", magnitude),
        }));
    }
    if magnitude >= thresholds.quake_moderate {
        return Ok(Some(RuleOutcome {
            category: AlertCategory::Earthquake,
            severity: Severity::High,
            reason: format!("Earthquake magnitude {:.1}", magnitude),
        }));
    }
    Ok(None)
}

/// Direct user or webhook submission: always alerts, as a trusted signal.
///
/// Severity is critical only when the submitted severity is exactly
/// `"critical"`; anything else, including case variants, maps to high. The
/// category carries the submitted kind verbatim, defaulting to `report`.
pub fn evaluate_report(
    kind: Option<&str>,
    severity: Option<&str>,
    message: Option<&str>,
) -> RuleOutcome {
    let severity = if severity == Some("critical") {
        Severity::Critical
    } else {
        Severity::High
    };
    let category = kind
        .filter(|k| !k.is_empty())
        .map(AlertCategory::from)
        .unwrap_or(AlertCategory::Report);
    let reason = message
        .filter(|m| !m.is_empty())
        .unwrap_or("User report")
        .to_string();
    RuleOutcome {
        category,
        severity,
        reason,
    }
}
