//! ## varsel-core::alert
//! **Normalized alert record emitted by the detection engine**
//!
//! Every rule path funnels through [`Alert::new`] so the output shape is the
//! same regardless of which rule fired: a category, an ordered severity, a
//! human reason, a display label from a fixed table, coordinates, and an
//! epoch-millisecond timestamp. Coordinates are always present; the engine
//! synthesizes a fallback point before constructing the alert.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::GeoPoint;

/// Ordered hazard intensity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(UnknownSeverity(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, thiserror::Error)]
#[error("unknown severity level: {0}")]
pub struct UnknownSeverity(pub String);

/// Alert category. Known hazard classes get fixed display labels; report
/// submissions carry their kind through verbatim as `Other`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AlertCategory {
    Fire,
    Flood,
    Earthquake,
    Temperature,
    Report,
    Other(String),
}

impl AlertCategory {
    pub fn as_str(&self) -> &str {
        match self {
            AlertCategory::Fire => "fire",
            AlertCategory::Flood => "flood",
            AlertCategory::Earthquake => "earthquake",
            AlertCategory::Temperature => "temperature",
            AlertCategory::Report => "report",
            AlertCategory::Other(name) => name,
        }
    }

    /// Display label from the fixed category table. Unknown categories fall
    /// back to the capitalized category name.
    pub fn label(&self) -> String {
        match self {
            AlertCategory::Fire => "Fire".to_string(),
            AlertCategory::Flood => "Flood".to_string(),
            AlertCategory::Earthquake => "Earthquake".to_string(),
            AlertCategory::Temperature => "High Temp".to_string(),
            AlertCategory::Report => "Report".to_string(),
            AlertCategory::Other(name) => capitalize(name),
        }
    }
}

impl From<String> for AlertCategory {
    fn from(s: String) -> Self {
        match s.as_str() {
            "fire" => AlertCategory::Fire,
            "flood" => AlertCategory::Flood,
            "earthquake" => AlertCategory::Earthquake,
            "temperature" => AlertCategory::Temperature,
            "report" => AlertCategory::Report,
            _ => AlertCategory::Other(s),
        }
    }
}

impl From<&str> for AlertCategory {
    fn from(s: &str) -> Self {
        AlertCategory::from(s.to_string())
    }
}

impl From<AlertCategory> for String {
    fn from(category: AlertCategory) -> Self {
        category.as_str().to_string()
    }
}

impl fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The engine's output signaling a detected hazard condition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub category: AlertCategory,
    pub severity: Severity,
    pub reason: String,
    pub label: String,
    pub coords: GeoPoint,
    /// Epoch milliseconds of the triggering event.
    pub ts: u64,
}

impl Alert {
    pub fn new(
        category: AlertCategory,
        severity: Severity,
        reason: impl Into<String>,
        coords: GeoPoint,
        ts: u64,
    ) -> Self {
        let label = category.label();
        Self {
            category,
            severity,
            reason: reason.into(),
            label,
            coords,
            ts,
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let when = DateTime::<Utc>::from_timestamp_millis(self.ts as i64)
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| self.ts.to_string());
        write!(
            f,
            "[{}] {} ({}): {} @ {:.4},{:.4}",
            when, self.label, self.severity, self.reason, self.coords.lat, self.coords.lng
        )
    }
}
