//! ## varsel-detection::engine
//! **Stateful event classifier: one event in, at most one alert out**
//!
//! The engine owns all mutable detection state (the spike window) as an
//! explicit instance, constructed once per process or per test. `ingest_event`
//! is synchronous and performs no I/O; callers that feed it from multiple
//! producers must serialize access, which `varsel-engine` does with a single
//! draining task.

use tracing::debug;

use varsel_config::DetectionConfig;
use varsel_core::alert::{Alert, AlertCategory, Severity};
use varsel_core::events::{DisasterEvent, EventPayload, GeoPoint};
use varsel_core::time::{Clock, SystemClock};

use crate::error::DetectionError;
use crate::locator::{FallbackLocator, JitterLocator};
use crate::rules::{self, RuleOutcome};
use crate::spike::SpikeDetector;

/// Stateful detection engine. See crate docs for the rule set.
pub struct DetectionEngine {
    thresholds: varsel_config::ThresholdConfig,
    spike: SpikeDetector,
    locator: Box<dyn FallbackLocator>,
    clock: Box<dyn Clock>,
}

impl DetectionEngine {
    /// Engine with the default jitter locator and the wall clock.
    pub fn new(config: &DetectionConfig) -> Result<Self, DetectionError> {
        Self::with_parts(
            config,
            Box::new(JitterLocator::from_config(&config.fallback)),
            Box::new(SystemClock),
        )
    }

    /// Engine with an injected locator and clock, for deterministic tests.
    pub fn with_parts(
        config: &DetectionConfig,
        locator: Box<dyn FallbackLocator>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, DetectionError> {
        Ok(Self {
            thresholds: config.thresholds.clone(),
            spike: SpikeDetector::new(&config.spike)?,
            locator,
            clock,
        })
    }

    /// Classifies one event. Returns at most one alert; `Ok(None)` when no
    /// rule fires. Incomplete payloads suppress their rule rather than error;
    /// non-finite readings are an error.
    ///
    /// Only tweet events touch the sliding window.
    pub fn ingest_event(
        &mut self,
        event: &DisasterEvent,
    ) -> Result<Option<Alert>, DetectionError> {
        let ts = event.ts.unwrap_or_else(|| self.clock.now_ms());

        let alert = match &event.payload {
            EventPayload::Sensor {
                temperature: Some(t),
                coords,
            } => rules::evaluate_temperature(*t, &self.thresholds)?
                .map(|outcome| self.build_alert(outcome, *coords, ts)),

            EventPayload::Water {
                level: Some(level),
                coords,
            } => rules::evaluate_water_level(*level, &self.thresholds)?
                .map(|outcome| self.build_alert(outcome, *coords, ts)),

            EventPayload::Earthquake {
                magnitude: Some(m),
                coords,
            } => rules::evaluate_magnitude(*m, &self.thresholds)?
                .map(|outcome| self.build_alert(outcome, *coords, ts)),

            EventPayload::Tweet {
                text: Some(text),
                coords,
            } => {
                let now = self.clock.now_ms();
                self.spike.observe(ts, now, text, *coords).map(|hit| {
                    // Coordinate source chain: last primary-matching window
                    // entry, then the triggering event, then the locator.
                    let coords = hit.coords.or(*coords);
                    self.build_alert(
                        RuleOutcome {
                            category: hit.category,
                            severity: Severity::Medium,
                            reason: hit.reason,
                        },
                        coords,
                        ts,
                    )
                })
            }

            EventPayload::Report {
                kind,
                severity,
                message,
                coords,
            } => {
                let outcome = rules::evaluate_report(
                    kind.as_deref(),
                    severity.as_deref(),
                    message.as_deref(),
                );
                Some(self.build_alert(outcome, *coords, ts))
            }

            // A payload missing the field its rule reads fires nothing.
            EventPayload::Sensor { temperature: None, .. }
            | EventPayload::Water { level: None, .. }
            | EventPayload::Earthquake { magnitude: None, .. }
            | EventPayload::Tweet { text: None, .. } => None,
        };

        if let Some(alert) = &alert {
            debug!(
                category = %alert.category,
                severity = %alert.severity,
                "alert emitted"
            );
        }
        Ok(alert)
    }

    fn build_alert(&self, outcome: RuleOutcome, coords: Option<GeoPoint>, ts: u64) -> Alert {
        let coords = coords.unwrap_or_else(|| self.locator.locate());
        Alert::new(outcome.category, outcome.severity, outcome.reason, coords, ts)
    }

    /// Current spike window size. Exposed for tests and metrics.
    pub fn window_len(&self) -> usize {
        self.spike.window_len()
    }
}
