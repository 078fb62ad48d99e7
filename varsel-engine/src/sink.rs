//! Alert delivery seam.
//!
//! The engine returns in-memory alerts and knows nothing of storage or
//! transport; consumers plug in here. Sinks must tolerate being called from
//! the single processing task, one alert at a time.

use async_trait::async_trait;

use varsel_core::alert::Alert;
use varsel_telemetry::EventLogger;

use crate::error::EngineError;

/// Consumer of emitted alerts.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn deliver(&self, alert: &Alert) -> Result<(), EngineError>;
}

/// Delivers alerts to the structured log.
pub struct LogSink;

#[async_trait]
impl AlertSink for LogSink {
    async fn deliver(&self, alert: &Alert) -> Result<(), EngineError> {
        EventLogger::log_alert(alert).await;
        Ok(())
    }
}
