//! ## varsel-telemetry::logging
//! **Structured logging with tracing**
//!
//! One `init` at process start; alert emission goes through `log_alert` so
//! every alert line carries the same structured metadata shape regardless of
//! which sink ultimately delivers it.

use opentelemetry::KeyValue;
use tracing::{info_span, Instrument};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

use varsel_core::alert::Alert;

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Initializes the global subscriber. `RUST_LOG` wins over the
    /// configured default filter. Logs go to stderr; stdout belongs to
    /// alert output.
    pub fn init(default_filter: &str) {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(default_filter.to_string())),
            )
            .with_writer(std::io::stderr)
            .with_thread_names(true)
            .with_span_events(FmtSpan::ENTER)
            .init()
    }

    pub async fn log_event(event_type: &str, metadata: Vec<KeyValue>) {
        let span = info_span!(
            "detection_event",
            event_type = event_type,
            otel.kind = "INTERNAL"
        );

        async {
            tracing::info!(
                metadata = ?metadata,
                "Detection event occurred"
            );
        }
        .instrument(span)
        .await
    }

    /// Logs an emitted alert with its normalized fields.
    pub async fn log_alert(alert: &Alert) {
        Self::log_event(
            "alert",
            vec![
                KeyValue::new("category", alert.category.to_string()),
                KeyValue::new("severity", alert.severity.to_string()),
                KeyValue::new("reason", alert.reason.clone()),
                KeyValue::new("lat", alert.coords.lat),
                KeyValue::new("lng", alert.coords.lng),
            ],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    use varsel_core::alert::{AlertCategory, Severity};
    use varsel_core::events::GeoPoint;

    #[traced_test]
    #[test]
    fn test_logging() {
        tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(EventLogger::log_event(
                "test",
                vec![KeyValue::new("key", "value")],
            ));
        assert!(logs_contain("Detection event occurred"));
    }

    #[traced_test]
    #[test]
    fn alert_logging_includes_category() {
        let alert = Alert::new(
            AlertCategory::Flood,
            Severity::High,
            "Water level 9 - flood risk",
            GeoPoint::new(28.7, 77.1),
            0,
        );
        tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(EventLogger::log_alert(&alert));
        assert!(logs_contain("flood"));
    }
}
