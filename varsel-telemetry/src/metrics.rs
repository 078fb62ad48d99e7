//! ## varsel-telemetry::metrics
//! **Prometheus registry for the ingestion pipeline**

use prometheus::{CounterVec, Histogram, HistogramOpts, IntCounter, Opts, Registry};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub ingested_events: IntCounter,
    pub emitted_alerts: CounterVec,
    pub detection_latency: Histogram,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        let registry = Registry::new();

        let ingested_events =
            IntCounter::new("varsel_events_total", "Total ingested disaster events").unwrap();

        let emitted_alerts = CounterVec::new(
            Opts::new("varsel_alerts_total", "Alerts emitted by the engine"),
            &["category", "severity"],
        )
        .unwrap();

        let detection_latency = Histogram::with_opts(
            HistogramOpts::new(
                "varsel_detection_latency_ns",
                "Detection engine processing time",
            )
            .buckets(vec![1_000.0, 10_000.0, 100_000.0, 1_000_000.0]),
        )
        .unwrap();

        registry.register(Box::new(ingested_events.clone())).unwrap();
        registry.register(Box::new(emitted_alerts.clone())).unwrap();
        registry
            .register(Box::new(detection_latency.clone()))
            .unwrap();

        Self {
            registry,
            ingested_events,
            emitted_alerts,
            detection_latency,
        }
    }

    pub fn inc_ingested_events(&self) {
        self.ingested_events.inc();
    }

    pub fn inc_emitted_alerts(&self, category: &str, severity: &str) {
        self.emitted_alerts
            .with_label_values(&[category, severity])
            .inc();
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let metrics = MetricsRecorder::new();
        metrics.inc_ingested_events();
        metrics.inc_ingested_events();
        metrics.inc_emitted_alerts("fire", "critical");
        assert_eq!(metrics.ingested_events.get(), 2);

        let text = metrics.gather_metrics().unwrap();
        assert!(text.contains("varsel_events_total 2"));
        assert!(text.contains("varsel_alerts_total"));
    }
}
