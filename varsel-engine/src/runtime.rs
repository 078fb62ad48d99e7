//! Engine runtime - single draining task between producers and sinks.
//!
//! Producers push onto the shared event bus from any task or thread; exactly
//! one processor task drains it and feeds the detection engine. That task is
//! the serialization point for all window state: events reach the engine in
//! bus order, and clear-on-trigger stays atomic with respect to ingestion.

use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use varsel_config::VarselConfig;
use varsel_core::alert::Severity;
use varsel_core::events::bus::EventBus;
use varsel_core::events::DisasterEvent;
use varsel_detection::DetectionEngine;
use varsel_telemetry::MetricsRecorder;

use crate::error::EngineError;
use crate::sink::AlertSink;

/// Coordinates the ingestion pipeline: event bus, detection engine, metrics,
/// and alert fan-out.
pub struct EngineRuntime {
    /// Event bus producers push onto (MPSC: many producers, one drain task).
    pub event_bus: Arc<EventBus>,
    /// Metrics collection subsystem.
    pub metrics: Arc<MetricsRecorder>,
    engine: Mutex<DetectionEngine>,
    sinks: Vec<Arc<dyn AlertSink>>,
    min_severity: Severity,
}

impl EngineRuntime {
    /// Creates a runtime with the default detection engine for `config`.
    pub fn new(config: &VarselConfig) -> Result<Self, EngineError> {
        let engine = DetectionEngine::new(&config.detection)?;
        Self::with_engine(config, engine)
    }

    /// Creates a runtime around an explicit engine instance (tests inject a
    /// pinned clock and locator this way).
    pub fn with_engine(
        config: &VarselConfig,
        engine: DetectionEngine,
    ) -> Result<Self, EngineError> {
        let min_severity = Severity::from_str(&config.detection.min_severity.to_lowercase())
            .map_err(|e| EngineError::Validation(e.to_string()))?;

        info!("Initializing engine runtime");
        debug!("Core config: {:?}", config.core);

        Ok(Self {
            event_bus: Arc::new(EventBus::with_capacity(config.core.event_bus.capacity)),
            metrics: Arc::new(MetricsRecorder::new()),
            engine: Mutex::new(engine),
            sinks: Vec::new(),
            min_severity,
        })
    }

    /// Registers an alert consumer. Call before spawning the processor.
    pub fn add_sink(&mut self, sink: Arc<dyn AlertSink>) {
        self.sinks.push(sink);
    }

    /// Spawns the dedicated processor task that drains the bus until the bus
    /// is closed and empty.
    #[instrument(skip(self))]
    pub fn spawn_processor(self: &Arc<Self>) -> JoinHandle<Result<(), EngineError>> {
        let runtime = self.clone();

        tokio::spawn(async move {
            info!("Event processor started");
            let mut processed_events: u64 = 0;

            loop {
                match runtime.event_bus.recv() {
                    Some(event) => {
                        processed_events += 1;
                        runtime.process_event(event).await;
                    }
                    None if runtime.event_bus.is_closed() => {
                        info!(processed_events, "Event bus closed and drained");
                        return Ok(());
                    }
                    None => {
                        // Queue empty, avoid busy-spin.
                        sleep(Duration::from_millis(10)).await;
                    }
                }
            }
        })
    }

    async fn process_event(&self, event: DisasterEvent) {
        self.metrics.inc_ingested_events();

        let start = Instant::now();
        let result = self.engine.lock().ingest_event(&event);
        self.metrics
            .detection_latency
            .observe(start.elapsed().as_nanos() as f64);

        let alert = match result {
            Ok(Some(alert)) => alert,
            Ok(None) => return,
            Err(e) => {
                // One malformed reading must not stop the feed.
                warn!(kind = event.payload.kind_name(), error = %e, "event rejected");
                return;
            }
        };

        self.metrics
            .inc_emitted_alerts(alert.category.as_str(), alert.severity.as_str());

        if alert.severity < self.min_severity {
            debug!(severity = %alert.severity, "alert below minimum severity, not forwarded");
            return;
        }

        for sink in &self.sinks {
            if let Err(e) = sink.deliver(&alert).await {
                warn!(error = %e, "alert sink delivery failed");
            }
        }
    }
}
