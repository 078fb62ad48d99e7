use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use varsel_config::VarselConfig;
use varsel_core::alert::Alert;
use varsel_core::events::bus::{EventBus, EventError};
use varsel_core::events::DisasterEvent;
use varsel_engine::{AlertSink, EngineError, EngineRuntime, LogSink};
use varsel_telemetry::EventLogger;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Stream NDJSON events through the detection engine
    Run(RunArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Event file to read; stdin when omitted
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Configuration file overriding the default hierarchy
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Writes each delivered alert as one JSON object per line on stdout.
struct JsonSink;

#[async_trait]
impl AlertSink for JsonSink {
    async fn deliver(&self, alert: &Alert) -> Result<(), EngineError> {
        let line =
            serde_json::to_string(alert).map_err(|e| EngineError::Processing(e.to_string()))?;
        println!("{line}");
        Ok(())
    }
}

pub async fn run_stream_mode(
    args: RunArgs,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = match &args.config {
        Some(path) => VarselConfig::load_from_path(path)?,
        None => VarselConfig::load()?,
    };
    EventLogger::init(&config.telemetry.log_filter);

    let mut runtime = EngineRuntime::new(&config)?;
    runtime.add_sink(Arc::new(LogSink));
    runtime.add_sink(Arc::new(JsonSink));
    let runtime = Arc::new(runtime);

    let processor = runtime.spawn_processor();

    let bus = runtime.event_bus.clone();
    let input = args.input.clone();
    let reader = tokio::task::spawn_blocking(move || feed_events(input, &bus));

    let accepted = reader.await??;
    runtime.event_bus.close();
    processor.await??;

    info!(
        accepted,
        ingested = runtime.metrics.ingested_events.get(),
        "stream complete"
    );
    Ok(())
}

/// Reads NDJSON events and pushes them onto the bus. Malformed lines are
/// producer noise: logged and skipped, never fatal.
fn feed_events(input: Option<PathBuf>, bus: &EventBus) -> Result<u64, std::io::Error> {
    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let mut accepted: u64 = 0;
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event = match serde_json::from_str::<DisasterEvent>(&line) {
            Ok(event) => event,
            Err(e) => {
                warn!(line = line_no + 1, error = %e, "skipping malformed event line");
                continue;
            }
        };
        loop {
            match bus.send(event.clone()) {
                Ok(()) => {
                    accepted += 1;
                    break;
                }
                Err(EventError::QueueFull) => {
                    // Backpressure: let the processor catch up.
                    std::thread::yield_now();
                }
                Err(EventError::Closed) => return Ok(accepted),
            }
        }
    }
    Ok(accepted)
}
