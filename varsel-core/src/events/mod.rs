//! ## varsel-core::events
//! **Typed disaster event model with a JSON wire format**
//!
//! Events arrive from heterogeneous producers (sensor gateways, social feed
//! scrapers, user/webhook reports) as one JSON object per event:
//!
//! ```json
//! {"type": "sensor", "payload": {"temperature": 41.5, "coords": {"lat": 28.7, "lng": 77.1}}, "ts": 1700000000000}
//! ```
//!
//! Every payload field is optional on the wire. A field a rule needs but an
//! event lacks suppresses that rule instead of failing the ingest.

pub mod bus;

use serde::{Deserialize, Serialize};

/// WGS84 point. Producers send decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Kind-specific event payload, discriminated by the wire `type` field.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum EventPayload {
    /// Temperature reading in degrees Celsius.
    Sensor {
        temperature: Option<f64>,
        coords: Option<GeoPoint>,
    },
    /// Water level reading, unitless gauge value.
    Water {
        level: Option<f64>,
        coords: Option<GeoPoint>,
    },
    /// Seismic magnitude reading.
    Earthquake {
        magnitude: Option<f64>,
        coords: Option<GeoPoint>,
    },
    /// Free-text social mention.
    Tweet {
        text: Option<String>,
        coords: Option<GeoPoint>,
    },
    /// Direct user or webhook submission.
    Report {
        kind: Option<String>,
        severity: Option<String>,
        message: Option<String>,
        coords: Option<GeoPoint>,
    },
}

impl EventPayload {
    /// Name of the wire discriminant, for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            EventPayload::Sensor { .. } => "sensor",
            EventPayload::Water { .. } => "water",
            EventPayload::Earthquake { .. } => "earthquake",
            EventPayload::Tweet { .. } => "tweet",
            EventPayload::Report { .. } => "report",
        }
    }
}

/// One ingested observation.
///
/// `ts` is epoch milliseconds as reported by the producer; when absent the
/// engine stamps the event with its own arrival time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DisasterEvent {
    #[serde(flatten)]
    pub payload: EventPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<u64>,
}

impl DisasterEvent {
    pub fn new(payload: EventPayload) -> Self {
        Self { payload, ts: None }
    }

    pub fn with_ts(payload: EventPayload, ts: u64) -> Self {
        Self {
            payload,
            ts: Some(ts),
        }
    }
}
