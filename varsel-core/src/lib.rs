//! # varsel-core
//!
//! Foundation layer for the Varsel disaster monitor: the event and alert
//! models shared by every component, the multi-producer event bus that
//! serializes ingestion, and the clock abstraction used for window aging.

pub mod alert;
pub mod events;
pub mod time;

pub mod prelude {
    pub use crate::alert::{Alert, AlertCategory, Severity};
    pub use crate::events::bus::{EventBus, EventError};
    pub use crate::events::{DisasterEvent, EventPayload, GeoPoint};
    pub use crate::time::{Clock, SystemClock, VirtualClock};
}
