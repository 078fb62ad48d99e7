//! # Varsel Detection Engine
//!
//! Stateful classifier turning heterogeneous disaster events into normalized
//! alerts: per-source threshold rules, a sliding-window spike detector over
//! social text, and coordinate fallback for unlocated events.

pub mod engine;
pub mod error;
pub mod locator;
pub mod rules;
pub mod spike;

pub use engine::DetectionEngine;
pub use error::DetectionError;
pub use locator::{FallbackLocator, FixedLocator, JitterLocator};
pub use spike::{KeywordRule, SpikeDetector, SpikeHit};
