//! Coordinate fallback for events without location data.
//!
//! Downstream consumers require every alert to be mappable, so the engine
//! never emits an alert without coordinates. When the triggering event (and,
//! for spikes, the window) carries none, a locator invents a point. The
//! default jitters around a configured base; tests inject a fixed point.

use rand::Rng;
use tracing::debug;

use varsel_config::FallbackConfig;
use varsel_core::events::GeoPoint;

/// Source of synthesized coordinates.
pub trait FallbackLocator: Send + Sync {
    fn locate(&self) -> GeoPoint;
}

/// Uniform random offset of up to `jitter_deg` degrees per axis around a
/// fixed base point.
pub struct JitterLocator {
    base: GeoPoint,
    jitter_deg: f64,
}

impl JitterLocator {
    pub fn new(base: GeoPoint, jitter_deg: f64) -> Self {
        Self { base, jitter_deg }
    }

    pub fn from_config(config: &FallbackConfig) -> Self {
        Self::new(
            GeoPoint::new(config.base_lat, config.base_lng),
            config.jitter_deg,
        )
    }
}

impl FallbackLocator for JitterLocator {
    fn locate(&self) -> GeoPoint {
        let mut rng = rand::rng();
        let point = GeoPoint::new(
            self.base.lat + rng.random_range(-self.jitter_deg..=self.jitter_deg),
            self.base.lng + rng.random_range(-self.jitter_deg..=self.jitter_deg),
        );
        // Fabricated geodata: make it visible in the logs.
        debug!(lat = point.lat, lng = point.lng, "synthesized fallback coordinates");
        point
    }
}

/// Deterministic locator for tests.
pub struct FixedLocator(pub GeoPoint);

impl FallbackLocator for FixedLocator {
    fn locate(&self) -> GeoPoint {
        self.0
    }
}
