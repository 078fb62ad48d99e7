use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectionError {
    /// A numeric reading was NaN or infinite. Surfaced to the caller instead
    /// of being fed into threshold comparisons, which would silently resolve
    /// to "no alert".
    #[error("Non-finite {field} reading: {value}")]
    NonFiniteReading { field: &'static str, value: f64 },

    #[error("Keyword pattern compilation failed: {0}")]
    PatternError(String),
}
