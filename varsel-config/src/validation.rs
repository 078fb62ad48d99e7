//! Custom validation functions for configuration.

use validator::ValidationError;

/// Validate an alert severity level name.
pub fn validate_severity(level: &str) -> Result<(), ValidationError> {
    let re = regex::Regex::new("^(medium|high|critical)$")
        .map_err(|_| ValidationError::new("invalid_regex"))?;
    if re.is_match(&level.to_lowercase()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_severity"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_severities() {
        for level in ["medium", "high", "critical", "Critical"] {
            assert!(validate_severity(level).is_ok(), "{level} should be valid");
        }
    }

    #[test]
    fn rejects_unknown_severity() {
        assert!(validate_severity("low").is_err());
        assert!(validate_severity("urgent").is_err());
    }
}
