//! Centralized validation of user-supplied settings.

use crate::parsing::blast::HitThresholds;

/// Validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid {name} threshold: {value} (must be a finite, non-negative number)")]
    InvalidThreshold { name: &'static str, value: f64 },
    #[error("Invalid run name '{0}': must be non-empty and must not contain path separators")]
    InvalidRunName(String),
}

/// Check that every threshold is a finite, non-negative number.
///
/// Percentages above 100 are allowed: they simply reject every hit.
///
/// # Examples
///
/// ```
/// use core_genome::parsing::blast::HitThresholds;
/// use core_genome::utils::validation::validate_thresholds;
///
/// assert!(validate_thresholds(&HitThresholds::default()).is_ok());
///
/// let negative = HitThresholds { identity: -1.0, ..HitThresholds::default() };
/// assert!(validate_thresholds(&negative).is_err());
/// ```
///
/// # Errors
///
/// Returns `ValidationError::InvalidThreshold` naming the first offending threshold.
pub fn validate_thresholds(thresholds: &HitThresholds) -> Result<(), ValidationError> {
    let checks = [
        ("identity", thresholds.identity),
        ("alignment", thresholds.alignment),
        ("e-value", thresholds.evalue),
        ("length variation", thresholds.length_variation),
    ];

    for (name, value) in checks {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::InvalidThreshold { name, value });
        }
    }

    Ok(())
}

/// Check that a run name can be embedded in an artifact file name.
///
/// # Errors
///
/// Returns `ValidationError::InvalidRunName` for empty names, names containing
/// `/` or `\`, and the special names `.` and `..`.
pub fn validate_run_name(run: &str) -> Result<(), ValidationError> {
    let trimmed = run.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || run.contains('/')
        || run.contains('\\')
        || run.contains('\0')
    {
        return Err(ValidationError::InvalidRunName(run.to_string()));
    }
    Ok(())
}
