//! Typed failures returned by the quotation engine
//!
//! Two families, matching how callers must react:
//! - configuration errors: reference data is missing or inconsistent; fatal
//!   for the run, never retried (the computation is deterministic)
//! - input validation errors: the request itself is unusable and is rejected
//!   before any computation starts

use thiserror::Error;

/// Errors raised while pricing a quotation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// No monthly index row exists for the requested period
    #[error("no monthly index for period {month}/{year}")]
    MissingIndex { month: u32, year: i32 },

    /// The base period index has a zero component, escalation cannot divide by it
    #[error("base index {component} for period {month}/{year} is zero")]
    ZeroBaseIndex {
        component: &'static str,
        month: u32,
        year: i32,
    },

    /// No polynomial formula is effective on the given date
    #[error("no polynomial formula active on {date}")]
    NoActiveFormula { date: chrono::NaiveDate },

    /// The freight distance falls outside every configured rate tier
    #[error("distance {distance_km} km is outside all freight rate tiers")]
    DistanceOutsideTiers { distance_km: f64 },

    /// More than one rate tier matches the same distance
    #[error("freight rate tiers overlap at {distance_km} km")]
    AmbiguousRateTier { distance_km: f64 },

    /// A truck class is configured with no usable payload
    #[error("truck class {class} has zero payload capacity")]
    ZeroTruckCapacity { class: &'static str },

    /// The request was rejected before computation
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl EngineError {
    /// Whether this is a reference-data problem (as opposed to a bad request)
    pub fn is_configuration(&self) -> bool {
        !matches!(self, EngineError::InvalidInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_families() {
        let config = EngineError::MissingIndex { month: 4, year: 2023 };
        assert!(config.is_configuration());

        let input = EngineError::InvalidInput("quantity is negative".to_string());
        assert!(!input.is_configuration());
    }

    #[test]
    fn test_error_display() {
        let err = EngineError::DistanceOutsideTiers { distance_km: 900.0 };
        assert_eq!(
            err.to_string(),
            "distance 900 km is outside all freight rate tiers"
        );
    }
}
