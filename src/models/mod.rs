pub mod normal;
pub mod black_scholes;
pub mod barrier;
pub mod bond;

use crate::errors::{PricingError, PricingResult};

/// Round to 2 decimal places for presentation. Pricing never feeds a
/// rounded value back into another formula.
#[inline]
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Reject zero, negative and non-finite values with a field-tagged error.
#[inline]
pub fn require_positive(field: &'static str, value: f64) -> PricingResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PricingError::invalid(field, format!("must be positive, got {value}")))
    }
}

/// Rates, yields and spreads may be zero or negative but must be finite.
#[inline]
pub fn require_finite(field: &'static str, value: f64) -> PricingResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PricingError::invalid(field, format!("must be finite, got {value}")))
    }
}
