use crate::errors::{PricingError, PricingResult};
use crate::models::{require_finite, require_positive};

/// Fair value of a single-coupon note, discounted at the risk-free rate plus a
/// flat credit spread standing in for issuer default risk:
///
///   B = (1 + c) * N * e^(-(r + cds) * t)
///
/// `t` may be zero (redemption date) but not negative.
pub fn fair_value_bond(
    nominal: f64,
    coupon_rate: f64,
    r: f64,
    credit_spread: f64,
    t: f64,
) -> PricingResult<f64> {
    require_positive("nominal", nominal)?;
    require_finite("c", coupon_rate)?;
    require_finite("interest", r)?;
    require_finite("cds", credit_spread)?;
    if !(t.is_finite() && t >= 0.0) {
        return Err(PricingError::invalid(
            "remaining_maturity",
            format!("must be non-negative, got {t}"),
        ));
    }

    Ok((1.0 + coupon_rate) * nominal * (-(r + credit_spread) * t).exp())
}
