use crate::errors::{PricingError, PricingResult};
use crate::models::{normal, require_finite, require_positive};

/// Down-and-in barrier put via the reflection principle.
///
/// Continuous monitoring, constant barrier H, lognormal spot:
///
///   lambda = (r - q + sigma^2/2) / sigma^2
///   gamma  = ln(H^2/(S*K)) / (sigma*sqrt(t)) + lambda*sigma*sqrt(t)
///   x1     = ln(S/H)       / (sigma*sqrt(t)) + lambda*sigma*sqrt(t)
///   y1     = ln(H/S)       / (sigma*sqrt(t)) + lambda*sigma*sqrt(t)
///
///   p_di = -S*Phi(-x1)*e^(-qt) + K*e^(-rt)*Phi(-x1 + sigma*sqrt(t))
///          + S*e^(-qt)*(H/S)^(2*lambda) * (Phi(gamma) - Phi(y1))
///          - K*e^(-rt)*(H/S)^(2*lambda-2) * (Phi(gamma - sigma*sqrt(t)) - Phi(y1 - sigma*sqrt(t)))
///
/// `t` is the remaining maturity at the valuation date, not the original term.
pub fn price_down_and_in_put(
    spot: f64,
    strike: f64,
    t: f64,
    r: f64,
    q: f64,
    sigma: f64,
    barrier: f64,
) -> PricingResult<f64> {
    require_positive("underlying", spot)?;
    require_positive("strike", strike)?;
    require_positive("volatility", sigma)?;
    require_positive("barrier", barrier)?;
    require_finite("interest", r)?;
    require_finite("dividend", q)?;
    if !(t.is_finite() && t > 0.0) {
        return Err(PricingError::invalid(
            "remaining_maturity",
            format!("must be positive, got {t} (valuation day at or past maturity)"),
        ));
    }
    if spot == barrier {
        return Err(PricingError::invalid(
            "underlying",
            format!("coincides with barrier {barrier}"),
        ));
    }

    let terms = ReflectionTerms::new(spot, strike, t, r, q, sigma, barrier);
    let sst = terms.sigma_sqrt_t;

    let spot_fwd = spot * (-q * t).exp();
    let strike_pv = strike * (-r * t).exp();
    let ratio = barrier / spot;

    let vanilla_leg = -spot_fwd * normal::cdf(-terms.x1) + strike_pv * normal::cdf(-terms.x1 + sst);
    let reflected_spot = spot_fwd
        * ratio.powf(2.0 * terms.lambda)
        * (normal::cdf(terms.gamma) - normal::cdf(terms.y1));
    let reflected_strike = strike_pv
        * ratio.powf(2.0 * terms.lambda - 2.0)
        * (normal::cdf(terms.gamma - sst) - normal::cdf(terms.y1 - sst));

    // (H/S)^(2*lambda) over- or underflows once sigma is small relative to r - q
    let price = vanilla_leg + reflected_spot - reflected_strike;
    if !price.is_finite() {
        return Err(PricingError::invalid(
            "volatility",
            format!("{sigma} too low for barrier {barrier} at spot {spot}, price is {price}"),
        ));
    }
    Ok(price)
}

/// Intermediate quantities of the reflection formula.
#[derive(Debug, Clone, Copy)]
struct ReflectionTerms {
    lambda: f64,
    gamma: f64,
    x1: f64,
    y1: f64,
    sigma_sqrt_t: f64,
}

impl ReflectionTerms {
    #[inline]
    fn new(spot: f64, strike: f64, t: f64, r: f64, q: f64, sigma: f64, barrier: f64) -> Self {
        let sigma_sq = sigma * sigma;
        let sigma_sqrt_t = sigma * t.sqrt();
        let lambda = (r - q + 0.5 * sigma_sq) / sigma_sq;
        let drift = lambda * sigma_sqrt_t;
        Self {
            lambda,
            gamma: (barrier * barrier / (spot * strike)).ln() / sigma_sqrt_t + drift,
            x1: (spot / barrier).ln() / sigma_sqrt_t + drift,
            y1: (barrier / spot).ln() / sigma_sqrt_t + drift,
            sigma_sqrt_t,
        }
    }
}
