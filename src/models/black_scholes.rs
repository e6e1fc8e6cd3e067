use crate::errors::PricingResult;
use crate::models::{normal, require_finite, require_positive, round2};

/// Inputs shared by every vanilla quote in a request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingParameters {
    pub strike: f64,
    /// Years
    pub maturity: f64,
    /// Annualized
    pub volatility: f64,
    pub risk_free_rate: f64,
    pub dividend_yield: f64,
}

impl PricingParameters {
    pub fn validate(&self) -> PricingResult<()> {
        require_positive("strike", self.strike)?;
        require_positive("maturity", self.maturity)?;
        require_positive("volatility", self.volatility)?;
        require_finite("interest", self.risk_free_rate)?;
        require_finite("dividend", self.dividend_yield)?;
        Ok(())
    }
}

/// Full-precision Black-Scholes result. Round with [`VanillaQuote::rounded`]
/// only when presenting.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct VanillaQuote {
    pub put: f64,
    pub call: f64,
    pub d1: f64,
    pub d2: f64,
}

impl VanillaQuote {
    pub fn rounded(&self) -> Self {
        Self {
            put: round2(self.put),
            call: round2(self.call),
            d1: round2(self.d1),
            d2: round2(self.d2),
        }
    }
}

/// One point of an underlying sweep, as charted against the spot axis.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SweepPoint {
    pub underlying: f64,
    pub call: f64,
    pub put: f64,
    pub d1: f64,
    pub d2: f64,
}

/// Black-Scholes-Merton closed form with continuous dividend yield.
///
/// d1 = (ln(S/K) + (r - q + sigma^2/2)*T) / (sigma * sqrt(T))
/// d2 = d1 - sigma * sqrt(T)
///
/// call = S*e^(-qT)*Phi(d1) - K*e^(-rT)*Phi(d2)
/// put  = K*e^(-rT)*Phi(-d2) - S*e^(-qT)*Phi(-d1)
pub fn price_vanilla(spot: f64, params: &PricingParameters) -> PricingResult<VanillaQuote> {
    require_positive("underlying", spot)?;
    params.validate()?;

    let PricingParameters {
        strike: k,
        maturity: t,
        volatility: sigma,
        risk_free_rate: r,
        dividend_yield: q,
    } = *params;

    let sigma_sqrt_t = sigma * t.sqrt();
    let d1 = ((spot / k).ln() + (r - q + 0.5 * sigma * sigma) * t) / sigma_sqrt_t;
    let d2 = d1 - sigma_sqrt_t;

    let spot_fwd = spot * (-q * t).exp();
    let strike_pv = k * (-r * t).exp();

    let call = spot_fwd * normal::cdf(d1) - strike_pv * normal::cdf(d2);
    let put = strike_pv * normal::cdf(-d2) - spot_fwd * normal::cdf(-d1);

    Ok(VanillaQuote { put, call, d1, d2 })
}

/// Price every spot in `spots` against the same parameters. The caller picks
/// the sweep range. Output is rounded for presentation; the first invalid spot
/// fails the whole sweep.
pub fn sweep_underlying<I>(spots: I, params: &PricingParameters) -> PricingResult<Vec<SweepPoint>>
where
    I: IntoIterator<Item = f64>,
{
    spots
        .into_iter()
        .map(|s| {
            let q = price_vanilla(s, params)?.rounded();
            Ok(SweepPoint {
                underlying: s,
                call: q.call,
                put: q.put,
                d1: q.d1,
                d2: q.d2,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PricingError;
    use proptest::prelude::*;

    fn params(strike: f64, maturity: f64, r: f64, q: f64, sigma: f64) -> PricingParameters {
        PricingParameters {
            strike,
            maturity,
            volatility: sigma,
            risk_free_rate: r,
            dividend_yield: q,
        }
    }

    #[test]
    fn test_reference_values() {
        // Haug-style reference: S=100, K=100, T=1, r=5%, q=2%, sigma=20%
        let quote = price_vanilla(100.0, &params(100.0, 1.0, 0.05, 0.02, 0.2)).unwrap();
        assert!((quote.call - 9.227005508154036).abs() < 1e-9, "call={}", quote.call);
        assert!((quote.put - 6.330080627549918).abs() < 1e-9, "put={}", quote.put);
        assert!((quote.d1 - 0.25).abs() < 1e-12);
        assert!((quote.d2 - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_rounded_presentation() {
        let quote = price_vanilla(20.0, &params(20.0, 0.75, 0.01, 0.0, 0.15)).unwrap().rounded();
        assert_eq!(quote.call, 1.11);
        assert_eq!(quote.put, 0.96);
        assert_eq!(quote.d1, 0.12);
        assert_eq!(quote.d2, -0.01);
    }

    #[test]
    fn test_atm_zero_carry_symmetry() {
        let sigma = 0.3;
        let t = 2.0;
        let quote = price_vanilla(50.0, &params(50.0, t, 0.0, 0.0, sigma)).unwrap();
        let half = sigma * t.sqrt() / 2.0;
        assert!((quote.d1 - half).abs() < 1e-12, "d1={}", quote.d1);
        assert!((quote.d2 + half).abs() < 1e-12, "d2={}", quote.d2);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let good = params(100.0, 1.0, 0.05, 0.0, 0.2);
        let cases = [
            (100.0, PricingParameters { volatility: 0.0, ..good }, "volatility"),
            (100.0, PricingParameters { maturity: -1.0, ..good }, "maturity"),
            (100.0, PricingParameters { strike: 0.0, ..good }, "strike"),
            (0.0, good, "underlying"),
        ];
        for (spot, p, field) in cases {
            match price_vanilla(spot, &p) {
                Err(PricingError::InvalidParameter { field: f, .. }) => assert_eq!(f, field),
                other => panic!("expected InvalidParameter({field}), got {other:?}"),
            }
        }
    }

    #[test]
    fn test_sweep_preserves_order() {
        let p = params(10.0, 1.0, 0.01, 0.0, 0.25);
        let points = sweep_underlying((1..20).map(f64::from), &p).unwrap();
        assert_eq!(points.len(), 19);
        assert_eq!(points[0].underlying, 1.0);
        assert_eq!(points[18].underlying, 19.0);
        assert!(points.windows(2).all(|w| w[0].call <= w[1].call));
    }

    proptest! {
        #[test]
        fn prop_put_call_parity(
            s in 1.0f64..500.0,
            k in 1.0f64..500.0,
            t in 0.05f64..5.0,
            r in 0.0f64..0.1,
            q in 0.0f64..0.1,
            sigma in 0.05f64..1.0,
        ) {
            let quote = price_vanilla(s, &params(k, t, r, q, sigma)).unwrap();
            let forward_gap = s * (-q * t).exp() - k * (-r * t).exp();
            prop_assert!((quote.call - quote.put - forward_gap).abs() < 1e-6);
        }

        #[test]
        fn prop_call_non_decreasing_in_vol_and_spot(
            s in 1.0f64..300.0,
            k in 1.0f64..300.0,
            t in 0.05f64..3.0,
            sigma in 0.05f64..0.9,
            bump in 0.001f64..0.1,
        ) {
            let p = params(k, t, 0.02, 0.01, sigma);
            let base = price_vanilla(s, &p).unwrap().call;
            let higher_vol = price_vanilla(s, &PricingParameters { volatility: sigma + bump, ..p }).unwrap().call;
            let higher_spot = price_vanilla(s * (1.0 + bump), &p).unwrap().call;
            prop_assert!(higher_vol >= base - 1e-9);
            prop_assert!(higher_spot >= base - 1e-9);
        }

        #[test]
        fn prop_put_non_decreasing_in_strike(
            s in 1.0f64..300.0,
            k in 1.0f64..300.0,
            t in 0.05f64..3.0,
            sigma in 0.05f64..0.9,
            bump in 0.001f64..0.1,
        ) {
            let base = price_vanilla(s, &params(k, t, 0.02, 0.01, sigma)).unwrap().put;
            let higher_strike = price_vanilla(s, &params(k * (1.0 + bump), t, 0.02, 0.01, sigma)).unwrap().put;
            prop_assert!(higher_strike >= base - 1e-9);
        }
    }
}
