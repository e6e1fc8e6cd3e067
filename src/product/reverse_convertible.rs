use crate::errors::{PricingError, PricingResult};
use crate::models::barrier::price_down_and_in_put;
use crate::models::bond::fair_value_bond;
use crate::models::{require_finite, require_positive, round2};
use crate::product::calendar::TradingCalendar;

/// Terms of a barrier reverse convertible plus the market inputs it is valued
/// under. There is no separate strike: the embedded put is struck at the
/// path's initial fixing S0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarrierParameters {
    /// Original term in years
    pub maturity: f64,
    pub volatility: f64,
    pub risk_free_rate: f64,
    pub dividend_yield: f64,
    pub barrier: f64,
    pub nominal: f64,
    pub credit_spread: f64,
    pub coupon_rate: f64,
}

impl BarrierParameters {
    pub fn validate(&self) -> PricingResult<()> {
        require_positive("maturity", self.maturity)?;
        require_positive("volatility", self.volatility)?;
        require_positive("barrier", self.barrier)?;
        require_positive("nominal", self.nominal)?;
        require_finite("interest", self.risk_free_rate)?;
        require_finite("dividend", self.dividend_yield)?;
        require_finite("cds", self.credit_spread)?;
        require_finite("c", self.coupon_rate)?;
        Ok(())
    }
}

/// One day of a scenario curve. Values are rounded for output.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ValuationPoint {
    #[serde(rename = "t")]
    pub day: usize,
    /// S / S0 * 100
    #[serde(rename = "underlying")]
    pub normalized_underlying: f64,
    #[serde(rename = "put")]
    pub barrier_put_value: f64,
    pub coupon: f64,
    #[serde(rename = "bond")]
    pub fair_value_bond: f64,
    /// Note value / nominal * 100
    #[serde(rename = "convertible")]
    pub normalized_convertible_value: f64,
}

/// A note fixed against its initial observation, ready to be valued on any day.
#[derive(Debug, Clone, Copy)]
pub struct ReverseConvertible {
    params: BarrierParameters,
    initial_fixing: f64,
    calendar: TradingCalendar,
}

impl ReverseConvertible {
    pub fn new(
        params: BarrierParameters,
        initial_fixing: f64,
        calendar: TradingCalendar,
    ) -> PricingResult<Self> {
        params.validate()?;
        require_positive("initial_fixing", initial_fixing)?;
        Ok(Self {
            params,
            initial_fixing,
            calendar,
        })
    }

    /// Value the note on `day` with the underlying at `spot`:
    ///
    ///   t     = T - day / days_per_year
    ///   p_di  = down-and-in put(S, K = S0, t, r, q, sigma, H)
    ///   bond  = (1 + c) * N * e^(-(r + cds) * t)
    ///   note  = bond - p_di * N / S0
    ///
    /// Fails on any upstream domain violation, including t <= 0.
    pub fn value_at(&self, day: usize, spot: f64) -> PricingResult<ValuationPoint> {
        let p = &self.params;
        let s0 = self.initial_fixing;
        let t = self.calendar.remaining_maturity(p.maturity, day);

        let put = price_down_and_in_put(
            spot,
            s0,
            t,
            p.risk_free_rate,
            p.dividend_yield,
            p.volatility,
            p.barrier,
        )?;
        let bond = fair_value_bond(p.nominal, p.coupon_rate, p.risk_free_rate, p.credit_spread, t)?;
        let note = bond - put * (p.nominal / s0);
        for (field, value) in [("barrier_put", put), ("bond", bond), ("note", note)] {
            if !value.is_finite() {
                return Err(PricingError::invalid(
                    field,
                    format!("non-finite value {value} on day {day}"),
                ));
            }
        }

        Ok(ValuationPoint {
            day,
            normalized_underlying: round2(spot / s0 * 100.0),
            barrier_put_value: round2(put),
            coupon: round2(p.coupon_rate),
            fair_value_bond: round2(bond),
            normalized_convertible_value: round2(note / p.nominal * 100.0),
        })
    }

    pub fn initial_fixing(&self) -> f64 {
        self.initial_fixing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PricingError;

    fn reference_params() -> BarrierParameters {
        BarrierParameters {
            maturity: 0.75,
            volatility: 0.15,
            risk_free_rate: 0.01,
            dividend_yield: 0.0,
            barrier: 18.0,
            nominal: 1000.0,
            credit_spread: 0.0045,
            coupon_rate: 0.05,
        }
    }

    #[test]
    fn test_initial_day() {
        let note = ReverseConvertible::new(reference_params(), 20.0, TradingCalendar::default()).unwrap();
        let point = note.value_at(0, 20.0).unwrap();
        assert_eq!(point.day, 0);
        assert_eq!(point.normalized_underlying, 100.0);
        assert_eq!(point.barrier_put_value, 0.86);
        assert_eq!(point.coupon, 0.05);
        assert_eq!(point.fair_value_bond, 1038.64);
        assert_eq!(point.normalized_convertible_value, 99.55);
    }

    #[test]
    fn test_later_days_use_remaining_maturity() {
        let note = ReverseConvertible::new(reference_params(), 20.0, TradingCalendar::default()).unwrap();

        let day1 = note.value_at(1, 19.0).unwrap();
        assert_eq!(day1.normalized_underlying, 95.0);
        assert_eq!(day1.barrier_put_value, 1.42);
        assert_eq!(day1.fair_value_bond, 1038.7);
        assert_eq!(day1.normalized_convertible_value, 96.75);

        let day3 = note.value_at(3, 21.0).unwrap();
        assert_eq!(day3.normalized_underlying, 105.0);
        assert_eq!(day3.barrier_put_value, 0.47);
        assert_eq!(day3.normalized_convertible_value, 101.52);
    }

    #[test]
    fn test_falling_spot_lowers_note() {
        let note = ReverseConvertible::new(reference_params(), 20.0, TradingCalendar::default()).unwrap();
        let high = note.value_at(10, 21.0).unwrap();
        let low = note.value_at(10, 18.5).unwrap();
        assert!(low.normalized_convertible_value < high.normalized_convertible_value);
        assert!(low.barrier_put_value > high.barrier_put_value);
    }

    #[test]
    fn test_past_maturity_fails() {
        let note = ReverseConvertible::new(reference_params(), 20.0, TradingCalendar::default()).unwrap();
        assert!(note.value_at(187, 20.0).is_ok());
        assert!(matches!(
            note.value_at(188, 20.0),
            Err(PricingError::InvalidParameter { field: "remaining_maturity", .. })
        ));
    }

    #[test]
    fn test_invalid_terms_rejected_up_front() {
        let mut p = reference_params();
        p.barrier = 0.0;
        assert!(ReverseConvertible::new(p, 20.0, TradingCalendar::default()).is_err());
        assert!(ReverseConvertible::new(reference_params(), -1.0, TradingCalendar::default()).is_err());
    }
}
