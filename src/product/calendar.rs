use crate::errors::PricingResult;
use crate::models::require_positive;

pub const DEFAULT_TRADING_DAYS_PER_YEAR: f64 = 250.0;

/// Day-count convention mapping a path position to remaining maturity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradingCalendar {
    days_per_year: f64,
}

impl TradingCalendar {
    pub fn new(days_per_year: f64) -> PricingResult<Self> {
        require_positive("trading_days_per_year", days_per_year)?;
        Ok(Self { days_per_year })
    }

    #[inline]
    pub fn days_per_year(&self) -> f64 {
        self.days_per_year
    }

    /// t = T - day / days_per_year. May be zero or negative past maturity;
    /// callers decide what that means.
    #[inline]
    pub fn remaining_maturity(&self, maturity: f64, day: usize) -> f64 {
        maturity - day as f64 / self.days_per_year
    }
}

impl Default for TradingCalendar {
    fn default() -> Self {
        Self {
            days_per_year: DEFAULT_TRADING_DAYS_PER_YEAR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_250_days() {
        let cal = TradingCalendar::default();
        assert_eq!(cal.days_per_year(), 250.0);
        assert_eq!(cal.remaining_maturity(0.75, 0), 0.75);
        assert!((cal.remaining_maturity(0.75, 25) - 0.65).abs() < 1e-12);
    }

    #[test]
    fn test_exact_maturity_day_is_zero() {
        let cal = TradingCalendar::default();
        assert_eq!(cal.remaining_maturity(1.0, 250), 0.0);
        assert!(cal.remaining_maturity(0.75, 188) < 0.0);
        assert!(cal.remaining_maturity(0.75, 187) > 0.0);
    }

    #[test]
    fn test_custom_calendar() {
        let cal = TradingCalendar::new(252.0).unwrap();
        assert!((cal.remaining_maturity(1.0, 126) - 0.5).abs() < 1e-12);
        assert!(TradingCalendar::new(0.0).is_err());
        assert!(TradingCalendar::new(f64::NAN).is_err());
    }
}
