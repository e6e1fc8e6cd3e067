use crate::errors::{PricingError, PricingResult};
use crate::models::black_scholes::{PricingParameters, SweepPoint, VanillaQuote};
use crate::product::calendar::TradingCalendar;
use crate::product::reverse_convertible::BarrierParameters;
use crate::product::scenario::{MaturityPolicy, ScenarioProcessor, ScenarioSet, UnderlyingPath};
use std::collections::BTreeMap;

// ── POST /black_scholes ──

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BlackScholesRequest {
    pub strike: f64,
    pub underlying: f64,
    pub maturity: f64,
    pub volatility: f64,
    pub interest: f64,
    pub dividend: f64,
}

impl BlackScholesRequest {
    pub fn pricing_parameters(&self) -> PricingParameters {
        PricingParameters {
            strike: self.strike,
            maturity: self.maturity,
            volatility: self.volatility,
            risk_free_rate: self.interest,
            dividend_yield: self.dividend,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct BlackScholesResponse {
    pub series: Vec<SweepPoint>,
    pub specific: SpecificQuote,
}

/// Quote at the requested spot, echoing the request fields alongside.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct SpecificQuote {
    pub call: f64,
    pub put: f64,
    pub d1: f64,
    pub d2: f64,
    #[serde(flatten)]
    pub input: BlackScholesRequest,
}

impl SpecificQuote {
    pub fn new(quote: VanillaQuote, input: BlackScholesRequest) -> Self {
        let q = quote.rounded();
        Self {
            call: q.call,
            put: q.put,
            d1: q.d1,
            d2: q.d2,
            input,
        }
    }
}

// ── POST /barrier_reverse_convertible ──

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ReverseConvertibleRequest {
    pub maturity: f64,
    pub volatility: f64,
    pub interest: f64,
    pub dividend: f64,
    pub barrier: f64,
    pub nominal: f64,
    /// Credit spread over the risk-free rate
    pub cds: f64,
    /// Coupon rate
    pub c: f64,
    /// Caller-supplied paths by label. Defaults to the sample paths.
    #[serde(default)]
    pub scenarios: Option<BTreeMap<String, Vec<f64>>>,
    /// Restrict evaluation to these labels.
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default)]
    pub trading_days_per_year: Option<f64>,
    #[serde(default)]
    pub maturity_policy: Option<MaturityPolicy>,
}

impl ReverseConvertibleRequest {
    pub fn barrier_parameters(&self) -> BarrierParameters {
        BarrierParameters {
            maturity: self.maturity,
            volatility: self.volatility,
            risk_free_rate: self.interest,
            dividend_yield: self.dividend,
            barrier: self.barrier,
            nominal: self.nominal,
            credit_spread: self.cds,
            coupon_rate: self.c,
        }
    }

    /// Apply per-request calendar and policy overrides to the service default.
    pub fn processor(&self, default: ScenarioProcessor) -> PricingResult<ScenarioProcessor> {
        let calendar = match self.trading_days_per_year {
            Some(days) => TradingCalendar::new(days)?,
            None => default.calendar,
        };
        Ok(ScenarioProcessor::new(
            calendar,
            self.maturity_policy.unwrap_or(default.policy),
        ))
    }

    /// Paths to evaluate: the caller's if given, otherwise `loaded`,
    /// optionally narrowed to `labels`.
    pub fn scenario_set(&self, loaded: &ScenarioSet) -> PricingResult<ScenarioSet> {
        let source = match &self.scenarios {
            Some(custom) => {
                let mut set = ScenarioSet::new();
                for (label, prices) in custom {
                    let path = UnderlyingPath::new(prices.clone()).map_err(|e| {
                        PricingError::invalid("scenarios", format!("scenario `{label}`: {e}"))
                    })?;
                    set.insert(label.clone(), path);
                }
                set
            }
            None => loaded.clone(),
        };

        let picked = match &self.labels {
            None => source,
            Some(labels) => {
                let mut set = ScenarioSet::new();
                for label in labels {
                    let path = source
                        .get(label)
                        .ok_or_else(|| PricingError::UnknownScenario(label.clone()))?;
                    set.insert(label.clone(), path.clone());
                }
                set
            }
        };

        if picked.is_empty() {
            return Err(PricingError::invalid("scenarios", "no scenarios to evaluate"));
        }
        Ok(picked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: serde_json::Value) -> ReverseConvertibleRequest {
        serde_json::from_value(json).unwrap()
    }

    fn base() -> serde_json::Value {
        serde_json::json!({
            "maturity": 0.75, "volatility": 0.15, "interest": 0.01, "dividend": 0.0,
            "barrier": 18.0, "nominal": 1000.0, "cds": 0.0045, "c": 0.05
        })
    }

    fn loaded() -> ScenarioSet {
        let mut set = ScenarioSet::new();
        set.insert("up", UnderlyingPath::new(vec![20.0, 21.0]).unwrap());
        set.insert("down", UnderlyingPath::new(vec![20.0, 19.0]).unwrap());
        set
    }

    #[test]
    fn test_field_mapping() {
        let p = request(base()).barrier_parameters();
        assert_eq!(p.credit_spread, 0.0045);
        assert_eq!(p.coupon_rate, 0.05);
        assert_eq!(p.risk_free_rate, 0.01);
    }

    #[test]
    fn test_defaults_to_loaded_paths() {
        let set = request(base()).scenario_set(&loaded()).unwrap();
        assert_eq!(set.labels().collect::<Vec<_>>(), vec!["up", "down"]);
    }

    #[test]
    fn test_custom_paths_and_labels() {
        let mut json = base();
        json["scenarios"] = serde_json::json!({ "crash": [20.0, 12.0], "flat": [20.0, 20.0] });
        json["labels"] = serde_json::json!(["crash"]);
        let set = request(json).scenario_set(&loaded()).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("crash").unwrap().prices(), &[20.0, 12.0]);
    }

    #[test]
    fn test_unknown_label() {
        let mut json = base();
        json["labels"] = serde_json::json!(["sideways"]);
        let err = request(json).scenario_set(&loaded()).unwrap_err();
        assert!(matches!(err, PricingError::UnknownScenario(ref l) if l == "sideways"));
    }

    #[test]
    fn test_empty_custom_path_rejected() {
        let mut json = base();
        json["scenarios"] = serde_json::json!({ "up": [] });
        assert!(request(json).scenario_set(&loaded()).is_err());
    }

    #[test]
    fn test_processor_overrides() {
        let mut json = base();
        json["trading_days_per_year"] = serde_json::json!(252.0);
        json["maturity_policy"] = serde_json::json!("reject");
        let p = request(json).processor(ScenarioProcessor::default()).unwrap();
        assert_eq!(p.calendar.days_per_year(), 252.0);
        assert_eq!(p.policy, MaturityPolicy::Reject);

        let default = request(base()).processor(ScenarioProcessor::default()).unwrap();
        assert_eq!(default.calendar.days_per_year(), 250.0);
        assert_eq!(default.policy, MaturityPolicy::Truncate);
    }

    #[test]
    fn test_specific_quote_echoes_input() {
        let input = BlackScholesRequest {
            strike: 20.0,
            underlying: 20.0,
            maturity: 0.75,
            volatility: 0.15,
            interest: 0.01,
            dividend: 0.0,
        };
        let quote = VanillaQuote { put: 0.9588, call: 1.1083, d1: 0.1226, d2: -0.0072 };
        let json = serde_json::to_value(SpecificQuote::new(quote, input)).unwrap();
        assert_eq!(json["call"], 1.11);
        assert_eq!(json["put"], 0.96);
        assert_eq!(json["strike"], 20.0);
        assert_eq!(json["volatility"], 0.15);
    }
}
