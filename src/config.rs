use crate::errors::{PricingError, PricingResult};
use crate::product::calendar::TradingCalendar;
use crate::product::scenario::MaturityPolicy;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub calendar: TradingCalendar,
    pub maturity_policy: MaturityPolicy,
    pub scenario_data_dir: PathBuf,
    pub scenarios: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> PricingResult<Self> {
        dotenvy::dotenv().ok();

        let server_port = env_var_or("SERVER_PORT", "8000")
            .parse::<u16>()
            .map_err(|e| PricingError::Config(format!("SERVER_PORT: {e}")))?;

        let trading_days = env_var_or("TRADING_DAYS_PER_YEAR", "250")
            .parse::<f64>()
            .map_err(|e| PricingError::Config(format!("TRADING_DAYS_PER_YEAR: {e}")))?;
        let calendar = TradingCalendar::new(trading_days)
            .map_err(|e| PricingError::Config(format!("TRADING_DAYS_PER_YEAR: {e}")))?;

        let maturity_policy = env_var_or("MATURITY_POLICY", "truncate")
            .parse::<MaturityPolicy>()
            .map_err(|e| PricingError::Config(format!("MATURITY_POLICY: {e}")))?;

        let scenarios = parse_scenario_labels(&env_var_or("SCENARIOS", "up,down,sideways"));
        if scenarios.is_empty() {
            return Err(PricingError::Config("SCENARIOS: no scenario labels".into()));
        }

        Ok(Self {
            server_port,
            calendar,
            maturity_policy,
            scenario_data_dir: PathBuf::from(env_var_or("SCENARIO_DATA_DIR", "data")),
            scenarios,
        })
    }
}

fn parse_scenario_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_labels_trimmed() {
        let labels = parse_scenario_labels(" up, down ,,sideways ");
        assert_eq!(labels, vec!["up", "down", "sideways"]);
    }

    #[test]
    fn test_empty_labels() {
        assert!(parse_scenario_labels(" , ").is_empty());
    }
}
