use crate::config::AppConfig;
use crate::product::scenario::{ScenarioProcessor, ScenarioSet};
use portable_atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// ── Service Counters (lock-free) ──

pub struct ServiceCounters {
    pub vanilla_requests: AtomicU64,
    pub structured_requests: AtomicU64,
    pub scenarios_evaluated: AtomicU64,
    pub points_produced: AtomicU64,
    pub requests_rejected: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CountersSnapshot {
    pub vanilla_requests: u64,
    pub structured_requests: u64,
    pub scenarios_evaluated: u64,
    pub points_produced: u64,
    pub requests_rejected: u64,
}

impl ServiceCounters {
    pub fn new() -> Self {
        Self {
            vanilla_requests: AtomicU64::new(0),
            structured_requests: AtomicU64::new(0),
            scenarios_evaluated: AtomicU64::new(0),
            points_produced: AtomicU64::new(0),
            requests_rejected: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> CountersSnapshot {
        use Ordering::Relaxed;
        CountersSnapshot {
            vanilla_requests: self.vanilla_requests.load(Relaxed),
            structured_requests: self.structured_requests.load(Relaxed),
            scenarios_evaluated: self.scenarios_evaluated.load(Relaxed),
            points_produced: self.points_produced.load(Relaxed),
            requests_rejected: self.requests_rejected.load(Relaxed),
        }
    }
}

// ── Application shared state (read-only after startup) ──

pub struct AppState {
    pub config: AppConfig,
    /// Default processor built from config; requests may override its calendar or policy.
    pub processor: ScenarioProcessor,
    /// Sample paths loaded at startup.
    pub scenarios: ScenarioSet,
    pub counters: ServiceCounters,
}

impl AppState {
    pub fn new(config: AppConfig, scenarios: ScenarioSet) -> Arc<Self> {
        let processor = ScenarioProcessor::new(config.calendar, config.maturity_policy);
        Arc::new(Self {
            config,
            processor,
            scenarios,
            counters: ServiceCounters::new(),
        })
    }
}
