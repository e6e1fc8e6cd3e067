use crate::errors::{PricingError, PricingResult};
use crate::models::black_scholes::{price_vanilla, sweep_underlying};
use crate::product::scenario::ScenarioResult;
use crate::server::schema::{
    BlackScholesRequest, BlackScholesResponse, ReverseConvertibleRequest, SpecificQuote,
};
use crate::state::AppState;
use axum::extract::State;
use axum::response::Json;
use portable_atomic::Ordering::Relaxed;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Upper bound on sweep length; the sweep spans 1..2*strike.
const MAX_SWEEP_POINTS: f64 = 100_000.0;

/// POST /black_scholes -- underlying sweep plus the quote at the requested spot
pub async fn black_scholes(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BlackScholesRequest>,
) -> PricingResult<Json<BlackScholesResponse>> {
    state.counters.vanilla_requests.fetch_add(1, Relaxed);
    let request_id = uuid::Uuid::new_v4();

    let result = price_black_scholes(&req);
    match &result {
        Ok(resp) => tracing::info!(
            %request_id,
            strike = req.strike,
            underlying = req.underlying,
            points = resp.series.len(),
            "black-scholes priced"
        ),
        Err(e) => reject(&state, request_id, e),
    }
    result.map(Json)
}

fn price_black_scholes(req: &BlackScholesRequest) -> PricingResult<BlackScholesResponse> {
    let params = req.pricing_parameters();
    let specific = price_vanilla(req.underlying, &params)?;

    let upper = (2.0 * req.strike).floor();
    if upper > MAX_SWEEP_POINTS {
        return Err(PricingError::invalid(
            "strike",
            format!("sweep up to {upper} exceeds {MAX_SWEEP_POINTS} points"),
        ));
    }
    let series = sweep_underlying((1..upper as u64).map(|s| s as f64), &params)?;

    Ok(BlackScholesResponse {
        series,
        specific: SpecificQuote::new(specific, *req),
    })
}

/// POST /barrier_reverse_convertible -- one valuation curve per scenario
pub async fn barrier_reverse_convertible(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReverseConvertibleRequest>,
) -> PricingResult<Json<BTreeMap<String, ScenarioResult>>> {
    state.counters.structured_requests.fetch_add(1, Relaxed);
    let request_id = uuid::Uuid::new_v4();

    let result = price_scenarios(&state, &req, request_id).await;
    match &result {
        Ok(out) => {
            let points: usize = out.values().map(|r| r.series.len()).sum();
            state.counters.scenarios_evaluated.fetch_add(out.len() as u64, Relaxed);
            state.counters.points_produced.fetch_add(points as u64, Relaxed);
            tracing::info!(
                %request_id,
                scenarios = out.len(),
                points,
                barrier = req.barrier,
                "reverse convertible priced"
            );
        }
        Err(e) => reject(&state, request_id, e),
    }
    result.map(Json)
}

/// Fan scenarios out to the blocking pool. They share only Copy inputs;
/// any failing scenario fails the request.
async fn price_scenarios(
    state: &AppState,
    req: &ReverseConvertibleRequest,
    request_id: uuid::Uuid,
) -> PricingResult<BTreeMap<String, ScenarioResult>> {
    let params = req.barrier_parameters();
    params.validate()?;
    let processor = req.processor(state.processor)?;
    let scenarios = req.scenario_set(&state.scenarios)?;

    let mut handles = Vec::with_capacity(scenarios.len());
    for (label, path) in scenarios {
        let span = tracing::info_span!("scenario", %request_id, scenario = %label);
        handles.push(tokio::task::spawn_blocking(move || {
            span.in_scope(|| processor.process(&path, &params))
                .map(|result| (label, result))
        }));
    }

    let mut out = BTreeMap::new();
    for handle in handles {
        let (label, result) = handle.await??;
        out.insert(label, result);
    }
    Ok(out)
}

fn reject(state: &AppState, request_id: uuid::Uuid, e: &PricingError) {
    state.counters.requests_rejected.fetch_add(1, Relaxed);
    tracing::warn!(%request_id, error = %e, "request rejected");
}

/// GET /api/scenarios -- sample paths loaded at startup
pub async fn get_scenarios(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let scenarios: Vec<serde_json::Value> = state
        .scenarios
        .labels()
        .filter_map(|label| {
            state.scenarios.get(label).map(|path| {
                serde_json::json!({
                    "label": label,
                    "days": path.len(),
                    "initial_fixing": path.initial_fixing(),
                })
            })
        })
        .collect();
    Json(serde_json::json!({
        "data_dir": state.config.scenario_data_dir.display().to_string(),
        "trading_days_per_year": state.processor.calendar.days_per_year(),
        "maturity_policy": state.processor.policy,
        "scenarios": scenarios,
    }))
}

/// GET /api/counters -- request counters (lock-free reads)
pub async fn get_counters(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!(state.counters.snapshot()))
}
