mod config;
mod errors;
mod feeds;
mod models;
mod product;
mod server;
mod state;

use crate::state::AppState;

#[tokio::main]
async fn main() {
    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("brc_pricer starting");

    // Load config
    let cfg = match config::AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(
        port = cfg.server_port,
        trading_days_per_year = cfg.calendar.days_per_year(),
        maturity_policy = %cfg.maturity_policy,
        data_dir = %cfg.scenario_data_dir.display(),
        "config loaded"
    );

    // Sample paths, read once and shared read-only
    let scenarios = match feeds::csv_path::load_scenarios(&cfg.scenario_data_dir, &cfg.scenarios) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("scenario load error: {e}");
            std::process::exit(1);
        }
    };

    let port = cfg.server_port;
    let app_state = AppState::new(cfg, scenarios);
    let app = server::router(app_state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!("server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("bind error: {e}");
            std::process::exit(1);
        });

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
    }
}
