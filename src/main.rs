mod app;
mod auth;
mod config;
mod db;
mod error;
mod export;
mod flash;
mod home;
mod maintenance;
mod state;
mod validate;
mod vehicles;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "autotrack=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = AppState::init().await?;

    if let Err(e) = sqlx::migrate!("./migrations").run(state.db.pool()).await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }

    let app = app::build_app(state.clone());
    app::serve(app, &state.config).await
}
