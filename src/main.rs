mod app;
mod config;
mod http_client;
mod logger;
mod nutrients;
mod state;
#[cfg(test)]
mod test_support;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "nutrients_api=debug,axum=info,tower_http=info".to_string());
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

    let app_state = state::AppState::init().await?;

    for provider in app_state.config.unconfigured_providers() {
        tracing::warn!(provider, "credentials missing; its lookups will be rejected");
    }

    app::serve(app::build_app(app_state)).await?;

    // The router owned the last handle to the shared HTTP client.
    tracing::info!("http client released");
    Ok(())
}
