use std::sync::Arc;

use yosou_bot::api::router::create_router;
use yosou_bot::config::AppConfig;
use yosou_bot::line::LineClient;
use yosou_bot::services::notifier::Notifier;
use yosou_bot::sheets::SheetsClient;
use yosou_bot::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    let http = reqwest::Client::new();
    let line = LineClient::new(http.clone(), config.channel_access_token.clone());
    let sheets = SheetsClient::new(http, config.sheets_endpoint.clone());

    let notifier = config
        .operator_user_id
        .clone()
        .map(|operator| Arc::new(Notifier::new(line.clone(), operator)));
    if notifier.is_none() {
        tracing::warn!("OPERATOR_USER_ID not set — pipeline failures will only reach the logs");
    }

    let state = AppState {
        config,
        line,
        sheets,
        notifier,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}
