use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use cinerank_api::{
    config::Config,
    db::{create_pool, PgStore},
    routes::{create_router, AppState},
    services::classifier::ChatClassifier,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    let store = Arc::new(PgStore::new(pool));

    let classifier = Arc::new(ChatClassifier::new(
        config.classifier_api_key.clone(),
        config.classifier_api_url.clone(),
        config.classifier_model.clone(),
    )?);

    let state = AppState::new(store, classifier, config.clone());
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
