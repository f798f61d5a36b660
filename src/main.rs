use std::sync::Arc;

use catch_predictor::{
    api::{self, AppState},
    config::ServiceConfig,
    knowledge::KnowledgeBase,
    scorer::SuccessScorer,
    Predictor,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = ServiceConfig::from_env()?;
    tracing::info!("starting with {:?}", cfg);

    let kb = KnowledgeBase::builtin();
    let scorer = SuccessScorer::from_artifact(cfg.model_path.as_deref(), kb);
    let predictor = Predictor::new(kb, scorer).with_feature_logging(cfg.log_predictions);
    if let Err(e) = predictor.warmup() {
        tracing::warn!("model warmup failed: {:#}; requests will fall back to heuristics", e);
    }

    tracing::info!(
        "knowledge base: {} species [{}]",
        kb.species_ids().count(),
        kb.species_ids().collect::<Vec<_>>().join(", ")
    );

    let state = AppState {
        predictor: Arc::new(predictor),
    };
    let app = api::router(state);

    let addr = cfg.socket_addr();
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
