use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movie_recommender::{
    api::{create_router, AppState},
    config::Config,
    services::{loader, LookupEngine},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let engine = {
        let config = config.clone();
        tokio::task::spawn_blocking(move || -> anyhow::Result<LookupEngine> {
            let (catalog, similarity) =
                loader::load(&config.catalog_path, &config.similarity_path)?;
            let engine = LookupEngine::new(catalog, similarity)?
                .with_k_policy(config.k_policy)
                .with_self_exclusion(config.self_exclusion);
            Ok(engine)
        })
        .await
        .context("artifact loading task panicked")?
    };

    let engine = match engine {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!(error = %e, "Refusing to serve without recommendation data");
            return Err(e);
        }
    };

    tracing::info!(
        movies = engine.catalog().len(),
        k_policy = ?config.k_policy,
        self_exclusion = ?config.self_exclusion,
        "Recommendation engine ready"
    );

    let state = AppState::new(engine, &config);
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
