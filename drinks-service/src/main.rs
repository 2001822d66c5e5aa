use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};
use common_auth::{jwks_url, JwksFetcher, JwtConfig, JwtVerifier};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use drinks_service::app_state::AppState;
use drinks_service::config::load_config;
use drinks_service::drink_handlers::{
    create_drink, delete_drink, list_drinks, list_drinks_detail, update_drink,
};

async fn health() -> &'static str {
    "ok"
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = load_config()?;

    // Database connection pool, with schema applied before serving traffic
    let db = PgPool::connect(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&db).await?;

    let jwt_config = JwtConfig::for_domain(&config.auth_domain, &config.auth_audience)
        .with_leeway(config.auth_leeway_seconds);
    let fetcher = JwksFetcher::new(jwks_url(&config.auth_domain));
    let jwt_verifier =
        Arc::new(JwtVerifier::new(jwt_config, fetcher).with_cache_ttl(config.jwks_cache_ttl));

    let state = AppState::new(db, jwt_verifier);

    let app = Router::new()
        .route("/healthz", get(health))
        .route("/drinks", get(list_drinks).post(create_drink))
        .route("/drinks-detail", get(list_drinks_detail))
        .route("/drinks/:id", patch(update_drink).delete(delete_drink))
        .layer(CorsLayer::permissive())
        .with_state(state);

    println!("starting drinks-service on {}", config.addr);
    let listener = TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
