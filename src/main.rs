use actix_cors::Cors;
use actix_web::{middleware::Compress, web, App, HttpServer};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use estate_cms::cache::{CacheConfig, PageCache};
use estate_cms::openapi::ApiDoc;
use estate_cms::repo::{Repo, TemplateRepo};
use estate_cms::storage::build_image_store;
use estate_cms::{config, AppState, SecurityHeaders};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // .env is a dev convenience only; release builds take the real environment.
    if cfg!(debug_assertions) {
        let _ = dotenv::dotenv();
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    if let Err(msg) = validate_env_vars() {
        tracing::error!("{msg}");
        std::process::exit(1);
    }

    info!("Bootstrapping estate-cms");
    info!(
        "Frontend URL: {}",
        std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
    );

    let repo = build_repo().await.map_err(std::io::Error::other)?;
    match repo.seed_system_templates().await {
        Ok(0) => {}
        Ok(n) => info!("Seeded {n} system component templates"),
        Err(e) => tracing::warn!("Seeding system templates failed: {e}"),
    }

    let image_store = build_image_store().await.map_err(|e| {
        tracing::error!("Failed to initialize S3 image store: {e}");
        std::io::Error::other(e.to_string())
    })?;

    let cache_config = CacheConfig::from_env();
    let state = AppState::new(repo, image_store, PageCache::new(cache_config.ttl));
    if !cache_config.preload_slugs.is_empty() {
        let loaded = state.pages.preload(&cache_config.preload_slugs).await;
        info!("Preloaded {loaded}/{} pages into cache", cache_config.preload_slugs.len());
    }

    let openapi = ApiDoc::openapi();
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());

    let server = HttpServer::new(move || {
        let cors = {
            let mut c = Cors::default()
                .allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
                .allow_any_header()
                .allowed_methods(["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
                .supports_credentials()
                .max_age(3600);
            if let Ok(front) = std::env::var("FRONTEND_URL") {
                c = c.allowed_origin(&front);
            }
            c
        };

        App::new()
            .wrap(TracingLogger::default())
            .wrap(Compress::default())
            .wrap(SecurityHeaders::from_env())
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .configure(config)
            .service(SwaggerUi::new("/docs/{_:.*}").url("/docs/openapi.json", openapi.clone()))
    })
    .bind(&bind_addr)?;

    info!("Listening on http://{bind_addr}");
    server.run().await
}

#[cfg(feature = "postgres-store")]
async fn build_repo() -> anyhow::Result<Arc<dyn Repo>> {
    use sqlx::postgres::PgPoolOptions;
    let db_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set for postgres-store"))?;
    let pool = PgPoolOptions::new().max_connections(5).connect(&db_url).await?;
    let repo = estate_cms::repo::pg::PgRepo::new(pool);
    repo.migrate().await?;
    info!("Using Postgres repository backend");
    Ok(Arc::new(repo))
}

#[cfg(all(feature = "inmem-store", not(feature = "postgres-store")))]
async fn build_repo() -> anyhow::Result<Arc<dyn Repo>> {
    info!("Using in-memory repository backend");
    Ok(Arc::new(estate_cms::repo::inmem::InMemRepo::new()))
}

/// Checks required configuration before anything binds.
fn validate_env_vars() -> Result<(), String> {
    use std::env;

    let missing: Vec<&str> = ["JWT_SECRET"].into_iter().filter(|v| env::var(v).is_err()).collect();
    if !missing.is_empty() {
        return Err(format!(
            "Missing required environment variables: {missing:?}. Copy .env.example to .env and configure it"
        ));
    }
    if env::var("JWT_SECRET").map(|s| s.len() < 32).unwrap_or(true) {
        return Err("JWT_SECRET must be at least 32 characters long".into());
    }
    #[cfg(feature = "postgres-store")]
    if env::var("DATABASE_URL").is_err() {
        return Err("DATABASE_URL must be set for postgres-store".into());
    }
    if env::var("S3_ENDPOINT").is_err() {
        tracing::warn!("S3_ENDPOINT not set; image uploads will fail to initialize");
    }
    Ok(())
}
