use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use anyhow::{Context, Result};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use taskboard_be::config::AppConfig;
use taskboard_be::handlers;
use taskboard_be::openapi::ApiDoc;
use taskboard_be::storage::seed::seed_demo_data;
use taskboard_be::storage::{MemoryStore, PgStore, Store};

async fn build_store(config: &AppConfig) -> Result<Arc<dyn Store>> {
    match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url, config.database_max_connections).await?;
            store.ensure_schema().await?;
            Ok(Arc::new(store))
        }
        None => {
            log::warn!("⚠️  DATABASE_URL not set, using in-memory store (data is lost on exit)");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    log::info!("🚀 Starting Task Dashboard API on port {}", config.port);
    log::info!("🌍 Environment: {}", config.environment);
    log::info!("📋 Allowed frontend URLs: {}", config.frontend_urls.join(", "));

    let store = build_store(&config).await?;

    if config.seed_demo_data {
        seed_demo_data(store.as_ref())
            .await
            .context("Failed to seed demo data")?;
    }

    match store.stats().await {
        Ok(stats) => stats.log_stats(),
        Err(e) => log::warn!("Could not collect store statistics: {}", e),
    }

    if config.is_development() {
        log::info!("📖 Swagger UI: http://localhost:{}/swagger-ui/", config.port);
    }

    let store_data: web::Data<dyn Store> = web::Data::from(store);
    let allowed_origins = config.frontend_urls.clone();
    let openapi = ApiDoc::openapi();

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                "Content-Type",
                "Accept",
                "Origin",
                "X-Requested-With",
            ])
            .max_age(3600);

        // Add allowed origins
        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(store_data.clone())
            .configure(handlers::configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
            .route("/", web::get().to(|| async {
                HttpResponse::Ok().json(serde_json::json!({
                    "name": "Task Dashboard API",
                    "version": env!("CARGO_PKG_VERSION"),
                    "description": "REST API for the team task dashboard"
                }))
            }))
    })
    .bind(format!("0.0.0.0:{}", config.port))
    .with_context(|| format!("Failed to bind port {}", config.port))?
    .run()
    .await
    .context("HTTP server error")
}
