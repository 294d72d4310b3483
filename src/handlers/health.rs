use actix_web::{web, HttpResponse, Result};
use serde_json::json;

use crate::storage::{Store, StoreStats};

/// Liveness plus row counts; 503 when the store cannot be reached
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service and store are up"),
        (status = 503, description = "Store unreachable")
    )
)]
pub async fn health_check(store: web::Data<dyn Store>) -> Result<HttpResponse> {
    match store.health_check().await {
        Ok(_) => {
            let stats = store.stats().await.unwrap_or_else(|e| {
                log::warn!("Could not collect store statistics: {}", e);
                StoreStats::default()
            });

            Ok(HttpResponse::Ok().json(json!({
                "status": "ok",
                "message": "Task Dashboard API is running",
                "database": "connected",
                "stats": stats
            })))
        }
        Err(e) => {
            log::error!("Store health check failed: {}", e);
            Ok(HttpResponse::ServiceUnavailable().json(json!({
                "status": "error",
                "error": "Database connection failed"
            })))
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
