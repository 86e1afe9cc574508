use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::response::ApiResponse;

/// Liveness check. Public and independent of the stores.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::success(
        "Service is running",
        json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": Utc::now(),
        }),
    ))
}
