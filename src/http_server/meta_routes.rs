//! Service metadata routes: liveness, discovery, echo and record counts

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{json, Value};

use crate::entity::{EntityKind, Identity};
use crate::service::Catalog;

use super::errors::{ApiError, ApiResult};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Static routes served alongside the collections
const META_PATHS: [&str; 5] = ["/echo", "/endpoints", "/health", "/hello", "/stats"];

pub fn meta_routes(catalog: Arc<Catalog>) -> Router {
    Router::new()
        .route("/hello", get(hello_handler))
        .route("/health", get(health_handler))
        .route("/endpoints", get(endpoints_handler))
        .route("/echo", post(echo_handler))
        .route("/stats", get(stats_handler))
        .with_state(catalog)
}

/// Every path this server answers, sorted
pub fn endpoint_paths() -> Vec<String> {
    let mut paths: Vec<String> = META_PATHS.iter().map(|p| p.to_string()).collect();
    for kind in EntityKind::ALL {
        let collection = kind.collection();
        paths.push(format!("/{}", collection));
        let item = match kind.identity() {
            Identity::OpaqueId => "{id}".to_string(),
            Identity::NaturalKey(fields) => fields
                .iter()
                .map(|f| format!("{{{}}}", f))
                .collect::<Vec<_>>()
                .join("/"),
        };
        paths.push(format!("/{}/{}", collection, item));
    }
    paths.sort();
    paths
}

async fn hello_handler() -> Json<Value> {
    Json(json!({"hello": "world"}))
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn endpoints_handler() -> Json<Value> {
    Json(json!({"Available endpoints": endpoint_paths()}))
}

async fn echo_handler(body: Result<Json<Value>, JsonRejection>) -> ApiResult<Json<Value>> {
    let Json(value) = body.map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;
    Ok(Json(json!({"echo": value})))
}

async fn stats_handler(
    State(catalog): State<Arc<Catalog>>,
) -> ApiResult<Json<BTreeMap<&'static str, usize>>> {
    Ok(Json(catalog.stats()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_paths_sorted_and_complete() {
        let paths = endpoint_paths();
        let mut sorted = paths.clone();
        sorted.sort();
        assert_eq!(paths, sorted);
        assert_eq!(paths.len(), META_PATHS.len() + 2 * EntityKind::ALL.len());
        assert!(paths.contains(&"/counties/{state_code}/{name}".to_string()));
        assert!(paths.contains(&"/cities/{id}".to_string()));
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "ok");
    }
}
