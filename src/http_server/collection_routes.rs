//! Collection HTTP Routes
//!
//! CRUD over `/{collection}` for every entity kind. Records addressed by
//! an opaque id live at `/{collection}/{id}`; natural-key records take one
//! path segment per key field (`/counties/{state_code}/{name}`).
//!
//! Key segments are split on the raw request path and decoded one by one,
//! so an encoded `%2F` stays inside its field.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::entity::EntityKey;
use crate::service::{Catalog, CollectionService, ServiceError};

use super::errors::{ApiError, ApiResult};

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(svc: &CollectionService, verb: &str) -> Self {
        Self {
            message: format!("{} {} successfully", svc.kind().label(), verb),
        }
    }
}

pub fn collection_routes(catalog: Arc<Catalog>) -> Router {
    Router::new()
        .route("/:collection", get(list_handler).post(create_handler))
        .route(
            "/:collection/*key",
            get(read_one_handler)
                .put(update_handler)
                .delete(delete_handler),
        )
        .with_state(catalog)
}

fn service<'a>(catalog: &'a Catalog, collection: &str) -> ApiResult<&'a CollectionService> {
    catalog
        .by_collection(collection)
        .ok_or_else(|| ApiError::UnknownCollection(collection.to_string()))
}

/// Decoded key segments of a `/{collection}/...` request path.
fn key_segments(uri: &Uri) -> ApiResult<Vec<String>> {
    uri.path()
        .trim_start_matches('/')
        .split('/')
        .skip(1)
        .map(|segment| {
            urlencoding::decode(segment)
                .map(|decoded| decoded.into_owned())
                .map_err(|_| ApiError::BadRequest(format!("Invalid key segment: {}", segment)))
        })
        .collect()
}

fn resolve_key(svc: &CollectionService, uri: &Uri) -> ApiResult<EntityKey> {
    let owned = key_segments(uri)?;
    let segments: Vec<&str> = owned.iter().map(String::as_str).collect();
    let identity = svc.kind().identity();
    identity.key_from_segments(&segments).ok_or_else(|| {
        ApiError::Service(ServiceError::InvalidKey {
            entity: svc.kind().name(),
            expected: identity.describe(),
        })
    })
}

fn json_body(body: Result<Json<Value>, JsonRejection>) -> ApiResult<Value> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))
}

async fn list_handler(
    State(catalog): State<Arc<Catalog>>,
    Path(collection): Path<String>,
) -> ApiResult<Json<Value>> {
    let svc = service(&catalog, &collection)?;
    let records = svc.read()?;

    let mut body = Map::new();
    body.insert(
        svc.kind().collection().to_string(),
        Value::Array(records.into_iter().map(Value::Object).collect()),
    );
    Ok(Json(Value::Object(body)))
}

async fn create_handler(
    State(catalog): State<Arc<Catalog>>,
    Path(collection): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let svc = service(&catalog, &collection)?;
    let fields = json_body(body)?;
    let id = svc.create(&fields)?;

    let response = CreatedResponse {
        id,
        message: MessageResponse::new(svc, "created").message,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

async fn read_one_handler(
    State(catalog): State<Arc<Catalog>>,
    Path((collection, _)): Path<(String, String)>,
    uri: Uri,
) -> ApiResult<Json<Value>> {
    let svc = service(&catalog, &collection)?;
    let key = resolve_key(svc, &uri)?;
    Ok(Json(Value::Object(svc.read_one(&key)?)))
}

async fn update_handler(
    State(catalog): State<Arc<Catalog>>,
    Path((collection, _)): Path<(String, String)>,
    uri: Uri,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let svc = service(&catalog, &collection)?;
    let key = resolve_key(svc, &uri)?;
    let fields = json_body(body)?;
    svc.update(&key, &fields).map_err(ApiError::for_update)?;
    Ok(Json(MessageResponse::new(svc, "updated")))
}

async fn delete_handler(
    State(catalog): State<Arc<Catalog>>,
    Path((collection, _)): Path<(String, String)>,
    uri: Uri,
) -> ApiResult<Json<MessageResponse>> {
    let svc = service(&catalog, &collection)?;
    let key = resolve_key(svc, &uri)?;
    svc.delete(&key)?;
    Ok(Json(MessageResponse::new(svc, "deleted")))
}
