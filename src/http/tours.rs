//! # Tour Handlers
//!
//! One handler per CRUD verb plus the preset "top 5 cheap" view and
//! the two aggregation reports. Each handler parses, delegates to the
//! store, and wraps the payload in the response envelope.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use crate::model::Tour;
use crate::query::QueryOptions;
use crate::reports;

use super::errors::{ApiError, ApiResult};
use super::response::Envelope;
use super::server::AppState;

const COLLECTION: &str = "tours";
const RESOURCE: &str = "tour";

/// GET /tours — list, query-filtered/sorted/projected/paginated.
pub async fn list_tours(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Envelope>> {
    let options = QueryOptions::from_params(&params);
    let tours = state.store.find_many(COLLECTION, &options)?;
    Ok(Json(Envelope::list("tours", tours)))
}

/// GET /tours/top-5-cheap — fixed preset view over the list handler.
///
/// Incoming parameters are forcibly overwritten by the preset.
pub async fn top_five_cheap(
    state: State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Envelope>> {
    let mut params = params;
    params.insert("limit".to_string(), "5".to_string());
    params.insert("sort".to_string(), "-ratingsAverage,price".to_string());
    params.insert(
        "fields".to_string(),
        "name,price,ratingsAverage,summary,difficulty".to_string(),
    );

    list_tours(state, Query(params)).await
}

/// GET /tours/{id} — fetch one or 404.
pub async fn get_tour(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope>> {
    let tour = state
        .store
        .find_by_id(COLLECTION, &id)?
        .ok_or(ApiError::NotFound(RESOURCE))?;

    Ok(Json(Envelope::single(RESOURCE, tour)))
}

/// POST /tours — validate and create, 201.
pub async fn create_tour(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Envelope>)> {
    let tour = Tour::parse(&body)?;
    let created = state.store.insert(COLLECTION, tour.to_document())?;

    Ok((StatusCode::CREATED, Json(Envelope::single(RESOURCE, created))))
}

/// PATCH /tours/{id} — partial merge, re-validated as a whole, or 404.
pub async fn update_tour(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<Value>,
) -> ApiResult<Json<Envelope>> {
    let current = state
        .store
        .find_by_id(COLLECTION, &id)?
        .ok_or(ApiError::NotFound(RESOURCE))?;

    // Merge for validation only; the canonical form is what lands.
    let mut merged = current;
    if let (Some(obj), Some(patch_obj)) = (merged.as_object_mut(), patch.as_object()) {
        for (key, value) in patch_obj {
            obj.insert(key.clone(), value.clone());
        }
    }
    let tour = Tour::parse(&merged)?;

    let updated = state
        .store
        .update_by_id(COLLECTION, &id, tour.to_document())?
        .ok_or(ApiError::NotFound(RESOURCE))?;

    Ok(Json(Envelope::single(RESOURCE, updated)))
}

/// DELETE /tours/{id} — delete or 404; 204 with empty body.
pub async fn delete_tour(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.store.delete_by_id(COLLECTION, &id)? {
        return Err(ApiError::NotFound(RESOURCE));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// GET /tours/stats — statistics by difficulty tier.
pub async fn tour_stats(State(state): State<Arc<AppState>>) -> ApiResult<Json<Envelope>> {
    let rows = state.store.aggregate(COLLECTION, &reports::stats_pipeline())?;
    Ok(Json(Envelope::single("stats", Value::Array(rows))))
}

/// GET /tours/monthly-plan/{year} — start-date plan for one year.
pub async fn monthly_plan(
    State(state): State<Arc<AppState>>,
    Path(year): Path<i32>,
) -> ApiResult<Json<Envelope>> {
    let rows = state
        .store
        .aggregate(COLLECTION, &reports::monthly_plan_pipeline(year))?;
    Ok(Json(Envelope::single("plan", Value::Array(rows))))
}
