//! # User Handlers
//!
//! Minimal user surface around the future-auth schema: create with
//! validation and unique-email enforcement, list, fetch. Password
//! fields never leave the process.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use crate::model::{strip_private_fields, NewUser, ValidationError};
use crate::query::{FilterExpr, QueryOptions};

use super::errors::{ApiError, ApiResult};
use super::response::Envelope;
use super::server::AppState;

const COLLECTION: &str = "users";
const RESOURCE: &str = "user";

/// GET /users — list, same query translation as tours.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Envelope>> {
    let options = QueryOptions::from_params(&params);
    let mut users = state.store.find_many(COLLECTION, &options)?;
    for user in &mut users {
        strip_private_fields(user);
    }

    Ok(Json(Envelope::list("users", users)))
}

/// GET /users/{id} — fetch one or 404.
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope>> {
    let mut user = state
        .store
        .find_by_id(COLLECTION, &id)?
        .ok_or(ApiError::NotFound(RESOURCE))?;
    strip_private_fields(&mut user);

    Ok(Json(Envelope::single(RESOURCE, user)))
}

/// POST /users — validate, enforce unique email, create, 201.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Envelope>)> {
    let doc = NewUser::parse(&body)?.into_document()?;

    let email = doc["email"].clone();
    let existing = state.store.find_many(
        COLLECTION,
        &QueryOptions::default().with_filter(FilterExpr::eq("email", email)),
    )?;
    if !existing.is_empty() {
        return Err(ApiError::Validation(ValidationError::new(
            "email",
            "Email is already in use",
        )));
    }

    let mut created = state.store.insert(COLLECTION, doc)?;
    strip_private_fields(&mut created);

    Ok((
        StatusCode::CREATED,
        Json(Envelope::single(RESOURCE, created)),
    ))
}
