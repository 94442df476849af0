use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::middleware::auth::RequireKeyAuth;
use crate::service::Entry;
use crate::service::generator::generate_password;
use crate::{VaultError, router::VaultState};

#[derive(Debug, Deserialize)]
pub struct AddEntryRequest {
    pub site: String,
    pub user: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEntryRequest {
    pub password: String,
}

fn notice(message: &str) -> Json<Value> {
    Json(json!({ "message": message }))
}

/// POST /entries
pub async fn add_entry_handler(
    _auth: RequireKeyAuth,
    State(state): State<VaultState>,
    Json(req): Json<AddEntryRequest>,
) -> Result<(StatusCode, Json<Value>), VaultError> {
    state
        .vault
        .add_entry(req.site, req.user, req.password)
        .await?;
    Ok((StatusCode::CREATED, notice("Entry added.")))
}

/// GET /entries/{site}
pub async fn search_entry_handler(
    _auth: RequireKeyAuth,
    State(state): State<VaultState>,
    Path(site): Path<String>,
) -> Result<Json<Entry>, VaultError> {
    Ok(Json(state.vault.search_entry(site).await?))
}

/// PUT /entries/{site}
pub async fn update_entry_handler(
    _auth: RequireKeyAuth,
    State(state): State<VaultState>,
    Path(site): Path<String>,
    Json(req): Json<UpdateEntryRequest>,
) -> Result<Json<Value>, VaultError> {
    state.vault.update_entry(site, req.password).await?;
    Ok(notice("Password updated."))
}

/// DELETE /entries/{site}
pub async fn delete_entry_handler(
    _auth: RequireKeyAuth,
    State(state): State<VaultState>,
    Path(site): Path<String>,
) -> Result<Json<Value>, VaultError> {
    state.vault.delete_entry(site).await?;
    Ok(notice("Entry deleted."))
}

/// GET /count, the usage meter.
pub async fn entry_count_handler(
    _auth: RequireKeyAuth,
    State(state): State<VaultState>,
) -> Result<Json<Value>, VaultError> {
    let count = state.vault.entry_count().await?;
    Ok(Json(json!({ "count": count })))
}

/// GET /generate
pub async fn generate_password_handler(_auth: RequireKeyAuth) -> Json<Value> {
    Json(json!({ "password": generate_password() }))
}
