use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;
use crate::routes::ServerState;

/// Body of `PUT /:key`.
#[derive(Serialize, Deserialize, Debug)]
pub struct PutRequestBody {
    #[serde(rename = "value")]
    pub new_value: String,
}

/// `GET /` - every key as a JSON array.
pub async fn list_keys(State(state): State<ServerState>) -> Json<Vec<String>> {
    Json(state.store.list_keys().await)
}

/// `GET /:key` - the raw value as `text/plain`.
pub async fn get_value(
    State(state): State<ServerState>,
    Path(key): Path<String>,
) -> Result<String, ApiError> {
    Ok(state.store.get(&key).await?)
}

/// `PUT /:key` - replace the value of an existing key.
pub async fn update_value(
    State(state): State<ServerState>,
    Path(key): Path<String>,
    payload: Result<Json<PutRequestBody>, JsonRejection>,
) -> Result<Json<HashMap<String, String>>, ApiError> {
    let Json(body) = payload?;
    let updated = state.store.update(&key, body.new_value).await?;
    Ok(Json(updated))
}

/// `DELETE /:key` - remove a key, answering with the key as a JSON string.
pub async fn delete_value(
    State(state): State<ServerState>,
    Path(key): Path<String>,
) -> Result<Json<String>, ApiError> {
    let deleted = state.store.delete(&key).await?;
    Ok(Json(deleted))
}
