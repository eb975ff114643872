//! Personal collection API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::collection::CollectionStore;
use crate::errors::AppError;
use crate::models::{
    CollectionEntry, CollectionStats, EntryPatch, Familiarity, NewEntry, ResolvedEntry,
};
use crate::AppState;

/// Collection filter parameters.
#[derive(Debug, Deserialize)]
pub struct CollectionQuery {
    #[serde(default)]
    pub q: String,
    /// `unfamiliar`, `neutral`, `familiar`, or `all`
    #[serde(default)]
    pub familiarity: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateOutcome {
    pub updated: bool,
}

#[derive(Debug, Serialize)]
pub struct RemoveOutcome {
    pub removed: bool,
}

fn parse_familiarity(raw: Option<&str>) -> Result<Option<Familiarity>, AppError> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(value) => Familiarity::parse(value)
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown familiarity {:?}", value))),
    }
}

/// GET /api/collection - List collected idioms, most recent first.
pub async fn list_collection(
    State(state): State<AppState>,
    Query(params): Query<CollectionQuery>,
) -> ApiResult<Vec<CollectionEntry>> {
    let familiarity = parse_familiarity(params.familiarity.as_deref())?;

    let collection = state.collection.lock().await;
    let entries: Vec<CollectionEntry> = collection
        .filter(&params.q, familiarity)
        .into_iter()
        .cloned()
        .collect();
    success(entries)
}

/// GET /api/collection/stats - Counts per familiarity state.
pub async fn collection_stats(State(state): State<AppState>) -> ApiResult<CollectionStats> {
    success(state.collection.lock().await.stats())
}

/// GET /api/collection/:id - Get one entry with its catalog record.
pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ResolvedEntry> {
    let collection = state.collection.lock().await;
    let entry = collection
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("Entry {} not found", id)))?;
    success(CollectionStore::resolve(entry, &state.catalog))
}

/// POST /api/collection - Add an idiom to the collection.
pub async fn add_entry(
    State(state): State<AppState>,
    Json(request): Json<NewEntry>,
) -> ApiResult<CollectionEntry> {
    if request.id.trim().is_empty() {
        return Err(AppError::Validation("Entry id is required".to_string()));
    }
    if request.word.trim().is_empty() {
        return Err(AppError::Validation("Entry word is required".to_string()));
    }

    let entry = state.collection.lock().await.add(request).await?;
    success(entry)
}

/// PUT /api/collection/:id - Update familiarity, tags or snapshot fields.
pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<EntryPatch>,
) -> ApiResult<UpdateOutcome> {
    if patch.is_empty() {
        return Err(AppError::Validation("No fields to update".to_string()));
    }

    let updated = state.collection.lock().await.update(&id, patch).await;
    success(UpdateOutcome { updated })
}

/// DELETE /api/collection/:id - Remove an idiom from the collection.
pub async fn remove_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<RemoveOutcome> {
    let removed = state.collection.lock().await.remove(&id).await;
    success(RemoveOutcome { removed })
}
