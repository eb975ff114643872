//! Catalog API endpoints.

use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{DiscriminationView, IdiomRecord};
use crate::AppState;

/// Catalog search parameters.
#[derive(Debug, Deserialize)]
pub struct IdiomQuery {
    #[serde(default)]
    pub q: String,
}

/// Idiom with its discrimination group and collection status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdiomDetail {
    pub idiom: IdiomRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discrimination: Option<DiscriminationView>,
    pub collected: bool,
}

/// GET /api/idioms - Search the catalog.
pub async fn search_idioms(
    State(state): State<AppState>,
    Query(params): Query<IdiomQuery>,
) -> ApiResult<Vec<IdiomRecord>> {
    let results: Vec<IdiomRecord> = state
        .catalog
        .search(&params.q)
        .into_iter()
        .cloned()
        .collect();
    success(results)
}

/// GET /api/idioms/:id - Get one idiom.
pub async fn get_idiom(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<IdiomDetail> {
    let idiom = state
        .catalog
        .find_by_id(&id)
        .ok_or_else(|| AppError::NotFound(format!("Idiom {} not found", id)))?;

    let discrimination = state
        .catalog
        .find_discrimination_for_idiom(&id)
        .map(|group| state.catalog.discrimination_view(group));

    let collected = state.collection.lock().await.get(&id).is_some();

    success(IdiomDetail {
        idiom: idiom.clone(),
        discrimination,
        collected,
    })
}

/// GET /api/discriminations - List all discrimination groups.
pub async fn list_discriminations(
    State(state): State<AppState>,
) -> ApiResult<Vec<DiscriminationView>> {
    let views: Vec<DiscriminationView> = state
        .catalog
        .all_discrimination_groups()
        .iter()
        .map(|group| state.catalog.discrimination_view(group))
        .collect();
    success(views)
}
