//! Comparison API endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::{success, ApiResult};
use crate::comparison::{self, ComparisonTable, MAX_SELECTION};
use crate::errors::AppError;
use crate::AppState;

/// Selection edit: the current selection and the id to add or remove.
#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    #[serde(default)]
    pub selection: Vec<String>,
    #[serde(default)]
    pub add: Option<String>,
    #[serde(default)]
    pub remove: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ComparisonQuery {
    /// Comma-separated idiom ids
    #[serde(default)]
    pub ids: String,
}

/// POST /api/comparison/selection - Add to or remove from a selection.
pub async fn edit_selection(Json(request): Json<SelectionRequest>) -> ApiResult<Vec<String>> {
    let mut selection = request.selection;

    if let Some(id) = request.remove.as_deref() {
        comparison::remove_from_selection(&mut selection, id);
    }
    if let Some(id) = request.add.as_deref() {
        comparison::add_to_selection(&mut selection, id)?;
    }

    success(selection)
}

/// GET /api/comparison - Comparison table for the given ids.
pub async fn compare_idioms(
    State(state): State<AppState>,
    Query(params): Query<ComparisonQuery>,
) -> ApiResult<ComparisonTable> {
    let ids: Vec<String> = params
        .ids
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect();

    if ids.len() > MAX_SELECTION {
        return Err(AppError::Validation(format!(
            "At most {} idioms can be compared",
            MAX_SELECTION
        )));
    }

    success(comparison::assemble(&ids, &state.catalog))
}
