//! Bulk import API endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::import::{self, ImportPlan};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub text: String,
}

/// Classified lines plus the counts shown above the preview table.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreview {
    #[serde(flatten)]
    pub plan: ImportPlan,
    pub ready_count: usize,
    pub duplicate_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct CommitRequest {
    pub plan: ImportPlan,
}

#[derive(Debug, Serialize)]
pub struct CommitOutcome {
    pub imported: usize,
}

/// POST /api/import/preview - Classify pasted lines without importing.
pub async fn preview_import(
    State(state): State<AppState>,
    Json(request): Json<PreviewRequest>,
) -> ApiResult<ImportPreview> {
    let plan = {
        let collection = state.collection.lock().await;
        import::parse(&request.text, &collection, &state.catalog)
    };

    success(ImportPreview {
        ready_count: plan.ready_count(),
        duplicate_count: plan.duplicate_count(),
        plan,
    })
}

/// POST /api/import/commit - Import the ready lines of a preview.
///
/// Linkage is resolved again against the catalog; the plan only selects words.
pub async fn commit_import(
    State(state): State<AppState>,
    Json(request): Json<CommitRequest>,
) -> ApiResult<CommitOutcome> {
    let mut collection = state.collection.lock().await;
    let imported = import::commit(request.plan, &mut collection, &state.catalog).await?;
    success(CommitOutcome { imported })
}
