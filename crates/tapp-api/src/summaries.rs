//! Handler for `GET /summaries`: every applicant summary under the current
//! snapshot and drafts, in applicant order.

use axum::{Json, extract::State};
use tapp_core::{store::RecordSource, summary::ApplicantSummary};

use crate::{AppState, error::ApiError};

/// `GET /summaries`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<ApplicantSummary>>, ApiError>
where
  S: RecordSource,
{
  let summaries = state.session.lock().await.summaries();
  Ok(Json(summaries.as_ref().clone()))
}
