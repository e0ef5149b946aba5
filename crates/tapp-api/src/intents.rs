//! Handler for `POST /intents`.
//!
//! The body is a tagged intent such as
//! `{"action":"assign","position_code":"CSC148","utorid":"u1"}`. An intent
//! whose precondition fails is not an HTTP error: the response reports
//! `applied: false` with the reason and the drafts stay as they were.

use axum::{Json, extract::State};
use serde::Serialize;
use tapp_core::{intent::Intent, store::RecordSource};

use crate::{AppState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct IntentOutcome {
  pub applied:  bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub reason:   Option<String>,
  /// Draft revision after the intent.
  pub revision: u64,
}

/// `POST /intents`
pub async fn apply<S>(
  State(state): State<AppState<S>>,
  Json(intent): Json<Intent>,
) -> Result<Json<IntentOutcome>, ApiError>
where
  S: RecordSource,
{
  let mut session = state.session.lock().await;
  let reason = session.apply(&intent).err().map(|r| r.to_string());
  Ok(Json(IntentOutcome {
    applied: reason.is_none(),
    reason,
    revision: session.drafts().revision(),
  }))
}
