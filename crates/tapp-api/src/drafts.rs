//! Handlers for draft state and the store round trip.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/drafts` | Current draft set |
//! | `POST` | `/drafts/commit` | Persist staged drafts, then refetch |
//! | `POST` | `/refresh` | Refetch the snapshot |

use axum::{Json, extract::State};
use serde::Serialize;
use tapp_core::{
  draft::{DraftSetView, MatchKey},
  record::Assignment,
  store::RecordSource,
};

use crate::{AppState, error::ApiError};

// ─── Get ──────────────────────────────────────────────────────────────────────

/// `GET /drafts`
pub async fn get_all<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<DraftSetView>, ApiError>
where
  S: RecordSource,
{
  let session = state.session.lock().await;
  Ok(Json(DraftSetView::from(session.drafts())))
}

// ─── Commit ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CommitOutcome {
  pub committed: Vec<Assignment>,
}

/// `POST /drafts/commit`
///
/// The session stays locked from reading the staged drafts until the
/// refetched snapshot is installed, so no intent can touch a draft that is
/// being persisted. Drafts are unstaged once the store accepts them, even if
/// the refetch then fails.
pub async fn commit<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<CommitOutcome>, ApiError>
where
  S: RecordSource,
{
  let mut session = state.session.lock().await;
  let pending = session.pending_commits();
  if pending.is_empty() {
    return Ok(Json(CommitOutcome {
      committed: Vec::new(),
    }));
  }

  let (keys, batch): (Vec<MatchKey>, Vec<_>) =
    pending.into_iter().map(|p| (p.key, p.assignment)).unzip();
  let committed = state
    .store
    .commit_assignments(batch)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(count = committed.len(), "committed staged drafts");
  // The batch is persisted; a failed refetch must not leave it staged.
  session.clear_committed(&keys);

  let ticket = session.begin_fetch();
  let snapshot = state.store.fetch_snapshot().await.map_err(ApiError::store)?;
  session.install_snapshot(ticket, snapshot);

  Ok(Json(CommitOutcome { committed }))
}

// ─── Refresh ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RefreshOutcome {
  /// `false` when a newer fetch was installed first.
  pub installed: bool,
}

/// `POST /refresh`
pub async fn refresh<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<RefreshOutcome>, ApiError>
where
  S: RecordSource,
{
  let installed = state.refresh().await?;
  Ok(Json(RefreshOutcome { installed }))
}
