//! JSON REST API for the TAPP matching engine.
//!
//! Exposes an axum [`Router`] over a [`MatchSession`] whose records come from
//! any [`tapp_core::store::RecordSource`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", tapp_api::api_router(state.clone()))
//! ```

pub mod drafts;
pub mod error;
pub mod intents;
pub mod positions;
pub mod summaries;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use tapp_core::{session::MatchSession, store::RecordSource, vocabulary::Vocabulary};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:   Arc<S>,
  pub session: Arc<Mutex<MatchSession>>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:   Arc::clone(&self.store),
      session: Arc::clone(&self.session),
    }
  }
}

impl<S> AppState<S>
where
  S: RecordSource,
{
  /// Build state over `store` and load the first snapshot.
  pub async fn load(store: Arc<S>, vocabulary: Vocabulary) -> Result<Self, ApiError> {
    let state = Self {
      store,
      session: Arc::new(Mutex::new(MatchSession::new(vocabulary))),
    };
    state.refresh().await?;
    Ok(state)
  }

  /// Fetch a fresh snapshot and install it unless a later fetch got there
  /// first. The session lock is not held while the store is queried.
  pub async fn refresh(&self) -> Result<bool, ApiError> {
    let ticket = self.session.lock().await.begin_fetch();
    let snapshot = self.store.fetch_snapshot().await.map_err(ApiError::store)?;
    Ok(self.session.lock().await.install_snapshot(ticket, snapshot))
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: RecordSource + 'static,
{
  Router::new()
    // Records and views
    .route("/positions", get(positions::list::<S>))
    .route("/positions/{code}/applicants", get(positions::applicants::<S>))
    .route("/summaries", get(summaries::list::<S>))
    // Drafts
    .route("/intents", post(intents::apply::<S>))
    .route("/drafts", get(drafts::get_all::<S>))
    .route("/drafts/commit", post(drafts::commit::<S>))
    .route("/refresh", post(drafts::refresh::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
