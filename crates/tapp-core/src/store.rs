//! The `RecordSource` trait: the engine's view of the persistence layer.
//!
//! The engine reads whole [`Snapshot`]s and, when the user commits, hands
//! back staged drafts as [`NewAssignment`]s. Implemented by storage backends
//! (e.g. `tapp-store-memory`); higher layers (`tapp-api`) depend on this
//! abstraction, not on a concrete backend.

use std::future::Future;

use crate::record::{Assignment, NewAssignment, Snapshot};

/// Abstraction over the TAPP record store.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RecordSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch every record the matching engine needs.
  fn fetch_snapshot(
    &self,
  ) -> impl Future<Output = Result<Snapshot, Self::Error>> + Send + '_;

  /// Persist staged assignments and return the stored records.
  ///
  /// The whole batch is rejected if any entry would create a second visible
  /// assignment for the same (applicant, position) pair.
  fn commit_assignments(
    &self,
    assignments: Vec<NewAssignment>,
  ) -> impl Future<Output = Result<Vec<Assignment>, Self::Error>> + Send + '_;
}
