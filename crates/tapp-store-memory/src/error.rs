//! Error type for `tapp-store-memory`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] tapp_core::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("applicant not found: {0}")]
  UnknownApplicant(i64),

  #[error("position not found: {0}")]
  UnknownPosition(i64),

  /// The pair already has an assignment that is not rejected or withdrawn.
  #[error("applicant {applicant_id} already holds an assignment for position {position_id}")]
  DuplicateAssignment { applicant_id: i64, position_id: i64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
