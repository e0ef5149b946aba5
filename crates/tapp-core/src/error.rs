//! Error types for `tapp-core`.
//!
//! Only caller bugs and unparseable input surface here. Precondition
//! violations on intents are values ([`crate::intent::Rejection`]), and
//! malformed records are dropped during aggregation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A filter or sort category that is relative to a position was used
  /// without one.
  #[error("{0} requires a position")]
  PositionRequired(&'static str),

  #[error("position not found: {0}")]
  UnknownPosition(String),

  #[error("unknown sort criterion: {0:?}")]
  UnknownCriterion(String),

  #[error("invalid {category} value: {value:?}")]
  InvalidFilterValue {
    category: &'static str,
    value:    String,
  },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
