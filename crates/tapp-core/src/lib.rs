//! Core types and the matching engine for TAPP.
//!
//! This crate has no HTTP or storage dependencies. It turns
//! a [`Snapshot`](record::Snapshot) of raw hiring records plus a
//! [`DraftSet`](draft::DraftSet) of staged changes into per-applicant
//! [`ApplicantSummary`](summary::ApplicantSummary) views, and filters and
//! sorts those views for a position.

pub mod aggregate;
pub mod draft;
pub mod error;
pub mod filter;
pub mod guarantee;
pub mod intent;
pub mod record;
pub mod session;
pub mod sort;
pub mod status;
pub mod store;
pub mod summary;
pub mod vocabulary;

pub use error::{Error, Result};

#[cfg(test)]
mod fixture;
