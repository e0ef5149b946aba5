//! In-memory record store for the TAPP matching engine.
//!
//! Holds a single [`Snapshot`](tapp_core::record::Snapshot) behind an async
//! lock, seeded from a JSON fixture. Committed drafts are appended as new
//! assignments. Nothing is written back to disk.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::MemoryStore;

#[cfg(test)]
mod tests;
