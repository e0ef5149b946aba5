//! [`MemoryStore`]: the in-memory implementation of [`RecordSource`].

use std::{collections::HashSet, path::Path, sync::Arc};

use tokio::sync::RwLock;

use tapp_core::{
  record::{Assignment, NewAssignment, OfferStatus, Snapshot},
  store::RecordSource,
};

use crate::{Error, Result};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A record store holding one snapshot in memory.
///
/// Cloning is cheap; clones share the same records.
#[derive(Clone, Default)]
pub struct MemoryStore {
  records: Arc<RwLock<Snapshot>>,
}

impl MemoryStore {
  pub fn from_snapshot(snapshot: Snapshot) -> Self {
    Self {
      records: Arc::new(RwLock::new(snapshot)),
    }
  }

  /// Seed a store from the JSON form of a [`Snapshot`].
  pub fn from_json(raw: &str) -> Result<Self> {
    Ok(Self::from_snapshot(Snapshot::from_json(raw)?))
  }

  /// Seed a store from a JSON fixture file.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let raw = tokio::fs::read_to_string(path.as_ref()).await?;
    let store = Self::from_json(&raw)?;
    {
      let records = store.records.read().await;
      tracing::info!(
        path = %path.as_ref().display(),
        positions = records.positions.len(),
        applicants = records.applicants.len(),
        assignments = records.assignments.len(),
        "loaded fixture"
      );
    }
    Ok(store)
  }
}

/// Check a batch against the current records without changing anything.
fn validate(records: &Snapshot, batch: &[NewAssignment]) -> Result<()> {
  let mut taken: HashSet<(i64, i64)> = records
    .assignments
    .iter()
    .filter(|a| a.is_visible())
    .map(|a| (a.applicant_id, a.position_id))
    .collect();

  for new in batch {
    if records.applicant_by_id(new.applicant_id).is_none() {
      return Err(Error::UnknownApplicant(new.applicant_id));
    }
    if records.position_by_id(new.position_id).is_none() {
      return Err(Error::UnknownPosition(new.position_id));
    }
    if !taken.insert((new.applicant_id, new.position_id)) {
      return Err(Error::DuplicateAssignment {
        applicant_id: new.applicant_id,
        position_id:  new.position_id,
      });
    }
  }
  Ok(())
}

// ─── RecordSource impl ───────────────────────────────────────────────────────

impl RecordSource for MemoryStore {
  type Error = Error;

  async fn fetch_snapshot(&self) -> Result<Snapshot> {
    Ok(self.records.read().await.clone())
  }

  async fn commit_assignments(
    &self,
    assignments: Vec<NewAssignment>,
  ) -> Result<Vec<Assignment>> {
    let mut records = self.records.write().await;
    validate(&records, &assignments)?;

    let mut next_id = records.assignments.iter().map(|a| a.id).max().unwrap_or(0);
    let created: Vec<Assignment> = assignments
      .into_iter()
      .map(|new| {
        next_id += 1;
        Assignment {
          id:                  next_id,
          applicant_id:        new.applicant_id,
          position_id:         new.position_id,
          hours:               new.hours,
          start_date:          new.start_date,
          end_date:            new.end_date,
          active_offer_status: OfferStatus::None,
          note:                None,
        }
      })
      .collect();

    records.assignments.extend(created.iter().cloned());
    tracing::info!(count = created.len(), "committed assignments");
    Ok(created)
  }
}
