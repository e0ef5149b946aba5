//! A matching session: the current snapshot, the draft overlay, and the
//! derived views over both.
//!
//! The two stores are held side by side and passed explicitly into the pure
//! pipeline functions. Summaries are memoised on the pair (snapshot
//! generation, draft revision); since every stage is pure the memo only saves
//! work.
//!
//! Snapshots arrive asynchronously. Each fetch is issued a [`FetchTicket`]
//! and a snapshot is installed only if its ticket is newer than the one
//! currently installed, so a slow fetch can never overwrite a faster, later
//! one.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  aggregate::{SnapshotIndex, aggregate},
  draft::{DraftSet, MatchKey},
  filter::{FilterSpec, apply_filters},
  guarantee::{FulfillmentStatus, fulfillment_status, hours_assigned},
  intent::{Intent, IntentResult, Rejection, apply_intent},
  record::{NewAssignment, Position, Snapshot},
  sort::{SortSpec, apply_sorts},
  summary::{ApplicantSummary, MatchStatus},
  vocabulary::Vocabulary,
};

// ─── Fetch sequencing ────────────────────────────────────────────────────────

/// Sequence number of one snapshot fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl FetchTicket {
  pub fn seq(self) -> u64 { self.0 }
}

/// Issues fetch tickets and remembers the newest one installed.
#[derive(Debug, Default)]
pub struct FetchSequencer {
  issued:    u64,
  installed: u64,
}

impl FetchSequencer {
  pub fn begin(&mut self) -> FetchTicket {
    self.issued += 1;
    FetchTicket(self.issued)
  }

  /// Record `ticket` as installed unless a newer one already is.
  pub fn accept(&mut self, ticket: FetchTicket) -> bool {
    if ticket.0 <= self.installed {
      return false;
    }
    self.installed = ticket.0;
    true
  }

  /// Generation of the installed snapshot; 0 before the first install.
  pub fn installed(&self) -> u64 { self.installed }
}

// ─── Views ───────────────────────────────────────────────────────────────────

/// One row of a position's applicant list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantRow {
  pub summary:        ApplicantSummary,
  /// Status for the viewed position; `None` when not a candidate.
  pub status:         Option<MatchStatus>,
  pub hours_assigned: f64,
  pub fulfillment:    FulfillmentStatus,
}

/// A staged draft ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCommit {
  pub key:        MatchKey,
  pub assignment: NewAssignment,
}

struct Memo {
  key:       (u64, u64),
  summaries: Arc<Vec<ApplicantSummary>>,
}

// ─── Session ─────────────────────────────────────────────────────────────────

pub struct MatchSession {
  vocabulary: Vocabulary,
  snapshot:   Arc<Snapshot>,
  drafts:     DraftSet,
  sequencer:  FetchSequencer,
  memo:       Option<Memo>,
}

impl MatchSession {
  /// An empty session; install a snapshot before expecting any rows.
  pub fn new(vocabulary: Vocabulary) -> Self {
    Self {
      vocabulary,
      snapshot: Arc::new(Snapshot::default()),
      drafts: DraftSet::new(),
      sequencer: FetchSequencer::default(),
      memo: None,
    }
  }

  /// A session with `snapshot` already installed.
  pub fn with_snapshot(snapshot: Snapshot, vocabulary: Vocabulary) -> Self {
    let mut session = Self::new(vocabulary);
    let ticket = session.begin_fetch();
    session.install_snapshot(ticket, snapshot);
    session
  }

  pub fn vocabulary(&self) -> &Vocabulary { &self.vocabulary }

  pub fn snapshot(&self) -> &Arc<Snapshot> { &self.snapshot }

  pub fn drafts(&self) -> &DraftSet { &self.drafts }

  /// Start a fetch; pass the ticket back to [`Self::install_snapshot`].
  pub fn begin_fetch(&mut self) -> FetchTicket { self.sequencer.begin() }

  /// Install a fetched snapshot. Returns `false` and discards it if a newer
  /// fetch has already been installed.
  pub fn install_snapshot(&mut self, ticket: FetchTicket, snapshot: Snapshot) -> bool {
    if !self.sequencer.accept(ticket) {
      tracing::warn!(
        ticket = ticket.seq(),
        installed = self.sequencer.installed(),
        "discarding stale snapshot"
      );
      return false;
    }
    tracing::debug!(
      ticket = ticket.seq(),
      applicants = snapshot.applicants.len(),
      positions = snapshot.positions.len(),
      "installed snapshot"
    );
    self.snapshot = Arc::new(snapshot);
    true
  }

  /// Apply a user intent. On rejection the drafts are left as they were.
  pub fn apply(&mut self, intent: &Intent) -> Result<(), Rejection> {
    match apply_intent(&self.snapshot, &self.drafts, intent) {
      IntentResult::Applied(next) => {
        self.drafts = next;
        Ok(())
      }
      IntentResult::Ignored(rejection) => Err(rejection),
    }
  }

  /// All applicant summaries for the current snapshot and drafts.
  pub fn summaries(&mut self) -> Arc<Vec<ApplicantSummary>> {
    let key = (self.sequencer.installed(), self.drafts.revision());
    if let Some(memo) = &self.memo
      && memo.key == key
    {
      return Arc::clone(&memo.summaries);
    }
    let summaries = Arc::new(aggregate(&self.snapshot, &self.drafts));
    self.memo = Some(Memo {
      key,
      summaries: Arc::clone(&summaries),
    });
    summaries
  }

  pub fn position(&self, code: &str) -> Result<&Position> {
    self
      .snapshot
      .position_by_code(code)
      .ok_or_else(|| Error::UnknownPosition(code.to_owned()))
  }

  /// The filtered, sorted applicant list for one position. Only applicants
  /// who are candidates for the position are listed.
  pub fn position_view(
    &mut self,
    position_code: &str,
    filters: &FilterSpec,
    sorts: &[SortSpec],
  ) -> Result<Vec<ApplicantRow>> {
    let position = self.position(position_code)?.clone();
    let summaries = self.summaries();
    let candidates: Vec<ApplicantSummary> = summaries
      .iter()
      .filter(|s| s.match_for(&position).is_some())
      .cloned()
      .collect();

    let mut rows =
      apply_filters(&candidates, filters, Some(&position), &self.vocabulary)?;
    apply_sorts(&mut rows, sorts, Some(&position), &self.vocabulary)?;

    Ok(
      rows
        .into_iter()
        .map(|s| ApplicantRow {
          summary:        s.clone(),
          status:         s.status_for(&position),
          hours_assigned: hours_assigned(s),
          fulfillment:    fulfillment_status(s),
        })
        .collect(),
    )
  }

  /// Translate every staged draft that is still stageable into an
  /// assignment to create.
  pub fn pending_commits(&self) -> Vec<PendingCommit> {
    let index = SnapshotIndex::build(&self.snapshot);
    self
      .drafts
      .staged()
      .filter_map(|draft| {
        let position = index.position_by_code(&draft.key.position_code)?;
        let applicant = index.applicant_by_utorid(&draft.key.utorid)?;
        if index.status_of(applicant, position, &self.drafts)
          != MatchStatus::StagedAssigned
        {
          return None;
        }
        Some(PendingCommit {
          key:        draft.key.clone(),
          assignment: NewAssignment {
            applicant_id: applicant.id,
            position_id:  position.id,
            hours:        draft.hours,
            start_date:   position.start_date,
            end_date:     position.end_date,
          },
        })
      })
      .collect()
  }

  /// Drop the staged flag of drafts the store has persisted.
  pub fn clear_committed<'a>(&mut self, keys: impl IntoIterator<Item = &'a MatchKey>) {
    self.drafts = self.drafts.without_staged(keys);
  }
}
