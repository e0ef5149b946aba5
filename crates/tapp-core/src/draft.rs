//! Staged, not-yet-persisted matching state.
//!
//! Drafts are the only records the engine writes. A [`DraftSet`] is an
//! immutable value: every accepted intent produces a new set with a bumped
//! revision, which is what the session memo keys on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ─── Keys ────────────────────────────────────────────────────────────────────

/// Identifies one (position, applicant) pair.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MatchKey {
  pub position_code: String,
  pub utorid:        String,
}

impl MatchKey {
  pub fn new(position_code: impl Into<String>, utorid: impl Into<String>) -> Self {
    Self {
      position_code: position_code.into(),
      utorid:        utorid.into(),
    }
  }
}

// ─── Match drafts ────────────────────────────────────────────────────────────

/// The user's flag on a pair. Starred and hidden are one field so they can
/// never both be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftMark {
  #[default]
  None,
  Starred,
  Hidden,
}

/// A staged proposal for one pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDraft {
  pub key:             MatchKey,
  /// Hours proposed; zero unless `staged_assigned`.
  pub hours:           f64,
  pub staged_assigned: bool,
  #[serde(default)]
  pub mark:            DraftMark,
}

impl MatchDraft {
  /// A draft carrying no state, equivalent to the pair being absent.
  pub fn blank(key: MatchKey) -> Self {
    Self {
      key,
      hours: 0.0,
      staged_assigned: false,
      mark: DraftMark::None,
    }
  }

  pub fn is_starred(&self) -> bool { self.mark == DraftMark::Starred }

  pub fn is_hidden(&self) -> bool { self.mark == DraftMark::Hidden }
}

// ─── Applicant drafts ────────────────────────────────────────────────────────

/// Applicant-level overrides of the committed matching datum.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApplicantDraft {
  pub utorid:          String,
  /// `Some(None)` clears the committed note.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub note:            Option<Option<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub hidden_from_all: Option<bool>,
}

impl ApplicantDraft {
  pub fn new(utorid: impl Into<String>) -> Self {
    Self {
      utorid: utorid.into(),
      ..Self::default()
    }
  }
}

// ─── Draft set ───────────────────────────────────────────────────────────────

/// All staged state for a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftSet {
  revision:   u64,
  matches:    BTreeMap<MatchKey, MatchDraft>,
  applicants: BTreeMap<String, ApplicantDraft>,
}

impl DraftSet {
  pub fn new() -> Self { Self::default() }

  /// Incremented on every accepted change.
  pub fn revision(&self) -> u64 { self.revision }

  pub fn get(&self, key: &MatchKey) -> Option<&MatchDraft> {
    self.matches.get(key)
  }

  pub fn applicant(&self, utorid: &str) -> Option<&ApplicantDraft> {
    self.applicants.get(utorid)
  }

  pub fn matches(&self) -> impl Iterator<Item = &MatchDraft> {
    self.matches.values()
  }

  pub fn applicants(&self) -> impl Iterator<Item = &ApplicantDraft> {
    self.applicants.values()
  }

  /// Drafts that are currently staged for assignment.
  pub fn staged(&self) -> impl Iterator<Item = &MatchDraft> {
    self.matches.values().filter(|d| d.staged_assigned)
  }

  pub fn is_empty(&self) -> bool {
    self.matches.is_empty() && self.applicants.is_empty()
  }

  /// Return a new set with `draft` stored under its key.
  pub fn with_match(&self, draft: MatchDraft) -> Self {
    let mut next = self.clone();
    next.revision += 1;
    next.matches.insert(draft.key.clone(), draft);
    next
  }

  /// Return a new set with `draft` stored for its applicant.
  pub fn with_applicant(&self, draft: ApplicantDraft) -> Self {
    let mut next = self.clone();
    next.revision += 1;
    next.applicants.insert(draft.utorid.clone(), draft);
    next
  }

  /// Return a new set where the given staged drafts are no longer staged.
  /// Used once the collaborator has persisted them as assignments.
  pub fn without_staged<'a>(
    &self,
    keys: impl IntoIterator<Item = &'a MatchKey>,
  ) -> Self {
    let mut next = self.clone();
    next.revision += 1;
    for key in keys {
      if let Some(draft) = next.matches.get_mut(key) {
        draft.staged_assigned = false;
        draft.hours = 0.0;
      }
    }
    next
  }
}

// ─── Serialisable view ───────────────────────────────────────────────────────

/// Flat form of a [`DraftSet`] for JSON output; map keys are structs and do
/// not serialise as JSON object keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftSetView {
  pub revision:   u64,
  pub matches:    Vec<MatchDraft>,
  pub applicants: Vec<ApplicantDraft>,
}

impl From<&DraftSet> for DraftSetView {
  fn from(set: &DraftSet) -> Self {
    Self {
      revision:   set.revision,
      matches:    set.matches.values().cloned().collect(),
      applicants: set.applicants.values().cloned().collect(),
    }
  }
}
