//! The mutation intent handler.
//!
//! User actions arrive as [`Intent`]s and are turned into a new
//! [`DraftSet`]. Committed assignments are never touched. An intent whose
//! precondition does not hold (a stale double click, a pair that was
//! committed meanwhile) is not an error: it comes back as
//! [`IntentResult::Ignored`] with the reason and the caller keeps its
//! current drafts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
  aggregate::SnapshotIndex,
  draft::{ApplicantDraft, DraftMark, DraftSet, MatchDraft, MatchKey},
  record::Snapshot,
  summary::MatchStatus,
};

// ─── Intents ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Intent {
  /// Stage an assignment. Hours default to the position's standard hours.
  Assign {
    position_code: String,
    utorid:        String,
    #[serde(default)]
    hours:         Option<f64>,
  },
  Unassign {
    position_code: String,
    utorid:        String,
  },
  ToggleStar {
    position_code: String,
    utorid:        String,
  },
  Hide {
    position_code: String,
    utorid:        String,
  },
  Unhide {
    position_code: String,
    utorid:        String,
  },
  HideFromAll {
    utorid: String,
  },
  UnhideFromAll {
    utorid: String,
  },
  /// Change the hours of a staged assignment.
  SetHours {
    position_code: String,
    utorid:        String,
    hours:         f64,
  },
  /// Replace the applicant's note; `None` or blank clears it.
  SetNote {
    utorid: String,
    #[serde(default)]
    note:   Option<String>,
  },
}

impl Intent {
  pub fn action(&self) -> &'static str {
    match self {
      Self::Assign { .. } => "assign",
      Self::Unassign { .. } => "unassign",
      Self::ToggleStar { .. } => "toggle-star",
      Self::Hide { .. } => "hide",
      Self::Unhide { .. } => "unhide",
      Self::HideFromAll { .. } => "hide-from-all",
      Self::UnhideFromAll { .. } => "unhide-from-all",
      Self::SetHours { .. } => "set-hours",
      Self::SetNote { .. } => "set-note",
    }
  }

  /// The pair this intent targets, if it is pair-scoped.
  pub fn key(&self) -> Option<MatchKey> {
    match self.target() {
      Target::Pair(key, _) => Some(key),
      Target::Applicant(_) => None,
    }
  }

  fn target(&self) -> Target<'_> {
    fn pair(code: &str, utorid: &str, action: PairAction) -> Target<'static> {
      Target::Pair(MatchKey::new(code, utorid), action)
    }
    match self {
      Self::Assign {
        position_code,
        utorid,
        hours,
      } => pair(position_code, utorid, PairAction::Assign(*hours)),
      Self::Unassign {
        position_code,
        utorid,
      } => pair(position_code, utorid, PairAction::Unassign),
      Self::ToggleStar {
        position_code,
        utorid,
      } => pair(position_code, utorid, PairAction::ToggleStar),
      Self::Hide {
        position_code,
        utorid,
      } => pair(position_code, utorid, PairAction::Hide),
      Self::Unhide {
        position_code,
        utorid,
      } => pair(position_code, utorid, PairAction::Unhide),
      Self::SetHours {
        position_code,
        utorid,
        hours,
      } => pair(position_code, utorid, PairAction::SetHours(*hours)),
      Self::HideFromAll { .. } => {
        Target::Applicant(ApplicantAction::HideFromAll(true))
      }
      Self::UnhideFromAll { .. } => {
        Target::Applicant(ApplicantAction::HideFromAll(false))
      }
      Self::SetNote { note, .. } => {
        Target::Applicant(ApplicantAction::SetNote(note.as_deref()))
      }
    }
  }

  pub fn utorid(&self) -> &str {
    match self {
      Self::Assign { utorid, .. }
      | Self::Unassign { utorid, .. }
      | Self::ToggleStar { utorid, .. }
      | Self::Hide { utorid, .. }
      | Self::Unhide { utorid, .. }
      | Self::HideFromAll { utorid }
      | Self::UnhideFromAll { utorid }
      | Self::SetHours { utorid, .. }
      | Self::SetNote { utorid, .. } => utorid,
    }
  }
}

/// An intent split into what it targets and what it does there.
enum Target<'a> {
  Pair(MatchKey, PairAction),
  Applicant(ApplicantAction<'a>),
}

#[derive(Clone, Copy)]
enum PairAction {
  Assign(Option<f64>),
  Unassign,
  ToggleStar,
  Hide,
  Unhide,
  SetHours(f64),
}

#[derive(Clone, Copy)]
enum ApplicantAction<'a> {
  HideFromAll(bool),
  SetNote(Option<&'a str>),
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// Why an intent was not applied.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
  #[error("position not found: {0}")]
  UnknownPosition(String),

  #[error("applicant not found: {0}")]
  UnknownApplicant(String),

  #[error("invalid hours: {0}")]
  InvalidHours(f64),

  #[error("cannot {action} a pair whose status is {status}")]
  Precondition {
    action: &'static str,
    status: MatchStatus,
  },
}

#[derive(Debug, Clone, PartialEq)]
pub enum IntentResult {
  Applied(DraftSet),
  Ignored(Rejection),
}

impl IntentResult {
  pub fn is_applied(&self) -> bool { matches!(self, Self::Applied(_)) }
}

// ─── Handler ─────────────────────────────────────────────────────────────────

/// Apply `intent` against the current records and drafts.
pub fn apply_intent(
  snapshot: &Snapshot,
  drafts: &DraftSet,
  intent: &Intent,
) -> IntentResult {
  match try_apply(snapshot, drafts, intent) {
    Ok(next) => IntentResult::Applied(next),
    Err(rejection) => {
      tracing::debug!(
        action = intent.action(),
        utorid = intent.utorid(),
        %rejection,
        "ignoring intent"
      );
      IntentResult::Ignored(rejection)
    }
  }
}

fn check_hours(hours: f64) -> Result<f64, Rejection> {
  if hours.is_finite() && hours >= 0.0 {
    Ok(hours)
  } else {
    Err(Rejection::InvalidHours(hours))
  }
}

fn require(
  action: &'static str,
  status: MatchStatus,
  allowed: bool,
) -> Result<(), Rejection> {
  if allowed {
    Ok(())
  } else {
    Err(Rejection::Precondition { action, status })
  }
}

fn try_apply(
  snapshot: &Snapshot,
  drafts: &DraftSet,
  intent: &Intent,
) -> Result<DraftSet, Rejection> {
  let index = SnapshotIndex::build(snapshot);
  let utorid = intent.utorid();
  let applicant = index
    .applicant_by_utorid(utorid)
    .ok_or_else(|| Rejection::UnknownApplicant(utorid.to_owned()))?;

  let (key, pair_action) = match intent.target() {
    Target::Pair(key, action) => (key, action),
    Target::Applicant(action) => {
      let mut draft = drafts
        .applicant(utorid)
        .cloned()
        .unwrap_or_else(|| ApplicantDraft::new(utorid));
      match action {
        ApplicantAction::HideFromAll(hidden) => {
          draft.hidden_from_all = Some(hidden);
        }
        ApplicantAction::SetNote(note) => {
          let note = note.map(str::trim).filter(|n| !n.is_empty());
          draft.note = Some(note.map(String::from));
        }
      }
      return Ok(drafts.with_applicant(draft));
    }
  };

  let position = index
    .position_by_code(&key.position_code)
    .ok_or_else(|| Rejection::UnknownPosition(key.position_code.clone()))?;
  let status = index.status_of(applicant, position, drafts);
  let action = intent.action();
  let mut draft = drafts
    .get(&key)
    .cloned()
    .unwrap_or_else(|| MatchDraft::blank(key));

  match pair_action {
    PairAction::Assign(hours) => {
      require(action, status, status.can_be_assigned())?;
      draft.hours = check_hours(hours.unwrap_or(position.hours_per_assignment))?;
      draft.staged_assigned = true;
      draft.mark = DraftMark::None;
    }
    PairAction::Unassign => {
      require(action, status, status == MatchStatus::StagedAssigned)?;
      draft.staged_assigned = false;
      draft.hours = 0.0;
    }
    PairAction::ToggleStar => {
      draft.mark = match status {
        MatchStatus::Applied => DraftMark::Starred,
        MatchStatus::Starred => DraftMark::None,
        _ => return Err(Rejection::Precondition { action, status }),
      };
    }
    PairAction::Hide => {
      require(action, status, !status.is_terminal())?;
      draft.staged_assigned = false;
      draft.hours = 0.0;
      draft.mark = DraftMark::Hidden;
    }
    PairAction::Unhide => {
      // Hidden by hide-from-all alone has no pair mark to clear.
      require(action, status, status == MatchStatus::Hidden && draft.is_hidden())?;
      draft.mark = DraftMark::None;
    }
    PairAction::SetHours(hours) => {
      require(action, status, status == MatchStatus::StagedAssigned)?;
      draft.hours = check_hours(hours)?;
    }
  }

  Ok(drafts.with_match(draft))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn intents_parse_from_tagged_json() {
    let intent: Intent = serde_json::from_str(
      r#"{"action":"assign","position_code":"CSC148","utorid":"u1"}"#,
    )
    .unwrap();
    assert_eq!(intent, Intent::Assign {
      position_code: "CSC148".into(),
      utorid:        "u1".into(),
      hours:         None,
    });
    assert_eq!(intent.key(), Some(MatchKey::new("CSC148", "u1")));

    let intent: Intent =
      serde_json::from_str(r#"{"action":"hide-from-all","utorid":"u2"}"#)
        .unwrap();
    assert_eq!(intent.key(), None);
    assert_eq!(intent.utorid(), "u2");
  }

  #[test]
  fn rejection_messages() {
    let r = Rejection::Precondition {
      action: "assign",
      status: MatchStatus::Assigned,
    };
    assert_eq!(r.to_string(), "cannot assign a pair whose status is assigned");
  }
}
