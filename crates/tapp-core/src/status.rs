//! Status resolution for a single (applicant, position) pair.
//!
//! Committed state always wins over staged state, and staged state wins over
//! the user's star/hide marks:
//!
//! | Committed | Draft | Result |
//! |-----------|-------|--------|
//! | any visible assignment | any | `assigned` |
//! | only rejected/withdrawn | any | `unassignable` |
//! | none | staged | `staged-assigned` |
//! | none | hidden, or applicant hidden from all | `hidden` |
//! | none | starred | `starred` |
//! | none | none | `applied` |

use crate::{draft::MatchDraft, record::Assignment, summary::MatchStatus};

/// Resolve the status of one pair. `committed` holds every assignment on
/// record for the pair, in any offer state.
pub fn resolve_status(
  committed: &[&Assignment],
  draft: Option<&MatchDraft>,
  hidden_from_all: bool,
) -> MatchStatus {
  if committed.iter().any(|a| a.is_visible()) {
    return MatchStatus::Assigned;
  }
  if !committed.is_empty() {
    return MatchStatus::Unassignable;
  }
  match draft {
    Some(d) if d.staged_assigned => MatchStatus::StagedAssigned,
    Some(d) if d.is_hidden() => MatchStatus::Hidden,
    _ if hidden_from_all => MatchStatus::Hidden,
    Some(d) if d.is_starred() => MatchStatus::Starred,
    _ => MatchStatus::Applied,
  }
}

/// Hours a pair contributes, given its status.
pub fn resolve_hours(
  status: MatchStatus,
  committed: &[&Assignment],
  draft: Option<&MatchDraft>,
) -> f64 {
  match status {
    MatchStatus::Assigned => committed
      .iter()
      .filter(|a| a.is_visible())
      .map(|a| a.hours)
      .sum(),
    MatchStatus::StagedAssigned => draft.map_or(0.0, |d| d.hours),
    _ => 0.0,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    draft::{DraftMark, MatchKey},
    record::OfferStatus,
  };

  fn assignment(status: OfferStatus) -> Assignment {
    Assignment {
      id:                  1,
      applicant_id:        1,
      position_id:         1,
      hours:               54.0,
      start_date:          None,
      end_date:            None,
      active_offer_status: status,
      note:                None,
    }
  }

  fn draft(staged: bool, mark: DraftMark) -> MatchDraft {
    MatchDraft {
      key: MatchKey::new("CSC148", "u1"),
      hours: if staged { 30.0 } else { 0.0 },
      staged_assigned: staged,
      mark,
    }
  }

  #[test]
  fn committed_outranks_drafts() {
    let accepted = assignment(OfferStatus::Accepted);
    let staged = draft(true, DraftMark::None);
    assert_eq!(
      resolve_status(&[&accepted], Some(&staged), true),
      MatchStatus::Assigned
    );
  }

  #[test]
  fn withdrawn_only_is_unassignable_even_when_hidden() {
    let withdrawn = assignment(OfferStatus::Withdrawn);
    let hidden = draft(false, DraftMark::Hidden);
    assert_eq!(
      resolve_status(&[&withdrawn], Some(&hidden), false),
      MatchStatus::Unassignable
    );
  }

  #[test]
  fn visible_assignment_wins_over_rejected_sibling() {
    let rejected = assignment(OfferStatus::Rejected);
    let pending = assignment(OfferStatus::Pending);
    assert_eq!(
      resolve_status(&[&rejected, &pending], None, false),
      MatchStatus::Assigned
    );
    assert_eq!(
      resolve_hours(MatchStatus::Assigned, &[&rejected, &pending], None),
      54.0
    );
  }

  #[test]
  fn staged_outranks_hidden_from_all() {
    let staged = draft(true, DraftMark::None);
    assert_eq!(
      resolve_status(&[], Some(&staged), true),
      MatchStatus::StagedAssigned
    );
    assert_eq!(
      resolve_hours(MatchStatus::StagedAssigned, &[], Some(&staged)),
      30.0
    );
  }

  #[test]
  fn hidden_from_all_outranks_star() {
    let starred = draft(false, DraftMark::Starred);
    assert_eq!(
      resolve_status(&[], Some(&starred), true),
      MatchStatus::Hidden
    );
    assert_eq!(
      resolve_status(&[], Some(&starred), false),
      MatchStatus::Starred
    );
  }

  #[test]
  fn nothing_recorded_is_applied() {
    assert_eq!(resolve_status(&[], None, false), MatchStatus::Applied);
    assert_eq!(resolve_hours(MatchStatus::Applied, &[], None), 0.0);
  }
}
