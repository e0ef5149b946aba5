//! Hour-guarantee accounting across all of an applicant's matches.
//!
//! Every comparison rounds to two decimal places first, so sums such as
//! `0.1 + 0.2` compare equal to `0.3`.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::summary::ApplicantSummary;

/// How an applicant's assigned hours compare to their guarantee.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FulfillmentStatus {
  Over,
  Matched,
  Under,
  Empty,
  /// No guarantee is owed.
  #[serde(rename = "n/a")]
  #[strum(to_string = "n/a")]
  NotApplicable,
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 { (value * 100.0).round() / 100.0 }

/// Sum of hours over matches that are assigned or staged-assigned.
pub fn hours_assigned(summary: &ApplicantSummary) -> f64 {
  summary
    .matches
    .iter()
    .filter(|m| m.status.counts_hours())
    .map(|m| m.hours_assigned)
    .sum()
}

pub fn total_owed(summary: &ApplicantSummary) -> Option<f64> {
  summary.guarantee.min_hours_owed
}

/// Hours still owed after previous and current assignments; negative when
/// over-assigned. `None` without a guarantee.
pub fn remaining_hours(summary: &ApplicantSummary) -> Option<f64> {
  let owed = total_owed(summary)?;
  let previous = summary.guarantee.previous_hours_fulfilled.unwrap_or(0.0);
  Some(round2(owed - previous - hours_assigned(summary)))
}

pub fn fulfillment_status(summary: &ApplicantSummary) -> FulfillmentStatus {
  let owed = match total_owed(summary).map(round2) {
    Some(owed) if owed != 0.0 => owed,
    _ => return FulfillmentStatus::NotApplicable,
  };
  let previous = summary.guarantee.previous_hours_fulfilled.unwrap_or(0.0);
  let filled = round2(hours_assigned(summary) + previous);

  if filled == owed {
    FulfillmentStatus::Matched
  } else if filled > owed {
    FulfillmentStatus::Over
  } else if filled == 0.0 {
    FulfillmentStatus::Empty
  } else {
    FulfillmentStatus::Under
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    fixture::{applicant, summary_with},
    summary::{Guarantee, MatchStatus},
  };

  fn with_guarantee(
    owed: Option<f64>,
    previous: Option<f64>,
    matches: &[(MatchStatus, f64)],
  ) -> ApplicantSummary {
    let mut s = summary_with(applicant(1, "u1", "Ada", "Lovelace"), matches);
    s.guarantee = Guarantee {
      min_hours_owed:           owed,
      previous_hours_fulfilled: previous,
    };
    s
  }

  #[test]
  fn hidden_and_applied_hours_do_not_count() {
    let s = with_guarantee(None, None, &[
      (MatchStatus::StagedAssigned, 60.0),
      (MatchStatus::StagedAssigned, 40.0),
      (MatchStatus::Hidden, 100.0),
      (MatchStatus::Applied, 20.0),
    ]);
    assert_eq!(hours_assigned(&s), 100.0);
  }

  #[test]
  fn committed_and_staged_both_count() {
    let s = with_guarantee(None, None, &[
      (MatchStatus::Assigned, 54.0),
      (MatchStatus::StagedAssigned, 30.5),
      (MatchStatus::Unassignable, 70.0),
    ]);
    assert_eq!(hours_assigned(&s), 84.5);
  }

  #[test]
  fn no_guarantee_is_not_applicable() {
    let s = with_guarantee(None, None, &[(MatchStatus::Assigned, 10.0)]);
    assert_eq!(fulfillment_status(&s), FulfillmentStatus::NotApplicable);
    let s = with_guarantee(Some(0.0), Some(5.0), &[]);
    assert_eq!(fulfillment_status(&s), FulfillmentStatus::NotApplicable);
    assert_eq!(remaining_hours(&with_guarantee(None, None, &[])), None);
  }

  #[test]
  fn fulfillment_buckets() {
    let cases = [
      (&[(MatchStatus::Assigned, 60.0)][..], Some(0.0), FulfillmentStatus::Under),
      (&[(MatchStatus::Assigned, 60.0)][..], Some(60.0), FulfillmentStatus::Matched),
      (&[(MatchStatus::Assigned, 60.0)][..], Some(80.0), FulfillmentStatus::Over),
      (&[][..], None, FulfillmentStatus::Empty),
    ];
    for (matches, previous, expected) in cases {
      let s = with_guarantee(Some(120.0), previous, matches);
      assert_eq!(fulfillment_status(&s), expected, "{matches:?} {previous:?}");
    }
  }

  #[test]
  fn rounding_absorbs_float_noise() {
    let s = with_guarantee(Some(0.3), None, &[
      (MatchStatus::StagedAssigned, 0.1),
      (MatchStatus::StagedAssigned, 0.2),
    ]);
    assert_eq!(fulfillment_status(&s), FulfillmentStatus::Matched);
    assert_eq!(remaining_hours(&s), Some(0.0));
  }

  #[test]
  fn status_strings() {
    assert_eq!(FulfillmentStatus::NotApplicable.to_string(), "n/a");
    assert_eq!(
      "matched".parse::<FulfillmentStatus>().unwrap(),
      FulfillmentStatus::Matched
    );
  }
}
