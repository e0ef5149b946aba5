//! Derived per-applicant views. Never stored; recomputed by
//! [`crate::aggregate::aggregate`] whenever records or drafts change.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::record::{Applicant, Application, Position};

// ─── Status ──────────────────────────────────────────────────────────────────

/// The resolved state of one (applicant, position) pair.
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
pub enum MatchStatus {
  Applied,
  Starred,
  StagedAssigned,
  Assigned,
  Unassignable,
  Hidden,
}

impl MatchStatus {
  /// `assigned` and `unassignable` can only change through the external
  /// assignments subsystem.
  pub fn is_terminal(self) -> bool {
    matches!(self, Self::Assigned | Self::Unassignable)
  }

  pub fn can_be_assigned(self) -> bool {
    matches!(self, Self::Hidden | Self::Applied | Self::Starred)
  }

  /// Whether this pair's hours count toward the applicant's total.
  pub fn counts_hours(self) -> bool {
    matches!(self, Self::Assigned | Self::StagedAssigned)
  }
}

// ─── Match ───────────────────────────────────────────────────────────────────

/// The resolved match state of one applicant for one position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchableAssignment {
  pub position_id:    i64,
  pub position_code:  String,
  pub utorid:         String,
  pub status:         MatchStatus,
  pub hours_assigned: f64,
  /// Lower bound offered to hour editors.
  pub min_hours:      f64,
  /// Upper bound offered to hour editors; the position's standard hours.
  pub max_hours:      f64,
}

// ─── Summary ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Guarantee {
  pub min_hours_owed:           Option<f64>,
  pub previous_hours_fulfilled: Option<f64>,
}

/// The matching unit: one applicant with their merged application and every
/// pair they take part in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantSummary {
  pub applicant:       Applicant,
  /// All of the applicant's applications merged; `None` if they never
  /// applied.
  pub application:     Option<Application>,
  pub note:            Option<String>,
  pub hidden_from_all: bool,
  pub guarantee:       Guarantee,
  pub matches:         Vec<MatchableAssignment>,
}

impl ApplicantSummary {
  pub fn match_for(&self, position: &Position) -> Option<&MatchableAssignment> {
    self.matches.iter().find(|m| m.position_id == position.id)
  }

  /// Resolved status for `position`, or `None` if the applicant is not a
  /// candidate for it at all.
  pub fn status_for(&self, position: &Position) -> Option<MatchStatus> {
    self.match_for(position).map(|m| m.status)
  }

  pub fn program(&self) -> Option<&str> {
    self
      .application
      .as_ref()
      .and_then(|a| a.program.as_deref())
      .map(str::trim)
      .filter(|p| !p.is_empty())
  }

  pub fn department(&self) -> Option<&str> {
    self
      .application
      .as_ref()
      .and_then(|a| a.department.as_deref())
      .map(str::trim)
      .filter(|d| !d.is_empty())
  }

  /// Year in progress; zero counts as missing.
  pub fn yip(&self) -> Option<u32> {
    self.application.as_ref().and_then(|a| a.yip).filter(|y| *y != 0)
  }

  /// GPA; zero counts as missing.
  pub fn gpa(&self) -> Option<f64> {
    self
      .application
      .as_ref()
      .and_then(|a| a.gpa)
      .filter(|g| *g != 0.0 && !g.is_nan())
  }

  /// The applicant's own preference level for `position`. With several
  /// entries (merged applications), the first one wins.
  pub fn ta_preference(&self, position: &Position) -> Option<i32> {
    self
      .application
      .as_ref()?
      .position_preferences
      .iter()
      .find(|p| p.position_id == position.id)
      .map(|p| p.preference_level)
  }

  /// Mean of all instructor ratings for `position`.
  pub fn instructor_preference(&self, position: &Position) -> Option<f64> {
    let levels: Vec<i32> = self
      .application
      .as_ref()?
      .instructor_preferences
      .iter()
      .filter(|p| p.position_id == position.id)
      .map(|p| p.preference_level)
      .collect();
    if levels.is_empty() {
      return None;
    }
    let sum: i64 = levels.iter().map(|l| i64::from(*l)).sum();
    Some(sum as f64 / levels.len() as f64)
  }
}
