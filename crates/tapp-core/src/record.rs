//! Raw hiring records as supplied by the persistence collaborator.
//!
//! The engine never mutates these. They are bundled into a [`Snapshot`] per
//! fetch and treated as immutable for the duration of a pipeline pass.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// ─── Identity ────────────────────────────────────────────────────────────────

/// An applicant's identity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
  pub id:             i64,
  pub utorid:         String,
  pub first_name:     String,
  pub last_name:      String,
  #[serde(default)]
  pub email:          Option<String>,
  #[serde(default)]
  pub student_number: Option<String>,
  #[serde(default)]
  pub phone:          Option<String>,
}

// ─── Applications ────────────────────────────────────────────────────────────

/// An applicant's interest rating for a position.
///
/// Levels are small signed integers (observed −1..=3); negative means the
/// applicant would rather not be placed there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionPreference {
  pub position_id:      i64,
  pub application_id:   i64,
  pub preference_level: i32,
}

/// An instructor's rating of an applicant for a position. Same shape as
/// [`PositionPreference`] but kept in its own list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorPreference {
  pub position_id:      i64,
  pub application_id:   i64,
  pub preference_level: i32,
}

/// A file attached to an application (CV, transcript). Only the reference is
/// carried here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
  pub name: String,
  pub url:  String,
}

/// One submission by an applicant for a hiring session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
  pub id:                     i64,
  pub applicant_id:           i64,
  #[serde(default)]
  pub session_id:             Option<i64>,
  #[serde(default)]
  pub program:                Option<String>,
  #[serde(default)]
  pub department:             Option<String>,
  /// Year in progress.
  #[serde(default)]
  pub yip:                    Option<u32>,
  #[serde(default)]
  pub gpa:                    Option<f64>,
  #[serde(default)]
  pub comments:               Option<String>,
  #[serde(default)]
  pub position_preferences:   Vec<PositionPreference>,
  #[serde(default)]
  pub instructor_preferences: Vec<InstructorPreference>,
  #[serde(default)]
  pub documents:              Vec<Document>,
}

// ─── Positions ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
  pub id:                      i64,
  pub position_code:           String,
  #[serde(default)]
  pub position_title:          Option<String>,
  pub hours_per_assignment:    f64,
  #[serde(default)]
  pub desired_num_assignments: u32,
  #[serde(default)]
  pub start_date:              Option<NaiveDate>,
  #[serde(default)]
  pub end_date:                Option<NaiveDate>,
  #[serde(default)]
  pub session_id:              Option<i64>,
}

// ─── Assignments ─────────────────────────────────────────────────────────────

/// State of the most recent offer attached to a committed assignment.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OfferStatus {
  #[default]
  None,
  Provisional,
  Pending,
  Accepted,
  Rejected,
  Withdrawn,
}

impl OfferStatus {
  /// Rejected and withdrawn offers neither count toward hours nor block a
  /// fresh offer in the upstream store.
  pub fn is_visible(self) -> bool {
    !matches!(self, Self::Rejected | Self::Withdrawn)
  }
}

/// A persisted TA assignment. Only the external assignments subsystem may
/// change one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
  pub id:                  i64,
  pub applicant_id:        i64,
  pub position_id:         i64,
  pub hours:               f64,
  #[serde(default)]
  pub start_date:          Option<NaiveDate>,
  #[serde(default)]
  pub end_date:            Option<NaiveDate>,
  #[serde(default)]
  pub active_offer_status: OfferStatus,
  #[serde(default)]
  pub note:                Option<String>,
}

impl Assignment {
  pub fn is_visible(&self) -> bool { self.active_offer_status.is_visible() }
}

/// Input to [`crate::store::RecordSource::commit_assignments`]. The store
/// assigns the id and the initial offer status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAssignment {
  pub applicant_id: i64,
  pub position_id:  i64,
  pub hours:        f64,
  pub start_date:   Option<NaiveDate>,
  pub end_date:     Option<NaiveDate>,
}

// ─── Matching data ───────────────────────────────────────────────────────────

/// Per-session matching bookkeeping for an applicant: the hour guarantee and
/// the committed note and visibility flag.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApplicantMatchingDatum {
  pub applicant_id:         i64,
  #[serde(default)]
  pub min_hours_owed:       Option<f64>,
  #[serde(default)]
  pub prev_hours_fulfilled: Option<f64>,
  #[serde(default)]
  pub note:                 Option<String>,
  /// Hidden from every position.
  #[serde(default)]
  pub hidden:               bool,
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// Everything fetched from the persistence collaborator in one go.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
  #[serde(default)]
  pub positions:     Vec<Position>,
  #[serde(default)]
  pub applicants:    Vec<Applicant>,
  #[serde(default)]
  pub applications:  Vec<Application>,
  #[serde(default)]
  pub assignments:   Vec<Assignment>,
  #[serde(default)]
  pub matching_data: Vec<ApplicantMatchingDatum>,
}

impl Snapshot {
  pub fn position_by_code(&self, code: &str) -> Option<&Position> {
    self.positions.iter().find(|p| p.position_code == code)
  }

  pub fn position_by_id(&self, id: i64) -> Option<&Position> {
    self.positions.iter().find(|p| p.id == id)
  }

  pub fn applicant_by_utorid(&self, utorid: &str) -> Option<&Applicant> {
    self.applicants.iter().find(|a| a.utorid == utorid)
  }

  pub fn applicant_by_id(&self, id: i64) -> Option<&Applicant> {
    self.applicants.iter().find(|a| a.id == id)
  }

  /// Parse a snapshot from its JSON form.
  pub fn from_json(raw: &str) -> crate::Result<Self> {
    Ok(serde_json::from_str(raw)?)
  }
}
