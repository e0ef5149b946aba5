//! The filter engine.
//!
//! A [`FilterSpec`] lists, per category, the values the user has unchecked.
//! Each category is an independent predicate and an applicant must pass all
//! of them. Filtering never copies: the result borrows from the input.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

use crate::{
  Error, Result,
  guarantee::{FulfillmentStatus, fulfillment_status},
  record::Position,
  summary::{ApplicantSummary, MatchStatus},
  vocabulary::{EMPTY, OTHER, Vocabulary},
};

// ─── Categories ──────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Display,
  EnumString,
  AsRefStr,
  IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum FilterCategory {
  Program,
  Department,
  TaPreference,
  InstructorPreference,
  Status,
  HourFulfillment,
}

impl FilterCategory {
  pub const ALL: [Self; 6] = [
    Self::Program,
    Self::Department,
    Self::TaPreference,
    Self::InstructorPreference,
    Self::Status,
    Self::HourFulfillment,
  ];

  /// Categories evaluated relative to a position.
  pub fn requires_position(self) -> bool {
    matches!(
      self,
      Self::TaPreference | Self::InstructorPreference | Self::Status
    )
  }
}

// ─── Preference buckets ──────────────────────────────────────────────────────

/// A preference filter value: a concrete level, or `other` for "no
/// preference recorded".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PreferenceBucket {
  Level(i32),
  Other,
}

impl PreferenceBucket {
  pub fn of_level(level: Option<i32>) -> Self {
    level.map_or(Self::Other, Self::Level)
  }

  /// Instructor ratings are averaged; the bucket is the nearest level.
  pub fn of_average(average: Option<f64>) -> Self {
    average.map_or(Self::Other, |avg| Self::Level(avg.round() as i32))
  }
}

impl fmt::Display for PreferenceBucket {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Level(level) => write!(f, "{level}"),
      Self::Other => f.write_str(OTHER),
    }
  }
}

impl FromStr for PreferenceBucket {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let s = s.trim();
    if s.eq_ignore_ascii_case(OTHER) {
      return Ok(Self::Other);
    }
    s.parse().map(Self::Level).map_err(|_| Error::InvalidFilterValue {
      category: "preference",
      value:    s.to_owned(),
    })
  }
}

impl TryFrom<String> for PreferenceBucket {
  type Error = Error;

  fn try_from(value: String) -> Result<Self> { value.parse() }
}

impl From<PreferenceBucket> for String {
  fn from(bucket: PreferenceBucket) -> Self { bucket.to_string() }
}

// ─── Spec ────────────────────────────────────────────────────────────────────

/// Excluded values per category. An empty list leaves the category inactive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
  #[serde(default)]
  pub program:               Vec<String>,
  #[serde(default)]
  pub department:            Vec<String>,
  #[serde(default)]
  pub ta_preference:         Vec<PreferenceBucket>,
  #[serde(default)]
  pub instructor_preference: Vec<PreferenceBucket>,
  #[serde(default)]
  pub status:                Vec<MatchStatus>,
  #[serde(default)]
  pub hour_fulfillment:      Vec<FulfillmentStatus>,
}

impl Default for FilterSpec {
  /// Hidden applicants are filtered out until the user asks for them.
  fn default() -> Self {
    Self {
      status: vec![MatchStatus::Hidden],
      ..Self::unfiltered()
    }
  }
}

impl FilterSpec {
  /// A spec with every category inactive.
  pub fn unfiltered() -> Self {
    Self {
      program:               Vec::new(),
      department:            Vec::new(),
      ta_preference:         Vec::new(),
      instructor_preference: Vec::new(),
      status:                Vec::new(),
      hour_fulfillment:      Vec::new(),
    }
  }

  fn is_active(&self, category: FilterCategory) -> bool {
    match category {
      FilterCategory::Program => !self.program.is_empty(),
      FilterCategory::Department => !self.department.is_empty(),
      FilterCategory::TaPreference => !self.ta_preference.is_empty(),
      FilterCategory::InstructorPreference => {
        !self.instructor_preference.is_empty()
      }
      FilterCategory::Status => !self.status.is_empty(),
      FilterCategory::HourFulfillment => !self.hour_fulfillment.is_empty(),
    }
  }

  /// Check that every active position-relative category has a position.
  fn validate(&self, position: Option<&Position>) -> Result<()> {
    if position.is_some() {
      return Ok(());
    }
    FilterCategory::ALL
      .into_iter()
      .find(|c| c.requires_position() && self.is_active(*c))
      .map_or(Ok(()), |c| Err(Error::PositionRequired(c.into())))
  }
}

// ─── Predicates ──────────────────────────────────────────────────────────────

/// Shared rule for program and department: excluded when the value itself is
/// excluded, or when `other` is excluded and the value is non-empty but not
/// known. Blank values are the `""` bucket.
fn enumerated_passes(
  value: Option<&str>,
  excluded: &[String],
  is_known: impl Fn(&str) -> bool,
) -> bool {
  let bucket = value.unwrap_or(EMPTY);
  if excluded.iter().any(|e| e.trim() == bucket) {
    return false;
  }
  match value {
    Some(v) if !is_known(v) => !excluded.iter().any(|e| e.trim() == OTHER),
    _ => true,
  }
}

pub fn program_passes(
  summary: &ApplicantSummary,
  excluded: &[String],
  vocabulary: &Vocabulary,
) -> bool {
  enumerated_passes(summary.program(), excluded, |p| {
    vocabulary.is_known_program(p)
  })
}

pub fn department_passes(
  summary: &ApplicantSummary,
  excluded: &[String],
  vocabulary: &Vocabulary,
) -> bool {
  enumerated_passes(summary.department(), excluded, |d| {
    vocabulary.is_known_department(d)
  })
}

pub fn ta_preference_passes(
  summary: &ApplicantSummary,
  excluded: &[PreferenceBucket],
  position: &Position,
) -> bool {
  let bucket = PreferenceBucket::of_level(summary.ta_preference(position));
  !excluded.contains(&bucket)
}

pub fn instructor_preference_passes(
  summary: &ApplicantSummary,
  excluded: &[PreferenceBucket],
  position: &Position,
) -> bool {
  let bucket =
    PreferenceBucket::of_average(summary.instructor_preference(position));
  !excluded.contains(&bucket)
}

/// Applicants who are not candidates for `position` have no status and pass.
pub fn status_passes(
  summary: &ApplicantSummary,
  excluded: &[MatchStatus],
  position: &Position,
) -> bool {
  summary
    .status_for(position)
    .is_none_or(|status| !excluded.contains(&status))
}

pub fn fulfillment_passes(
  summary: &ApplicantSummary,
  excluded: &[FulfillmentStatus],
) -> bool {
  !excluded.contains(&fulfillment_status(summary))
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Keep the summaries that pass every active category.
///
/// Returns [`Error::PositionRequired`] if a position-relative category is
/// active and `position` is `None`.
pub fn apply_filters<'a>(
  summaries: &'a [ApplicantSummary],
  spec: &FilterSpec,
  position: Option<&Position>,
  vocabulary: &Vocabulary,
) -> Result<Vec<&'a ApplicantSummary>> {
  spec.validate(position)?;

  Ok(
    summaries
      .iter()
      .filter(|s| {
        (spec.program.is_empty() || program_passes(s, &spec.program, vocabulary))
          && (spec.department.is_empty()
            || department_passes(s, &spec.department, vocabulary))
          && (spec.hour_fulfillment.is_empty()
            || fulfillment_passes(s, &spec.hour_fulfillment))
          && position.is_none_or(|p| {
            ta_preference_passes(s, &spec.ta_preference, p)
              && instructor_preference_passes(s, &spec.instructor_preference, p)
              && status_passes(s, &spec.status, p)
          })
      })
      .collect(),
  )
}
