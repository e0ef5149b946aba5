//! The sort engine.
//!
//! A sort list is applied back to front with a stable sort at each step, so
//! the first criterion in the list ends up as the primary key and later ones
//! only break its ties. Each criterion fixes where missing values go
//! independently of the direction flag.

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

use crate::{
  Error, Result,
  guarantee::{hours_assigned, remaining_hours},
  record::Position,
  summary::ApplicantSummary,
  vocabulary::Vocabulary,
};

// ─── Criteria ────────────────────────────────────────────────────────────────

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
  IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SortCriterion {
  Program,
  Department,
  Yip,
  Gpa,
  TaPreference,
  InstructorPreference,
  TotalHours,
  RemainingHours,
  FirstName,
  LastName,
}

impl SortCriterion {
  pub fn requires_position(self) -> bool {
    matches!(self, Self::TaPreference | Self::InstructorPreference)
  }
}

/// One entry of a sort list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
  pub criterion: SortCriterion,
  #[serde(default = "ascending")]
  pub ascending: bool,
}

fn ascending() -> bool { true }

impl SortSpec {
  pub fn asc(criterion: SortCriterion) -> Self {
    Self {
      criterion,
      ascending: true,
    }
  }

  pub fn desc(criterion: SortCriterion) -> Self {
    Self {
      criterion,
      ascending: false,
    }
  }
}

impl fmt::Display for SortSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let dir = if self.ascending { "asc" } else { "desc" };
    write!(f, "{}:{dir}", self.criterion)
  }
}

/// Parses `criterion`, `criterion:asc` or `criterion:desc`.
impl FromStr for SortSpec {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let (name, dir) = match s.trim().split_once(':') {
      Some((name, dir)) => (name.trim(), Some(dir)),
      None => (s.trim(), None),
    };
    let criterion = name
      .parse()
      .map_err(|_| Error::UnknownCriterion(name.to_owned()))?;
    let ascending = match dir.map(str::trim) {
      None | Some("asc") => true,
      Some("desc") => false,
      Some(other) => {
        return Err(Error::InvalidFilterValue {
          category: "sort direction",
          value:    other.to_owned(),
        });
      }
    };
    Ok(Self {
      criterion,
      ascending,
    })
  }
}

// ─── Comparison helpers ──────────────────────────────────────────────────────

fn directed(ord: Ordering, ascending: bool) -> Ordering {
  if ascending { ord } else { ord.reverse() }
}

/// Present values ordered by direction; missing values always last.
fn missing_last<T>(
  a: Option<T>,
  b: Option<T>,
  ascending: bool,
  cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
  match (a, b) {
    (Some(a), Some(b)) => directed(cmp(&a, &b), ascending),
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => Ordering::Equal,
  }
}

/// Present values ordered by direction; missing values always first.
fn missing_first<T>(
  a: Option<T>,
  b: Option<T>,
  ascending: bool,
  cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
  match (a, b) {
    (Some(a), Some(b)) => directed(cmp(&a, &b), ascending),
    (Some(_), None) => Ordering::Greater,
    (None, Some(_)) => Ordering::Less,
    (None, None) => Ordering::Equal,
  }
}

/// Where a program falls relative to the known priority list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum ProgramTier {
  Known(usize),
  Unknown,
  Missing,
}

fn program_tier(summary: &ApplicantSummary, vocabulary: &Vocabulary) -> ProgramTier {
  match summary.program() {
    None => ProgramTier::Missing,
    Some(p) => vocabulary
      .program_rank(p)
      .map_or(ProgramTier::Unknown, ProgramTier::Known),
  }
}

fn compare_programs(
  a: ProgramTier,
  b: ProgramTier,
  ascending: bool,
) -> Ordering {
  match (a, b) {
    (ProgramTier::Known(a), ProgramTier::Known(b)) => directed(a.cmp(&b), ascending),
    (a, b) => a.cmp(&b),
  }
}

fn name_key(summary: &ApplicantSummary, last_first: bool) -> String {
  let a = &summary.applicant;
  let key = if last_first {
    format!("{}, {}", a.last_name, a.first_name)
  } else {
    format!("{}, {}", a.first_name, a.last_name)
  };
  key.to_lowercase()
}

/// Compare two summaries under one criterion.
pub fn compare(
  spec: SortSpec,
  a: &ApplicantSummary,
  b: &ApplicantSummary,
  position: Option<&Position>,
  vocabulary: &Vocabulary,
) -> Ordering {
  let asc = spec.ascending;
  match spec.criterion {
    SortCriterion::Program => compare_programs(
      program_tier(a, vocabulary),
      program_tier(b, vocabulary),
      asc,
    ),
    SortCriterion::Department => {
      missing_last(a.department(), b.department(), asc, |x, y| x.cmp(y))
    }
    SortCriterion::Yip => missing_last(a.yip(), b.yip(), asc, |x, y| x.cmp(y)),
    SortCriterion::Gpa => {
      missing_last(a.gpa(), b.gpa(), asc, |x, y| x.total_cmp(y))
    }
    SortCriterion::TaPreference => match position {
      Some(p) => missing_first(
        a.ta_preference(p),
        b.ta_preference(p),
        asc,
        |x, y| x.cmp(y),
      ),
      None => Ordering::Equal,
    },
    SortCriterion::InstructorPreference => match position {
      Some(p) => missing_first(
        a.instructor_preference(p),
        b.instructor_preference(p),
        asc,
        |x, y| x.total_cmp(y),
      ),
      None => Ordering::Equal,
    },
    SortCriterion::TotalHours => {
      let hours = |s: &ApplicantSummary| {
        (!s.matches.is_empty()).then(|| hours_assigned(s))
      };
      missing_last(hours(a), hours(b), asc, |x, y| x.total_cmp(y))
    }
    SortCriterion::RemainingHours => missing_last(
      remaining_hours(a),
      remaining_hours(b),
      asc,
      |x, y| x.total_cmp(y),
    ),
    SortCriterion::FirstName => {
      directed(name_key(a, false).cmp(&name_key(b, false)), asc)
    }
    SortCriterion::LastName => {
      directed(name_key(a, true).cmp(&name_key(b, true)), asc)
    }
  }
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Sort `items` in place by `sorts`, first entry most significant.
///
/// Returns [`Error::PositionRequired`] if a preference criterion is listed
/// and `position` is `None`; `items` is untouched in that case.
pub fn apply_sorts(
  items: &mut [&ApplicantSummary],
  sorts: &[SortSpec],
  position: Option<&Position>,
  vocabulary: &Vocabulary,
) -> Result<()> {
  if position.is_none()
    && let Some(spec) = sorts.iter().find(|s| s.criterion.requires_position())
  {
    return Err(Error::PositionRequired(spec.criterion.into()));
  }

  for spec in sorts.iter().rev() {
    items.sort_by(|a, b| compare(*spec, a, b, position, vocabulary));
  }
  Ok(())
}
