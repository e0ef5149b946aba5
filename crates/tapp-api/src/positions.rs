//! Handlers for `/positions` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/positions` | Position records in input order |
//! | `GET`  | `/positions/{code}/applicants` | Filtered, sorted candidates; 404 for an unknown code |
//!
//! Exclusion lists and the sort list are comma-separated. In
//! `exclude_program` and `exclude_department` an empty segment names the
//! blank bucket, so `exclude_program=U,` excludes `U` and applicants with no
//! program. Omitting `exclude_status` keeps the default exclusion of hidden
//! pairs; passing it empty shows them.

use std::{fmt::Display, str::FromStr};

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::Deserialize;
use tapp_core::{
  filter::FilterSpec,
  record::Position,
  session::ApplicantRow,
  sort::SortSpec,
  store::RecordSource,
};

use crate::{AppState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /positions`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Position>>, ApiError>
where
  S: RecordSource,
{
  let session = state.session.lock().await;
  Ok(Json(session.snapshot().positions.clone()))
}

// ─── Applicants ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ApplicantsParams {
  pub exclude_program:               Option<String>,
  pub exclude_department:            Option<String>,
  /// Preference buckets, e.g. `-1,other`.
  pub exclude_ta_preference:         Option<String>,
  pub exclude_instructor_preference: Option<String>,
  /// Match statuses, e.g. `hidden,assigned`.
  pub exclude_status:                Option<String>,
  /// Fulfillment statuses, e.g. `over,n/a`.
  pub exclude_fulfillment:           Option<String>,
  /// Sort criteria, primary first, e.g. `program,gpa:desc`.
  pub sort:                          Option<String>,
}

impl ApplicantsParams {
  fn filter_spec(&self) -> Result<FilterSpec, ApiError> {
    let mut spec = FilterSpec::unfiltered();
    spec.program = raw_list(self.exclude_program.as_deref());
    spec.department = raw_list(self.exclude_department.as_deref());
    spec.ta_preference =
      parse_list("exclude_ta_preference", self.exclude_ta_preference.as_deref())?;
    spec.instructor_preference = parse_list(
      "exclude_instructor_preference",
      self.exclude_instructor_preference.as_deref(),
    )?;
    spec.status = match self.exclude_status.as_deref() {
      Some(raw) => parse_list("exclude_status", Some(raw))?,
      None => FilterSpec::default().status,
    };
    spec.hour_fulfillment =
      parse_list("exclude_fulfillment", self.exclude_fulfillment.as_deref())?;
    Ok(spec)
  }

  fn sort_specs(&self) -> Result<Vec<SortSpec>, ApiError> {
    parse_list("sort", self.sort.as_deref())
  }
}

/// Split a comma-separated list, keeping empty segments.
fn raw_list(raw: Option<&str>) -> Vec<String> {
  raw
    .map(|s| s.split(',').map(|t| t.trim().to_owned()).collect())
    .unwrap_or_default()
}

/// Split and parse a comma-separated list, skipping empty segments.
fn parse_list<T>(field: &str, raw: Option<&str>) -> Result<Vec<T>, ApiError>
where
  T: FromStr,
  T::Err: Display,
{
  raw
    .into_iter()
    .flat_map(|s| s.split(','))
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(|t| {
      t.parse().map_err(|e| ApiError::invalid_param(field, t, e))
    })
    .collect()
}

/// `GET /positions/{code}/applicants[?exclude_...=...][&sort=...]`
pub async fn applicants<S>(
  State(state): State<AppState<S>>,
  Path(code): Path<String>,
  Query(params): Query<ApplicantsParams>,
) -> Result<Json<Vec<ApplicantRow>>, ApiError>
where
  S: RecordSource,
{
  let filters = params.filter_spec()?;
  let sorts = params.sort_specs()?;
  let rows = state
    .session
    .lock()
    .await
    .position_view(&code, &filters, &sorts)?;
  Ok(Json(rows))
}

#[cfg(test)]
mod tests {
  use tapp_core::{
    filter::PreferenceBucket,
    guarantee::FulfillmentStatus,
    sort::SortCriterion,
    summary::MatchStatus,
  };

  use super::*;

  #[test]
  fn omitted_params_give_default_filters() {
    let spec = ApplicantsParams::default().filter_spec().unwrap();
    assert_eq!(spec, FilterSpec::default());
  }

  #[test]
  fn lists_parse_per_category() {
    let params = ApplicantsParams {
      exclude_program: Some("U, ".into()),
      exclude_ta_preference: Some("-1,other".into()),
      exclude_status: Some("".into()),
      exclude_fulfillment: Some("n/a,over".into()),
      sort: Some("program,gpa:desc".into()),
      ..ApplicantsParams::default()
    };
    let spec = params.filter_spec().unwrap();
    assert_eq!(spec.program, vec!["U".to_owned(), String::new()]);
    assert_eq!(spec.ta_preference, vec![
      PreferenceBucket::Level(-1),
      PreferenceBucket::Other
    ]);
    assert!(spec.status.is_empty());
    assert_eq!(spec.hour_fulfillment, vec![
      FulfillmentStatus::NotApplicable,
      FulfillmentStatus::Over
    ]);
    assert_eq!(params.sort_specs().unwrap(), vec![
      SortSpec::asc(SortCriterion::Program),
      SortSpec::desc(SortCriterion::Gpa)
    ]);
  }

  #[test]
  fn bad_values_are_bad_requests() {
    let params = ApplicantsParams {
      exclude_status: Some("hidden,bogus".into()),
      ..ApplicantsParams::default()
    };
    assert!(matches!(params.filter_spec(), Err(ApiError::BadRequest(_))));

    let params = ApplicantsParams {
      sort: Some("shoe-size".into()),
      ..ApplicantsParams::default()
    };
    assert!(matches!(params.sort_specs(), Err(ApiError::BadRequest(_))));

    let status: Vec<MatchStatus> =
      parse_list("exclude_status", Some("staged-assigned")).unwrap();
    assert_eq!(status, vec![MatchStatus::StagedAssigned]);
  }
}
