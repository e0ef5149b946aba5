//! The data aggregator: raw records + drafts → [`ApplicantSummary`] list.
//!
//! Aggregation is a pure function of its inputs. Records that reference
//! something missing from the snapshot (an unknown position, an unknown
//! applicant) are dropped with a trace event and the rest of the pass
//! proceeds.

use std::collections::{BTreeMap, HashMap};

use crate::{
  draft::{DraftSet, MatchDraft, MatchKey},
  record::{
    Applicant, ApplicantMatchingDatum, Application, Assignment, Position,
    Snapshot,
  },
  status::{resolve_hours, resolve_status},
  summary::{ApplicantSummary, Guarantee, MatchStatus, MatchableAssignment},
};

// ─── Application merge ───────────────────────────────────────────────────────

/// Merge several applications by one applicant into a single logical view.
///
/// Scalar fields come from the first application. Documents and both
/// preference lists are concatenated in input order, and non-empty comments
/// are joined with a blank line. A single application is returned unchanged.
pub fn merge_applications<'a>(
  applications: impl IntoIterator<Item = &'a Application>,
) -> Option<Application> {
  let mut iter = applications.into_iter();
  let mut merged = iter.next()?.clone();
  let rest: Vec<&Application> = iter.collect();
  if rest.is_empty() {
    return Some(merged);
  }

  let mut comments: Vec<&str> = Vec::new();
  let first_comments = merged.comments.take();
  if let Some(c) = first_comments.as_deref()
    && !c.trim().is_empty()
  {
    comments.push(c);
  }

  for app in &rest {
    merged.documents.extend(app.documents.iter().cloned());
    merged
      .position_preferences
      .extend(app.position_preferences.iter().cloned());
    merged
      .instructor_preferences
      .extend(app.instructor_preferences.iter().cloned());
    if let Some(c) = app.comments.as_deref()
      && !c.trim().is_empty()
    {
      comments.push(c);
    }
  }

  merged.comments = (!comments.is_empty()).then(|| comments.join("\n\n"));
  Some(merged)
}

// ─── Lookup tables ───────────────────────────────────────────────────────────

/// Borrowed lookup tables over one snapshot.
pub(crate) struct SnapshotIndex<'a> {
  /// Position id → (input order, position).
  positions_by_id:      HashMap<i64, (usize, &'a Position)>,
  positions_by_code:    HashMap<&'a str, (usize, &'a Position)>,
  applicants_by_id:     HashMap<i64, &'a Applicant>,
  applicants_by_utorid: HashMap<&'a str, &'a Applicant>,
  matching_data:        HashMap<i64, &'a ApplicantMatchingDatum>,
  /// Applicant id → assignments whose position exists.
  assignments:          HashMap<i64, Vec<&'a Assignment>>,
}

impl<'a> SnapshotIndex<'a> {
  pub(crate) fn build(snapshot: &'a Snapshot) -> Self {
    let positions_by_id = snapshot
      .positions
      .iter()
      .enumerate()
      .map(|(i, p)| (p.id, (i, p)))
      .collect();
    let positions_by_code = snapshot
      .positions
      .iter()
      .enumerate()
      .map(|(i, p)| (p.position_code.as_str(), (i, p)))
      .collect();
    let applicants_by_id: HashMap<i64, &Applicant> =
      snapshot.applicants.iter().map(|a| (a.id, a)).collect();
    let applicants_by_utorid = snapshot
      .applicants
      .iter()
      .map(|a| (a.utorid.as_str(), a))
      .collect();

    let mut matching_data = HashMap::new();
    for datum in &snapshot.matching_data {
      matching_data.entry(datum.applicant_id).or_insert(datum);
    }

    let mut index = Self {
      positions_by_id,
      positions_by_code,
      applicants_by_id,
      applicants_by_utorid,
      matching_data,
      assignments: HashMap::new(),
    };

    for assignment in &snapshot.assignments {
      if !index.applicants_by_id.contains_key(&assignment.applicant_id)
        || !index.positions_by_id.contains_key(&assignment.position_id)
      {
        tracing::warn!(
          assignment_id = assignment.id,
          applicant_id = assignment.applicant_id,
          position_id = assignment.position_id,
          "dropping assignment with unknown applicant or position"
        );
        continue;
      }
      index
        .assignments
        .entry(assignment.applicant_id)
        .or_default()
        .push(assignment);
    }

    index
  }

  pub(crate) fn position_by_code(&self, code: &str) -> Option<&'a Position> {
    self.positions_by_code.get(code).map(|(_, p)| *p)
  }

  pub(crate) fn applicant_by_utorid(&self, utorid: &str) -> Option<&'a Applicant> {
    self.applicants_by_utorid.get(utorid).copied()
  }

  fn committed_for(&self, applicant_id: i64, position_id: i64) -> Vec<&'a Assignment> {
    self
      .assignments
      .get(&applicant_id)
      .map(|list| {
        list
          .iter()
          .filter(|a| a.position_id == position_id)
          .copied()
          .collect()
      })
      .unwrap_or_default()
  }

  /// Whether the applicant is hidden from every position, after applying
  /// any staged override.
  pub(crate) fn hidden_from_all(&self, applicant: &Applicant, drafts: &DraftSet) -> bool {
    drafts
      .applicant(&applicant.utorid)
      .and_then(|d| d.hidden_from_all)
      .unwrap_or_else(|| {
        self
          .matching_data
          .get(&applicant.id)
          .is_some_and(|d| d.hidden)
      })
  }

  /// Resolve the status of a single pair without building full summaries.
  pub(crate) fn status_of(
    &self,
    applicant: &Applicant,
    position: &Position,
    drafts: &DraftSet,
  ) -> MatchStatus {
    let committed = self.committed_for(applicant.id, position.id);
    let key = MatchKey::new(&position.position_code, &applicant.utorid);
    resolve_status(
      &committed,
      drafts.get(&key),
      self.hidden_from_all(applicant, drafts),
    )
  }
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

/// Build one [`ApplicantSummary`] per applicant, in applicant input order.
pub fn aggregate(snapshot: &Snapshot, drafts: &DraftSet) -> Vec<ApplicantSummary> {
  let index = SnapshotIndex::build(snapshot);

  let mut applications: HashMap<i64, Vec<&Application>> = HashMap::new();
  for application in &snapshot.applications {
    if !index.applicants_by_id.contains_key(&application.applicant_id) {
      tracing::debug!(
        application_id = application.id,
        applicant_id = application.applicant_id,
        "dropping application with unknown applicant"
      );
      continue;
    }
    applications
      .entry(application.applicant_id)
      .or_default()
      .push(application);
  }

  let mut match_drafts: HashMap<&str, Vec<&MatchDraft>> = HashMap::new();
  for draft in drafts.matches() {
    if index.position_by_code(&draft.key.position_code).is_none()
      || index.applicant_by_utorid(&draft.key.utorid).is_none()
    {
      tracing::debug!(
        position_code = %draft.key.position_code,
        utorid = %draft.key.utorid,
        "ignoring draft for unknown pair"
      );
      continue;
    }
    match_drafts
      .entry(draft.key.utorid.as_str())
      .or_default()
      .push(draft);
  }

  snapshot
    .applicants
    .iter()
    .map(|applicant| {
      let merged = applications
        .get(&applicant.id)
        .and_then(|apps| merge_applications(apps.iter().copied()))
        .map(|app| drop_unknown_positions(app, &index));
      let drafts_for = match_drafts
        .get(applicant.utorid.as_str())
        .map(Vec::as_slice)
        .unwrap_or_default();
      summarize(applicant, merged, drafts_for, drafts, &index)
    })
    .collect()
}

fn drop_unknown_positions(mut app: Application, index: &SnapshotIndex<'_>) -> Application {
  let before = app.position_preferences.len() + app.instructor_preferences.len();
  app
    .position_preferences
    .retain(|p| index.positions_by_id.contains_key(&p.position_id));
  app
    .instructor_preferences
    .retain(|p| index.positions_by_id.contains_key(&p.position_id));
  let dropped =
    before - app.position_preferences.len() - app.instructor_preferences.len();
  if dropped > 0 {
    tracing::debug!(
      application_id = app.id,
      dropped,
      "dropped preferences for unknown positions"
    );
  }
  app
}

fn summarize(
  applicant: &Applicant,
  application: Option<Application>,
  match_drafts: &[&MatchDraft],
  drafts: &DraftSet,
  index: &SnapshotIndex<'_>,
) -> ApplicantSummary {
  // Position input order → position, so matches come out in a stable order.
  let mut pairs: BTreeMap<usize, &Position> = BTreeMap::new();

  if let Some(committed) = index.assignments.get(&applicant.id) {
    for assignment in committed {
      if let Some((order, position)) = index.positions_by_id.get(&assignment.position_id) {
        pairs.insert(*order, *position);
      }
    }
  }
  for draft in match_drafts {
    if let Some((order, position)) =
      index.positions_by_code.get(draft.key.position_code.as_str())
    {
      pairs.insert(*order, *position);
    }
  }
  if let Some(app) = &application {
    for pref in &app.position_preferences {
      if let Some((order, position)) = index.positions_by_id.get(&pref.position_id) {
        pairs.insert(*order, *position);
      }
    }
  }

  let hidden_from_all = index.hidden_from_all(applicant, drafts);
  let matches = pairs
    .into_values()
    .map(|position| {
      let committed = index.committed_for(applicant.id, position.id);
      let key = MatchKey::new(&position.position_code, &applicant.utorid);
      let draft = drafts.get(&key);
      let status = resolve_status(&committed, draft, hidden_from_all);
      MatchableAssignment {
        position_id:    position.id,
        position_code:  position.position_code.clone(),
        utorid:         applicant.utorid.clone(),
        status,
        hours_assigned: resolve_hours(status, &committed, draft),
        min_hours:      0.0,
        max_hours:      position.hours_per_assignment,
      }
    })
    .collect();

  let datum = index.matching_data.get(&applicant.id);
  let note = match drafts.applicant(&applicant.utorid).and_then(|d| d.note.clone()) {
    Some(staged) => staged,
    None => datum.and_then(|d| d.note.clone()),
  };

  ApplicantSummary {
    applicant: applicant.clone(),
    application,
    note,
    hidden_from_all,
    guarantee: Guarantee {
      min_hours_owed:           datum.and_then(|d| d.min_hours_owed),
      previous_hours_fulfilled: datum.and_then(|d| d.prev_hours_fulfilled),
    },
    matches,
  }
}
