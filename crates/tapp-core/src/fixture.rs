//! Record builders shared by the unit tests.

use crate::{
  record::{Applicant, Application, Position, PositionPreference},
  summary::{ApplicantSummary, Guarantee, MatchStatus, MatchableAssignment},
};

pub fn applicant(id: i64, utorid: &str, first: &str, last: &str) -> Applicant {
  Applicant {
    id,
    utorid: utorid.into(),
    first_name: first.into(),
    last_name: last.into(),
    email: Some(format!("{utorid}@example.com")),
    student_number: None,
    phone: None,
  }
}

pub fn position(id: i64, code: &str, hours: f64) -> Position {
  Position {
    id,
    position_code: code.into(),
    position_title: None,
    hours_per_assignment: hours,
    desired_num_assignments: 1,
    start_date: None,
    end_date: None,
    session_id: Some(1),
  }
}

pub fn application(id: i64, applicant_id: i64) -> Application {
  Application {
    id,
    applicant_id,
    session_id: Some(1),
    program: None,
    department: None,
    yip: None,
    gpa: None,
    comments: None,
    position_preferences: Vec::new(),
    instructor_preferences: Vec::new(),
    documents: Vec::new(),
  }
}

pub fn preference(position_id: i64, application_id: i64, level: i32) -> PositionPreference {
  PositionPreference {
    position_id,
    application_id,
    preference_level: level,
  }
}

/// A summary with one match per entry, on positions numbered from 1.
pub fn summary_with(
  applicant: Applicant,
  matches: &[(MatchStatus, f64)],
) -> ApplicantSummary {
  let matches = matches
    .iter()
    .enumerate()
    .map(|(i, (status, hours))| MatchableAssignment {
      position_id:    i as i64 + 1,
      position_code:  format!("POS{}", i + 1),
      utorid:         applicant.utorid.clone(),
      status:         *status,
      hours_assigned: *hours,
      min_hours:      0.0,
      max_hours:      *hours,
    })
    .collect();
  ApplicantSummary {
    applicant,
    application: None,
    note: None,
    hidden_from_all: false,
    guarantee: Guarantee::default(),
    matches,
  }
}

/// Edit the summary's application, creating an empty one if needed.
pub fn with_application(
  summary: &mut ApplicantSummary,
  edit: impl FnOnce(&mut Application),
) {
  let id = summary.applicant.id;
  let app = summary
    .application
    .get_or_insert_with(|| application(id * 100, id));
  edit(app);
}
