//! Tests for `MemoryStore` seeded from an inline fixture.

use tapp_core::{
  record::{NewAssignment, OfferStatus},
  store::RecordSource,
};

use crate::{Error, MemoryStore};

const FIXTURE: &str = r#"{
  "positions": [
    { "id": 1, "position_code": "CSC148", "hours_per_assignment": 60,
      "start_date": "2026-09-01", "end_date": "2026-12-20" },
    { "id": 2, "position_code": "CSC108", "hours_per_assignment": 40 }
  ],
  "applicants": [
    { "id": 1, "utorid": "u1", "first_name": "Ada", "last_name": "Lovelace" },
    { "id": 2, "utorid": "u2", "first_name": "Alan", "last_name": "Turing" }
  ],
  "applications": [
    { "id": 10, "applicant_id": 1, "program": "P",
      "position_preferences": [
        { "position_id": 1, "application_id": 10, "preference_level": 3 }
      ] }
  ],
  "assignments": [
    { "id": 7, "applicant_id": 2, "position_id": 1, "hours": 60,
      "active_offer_status": "withdrawn" }
  ]
}"#;

fn store() -> MemoryStore {
  MemoryStore::from_json(FIXTURE).expect("fixture parses")
}

fn new_assignment(applicant_id: i64, position_id: i64) -> NewAssignment {
  NewAssignment {
    applicant_id,
    position_id,
    hours: 30.0,
    start_date: None,
    end_date: None,
  }
}

// ─── Fetch ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_returns_fixture_records() {
  let s = store();
  let snapshot = s.fetch_snapshot().await.unwrap();
  assert_eq!(snapshot.positions.len(), 2);
  assert_eq!(snapshot.applicants.len(), 2);
  assert_eq!(snapshot.applications[0].position_preferences.len(), 1);
  assert_eq!(
    snapshot.assignments[0].active_offer_status,
    OfferStatus::Withdrawn
  );
  assert!(snapshot.matching_data.is_empty());
  assert_eq!(
    snapshot.positions[0].start_date,
    chrono::NaiveDate::from_ymd_opt(2026, 9, 1)
  );
}

#[tokio::test]
async fn malformed_fixture_is_rejected() {
  let result = MemoryStore::from_json(r#"{ "positions": [ { "id": 1 } ] }"#);
  assert!(matches!(result, Err(Error::Core(_))));
}

#[tokio::test]
async fn open_missing_file_is_io_error() {
  let result = MemoryStore::open("/nonexistent/tapp-fixture.json").await;
  assert!(matches!(result, Err(Error::Io(_))));
}

// ─── Commit ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn commit_appends_with_fresh_ids() {
  let s = store();
  let created = s
    .commit_assignments(vec![new_assignment(1, 1), new_assignment(1, 2)])
    .await
    .unwrap();
  assert_eq!(created.len(), 2);
  assert_eq!(created[0].id, 8);
  assert_eq!(created[1].id, 9);
  assert!(created.iter().all(|a| a.active_offer_status == OfferStatus::None));

  let snapshot = s.fetch_snapshot().await.unwrap();
  assert_eq!(snapshot.assignments.len(), 3);
}

#[tokio::test]
async fn withdrawn_assignment_does_not_block_a_new_one() {
  let s = store();
  let created = s
    .commit_assignments(vec![new_assignment(2, 1)])
    .await
    .unwrap();
  assert_eq!(created[0].applicant_id, 2);
}

#[tokio::test]
async fn duplicate_visible_assignment_rejects_whole_batch() {
  let s = store();
  s.commit_assignments(vec![new_assignment(1, 1)])
    .await
    .unwrap();

  let result = s
    .commit_assignments(vec![new_assignment(1, 2), new_assignment(1, 1)])
    .await;
  assert!(matches!(
    result,
    Err(Error::DuplicateAssignment {
      applicant_id: 1,
      position_id:  1,
    })
  ));
  assert_eq!(s.fetch_snapshot().await.unwrap().assignments.len(), 2);
}

#[tokio::test]
async fn duplicate_within_one_batch_is_rejected() {
  let s = store();
  let result = s
    .commit_assignments(vec![new_assignment(1, 2), new_assignment(1, 2)])
    .await;
  assert!(matches!(result, Err(Error::DuplicateAssignment { .. })));
}

#[tokio::test]
async fn unknown_references_are_rejected() {
  let s = store();
  assert!(matches!(
    s.commit_assignments(vec![new_assignment(42, 1)]).await,
    Err(Error::UnknownApplicant(42))
  ));
  assert!(matches!(
    s.commit_assignments(vec![new_assignment(1, 42)]).await,
    Err(Error::UnknownPosition(42))
  ));
}

#[tokio::test]
async fn clones_share_records() {
  let s = store();
  let other = s.clone();
  s.commit_assignments(vec![new_assignment(1, 2)])
    .await
    .unwrap();
  assert_eq!(other.fetch_snapshot().await.unwrap().assignments.len(), 2);
}

#[tokio::test]
async fn demo_fixture_loads() {
  let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/fixture.json");
  let s = MemoryStore::open(path).await.unwrap();
  let snapshot = s.fetch_snapshot().await.unwrap();
  assert_eq!(snapshot.positions.len(), 3);
  assert_eq!(snapshot.matching_data.len(), 2);
}
