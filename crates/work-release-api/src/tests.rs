//! Router-level tests: requests go through the real handlers, engine, and an
//! in-memory SQLite store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Method, Request, StatusCode},
};
use chrono::NaiveDate;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;
use work_release_core::{
  directory::InMemoryDirectory,
  eligibility::ClassificationTier,
  engine::Engine,
};
use work_release_store_sqlite::SqliteStore;

use crate::api_router;

type TestEngine = Engine<SqliteStore, InMemoryDirectory>;

// 2026-10-19 is a Monday.
fn monday() -> NaiveDate { NaiveDate::from_ymd_opt(2026, 10, 19).unwrap() }

struct Harness {
  app:     Router,
  engine:  Arc<TestEngine>,
  officer: Uuid,
}

impl Harness {
  async fn new() -> Self {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let engine = Arc::new(Engine::new(store, InMemoryDirectory::new()).with_clock(monday));
    Self { app: api_router(engine.clone()), engine, officer: Uuid::new_v4() }
  }

  async fn call(
    &self,
    method: Method,
    uri: &str,
    actor: Option<Uuid>,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
      req = req.header("X-Actor-Id", actor.to_string());
    }
    let req = match body {
      Some(body) => req
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap(),
      None => req.body(Body::empty()).unwrap(),
    };

    let resp = self.app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn get(&self, uri: &str) -> (StatusCode, Value) {
    self.call(Method::GET, uri, None, None).await
  }

  async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
    self.call(Method::POST, uri, Some(self.officer), Some(body)).await
  }

  async fn post_empty(&self, uri: &str) -> (StatusCode, Value) {
    self.call(Method::POST, uri, Some(self.officer), None).await
  }

  /// A registered, MOU-approved employer. Returns its id.
  async fn employer(&self, name: &str) -> String {
    let (status, employer) = self
      .post(
        "/employers",
        json!({
          "name": name,
          "business_type": "hospitality",
          "contact_name": "Reese Knowles",
          "contact_phone": "242-555-0142",
          "contact_email": null,
          "address": "12 Shirley Street",
          "notes": null
        }),
      )
      .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = employer["employer_id"].as_str().unwrap().to_owned();

    let (status, approved) = self
      .post(
        &format!("/employers/{id}/approve"),
        json!({ "mou_signed": true, "mou_expiry_date": null, "notes": null }),
      )
      .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["approved"], true);
    id
  }

  async fn propose(&self, subject: Uuid, employer: &str) -> (StatusCode, Value) {
    self
      .post(
        "/assignments",
        json!({
          "subject_id": subject,
          "employer_id": employer,
          "position_title": "Kitchen porter",
          "start_date": "2026-10-19",
          "end_date": null,
          "hourly_rate": "12.50",
          "work_schedule": { "monday": { "start": "08:00:00", "end": "16:00:00" } },
          "supervisor_name": "Sam Ferguson",
          "supervisor_phone": "242-555-0199",
          "notes": null
        }),
      )
      .await
  }

  /// An ACTIVE assignment for a fresh minimum-tier subject.
  async fn active_assignment(&self, employer: &str) -> (Uuid, String) {
    let subject = Uuid::new_v4();
    self.engine.directory().set(subject, ClassificationTier::Minimum);
    let (status, assignment) = self.propose(subject, employer).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = assignment["assignment_id"].as_str().unwrap().to_owned();
    assert_eq!(self.post_empty(&format!("/assignments/{id}/approve")).await.0, StatusCode::OK);
    assert_eq!(self.post_empty(&format!("/assignments/{id}/activate")).await.0, StatusCode::OK);
    (subject, id)
  }

  async fn depart(&self, assignment: &str) -> String {
    let (status, entry) = self
      .post(
        "/attendance",
        json!({
          "assignment_id": assignment,
          "log_date": "2026-10-19",
          "departure_time": "07:30:00",
          "expected_return_time": null,
          "notes": null
        }),
      )
      .await;
    assert_eq!(status, StatusCode::CREATED);
    entry["entry_id"].as_str().unwrap().to_owned()
  }
}

#[tokio::test]
async fn placement_lifecycle_over_http() {
  let h = Harness::new().await;
  let employer = h.employer("Harbour Grill").await;

  let (status, accepting) = h.get("/employers/accepting").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(accepting.as_array().unwrap().len(), 1);

  let subject = Uuid::new_v4();
  h.engine.directory().set(subject, ClassificationTier::Minimum);
  let (status, assignment) = h.propose(subject, &employer).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(assignment["status"], "PENDING_APPROVAL");
  assert_eq!(assignment["created_by"], json!(h.officer));
  let id = assignment["assignment_id"].as_str().unwrap().to_owned();

  let (_, pending) = h.get("/assignments/pending").await;
  assert_eq!(pending.as_array().unwrap().len(), 1);

  let (status, approved) = h.post_empty(&format!("/assignments/{id}/approve")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(approved["status"], "APPROVED");
  assert_eq!(approved["approval_date"], "2026-10-19");

  let (_, active) = h.post_empty(&format!("/assignments/{id}/activate")).await;
  assert_eq!(active["status"], "ACTIVE");

  let entry = h.depart(&id).await;
  let (_, logged) = h.get(&format!("/attendance/{entry}")).await;
  assert_eq!(logged["expected_return_time"], "16:00:00");

  let (status, returned) = h
    .post(
      &format!("/attendance/{entry}/return"),
      json!({ "actual_return_time": "16:20:00", "notes": "bus delay" }),
    )
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(returned["status"], "RETURNED_LATE");
  assert_eq!(returned["verified_by"], json!(h.officer));

  let (_, ledger) = h.get(&format!("/assignments/{id}/attendance")).await;
  assert_eq!(ledger.as_array().unwrap().len(), 1);

  let (_, completed) = h.post_empty(&format!("/assignments/{id}/complete")).await;
  assert_eq!(completed["status"], "COMPLETED");
  assert_eq!(completed["end_date"], "2026-10-19");

  let (_, summary) = h.get(&format!("/subjects/{subject}/summary")).await;
  assert_eq!(summary["total_assignments"], 1);
  assert_eq!(summary["late_returns"], 1);
  assert_eq!(summary["current_assignment"], Value::Null);
}

#[tokio::test]
async fn no_return_suspends_the_assignment() {
  let h = Harness::new().await;
  let employer = h.employer("Nassau Builders").await;
  let (_, assignment) = h.active_assignment(&employer).await;
  let entry = h.depart(&assignment).await;

  let (_, unresolved) = h.get("/attendance/unresolved").await;
  assert_eq!(unresolved.as_array().unwrap().len(), 1);

  let (status, resolved) = h
    .post(&format!("/attendance/{entry}/no-return"), json!({ "notes": "absconded" }))
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(resolved["entry"]["status"], "DID_NOT_RETURN");
  assert_eq!(resolved["entry"]["notes"], "[NO RETURN] absconded");
  assert_eq!(resolved["auto_suspended"]["status"], "SUSPENDED");

  let (_, current) = h.get(&format!("/assignments/{assignment}")).await;
  assert_eq!(current["status"], "SUSPENDED");

  let (_, report) = h.get("/reports/daily?date=2026-10-19").await;
  assert_eq!(report["did_not_return"], 1);
  assert_eq!(report["still_out"], 0);

  let (_, stats) = h.get("/statistics").await;
  assert_eq!(stats["no_shows_this_month"], 1);
  assert_eq!(stats["active_assignments"], 0);
}

#[tokio::test]
async fn domain_errors_map_to_status_codes() {
  let h = Harness::new().await;

  let (status, body) = h.get(&format!("/employers/{}", Uuid::new_v4())).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["kind"], "not_found");

  // Registered but never approved.
  let (_, unapproved) = h
    .post(
      "/employers",
      json!({
        "name": "Pending Co",
        "business_type": "retail",
        "contact_name": "Lee Pratt",
        "contact_phone": "242-555-0111",
        "address": "3 Market Street"
      }),
    )
    .await;
  let unapproved = unapproved["employer_id"].as_str().unwrap().to_owned();
  let (status, body) = h.propose(Uuid::new_v4(), &unapproved).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(body["kind"], "ineligible_employer");

  let employer = h.employer("Harbour Grill").await;
  let subject = Uuid::new_v4();
  let (_, first) = h.propose(subject, &employer).await;
  let first = first["assignment_id"].as_str().unwrap().to_owned();

  let (status, body) = h.propose(subject, &employer).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["kind"], "conflict");

  let (status, body) = h.post_empty(&format!("/assignments/{first}/activate")).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["kind"], "invalid_transition");

  // The directory does not know this subject yet.
  let (status, body) = h.post_empty(&format!("/assignments/{first}/approve")).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["kind"], "not_found");

  for tier in [ClassificationTier::Medium, ClassificationTier::Maximum] {
    h.engine.directory().set(subject, tier);
    let (status, body) = h.post_empty(&format!("/assignments/{first}/approve")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "ineligible_subject");
  }
  let (_, still_pending) = h.get(&format!("/assignments/{first}")).await;
  assert_eq!(still_pending["status"], "PENDING_APPROVAL");

  let (status, body) = h
    .call(Method::PATCH, &format!("/employers/{employer}"), None, Some(json!({ "contact_phone": "12" })))
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["kind"], "validation");
}

#[tokio::test]
async fn departure_requires_an_active_assignment() {
  let h = Harness::new().await;
  let employer = h.employer("Harbour Grill").await;
  let (_, pending) = h.propose(Uuid::new_v4(), &employer).await;
  let pending = pending["assignment_id"].as_str().unwrap();

  let (status, body) = h
    .post(
      "/attendance",
      json!({
        "assignment_id": pending,
        "log_date": "2026-10-19",
        "departure_time": "07:30:00"
      }),
    )
    .await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["kind"], "assignment_not_active");
}

#[tokio::test]
async fn resolutions_need_an_actor() {
  let h = Harness::new().await;
  let employer = h.employer("Harbour Grill").await;
  let (_, assignment) = h.active_assignment(&employer).await;
  let entry = h.depart(&assignment).await;

  let (status, body) = h
    .call(
      Method::POST,
      &format!("/attendance/{entry}/excused"),
      None,
      Some(json!({ "reason": "court date" })),
    )
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["kind"], "bad_request");

  let (status, excused) = h
    .post(&format!("/attendance/{entry}/excused"), json!({ "reason": "court date" }))
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(excused["status"], "EXCUSED");
  assert_eq!(excused["notes"], "[EXCUSED] court date");

  let (status, body) = h
    .post(
      &format!("/attendance/{entry}/return"),
      json!({ "actual_return_time": "16:00:00" }),
    )
    .await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["kind"], "invalid_transition");
}

#[tokio::test]
async fn delete_employer_blocked_while_placed() {
  let h = Harness::new().await;
  let employer = h.employer("Harbour Grill").await;
  let (_, assignment) = h.active_assignment(&employer).await;
  let uri = format!("/employers/{employer}");

  let (status, body) = h.call(Method::DELETE, &uri, None, None).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["kind"], "conflict");

  let (status, _) = h
    .post(&format!("/assignments/{assignment}/terminate"), json!({ "reason": "contract ended" }))
    .await;
  assert_eq!(status, StatusCode::OK);

  let (status, body) = h.call(Method::DELETE, &uri, None, None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  assert_eq!(body, Value::Null);
  assert_eq!(h.get(&uri).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn assignment_list_filters_by_status() {
  let h = Harness::new().await;
  let employer = h.employer("Harbour Grill").await;
  h.active_assignment(&employer).await;
  h.propose(Uuid::new_v4(), &employer).await;

  let (_, all) = h.get("/assignments").await;
  assert_eq!(all.as_array().unwrap().len(), 2);

  let (_, active) = h.get("/assignments?status=ACTIVE").await;
  assert_eq!(active.as_array().unwrap().len(), 1);

  let (_, by_employer) = h.get(&format!("/assignments?employer_id={employer}")).await;
  assert_eq!(by_employer.as_array().unwrap().len(), 2);
}
