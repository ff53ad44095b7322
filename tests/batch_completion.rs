//! Batch completion mutation against the stand-in backend.

mod common;

use benefit_portal::models::{BatchCompletionDetails, BatchStatus};
use benefit_portal::queries::{self, APPLICATIONS_LIST_QUERY};
use benefit_portal::services::events::NotificationKind;
use benefit_portal::services::{Notification, UiEvent};
use benefit_portal::AppError;
use common::{statuses, TestPortal};

fn completion_form(decision_date: &str) -> BatchCompletionDetails {
    BatchCompletionDetails {
        decision_maker_name: "Maija Mallikas".to_string(),
        decision_maker_title: "Yksikön päällikkö".to_string(),
        section_of_the_law: "$1234".to_string(),
        decision_date: decision_date.to_string(),
        expert_inspector_name: "Olli Tarkastaja".to_string(),
        expert_inspector_title: "Tarkastaja".to_string(),
    }
}

fn notifications(events: Vec<UiEvent>) -> Vec<Notification> {
    events
        .into_iter()
        .filter_map(|event| match event {
            UiEvent::Notification(n) => Some(n),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_decision_date_sent_in_backend_format() {
    let mut portal = TestPortal::start().await;
    portal.session.client().set_csrf_token("csrf-1").await;

    let change = queries::complete_batch(
        &portal.session,
        "batch-ok",
        BatchStatus::DecidedAccepted,
        Some(completion_form("5.3.2024")),
    )
    .await
    .unwrap();

    assert_eq!(change.status, BatchStatus::DecidedAccepted);
    assert_eq!(change.previous_status, Some(BatchStatus::AwaitingForDecision));

    {
        let recorded = portal.backend.recorded.lock().unwrap();
        let (id, body, csrf) = &recorded.batch_requests[0];
        assert_eq!(id, "batch-ok");
        assert_eq!(body["status"], "accepted");
        assert_eq!(body["decision_date"], "2024-03-05");
        assert_eq!(body["decision_maker_name"], "Maija Mallikas");
        assert_eq!(csrf.as_deref(), Some("csrf-1"));
    }

    let events = portal.drain_events();
    assert_eq!(
        events,
        vec![
            UiEvent::Notification(Notification::success(
                "common:batches.notifications.registerToAhjo.accepted",
                ""
            )),
            UiEvent::QueryInvalidated {
                query: APPLICATIONS_LIST_QUERY.to_string()
            },
        ]
    );
}

#[tokio::test]
async fn test_success_invalidates_cached_lists() {
    let portal = TestPortal::start().await;
    let filter = statuses(&["received"]);

    queries::application_list(&portal.session, &filter).await;
    queries::application_list(&portal.session, &filter).await;
    assert_eq!(portal.backend.list_requests(), 1);

    queries::complete_batch(&portal.session, "batch-ok", BatchStatus::SentToTalpa, None)
        .await
        .unwrap();

    queries::application_list(&portal.session, &filter).await;
    assert_eq!(portal.backend.list_requests(), 2);
}

#[tokio::test]
async fn test_status_only_change_sends_no_details() {
    let portal = TestPortal::start().await;

    queries::complete_batch(&portal.session, "batch-ok", BatchStatus::Completed, None)
        .await
        .unwrap();

    let recorded = portal.backend.recorded.lock().unwrap();
    assert_eq!(
        recorded.batch_requests[0].1,
        serde_json::json!({ "status": "completed" })
    );
}

#[tokio::test]
async fn test_not_acceptable_with_error_key() {
    let mut portal = TestPortal::start().await;

    let err = queries::complete_batch(
        &portal.session,
        "batch-rejected",
        BatchStatus::DecidedAccepted,
        Some(completion_form("5.3.2024")),
    )
    .await
    .unwrap_err();

    assert_eq!(err.status_code(), Some(406));
    assert_eq!(err.error_key(), Some("batchInvalidDecisionDate"));

    let notes = notifications(portal.drain_events());
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, NotificationKind::Error);
    assert_eq!(
        notes[0].title,
        "common:batches.notifications.errors.batchInvalidDecisionDate.title"
    );
    assert_eq!(
        notes[0].message,
        "common:batches.notifications.errors.batchInvalidDecisionDate.message"
    );
}

#[tokio::test]
async fn test_error_key_on_other_status_is_generic() {
    let mut portal = TestPortal::start().await;

    queries::complete_batch(
        &portal.session,
        "batch-bad-request",
        BatchStatus::DecidedAccepted,
        Some(completion_form("5.3.2024")),
    )
    .await
    .unwrap_err();

    let notes = notifications(portal.drain_events());
    assert_eq!(notes[0].title, "common:applications.list.errors.fetch.label");
}

#[tokio::test]
async fn test_server_error_shows_generic_notification() {
    let mut portal = TestPortal::start().await;

    let err = queries::complete_batch(
        &portal.session,
        "batch-broken",
        BatchStatus::DecidedRejected,
        None,
    )
    .await
    .unwrap_err();
    assert_eq!(err.status_code(), Some(500));

    let events = portal.drain_events();
    assert_eq!(
        events,
        vec![UiEvent::Notification(Notification::error(
            "common:applications.list.errors.fetch.label",
            "common:applications.list.errors.fetch.text",
        ))]
    );
}

#[tokio::test]
async fn test_invalid_date_never_reaches_backend() {
    let mut portal = TestPortal::start().await;

    let err = queries::complete_batch(
        &portal.session,
        "batch-ok",
        BatchStatus::DecidedAccepted,
        Some(completion_form("tomorrow")),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::InvalidInput { .. }));
    assert!(portal.backend.recorded.lock().unwrap().batch_requests.is_empty());
    assert_eq!(notifications(portal.drain_events()).len(), 1);
}
