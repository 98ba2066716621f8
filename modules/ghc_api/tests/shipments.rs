mod common;

use axum::{
    extract::Path,
    http::{Method, StatusCode},
    Extension,
};
use serde_json::json;
use tracing_test::traced_test;

use common::*;
use ghc_api::api::rest::handlers::shipments;
use ghc_api::domain::error::ErrorKind;
use ghc_api::infra::seed::{
    DEMO_APPROVED_SHIPMENT_ID, DEMO_MOVE_ID, DEMO_SIT_EXTENSION_ID, DEMO_SUBMITTED_SHIPMENT_ID,
};

fn shipment_path(id: impl std::fmt::Display) -> String {
    format!("/shipments/{id}")
}

#[tokio::test]
async fn approve_requires_task_ordering_officer() {
    let h = Harness::new();
    for session in [tio(), counselor(), qae(), office_user(), customer()] {
        let resp = h
            .send(
                request(
                    Method::POST,
                    url(&format!("/shipments/{DEMO_SUBMITTED_SHIPMENT_ID}/approve")),
                )
                .session(session)
                .if_match("token")
                .build(),
            )
            .await;
        assert_eq!(resp.status, StatusCode::FORBIDDEN);
    }
    assert_eq!(h.mock.calls("approve_shipment"), 0);
    assert_eq!(h.mock.total_calls(), 0);
    assert_eq!(h.audit_calls(), 0);
}

#[tokio::test]
async fn approve_rejects_empty_id_without_calling_service() {
    let h = Harness::new();

    let resp = shipments::approve_shipment(
        ctx(too(), Method::POST, "/ghc/v1/shipments//approve"),
        Extension(h.state.clone()),
        Path(" ".to_string()),
        ghc_api::api::rest::precondition::IfMatch(Some("token".into())),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(h.mock.total_calls(), 0);
}

#[tokio::test]
async fn approve_without_if_match_is_bad_request() {
    let h = Harness::new();

    let resp = h
        .send(
            request(Method::POST, url(&format!("/shipments/{DEMO_SUBMITTED_SHIPMENT_ID}/approve")))
                .session(too())
                .build(),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(h.mock.total_calls(), 0);
}

#[tokio::test]
async fn approve_emits_audit_and_event() {
    let h = Harness::new();

    let resp = h
        .send(
            request(Method::POST, url(&format!("/shipments/{DEMO_SUBMITTED_SHIPMENT_ID}/approve")))
                .session(too())
                .if_match("token")
                .build(),
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(h.mock.calls("approve_shipment"), 1);
    assert_eq!(h.audit_calls(), 1);
    let events = h.events.events.lock();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_key.as_str(), "MTOShipment.Approve");
    assert_eq!(events[0].endpoint_key.as_str(), "Ghc.ApproveShipment");
    assert_eq!(events[0].move_id, h.mock.fixtures.shipment.move_task_order_id);
}

#[tokio::test]
#[traced_test]
async fn failing_side_effects_do_not_change_the_response() {
    let h = Harness::with_failing_side_effects();

    let resp = h
        .send(
            request(Method::POST, url(&format!("/shipments/{DEMO_SUBMITTED_SHIPMENT_ID}/approve")))
                .session(too())
                .if_match("token")
                .build(),
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(h.audit_calls(), 1);
    assert_eq!(h.event_calls(), 1);
    assert!(logs_contain("audit capture failed"));
    assert!(logs_contain("event trigger failed"));
}

#[tokio::test]
async fn approve_in_store_moves_submitted_to_approved_once() {
    let live = Live::new();
    let session = too();
    let etag = live.etag(&shipment_path(DEMO_SUBMITTED_SHIPMENT_ID), session.clone()).await;
    let approve = url(&format!("/shipments/{DEMO_SUBMITTED_SHIPMENT_ID}/approve"));

    let resp = live
        .send(
            request(Method::POST, approve.clone())
                .session(session.clone())
                .if_match(etag)
                .build(),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["status"], "APPROVED");
    assert!(resp.json()["approvedDate"].is_string());

    let queued = live.api.notifications().pending();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].event_key, "MTOShipment.Approve");
    assert_eq!(queued[0].object_id, DEMO_SUBMITTED_SHIPMENT_ID);
    assert_eq!(queued[0].move_task_order_id, DEMO_MOVE_ID);

    let fresh = resp.json()["eTag"].as_str().unwrap().to_string();
    let again = live
        .send(request(Method::POST, approve).session(session).if_match(fresh).build())
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn stale_token_leaves_shipment_unchanged() {
    let live = Live::new();
    let session = too();
    let path = shipment_path(DEMO_SUBMITTED_SHIPMENT_ID);
    let before = live.send(request(Method::GET, url(&path)).session(session.clone()).build()).await;

    let resp = live
        .send(
            request(Method::POST, url(&format!("{path}/reject")))
                .session(session.clone())
                .if_match("MjAwMC0wMS0wMVQwMDowMDowMFo=")
                .json(json!({ "rejectionReason": "duplicate" }))
                .build(),
        )
        .await;
    assert_eq!(resp.status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(resp.json()["code"], "PRECONDITION_FAILED");

    let after = live.send(request(Method::GET, url(&path)).session(session).build()).await;
    assert_eq!(before.body, after.body);
    assert_eq!(after.json()["status"], "SUBMITTED");
    assert!(live.api.notifications().is_empty());
}

#[tokio::test]
async fn reject_requires_a_reason() {
    let h = Harness::new();

    let resp = h
        .send(
            request(Method::POST, url(&format!("/shipments/{DEMO_SUBMITTED_SHIPMENT_ID}/reject")))
                .session(too())
                .if_match("token")
                .json(json!({ "rejectionReason": "  " }))
                .build(),
        )
        .await;

    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.json()["invalidFields"]["rejectionReason"].is_array());
    assert_eq!(h.mock.total_calls(), 0);
}

#[tokio::test]
async fn diversion_round_trip_in_store() {
    let live = Live::new();
    let session = too();
    let path = shipment_path(DEMO_APPROVED_SHIPMENT_ID);
    let etag = live.etag(&path, session.clone()).await;

    let resp = live
        .send(
            request(Method::POST, url(&format!("{path}/request-diversion")))
                .session(session.clone())
                .if_match(etag)
                .json(json!({ "diversionReason": "new duty location" }))
                .build(),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["status"], "DIVERSION_REQUESTED");
    assert_eq!(body["diversion"], true);
    assert_eq!(body["diversionReason"], "new duty location");

    let etag = body["eTag"].as_str().unwrap().to_string();
    let resp = live
        .send(
            request(Method::POST, url(&format!("{path}/approve-diversion")))
                .session(session)
                .if_match(etag)
                .build(),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["status"], "APPROVED");
    assert_eq!(live.api.notifications().len(), 2);
}

#[tokio::test]
async fn cancellation_of_submitted_shipment_conflicts() {
    let live = Live::new();
    let session = too();
    let path = shipment_path(DEMO_SUBMITTED_SHIPMENT_ID);
    let etag = live.etag(&path, session.clone()).await;

    let resp = live
        .send(
            request(Method::POST, url(&format!("{path}/request-cancellation")))
                .session(session)
                .if_match(etag)
                .build(),
        )
        .await;

    assert_eq!(resp.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn reweigh_can_be_requested_once() {
    let live = Live::new();
    let reweigh = url(&format!("/shipments/{DEMO_APPROVED_SHIPMENT_ID}/request-reweigh"));

    let first = live.send(request(Method::POST, reweigh.clone()).session(too()).build()).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.json()["requestedBy"], "TOO");
    assert_eq!(first.json()["shipmentId"], json!(DEMO_APPROVED_SHIPMENT_ID));

    let second = live.send(request(Method::POST, reweigh).session(too()).build()).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(live.api.notifications().len(), 1);
}

#[tokio::test]
async fn reweigh_of_unknown_shipment_is_not_found() {
    let h = Harness::new();
    h.mock.fail_with(ErrorKind::NotFound);

    let resp = h
        .send(
            request(
                Method::POST,
                url(&format!("/shipments/{}/request-reweigh", uuid::Uuid::new_v4())),
            )
            .session(too())
            .build(),
        )
        .await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(h.audit_calls(), 0);
    assert_eq!(h.event_calls(), 0);
}

#[tokio::test]
async fn sit_extension_approval_extends_allowance() {
    let live = Live::new();
    let session = too();
    let path = shipment_path(DEMO_APPROVED_SHIPMENT_ID);
    let etag = live.etag(&path, session.clone()).await;
    let before = live.send(request(Method::GET, url(&path)).session(session.clone()).build()).await;
    let allowance = before.json()["sitDaysAllowance"].as_i64().unwrap();
    let remaining = before.json()["sitStatus"]["totalDaysRemaining"].as_i64().unwrap();

    let resp = live
        .send(
            request(
                Method::POST,
                url(&format!("{path}/sit-extensions/{DEMO_SIT_EXTENSION_ID}/approve")),
            )
            .session(session.clone())
            .if_match(etag.clone())
            .json(json!({ "approvedDays": 30, "officeRemarks": "approved as requested" }))
            .build(),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["sitDaysAllowance"], allowance + 30);
    assert_eq!(body["sitExtensions"][0]["status"], "APPROVED");
    assert_eq!(body["sitExtensions"][0]["approvedDays"], 30);
    assert_eq!(body["sitStatus"]["totalDaysRemaining"], remaining + 30);
    assert_eq!(
        body["sitStatus"]["totalSitDaysUsed"],
        before.json()["sitStatus"]["totalSitDaysUsed"]
    );

    // Later reads see the same extended summary.
    let reread = live.send(request(Method::GET, url(&path)).session(session.clone()).build()).await;
    assert_eq!(reread.json()["sitDaysAllowance"], allowance + 30);
    assert_eq!(reread.json()["sitStatus"]["totalDaysRemaining"], remaining + 30);

    // A decided extension cannot be decided again.
    let etag = body["eTag"].as_str().unwrap().to_string();
    let resp = live
        .send(
            request(
                Method::POST,
                url(&format!("{path}/sit-extensions/{DEMO_SIT_EXTENSION_ID}/deny")),
            )
            .session(session)
            .if_match(etag)
            .build(),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn sit_extension_approval_needs_positive_days() {
    let h = Harness::new();

    let resp = h
        .send(
            request(
                Method::POST,
                url(&format!(
                    "/shipments/{DEMO_APPROVED_SHIPMENT_ID}/sit-extensions/{DEMO_SIT_EXTENSION_ID}/approve"
                )),
            )
            .session(too())
            .if_match("token")
            .json(json!({ "approvedDays": 0 }))
            .build(),
        )
        .await;

    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(h.mock.total_calls(), 0);
}

#[tokio::test]
async fn sit_extension_approval_rejects_unbounded_days() {
    let live = Live::new();
    let session = too();
    let path = shipment_path(DEMO_APPROVED_SHIPMENT_ID);
    let etag = live.etag(&path, session.clone()).await;

    let resp = live
        .send(
            request(
                Method::POST,
                url(&format!("{path}/sit-extensions/{DEMO_SIT_EXTENSION_ID}/approve")),
            )
            .session(session.clone())
            .if_match(etag.clone())
            .json(json!({ "approvedDays": i64::MAX }))
            .build(),
        )
        .await;
    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.json()["invalidFields"]["approvedDays"].is_array());

    // Nothing was written: the old token still reads back and the request stays pending.
    let after = live.send(request(Method::GET, url(&path)).session(session).build()).await;
    assert_eq!(after.json()["eTag"], etag);
    assert_eq!(after.json()["sitExtensions"][0]["status"], "PENDING");
}

#[tokio::test]
async fn malformed_sit_extension_id_is_bad_request() {
    let h = Harness::new();

    let resp = h
        .send(
            request(
                Method::POST,
                url(&format!("/shipments/{DEMO_APPROVED_SHIPMENT_ID}/sit-extensions/nope/deny")),
            )
            .session(too())
            .if_match("token")
            .build(),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(h.mock.total_calls(), 0);
}

#[tokio::test]
async fn move_shipments_list_in_creation_order_with_sit_status() {
    let live = Live::new();

    let resp = live
        .send(
            request(Method::GET, url(&format!("/moves/{DEMO_MOVE_ID}/mto-shipments")))
                .session(office_user())
                .build(),
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    let list = resp.json();
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], json!(DEMO_SUBMITTED_SHIPMENT_ID));
    assert!(list[0]["sitStatus"].is_null());
    assert_eq!(list[1]["id"], json!(DEMO_APPROVED_SHIPMENT_ID));
    assert_eq!(list[1]["sitStatus"]["totalSitDaysUsed"], 20);
}

#[tokio::test]
async fn shipment_edit_is_audited_and_notified() {
    let h = Harness::new();

    let resp = h
        .send(
            request(Method::PATCH, url(&shipment_path(DEMO_APPROVED_SHIPMENT_ID)))
                .session(counselor())
                .if_match("token")
                .json(json!({ "counselorRemarks": "customer prefers mornings" }))
                .build(),
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["counselorRemarks"], "customer prefers mornings");
    assert_eq!(h.mock.calls("update_shipment"), 1);
    assert_eq!(h.audit.records.lock()[0].operation, "UpdateShipment");
    let events = h.events.events.lock();
    assert_eq!(events[0].event_key.as_str(), "MTOShipment.Update");
    assert_eq!(events[0].endpoint_key.as_str(), "Ghc.UpdateMTOShipment");
}

#[tokio::test]
async fn shipment_edit_validates_before_calling_service() {
    let h = Harness::new();

    let resp = h
        .send(
            request(Method::PATCH, url(&shipment_path(DEMO_APPROVED_SHIPMENT_ID)))
                .session(too())
                .if_match("token")
                .json(json!({ "billableWeightCap": -5, "pickupAddress": { "city": "Augusta" } }))
                .build(),
        )
        .await;

    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields = &resp.json()["invalidFields"];
    assert!(fields["billableWeightCap"].is_array());
    assert!(fields["pickupAddress.streetAddress1"].is_array());
    assert_eq!(h.mock.total_calls(), 0);
}

#[tokio::test]
async fn shipment_edit_round_trips_through_the_store() {
    let live = Live::new();
    let session = tio();
    let path = shipment_path(DEMO_APPROVED_SHIPMENT_ID);
    let etag = live.etag(&path, session.clone()).await;

    let resp = live
        .send(
            request(Method::PATCH, url(&path))
                .session(session.clone())
                .if_match(etag.clone())
                .json(json!({
                    "billableWeightCap": 3500,
                    "billableWeightJustification": "scale ticket reviewed",
                    "destinationAddress": {
                        "streetAddress1": "1 Gate Rd",
                        "city": "Fort Gordon",
                        "state": "GA",
                        "postalCode": "30905"
                    }
                }))
                .build(),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["billableWeightCap"], 3500);
    assert_eq!(body["destinationAddress"]["postalCode"], "30905");
    assert_ne!(body["eTag"], etag);

    // The old token is spent.
    let stale = live
        .send(
            request(Method::PATCH, url(&path))
                .session(session)
                .if_match(etag)
                .json(json!({ "counselorRemarks": "late" }))
                .build(),
        )
        .await;
    assert_eq!(stale.status, StatusCode::PRECONDITION_FAILED);
}

#[tokio::test]
async fn invoicing_officer_cannot_edit_a_submitted_shipment() {
    let live = Live::new();
    let path = shipment_path(DEMO_SUBMITTED_SHIPMENT_ID);
    let etag = live.etag(&path, tio()).await;

    let resp = live
        .send(
            request(Method::PATCH, url(&path))
                .session(tio())
                .if_match(etag)
                .json(json!({ "counselorRemarks": "n/a" }))
                .build(),
        )
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn shipment_delete_returns_no_content_and_notifies() {
    let h = Harness::new();

    let resp = h
        .send(
            request(Method::DELETE, url(&shipment_path(DEMO_SUBMITTED_SHIPMENT_ID)))
                .session(counselor())
                .build(),
        )
        .await;

    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    assert!(resp.body.is_empty());
    assert_eq!(h.mock.calls("delete_shipment"), 1);
    assert_eq!(h.audit.records.lock()[0].operation, "DeleteShipment");
    let events = h.events.events.lock();
    assert_eq!(events[0].event_key.as_str(), "Shipment.Delete");
    assert_eq!(events[0].endpoint_key.as_str(), "Ghc.DeleteShipment");
    assert_eq!(events[0].object_id, DEMO_SUBMITTED_SHIPMENT_ID);
    assert_eq!(events[0].move_id, h.mock.fixtures.shipment.move_task_order_id);
}

#[tokio::test]
async fn deleted_shipment_leaves_the_move() {
    let live = Live::new();
    let session = too();

    let resp = live
        .send(
            request(Method::DELETE, url(&shipment_path(DEMO_APPROVED_SHIPMENT_ID)))
                .session(session.clone())
                .build(),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CONFLICT);

    let resp = live
        .send(
            request(Method::DELETE, url(&shipment_path(DEMO_SUBMITTED_SHIPMENT_ID)))
                .session(session.clone())
                .build(),
        )
        .await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);

    let list = live
        .send(
            request(Method::GET, url(&format!("/moves/{DEMO_MOVE_ID}/mto-shipments")))
                .session(session.clone())
                .build(),
        )
        .await;
    let ids: Vec<_> = list.json().as_array().unwrap().iter().map(|s| s["id"].clone()).collect();
    assert_eq!(ids, vec![json!(DEMO_APPROVED_SHIPMENT_ID)]);

    let gone = live
        .send(
            request(Method::GET, url(&shipment_path(DEMO_SUBMITTED_SHIPMENT_ID)))
                .session(session)
                .build(),
        )
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}
