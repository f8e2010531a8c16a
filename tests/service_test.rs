//! Service-level flows against a mock server.

use std::sync::Arc;

use approval::entity::Credentials;
use approval::entity::Decision;
use approval::entity::SubscriptionStatus;
use approval::service::error::ServiceError;
use approval::session::MemorySession;
use approval::session::SessionStore;
use approval::task::cancellation_poller::PollOutcome;
use httpmock::Method::GET;
use httpmock::Method::POST;
use httpmock::MockServer;
use serde_json::json;

mod common;

#[tokio::test]
async fn test_not_signed_in_issues_no_request() {
    let server = MockServer::start_async().await;
    let services = common::services(&server, Arc::new(MemorySession::new()));

    let any = server
        .mock_async(|_when, then| {
            then.status(200).body("[]");
        })
        .await;

    assert!(matches!(
        services.subscriptions.list().await,
        Err(ServiceError::NotSignedIn)
    ));
    assert!(matches!(
        services.subscriptions.cancel(42).await,
        Err(ServiceError::NotSignedIn)
    ));
    assert!(matches!(
        services.bank_link.link_token().await,
        Err(ServiceError::NotSignedIn)
    ));
    assert!(matches!(
        services.activity.events().await,
        Err(ServiceError::NotSignedIn)
    ));

    any.assert_hits_async(0).await;
    assert!(services.subscriptions.busy().is_idle());
}

#[tokio::test]
async fn test_login_stores_token_and_logout_clears_it() {
    let server = MockServer::start_async().await;
    let session = Arc::new(MemorySession::new());
    let services = common::services(&server, session.clone());

    server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"access_token":"jwt-fresh"}"#);
        })
        .await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/subscriptions")
                .header("authorization", "Bearer jwt-fresh");
            then.status(200).body("[]");
        })
        .await;

    services
        .auth
        .login(&Credentials::new("me@example.com", "hunter2"))
        .await
        .expect("Failed to log in");
    assert_eq!(session.get().as_deref(), Some("jwt-fresh"));

    let subs = services.subscriptions.list().await.expect("Failed to list");
    assert!(subs.is_empty());
    list.assert_async().await;

    services.auth.logout().expect("Failed to log out");
    assert!(!services.auth.is_signed_in());
}

#[tokio::test]
async fn test_failed_login_keeps_session_empty() {
    let server = MockServer::start_async().await;
    let session = Arc::new(MemorySession::new());
    let services = common::services(&server, session.clone());

    server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(401).body(r#"{"detail":"Invalid credentials"}"#);
        })
        .await;

    let err = services
        .auth
        .login(&Credentials::new("me@example.com", "wrong"))
        .await
        .expect_err("Expected login to fail");

    assert_eq!(err.to_string(), r#"{"detail":"Invalid credentials"}"#);
    assert_eq!(session.get(), None);
}

#[tokio::test]
async fn test_cancel_stops_when_canceled() {
    let server = MockServer::start_async().await;
    let services = common::services(&server, common::signed_in());

    let start = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/cancellations/start")
                .json_body(json!({ "subscription_id": 42 }));
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"subscription_id":42,"status":"in_progress"}"#);
        })
        .await;
    let refresh = server
        .mock_async(|when, then| {
            when.method(GET).path("/subscriptions");
            then.status(200)
                .header("content-type", "application/json")
                .body(common::get_response("subscriptions_canceled.json"));
        })
        .await;

    let outcome = services
        .subscriptions
        .cancel(42)
        .await
        .expect("Failed to cancel");

    start.assert_async().await;
    refresh.assert_hits_async(1).await;
    match outcome {
        PollOutcome::Terminal {
            refreshes,
            subscription,
        } => {
            assert_eq!(refreshes, 1);
            assert_eq!(subscription.status, SubscriptionStatus::Canceled);
        }
        other => panic!("Expected terminal outcome, got {other:?}"),
    }
    assert!(services.subscriptions.busy().is_idle());
}

#[tokio::test]
async fn test_cancel_exhausts_six_refreshes() {
    let server = MockServer::start_async().await;
    let services = common::services(&server, common::signed_in());

    server
        .mock_async(|when, then| {
            when.method(POST).path("/cancellations/start");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"subscription_id":7,"status":"in_progress"}"#);
        })
        .await;
    let refresh = server
        .mock_async(|when, then| {
            when.method(GET).path("/subscriptions");
            then.status(200)
                .header("content-type", "application/json")
                .body(common::get_response("subscriptions_in_progress.json"));
        })
        .await;

    let outcome = services
        .subscriptions
        .cancel(7)
        .await
        .expect("Failed to cancel");

    refresh.assert_hits_async(6).await;
    assert_eq!(outcome.refreshes(), 6);
    assert!(matches!(outcome, PollOutcome::Exhausted { .. }));
    assert!(services.subscriptions.busy().is_idle());
}

#[tokio::test]
async fn test_cancel_start_failure_surfaces_without_refresh() {
    let server = MockServer::start_async().await;
    let services = common::services(&server, common::signed_in());

    server
        .mock_async(|when, then| {
            when.method(POST).path("/cancellations/start");
            then.status(500).body("Cancellation failed: adapter down");
        })
        .await;
    let refresh = server
        .mock_async(|when, then| {
            when.method(GET).path("/subscriptions");
            then.status(200).body("[]");
        })
        .await;

    let err = services
        .subscriptions
        .cancel(3)
        .await
        .expect_err("Expected cancellation to fail");

    refresh.assert_hits_async(0).await;
    assert_eq!(err.to_string(), "Cancellation failed: adapter down");
    assert!(services.subscriptions.busy().is_idle());
}

#[tokio::test]
async fn test_cancel_refresh_failure_clears_busy() {
    let server = MockServer::start_async().await;
    let services = common::services(&server, common::signed_in());

    server
        .mock_async(|when, then| {
            when.method(POST).path("/cancellations/start");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"subscription_id":9,"status":"in_progress"}"#);
        })
        .await;
    let refresh = server
        .mock_async(|when, then| {
            when.method(GET).path("/subscriptions");
            then.status(502);
        })
        .await;

    let err = services
        .subscriptions
        .cancel(9)
        .await
        .expect_err("Expected refresh to fail");

    refresh.assert_hits_async(1).await;
    assert!(matches!(err, ServiceError::Api(_)));
    assert!(services.subscriptions.busy().is_idle());
}

#[tokio::test]
async fn test_decide_reloads_list() {
    let server = MockServer::start_async().await;
    let services = common::services(&server, common::signed_in());

    server
        .mock_async(|when, then| {
            when.method(POST).path("/approvals");
            then.status(200)
                .header("content-type", "application/json")
                .body(common::get_response("approval_deny.json"));
        })
        .await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET).path("/subscriptions");
            then.status(200)
                .header("content-type", "application/json")
                .body(common::get_response("subscriptions_in_progress.json"));
        })
        .await;

    let result = services
        .subscriptions
        .decide(42, Decision::Deny)
        .await
        .expect("Failed to decide");

    list.assert_hits_async(1).await;
    assert!(result.outcome.cancel_started);
    assert_eq!(result.subscriptions.len(), 2);
    assert!(services.subscriptions.busy().is_idle());
}

#[tokio::test]
async fn test_rescan_then_reload() {
    let server = MockServer::start_async().await;
    let services = common::services(&server, common::signed_in());

    let scan = server
        .mock_async(|when, then| {
            when.method(POST).path("/subscriptions/scan_real");
            then.status(200).body("[]");
        })
        .await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET).path("/subscriptions");
            then.status(200)
                .header("content-type", "application/json")
                .body(common::get_response("subscriptions_list.json"));
        })
        .await;

    let subs = services
        .subscriptions
        .rescan()
        .await
        .expect("Failed to rescan");

    scan.assert_async().await;
    list.assert_async().await;
    assert_eq!(subs.len(), 3);
}

#[tokio::test]
async fn test_exchange_triggers_rescan() {
    let server = MockServer::start_async().await;
    let services = common::services(&server, common::signed_in());

    let exchange = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/plaid/exchange")
                .json_body(json!({ "public_token": "public-sandbox-9" }));
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"status":"linked"}"#);
        })
        .await;
    let scan = server
        .mock_async(|when, then| {
            when.method(POST).path("/subscriptions/scan_real");
            then.status(200)
                .header("content-type", "application/json")
                .body(common::get_response("subscriptions_list.json"));
        })
        .await;

    let subs = services
        .bank_link
        .exchange(" public-sandbox-9 ")
        .await
        .expect("Failed to exchange");

    exchange.assert_async().await;
    scan.assert_async().await;
    assert_eq!(subs.len(), 3);
}

#[tokio::test]
async fn test_upcoming_uses_configured_window() {
    let server = MockServer::start_async().await;
    let services = common::services(&server, common::signed_in());

    let upcoming = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/subscriptions/upcoming")
                .query_param("days", "7");
            then.status(200).body("[]");
        })
        .await;

    let subs = services
        .subscriptions
        .upcoming(None)
        .await
        .expect("Failed to fetch upcoming");

    upcoming.assert_async().await;
    assert!(subs.is_empty());
}

#[tokio::test]
async fn test_cancel_stops_when_paused_behind_cancel_status() {
    let server = MockServer::start_async().await;
    let services = common::services(&server, common::signed_in());

    server
        .mock_async(|when, then| {
            when.method(POST).path("/cancellations/start");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"subscription_id":5,"status":"in_progress"}"#);
        })
        .await;
    let refresh = server
        .mock_async(|when, then| {
            when.method(GET).path("/subscriptions");
            then.status(200)
                .header("content-type", "application/json")
                .body(common::get_response("subscriptions_paused.json"));
        })
        .await;

    let outcome = services
        .subscriptions
        .cancel(5)
        .await
        .expect("Failed to cancel");

    refresh.assert_hits_async(1).await;
    match outcome {
        PollOutcome::Terminal {
            refreshes,
            subscription,
        } => {
            assert_eq!(refreshes, 1);
            assert_eq!(subscription.status, SubscriptionStatus::InProgress);
            assert_eq!(subscription.settled_status(), &SubscriptionStatus::Paused);
        }
        other => panic!("Expected terminal outcome, got {other:?}"),
    }
}

#[tokio::test]
async fn test_decide_on_other_id_keeps_cancel_busy() {
    let server = MockServer::start_async().await;
    let services = common::services(&server, common::signed_in());

    let approve = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/approvals")
                .json_body(json!({ "subscription_id": 1, "decision": "approve" }));
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"subscription_id":1,"decision":"approve"}"#);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/subscriptions");
            then.status(200).body("[]");
        })
        .await;
    let start = server
        .mock_async(|when, then| {
            when.method(POST).path("/cancellations/start");
            then.status(200)
                .body(r#"{"subscription_id":2,"status":"in_progress"}"#);
        })
        .await;

    // A cancellation of 2 is still polling.
    let running = services
        .subscriptions
        .busy()
        .acquire(2)
        .expect("Failed to mark busy");

    services
        .subscriptions
        .decide(1, Decision::Approve)
        .await
        .expect("Failed to decide");
    approve.assert_async().await;

    let err = services
        .subscriptions
        .cancel(2)
        .await
        .expect_err("Expected duplicate cancel to be rejected");
    assert!(matches!(err, ServiceError::Busy { id: 2 }));
    start.assert_hits_async(0).await;

    drop(running);
    assert!(services.subscriptions.busy().is_idle());
}

#[tokio::test]
async fn test_decide_rejects_busy_id_without_request() {
    let server = MockServer::start_async().await;
    let services = common::services(&server, common::signed_in());

    let any = server
        .mock_async(|_when, then| {
            then.status(200).body("{}");
        })
        .await;

    let _running = services
        .subscriptions
        .busy()
        .acquire(42)
        .expect("Failed to mark busy");

    let err = services
        .subscriptions
        .decide(42, Decision::Deny)
        .await
        .expect_err("Expected busy rejection");

    assert!(matches!(err, ServiceError::Busy { id: 42 }));
    any.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_failed_decide_clears_busy() {
    let server = MockServer::start_async().await;
    let services = common::services(&server, common::signed_in());

    server
        .mock_async(|when, then| {
            when.method(POST).path("/approvals");
            then.status(404).body("Subscription not found");
        })
        .await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET).path("/subscriptions");
            then.status(200).body("[]");
        })
        .await;

    let err = services
        .subscriptions
        .decide(404, Decision::Approve)
        .await
        .expect_err("Expected decide to fail");

    assert_eq!(err.to_string(), "Subscription not found");
    list.assert_hits_async(0).await;
    assert!(services.subscriptions.busy().is_idle());
    assert!(services.subscriptions.busy().acquire(404).is_some());
}
