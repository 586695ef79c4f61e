//! Integration tests for the notification read side over HTTP.

mod common;

use http::StatusCode;
use serde_json::json;

use orderpulse_auth::Claims;
use orderpulse_core::events::{DomainEvent, EventPayload, OrderEvent};
use orderpulse_core::types::{OrderId, UserId};
use orderpulse_entity::user::UserRole;

use common::TestApp;

#[tokio::test]
async fn test_missing_and_expired_credentials_are_401() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/notifications", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["error"], "AUTHENTICATION");

    let expired = app.expired_token(UserId::new());
    let response = app
        .request("GET", "/api/notifications", None, Some(&expired))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "INVALID_CREDENTIAL");
}

#[tokio::test]
async fn test_legacy_identifier_claims_are_accepted() {
    let app = TestApp::new();
    let (user, _) = app.user(UserRole::Customer);
    app.seed(user, "Order Status Updated").await;

    let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp();
    let token = app.signed(&Claims {
        sub: None,
        doc_id: Some(user),
        user_id: Some(user),
        role: Some("customer".into()),
        iat: 0,
        exp,
    });

    let response = app
        .request("GET", "/api/notifications/unread-count", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["count"], 1);
}

#[tokio::test]
async fn test_dispatched_status_change_is_listed_for_offline_customer() {
    let app = TestApp::new();
    let (customer, token) = app.user(UserRole::Customer);

    let event = DomainEvent::new(
        OrderId::new(),
        customer,
        EventPayload::Order(OrderEvent::StatusChanged {
            old_status: "pending".into(),
            new_status: "shipped".into(),
        }),
    );
    let report = app.state.dispatcher.dispatch(&event).await;
    assert_eq!(report.persisted, 1);
    assert_eq!(report.delivered, 0);

    let response = app
        .request("GET", "/api/notifications", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["unreadCount"], 1);
    assert_eq!(data["pagination"]["total"], 1);
    assert_eq!(data["pagination"]["pages"], 1);

    let item = &data["notifications"][0];
    assert_eq!(item["category"], "order_status_changed");
    assert_eq!(item["title"], "Order Status Updated");
    assert_eq!(item["body"], "Your order has been shipped and is on the way");
    assert_eq!(item["context"]["newStatus"], "shipped");
    assert_eq!(item["read"], false);
}

#[tokio::test]
async fn test_mark_read_is_idempotent_and_owner_scoped() {
    let app = TestApp::new();
    let (owner, owner_token) = app.user(UserRole::Customer);
    let (_, other_token) = app.user(UserRole::Customer);
    let id = app.seed(owner, "Order Status Updated").await;
    let path = format!("/api/notifications/{id}/read");

    let response = app.request("PATCH", &path, None, Some(&other_token)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let first = app.request("PATCH", &path, None, Some(&owner_token)).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["data"]["read"], true);
    let read_at = first.body["data"]["readAt"].clone();
    assert!(read_at.is_string());

    let second = app.request("PATCH", &path, None, Some(&owner_token)).await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["data"]["readAt"], read_at);

    let response = app
        .request("GET", "/api/notifications/unread-count", None, Some(&owner_token))
        .await;
    assert_eq!(response.body["data"]["count"], 0);
}

#[tokio::test]
async fn test_mark_all_read_counts_only_unread() {
    let app = TestApp::new();
    let (user, token) = app.user(UserRole::Customer);

    let mut ids = Vec::new();
    for i in 0..8 {
        ids.push(app.seed(user, &format!("Notice {i}")).await);
    }
    let response = app
        .request(
            "PATCH",
            "/api/notifications/mark-many-read",
            Some(json!({ "notificationIds": &ids[..3] })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["modifiedCount"], 3);

    let response = app
        .request("PATCH", "/api/notifications/mark-all-read", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["modifiedCount"], 5);
}

#[tokio::test]
async fn test_mark_many_skips_foreign_records() {
    let app = TestApp::new();
    let (alice, alice_token) = app.user(UserRole::Customer);
    let (bob, bob_token) = app.user(UserRole::Customer);
    let mine = app.seed(alice, "Mine").await;
    let theirs = app.seed(bob, "Theirs").await;

    let response = app
        .request(
            "PATCH",
            "/api/notifications/mark-many-read",
            Some(json!({ "notificationIds": [mine, theirs] })),
            Some(&alice_token),
        )
        .await;
    assert_eq!(response.body["data"]["modifiedCount"], 1);

    let response = app
        .request("GET", "/api/notifications/unread-count", None, Some(&bob_token))
        .await;
    assert_eq!(response.body["data"]["count"], 1);
}

#[tokio::test]
async fn test_delete_and_delete_all_read() {
    let app = TestApp::new();
    let (user, token) = app.user(UserRole::Customer);
    let (_, stranger) = app.user(UserRole::Customer);
    let keep = app.seed(user, "Keep").await;
    let read = app.seed(user, "Read").await;
    let gone = app.seed(user, "Gone").await;

    let path = format!("/api/notifications/{gone}");
    let response = app.request("DELETE", &path, None, Some(&stranger)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    let response = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Notification deleted successfully");
    let response = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    app.request("PATCH", &format!("/api/notifications/{read}/read"), None, Some(&token))
        .await;
    let response = app
        .request("DELETE", "/api/notifications/read/all", None, Some(&token))
        .await;
    assert_eq!(response.body["data"]["deletedCount"], 1);

    let response = app
        .request("GET", "/api/notifications", None, Some(&token))
        .await;
    assert_eq!(response.body["data"]["notifications"][0]["id"], keep);
}

#[tokio::test]
async fn test_malformed_input_is_400() {
    let app = TestApp::new();
    let (_, token) = app.user(UserRole::Customer);

    let response = app
        .request("PATCH", "/api/notifications/not-a-uuid/read", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "INVALID_ARGUMENT");

    let response = app
        .request("GET", "/api/notifications?page=0", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "GET",
            "/api/notifications?page=100000000000000000&limit=100",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let ids: Vec<String> = (0..501).map(|_| UserId::new().to_string()).collect();
    let response = app
        .request(
            "PATCH",
            "/api/notifications/mark-many-read",
            Some(json!({ "notificationIds": ids })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unread_filter_and_paging() {
    let app = TestApp::new();
    let (user, token) = app.user(UserRole::Customer);
    let first = app.seed(user, "First").await;
    for i in 0..4 {
        app.seed(user, &format!("Later {i}")).await;
    }
    app.request("PATCH", &format!("/api/notifications/{first}/read"), None, Some(&token))
        .await;

    let response = app
        .request(
            "GET",
            "/api/notifications?unreadOnly=true&limit=2&page=2",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["pagination"]["total"], 4);
    assert_eq!(data["pagination"]["pages"], 2);
    assert_eq!(data["pagination"]["limit"], 2);
    let items = data["notifications"].as_array().expect("array");
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|n| n["read"] == false));
}

#[tokio::test]
async fn test_stats_requires_staff() {
    let app = TestApp::new();
    let (customer, customer_token) = app.user(UserRole::Customer);
    let (_, staff_token) = app.user(UserRole::Staff);
    app.seed(customer, "One").await;
    app.seed(customer, "Two").await;

    let response = app
        .request("GET", "/api/notifications/stats", None, Some(&customer_token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request("GET", "/api/notifications/stats", None, Some(&staff_token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["total"], 2);
    assert_eq!(response.body["data"]["unread"], 2);
    assert_eq!(response.body["data"]["byCategory"]["order_status_changed"], 2);
    assert_eq!(response.body["data"]["last24Hours"], 2);
}

#[tokio::test]
async fn test_cleanup_requires_admin_and_keeps_unread() {
    let app = TestApp::new();
    let (customer, customer_token) = app.user(UserRole::Customer);
    let (_, staff_token) = app.user(UserRole::Staff);
    let (_, admin_token) = app.user(UserRole::Admin);
    let read = app.seed(customer, "Read").await;
    app.seed(customer, "Unread").await;
    app.request(
        "PATCH",
        &format!("/api/notifications/{read}/read"),
        None,
        Some(&customer_token),
    )
    .await;

    let response = app
        .request("DELETE", "/api/notifications/cleanup?daysOld=0", None, Some(&staff_token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request("DELETE", "/api/notifications/cleanup?daysOld=-1", None, Some(&admin_token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "DELETE",
            "/api/notifications/cleanup?daysOld=100000000",
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let response = app
        .request("DELETE", "/api/notifications/cleanup?daysOld=0", None, Some(&admin_token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["deletedCount"], 1);

    let response = app
        .request("GET", "/api/notifications/unread-count", None, Some(&customer_token))
        .await;
    assert_eq!(response.body["data"]["count"], 1);
}

#[tokio::test]
async fn test_role_resolved_from_directory_when_token_has_none() {
    let app = TestApp::new();
    let (staff, _) = app.user(UserRole::Staff);
    let token = app.token(staff, None);

    let response = app
        .request("GET", "/api/notifications/stats", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");

    let response = app.request("GET", "/api/health/detailed", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["storage"], "memory");
    assert_eq!(response.body["data"]["realtimeRunning"], true);
}
