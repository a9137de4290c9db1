use ::common::AuditStatus;
use serde_json::json;

use crate::common::{TestApp, routes, unique};

async fn recycler(app: &TestApp) -> i32 {
    let email = format!("{}@greenpoints.test", unique("recycler"));
    app.create_user(&email, "user-password", "user").await
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn list_is_paginated_with_embedded_user_and_bin() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let owner_id = recycler(&app).await;
        let bin_id = app.create_bin(&token, "Park bin").await;
        for _ in 0..3 {
            app.seed_session(
                owner_id,
                bin_id,
                AuditStatus::Flagged,
                &[(AuditStatus::Flagged, 3)],
            )
            .await;
        }

        let res = app
            .get_with_token(&format!("{}?page=1&per_page=2", routes::SESSIONS), &token)
            .await;

        assert_eq!(res.status, 200, "list failed: {}", res.text);
        assert_eq!(res.body["current_page"], 1);
        assert_eq!(res.body["per_page"], 2);
        assert_eq!(res.body["total"], 3);
        assert_eq!(res.body["last_page"], 2);

        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        let first = &data[0];
        assert_eq!(first["bin"]["name"], "Park bin");
        assert!(first["user"]["email"].is_string());
        assert_eq!(first["transactions_count"], 1);
    }

    #[tokio::test]
    async fn lifecycle_status_is_derived() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let owner_id = recycler(&app).await;
        let bin_id = app.create_bin(&token, "Corner bin").await;
        let active_id = app
            .seed_session(owner_id, bin_id, AuditStatus::Accepted, &[])
            .await;
        let closed_id = app
            .seed_session(owner_id, bin_id, AuditStatus::Accepted, &[])
            .await;
        app.end_session(closed_id).await;

        let res = app
            .get_with_token(&routes::session(active_id), &token)
            .await;
        assert_eq!(res.body["lifecycle_status"], "active");

        let res = app
            .get_with_token(&routes::session(closed_id), &token)
            .await;
        assert_eq!(res.body["lifecycle_status"], "closed");
    }

    #[tokio::test]
    async fn detail_embeds_transactions_with_items() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let owner_id = recycler(&app).await;
        let bin_id = app.create_bin(&token, "Mall bin").await;
        let session_id = app
            .seed_session(
                owner_id,
                bin_id,
                AuditStatus::Flagged,
                &[(AuditStatus::Accepted, 5), (AuditStatus::Flagged, 3)],
            )
            .await;

        let res = app
            .get_with_token(&routes::session(session_id), &token)
            .await;

        assert_eq!(res.status, 200, "get failed: {}", res.text);
        let txs = res.body["transactions"].as_array().unwrap();
        assert_eq!(txs.len(), 2);
        assert!(txs.iter().all(|t| t["item"]["name"].is_string()));
        assert!(txs.iter().all(|t| t["points_awarded"].is_number()));
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app.get_with_token(&routes::session(999999), &token).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod audit_override {
    use super::*;

    #[tokio::test]
    async fn accepting_a_flagged_session_moves_flagged_points_and_reclassifies_transactions() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let owner_id = recycler(&app).await;
        let bin_id = app.create_bin(&token, "Audit bin").await;
        let session_id = app
            .seed_session(
                owner_id,
                bin_id,
                AuditStatus::Flagged,
                &[
                    (AuditStatus::Accepted, 5),
                    (AuditStatus::Flagged, 3),
                    (AuditStatus::Rejected, 2),
                ],
            )
            .await;

        let res = app
            .put_with_token(
                &routes::session(session_id),
                &json!({"status": "accepted"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "override failed: {}", res.text);
        assert_eq!(res.body["audit_status"], "accepted");
        assert_eq!(res.body["accepted_points"], 8);
        assert_eq!(res.body["flagged_points"], 0);
        assert_eq!(res.body["rejected_points"], 2);

        // only the flagged transaction was reclassified
        let txs = res.body["transactions"].as_array().unwrap();
        let statuses: Vec<&str> = txs.iter().map(|t| t["status"].as_str().unwrap()).collect();
        assert!(!statuses.contains(&"flagged"));
        assert_eq!(statuses.iter().filter(|s| **s == "rejected").count(), 1);
        assert_eq!(statuses.iter().filter(|s| **s == "accepted").count(), 2);

        // sum invariant: buckets still add up to the awarded points
        let sum: i64 = txs
            .iter()
            .map(|t| t["points_awarded"].as_i64().unwrap())
            .sum();
        assert_eq!(sum, 10);
    }

    #[tokio::test]
    async fn rejecting_a_flagged_session_moves_points_into_the_rejected_bucket() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let owner_id = recycler(&app).await;
        let bin_id = app.create_bin(&token, "Audit bin").await;
        let session_id = app
            .seed_session(
                owner_id,
                bin_id,
                AuditStatus::Flagged,
                &[(AuditStatus::Accepted, 5), (AuditStatus::Flagged, 3)],
            )
            .await;

        let res = app
            .put_with_token(
                &routes::session(session_id),
                &json!({"status": "rejected"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "override failed: {}", res.text);
        assert_eq!(res.body["audit_status"], "rejected");
        assert_eq!(res.body["accepted_points"], 5);
        assert_eq!(res.body["flagged_points"], 0);
        assert_eq!(res.body["rejected_points"], 3);
    }

    #[tokio::test]
    async fn an_override_is_one_shot() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let owner_id = recycler(&app).await;
        let bin_id = app.create_bin(&token, "Audit bin").await;
        let session_id = app
            .seed_session(
                owner_id,
                bin_id,
                AuditStatus::Flagged,
                &[(AuditStatus::Flagged, 3)],
            )
            .await;

        let first = app
            .put_with_token(
                &routes::session(session_id),
                &json!({"status": "accepted"}),
                &token,
            )
            .await;
        assert_eq!(first.status, 200, "first override failed: {}", first.text);

        let second = app
            .put_with_token(
                &routes::session(session_id),
                &json!({"status": "rejected"}),
                &token,
            )
            .await;

        assert_eq!(second.status, 409);
        assert_eq!(second.body["code"], "INVALID_TRANSITION");
    }

    #[tokio::test]
    async fn non_flagged_sessions_cannot_be_overridden() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let owner_id = recycler(&app).await;
        let bin_id = app.create_bin(&token, "Audit bin").await;
        let session_id = app
            .seed_session(
                owner_id,
                bin_id,
                AuditStatus::Accepted,
                &[(AuditStatus::Accepted, 5)],
            )
            .await;

        let res = app
            .put_with_token(
                &routes::session(session_id),
                &json!({"status": "rejected"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "INVALID_TRANSITION");
    }

    #[tokio::test]
    async fn flagged_is_not_a_valid_decision() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let owner_id = recycler(&app).await;
        let bin_id = app.create_bin(&token, "Audit bin").await;
        let session_id = app
            .seed_session(
                owner_id,
                bin_id,
                AuditStatus::Flagged,
                &[(AuditStatus::Flagged, 3)],
            )
            .await;

        let res = app
            .put_with_token(
                &routes::session(session_id),
                &json!({"status": "flagged"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn non_admins_cannot_override() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;

        let email = format!("{}@greenpoints.test", unique("recycler"));
        let owner_id = app.create_user(&email, "user-password", "user").await;
        let bin_id = app.create_bin(&admin, "Audit bin").await;
        let session_id = app
            .seed_session(
                owner_id,
                bin_id,
                AuditStatus::Flagged,
                &[(AuditStatus::Flagged, 3)],
            )
            .await;

        let user_token = app.login(&email, "user-password").await;
        let res = app
            .put_with_token(
                &routes::session(session_id),
                &json!({"status": "accepted"}),
                &user_token,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn overriding_an_unknown_session_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .put_with_token(&routes::session(999999), &json!({"status": "accepted"}), &token)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}
