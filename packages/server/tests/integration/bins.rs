use ::common::AuditStatus;
use serde_json::json;

use crate::common::{TestApp, routes, unique};

mod crud {
    use super::*;

    #[tokio::test]
    async fn create_assigns_an_opaque_qr_key() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::BINS,
                &json!({"name": "Station East", "latitude": 35.68, "longitude": 139.69}),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "create failed: {}", res.text);
        let qr_key = res.body["qr_key"].as_str().expect("qr_key should be set");
        assert!(!qr_key.is_empty());

        let res = app
            .post_with_token(
                routes::BINS,
                &json!({"name": "Station West", "latitude": 35.69, "longitude": 139.70}),
                &token,
            )
            .await;
        assert_ne!(res.body["qr_key"].as_str().unwrap(), qr_key);
    }

    #[tokio::test]
    async fn update_is_partial_and_never_touches_the_qr_key() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let id = app.create_bin(&token, "Old name").await;
        let res = app.get_with_token(&routes::bin(id), &token).await;
        let qr_key = res.body["qr_key"].as_str().unwrap().to_string();

        let res = app
            .put_with_token(&routes::bin(id), &json!({"name": "New name"}), &token)
            .await;

        assert_eq!(res.status, 200, "update failed: {}", res.text);
        assert_eq!(res.body["name"], "New name");
        // location untouched
        assert_eq!(res.body["latitude"], 35.68);
        assert_eq!(res.body["qr_key"], qr_key.as_str());
    }

    #[tokio::test]
    async fn out_of_range_coordinates_fail_validation() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::BINS,
                &json!({"name": "Nowhere", "latitude": 91.0, "longitude": 0.0}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unused_bin_can_be_deleted() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let id = app.create_bin(&token, "Temporary").await;

        let res = app.delete_with_token(&routes::bin(id), &token).await;
        assert_eq!(res.status, 204);

        let res = app.get_with_token(&routes::bin(id), &token).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn bin_with_sessions_cannot_be_deleted() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let bin_id = app.create_bin(&token, "Busy bin").await;
        let email = format!("{}@greenpoints.test", unique("recycler"));
        let owner_id = app.create_user(&email, "user-password", "user").await;
        app.seed_session(owner_id, bin_id, AuditStatus::Accepted, &[(AuditStatus::Accepted, 5)])
            .await;

        let res = app.delete_with_token(&routes::bin(bin_id), &token).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }
}
