use serde_json::json;

use crate::common::{ADMIN_EMAIL, TestApp, routes, unique};

/// The admin account is the only seeded profile; find its id via the API.
async fn admin_profile_id(app: &TestApp, token: &str) -> i32 {
    let res = app.get_with_token(routes::PROFILES, token).await;
    assert_eq!(res.status, 200, "list failed: {}", res.text);
    res.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["username"] == "admin")
        .expect("seeded admin profile should be listed")["id"]
        .as_i64()
        .unwrap() as i32
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn list_is_paginated_and_embeds_the_user() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app.get_with_token(routes::PROFILES, &token).await;

        assert_eq!(res.status, 200, "list failed: {}", res.text);
        assert_eq!(res.body["current_page"], 1);
        assert!(res.body["total"].as_u64().unwrap() >= 1);

        let admin = res.body["data"]
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["username"] == "admin")
            .expect("admin profile should be listed");
        assert_eq!(admin["user"]["email"], ADMIN_EMAIL);
        assert_eq!(admin["user"]["role"], "admin");
    }

    #[tokio::test]
    async fn get_returns_profile_details() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let id = admin_profile_id(&app, &token).await;

        let res = app.get_with_token(&routes::profile(id), &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["username"], "admin");
        assert_eq!(res.body["points"], 0);
    }

    #[tokio::test]
    async fn unknown_profile_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app.get_with_token(&routes::profile(999999), &token).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod updates {
    use super::*;

    #[tokio::test]
    async fn only_provided_fields_change() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let id = admin_profile_id(&app, &token).await;

        let res = app
            .put_with_token(
                &routes::profile(id),
                &json!({"first_name": "Root", "points": 42}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "update failed: {}", res.text);
        assert_eq!(res.body["first_name"], "Root");
        assert_eq!(res.body["points"], 42);
        // untouched fields
        assert_eq!(res.body["username"], "admin");
        assert_eq!(res.body["user"]["email"], ADMIN_EMAIL);
    }

    #[tokio::test]
    async fn bio_supports_set_and_clear() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let id = admin_profile_id(&app, &token).await;

        let res = app
            .put_with_token(&routes::profile(id), &json!({"bio": "Keeps the lights on"}), &token)
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["bio"], "Keeps the lights on");

        let res = app
            .put_with_token(&routes::profile(id), &json!({"bio": null}), &token)
            .await;
        assert_eq!(res.status, 200);
        assert!(res.body["bio"].is_null());
    }

    #[tokio::test]
    async fn negative_points_fail_validation() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let id = admin_profile_id(&app, &token).await;

        let res = app
            .put_with_token(&routes::profile(id), &json!({"points": -1}), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unknown_role_fails_validation() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let id = admin_profile_id(&app, &token).await;

        let res = app
            .put_with_token(&routes::profile(id), &json!({"role": "superuser"}), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn email_must_stay_unique() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let id = admin_profile_id(&app, &token).await;

        let taken = format!("{}@greenpoints.test", unique("taken"));
        app.create_user(&taken, "user-password", "user").await;

        let res = app
            .put_with_token(&routes::profile(id), &json!({"email": taken}), &token)
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "EMAIL_TAKEN");
    }

    #[tokio::test]
    async fn changed_password_is_rehashed_and_usable() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;
        let id = admin_profile_id(&app, &token).await;

        let res = app
            .put_with_token(
                &routes::profile(id),
                &json!({"password": "a-brand-new-password"}),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "update failed: {}", res.text);

        // old password no longer works, new one does
        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": ADMIN_EMAIL, "password": "a-brand-new-password"}),
            )
            .await;
        assert_eq!(res.status, 200, "login with new password failed: {}", res.text);
    }
}
