use serde_json::json;

use crate::common::{TestApp, routes, unique};

mod value_resolution {
    use super::*;

    #[tokio::test]
    async fn category_value_applies_when_no_manual_override() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let category_id = app.create_category(&token, &unique("Glass"), 8).await;
        let item_id = app
            .create_item(&token, "Wine bottle", Some(category_id), None)
            .await;

        let res = app.get_with_token(&routes::item(item_id), &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["current_value"], 8);
        assert_eq!(res.body["category"]["value"], 8);
    }

    #[tokio::test]
    async fn manual_value_beats_the_category() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let category_id = app.create_category(&token, &unique("Glass"), 8).await;
        let item_id = app
            .create_item(&token, "Special bottle", Some(category_id), Some(20))
            .await;

        let res = app.get_with_token(&routes::item(item_id), &token).await;

        assert_eq!(res.body["current_value"], 20);
        assert_eq!(res.body["manual_value"], 20);
    }

    #[tokio::test]
    async fn zero_manual_value_is_a_real_override() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let category_id = app.create_category(&token, &unique("Glass"), 8).await;
        let item_id = app
            .create_item(&token, "Worthless bottle", Some(category_id), Some(0))
            .await;

        let res = app.get_with_token(&routes::item(item_id), &token).await;

        assert_eq!(res.body["current_value"], 0);
    }

    #[tokio::test]
    async fn uncategorized_item_without_override_gets_the_platform_default() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let item_id = app.create_item(&token, "Mystery item", None, None).await;

        let res = app.get_with_token(&routes::item(item_id), &token).await;

        assert_eq!(res.body["current_value"], 5);
    }

    #[tokio::test]
    async fn clearing_the_manual_value_reverts_to_the_category() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let category_id = app.create_category(&token, &unique("Cans"), 15).await;
        let item_id = app
            .create_item(&token, "Soda can", Some(category_id), Some(99))
            .await;

        let res = app.get_with_token(&routes::item(item_id), &token).await;
        let barcode = res.body["barcode"].as_str().unwrap().to_string();
        assert_eq!(res.body["current_value"], 99);

        let res = app
            .put_with_token(
                &routes::item(item_id),
                &json!({
                    "name": "Soda can",
                    "barcode": barcode,
                    "category_id": category_id,
                    "manual_value": null,
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "update failed: {}", res.text);
        assert!(res.body["manual_value"].is_null());
        assert_eq!(res.body["current_value"], 15);
    }
}

mod crud {
    use super::*;

    #[tokio::test]
    async fn duplicate_barcode_conflicts() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let barcode = unique("4900000000");
        let body = json!({"name": "First", "barcode": barcode});
        let res = app.post_with_token(routes::ITEMS, &body, &token).await;
        assert_eq!(res.status, 201, "create failed: {}", res.text);

        let res = app
            .post_with_token(
                routes::ITEMS,
                &json!({"name": "Second", "barcode": barcode}),
                &token,
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn unknown_category_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::ITEMS,
                &json!({"name": "Orphan", "barcode": unique("777"), "category_id": 999999}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn barcode_with_whitespace_fails_validation() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let res = app
            .post_with_token(
                routes::ITEMS,
                &json!({"name": "Bad", "barcode": "12 34"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unreferenced_item_can_be_deleted() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let item_id = app.create_item(&token, "Ephemeral", None, None).await;

        let res = app.delete_with_token(&routes::item(item_id), &token).await;
        assert_eq!(res.status, 204);

        let res = app.get_with_token(&routes::item(item_id), &token).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn list_embeds_categories() {
        let app = TestApp::spawn().await;
        let token = app.admin_token().await;

        let category_id = app.create_category(&token, &unique("Paper"), 3).await;
        app.create_item(&token, "Newspaper", Some(category_id), None)
            .await;

        let res = app.get_with_token(routes::ITEMS, &token).await;

        assert_eq!(res.status, 200);
        let items = res.body.as_array().expect("list should be an array");
        let listed = items
            .iter()
            .find(|i| i["name"] == "Newspaper")
            .expect("created item should be listed");
        assert_eq!(listed["category"]["value"], 3);
        assert_eq!(listed["current_value"], 3);
    }
}
