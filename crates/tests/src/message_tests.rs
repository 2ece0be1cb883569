use crate::fixtures::test_app::TestApp;
use serde_json::{Value, json};

fn inquiry(listing_id: &str, recipient_id: &str) -> Value {
    json!({
        "listingId": listing_id,
        "recipientId": recipient_id,
        "name": "Luis",
        "email": "luis@test.com",
        "phone": "+52 669 000 0000",
        "message": "Is it still available?",
    })
}

#[tokio::test]
async fn inquiry_about_existing_listing_is_sent_to_all_users() {
    let app = TestApp::spawn().await;
    let owner = app.register_user("ana", "ana@test.com").await;
    app.register_user("bea", "bea@test.com").await;
    let listing = app.create_listing(&owner, json!({})).await;

    let resp = app
        .anonymous_post("/api/messages/send-public")
        .json(&inquiry(listing["id"].as_str().unwrap(), &owner.id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Message sent successfully to all users");
}

#[tokio::test]
async fn inquiry_without_required_fields_is_rejected() {
    let app = TestApp::spawn().await;
    let owner = app.register_user("ana", "ana@test.com").await;
    let listing = app.create_listing(&owner, json!({})).await;

    let mut body = inquiry(listing["id"].as_str().unwrap(), &owner.id);
    body.as_object_mut().unwrap().remove("email");

    let resp = app
        .anonymous_post("/api/messages/send-public")
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Missing required fields");
}

#[tokio::test]
async fn inquiry_about_unknown_listing_is_not_found() {
    let app = TestApp::spawn().await;
    let owner = app.register_user("ana", "ana@test.com").await;

    for listing_id in ["65f000000000000000000001", "not-an-id"] {
        let resp = app
            .anonymous_post("/api/messages/send-public")
            .json(&inquiry(listing_id, &owner.id))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 404, "{listing_id}");

        let json: Value = resp.json().await.unwrap();
        assert_eq!(json["message"], "Listing not found");
    }
}

#[tokio::test]
async fn sell_request_is_sent_to_all_users() {
    let app = TestApp::spawn().await;
    app.register_user("ana", "ana@test.com").await;

    let resp = app
        .anonymous_post("/api/messages/sell-property")
        .json(&json!({
            "name": "Marta",
            "email": "marta@test.com",
            "propertyType": "Casa",
            "propertyLocation": "Mazatlán",
            "message": "Three bedroom house near the beach",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Solicitud de venta enviada con éxito");
}

#[tokio::test]
async fn sell_request_without_location_is_rejected() {
    let app = TestApp::spawn().await;
    app.register_user("ana", "ana@test.com").await;

    let resp = app
        .anonymous_post("/api/messages/sell-property")
        .json(&json!({
            "name": "Marta",
            "email": "marta@test.com",
            "message": "Three bedroom house",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Missing required fields");
}

#[tokio::test]
async fn messages_need_at_least_one_recipient() {
    let app = TestApp::spawn().await;

    let resp = app
        .anonymous_post("/api/messages/sell-property")
        .json(&json!({
            "name": "Marta",
            "email": "marta@test.com",
            "propertyLocation": "Mazatlán",
            "message": "Three bedroom house",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "No users found");
}
