//! Owner-dashboard endpoints routed through the authenticated client

use brewdesk_core::{MemorySessionStore, SessionKey};
use brewdesk_http::client::{BrewClient, ClientError};
use brewdesk_http::types::{MenuItemInput, OpeningHours, PromotionInput, RatingRequest, ShopUpdate};
use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn owner_client(server: &MockServer) -> BrewClient {
    let store = MemorySessionStore::with_entries([
        (SessionKey::AccessToken, "owner-token"),
        (SessionKey::RefreshToken, "owner-refresh"),
    ]);
    BrewClient::builder()
        .base_url(server.uri())
        .session_store(Arc::new(store))
        .build()
        .unwrap()
}

fn shop_body() -> serde_json::Value {
    json!({
        "id": "shop-1",
        "name": "Bean There",
        "address": "1 Roast Lane",
        "average_rating": 4.5,
        "rating_count": 12
    })
}

#[tokio::test]
async fn test_update_shop_sends_only_changed_fields() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/shops/shop-1"))
        .and(header("authorization", "Bearer owner-token"))
        .and(body_partial_json(json!({ "name": "Bean There" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(shop_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = owner_client(&server).await;
    let update = ShopUpdate {
        name: Some("Bean There".to_string()),
        ..ShopUpdate::default()
    };

    let shop = client.update_shop("shop-1", &update).await.unwrap();
    assert_eq!(shop.rating_count, 12);
}

#[tokio::test]
async fn test_rate_shop_validates_score_locally() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/shops/shop-1/ratings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(shop_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = owner_client(&server).await;

    let rejected = client
        .rate_shop("shop-1", &RatingRequest { score: 6, comment: None })
        .await;
    assert!(matches!(rejected, Err(ClientError::BadRequest(_))));

    let shop = client
        .rate_shop("shop-1", &RatingRequest { score: 5, comment: Some("great flat white".into()) })
        .await
        .unwrap();
    assert_eq!(shop.average_rating, Some(4.5));
}

#[tokio::test]
async fn test_menu_item_lifecycle() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/shops/shop-1/menu/items"))
        .and(body_partial_json(json!({ "name": "Cortado", "price_cents": 350 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "item-9",
            "name": "Cortado",
            "price_cents": 350
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/shops/shop-1/menu/items/item-9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = owner_client(&server).await;
    let item = client
        .add_menu_item(
            "shop-1",
            &MenuItemInput {
                name: "Cortado".to_string(),
                description: None,
                price_cents: 350,
                category: Some("espresso".to_string()),
                available: true,
            },
        )
        .await
        .unwrap();

    assert_eq!(item.id, "item-9");
    assert!(item.available);

    client.delete_menu_item("shop-1", &item.id).await.unwrap();
}

#[tokio::test]
async fn test_create_promotion_rejects_inverted_window() {
    let server = MockServer::start().await;
    let client = owner_client(&server).await;

    let starts_at = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
    let promo = PromotionInput {
        title: "Summer blend".to_string(),
        description: None,
        starts_at,
        ends_at: starts_at - Duration::hours(1),
    };

    let result = client.create_promotion("shop-1", &promo).await;
    assert!(matches!(result, Err(ClientError::BadRequest(_))));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_opening_hours_round_trip_through_backend() {
    let server = MockServer::start().await;

    let body = json!({
        "days": [
            { "weekday": "Mon", "opens": "07:00:00", "closes": "17:00:00" },
            { "weekday": "Sun" }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/shops/shop-1/hours"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/shops/shop-1/hours"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = owner_client(&server).await;
    let hours: OpeningHours = client.get_opening_hours("shop-1").await.unwrap();
    assert_eq!(hours.days.len(), 2);
    assert!(hours.days[1].opens.is_none());

    let saved = client.update_opening_hours("shop-1", &hours).await.unwrap();
    assert_eq!(saved, hours);
}

#[tokio::test]
async fn test_qr_code_countdown() {
    let server = MockServer::start().await;
    let expires_at = Utc::now() + Duration::minutes(5);

    Mock::given(method("POST"))
        .and(path("/shops/shop-1/qr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "QR-42",
            "image_url": "https://cdn.brewdesk.test/qr/42.png",
            "expires_at": expires_at
        })))
        .mount(&server)
        .await;

    let client = owner_client(&server).await;
    let qr = client.create_qr_code("shop-1").await.unwrap();

    assert!(!qr.is_expired(Utc::now()));
    assert!(qr.remaining(Utc::now()) <= Duration::minutes(5));
    assert_eq!(qr.remaining(expires_at + Duration::seconds(1)), Duration::zero());
}

#[tokio::test]
async fn test_shop_id_is_escaped_into_one_segment() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/shops/a%2Fb%3Fc/reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = owner_client(&server).await;
    let reviews = client.list_reviews("a/b?c").await.unwrap();
    assert!(reviews.is_empty());

    let parent = client.get_shop("..").await;
    assert!(matches!(parent, Err(ClientError::BadRequest(_))));
}
