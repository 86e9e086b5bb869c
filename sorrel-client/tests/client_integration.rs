// sorrel-client/tests/client_integration.rs
// Integration tests against a mock CRM served by axum

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use http::StatusCode;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use shared::api::{IdentifyRequest, NewsletterRequest};
use shared::order::{OrderCustomer, OrderItemInput, OrderSubmission};
use shared::tracking::{EventType, NewsletterSource, PageContext, TrackingEvent};
use shared::{ContactOutcome, NewsletterOutcome, OrderOutcome};
use sorrel_client::{ClientConfig, ClientError, HttpClient, NETWORK_ERROR_MESSAGE};

/// Serve a router on an ephemeral port, returning its base URL.
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client_for(base_url: &str) -> HttpClient {
    ClientConfig::new(base_url).with_timeout(5).build_http_client()
}

fn test_order() -> OrderSubmission {
    OrderSubmission {
        customer: OrderCustomer {
            name: "Maya Green".to_string(),
            email: "maya@example.com".to_string(),
            phone: Some("555-0134".to_string()),
            delivery_address: "12 Garden Lane".to_string(),
            delivery_notes: None,
            neighborhood: Some("Riverside".to_string()),
        },
        delivery_date: "2026-09-01T00:00:00Z".parse().unwrap(),
        delivery_window: Some(shared::DeliveryWindow::Morning),
        items: vec![OrderItemInput {
            menu_item_id: "m1".to_string(),
            quantity: 2,
            notes: None,
        }],
        notes: None,
        visitor_id: Some("v-123".to_string()),
    }
}

#[tokio::test]
async fn test_submit_order_accepted() {
    let app = Router::new().route(
        "/api/public/orders",
        post(|| async { Json(json!({"orderId": "abc123", "message": "ok"})) }),
    );
    let base = serve(app).await;

    let outcome = client_for(&base).submit_order(&test_order()).await;

    assert_eq!(
        outcome,
        OrderOutcome::Accepted {
            order_id: Some("abc123".to_string()),
            message: "ok".to_string(),
        }
    );
}

#[tokio::test]
async fn test_submit_order_posts_wire_format() {
    let captured: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
    let app = Router::new()
        .route(
            "/api/public/orders",
            post(
                |State(captured): State<Arc<Mutex<Option<Value>>>>, Json(body): Json<Value>| async move {
                    *captured.lock().await = Some(body);
                    Json(json!({"orderId": "o-1", "message": "ok"}))
                },
            ),
        )
        .with_state(captured.clone());
    let base = serve(app).await;

    let outcome = client_for(&base).submit_order(&test_order()).await;
    assert!(outcome.is_accepted());

    let body = captured.lock().await.take().unwrap();
    assert_eq!(body["customer"]["deliveryAddress"], "12 Garden Lane");
    assert_eq!(body["customer"]["neighborhood"], "Riverside");
    assert_eq!(body["deliveryWindow"], "morning");
    assert_eq!(body["items"][0]["menuItemId"], "m1");
    assert_eq!(body["items"][0]["quantity"], 2);
    assert_eq!(body["visitorId"], "v-123");
    // ISO-8601 timestamp on the wire
    assert!(body["deliveryDate"].as_str().unwrap().starts_with("2026-09-01T00:00:00"));
}

#[tokio::test]
async fn test_submit_order_rejected_with_crm_message() {
    let app = Router::new().route(
        "/api/public/orders",
        post(|| async { (StatusCode::BAD_REQUEST, Json(json!({"error": "Invalid address"}))) }),
    );
    let base = serve(app).await;

    let outcome = client_for(&base).submit_order(&test_order()).await;

    assert_eq!(
        outcome,
        OrderOutcome::Rejected {
            message: "Invalid address".to_string(),
        }
    );
}

#[tokio::test]
async fn test_submit_order_rejected_without_error_field() {
    let app = Router::new().route(
        "/api/public/orders",
        post(|| async { (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({}))) }),
    );
    let base = serve(app).await;

    let outcome = client_for(&base).submit_order(&test_order()).await;

    assert_eq!(
        outcome,
        OrderOutcome::Rejected {
            message: "Failed to submit order".to_string(),
        }
    );
}

#[tokio::test]
async fn test_submit_order_network_error() {
    // Reserve a port, then release it so the connection is refused.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let outcome = client_for(&base).submit_order(&test_order()).await;

    assert_eq!(
        outcome,
        OrderOutcome::Rejected {
            message: NETWORK_ERROR_MESSAGE.to_string(),
        }
    );
}

#[tokio::test]
async fn test_submit_order_unreadable_success_body() {
    let app = Router::new().route("/api/public/orders", post(|| async { "not json" }));
    let base = serve(app).await;

    let outcome = client_for(&base).submit_order(&test_order()).await;

    assert_eq!(
        outcome,
        OrderOutcome::Rejected {
            message: NETWORK_ERROR_MESSAGE.to_string(),
        }
    );
}

#[tokio::test]
async fn test_fetch_menu() {
    let app = Router::new().route(
        "/api/public/menu",
        get(|| async {
            Json(json!({
                "items": [
                    {
                        "id": "m1",
                        "name": "Harvest Bowl",
                        "description": "Roasted squash and grains",
                        "category": "bowls",
                        "price": 13.5,
                        "dietaryTags": ["vegan"],
                        "imageUrl": null
                    },
                    {
                        "id": "m2",
                        "name": "Citrus Salad",
                        "description": null,
                        "category": "salads",
                        "price": 11.0,
                        "dietaryTags": [],
                        "imageUrl": "https://cdn.example/m2.jpg"
                    }
                ]
            }))
        }),
    );
    let base = serve(app).await;

    let menu = client_for(&base).fetch_menu().await.unwrap();

    assert_eq!(menu.len(), 2);
    assert_eq!(menu[0].id, "m1");
    assert_eq!(menu[0].dietary_tags, vec!["vegan"]);
    assert!(menu[1].description.is_none());
    assert_eq!(menu[1].image_url.as_deref(), Some("https://cdn.example/m2.jpg"));
}

#[tokio::test]
async fn test_fetch_menu_error_status() {
    let app = Router::new().route(
        "/api/public/menu",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "down"}))) }),
    );
    let base = serve(app).await;

    let err = client_for(&base).fetch_menu().await.unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "down");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_post_event_returns_session_grant() {
    let app = Router::new().route(
        "/api/public/events",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["visitorId"], "v-123");
            assert_eq!(body["eventType"], "page_view");
            Json(json!({"sessionId": "s-1"}))
        }),
    );
    let base = serve(app).await;

    let page = PageContext::new("https://sorrel.example/", "Sorrel");
    let event = TrackingEvent::new("v-123", EventType::PageView, &page);
    let ack = client_for(&base).post_event(&event).await.unwrap();

    assert_eq!(ack.session_id.as_deref(), Some("s-1"));
}

#[tokio::test]
async fn test_identify_returns_customer_id() {
    let app = Router::new().route(
        "/api/public/customers/identify",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["email"], "maya@example.com");
            Json(json!({"customerId": "c-7"}))
        }),
    );
    let base = serve(app).await;

    let request = IdentifyRequest {
        visitor_id: "v-123".to_string(),
        email: "maya@example.com".to_string(),
        name: None,
        phone: None,
    };
    let ack = client_for(&base).identify(&request).await.unwrap();

    assert_eq!(ack.customer_id.as_deref(), Some("c-7"));
}

#[tokio::test]
async fn test_submit_contact_accepted() {
    let app = Router::new().route(
        "/api/public/contact",
        post(|| async { Json(json!({"message": "Thanks for reaching out!", "customerId": "c-2"})) }),
    );
    let base = serve(app).await;

    let request = shared::api::ContactRequest {
        name: "Maya Green".to_string(),
        email: "maya@example.com".to_string(),
        phone: None,
        message: Some("Do you deliver on Sundays?".to_string()),
        visitor_id: Some("v-123".to_string()),
    };
    let outcome = client_for(&base).submit_contact(&request).await;

    assert_eq!(
        outcome,
        ContactOutcome::Accepted {
            message: "Thanks for reaching out!".to_string(),
            customer_id: Some("c-2".to_string()),
        }
    );
}

#[tokio::test]
async fn test_submit_contact_rejected() {
    let app = Router::new().route(
        "/api/public/contact",
        post(|| async { (StatusCode::BAD_REQUEST, Json(json!({"error": "Email required"}))) }),
    );
    let base = serve(app).await;

    let request = shared::api::ContactRequest {
        name: "Maya Green".to_string(),
        email: String::new(),
        phone: None,
        message: None,
        visitor_id: None,
    };
    let outcome = client_for(&base).submit_contact(&request).await;

    assert_eq!(
        outcome,
        ContactOutcome::Rejected {
            message: "Email required".to_string(),
        }
    );
}

#[tokio::test]
async fn test_subscribe_newsletter_reports_duplicates() {
    let app = Router::new().route(
        "/api/public/newsletter",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["source"], "website_footer");
            Json(json!({"message": "Already on the list", "alreadySubscribed": true}))
        }),
    );
    let base = serve(app).await;

    let request = NewsletterRequest {
        email: "maya@example.com".to_string(),
        source: NewsletterSource::WebsiteFooter,
        visitor_id: Some("v-123".to_string()),
    };
    let outcome = client_for(&base).subscribe_newsletter(&request).await;

    assert_eq!(
        outcome,
        NewsletterOutcome::Subscribed {
            message: "Already on the list".to_string(),
            already_subscribed: true,
        }
    );
}

#[tokio::test]
async fn test_base_url_trailing_slash_is_tolerated() {
    let app = Router::new().route(
        "/api/public/menu",
        get(|| async { Json(json!({"items": []})) }),
    );
    let base = serve(app).await;

    let client = ClientConfig::new(format!("{base}/")).build_http_client();
    let menu = client.fetch_menu().await.unwrap();
    assert!(menu.is_empty());
}
