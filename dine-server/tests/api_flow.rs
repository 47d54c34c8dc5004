//! End-to-end HTTP flows against an in-memory database

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use dine_server::services::notifier::LogNotifier;
use dine_server::{Config, ServerState, build_app};
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const STAFF_EMAIL: &str = "owner@example.com";
const STAFF_PASSWORD: &str = "correct-horse";

struct TestApp {
    app: Router,
    outbox: Arc<LogNotifier>,
}

async fn spawn_app() -> TestApp {
    let mut config = Config::for_tests();
    config.bootstrap_staff_email = Some(STAFF_EMAIL.into());
    config.bootstrap_staff_password = Some(STAFF_PASSWORD.into());

    let outbox = Arc::new(LogNotifier::new());
    let state = ServerState::with_notifier(config, outbox.clone())
        .await
        .unwrap();
    state.bootstrap_staff().await.unwrap();

    TestApp {
        app: build_app(state),
        outbox,
    }
}

impl TestApp {
    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn staff_token(&self) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/staff/login",
                None,
                Some(json!({ "email": STAFF_EMAIL, "password": STAFF_PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    async fn customer_token(&self, email: &str, name: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/customers/register",
                None,
                Some(json!({ "email": email, "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn health_is_public() {
    let app = spawn_app().await;
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = app.send(Method::GET, "/health/detailed", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["database"]["status"], "ok");
}

#[tokio::test]
async fn protected_routes_need_a_token() {
    let app = spawn_app().await;

    let (status, _) = app.send(Method::GET, "/api/tables", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // the menu is public
    let (status, body) = app.send(Method::GET, "/api/products", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn customers_cannot_manage_the_menu() {
    let app = spawn_app().await;
    let token = app.customer_token("ada@example.com", "Ada").await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/products",
            Some(&token),
            Some(json!({ "name": "Soup", "price": 5.0, "category": "food" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn customer_login_matches_registered_name() {
    let app = spawn_app().await;
    app.customer_token("ada@example.com", "Ada").await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/customers/login",
            None,
            Some(json!({ "email": "ADA@example.com", "name": "ada" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/customers/login",
            None,
            Some(json!({ "email": "ada@example.com", "name": "Grace" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn order_from_cart_to_payment() {
    let app = spawn_app().await;
    let staff = app.staff_token().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/products",
            Some(&staff),
            Some(json!({ "name": "Risotto", "price": 12.5, "category": "food" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let product_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .send(
            Method::POST,
            "/api/tables",
            Some(&staff),
            Some(json!({ "name": "T1", "capacity": 4 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let table_id = body["data"]["id"].as_i64().unwrap();

    let ada = app.customer_token("ada@example.com", "Ada").await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/cart/items",
            Some(&ada),
            Some(json!({ "product_id": product_id, "quantity": 2 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/cart/place",
            Some(&ada),
            Some(json!({ "table_id": table_id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(body["data"]["total_amount"], 25.0);
    let order_id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = app
        .send(Method::GET, &format!("/api/tables/{table_id}"), Some(&staff), None)
        .await;
    assert_eq!(body["data"]["is_occupied"], true);

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/orders/{order_id}/request-payment"),
            Some(&ada),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "payment_pending");

    // customers cannot settle their own bill
    let (status, _) = app
        .send(
            Method::POST,
            &format!("/api/orders/{order_id}/payment"),
            Some(&ada),
            Some(json!({ "method": "cash" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/orders/{order_id}/payment"),
            Some(&staff),
            Some(json!({ "method": "card", "card_number": "4111 1111 1111 1234" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["order"]["status"], "paid");
    assert_eq!(body["data"]["payment"]["amount"], 25.0);
    assert_eq!(body["data"]["payment"]["card_last4"], "1234");
    assert!(body["data"]["warnings"].as_array().unwrap().is_empty());

    // the invoice went to the customer
    let invoices: Vec<_> = app
        .outbox
        .sent()
        .into_iter()
        .filter(|n| n.recipient() == "ada@example.com")
        .collect();
    assert_eq!(invoices.len(), 1);

    let (_, body) = app
        .send(Method::GET, &format!("/api/tables/{table_id}"), Some(&staff), None)
        .await;
    assert_eq!(body["data"]["is_occupied"], false);

    // a second settlement is refused
    let (status, _) = app
        .send(
            Method::POST,
            &format!("/api/orders/{order_id}/payment"),
            Some(&staff),
            Some(json!({ "method": "cash" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .send(Method::GET, "/api/reports/revenue", Some(&staff), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_revenue"], 25.0);
    assert_eq!(body["data"]["payment_count"], 1);

    let (_, body) = app.send(Method::GET, "/api/orders", Some(&ada), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn review_board_is_public() {
    let app = spawn_app().await;
    let ada = app.customer_token("ada@example.com", "Ada").await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/feedback/reviews",
            Some(&ada),
            Some(json!({ "message": "Lovely risotto", "rating": 5 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(Method::GET, "/api/feedback/reviews", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["reviews"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["average_rating"], 5.0);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/feedback/contact",
            None,
            Some(json!({
                "name": "Grace",
                "email": "grace@example.com",
                "kind": "request",
                "message": "Do you have vegan options?"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // contact messages stay off the public board
    let (_, body) = app
        .send(Method::GET, "/api/feedback/reviews", None, None)
        .await;
    assert_eq!(body["data"]["reviews"].as_array().unwrap().len(), 1);
}
