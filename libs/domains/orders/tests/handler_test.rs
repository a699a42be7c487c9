//! Handler tests for Orders domain
//!
//! The orders router runs over in-memory order and product repositories so
//! pricing, query parsing and status codes can be checked end to end.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use domain_orders::*;
use domain_products::{CreateProduct, InMemoryProductRepository, Product, ProductRepository};
use http_body_util::BodyExt;
use ::mongodb::bson::oid::ObjectId;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;

const CUSTOMER: &str = "65f0c0ffee0000000000abcd";

struct Fixture {
    orders: InMemoryOrderRepository,
    products: InMemoryProductRepository,
}

impl Fixture {
    fn new() -> Self {
        Self {
            orders: InMemoryOrderRepository::new(),
            products: InMemoryProductRepository::new(),
        }
    }

    fn app(&self) -> Router {
        let service = OrderService::new(self.orders.clone(), Arc::new(self.products.clone()));
        handlers::router(service)
    }

    async fn widget(&self) -> Product {
        self.products
            .create(CreateProduct {
                name: "Widget".to_string(),
                description: String::new(),
                price: Decimal::from_str("9.99").unwrap(),
                stock: 100,
            })
            .await
            .unwrap()
    }

    async fn order_on(&self, y: i32, m: u32, d: u32, total: i64) {
        let mut order = Order::new(
            ObjectId::new().to_hex(),
            CreateOrder {
                user_id: CUSTOMER.to_string(),
                product_id: ObjectId::new().to_hex(),
                quantity: 1,
                status: "pending".to_string(),
            },
            Decimal::from(total),
        );
        order.created_at = Utc.with_ymd_and_hms(y, m, d, 9, 30, 0).unwrap();
        self.orders.insert(order).await;
    }
}

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn send_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_create_order_prices_from_product() {
    let fixture = Fixture::new();
    let widget = fixture.widget().await;

    let response = fixture
        .app()
        .oneshot(send_json(
            "POST",
            "/",
            json!({"userId": CUSTOMER, "productId": widget.id, "quantity": 3}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["total"], json!(29.97));
    assert_eq!(body["status"], "pending");
    assert_eq!(body["userId"], CUSTOMER);
    assert!(body["createdAt"].is_string());

    let stored = fixture.products.get_by_id(&widget.id).await.unwrap().unwrap();
    assert_eq!(stored.stock, 100);
}

#[tokio::test]
async fn test_client_supplied_total_is_ignored() {
    let fixture = Fixture::new();
    let widget = fixture.widget().await;

    let response = fixture
        .app()
        .oneshot(send_json(
            "POST",
            "/",
            json!({"userId": CUSTOMER, "productId": widget.id, "quantity": 1, "total": 0.01}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let order: Order = json_body(response.into_body()).await;
    assert_eq!(order.total, Decimal::from_str("9.99").unwrap());
}

#[tokio::test]
async fn test_create_with_unknown_product_is_404_and_not_stored() {
    let fixture = Fixture::new();
    let missing = ObjectId::new().to_hex();

    let response = fixture
        .app()
        .oneshot(send_json(
            "POST",
            "/",
            json!({"userId": CUSTOMER, "productId": missing, "quantity": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], format!("Product {missing} not found"));

    let response = fixture.app().oneshot(get("/")).await.unwrap();
    let orders: Vec<Order> = json_body(response.into_body()).await;
    assert!(orders.is_empty());
}

#[tokio::test]
async fn test_zero_quantity_is_validation_error() {
    let fixture = Fixture::new();
    let widget = fixture.widget().await;

    let response = fixture
        .app()
        .oneshot(send_json(
            "POST",
            "/",
            json!({"userId": CUSTOMER, "productId": widget.id, "quantity": 0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["details"]["quantity"][0]["code"], "range");
}

#[tokio::test]
async fn test_get_update_delete_lifecycle() {
    let fixture = Fixture::new();
    let widget = fixture.widget().await;
    let app = fixture.app();

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/",
            json!({"userId": CUSTOMER, "productId": widget.id, "quantity": 1}),
        ))
        .await
        .unwrap();
    let created: Order = json_body(response.into_body()).await;

    let response = app
        .clone()
        .oneshot(send_json(
            "PUT",
            &format!("/{}", created.id),
            json!({"userId": CUSTOMER, "productId": widget.id, "quantity": 2, "status": "shipped"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Order = json_body(response.into_body()).await;
    assert_eq!(updated.total, Decimal::from_str("19.98").unwrap());
    assert_eq!(updated.status, "shipped");
    assert_eq!(updated.created_at, created.created_at);

    let response = app
        .clone()
        .oneshot(get(&format!("/{}", created.id)))
        .await
        .unwrap();
    let fetched: Order = json_body(response.into_body()).await;
    assert_eq!(fetched, updated);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/{}", created.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get(&format!("/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], format!("Order {} not found", created.id));
}

#[tokio::test]
async fn test_malformed_id_is_bad_request() {
    let response = Fixture::new().app().oneshot(get("/abc")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Invalid identifier 'abc'");
}

#[tokio::test]
async fn test_date_range_filters_sorts_and_pages() {
    let fixture = Fixture::new();
    fixture.order_on(2024, 1, 1, 1).await;
    fixture.order_on(2024, 1, 15, 2).await;
    fixture.order_on(2024, 1, 31, 3).await;
    fixture.order_on(2024, 2, 1, 4).await;

    let response = fixture
        .app()
        .oneshot(get(
            "/range?start_date=2024-01-01&end_date=2024-01-31&order=-1&page=1&page_size=2",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let orders: Vec<Order> = json_body(response.into_body()).await;
    let totals: Vec<Decimal> = orders.iter().map(|o| o.total).collect();
    assert_eq!(totals, [Decimal::from(3), Decimal::from(2)]);
}

#[tokio::test]
async fn test_empty_date_range_is_empty_list() {
    let fixture = Fixture::new();
    fixture.order_on(2024, 1, 15, 2).await;

    let response = fixture
        .app()
        .oneshot(get("/range?start_date=2024-02-01&end_date=2024-01-01"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let orders: Vec<Order> = json_body(response.into_body()).await;
    assert!(orders.is_empty());
}

#[tokio::test]
async fn test_date_range_rejects_bad_query() {
    let app = Fixture::new().app();

    for (uri, fragment) in [
        ("/range?start_date=2024-01-01&end_date=2024-01-31&order=2", "-1 or 1"),
        ("/range?end_date=2024-01-31", "start_date is required"),
        ("/range?start_date=2024/01/01&end_date=2024-01-31", "YYYY-MM-DD"),
        ("/aggregates?start_date=2024-01-01&end_date=2024-01-31&page=0", "page"),
    ] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");

        let body: Value = json_body(response.into_body()).await;
        let message = body["message"].as_str().unwrap();
        assert!(message.contains(fragment), "{uri}: {message}");
    }
}

#[tokio::test]
async fn test_aggregates_bucket_by_month() {
    let fixture = Fixture::new();
    fixture.order_on(2024, 1, 3, 10).await;
    fixture.order_on(2024, 1, 28, 15).await;
    fixture.order_on(2024, 2, 14, 7).await;
    fixture.order_on(2024, 4, 1, 1).await;

    let response = fixture
        .app()
        .oneshot(get("/aggregates?start_date=2024-01-01&end_date=2024-03-31"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(
        body,
        json!([
            {"year": 2024, "month": 1, "totalOrders": 2, "totalRevenue": 25.0},
            {"year": 2024, "month": 2, "totalOrders": 1, "totalRevenue": 7.0},
        ])
    );

    let response = fixture
        .app()
        .oneshot(get(
            "/aggregates?start_date=2024-01-01&end_date=2024-03-31&order=-1&page_size=1",
        ))
        .await
        .unwrap();
    let buckets: Vec<OrderAggregate> = json_body(response.into_body()).await;
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].month, 2);
}

#[tokio::test]
async fn test_customer_orders() {
    let fixture = Fixture::new();
    fixture.order_on(2024, 1, 3, 10).await;
    fixture.order_on(2024, 3, 3, 20).await;

    let response = fixture
        .app()
        .oneshot(get(&format!("/customer/{CUSTOMER}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(
        body["message"],
        format!("No orders found for customer {CUSTOMER}")
    );

    fixture.orders.add_customer(CUSTOMER).await;
    let response = fixture
        .app()
        .oneshot(get(&format!("/customer/{CUSTOMER}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let orders: Vec<Order> = json_body(response.into_body()).await;
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].total, Decimal::from(20));
}
