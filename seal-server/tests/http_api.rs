//! HTTP surface: identity headers, capability gates, error mapping

mod common;

use axum::Router;
use axum::body::Body;
use common::*;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use seal_server::api::build_app;
use seal_server::auth::{ROLE_HEADER, USER_ID_HEADER};
use serde_json::{Value, json};
use tower::ServiceExt;

struct Api {
    app: Router,
}

impl Api {
    fn new(env: &TestEnv) -> Self {
        Self {
            app: build_app(env.state.clone()),
        }
    }

    async fn call(
        &self,
        method: &str,
        uri: &str,
        user: Option<(i64, &str)>,
        body: Option<Value>,
    ) -> (StatusCode, http::HeaderMap, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some((id, role)) = user {
            builder = builder
                .header(USER_ID_HEADER, id.to_string())
                .header(ROLE_HEADER, role);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, headers, value)
    }

    async fn get(&self, uri: &str, user: (i64, &str)) -> (StatusCode, Value) {
        let (status, _, body) = self.call("GET", uri, Some(user), None).await;
        (status, body)
    }

    async fn post(&self, uri: &str, user: (i64, &str), body: Value) -> (StatusCode, Value) {
        let (status, _, body) = self.call("POST", uri, Some(user), Some(body)).await;
        (status, body)
    }
}

const DIRECTOR: (i64, &str) = (2, "Director");
const CASHIER: (i64, &str) = (5, "Cashier");
const KEEPER: (i64, &str) = (3, "Store Keeper");

fn order_body(customer_id: i64, product_id: i64, quantity: i64, start: &str, end: &str) -> Value {
    json!({
        "customer_id": customer_id,
        "items": [{
            "product_id": product_id,
            "quantity": quantity,
            "unit_price": 2.0,
            "serial_start": start,
            "serial_end": end,
        }]
    })
}

#[tokio::test]
async fn test_health_needs_no_identity() {
    let env = TestEnv::new().await;
    let api = Api::new(&env);

    let (status, headers, body) = api.call("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_identity_is_required() {
    let env = TestEnv::new().await;
    let api = Api::new(&env);

    let (status, _, _) = api.call("GET", "/api/stock", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = api.get("/api/stock", (9, "Janitor")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = api.get("/api/stock", CASHIER).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_capabilities_gate_mutations() {
    let env = TestEnv::new().await;
    let customer_id = env.customer("Harbour Logistics").await;
    let product_id = env.product("Bolt seal", 10).await;
    let api = Api::new(&env);

    let (status, _) = api
        .post("/api/orders", CASHIER, order_body(customer_id, product_id, 2, "G01", "G02"))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = api
        .post(
            "/api/stock/grn",
            DIRECTOR,
            json!({ "product_id": product_id, "quantity": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = api
        .post(
            "/api/stock/grn",
            KEEPER,
            json!({
                "product_id": product_id,
                "quantity": 5,
                "supplier_name": "Northern Seals Ltd"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quantity"], 5);

    let (status, _) = api.get("/api/serials/damaged", CASHIER).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = api.get("/api/serials/damaged", KEEPER).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_order_lifecycle_over_http() {
    let env = TestEnv::new().await;
    let customer_id = env.customer("Harbour Logistics").await;
    let product_id = env.product("Bolt seal", 10).await;
    let api = Api::new(&env);

    let (status, body) = api
        .post("/api/orders", DIRECTOR, order_body(customer_id, product_id, 3, "HT001", "HT003"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["status"], "waiting_print");
    assert_eq!(body["order"]["total_amount"], 6.0);
    let order_id = body["order"]["id"].as_i64().unwrap();

    let (status, body) = api.get(&format!("/api/orders/{order_id}"), CASHIER).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let (status, body) = api.get("/api/serials/search?code=HT002", CASHIER).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "assigned");
    assert_eq!(body["product_id"], product_id);

    let (status, body) = api.get(&format!("/api/serials/order/{order_id}"), CASHIER).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, body) = api
        .post(
            &format!("/api/orders/{order_id}/cancel"),
            DIRECTOR,
            json!({ "reason": "duplicate request" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");

    let (status, _) = api.get("/api/serials/search?code=HT002", CASHIER).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_business_errors_map_to_status_codes() {
    let env = TestEnv::new().await;
    let customer_id = env.customer("Harbour Logistics").await;
    let product_id = env.product("Bolt seal", 4).await;
    let api = Api::new(&env);

    let (status, _) = api.get("/api/orders/9999", DIRECTOR).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = api
        .post("/api/orders", DIRECTOR, order_body(customer_id, product_id, 5, "E01", "E05"))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["code"].as_u64().unwrap() > 0);

    let (status, _) = api
        .post("/api/orders", DIRECTOR, order_body(customer_id, product_id, 2, "E01", "E02"))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = api
        .post("/api/orders", DIRECTOR, order_body(customer_id, product_id, 2, "E02", "E03"))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = api
        .post("/api/orders", DIRECTOR, order_body(customer_id, product_id, 3, "E10", "E11"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_post_print_cancellation_lists_damaged_serials() {
    let env = TestEnv::new().await;
    let customer_id = env.customer("Harbour Logistics").await;
    let product_id = env.product("Bolt seal", 10).await;
    let api = Api::new(&env);

    let (status, body) = api
        .post("/api/orders", DIRECTOR, order_body(customer_id, product_id, 3, "DM01", "DM03"))
        .await;
    assert_eq!(status, StatusCode::OK);
    let order_id = body["order"]["id"].as_i64().unwrap();

    let (status, body) = api.get("/api/serials/damaged", KEEPER).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (status, _) = api
        .post(
            &format!("/api/orders/{order_id}/cancel"),
            DIRECTOR,
            json!({ "reason": "misprinted batch", "after_printing": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = api.get("/api/serials/damaged", KEEPER).await;
    assert_eq!(status, StatusCode::OK);
    let codes: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, ["DM01", "DM02", "DM03"]);
    assert!(body.as_array().unwrap().iter().all(|s| s["is_damaged"] == true));

    let (status, body) = api.get("/api/serials/reusable", KEEPER).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, body) = api.get("/api/stock/damage?limit=10", KEEPER).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["order_id"], order_id);
    assert_eq!(body[0]["quantity"], 3);
}

#[tokio::test]
async fn test_stock_alerts_and_grn_paging_over_http() {
    let env = TestEnv::new().await;
    let low = env.product("Meter seal", 5).await;
    env.product("Bolt seal", 40).await;
    let api = Api::new(&env);

    let (status, body) = api.get("/api/stock/alerts", CASHIER).await;
    assert_eq!(status, StatusCode::OK);
    let alerts = body.as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["product_id"], low);
    assert_eq!(alerts[0]["available"], 5);
    assert_eq!(alerts[0]["minimum_threshold"], 20);

    let (status, body) = api.get("/api/stock/grn?limit=1", KEEPER).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["quantity"], 40);

    let (status, body) = api.get("/api/stock/grn?limit=1&offset=1", KEEPER).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["product_id"], low);
}

#[tokio::test]
async fn test_listings_overdue_invoices_and_receipts() {
    const OPERATOR: (i64, &str) = (4, "Printing Operator");

    let env = TestEnv::new().await;
    let customer_id = env.customer("Harbour Logistics").await;
    let product_id = env.product("Bolt seal", 10).await;
    let api = Api::new(&env);

    let (_, body) = api
        .post("/api/orders", DIRECTOR, order_body(customer_id, product_id, 3, "LS01", "LS03"))
        .await;
    let order_id = body["order"]["id"].as_i64().unwrap();

    let (status, body) = api
        .post(
            "/api/printing-jobs",
            DIRECTOR,
            json!({ "order_id": order_id, "assigned_to": OPERATOR.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let job_id = body["id"].as_i64().unwrap();

    let (status, body) = api.get("/api/printing-jobs/mine", OPERATOR).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], job_id);
    let (status, body) = api.get("/api/printing-jobs/mine", DIRECTOR).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
    let (status, _) = api.get("/api/printing-jobs/mine", CASHIER).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = api.get("/api/printing-jobs?status=new", CASHIER).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _, _) = api
        .call(
            "PATCH",
            &format!("/api/printing-jobs/{job_id}/status"),
            Some(OPERATOR),
            Some(json!({ "status": "completed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = api.get("/api/printing-jobs?status=new", CASHIER).await;
    assert!(body.as_array().unwrap().is_empty());
    let (status, body) = api.get("/api/orders?status=job_done", CASHIER).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], order_id);

    // Due long ago: overdue as soon as it exists
    let (status, body) = api
        .post("/api/invoices", DIRECTOR, json!({ "order_id": order_id, "due_date": 1 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let invoice_id = body["id"].as_i64().unwrap();

    let (status, body) = api
        .post("/api/payments", CASHIER, json!({ "invoice_id": invoice_id, "amount": 2.5 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let payment_id = body["payment"]["id"].as_i64().unwrap();

    let (status, body) = api.get("/api/invoices/overdue", CASHIER).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["invoice_id"], invoice_id);
    assert_eq!(body[0]["paid_amount"], 2.5);
    assert_eq!(body[0]["outstanding"], 3.5);

    let (status, _) = api.post("/api/receipts", KEEPER, json!({ "payment_id": payment_id })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = api
        .post("/api/receipts", CASHIER, json!({ "payment_id": payment_id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["receipt_number"].as_str().unwrap().starts_with("REC"));
    assert_eq!(body["amount"], 2.5);
    assert_eq!(body["issued_by"], CASHIER.0);

    let (status, _) = api
        .post("/api/receipts", CASHIER, json!({ "payment_id": payment_id }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = api.post("/api/receipts", CASHIER, json!({ "payment_id": 9999 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = api.get(&format!("/api/receipts/payment/{payment_id}"), DIRECTOR).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payment_id"], payment_id);
    let (_, body) = api.get("/api/receipts", DIRECTOR).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    let (status, _) = api.get("/api/receipts/9999", DIRECTOR).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
