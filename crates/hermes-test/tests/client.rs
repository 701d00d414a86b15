//! Driving a Hermes app through the in-memory client.

use hermes_docs::ApiInfo;
use hermes_extract::ParamSpec;
use hermes_server::Api;
use hermes_test::{TestClient, TestError};
use http::StatusCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Order {
    sku: String,
    qty: u32,
}

fn client() -> TestClient {
    let mut api = Api::new(ApiInfo::new("Shop"));

    let mut checkout = api.post("/checkout");
    let sku = checkout.param(ParamSpec::<String>::form("sku"));
    let qty = checkout.param(ParamSpec::<u32>::form("qty").validate(|qty| {
        if *qty == 0 {
            Err("qty must be positive".to_string())
        } else {
            Ok(())
        }
    }));
    checkout.handle(move |request| {
        let body = serde_json::json!({ "sku": sku.value(&request), "qty": qty.value(&request) });
        async move { body }
    });

    let mut orders = api.post("/orders");
    let order = orders.param(ParamSpec::<Order>::json("order"));
    let token = orders.param(ParamSpec::<String>::header("x-api-key"));
    orders.handle(move |request| {
        let order = order.value(&request);
        let authorized = token.value(&request) == "secret";
        async move {
            if authorized {
                (StatusCode::CREATED, format!("{} x{}", order.sku, order.qty))
            } else {
                (StatusCode::FORBIDDEN, "forbidden".to_string())
            }
        }
    });

    TestClient::new(api.build())
}

#[tokio::test]
async fn form_fields_are_bound() {
    let client = client();
    let response = client
        .post("/checkout")
        .form(&[("sku", "lamp"), ("qty", "2")])
        .send()
        .await;

    response
        .assert_status(StatusCode::OK)
        .assert_json_field("sku", &serde_json::json!("lamp"))
        .assert_json_field("qty", &serde_json::json!(2));
    assert!(response.request_id().is_some());
    assert_eq!(client.app().live_entries(), 0);
}

#[tokio::test]
async fn form_validation_failure_is_reported() {
    let message = client()
        .post("/checkout")
        .form(&[("sku", "lamp"), ("qty", "0")])
        .send()
        .await
        .assert_validation_error();
    assert_eq!(message, "qty must be positive (form:qty)");
}

#[tokio::test]
async fn json_body_and_header() {
    let client = client().with_default_header("X-Api-Key", "secret");
    let order = Order {
        sku: "lamp".into(),
        qty: 3,
    };

    let response = client.post("/orders").json(&order).send().await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.text().unwrap(), "lamp x3");
}

#[tokio::test]
async fn missing_header_is_rejected() {
    let message = client()
        .post("/orders")
        .json(&Order {
            sku: "lamp".into(),
            qty: 1,
        })
        .send()
        .await
        .assert_validation_error();
    assert_eq!(message, "missing required parameter x-api-key (header:x-api-key)");
}

#[tokio::test]
async fn invalid_header_name_is_a_build_error() {
    let err = client()
        .get("/orders")
        .header("bad header", "x")
        .try_send()
        .await
        .unwrap_err();
    assert!(matches!(err, TestError::InvalidHeader(_)));
}
