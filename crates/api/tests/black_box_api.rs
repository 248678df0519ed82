use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};

use sellerhub_api::app::{router, services::AppServices};
use sellerhub_api::config::ApiConfig;
use sellerhub_catalog::{RecordStore, Seller, StoreError};
use sellerhub_core::SellerId;
use sellerhub_infra::store::InMemoryProductStore;

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(AppServices::in_memory(), ApiConfig::default()).await
    }

    async fn spawn_with(services: AppServices, config: ApiConfig) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = router(services, &config);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client.post(self.url(path)).json(&body).send().await.unwrap()
    }

    async fn put(&self, path: &str, body: Value) -> reqwest::Response {
        self.client.put(self.url(path)).json(&body).send().await.unwrap()
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    /// Send a raw JSON document, so numbers reach the server with every digit.
    async fn post_raw(&self, path: &str, body: String) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap()
    }

    async fn delete(&self, path: &str) -> reqwest::Response {
        self.client.delete(self.url(path)).send().await.unwrap()
    }

    async fn create_seller(&self, name: &str, email: &str) -> Value {
        let res = self.post("/sellers", json!({"name": name, "email": email})).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        res.json().await.unwrap()
    }

    async fn create_product(&self, name: &str, value: &str, seller_id: &str) -> Value {
        let res = self
            .post(
                "/products",
                json!({"name": name, "value": value, "sellerId": seller_id}),
            )
            .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        res.json().await.unwrap()
    }

    async fn list(&self, collection: &str) -> Vec<Value> {
        let res = self.get(&format!("/{collection}")).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        body["_embedded"][collection]
            .as_array()
            .cloned()
            .unwrap_or_default()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn id_of(body: &Value) -> String {
    body["id"].as_str().expect("id is a string").to_string()
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    assert_eq!(srv.get("/health").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn created_seller_has_id_and_no_products_field() {
    let srv = TestServer::spawn().await;

    let seller = srv.create_seller("Ana", "ana@example.com").await;

    assert!(!id_of(&seller).is_empty());
    assert_eq!(seller["name"], "Ana");
    assert_eq!(seller["email"], "ana@example.com");
    assert!(seller.get("products").is_none());
}

#[tokio::test]
async fn blank_seller_name_is_rejected_and_not_persisted() {
    let srv = TestServer::spawn().await;

    let res = srv
        .post("/sellers", json!({"name": "   ", "email": "ana@example.com"}))
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], 400);
    assert_eq!(body["errors"]["name"], "name is required");
    assert_eq!(body["message"], "validation error on fields");
    assert_eq!(body["path"], "/sellers");
    assert!(body["timestamp"].is_string());

    assert!(srv.list("sellers").await.is_empty());
}

#[tokio::test]
async fn invalid_email_reports_format_message() {
    let srv = TestServer::spawn().await;

    let res = srv
        .post("/sellers", json!({"name": "Ana", "email": "ana.example.com"}))
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["errors"]["email"], "invalid email format");
    assert!(body["errors"].get("name").is_none());
}

#[tokio::test]
async fn legacy_field_names_are_accepted() {
    let srv = TestServer::spawn().await;

    let res = srv
        .post("/sellers", json!({"nome": "Ana", "email": "ana@example.com"}))
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let seller: Value = res.json().await.unwrap();

    let res = srv
        .post(
            "/products",
            json!({"name": "Pen", "value": 1.5, "vendedorId": id_of(&seller)}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn product_for_unknown_seller_is_404_and_not_persisted() {
    let srv = TestServer::spawn().await;

    let res = srv
        .post(
            "/products",
            json!({"name": "Pen", "value": "1.50", "sellerId": SellerId::new().to_string()}),
        )
        .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.bytes().await.unwrap().is_empty());
    assert!(srv.list("products").await.is_empty());
}

#[tokio::test]
async fn created_product_embeds_its_seller() {
    let srv = TestServer::spawn().await;
    let seller = srv.create_seller("Ana", "ana@example.com").await;

    let product = srv.create_product("Pen", "1.50", &id_of(&seller)).await;

    assert!(!id_of(&product).is_empty());
    assert_eq!(product["value"], "1.50");
    assert_eq!(product["seller"]["id"], seller["id"]);
    assert_eq!(product["seller"]["name"], "Ana");
}

#[tokio::test]
async fn product_validation_uses_wire_field_names() {
    let srv = TestServer::spawn().await;

    let res = srv.post("/products", json!({"name": "Pen"})).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["errors"]["value"], "value is required");
    assert_eq!(body["errors"]["sellerId"], "seller id is required");
    assert!(body["errors"].get("name").is_none());
    assert_eq!(body["path"], "/products");
    assert!(srv.list("products").await.is_empty());
}

#[tokio::test]
async fn numeric_value_keeps_every_digit() {
    let srv = TestServer::spawn().await;
    let seller = srv.create_seller("Ana", "ana@example.com").await;

    let res = srv
        .post_raw(
            "/products",
            format!(
                r#"{{"name":"Yacht","value":12345678901234567.89,"sellerId":"{}"}}"#,
                id_of(&seller)
            ),
        )
        .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let product: Value = res.json().await.unwrap();
    assert_eq!(product["value"], "12345678901234567.89");

    let fetched: Value = srv
        .get(&format!("/products/{}", id_of(&product)))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["value"], "12345678901234567.89");
}

#[tokio::test]
async fn value_that_would_be_rounded_is_rejected() {
    let srv = TestServer::spawn().await;
    let seller = srv.create_seller("Ana", "ana@example.com").await;

    let res = srv
        .post_raw(
            "/products",
            format!(
                r#"{{"name":"Dust","value":"0.12345678901234567890123456789012","sellerId":"{}"}}"#,
                id_of(&seller)
            ),
        )
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["errors"]["value"].is_string());
    assert!(srv.list("products").await.is_empty());
}

#[tokio::test]
async fn deleting_seller_removes_all_its_products() {
    let srv = TestServer::spawn().await;
    let ana = srv.create_seller("Ana", "ana@example.com").await;
    let bia = srv.create_seller("Bia", "bia@example.com").await;

    let mut owned = Vec::new();
    for name in ["Pen", "Ink", "Pad"] {
        owned.push(id_of(&srv.create_product(name, "2.00", &id_of(&ana)).await));
    }
    let kept = id_of(&srv.create_product("Mug", "9.00", &id_of(&bia)).await);

    let res = srv.delete(&format!("/sellers/{}", id_of(&ana))).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    for id in owned {
        assert_eq!(
            srv.get(&format!("/products/{id}")).await.status(),
            StatusCode::NOT_FOUND
        );
    }
    assert_eq!(
        srv.get(&format!("/products/{kept}")).await.status(),
        StatusCode::OK
    );
    assert_eq!(
        srv.get(&format!("/sellers/{}", id_of(&ana))).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn product_update_keeps_path_id() {
    let srv = TestServer::spawn().await;
    let seller = srv.create_seller("Ana", "ana@example.com").await;
    let product = srv.create_product("Pen", "1.50", &id_of(&seller)).await;
    let id = id_of(&product);

    let res = srv
        .put(
            &format!("/products/{id}"),
            json!({
                "id": uuid::Uuid::now_v7().to_string(),
                "name": "Fountain pen",
                "value": "45.00",
                "sellerId": id_of(&seller),
            }),
        )
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(id_of(&body), id);
    assert_eq!(body["name"], "Fountain pen");
    assert_eq!(body["value"], "45.00");

    let products = srv.list("products").await;
    assert_eq!(products.len(), 1);
    assert_eq!(id_of(&products[0]), id);
}

#[tokio::test]
async fn seller_update_replaces_fields() {
    let srv = TestServer::spawn().await;
    let seller = srv.create_seller("Ana", "ana@example.com").await;
    let id = id_of(&seller);

    let res = srv
        .put(
            &format!("/sellers/{id}"),
            json!({"name": "Ana Maria", "email": "ana.maria@example.com"}),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = srv.get(&format!("/sellers/{id}")).await.json().await.unwrap();
    assert_eq!(body["name"], "Ana Maria");
    assert_eq!(body["email"], "ana.maria@example.com");
}

#[tokio::test]
async fn update_of_unknown_seller_is_404_even_with_invalid_body() {
    let srv = TestServer::spawn().await;

    let res = srv
        .put(&format!("/sellers/{}", SellerId::new()), json!({"name": ""}))
        .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_of_unknown_id_is_404_even_with_malformed_body() {
    let srv = TestServer::spawn().await;

    for path in [
        format!("/sellers/{}", SellerId::new()),
        format!("/products/{}", SellerId::new()),
    ] {
        let res = srv
            .client
            .put(srv.url(&path))
            .header("content-type", "application/json")
            .body("{\"name\": ")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{path}");
    }
}

#[tokio::test]
async fn malformed_body_on_existing_seller_is_400() {
    let srv = TestServer::spawn().await;
    let seller = srv.create_seller("Ana", "ana@example.com").await;

    let res = srv
        .client
        .put(srv.url(&format!("/sellers/{}", id_of(&seller))))
        .header("content-type", "application/json")
        .body("{\"name\": ")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_records_are_empty_404s_every_time() {
    let srv = TestServer::spawn().await;
    let ghost = SellerId::new();

    for path in [
        format!("/sellers/{ghost}"),
        format!("/sellers/{ghost}"),
        format!("/products/{ghost}"),
        "/products/not-a-uuid".to_string(),
    ] {
        let res = srv.get(&path).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{path}");
        assert!(res.bytes().await.unwrap().is_empty(), "{path}");
    }

    assert_eq!(
        srv.delete(&format!("/products/{ghost}")).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn item_and_collection_carry_links() {
    let srv = TestServer::spawn().await;
    let seller = srv.create_seller("Ana", "ana@example.com").await;
    let id = id_of(&seller);

    let item: Value = srv.get(&format!("/sellers/{id}")).await.json().await.unwrap();
    assert_eq!(
        item["_links"]["self"]["href"],
        srv.url(&format!("/sellers/{id}"))
    );
    assert_eq!(item["_links"]["sellers"]["href"], srv.url("/sellers"));

    let collection: Value = srv.get("/sellers").await.json().await.unwrap();
    assert_eq!(collection["_links"]["self"]["href"], srv.url("/sellers"));
    assert_eq!(collection["_embedded"]["sellers"][0]["id"], id.as_str());

    let empty: Value = srv.get("/products").await.json().await.unwrap();
    assert!(empty.get("_embedded").is_none());
    assert_eq!(empty["_links"]["self"]["href"], srv.url("/products"));
}

#[tokio::test]
async fn configured_public_base_url_is_used_for_links() {
    let config = ApiConfig {
        public_base_url: Some("https://shop.example.com".into()),
        ..ApiConfig::default()
    };
    let srv = TestServer::spawn_with(AppServices::in_memory(), config).await;

    let body: Value = srv.get("/sellers").await.json().await.unwrap();
    assert_eq!(
        body["_links"]["self"]["href"],
        "https://shop.example.com/sellers"
    );
}

#[tokio::test]
async fn malformed_json_is_a_400_with_error_body() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .post(srv.url("/sellers"))
        .header("content-type", "application/json")
        .body("{\"name\": ")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], 400);
    assert_eq!(body["path"], "/sellers");
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    assert!(body.get("errors").is_none());
}

#[tokio::test]
async fn missing_content_type_is_415() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .post(srv.url("/sellers"))
        .body(r#"{"name":"Ana","email":"ana@example.com"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

/// Seller store whose backend is always down.
struct UnreachableSellers;

#[async_trait]
impl RecordStore<Seller> for UnreachableSellers {
    async fn create(&self, _record: Seller) -> Result<Seller, StoreError> {
        Err(StoreError::backend("create", "connection refused"))
    }

    async fn find_by_id(&self, _id: SellerId) -> Result<Option<Seller>, StoreError> {
        Err(StoreError::backend("find_by_id", "connection refused"))
    }

    async fn find_all(&self) -> Result<Vec<Seller>, StoreError> {
        Err(StoreError::backend("find_all", "connection refused"))
    }

    async fn save(&self, _record: Seller) -> Result<Seller, StoreError> {
        Err(StoreError::backend("save", "connection refused"))
    }

    async fn delete(&self, _id: SellerId) -> Result<(), StoreError> {
        Err(StoreError::backend("delete", "connection refused"))
    }
}

fn broken_services() -> AppServices {
    AppServices::new(
        Arc::new(UnreachableSellers),
        Arc::new(InMemoryProductStore::new()),
    )
}

#[tokio::test]
async fn store_failure_is_a_500_with_fault_text() {
    let srv = TestServer::spawn_with(broken_services(), ApiConfig::default()).await;

    let res = srv.get("/sellers").await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], 500);
    assert_eq!(body["path"], "/sellers");
    assert!(body["message"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn fault_text_is_hidden_when_disabled() {
    let config = ApiConfig {
        expose_fault_details: false,
        ..ApiConfig::default()
    };
    let srv = TestServer::spawn_with(broken_services(), config).await;

    let res = srv.get("/sellers").await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "internal server error");
}

/// Seller store that panics on listing.
struct PanickingSellers;

#[async_trait]
impl RecordStore<Seller> for PanickingSellers {
    async fn create(&self, record: Seller) -> Result<Seller, StoreError> {
        Ok(record)
    }

    async fn find_by_id(&self, _id: SellerId) -> Result<Option<Seller>, StoreError> {
        Ok(None)
    }

    async fn find_all(&self) -> Result<Vec<Seller>, StoreError> {
        panic!("kaboom")
    }

    async fn save(&self, record: Seller) -> Result<Seller, StoreError> {
        Ok(record)
    }

    async fn delete(&self, _id: SellerId) -> Result<(), StoreError> {
        Ok(())
    }
}

#[tokio::test]
async fn handler_panic_is_a_500_with_error_body() {
    let services = AppServices::new(
        Arc::new(PanickingSellers),
        Arc::new(InMemoryProductStore::new()),
    );
    let srv = TestServer::spawn_with(services, ApiConfig::default()).await;

    let res = srv.get("/sellers").await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], 500);
    assert_eq!(body["message"], "kaboom");
    assert_eq!(body["path"], "/sellers");

    // The server keeps serving after the panic.
    assert_eq!(srv.get("/health").await.status(), StatusCode::OK);
}
