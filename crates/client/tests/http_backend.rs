use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use storefront_auth::{AuthToken, InMemorySessionStore, Session};
use storefront_cart::{CartReference, MutationError, Notice};
use storefront_catalog::{CatalogQuery, ProductId};
use storefront_client::{CartStore, CatalogSource, HttpBackend, RemoteError, Storefront};

const TOKEN: &str = "test-token";
const MAX_QTY: u64 = 100;

#[derive(Clone, Default)]
struct Backend {
    cart: Arc<Mutex<Vec<(String, u64)>>>,
    fail_updates: Arc<AtomicBool>,
}

impl Backend {
    fn cart_json(&self) -> Value {
        let cart = self.cart.lock().unwrap();
        Value::Array(
            cart.iter()
                .map(|(id, qty)| json!({ "productId": id, "qty": qty }))
                .collect(),
        )
    }
}

fn products_json() -> Vec<Value> {
    vec![
        json!({ "_id": "A", "name": "Alpha Tee", "category": "Fashion", "cost": 10, "rating": 4, "image": "https://img/a.png" }),
        json!({ "_id": "B", "name": "Beta Phone", "category": "Electronics", "cost": 20, "rating": 5, "image": "https://img/b.png" }),
        json!({ "_id": "C", "name": "Gamma Bag", "category": "Fashion", "cost": 35.5, "rating": 3, "image": "https://img/c.png" }),
    ]
}

fn authorized(headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {TOKEN}");
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(expected.as_str())
}

async fn list_products(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let products = products_json()
        .into_iter()
        .filter(|p| params.get("category").is_none_or(|c| p["category"] == c.as_str()))
        .collect();
    Json(Value::Array(products))
}

async fn get_cart(State(backend): State<Backend>, headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(backend.cart_json()))
}

async fn post_cart(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    if backend.fail_updates.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let id = body["productId"].as_str().ok_or(StatusCode::BAD_REQUEST)?.to_string();
    let qty = body["qty"].as_u64().ok_or(StatusCode::BAD_REQUEST)?;
    if qty > MAX_QTY {
        return Err(StatusCode::BAD_REQUEST);
    }
    if !products_json().iter().any(|p| p["_id"] == id.as_str()) {
        return Err(StatusCode::NOT_FOUND);
    }

    {
        let mut cart = backend.cart.lock().unwrap();
        if qty == 0 {
            cart.retain(|(pid, _)| *pid != id);
        } else if let Some(line) = cart.iter_mut().find(|(pid, _)| *pid == id) {
            line.1 = qty;
        } else {
            cart.push((id, qty));
        }
    }
    Ok(Json(backend.cart_json()))
}

struct TestServer {
    api_url: String,
    backend: Backend,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(initial_cart: &[(&str, u64)]) -> Self {
        let backend = Backend::default();
        backend
            .cart
            .lock()
            .unwrap()
            .extend(initial_cart.iter().map(|(id, qty)| (id.to_string(), *qty)));

        let api = Router::new()
            .route("/products", get(list_products))
            .route("/cart", get(get_cart).post(post_cart))
            .with_state(backend.clone());
        let app = Router::new().nest("/api/v1", api);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let api_url = format!("http://{}/api/v1", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            api_url,
            backend,
            handle,
        }
    }

    fn client(&self) -> HttpBackend {
        HttpBackend::new(self.api_url.clone(), Duration::from_secs(5)).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn pid(s: &str) -> ProductId {
    ProductId::new(s).unwrap()
}

fn token() -> AuthToken {
    AuthToken::new(TOKEN).unwrap()
}

#[tokio::test]
async fn catalog_is_parsed_from_wire_shape() {
    let srv = TestServer::spawn(&[]).await;

    let catalog = srv.client().fetch_catalog(None).await.unwrap();
    assert_eq!(catalog.len(), 3);

    let a = catalog.get(&pid("A")).unwrap();
    assert_eq!(a.name(), "Alpha Tee");
    assert_eq!(a.cost(), 10.0);
    assert_eq!(a.rating(), 4);
    assert_eq!(a.image_url(), "https://img/a.png");
    assert_eq!(catalog.get(&pid("C")).unwrap().cost(), 35.5);
}

#[tokio::test]
async fn catalog_can_be_filtered() {
    let srv = TestServer::spawn(&[]).await;
    let client = srv.client();

    let fashion = client
        .fetch_catalog(Some(&CatalogQuery::category("Fashion")))
        .await
        .unwrap();
    assert_eq!(fashion.len(), 2);
    assert!(!fashion.contains(&pid("B")));

    let searched = client
        .fetch_catalog(Some(&CatalogQuery::text("phone")))
        .await
        .unwrap();
    assert_eq!(searched.len(), 1);
    assert!(searched.contains(&pid("B")));
}

#[tokio::test]
async fn cart_requires_a_valid_token() {
    let srv = TestServer::spawn(&[("A", 1)]).await;
    let stranger = AuthToken::new("someone-else").unwrap();

    let err = srv.client().fetch_cart(Some(&stranger)).await.unwrap_err();
    assert!(matches!(err, RemoteError::Unauthorized));

    let err = srv
        .client()
        .update_cart(&stranger, &pid("A"), 3)
        .await
        .unwrap_err();
    assert_eq!(MutationError::from(err), MutationError::Unauthenticated);
}

#[tokio::test]
async fn updates_return_the_whole_cart() {
    let srv = TestServer::spawn(&[]).await;
    let client = srv.client();

    let cart = client.update_cart(&token(), &pid("A"), 2).await.unwrap();
    assert_eq!(cart, vec![CartReference::new(pid("A"), 2)]);

    client.update_cart(&token(), &pid("B"), 1).await.unwrap();
    let cart = client.update_cart(&token(), &pid("A"), 0).await.unwrap();
    assert_eq!(cart, vec![CartReference::new(pid("B"), 1)]);

    let fetched = client.fetch_cart(Some(&token())).await.unwrap();
    assert_eq!(fetched, cart);
}

#[tokio::test]
async fn unknown_product_is_reported() {
    let srv = TestServer::spawn(&[]).await;

    let err = srv
        .client()
        .update_cart(&token(), &pid("nope"), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteError::UnknownProduct(ref id) if *id == pid("nope")));
}

#[tokio::test]
async fn bad_request_is_not_reported_as_unknown_product() {
    let srv = TestServer::spawn(&[]).await;

    let err = srv
        .client()
        .update_cart(&token(), &pid("A"), 500)
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteError::Api(400, _)));
    assert_eq!(MutationError::from(err).notice(), Notice::Transient);
    assert!(srv.backend.cart.lock().unwrap().is_empty());
}

#[tokio::test]
async fn blank_product_name_does_not_drop_the_catalog() {
    let app = Router::new().route(
        "/api/v1/products",
        get(|| async {
            Json(json!([
                { "_id": "A", "name": "Alpha Tee", "category": "Fashion", "cost": 10 },
                { "_id": "B", "name": "", "category": "Fashion", "cost": 20 }
            ]))
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let api_url = format!("http://{}/api/v1", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = HttpBackend::new(api_url, Duration::from_secs(5)).unwrap();
    let catalog = client.fetch_catalog(None).await.unwrap();
    handle.abort();

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.get(&pid("A")).unwrap().name(), "Alpha Tee");
    assert_eq!(catalog.get(&pid("B")).unwrap().cost(), 20.0);
}

#[tokio::test]
async fn server_error_is_transient() {
    let srv = TestServer::spawn(&[]).await;
    srv.backend.fail_updates.store(true, Ordering::SeqCst);

    let err = srv
        .client()
        .update_cart(&token(), &pid("A"), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteError::Api(500, _)));
    assert_eq!(MutationError::from(err).notice(), Notice::Transient);
}

#[tokio::test]
async fn storefront_round_trip_over_http() {
    let srv = TestServer::spawn(&[("Z", 1), ("C", 1)]).await;
    let backend = Arc::new(srv.client());
    let session = Arc::new(InMemorySessionStore::new(Session::signed_in(
        token(),
        "crio.do",
        Some(100.0),
    )));
    let mut storefront = Storefront::new(backend.clone(), backend, session);

    storefront.load(None).await.unwrap();
    // Z is not in the catalog
    assert_eq!(storefront.items().len(), 1);
    assert_eq!(storefront.total(), 35.5);

    storefront.add_to_cart(pid("A"), true).await.unwrap();
    let items = storefront.increment(&pid("A")).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(storefront.total(), 55.5);
    assert_eq!(storefront.balance_covers_cart(), Some(true));

    srv.backend.fail_updates.store(true, Ordering::SeqCst);
    let err = storefront.increment(&pid("A")).await.unwrap_err();
    assert_eq!(err.notice(), Notice::Transient);
    assert_eq!(storefront.total(), 55.5);

    let server_cart = srv.backend.cart.lock().unwrap().clone();
    assert_eq!(
        server_cart,
        vec![("Z".to_string(), 1), ("C".to_string(), 1), ("A".to_string(), 2)]
    );
}
