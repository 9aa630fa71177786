//! HTTP adapter for the storefront backend.
//!
//! Endpoints, relative to the configured API URL:
//! - `GET  /products[?category=..]` -> `[Product]`
//! - `GET  /cart` (bearer auth)     -> `[{productId, qty}]`
//! - `POST /cart` (bearer auth) with `{productId, qty}` -> `[{productId, qty}]`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};

use storefront_auth::AuthToken;
use storefront_cart::CartReference;
use storefront_catalog::{Catalog, CatalogQuery, ProductId};

use crate::error::RemoteError;
use crate::source::{CartStore, CatalogSource};

/// `reqwest`-backed implementation of both collaborators.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    api_url: String,
}

impl HttpBackend {
    /// Every request gives up after `timeout`.
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, api_url })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}

/// Map non-success statuses into `RemoteError`. `product_id` is the product a
/// cart update was about, if any.
async fn check_status(resp: Response, product_id: Option<&ProductId>) -> Result<Response, RemoteError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    match (status, product_id) {
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _) => Err(RemoteError::Unauthorized),
        (StatusCode::NOT_FOUND, Some(id)) => Err(RemoteError::UnknownProduct(id.clone())),
        _ => Err(RemoteError::Api(
            status.as_u16(),
            resp.text().await.unwrap_or_default(),
        )),
    }
}

async fn parse_references(resp: Response) -> Result<Vec<CartReference>, RemoteError> {
    resp.json()
        .await
        .map_err(|e| RemoteError::Parse(format!("failed to parse cart: {}", e)))
}

#[async_trait]
impl CatalogSource for HttpBackend {
    async fn fetch_catalog(&self, query: Option<&CatalogQuery>) -> Result<Catalog, RemoteError> {
        let mut req = self.client.get(self.url("/products"));
        if let Some(category) = query.and_then(|q| q.category.as_deref()) {
            req = req.query(&[("category", category)]);
        }

        let resp = req.send().await.map_err(|e| RemoteError::Network(e.to_string()))?;
        let resp = check_status(resp, None).await?;
        let catalog: Catalog = resp
            .json()
            .await
            .map_err(|e| RemoteError::Parse(format!("failed to parse products: {}", e)))?;

        tracing::debug!(products = catalog.len(), "catalog fetched");

        // Text search is not a server-side filter; category filtering is
        // reapplied so backends that ignore the parameter behave the same.
        match query {
            Some(q) => {
                let products = catalog.search(q).into_iter().cloned().collect();
                Catalog::new(products).map_err(|e| RemoteError::Parse(e.to_string()))
            }
            None => Ok(catalog),
        }
    }
}

#[async_trait]
impl CartStore for HttpBackend {
    async fn fetch_cart(&self, token: Option<&AuthToken>) -> Result<Vec<CartReference>, RemoteError> {
        let Some(token) = token else {
            return Ok(Vec::new());
        };

        let resp = self
            .client
            .get(self.url("/cart"))
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        let resp = check_status(resp, None).await?;
        let references = parse_references(resp).await?;

        tracing::debug!(lines = references.len(), "cart fetched");
        Ok(references)
    }

    async fn update_cart(
        &self,
        token: &AuthToken,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Vec<CartReference>, RemoteError> {
        let body = CartReference::new(product_id.clone(), quantity);
        let resp = self
            .client
            .post(self.url("/cart"))
            .bearer_auth(token.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        let resp = check_status(resp, Some(product_id)).await?;
        parse_references(resp).await
    }
}
