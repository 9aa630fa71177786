use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, Entity};

/// Highest star rating a product can carry.
pub const MAX_RATING: u8 = 5;

/// Opaque product identifier assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> DomainResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::invalid_id("ProductId cannot be empty"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::str::FromStr for ProductId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ProductId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductId> for String {
    fn from(value: ProductId) -> Self {
        value.0
    }
}

/// A sellable product.
///
/// Immutable once built: the only constructors validate, and there are no
/// setters. Serialized with the backend's field names (`_id`, `image`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProductRecord", into = "ProductRecord")]
pub struct Product {
    id: ProductId,
    name: String,
    category: String,
    cost: f64,
    rating: u8,
    image_url: String,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        category: impl Into<String>,
        cost: f64,
        rating: u8,
        image_url: impl Into<String>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if !cost.is_finite() || cost < 0.0 {
            return Err(DomainError::validation(format!(
                "product {id}: cost must be a non-negative number, got {cost}"
            )));
        }
        if rating > MAX_RATING {
            return Err(DomainError::validation(format!(
                "product {id}: rating must be between 0 and {MAX_RATING}, got {rating}"
            )));
        }

        Ok(Self {
            id,
            name,
            category: category.into(),
            cost,
            rating,
            image_url: image_url.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Classification only; never used in price computation.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Unit price.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// Case-insensitive match of `needle` against name or category.
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&needle) || self.category.to_lowercase().contains(&needle)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Wire shape of a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProductRecord {
    #[serde(rename = "_id")]
    id: ProductId,
    name: String,
    #[serde(default)]
    category: String,
    cost: f64,
    #[serde(default)]
    rating: u8,
    #[serde(rename = "image", default)]
    image_url: String,
}

impl TryFrom<ProductRecord> for Product {
    type Error = DomainError;

    fn try_from(r: ProductRecord) -> Result<Self, Self::Error> {
        Product::new(r.id, r.name, r.category, r.cost, r.rating, r.image_url)
    }
}

impl From<Product> for ProductRecord {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            category: p.category,
            cost: p.cost,
            rating: p.rating,
            image_url: p.image_url,
        }
    }
}
