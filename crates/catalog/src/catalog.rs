use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, Entity};

use crate::product::{Product, ProductId};

/// Filter applied when browsing the catalog.
///
/// Both criteria are optional; an empty query matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Exact category match (case-insensitive).
    pub category: Option<String>,
    /// Free text matched against product name and category.
    pub text: Option<String>,
}

impl CatalogQuery {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            text: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            category: None,
            text: Some(text.into()),
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|c| product.category().eq_ignore_ascii_case(c.trim()));
        let text_ok = self.text.as_deref().is_none_or(|t| product.matches_text(t));
        category_ok && text_ok
    }
}

/// The full list of sellable products, indexed by id.
///
/// Keeps the order the backend served products in. Product ids are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Product>", into = "Vec<Product>")]
pub struct Catalog {
    products: Vec<Product>,
    #[serde(skip)]
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build an index over `products`, rejecting duplicate ids.
    pub fn new(products: Vec<Product>) -> DomainResult<Self> {
        let mut index = HashMap::with_capacity(products.len());
        for (pos, product) in products.iter().enumerate() {
            if index.insert(product.id().clone(), pos).is_some() {
                tracing::warn!(product_id = %product.id(), "duplicate product id in catalog");
                return Err(DomainError::invariant(format!(
                    "duplicate product id in catalog: {}",
                    product.id()
                )));
            }
        }
        Ok(Self { products, index })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).map(|&pos| &self.products[pos])
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.index.contains_key(id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products matching `query`, in catalog order.
    pub fn search(&self, query: &CatalogQuery) -> Vec<&Product> {
        self.products.iter().filter(|p| query.matches(p)).collect()
    }

    /// Distinct non-empty categories, sorted.
    pub fn categories(&self) -> Vec<&str> {
        self.products
            .iter()
            .map(Product::category)
            .filter(|c| !c.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl TryFrom<Vec<Product>> for Catalog {
    type Error = DomainError;

    fn try_from(products: Vec<Product>) -> Result<Self, Self::Error> {
        Self::new(products)
    }
}

impl From<Catalog> for Vec<Product> {
    fn from(catalog: Catalog) -> Self {
        catalog.products
    }
}
