//! Read-only product catalog with listing filters and sort orders.
//!
//! The catalog is supplied by the surrounding application; the store never
//! reads it. Listing applies filters in a fixed order (search, category,
//! gender, price range, limited edition) and then sorts.

use std::collections::{BTreeSet, HashSet};

use perfume_house_core::{Gender, Product, ProductId};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;

/// Errors loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid catalog YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate product id in catalog: {0}")]
    DuplicateId(ProductId),

    #[error("negative price for product {id}: {price}")]
    NegativePrice { id: ProductId, price: Decimal },

    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),
}

/// Listing sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Featured products first, catalog order otherwise.
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "featured" => Ok(Self::Featured),
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "name_asc" => Ok(Self::NameAsc),
            "name_desc" => Ok(Self::NameDesc),
            _ => Err(format!("invalid sort order: {s}")),
        }
    }
}

/// Filters for [`Catalog::query`]. `None` means "all".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub gender: Option<Gender>,
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub limited_only: bool,
    pub sort_by: SortBy,
}

impl ProductQuery {
    /// Upper bound of the storefront's price slider.
    pub const DEFAULT_MAX_PRICE: i64 = 10_000;
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            gender: None,
            min_price: Decimal::ZERO,
            max_price: Decimal::from(Self::DEFAULT_MAX_PRICE),
            limited_only: false,
            sort_by: SortBy::default(),
        }
    }
}

/// Static list of products.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids and negative prices.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` or `CatalogError::NegativePrice`
    /// for the first offending product.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(&product.id) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
            if product.price < Decimal::ZERO {
                return Err(CatalogError::NegativePrice {
                    id: product.id.clone(),
                    price: product.price,
                });
            }
        }
        Ok(Self { products })
    }

    /// Parse a YAML list of products.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid YAML, duplicate ids or negative prices.
    pub fn from_yaml(source: &str) -> Result<Self, CatalogError> {
        Self::new(serde_yaml::from_str(source)?)
    }

    /// Parse a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid JSON, duplicate ids or negative prices.
    pub fn from_json(source: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str(source)?)
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    /// Look up a product that must exist.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownProduct` if the id is not in the catalog.
    pub fn require(&self, id: &ProductId) -> Result<&Product, CatalogError> {
        self.find(id)
            .ok_or_else(|| CatalogError::UnknownProduct(id.clone()))
    }

    /// Distinct categories, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        self.products
            .iter()
            .map(|product| product.category.as_str())
            .filter(|category| !category.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Products matching `query`, sorted by `query.sort_by`.
    #[instrument(skip(self), fields(total = self.products.len()))]
    pub fn query(&self, query: &ProductQuery) -> Vec<&Product> {
        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut result: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| {
                needle.as_ref().is_none_or(|n| {
                    p.name.to_lowercase().contains(n) || p.description.to_lowercase().contains(n)
                })
            })
            .filter(|p| query.category.as_ref().is_none_or(|c| &p.category == c))
            .filter(|p| query.gender.is_none_or(|g| p.gender == g))
            .filter(|p| p.price >= query.min_price && p.price <= query.max_price)
            .filter(|p| !query.limited_only || p.is_limited)
            .collect();

        match query.sort_by {
            SortBy::Featured => result.sort_by_key(|p| !p.featured),
            SortBy::PriceAsc => result.sort_by(|a, b| a.price.cmp(&b.price)),
            SortBy::PriceDesc => result.sort_by(|a, b| b.price.cmp(&a.price)),
            SortBy::NameAsc => result.sort_by_cached_key(|p| p.name.to_lowercase()),
            SortBy::NameDesc => {
                result.sort_by_cached_key(|p| std::cmp::Reverse(p.name.to_lowercase()));
            }
        }

        tracing::debug!(matched = result.len(), "Catalog query");
        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const CATALOG: &str = r"
- id: rose-oud
  name: Rose Oud
  price: 4999
  description: Damask rose over smoky oud
  category: oriental
  gender: women
  isLimited: true
  featured: false
- id: citrus-veil
  name: Citrus Veil
  price: 1299
  description: Bergamot and neroli
  category: fresh
  gender: unisex
  featured: true
- id: midnight-leather
  name: Midnight Leather
  price: 3499
  description: Leather, tobacco and a whisper of rose
  category: woody
  gender: men
  featured: true
- id: amber-dusk
  name: amber dusk
  price: 12500
  description: Resinous amber
  category: oriental
  gender: unisex
";

    fn catalog() -> Catalog {
        Catalog::from_yaml(CATALOG).unwrap()
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_default_query_hides_products_above_price_cap() {
        let catalog = catalog();
        let result = catalog.query(&ProductQuery::default());
        assert_eq!(
            ids(&result),
            vec!["citrus-veil", "midnight-leather", "rose-oud"]
        );
    }

    #[test]
    fn test_search_matches_name_and_description() {
        let catalog = catalog();
        let query = ProductQuery {
            search: Some("ROSE".to_string()),
            sort_by: SortBy::NameAsc,
            ..ProductQuery::default()
        };
        assert_eq!(
            ids(&catalog.query(&query)),
            vec!["midnight-leather", "rose-oud"]
        );
    }

    #[test]
    fn test_category_gender_and_limited_filters() {
        let catalog = catalog();
        let query = ProductQuery {
            category: Some("oriental".to_string()),
            max_price: Decimal::from(20_000),
            ..ProductQuery::default()
        };
        assert_eq!(catalog.query(&query).len(), 2);

        let query = ProductQuery {
            gender: Some(Gender::Men),
            ..ProductQuery::default()
        };
        assert_eq!(ids(&catalog.query(&query)), vec!["midnight-leather"]);

        let query = ProductQuery {
            limited_only: true,
            ..ProductQuery::default()
        };
        assert_eq!(ids(&catalog.query(&query)), vec!["rose-oud"]);
    }

    #[test]
    fn test_sort_orders() {
        let catalog = catalog();
        let mut query = ProductQuery {
            max_price: Decimal::from(20_000),
            sort_by: SortBy::PriceDesc,
            ..ProductQuery::default()
        };
        assert_eq!(
            ids(&catalog.query(&query)),
            vec!["amber-dusk", "rose-oud", "midnight-leather", "citrus-veil"]
        );

        query.sort_by = SortBy::PriceAsc;
        assert_eq!(
            ids(&catalog.query(&query)).first().map(String::as_str),
            Some("citrus-veil")
        );

        query.sort_by = SortBy::NameDesc;
        assert_eq!(
            ids(&catalog.query(&query)),
            vec!["rose-oud", "midnight-leather", "citrus-veil", "amber-dusk"]
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"[{"id":"a","name":"A","price":1},{"id":"a","name":"B","price":2}]"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::DuplicateId(id)) if id.as_str() == "a"
        ));
    }

    #[test]
    fn test_negative_price_rejected() {
        let json = r#"[
            {"id": "free", "name": "Sample", "price": 0},
            {"id": "b", "name": "B", "price": "-1.50"}
        ]"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::NegativePrice { ref id, price }
                if id.as_str() == "b" && price == Decimal::new(-150, 2)
        ));
        assert_eq!(err.to_string(), "negative price for product b: -1.50");
    }

    #[test]
    fn test_categories_and_lookup() {
        let catalog = catalog();
        assert_eq!(catalog.categories(), vec!["fresh", "oriental", "woody"]);
        assert!(catalog.find(&ProductId::new("citrus-veil")).is_some());
        assert!(matches!(
            catalog.require(&ProductId::new("nope")),
            Err(CatalogError::UnknownProduct(_))
        ));
    }

    #[test]
    fn test_sort_by_parses() {
        assert_eq!("price_desc".parse::<SortBy>().unwrap(), SortBy::PriceDesc);
        assert!("cheapest".parse::<SortBy>().is_err());
    }
}
