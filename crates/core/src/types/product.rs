//! Catalog product record and the purchasable capability.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// What the cart and wishlist need from a product.
///
/// The store only ever reads an identifier, a unit price and a name for
/// notifications; everything else about a product is opaque payload that is
/// carried along and persisted as-is.
pub trait Purchasable {
    /// Unique catalog identifier.
    fn product_id(&self) -> &ProductId;

    /// Price of a single unit in the currency's major unit.
    fn unit_price(&self) -> Decimal;

    /// Name used in user-facing notifications.
    fn display_name(&self) -> &str {
        self.product_id().as_str()
    }
}

/// Target audience of a fragrance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Men,
    Women,
    #[default]
    Unisex,
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "men" => Ok(Self::Men),
            "women" => Ok(Self::Women),
            "unisex" => Ok(Self::Unisex),
            _ => Err(format!("invalid gender: {s}")),
        }
    }
}

/// Ribbon tied around the bottle on product cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RibbonColor {
    #[default]
    Pink,
    Green,
    Purple,
}

/// A catalog product.
///
/// Field names serialize in camelCase so records written by the browser
/// storefront (`topNotes`, `isLimited`, `inStock`) load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub top_notes: Vec<String>,
    #[serde(default)]
    pub middle_notes: Vec<String>,
    #[serde(default)]
    pub base_notes: Vec<String>,
    #[serde(default)]
    pub ribbon_color: RibbonColor,
    #[serde(default)]
    pub is_limited: bool,
    /// Bottle size in millilitres.
    #[serde(default)]
    pub size: u32,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub featured: bool,
}

const fn default_in_stock() -> bool {
    true
}

impl Purchasable for Product {
    fn product_id(&self) -> &ProductId {
        &self.id
    }

    fn unit_price(&self) -> Decimal {
        self.price
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}
