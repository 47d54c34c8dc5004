//! Product Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Menu category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum ProductCategory {
    Food,
    Dessert,
    Drink,
    Salad,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 4] = [
        ProductCategory::Food,
        ProductCategory::Dessert,
        ProductCategory::Drink,
        ProductCategory::Salad,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Dessert => "dessert",
            Self::Drink => "drink",
            Self::Salad => "salad",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "food" => Ok(Self::Food),
            "dessert" => Ok(Self::Dessert),
            "drink" => Ok(Self::Drink),
            "salad" => Ok(Self::Salad),
            other => Err(format!("unknown product category: {other}")),
        }
    }
}

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: ProductCategory,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: ProductCategory,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<ProductCategory>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
}

/// Product listing filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductQuery {
    pub category: Option<ProductCategory>,
    #[serde(default)]
    pub available_only: bool,
}

/// Name search (available products only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSearch {
    pub q: String,
}

/// Category with the number of products in it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CategorySummary {
    pub category: ProductCategory,
    pub product_count: i64,
}

/// Availability toggle payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductAvailability {
    pub is_available: bool,
}

/// Result of a product delete request
///
/// Products referenced by any order line are disabled instead of removed so
/// historical line items keep their product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductRemoval {
    Deleted,
    Disabled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_and_display() {
        assert_eq!("Drink".parse::<ProductCategory>(), Ok(ProductCategory::Drink));
        assert_eq!(ProductCategory::Salad.to_string(), "salad");
        assert!("pizza".parse::<ProductCategory>().is_err());
    }

    #[test]
    fn test_category_serde_lowercase() {
        let json = serde_json::to_string(&ProductCategory::Dessert).unwrap();
        assert_eq!(json, "\"dessert\"");
        let query: ProductQuery = serde_json::from_str(r#"{"category":"food"}"#).unwrap();
        assert_eq!(query.category, Some(ProductCategory::Food));
        assert!(!query.available_only);
    }
}
