use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::category::CategoryFilter;
use crate::models::Product;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    PriceAsc,
    PriceDesc,
    /// Newest first.
    #[default]
    DateDesc,
    DateAsc,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::PriceAsc => "price_asc",
            SortMode::PriceDesc => "price_desc",
            SortMode::DateDesc => "date_desc",
            SortMode::DateAsc => "date_asc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortMode::PriceAsc => "Price: Low to High",
            SortMode::PriceDesc => "Price: High to Low",
            SortMode::DateDesc => "Newest First",
            SortMode::DateAsc => "Oldest First",
        }
    }

    /// Products without a creation timestamp count as older than every dated one.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortMode::PriceAsc => a.price.total_cmp(&b.price),
            SortMode::PriceDesc => b.price.total_cmp(&a.price),
            SortMode::DateDesc => b.created_at.cmp(&a.created_at),
            SortMode::DateAsc => a.created_at.cmp(&b.created_at),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price_asc" => Ok(SortMode::PriceAsc),
            "price_desc" => Ok(SortMode::PriceDesc),
            "date_desc" => Ok(SortMode::DateDesc),
            "date_asc" => Ok(SortMode::DateAsc),
            other => Err(format!(
                "unknown sort mode '{}', expected price_asc, price_desc, date_desc or date_asc",
                other
            )),
        }
    }
}

/// The user's current category, search and sort selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingQuery {
    pub category: CategoryFilter,
    pub search: String,
    pub sort: SortMode,
}

impl ListingQuery {
    pub fn new(category: CategoryFilter, search: impl Into<String>, sort: SortMode) -> Self {
        ListingQuery {
            category,
            search: search.into(),
            sort,
        }
    }

    /// Trimmed, lower-cased search text; `None` when blank.
    fn needle(&self) -> Option<String> {
        let trimmed = self.search.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }

    pub fn matches_search(&self, product: &Product) -> bool {
        match self.needle() {
            None => true,
            Some(needle) => matches_needle(product, &needle),
        }
    }

    /// Category filter, then search filter, then a stable sort.
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let needle = self.needle();

        let mut derived: Vec<Product> = products
            .iter()
            .filter(|product| self.category.admits(product))
            .filter(|product| match &needle {
                None => true,
                Some(needle) => matches_needle(product, needle),
            })
            .cloned()
            .collect();

        derived.sort_by(|a, b| self.sort.compare(a, b));
        derived
    }
}

fn matches_needle(product: &Product, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle)
        || product.category_name().to_lowercase().contains(needle)
}
