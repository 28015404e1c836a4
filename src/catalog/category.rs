use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::Product;

pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Display name for a backend category id.
pub fn category_name(category_id: i64) -> &'static str {
    match category_id {
        1 => "Vegetables",
        2 => "Fruits",
        3 => "Seeds",
        _ => UNKNOWN_CATEGORY,
    }
}

/// Category selection for the product list, including the `All` sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Vegetables,
    Fruits,
    Seeds,
}

impl CategoryFilter {
    pub const ALL_OPTIONS: [CategoryFilter; 4] = [
        CategoryFilter::All,
        CategoryFilter::Vegetables,
        CategoryFilter::Fruits,
        CategoryFilter::Seeds,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Vegetables => "Vegetables",
            CategoryFilter::Fruits => "Fruits",
            CategoryFilter::Seeds => "Seeds",
        }
    }

    pub fn admits(&self, product: &Product) -> bool {
        match self {
            CategoryFilter::All => true,
            selected => product.category_name().eq_ignore_ascii_case(selected.as_str()),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL_OPTIONS
            .into_iter()
            .find(|option| option.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                format!(
                    "unknown category '{}', expected one of: All, Vegetables, Fruits, Seeds",
                    wanted
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(category_id: i64) -> Product {
        serde_json::from_value(json!({
            "id": category_id,
            "name": "item",
            "category_id": category_id,
            "price": 1.0,
        }))
        .unwrap()
    }

    #[test]
    fn test_category_mapping() {
        assert_eq!(category_name(1), "Vegetables");
        assert_eq!(category_name(2), "Fruits");
        assert_eq!(category_name(3), "Seeds");
        assert_eq!(category_name(0), "Unknown");
        assert_eq!(category_name(42), "Unknown");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("fruits".parse::<CategoryFilter>().unwrap(), CategoryFilter::Fruits);
        assert_eq!(" ALL ".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert!("Dairy".parse::<CategoryFilter>().is_err());
    }

    #[test]
    fn test_admits() {
        for id in 0..5 {
            assert!(CategoryFilter::All.admits(&product(id)));
        }

        assert!(CategoryFilter::Vegetables.admits(&product(1)));
        assert!(!CategoryFilter::Vegetables.admits(&product(2)));
        assert!(CategoryFilter::Seeds.admits(&product(3)));
        assert!(!CategoryFilter::Seeds.admits(&product(9)));
    }
}
