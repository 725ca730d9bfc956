//! Product filtering, search and sorting.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::catalog::Product;
use crate::error::CatalogError;
use serde::{Deserialize, Serialize};

/// Sort options for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Catalog order by product ID.
    #[default]
    Default,
    /// Sort by price, low to high.
    PriceAsc,
    /// Sort by price, high to low.
    PriceDesc,
    /// Sort by name A-Z.
    NameAsc,
    /// Sort by name Z-A.
    NameDesc,
}

impl SortOption {
    /// Every option, in menu order.
    pub const ALL: [SortOption; 5] = [
        SortOption::Default,
        SortOption::PriceAsc,
        SortOption::PriceDesc,
        SortOption::NameAsc,
        SortOption::NameDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Default => "default",
            SortOption::PriceAsc => "price-asc",
            SortOption::PriceDesc => "price-desc",
            SortOption::NameAsc => "name-asc",
            SortOption::NameDesc => "name-desc",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Default => "Featured",
            SortOption::PriceAsc => "Price: Low to High",
            SortOption::PriceDesc => "Price: High to Low",
            SortOption::NameAsc => "Name: A-Z",
            SortOption::NameDesc => "Name: Z-A",
        }
    }

    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortOption::Default => a.id.natural_cmp(&b.id),
            SortOption::PriceAsc => a.price.total_cmp(&b.price),
            SortOption::PriceDesc => b.price.total_cmp(&a.price),
            SortOption::NameAsc => compare_names(&a.name, &b.name),
            SortOption::NameDesc => compare_names(&b.name, &a.name),
        }
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = CatalogError;

    /// Accepts both the short names and the long names used by the
    /// collection page (`price-low-to-high`, `name-a-to-z`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "default" | "id" | "featured" => Ok(SortOption::Default),
            "price-asc" | "price-low-to-high" => Ok(SortOption::PriceAsc),
            "price-desc" | "price-high-to-low" => Ok(SortOption::PriceDesc),
            "name-asc" | "name-a-to-z" => Ok(SortOption::NameAsc),
            "name-desc" | "name-z-to-a" => Ok(SortOption::NameDesc),
            other => Err(CatalogError::UnknownSort(other.to_string())),
        }
    }
}

/// A product listing query.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProductQuery {
    /// Exact category to keep; `None` or "all" keeps everything.
    pub category: Option<String>,
    /// Case-insensitive substring matched against the name.
    pub search: Option<String>,
    /// Sort option.
    pub sort: SortOption,
}

impl ProductQuery {
    /// Create a query that returns every product in catalog order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only one category. "all" and the empty string clear the filter.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = if category.is_empty() || category.eq_ignore_ascii_case("all") {
            None
        } else {
            Some(category)
        };
        self
    }

    /// Keep only products whose name contains `term`.
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = if term.trim().is_empty() { None } else { Some(term) };
        self
    }

    /// Set sort option.
    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// Check a single product against the filters.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if &product.category != category {
                return false;
            }
        }
        if let Some(term) = &self.search {
            if !product.name.to_lowercase().contains(&term.to_lowercase()) {
                return false;
            }
        }
        true
    }

    /// Filter and sort a copy of `products`; the input is left untouched.
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let mut results: Vec<Product> = products
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect();
        results.sort_by(|a, b| self.sort.compare(a, b));
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clothes() -> Vec<Product> {
        vec![
            Product::new("1", "Classic Tee", "Tops", 25.0),
            Product::new("2", "Denim Jeans", "Bottoms", 60.0),
            Product::new("3", "Hoodie", "Outerwear", 45.0),
            Product::new("5", "Leather Jacket", "Outerwear", 120.0),
            Product::new("10", "button-down shirt", "Tops", 40.0),
        ]
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_category_filter() {
        let results = ProductQuery::new().with_category("Outerwear").apply(&clothes());
        assert_eq!(ids(&results), vec!["3", "5"]);
    }

    #[test]
    fn test_all_category_keeps_everything() {
        let query = ProductQuery::new().with_category("All");
        assert_eq!(query.category, None);
        assert_eq!(query.apply(&clothes()).len(), 5);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let results = ProductQuery::new().with_search("JEANS").apply(&clothes());
        assert_eq!(ids(&results), vec!["2"]);
        assert!(ProductQuery::new().with_search("  ").search.is_none());
    }

    #[test]
    fn test_price_sorts() {
        let asc = ProductQuery::new().with_sort(SortOption::PriceAsc).apply(&clothes());
        assert_eq!(ids(&asc), vec!["1", "10", "3", "2", "5"]);

        let desc = ProductQuery::new().with_sort(SortOption::PriceDesc).apply(&clothes());
        assert_eq!(ids(&desc), vec!["5", "2", "3", "10", "1"]);
    }

    #[test]
    fn test_name_sort_ignores_case() {
        let results = ProductQuery::new().with_sort(SortOption::NameAsc).apply(&clothes());
        assert_eq!(ids(&results), vec!["10", "1", "2", "3", "5"]);
    }

    #[test]
    fn test_default_sort_is_numeric_by_id() {
        let mut products = clothes();
        products.reverse();
        let results = ProductQuery::new().apply(&products);
        assert_eq!(ids(&results), vec!["1", "2", "3", "5", "10"]);
    }

    #[test]
    fn test_combined_filter_and_sort() {
        let results = ProductQuery::new()
            .with_category("Tops")
            .with_search("t")
            .with_sort(SortOption::PriceDesc)
            .apply(&clothes());
        assert_eq!(ids(&results), vec!["10", "1"]);
    }

    #[test]
    fn test_parse_sort_names() {
        assert_eq!("price-low-to-high".parse::<SortOption>().unwrap(), SortOption::PriceAsc);
        assert_eq!("price-desc".parse::<SortOption>().unwrap(), SortOption::PriceDesc);
        assert_eq!("name-z-to-a".parse::<SortOption>().unwrap(), SortOption::NameDesc);
        assert_eq!("".parse::<SortOption>().unwrap(), SortOption::Default);
        assert!("cheapest".parse::<SortOption>().is_err());

        for option in SortOption::ALL {
            assert_eq!(option.as_str().parse::<SortOption>().unwrap(), option);
        }
    }
}
