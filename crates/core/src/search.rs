//! Case-insensitive substring matching for catalog search.
//!
//! Search is a plain linear scan: a product matches when its name or its
//! description contains the query, ignoring case. The empty query matches
//! everything.

use crate::product::Product;

/// A search query normalized once and reused for every product in a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    lowered: String,
}

impl SearchQuery {
    pub fn new(raw: &str) -> Self {
        Self {
            lowered: fold_case(raw),
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        if self.lowered.is_empty() {
            return true;
        }

        contains_lowered(product.name(), &self.lowered)
            || contains_lowered(product.description(), &self.lowered)
    }

    /// Collect every matching product, preserving input order.
    pub fn filter<'a, I>(&self, products: I) -> Vec<Product>
    where
        I: IntoIterator<Item = &'a Product>,
    {
        products
            .into_iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect()
    }
}

fn contains_lowered(haystack: &str, needle_lowered: &str) -> bool {
    fold_case(haystack).contains(needle_lowered)
}

/// Lowercase one char at a time, so a word-final `Σ` folds to `σ` like any
/// other (`str::to_lowercase` gives `ς`).
fn fold_case(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}
