use serde::{Deserialize, Serialize};

use crate::id::ProductId;

/// Price expressed as whole units plus nano units of a currency.
///
/// `units = 19, nanos = 990_000_000` is 19.99. Both parts carry the same sign
/// for negative amounts; the catalog never validates this.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub currency_code: String,
    pub units: i64,
    pub nanos: i32,
}

impl Money {
    pub fn new(currency_code: impl Into<String>, units: i64, nanos: i32) -> Self {
        Self {
            currency_code: currency_code.into(),
            units,
            nanos,
        }
    }

    pub fn usd(units: i64, nanos: i32) -> Self {
        Self::new("USD", units, nanos)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::usd(0, 0)
    }
}

/// A catalog product.
///
/// Parsed once from a catalog file and never mutated afterwards. Field names
/// on the wire are camelCase (`priceUsd`), matching the catalog file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    picture: String,
    price_usd: Money,
    categories: Vec<String>,
}

impl Product {
    /// Build a product with an empty picture, a zero USD price and no categories.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            picture: String::new(),
            price_usd: Money::default(),
            categories: Vec::new(),
        }
    }

    pub fn with_picture(mut self, picture: impl Into<String>) -> Self {
        self.picture = picture.into();
        self
    }

    pub fn with_price(mut self, price: Money) -> Self {
        self.price_usd = price;
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn picture(&self) -> &str {
        &self.picture
    }

    pub fn price_usd(&self) -> &Money {
        &self.price_usd
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }
}
