//! Contract for an external nutrition provider.
//!
//! The core never talks to the network. A provider is anything that
//! implements [`NutritionLookup`]; [`CatalogLookup`] serves products from
//! an in-memory list shaped like Open Food Facts responses.

use mise_core::{coerce_number, AmountView, Macros};
use mise_units::Unit;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lookup error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// Provider has no matching product
    #[error("No nutrition data found")]
    NotFound,
    /// Provider failed
    #[error("Nutrition provider error {status}: {message}")]
    Provider {
        /// Status code reported by the provider
        status: u16,
        /// Provider message
        message: String,
    },
}

/// Nutrition figures for a provider's reference serving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderNutrition {
    /// Macros for the reference serving
    pub values: Macros,
    /// Reference serving quantity
    pub reference_quantity: f64,
    /// Reference serving unit
    pub reference_unit: Unit,
    /// Product name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    /// Brand
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Barcode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    /// Product page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl ProviderNutrition {
    /// Figures per 100 g, the basis Open Food Facts reports
    #[must_use]
    pub fn per_100g(values: Macros) -> Self {
        Self {
            values,
            reference_quantity: 100.0,
            reference_unit: Unit::Gram,
            product_name: None,
            brand: None,
            barcode: None,
            source_url: None,
        }
    }

    /// The reference serving as a record view
    #[must_use]
    pub fn reference_view(&self) -> AmountView {
        AmountView::new(self.reference_quantity, self.reference_unit.key(), self.values)
    }
}

/// A source of nutrition data
pub trait NutritionLookup {
    /// Best match for a free-text ingredient name
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NotFound`] when nothing matches
    fn by_name(&self, name: &str) -> Result<ProviderNutrition, LookupError>;

    /// Product with the given barcode
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NotFound`] when nothing matches
    fn by_barcode(&self, barcode: &str) -> Result<ProviderNutrition, LookupError>;
}

/// Read an Open Food Facts product.
///
/// Each nutrient prefers its `_100g` key and falls back to the bare key.
/// Missing or unreadable numbers become zero.
#[must_use]
pub fn extract_nutrients(product: &Value) -> ProviderNutrition {
    let nutriments = product.get("nutriments");
    let nutrient = |key: &str| {
        let per_100g = format!("{}_100g", key);
        nutriments
            .and_then(|n| present(n.get(per_100g.as_str())).or_else(|| present(n.get(key))))
            .map_or(0.0, coerce_number)
    };

    ProviderNutrition {
        product_name: text_field(product, "product_name"),
        brand: text_field(product, "brands"),
        barcode: text_field(product, "code"),
        source_url: text_field(product, "url"),
        ..ProviderNutrition::per_100g(Macros::new(
            nutrient("energy-kcal"),
            nutrient("proteins"),
            nutrient("fat"),
            nutrient("carbohydrates"),
        ))
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn text_field(product: &Value, key: &str) -> Option<String> {
    match product.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Lookup over an in-memory product list
#[derive(Debug, Clone, Default)]
pub struct CatalogLookup {
    products: Vec<Value>,
}

impl CatalogLookup {
    /// Catalog over the given products
    #[must_use]
    pub fn new(products: Vec<Value>) -> Self {
        Self { products }
    }

    /// Parse a catalog document: either a product array or an object
    /// with a `products` array, as returned by a search query.
    ///
    /// # Errors
    ///
    /// Returns error if `text` is not JSON
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let products = match serde_json::from_str::<Value>(text)? {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("products") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        Ok(Self::new(products))
    }

    /// Number of products
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl NutritionLookup for CatalogLookup {
    fn by_name(&self, name: &str) -> Result<ProviderNutrition, LookupError> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return Err(LookupError::NotFound);
        }
        self.products
            .iter()
            .find(|p| {
                text_field(p, "product_name")
                    .is_some_and(|n| n.to_lowercase().contains(&needle))
            })
            .map(extract_nutrients)
            .ok_or(LookupError::NotFound)
    }

    fn by_barcode(&self, barcode: &str) -> Result<ProviderNutrition, LookupError> {
        let barcode = barcode.trim();
        self.products
            .iter()
            .find(|p| text_field(p, "code").as_deref() == Some(barcode))
            .map(extract_nutrients)
            .ok_or(LookupError::NotFound)
    }
}
