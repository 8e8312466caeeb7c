//! Nutrition records attached to ingredient nodes.

use crate::macros::Macros;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A number read leniently from a record, with the JSON it came from.
///
/// The coerced value is what calculations see; the raw JSON is what gets
/// written back, so unreadable text and unknown nested keys survive a
/// save.
#[derive(Debug, Clone, PartialEq)]
pub struct Stored<T> {
    value: T,
    raw: Value,
}

/// Conversion between a stored value and its JSON form
pub trait StoredValue: Sized {
    /// Read a value, defaulting whatever cannot be read
    fn from_raw(raw: &Value) -> Self;
    /// JSON written for a freshly computed value
    fn to_raw(&self) -> Value;
}

impl StoredValue for Macros {
    fn from_raw(raw: &Value) -> Self {
        Macros::from_json(raw)
    }

    fn to_raw(&self) -> Value {
        self.to_json()
    }
}

impl StoredValue for Option<f64> {
    fn from_raw(raw: &Value) -> Self {
        match raw {
            Value::Number(n) => n.as_f64().filter(|q| q.is_finite()),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|q| q.is_finite()),
            _ => None,
        }
    }

    fn to_raw(&self) -> Value {
        self.map_or(Value::Null, Value::from)
    }
}

impl<T: StoredValue> Stored<T> {
    /// Wrap a computed value
    #[must_use]
    pub fn new(value: T) -> Self {
        let raw = value.to_raw();
        Self { value, raw }
    }

    /// The coerced value
    pub fn get(&self) -> &T {
        &self.value
    }

    /// The JSON as read or as computed
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl<T: StoredValue> From<T> for Stored<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T> Serialize for Stored<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de, T: StoredValue> Deserialize<'de> for Stored<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(Self {
            value: T::from_raw(&raw),
            raw,
        })
    }
}

/// A quantity/unit pair together with the macros measured for it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountView {
    /// Quantity in `unit`, as stored
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub quantity: Option<Stored<Option<f64>>>,
    /// Unit text as stored (canonical key or alias)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Unit as the user typed it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_unit: Option<String>,
    /// Macros for this quantity, as stored
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub values: Option<Stored<Macros>>,
    /// Keys this crate does not know about
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl AmountView {
    /// Create a view for `quantity` of `unit`
    #[must_use]
    pub fn new(quantity: f64, unit: impl Into<String>, values: Macros) -> Self {
        Self {
            quantity: Some(Stored::new(Some(quantity))),
            unit: Some(unit.into()),
            display_unit: None,
            values: Some(Stored::new(values)),
            extra: serde_json::Map::new(),
        }
    }

    /// Set the display unit
    #[must_use]
    pub fn with_display_unit(mut self, unit: impl Into<String>) -> Self {
        self.display_unit = Some(unit.into());
        self
    }

    /// Quantity as a number, if it reads as one
    #[must_use]
    pub fn quantity(&self) -> Option<f64> {
        self.quantity.as_ref().and_then(|q| *q.get())
    }

    /// Macros for this view, if present
    #[must_use]
    pub fn macros(&self) -> Option<Macros> {
        self.values.as_ref().map(|v| *v.get())
    }

    /// Quantity and unit, when both are present
    #[must_use]
    pub fn reference(&self) -> Option<(f64, &str)> {
        match (self.quantity(), self.unit.as_deref()) {
            (Some(q), Some(u)) => Some((q, u)),
            _ => None,
        }
    }

    /// Short human label such as `"100 g"`
    #[must_use]
    pub fn describe(&self) -> String {
        let quantity = match self.quantity() {
            Some(q) if (q - q.round()).abs() < 0.01 => format!("{}", q.round()),
            Some(q) => format!("{:.2}", q).trim_end_matches('0').trim_end_matches('.').to_string(),
            None => String::new(),
        };
        let unit = self.display_unit.as_deref().or(self.unit.as_deref()).unwrap_or("");
        format!("{} {}", quantity, unit).trim().to_string()
    }
}

/// Nutrition data for one ingredient.
///
/// Records are replaced wholesale on every edit; nothing mutates a single
/// field of a record that is already attached to a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionRecord {
    /// Macros for the ingredient as used
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub values: Option<Stored<Macros>>,
    /// Scaled slice matching the ingredient's entered amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_amount: Option<AmountView>,
    /// Canonical serving reported by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_reference: Option<AmountView>,
    /// Advisory attached when scaling fell back to reference figures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Product name reported by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    /// Brand reported by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Product barcode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    /// Link to the provider's product page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Keys this crate does not know about
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl NutritionRecord {
    /// Record holding only plain values
    #[must_use]
    pub fn from_values(values: Macros) -> Self {
        Self {
            values: Some(Stored::new(values)),
            ..Self::default()
        }
    }

    /// The record's own `values`, if present
    #[must_use]
    pub fn macros(&self) -> Option<Macros> {
        self.values.as_ref().map(|v| *v.get())
    }

    /// Macros to use for the ingredient: `values`, then the per-amount
    /// view, then the per-reference view, then zero.
    #[must_use]
    pub fn base_macros(&self) -> Macros {
        self.macros()
            .or_else(|| self.per_amount.as_ref().and_then(AmountView::macros))
            .or_else(|| self.per_reference.as_ref().and_then(AmountView::macros))
            .unwrap_or(Macros::ZERO)
            .sanitized()
    }
}

/// A key that is present, even as `null`, is kept
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
