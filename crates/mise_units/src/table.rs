//! The canonical unit table.
//!
//! Every unit belongs to exactly one [`UnitKind`] and carries a fixed
//! factor to that kind's base unit (grams for mass, milliliters for
//! volume).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical type of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// Measured by weight, base unit grams
    Mass,
    /// Measured by volume, base unit milliliters
    Volume,
}

impl UnitKind {
    /// The kind's base unit
    #[must_use]
    pub const fn base_unit(&self) -> Unit {
        match self {
            Self::Mass => Unit::Gram,
            Self::Volume => Unit::Milliliter,
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mass => write!(f, "mass"),
            Self::Volume => write!(f, "volume"),
        }
    }
}

/// A canonical kitchen unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Unit {
    /// Gram
    Gram,
    /// Kilogram
    Kilogram,
    /// Milligram
    Milligram,
    /// Avoirdupois pound
    Pound,
    /// Avoirdupois ounce
    Ounce,
    /// Milliliter
    Milliliter,
    /// Liter
    Liter,
    /// US teaspoon
    Teaspoon,
    /// US tablespoon
    Tablespoon,
    /// Kitchen cup
    Cup,
}

impl Unit {
    /// Every unit in table order
    pub const ALL: [Unit; 10] = [
        Unit::Gram,
        Unit::Kilogram,
        Unit::Milligram,
        Unit::Pound,
        Unit::Ounce,
        Unit::Milliliter,
        Unit::Liter,
        Unit::Teaspoon,
        Unit::Tablespoon,
        Unit::Cup,
    ];

    /// Canonical key, e.g. `"g"` or `"tbsp"`
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Gram => "g",
            Self::Kilogram => "kg",
            Self::Milligram => "mg",
            Self::Pound => "lb",
            Self::Ounce => "oz",
            Self::Milliliter => "ml",
            Self::Liter => "l",
            Self::Teaspoon => "tsp",
            Self::Tablespoon => "tbsp",
            Self::Cup => "cup",
        }
    }

    /// Physical type
    #[must_use]
    pub const fn kind(&self) -> UnitKind {
        match self {
            Self::Gram | Self::Kilogram | Self::Milligram | Self::Pound | Self::Ounce => {
                UnitKind::Mass
            }
            Self::Milliliter | Self::Liter | Self::Teaspoon | Self::Tablespoon | Self::Cup => {
                UnitKind::Volume
            }
        }
    }

    /// Multiplicative factor to the kind's base unit
    #[must_use]
    pub const fn base_factor(&self) -> f64 {
        match self {
            Self::Gram => 1.0,
            Self::Kilogram => 1000.0,
            Self::Milligram => 0.001,
            Self::Pound => 453.59237,
            Self::Ounce => 28.349523125,
            Self::Milliliter => 1.0,
            Self::Liter => 1000.0,
            Self::Teaspoon => 4.92892,
            Self::Tablespoon => 14.7868,
            Self::Cup => 240.0,
        }
    }

    /// Lower-case spellings that resolve to this unit
    #[must_use]
    pub const fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Gram => &["g", "gram", "grams", "gramme", "grammes"],
            Self::Kilogram => &["kg", "kilogram", "kilograms"],
            Self::Milligram => &["mg", "milligram", "milligrams"],
            Self::Pound => &["lb", "lbs", "pound", "pounds"],
            Self::Ounce => &["oz", "ounce", "ounces"],
            Self::Milliliter => &["ml", "milliliter", "milliliters", "millilitre", "millilitres"],
            Self::Liter => &["l", "liter", "liters", "litre", "litres"],
            Self::Teaspoon => &["tsp", "teaspoon", "teaspoons"],
            Self::Tablespoon => &["tbsp", "tablespoon", "tablespoons"],
            Self::Cup => &["cup", "cups"],
        }
    }

    /// Look up by canonical key only (no alias resolution)
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.key() == key)
    }

    /// Convert `quantity` of this unit to the base unit
    #[must_use]
    pub fn to_base(&self, quantity: f64) -> f64 {
        quantity * self.base_factor()
    }

    /// Convert `quantity` of this unit to `target`, refusing cross-type conversion
    #[must_use]
    pub fn convert(&self, quantity: f64, target: Unit) -> Option<f64> {
        if self.kind() != target.kind() {
            return None;
        }
        Some(self.to_base(quantity) / target.base_factor())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.key().to_string()
    }
}

impl TryFrom<String> for Unit {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        crate::parse::normalize_unit(&raw).ok_or_else(|| format!("unknown unit: {}", raw))
    }
}
