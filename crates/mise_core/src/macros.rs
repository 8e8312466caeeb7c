//! Macro-nutrient totals.
//!
//! Every number that enters a [`Macros`] value passes through
//! [`coerce_number`]: missing, null, non-numeric, and non-finite inputs
//! become zero. Arithmetic afterwards never produces "unknown".

use serde::{Deserialize, Deserializer, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Calories, protein, fat, and carbohydrates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    /// Energy in kcal
    #[serde(default, deserialize_with = "lenient_f64")]
    pub calories: f64,
    /// Protein in grams
    #[serde(default, deserialize_with = "lenient_f64")]
    pub protein: f64,
    /// Fat in grams
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fat: f64,
    /// Carbohydrates in grams
    #[serde(default, deserialize_with = "lenient_f64")]
    pub carbs: f64,
}

impl Macros {
    /// All-zero totals
    pub const ZERO: Self = Self {
        calories: 0.0,
        protein: 0.0,
        fat: 0.0,
        carbs: 0.0,
    };

    /// Create totals, zeroing any non-finite input
    #[must_use]
    pub fn new(calories: f64, protein: f64, fat: f64, carbs: f64) -> Self {
        Self {
            calories,
            protein,
            fat,
            carbs,
        }
        .sanitized()
    }

    /// Multiply every key by `ratio`
    #[must_use]
    pub fn scale(&self, ratio: f64) -> Self {
        Self::new(
            self.calories * ratio,
            self.protein * ratio,
            self.fat * ratio,
            self.carbs * ratio,
        )
    }

    /// Replace non-finite values with zero
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            calories: finite_or_zero(self.calories),
            protein: finite_or_zero(self.protein),
            fat: finite_or_zero(self.fat),
            carbs: finite_or_zero(self.carbs),
        }
    }

    /// Read totals from any JSON value; a non-object reads as zero
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Self {
        let key = |name: &str| value.get(name).map_or(0.0, coerce_number);
        Self::new(key("calories"), key("protein"), key("fat"), key("carbs"))
    }

    /// The four keys as a JSON object
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "calories": self.calories,
            "protein": self.protein,
            "fat": self.fat,
            "carbs": self.carbs,
        })
    }

    /// Whether every key is zero
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.calories == 0.0 && self.protein == 0.0 && self.fat == 0.0 && self.carbs == 0.0
    }
}

impl Add for Macros {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.calories + rhs.calories,
            self.protein + rhs.protein,
            self.fat + rhs.fat,
            self.carbs + rhs.carbs,
        )
    }
}

impl AddAssign for Macros {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Macros {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Read an arbitrary JSON value as a finite number, defaulting to zero.
///
/// Numbers pass through, numeric strings are parsed (an empty string is
/// zero), booleans map to one and zero, everything else is zero.
#[must_use]
pub fn coerce_number(value: &serde_json::Value) -> f64 {
    let raw = match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        serde_json::Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    };
    finite_or_zero(raw)
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce_number(&value))
}
