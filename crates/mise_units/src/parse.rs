//! Alias normalization and free-text quantity parsing.

use crate::table::{Unit, UnitKind};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

static ALIAS_LOOKUP: Lazy<HashMap<&'static str, Unit>> = Lazy::new(|| {
    Unit::ALL
        .into_iter()
        .flat_map(|unit| unit.aliases().iter().map(move |alias| (*alias, unit)))
        .collect()
});

static NUMBER_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]+(?:[.,][0-9]+)?)\s*([a-zA-Z]+)").expect("quantity pattern is valid")
});

/// A quantity found in free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedQuantity {
    /// Numeric amount
    pub quantity: f64,
    /// Canonical unit
    pub unit: Unit,
    /// Unit text exactly as written
    pub original_unit: String,
    /// Physical type of `unit`
    #[serde(rename = "type")]
    pub kind: UnitKind,
}

impl ParsedQuantity {
    /// Quantity expressed in the kind's base unit
    #[must_use]
    pub fn base_quantity(&self) -> f64 {
        self.unit.to_base(self.quantity)
    }
}

/// Resolve a unit spelling to its canonical unit.
///
/// Trims, lower-cases, and strips periods before the alias lookup.
/// Unrecognized text yields `None`, which callers must keep distinct from
/// a zero quantity.
#[must_use]
pub fn normalize_unit(raw: &str) -> Option<Unit> {
    let cleaned: String = raw.trim().to_lowercase().chars().filter(|c| *c != '.').collect();
    if cleaned.is_empty() {
        return None;
    }
    ALIAS_LOOKUP.get(cleaned.as_str()).copied()
}

/// Find the first `<number><unit>` token whose unit is known.
///
/// Accepts `,` or `.` as decimal separator. Later quantity mentions in
/// the same text are ignored.
#[must_use]
pub fn parse_quantity_and_unit(text: &str) -> Option<ParsedQuantity> {
    NUMBER_UNIT.captures_iter(text).find_map(|caps| {
        let quantity: f64 = caps[1].replacen(',', ".", 1).parse().ok()?;
        let original_unit = &caps[2];
        let unit = normalize_unit(original_unit)?;
        Some(ParsedQuantity {
            quantity,
            unit,
            original_unit: original_unit.to_string(),
            kind: unit.kind(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_unit_aliases() {
        assert_eq!(normalize_unit("Grams"), Some(Unit::Gram));
        assert_eq!(normalize_unit("  TBSP. "), Some(Unit::Tablespoon));
        assert_eq!(normalize_unit("litres"), Some(Unit::Liter));
        assert_eq!(normalize_unit("lbs"), Some(Unit::Pound));
    }

    #[test]
    fn test_normalize_unit_unknown() {
        assert_eq!(normalize_unit("pinch"), None);
        assert_eq!(normalize_unit(""), None);
        assert_eq!(normalize_unit("..."), None);
    }

    #[test]
    fn test_parse_simple() {
        let parsed = parse_quantity_and_unit("100 g").unwrap();
        assert_eq!(parsed.quantity, 100.0);
        assert_eq!(parsed.unit, Unit::Gram);
        assert_eq!(parsed.original_unit, "g");
        assert_eq!(parsed.kind, UnitKind::Mass);
    }

    #[test]
    fn test_parse_comma_decimal_and_no_space() {
        let parsed = parse_quantity_and_unit("0,5cup").unwrap();
        assert_eq!(parsed.quantity, 0.5);
        assert_eq!(parsed.unit, Unit::Cup);
        assert_eq!(parsed.kind, UnitKind::Volume);
    }

    #[test]
    fn test_parse_skips_unknown_units() {
        let parsed = parse_quantity_and_unit("2 large eggs, about 100 grams").unwrap();
        assert_eq!(parsed.quantity, 100.0);
        assert_eq!(parsed.unit, Unit::Gram);
        assert_eq!(parsed.original_unit, "grams");
    }

    #[test]
    fn test_parse_uses_first_match_only() {
        let parsed = parse_quantity_and_unit("1 cup (240 ml)").unwrap();
        assert_eq!(parsed.unit, Unit::Cup);
        assert_eq!(parsed.quantity, 1.0);
    }

    #[test]
    fn test_parse_none() {
        assert!(parse_quantity_and_unit("").is_none());
        assert!(parse_quantity_and_unit("a handful").is_none());
        assert!(parse_quantity_and_unit("3 eggs").is_none());
    }

    #[test]
    fn test_base_quantity() {
        let parsed = parse_quantity_and_unit("2 tbsp").unwrap();
        assert!((parsed.base_quantity() - 29.5736).abs() < 1e-9);
    }
}
