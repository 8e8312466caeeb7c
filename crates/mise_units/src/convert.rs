//! Conversion helpers keyed by canonical unit text.

use crate::parse::normalize_unit;
use crate::table::{Unit, UnitKind};

/// Convert `quantity` of the canonical unit `unit` to its base unit.
///
/// Returns `None` when `unit` is not a canonical key.
#[must_use]
pub fn convert_to_base(quantity: f64, unit: &str) -> Option<f64> {
    Unit::from_key(unit).map(|u| u.to_base(quantity))
}

/// Convert between two canonical units of the same physical type.
#[must_use]
pub fn convert_between(quantity: f64, from: &str, to: &str) -> Option<f64> {
    let from = Unit::from_key(from)?;
    let to = Unit::from_key(to)?;
    from.convert(quantity, to)
}

/// Physical type of a canonical unit key
#[must_use]
pub fn unit_kind(unit: &str) -> Option<UnitKind> {
    Unit::from_key(unit).map(|u| u.kind())
}

/// Whether two canonical unit keys share a physical type
#[must_use]
pub fn same_kind(a: &str, b: &str) -> bool {
    match (unit_kind(a), unit_kind(b)) {
        (Some(ka), Some(kb)) => ka == kb,
        _ => false,
    }
}

/// Compact label such as `"100g"`, normalizing the unit when possible
#[must_use]
pub fn amount_label(quantity: f64, unit: &str) -> Option<String> {
    if unit.is_empty() {
        return None;
    }
    let unit = normalize_unit(unit).map_or(unit, |u| u.key());
    Some(format!("{}{}", quantity, unit))
}
