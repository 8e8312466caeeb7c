//! MISE Units
//!
//! Static table of kitchen units, alias normalization, free-text
//! quantity parsing, and conversion within a physical type.
//! Conversion across types (mass to volume) is always refused.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod convert;
pub mod parse;
pub mod table;

pub use convert::{amount_label, convert_between, convert_to_base, same_kind, unit_kind};
pub use parse::{normalize_unit, parse_quantity_and_unit, ParsedQuantity};
pub use table::{Unit, UnitKind};
