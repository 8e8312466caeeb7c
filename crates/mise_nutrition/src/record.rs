//! Builds the nutrition record stored on an ingredient.

use crate::lookup::ProviderNutrition;
use mise_core::{AmountView, NutritionRecord};
use mise_units::parse_quantity_and_unit;
use tracing::warn;

/// Turn provider figures into a record for an ingredient's entered amount.
///
/// When the entered amount has the same unit type as the provider's
/// reference, the record carries a scaled `perAmount` view and its values.
/// Otherwise it keeps the reference figures unscaled and explains why in
/// `warning`. A blank amount keeps the reference figures without a warning.
#[must_use]
pub fn build_record(reference: &ProviderNutrition, amount: Option<&str>) -> NutritionRecord {
    let per_reference = reference.reference_view();
    let reference_label = per_reference.describe();

    let mut record = NutritionRecord {
        values: Some(reference.values.into()),
        per_reference: Some(per_reference),
        product_name: reference.product_name.clone(),
        brand: reference.brand.clone(),
        barcode: reference.barcode.clone(),
        source_url: reference.source_url.clone(),
        ..NutritionRecord::default()
    };

    let Some(amount) = amount.map(str::trim).filter(|a| !a.is_empty()) else {
        return record;
    };

    let Some(parsed) = parse_quantity_and_unit(amount) else {
        let warning = format!(
            "Could not read amount \"{}\"; showing values per {}.",
            amount, reference_label
        );
        warn!(amount, "{}", warning);
        record.warning = Some(warning);
        return record;
    };

    let reference_kind = reference.reference_unit.kind();
    if parsed.kind != reference_kind {
        let warning = format!(
            "Cannot convert {} to {}; showing values per {}.",
            parsed.kind, reference_kind, reference_label
        );
        warn!(amount, "{}", warning);
        record.warning = Some(warning);
        return record;
    }

    let reference_base = reference.reference_unit.to_base(reference.reference_quantity);
    if reference_base <= 0.0 {
        return record;
    }

    let values = reference.values.scale(parsed.base_quantity() / reference_base);
    record.values = Some(values.into());
    record.per_amount = Some(
        AmountView::new(parsed.quantity, parsed.unit.key(), values)
            .with_display_unit(parsed.original_unit),
    );
    record
}
