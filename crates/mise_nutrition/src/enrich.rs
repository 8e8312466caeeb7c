//! Attach provider nutrition to every ingredient of a graph.

use crate::lookup::{LookupError, NutritionLookup};
use crate::record::build_record;
use mise_core::NodeId;
use mise_plan::RecipeGraph;
use tracing::debug;

/// What happened to one ingredient
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichOutcome {
    /// A record was attached
    Attached {
        /// Ingredient node
        node_id: NodeId,
        /// Advisory carried by the new record
        warning: Option<String>,
    },
    /// The provider had nothing usable; the old record is untouched
    Failed {
        /// Ingredient node
        node_id: NodeId,
        /// Provider error
        error: LookupError,
    },
    /// The ingredient has neither a label nor a barcode to look up
    Skipped {
        /// Ingredient node
        node_id: NodeId,
    },
}

/// Look up every ingredient and replace its nutrition record.
///
/// A barcode already stored on the record is tried before the label.
pub fn enrich_ingredients(
    graph: &mut RecipeGraph,
    lookup: &dyn NutritionLookup,
) -> Vec<EnrichOutcome> {
    let ingredient_ids: Vec<NodeId> = graph
        .nodes()
        .filter(|n| n.as_ingredient().is_some())
        .map(|n| n.id().clone())
        .collect();

    let mut outcomes = Vec::with_capacity(ingredient_ids.len());
    for node_id in ingredient_ids {
        let Some(data) = graph.node_mut(&node_id).and_then(|n| n.ingredient_mut()) else {
            continue;
        };

        let barcode = data
            .nutrition()
            .and_then(|r| r.barcode.clone())
            .filter(|b| !b.trim().is_empty());
        let label = data.label.clone().filter(|l| !l.trim().is_empty());

        let found = match (barcode, label) {
            (Some(code), label) => lookup.by_barcode(&code).or_else(|err| match label {
                Some(name) => lookup.by_name(&name),
                None => Err(err),
            }),
            (None, Some(name)) => lookup.by_name(&name),
            (None, None) => {
                outcomes.push(EnrichOutcome::Skipped { node_id });
                continue;
            }
        };

        match found {
            Ok(reference) => {
                let record = build_record(&reference, data.amount.as_deref());
                let warning = record.warning.clone();
                data.set_nutrition(Some(record));
                outcomes.push(EnrichOutcome::Attached { node_id, warning });
            }
            Err(error) => {
                debug!(node = %node_id, %error, "Nutrition lookup failed");
                outcomes.push(EnrichOutcome::Failed { node_id, error });
            }
        }
    }

    outcomes
}
