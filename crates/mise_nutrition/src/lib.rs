//! MISE Nutrition
//!
//! Propagates ingredient macros through a recipe graph, scaling each
//! edge's contribution by its used quantity. Also holds the contract for
//! an external nutrition provider and the builder that turns a provider's
//! per-reference figures into a record for one ingredient.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod enrich;
pub mod lookup;
pub mod propagate;
pub mod record;
pub mod scaling;

pub use enrich::{enrich_ingredients, EnrichOutcome};
pub use lookup::{extract_nutrients, CatalogLookup, LookupError, NutritionLookup, ProviderNutrition};
pub use propagate::{compute_node_nutrition, Propagator};
pub use record::build_record;
pub use scaling::{EnteredAmount, PerAmount, PerReference, ScalingChain, ScalingStrategy};
