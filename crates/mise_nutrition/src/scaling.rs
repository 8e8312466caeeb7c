//! Scaling strategies for an ingredient's contribution along an edge.
//!
//! Each strategy proposes a ratio `used / reference` in base units, or
//! declines. A [`ScalingChain`] asks them in order and the first ratio
//! wins. Declining is never an error: the caller falls back to the
//! unscaled macros.

use mise_core::AmountView;
use mise_plan::IngredientData;
use mise_units::{normalize_unit, parse_quantity_and_unit, ParsedQuantity, UnitKind};
use std::fmt;

/// One way of deriving a scaling ratio
pub trait ScalingStrategy: fmt::Debug + Send + Sync {
    /// Strategy name, used in logs
    fn name(&self) -> &'static str;

    /// Ratio of `used` to this strategy's reference quantity
    fn ratio(&self, ingredient: &IngredientData, used: &ParsedQuantity) -> Option<f64>;
}

/// Ratio against the amount typed on the ingredient node
#[derive(Debug, Clone, Copy, Default)]
pub struct EnteredAmount;

impl ScalingStrategy for EnteredAmount {
    fn name(&self) -> &'static str {
        "entered-amount"
    }

    fn ratio(&self, ingredient: &IngredientData, used: &ParsedQuantity) -> Option<f64> {
        let entered = parse_quantity_and_unit(ingredient.amount.as_deref()?)?;
        base_ratio(used, entered.kind, entered.base_quantity())
    }
}

/// Ratio against the record's per-amount view
#[derive(Debug, Clone, Copy, Default)]
pub struct PerAmount;

impl ScalingStrategy for PerAmount {
    fn name(&self) -> &'static str {
        "per-amount"
    }

    fn ratio(&self, ingredient: &IngredientData, used: &ParsedQuantity) -> Option<f64> {
        view_ratio(ingredient.nutrition()?.per_amount.as_ref()?, used)
    }
}

/// Ratio against the provider's reference serving
#[derive(Debug, Clone, Copy, Default)]
pub struct PerReference;

impl ScalingStrategy for PerReference {
    fn name(&self) -> &'static str {
        "per-reference"
    }

    fn ratio(&self, ingredient: &IngredientData, used: &ParsedQuantity) -> Option<f64> {
        view_ratio(ingredient.nutrition()?.per_reference.as_ref()?, used)
    }
}

fn view_ratio(view: &AmountView, used: &ParsedQuantity) -> Option<f64> {
    let (quantity, unit) = view.reference()?;
    let unit = normalize_unit(unit)?;
    base_ratio(used, unit.kind(), unit.to_base(quantity))
}

/// `used / reference` in base units. Declines on a unit type mismatch or
/// a non-positive reference; clamps a negative ratio to zero.
fn base_ratio(used: &ParsedQuantity, kind: UnitKind, reference_base: f64) -> Option<f64> {
    if kind != used.kind || reference_base <= 0.0 {
        return None;
    }
    let ratio = used.base_quantity() / reference_base;
    ratio.is_finite().then(|| ratio.max(0.0))
}

/// Ordered list of strategies; the first ratio wins
#[derive(Debug, Default)]
pub struct ScalingChain {
    strategies: Vec<Box<dyn ScalingStrategy>>,
}

impl ScalingChain {
    /// An empty chain, which never scales
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entered amount, then per-amount view, then per-reference view
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .with_strategy(EnteredAmount)
            .with_strategy(PerAmount)
            .with_strategy(PerReference)
    }

    /// Append a strategy at the lowest priority
    #[must_use]
    pub fn with_strategy(mut self, strategy: impl ScalingStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Strategy names in priority order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.strategies.iter().map(|s| s.name())
    }

    /// First ratio any strategy proposes, with the strategy's name
    #[must_use]
    pub fn ratio(
        &self,
        ingredient: &IngredientData,
        used: &ParsedQuantity,
    ) -> Option<(&'static str, f64)> {
        self.strategies
            .iter()
            .find_map(|s| s.ratio(ingredient, used).map(|r| (s.name(), r)))
    }
}
