//! Macro propagation along the recipe graph.

use crate::scaling::ScalingChain;
use indexmap::IndexMap;
use mise_core::{Macros, NodeId};
use mise_plan::{topological_sort, Edge, NodeData, RecipeGraph};
use mise_units::parse_quantity_and_unit;
use tracing::debug;

/// Computes per-node macro totals
#[derive(Debug)]
pub struct Propagator {
    chain: ScalingChain,
}

impl Default for Propagator {
    fn default() -> Self {
        Self {
            chain: ScalingChain::standard(),
        }
    }
}

impl Propagator {
    /// Propagator using the standard scaling chain
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the scaling chain
    #[must_use]
    pub fn with_chain(mut self, chain: ScalingChain) -> Self {
        self.chain = chain;
        self
    }

    /// Macros for every node, keyed in topological order.
    ///
    /// An empty or cyclic graph yields an empty mapping.
    #[must_use]
    pub fn compute(&self, graph: &RecipeGraph) -> IndexMap<NodeId, Macros> {
        let mut totals = IndexMap::with_capacity(graph.node_count());
        if graph.is_empty() {
            return totals;
        }

        let ordering = topological_sort(graph);
        if ordering.has_cycle {
            debug!(
                remaining = ordering.remaining.len(),
                "Skipping nutrition propagation on a cyclic graph"
            );
            return totals;
        }

        for node in ordering.nodes(graph) {
            let macros = match node.data() {
                NodeData::Ingredient(data) => data
                    .nutrition()
                    .map_or(Macros::ZERO, |record| record.base_macros()),
                NodeData::Step(_) | NodeData::Output(_) => graph
                    .incoming(node.id())
                    .map(|edge| self.contribution(graph, edge, &totals))
                    .sum(),
            };
            totals.insert(node.id().clone(), macros.sanitized());
        }

        totals
    }

    /// What one edge adds to its target
    fn contribution(
        &self,
        graph: &RecipeGraph,
        edge: &Edge,
        totals: &IndexMap<NodeId, Macros>,
    ) -> Macros {
        let source = totals.get(&edge.source).copied().unwrap_or(Macros::ZERO);

        let Some(use_amount) = edge.use_amount() else {
            return source;
        };
        let Some(used) = parse_quantity_and_unit(use_amount) else {
            debug!(edge = %edge.id, use_amount, "Unreadable used amount, passing macros through");
            return source;
        };
        let Some(ingredient) = graph.node(&edge.source).and_then(|n| n.as_ingredient()) else {
            return source;
        };

        match self.chain.ratio(ingredient, &used) {
            Some((strategy, ratio)) => {
                debug!(edge = %edge.id, strategy, ratio, "Scaled ingredient contribution");
                source.scale(ratio)
            }
            None => {
                debug!(
                    edge = %edge.id,
                    use_amount,
                    "No comparable reference amount, passing macros through"
                );
                source
            }
        }
    }
}

/// Macros for every node of `graph` using the standard scaling chain
#[must_use]
pub fn compute_node_nutrition(graph: &RecipeGraph) -> IndexMap<NodeId, Macros> {
    Propagator::new().compute(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mise_core::{AmountView, NutritionRecord};
    use mise_plan::{IngredientData, Node, OutputData, Servings, StepData};
    use proptest::prelude::*;

    fn flour(amount: &str, calories: f64) -> IngredientData {
        let values = Macros::new(calories, 10.0, 2.0, 70.0);
        IngredientData::new("Flour", amount).with_nutrition(NutritionRecord::from_values(values))
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_graph() {
        assert!(compute_node_nutrition(&RecipeGraph::new()).is_empty());
    }

    #[test]
    fn test_cyclic_graph_yields_nothing() {
        let mut graph = RecipeGraph::new();
        graph.add_node(Node::ingredient("i", flour("1 cup", 400.0))).unwrap();
        graph.add_node(Node::step("a", StepData::new("A", "a"))).unwrap();
        graph.add_node(Node::step("b", StepData::new("B", "b"))).unwrap();
        graph.add_edge(Edge::new("e1", "i", "a")).unwrap();
        graph.add_edge(Edge::new("e2", "a", "b")).unwrap();
        graph.add_edge(Edge::new("e3", "b", "a")).unwrap();
        assert!(compute_node_nutrition(&graph).is_empty());
    }

    #[test]
    fn test_half_cup_of_one_cup() {
        let mut graph = RecipeGraph::new();
        graph.add_node(Node::ingredient("i", flour("1 cup", 400.0))).unwrap();
        graph.add_node(Node::step("s", StepData::new("Mix", "Mix"))).unwrap();
        graph.add_edge(Edge::new("e", "i", "s").with_use_amount("0.5 cup")).unwrap();

        let totals = compute_node_nutrition(&graph);
        assert!(close(totals[&NodeId::new("i")].calories, 400.0));
        assert!(close(totals[&NodeId::new("s")].calories, 200.0));
        assert!(close(totals[&NodeId::new("s")].carbs, 35.0));
    }

    #[test]
    fn test_mass_against_volume_passes_through() {
        let mut graph = RecipeGraph::new();
        graph.add_node(Node::ingredient("i", flour("1 cup", 400.0))).unwrap();
        graph.add_node(Node::step("s", StepData::new("Mix", "Mix"))).unwrap();
        graph.add_edge(Edge::new("e", "i", "s").with_use_amount("50 g")).unwrap();

        let totals = compute_node_nutrition(&graph);
        assert!(close(totals[&NodeId::new("s")].calories, 400.0));
    }

    #[test]
    fn test_unreadable_use_amount_passes_through() {
        let mut graph = RecipeGraph::new();
        graph.add_node(Node::ingredient("i", flour("1 cup", 400.0))).unwrap();
        graph.add_node(Node::step("s", StepData::new("Mix", "Mix"))).unwrap();
        graph.add_edge(Edge::new("e", "i", "s").with_use_amount("a splash")).unwrap();

        assert!(close(compute_node_nutrition(&graph)[&NodeId::new("s")].calories, 400.0));
    }

    #[test]
    fn test_falls_back_to_reference_view() {
        let record = NutritionRecord {
            per_reference: Some(AmountView::new(100.0, "g", Macros::new(350.0, 12.0, 1.0, 70.0))),
            ..NutritionRecord::default()
        };
        let mut graph = RecipeGraph::new();
        let flour = IngredientData::new("Flour", "1 cup").with_nutrition(record);
        graph.add_node(Node::ingredient("i", flour)).unwrap();
        graph.add_node(Node::step("s", StepData::new("Mix", "Mix"))).unwrap();
        graph.add_edge(Edge::new("e", "i", "s").with_use_amount("50 g")).unwrap();

        let totals = compute_node_nutrition(&graph);
        assert!(close(totals[&NodeId::new("i")].calories, 350.0));
        assert!(close(totals[&NodeId::new("s")].calories, 175.0));
    }

    #[test]
    fn test_step_sources_are_never_scaled() {
        let mut graph = RecipeGraph::new();
        graph.add_node(Node::ingredient("i", flour("200 g", 700.0))).unwrap();
        graph.add_node(Node::step("knead", StepData::new("Knead", "Knead"))).unwrap();
        let bread = OutputData::new("Bread", Servings::Whole(2));
        graph.add_node(Node::output("bread", bread)).unwrap();
        graph.add_edge(Edge::new("e1", "i", "knead")).unwrap();
        graph.add_edge(Edge::new("e2", "knead", "bread").with_use_amount("10 g")).unwrap();

        let totals = compute_node_nutrition(&graph);
        assert!(close(totals[&NodeId::new("bread")].calories, 700.0));
    }

    #[test]
    fn test_sums_all_inputs() {
        let mut graph = RecipeGraph::new();
        graph.add_node(Node::ingredient("a", flour("100 g", 100.0))).unwrap();
        graph.add_node(Node::ingredient("b", flour("100 g", 50.0))).unwrap();
        graph.add_node(Node::ingredient("bare", IngredientData::new("Water", "1 cup"))).unwrap();
        graph.add_node(Node::step("s", StepData::new("Mix", "Mix"))).unwrap();
        graph.add_edge(Edge::new("e1", "a", "s").with_use_amount("50 g")).unwrap();
        graph.add_edge(Edge::new("e2", "b", "s")).unwrap();
        graph.add_edge(Edge::new("e3", "bare", "s").with_use_amount("1 cup")).unwrap();

        let totals = compute_node_nutrition(&graph);
        assert!(close(totals[&NodeId::new("s")].calories, 100.0));
        assert!(totals[&NodeId::new("bare")].is_zero());
    }

    #[test]
    fn test_two_cups_scaled_and_summed() {
        let milk = IngredientData::new("Milk", "1 cup")
            .with_nutrition(NutritionRecord::from_values(Macros::new(150.0, 8.0, 8.0, 12.0)));

        let mut graph = RecipeGraph::new();
        graph.add_node(Node::ingredient("flour", flour("1 cup", 400.0))).unwrap();
        graph.add_node(Node::ingredient("milk", milk)).unwrap();
        graph.add_node(Node::step("mix", StepData::new("Batter", "Whisk"))).unwrap();
        graph
            .add_edge(Edge::new("e1", "flour", "mix").with_use_amount("0.5 cup"))
            .unwrap();
        graph
            .add_edge(Edge::new("e2", "milk", "mix").with_use_amount("1 cup"))
            .unwrap();

        let totals = compute_node_nutrition(&graph);
        let mix = totals[&NodeId::new("mix")];
        assert!(close(mix.calories, 0.5 * 400.0 + 150.0));
        assert!(close(mix.protein, 0.5 * 10.0 + 8.0));
        assert!(close(mix.fat, 0.5 * 2.0 + 8.0));
        assert!(close(mix.carbs, 0.5 * 70.0 + 12.0));
    }

    #[test]
    fn test_empty_chain_disables_scaling() {
        let mut graph = RecipeGraph::new();
        graph.add_node(Node::ingredient("i", flour("1 cup", 400.0))).unwrap();
        graph.add_node(Node::step("s", StepData::new("Mix", "Mix"))).unwrap();
        graph.add_edge(Edge::new("e", "i", "s").with_use_amount("0.5 cup")).unwrap();

        let totals = Propagator::new().with_chain(ScalingChain::new()).compute(&graph);
        assert!(close(totals[&NodeId::new("s")].calories, 400.0));
    }

    #[test]
    fn test_keys_follow_topological_order() {
        let mut graph = RecipeGraph::new();
        graph.add_node(Node::output("o", OutputData::new("Dish", Servings::Whole(1)))).unwrap();
        graph.add_node(Node::ingredient("i", flour("1 cup", 1.0))).unwrap();
        graph.add_edge(Edge::new("e", "i", "o")).unwrap();

        let nutrition = compute_node_nutrition(&graph);
        let keys: Vec<&str> = nutrition.keys().map(NodeId::as_str).collect();
        assert_eq!(keys, vec!["i", "o"]);
    }

    proptest! {
        #[test]
        fn test_scaled_contribution_is_proportional(
            entered in 1u32..2000,
            used in 0u32..4000,
            calories in 0.0f64..2000.0,
        ) {
            let mut graph = RecipeGraph::new();
            let ingredient = flour(&format!("{} g", entered), calories);
            graph.add_node(Node::ingredient("i", ingredient)).unwrap();
            graph.add_node(Node::step("s", StepData::new("Mix", "Mix"))).unwrap();
            graph
                .add_edge(Edge::new("e", "i", "s").with_use_amount(format!("{} g", used)))
                .unwrap();

            let totals = compute_node_nutrition(&graph);
            let expected = calories * f64::from(used) / f64::from(entered);
            let actual = totals[&NodeId::new("s")].calories;
            prop_assert!(actual >= 0.0);
            prop_assert!((actual - expected).abs() <= 1e-9 * expected.max(1.0));
        }
    }
}
