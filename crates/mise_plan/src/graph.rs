//! Recipe graph model.
//!
//! A recipe is a set of nodes (ingredients, steps, outputs) joined by
//! directed edges. The graph may be cyclic while the user is editing;
//! ordering and validation report that instead of preventing it. What the
//! graph does refuse is structural nonsense: duplicate ids, dangling edge
//! endpoints, and self-loops.

use indexmap::IndexMap;
use mise_core::{CoreError, CoreResult, EdgeId, NodeId, NutritionRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

type Extra = serde_json::Map<String, serde_json::Value>;

/// Node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Source vertex carrying a raw amount
    Ingredient,
    /// Transformation vertex
    Step,
    /// Terminal vertex, a finished dish
    Output,
}

impl NodeKind {
    /// Name used in recipe documents
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ingredient => "ingredient",
            Self::Step => "step",
            Self::Output => "output",
        }
    }

    /// Parse a document type name
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "ingredient" => Some(Self::Ingredient),
            "step" => Some(Self::Step),
            "output" => Some(Self::Output),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ingredient => write!(f, "Ingredient"),
            Self::Step => write!(f, "Step"),
            Self::Output => write!(f, "Output"),
        }
    }
}

/// Canvas position, kept so documents round-trip
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Position {
    /// Create a position
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Attributes of an ingredient node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngredientData {
    /// Display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Amount as typed, e.g. `"100 g"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nutrition: Option<NutritionRecord>,
    /// Unknown keys
    #[serde(flatten)]
    pub extra: Extra,
}

impl IngredientData {
    /// Create ingredient attributes
    #[must_use]
    pub fn new(label: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            amount: Some(amount.into()),
            ..Self::default()
        }
    }

    /// Attach a nutrition record
    #[must_use]
    pub fn with_nutrition(mut self, record: NutritionRecord) -> Self {
        self.nutrition = Some(record);
        self
    }

    /// The attached nutrition record
    #[must_use]
    pub fn nutrition(&self) -> Option<&NutritionRecord> {
        self.nutrition.as_ref()
    }

    /// Replace the nutrition record wholesale, returning the previous one
    pub fn set_nutrition(&mut self, record: Option<NutritionRecord>) -> Option<NutritionRecord> {
        std::mem::replace(&mut self.nutrition, record)
    }
}

/// Attributes of a step node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepData {
    /// Display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// What the step does, e.g. `"Whisk"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Duration text, e.g. `"30m"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Temperature text, e.g. `"220°C"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<String>,
    /// Unknown keys
    #[serde(flatten)]
    pub extra: Extra,
}

impl StepData {
    /// Create step attributes
    #[must_use]
    pub fn new(label: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            action: Some(action.into()),
            ..Self::default()
        }
    }
}

/// Serving count as entered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Servings {
    /// Whole number of servings
    Whole(u64),
    /// Fractional number of servings
    Fraction(f64),
    /// Free text, e.g. `"4-6"`
    Text(String),
}

impl Servings {
    /// Whether there is nothing to show
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Whole(n) => *n == 0,
            Self::Fraction(f) => *f == 0.0 || !f.is_finite(),
            Self::Text(s) => s.trim().is_empty(),
        }
    }
}

impl fmt::Display for Servings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Whole(n) => write!(f, "{}", n),
            Self::Fraction(x) => write!(f, "{}", x),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Attributes of an output node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputData {
    /// Display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Serving count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serves: Option<Servings>,
    /// Unknown keys
    #[serde(flatten)]
    pub extra: Extra,
}

impl OutputData {
    /// Create output attributes
    #[must_use]
    pub fn new(label: impl Into<String>, serves: Servings) -> Self {
        Self {
            label: Some(label.into()),
            serves: Some(serves),
            ..Self::default()
        }
    }
}

/// Kind-specific attributes of a node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    /// Ingredient attributes
    Ingredient(IngredientData),
    /// Step attributes
    Step(StepData),
    /// Output attributes
    Output(OutputData),
}

impl NodeData {
    /// Kind implied by the payload
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Ingredient(_) => NodeKind::Ingredient,
            Self::Step(_) => NodeKind::Step,
            Self::Output(_) => NodeKind::Output,
        }
    }

    /// Display label, if set
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Ingredient(d) => d.label.as_deref(),
            Self::Step(d) => d.label.as_deref(),
            Self::Output(d) => d.label.as_deref(),
        }
    }

    /// Read an attribute bag as the payload for `kind`
    ///
    /// # Errors
    ///
    /// Returns error if a known key holds a value of the wrong shape
    pub fn from_value(kind: NodeKind, value: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            NodeKind::Ingredient => Self::Ingredient(serde_json::from_value(value)?),
            NodeKind::Step => Self::Step(serde_json::from_value(value)?),
            NodeKind::Output => Self::Output(serde_json::from_value(value)?),
        })
    }

    /// Write the payload as a plain attribute bag
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            Self::Ingredient(d) => serde_json::to_value(d),
            Self::Step(d) => serde_json::to_value(d),
            Self::Output(d) => serde_json::to_value(d),
        }
    }
}

/// A node in the recipe graph.
///
/// The kind is fixed by the payload variant chosen at construction; the
/// typed `*_mut` accessors let callers edit attributes without swapping
/// the variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    position: Position,
    data: NodeData,
}

impl Node {
    /// Create a node
    #[must_use]
    pub fn new(id: impl Into<NodeId>, position: Position, data: NodeData) -> Self {
        Self {
            id: id.into(),
            position,
            data,
        }
    }

    /// Create an ingredient node at the origin
    #[must_use]
    pub fn ingredient(id: impl Into<NodeId>, data: IngredientData) -> Self {
        Self::new(id, Position::default(), NodeData::Ingredient(data))
    }

    /// Create a step node at the origin
    #[must_use]
    pub fn step(id: impl Into<NodeId>, data: StepData) -> Self {
        Self::new(id, Position::default(), NodeData::Step(data))
    }

    /// Create an output node at the origin
    #[must_use]
    pub fn output(id: impl Into<NodeId>, data: OutputData) -> Self {
        Self::new(id, Position::default(), NodeData::Output(data))
    }

    /// Set the position
    #[must_use]
    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Node id
    #[must_use]
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Node kind
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    /// Canvas position
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Move the node
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Attributes
    #[must_use]
    pub fn data(&self) -> &NodeData {
        &self.data
    }

    /// Display label, if set
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.data.label()
    }

    /// Ingredient attributes, if this is an ingredient
    #[must_use]
    pub fn as_ingredient(&self) -> Option<&IngredientData> {
        match &self.data {
            NodeData::Ingredient(d) => Some(d),
            _ => None,
        }
    }

    /// Mutable ingredient attributes, if this is an ingredient
    pub fn ingredient_mut(&mut self) -> Option<&mut IngredientData> {
        match &mut self.data {
            NodeData::Ingredient(d) => Some(d),
            _ => None,
        }
    }

    /// Mutable step attributes, if this is a step
    pub fn step_mut(&mut self) -> Option<&mut StepData> {
        match &mut self.data {
            NodeData::Step(d) => Some(d),
            _ => None,
        }
    }

    /// Mutable output attributes, if this is an output
    pub fn output_mut(&mut self) -> Option<&mut OutputData> {
        match &mut self.data {
            NodeData::Output(d) => Some(d),
            _ => None,
        }
    }
}

/// Attributes of an edge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    /// How much of the source feeds the target, e.g. `"0.5 cup"`
    #[serde(rename = "useAmount", default, skip_serializing_if = "Option::is_none")]
    pub use_amount: Option<String>,
    /// Unknown keys
    #[serde(flatten)]
    pub extra: Extra,
}

/// Editor decoration carried by an edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    /// Curve type
    #[serde(rename = "type")]
    pub curve: String,
    /// Arrow marker
    pub marker_end: serde_json::Value,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            curve: "bezier".to_string(),
            marker_end: serde_json::json!({ "type": "arrowclosed" }),
        }
    }
}

/// An edge between nodes
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Edge id
    pub id: EdgeId,
    /// Source node
    pub source: NodeId,
    /// Target node
    pub target: NodeId,
    /// Attributes
    pub data: EdgeData,
    /// Editor decoration
    pub style: EdgeStyle,
}

impl Edge {
    /// Create a new edge
    #[must_use]
    pub fn new(
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            data: EdgeData::default(),
            style: EdgeStyle::default(),
        }
    }

    /// Set the used-amount override
    #[must_use]
    pub fn with_use_amount(mut self, amount: impl Into<String>) -> Self {
        self.data.use_amount = Some(amount.into());
        self
    }

    /// The used-amount override, ignoring blank text
    #[must_use]
    pub fn use_amount(&self) -> Option<&str> {
        self.data
            .use_amount
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }
}

/// A recipe graph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeGraph {
    nodes: IndexMap<NodeId, Node>,
    edges: Vec<Edge>,
}

impl RecipeGraph {
    /// Create a new empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node
    ///
    /// # Errors
    ///
    /// Returns error if a node with the same id exists
    pub fn add_node(&mut self, node: Node) -> CoreResult<()> {
        if self.nodes.contains_key(node.id()) {
            return Err(CoreError::AlreadyExists {
                kind: "Node".to_string(),
                id: node.id().to_string(),
            });
        }
        self.nodes.insert(node.id().clone(), node);
        Ok(())
    }

    /// Add an edge
    ///
    /// Cycles are allowed; they are reported by ordering and validation.
    ///
    /// # Errors
    ///
    /// Returns error if the edge is a self-loop, an endpoint is missing,
    /// or the edge id is taken
    pub fn add_edge(&mut self, edge: Edge) -> CoreResult<()> {
        if edge.source == edge.target {
            return Err(CoreError::Validation {
                field: "edge".to_string(),
                reason: format!("self-loop on {}", edge.source),
            });
        }
        for endpoint in [&edge.source, &edge.target] {
            if !self.nodes.contains_key(endpoint) {
                return Err(CoreError::NotFound {
                    kind: "Node".to_string(),
                    id: endpoint.to_string(),
                });
            }
        }
        if self.edges.iter().any(|e| e.id == edge.id) {
            return Err(CoreError::AlreadyExists {
                kind: "Edge".to_string(),
                id: edge.id.to_string(),
            });
        }
        self.edges.push(edge);
        Ok(())
    }

    /// Remove a node together with every edge touching it
    pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        let removed = self.nodes.shift_remove(id)?;
        self.edges.retain(|e| &e.source != id && &e.target != id);
        Some(removed)
    }

    /// Remove an edge
    pub fn remove_edge(&mut self, id: &EdgeId) -> Option<Edge> {
        let index = self.edges.iter().position(|e| &e.id == id)?;
        Some(self.edges.remove(index))
    }

    /// Get node by id
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Get mutable node by id
    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Get edge by id
    #[must_use]
    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| &e.id == id)
    }

    /// Get mutable edge by id
    pub fn edge_mut(&mut self, id: &EdgeId) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|e| &e.id == id)
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Edges in insertion order
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges ending at `id`
    pub fn incoming<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| &e.target == id)
    }

    /// Edges starting at `id`
    pub fn outgoing<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| &e.source == id)
    }

    /// Get total node count
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get total edge count
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Check if graph is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
