//! Command implementations. Each returns the text to print so the
//! commands can be exercised without a terminal.

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use mise_io::{export_recipe, import_recipe};
use mise_nutrition::{compute_node_nutrition, enrich_ingredients, CatalogLookup, EnrichOutcome};
use mise_plan::{simulate_execute, validate_graph, RecipeGraph};
use std::fs;
use std::path::Path;
use tracing::info;

/// Read and import a recipe file
pub fn load(path: &Path) -> Result<RecipeGraph> {
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read recipe {}", path.display()))?;
    let graph = import_recipe(&text)
        .wrap_err_with(|| format!("Failed to import {}", path.display()))?;
    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Loaded recipe"
    );
    Ok(graph)
}

/// Validation messages; empty when the recipe is valid
pub fn validate(path: &Path) -> Result<Vec<String>> {
    Ok(validate_graph(&load(path)?))
}

/// Dry-run narrative
pub fn simulate(path: &Path) -> Result<String> {
    let graph = load(path)?;
    Ok(simulate_execute(&graph)?)
}

/// Macro totals as an aligned table or as JSON
pub fn macros(path: &Path, json: bool) -> Result<String> {
    let graph = load(path)?;
    let totals = compute_node_nutrition(&graph);
    if json {
        return serde_json::to_string_pretty(&totals).wrap_err("Failed to encode totals");
    }
    if totals.is_empty() && !graph.is_empty() {
        return Ok("No totals: the recipe has a cycle.".to_string());
    }

    let rows: Vec<(String, &mise_core::Macros)> = totals
        .iter()
        .map(|(id, m)| {
            let name = graph
                .node(id)
                .map(|n| format!("{} ({})", n.label().unwrap_or(id.as_str()), n.kind()))
                .unwrap_or_else(|| id.to_string());
            (name, m)
        })
        .collect();
    let width = rows.iter().map(|(name, _)| name.chars().count()).max().unwrap_or(0);

    Ok(rows
        .iter()
        .map(|(name, m)| {
            format!(
                "{:<width$}  {:>8.1} kcal  P {:>6.1} g  F {:>6.1} g  C {:>6.1} g",
                name,
                m.calories,
                m.protein,
                m.fat,
                m.carbs,
                width = width
            )
        })
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Canonical re-export of the recipe
pub fn export(path: &Path) -> Result<String> {
    export_recipe(&load(path)?).wrap_err("Failed to export recipe")
}

/// Attach catalog nutrition to every ingredient.
///
/// Returns the updated document and one summary line per ingredient.
pub fn enrich(path: &Path, catalog: &Path) -> Result<(String, Vec<String>)> {
    let mut graph = load(path)?;
    let text = fs::read_to_string(catalog)
        .wrap_err_with(|| format!("Failed to read catalog {}", catalog.display()))?;
    let lookup = CatalogLookup::from_json(&text)
        .wrap_err_with(|| format!("Failed to parse catalog {}", catalog.display()))?;
    info!(products = lookup.len(), "Loaded catalog");

    let outcomes = enrich_ingredients(&mut graph, &lookup);
    let summary = outcomes
        .iter()
        .map(|outcome| match outcome {
            EnrichOutcome::Attached { node_id, warning: None } => format!("{}: attached", node_id),
            EnrichOutcome::Attached {
                node_id,
                warning: Some(warning),
            } => format!("{}: attached ({})", node_id, warning),
            EnrichOutcome::Failed { node_id, error } => format!("{}: {}", node_id, error),
            EnrichOutcome::Skipped { node_id } => {
                format!("{}: skipped, nothing to look up", node_id)
            }
        })
        .collect();

    let document = export_recipe(&graph).wrap_err("Failed to export recipe")?;
    Ok((document, summary))
}

/// Write `text` to `output`, or print it when no path is given
pub fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text).wrap_err_with(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Wrote recipe");
        }
        None => println!("{}", text),
    }
    Ok(())
}
