use std::fs;
use std::path::Path;

use log::{info, warn};
use serde_json::Value;

use crate::error::CatalogError;
use crate::model::{RawRecipe, Recipe};

/// A record that was left out of the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position of the record in the feed (0-based)
    pub position: usize,
    pub reason: String,
}

/// Result of loading a recipe feed
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub recipes: Vec<Recipe>,
    pub skipped: Vec<SkippedRecord>,
}

/// Load recipes from a JSON file containing an array of records.
///
/// Malformed records are skipped and logged; only an unreadable file or a
/// document that is not an array fails the whole load.
pub fn load_recipes(path: impl AsRef<Path>) -> Result<LoadReport, CatalogError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let report = parse_recipes(&content)?;
    info!(
        "Loaded {} recipes from {} ({} skipped)",
        report.recipes.len(),
        path.display(),
        report.skipped.len()
    );
    Ok(report)
}

pub fn parse_recipes(json: &str) -> Result<LoadReport, CatalogError> {
    let records = match serde_json::from_str::<Value>(json)? {
        Value::Array(records) => records,
        other => return Err(CatalogError::NotAnArray(json_kind(&other))),
    };

    let mut recipes = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();

    for (position, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<RawRecipe>(record) {
            Ok(raw) => recipes.push(Recipe::from(raw)),
            Err(e) => {
                warn!("Error loading recipe #{}: {}", position, e);
                skipped.push(SkippedRecord {
                    position,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(LoadReport { recipes, skipped })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
