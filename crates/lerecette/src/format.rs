// Result Formatting
//
// *La Présentation* (The Presentation) - Display-ready records from serialized list text

use crate::pipeline::{RecommendationResult, RecommendedRecipe};
use crate::recipe::NutritionVector;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Matches one double-quoted element
static QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]*)""#).expect("quoted string pattern is valid"));

/// Extract every double-quoted substring, in order
///
/// Intended for serialized list literals such as `["beef", "ginger"]`.
/// Text without quoted elements yields an empty list; this never fails.
pub fn extract_quoted_strings(text: &str) -> Vec<String> {
    QUOTED
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// A recommendation ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedRecipe {
    /// Recipe name
    pub name: String,

    /// Cooking time label
    pub cook_time: String,

    /// Preparation time label
    pub prep_time: String,

    /// Total time label
    pub total_time: String,

    /// Nutrition values
    pub nutrition: NutritionVector,

    /// Ingredients as a list
    pub ingredients: Vec<String>,

    /// Instructions as a list
    pub instructions: Vec<String>,

    /// Cosine distance to the target, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

/// List field that yields nothing from non-empty text
fn recover_list(recipe_name: &str, field: &str, raw: &str) -> Vec<String> {
    let items = extract_quoted_strings(raw);
    if items.is_empty() && !raw.trim().is_empty() {
        warn!(
            "Could not recover {} for recipe '{}', defaulting to empty list",
            field, recipe_name
        );
    }
    items
}

/// Format one recommended recipe
pub fn format_recipe(entry: &RecommendedRecipe<'_>) -> FormattedRecipe {
    let recipe = entry.recipe;
    FormattedRecipe {
        name: recipe.name.clone(),
        cook_time: recipe.cook_time.clone(),
        prep_time: recipe.prep_time.clone(),
        total_time: recipe.total_time.clone(),
        nutrition: recipe.nutrition,
        ingredients: recover_list(&recipe.name, "ingredients", &recipe.ingredients_raw),
        instructions: recover_list(&recipe.name, "instructions", &recipe.instructions_raw),
        distance: entry.distance,
    }
}

/// Format a whole result, keeping its order
pub fn format_recommendations(result: &RecommendationResult<'_>) -> Vec<FormattedRecipe> {
    let formatted: Vec<FormattedRecipe> = result.iter().map(format_recipe).collect();
    debug!("Formatted {} recommended recipes", formatted.len());
    formatted
}
