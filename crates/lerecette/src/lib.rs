// lerecette - Recipe Recommendation Core
//
// *La Recette* (The Recipe) - Nutrition-space nearest-neighbor recommendations over a shared catalog

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

//! Recommends recipes whose nutrition profile is closest to a target.
//!
//! A request filters the shared [`Catalog`] by ingredient terms, fits a
//! [`Standardizer`] on the survivors, and runs a brute-force cosine
//! [`NeighborSearcher`] over the standardized rows. Nothing but the catalog
//! outlives a request, so concurrent calls to [`recommend`] need no locking.

pub mod diet;
pub mod filter;
pub mod format;
pub mod neighbors;
pub mod pipeline;
pub mod recipe;
pub mod standardize;

pub use diet::{ActivityLevel, BmiCategory, Gender, Meal, NutritionTotals, Person, WeightLossPlan};
pub use filter::{filter_by_ingredients, IngredientFilter, IngredientQuery, MatchMode};
pub use format::{extract_quoted_strings, format_recommendations, FormattedRecipe};
pub use neighbors::{cosine_distance, Neighbor, NeighborSearcher};
pub use pipeline::{
    recommend, QueryParams, Recommendation, RecommendError, RecommendationResult,
    RecommendedRecipe, DEFAULT_NEIGHBORS,
};
pub use recipe::{Catalog, FilteredSubset, NutritionVector, RecipeRecord, NUTRITION_DIM, NUTRITION_FIELDS};
pub use standardize::Standardizer;
