// Recommendation Pipeline
//
// *La Recommandation* (The Recommendation) - Filter, standardize, search, map back

use crate::filter::{filter_by_ingredients, IngredientQuery};
use crate::neighbors::{self, NeighborSearcher};
use crate::recipe::{Catalog, NutritionVector, RecipeRecord};
use crate::standardize::{self, Standardizer};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Default number of neighbors
pub const DEFAULT_NEIGHBORS: usize = 5;

/// Query parameters for one recommendation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    /// Number of recipes to return
    pub k: usize,

    /// Whether to report cosine distances
    pub return_distance: bool,
}

impl QueryParams {
    /// Create parameters for `k` neighbors
    pub fn new(k: usize) -> Self {
        Self {
            k,
            return_distance: false,
        }
    }

    /// Request distances in the result
    pub fn with_distance(mut self, return_distance: bool) -> Self {
        self.return_distance = return_distance;
        self
    }
}

impl Default for QueryParams {
    fn default() -> Self {
        Self::new(DEFAULT_NEIGHBORS)
    }
}

/// A recommended recipe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendedRecipe<'a> {
    /// The catalog row
    pub recipe: &'a RecipeRecord,

    /// Cosine distance to the target, when requested
    pub distance: Option<f64>,
}

/// Recipes ordered by increasing distance to the target
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecommendationResult<'a> {
    entries: Vec<RecommendedRecipe<'a>>,
}

impl<'a> RecommendationResult<'a> {
    /// Entries in ranking order
    pub fn entries(&self) -> &[RecommendedRecipe<'a>] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries
    pub fn iter(&self) -> std::slice::Iter<'_, RecommendedRecipe<'a>> {
        self.entries.iter()
    }
}

impl<'a> FromIterator<RecommendedRecipe<'a>> for RecommendationResult<'a> {
    fn from_iter<I: IntoIterator<Item = RecommendedRecipe<'a>>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Outcome of a request that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation<'a> {
    /// Exactly `k` recipes
    Found(RecommendationResult<'a>),

    /// Fewer candidates than requested neighbors
    NoResult {
        /// Candidates left after filtering
        available: usize,
        /// Neighbors requested
        requested: usize,
    },
}

impl<'a> Recommendation<'a> {
    /// The result, if any
    pub fn into_result(self) -> Option<RecommendationResult<'a>> {
        match self {
            Recommendation::Found(result) => Some(result),
            Recommendation::NoResult { .. } => None,
        }
    }

    /// Check for the "criteria too narrow" outcome
    pub fn is_no_result(&self) -> bool {
        matches!(self, Recommendation::NoResult { .. })
    }
}

/// Recommend `params.k` recipes closest to `target`
///
/// Rows are restricted to those whose ingredients contain every term of
/// `ingredients`. Column statistics are fitted on those rows only, so the
/// same target can rank differently under different ingredient filters.
///
/// # Returns
///
/// * `Ok(Recommendation::Found)` with exactly `k` entries
/// * `Ok(Recommendation::NoResult)` when fewer than `k` rows pass the filter
/// * `Err(RecommendError)` for invalid input or a malformed catalog row
///
/// # Example
///
/// ```
/// use lerecette::{recommend, Catalog, IngredientQuery, NutritionVector, QueryParams};
///
/// let catalog = Catalog::default();
/// let target = NutritionVector([500.0, 20.0, 5.0, 50.0, 300.0, 60.0, 8.0, 15.0, 25.0]);
/// let outcome = recommend(&catalog, &target, &IngredientQuery::default(), &QueryParams::new(3)).unwrap();
/// assert!(outcome.is_no_result());
/// ```
pub fn recommend<'a>(
    catalog: &'a Catalog,
    target: &NutritionVector,
    ingredients: &IngredientQuery,
    params: &QueryParams,
) -> Result<Recommendation<'a>, RecommendError> {
    info!(
        "Starting recommendation: k={}, ingredients={:?}, catalog={} rows",
        params.k,
        ingredients.terms(),
        catalog.len()
    );

    if params.k == 0 {
        return Err(RecommendError::InvalidParams(
            "n_neighbors must be greater than zero".to_string(),
        ));
    }
    if let Some(field) = target.first_non_finite() {
        return Err(RecommendError::InvalidTarget(format!(
            "{} must be a finite number",
            field
        )));
    }

    let subset = filter_by_ingredients(&catalog.subset(), ingredients);

    if subset.len() < params.k {
        warn!(
            "Insufficient data: {} rows < {} neighbors required",
            subset.len(),
            params.k
        );
        return Ok(Recommendation::NoResult {
            available: subset.len(),
            requested: params.k,
        });
    }

    for recipe in subset.iter() {
        if let Some(field) = recipe.nutrition.first_non_finite() {
            return Err(RecommendError::MalformedRow {
                name: recipe.name.clone(),
                field,
            });
        }
    }

    let raw = subset.nutrition_matrix();
    let scaler = Standardizer::fit(&raw)?;
    debug!("Standardizer fitted on {} rows", scaler.samples());

    let searcher = NeighborSearcher::new(scaler.transform_all(&raw));
    let query = scaler.transform(target);
    let neighbors = searcher.kneighbors(&query, params.k, params.return_distance)?;

    let result = neighbors
        .into_iter()
        .map(|n| {
            subset
                .get(n.index)
                .map(|recipe| RecommendedRecipe {
                    recipe,
                    distance: n.distance,
                })
                .ok_or(RecommendError::IndexOutOfRange {
                    index: n.index,
                    len: subset.len(),
                })
        })
        .collect::<Result<RecommendationResult<'a>, _>>()?;

    info!("Recommendation completed with {} recipes", result.len());
    Ok(Recommendation::Found(result))
}

/// Errors that abort a single recommendation request
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecommendError {
    /// Query parameters are unusable
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Target vector is unusable
    #[error("Invalid nutrition input: {0}")]
    InvalidTarget(String),

    /// A catalog row has a missing or non-finite nutrition value
    #[error("Malformed recipe '{name}': {field} is missing or not a number")]
    MalformedRow {
        /// Recipe name
        name: String,
        /// Offending column
        field: &'static str,
    },

    /// Standardizer could not be fitted
    #[error("Standardization failed: {0}")]
    Standardize(#[from] standardize::Error),

    /// Neighbor search failed
    #[error("Neighbor search failed: {0}")]
    Search(#[from] neighbors::Error),

    /// Search returned a row outside the candidate set
    #[error("Neighbor index {index} out of range for {len} candidates")]
    IndexOutOfRange {
        /// Returned index
        index: usize,
        /// Candidate count
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::fixtures::record;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            record("low", r#"["rice"]"#, [100.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]),
            record("mid", r#"["rice", "beans"]"#, [300.0, 5.0, 2.0, 3.0, 5.0, 2.0, 4.0, 1.0, 9.0]),
            record("high", r#"["beef"]"#, [900.0, 9.0, 8.0, 2.0, 4.0, 7.0, 3.0, 6.0, 2.0]),
        ])
    }

    #[test]
    fn test_rejects_zero_k() {
        let catalog = catalog();
        let err = recommend(
            &catalog,
            &NutritionVector::default(),
            &IngredientQuery::default(),
            &QueryParams::new(0),
        )
        .unwrap_err();
        assert!(matches!(err, RecommendError::InvalidParams(_)));
    }

    #[test]
    fn test_rejects_non_finite_target() {
        let catalog = catalog();
        let mut target = [1.0; 9];
        target[2] = f64::INFINITY;
        let err = recommend(
            &catalog,
            &NutritionVector(target),
            &IngredientQuery::default(),
            &QueryParams::new(1),
        )
        .unwrap_err();
        assert!(err.to_string().contains("SaturatedFatContent"));
    }

    #[test]
    fn test_no_result_when_filter_too_narrow() {
        let catalog = catalog();
        let outcome = recommend(
            &catalog,
            &NutritionVector([1.0; 9]),
            &IngredientQuery::new(["rice"]),
            &QueryParams::new(3),
        )
        .unwrap();
        assert_eq!(
            outcome,
            Recommendation::NoResult {
                available: 2,
                requested: 3
            }
        );
    }

    #[test]
    fn test_found_maps_back_to_rows() {
        let catalog = catalog();
        let target = catalog.rows()[2].nutrition;
        let outcome = recommend(
            &catalog,
            &target,
            &IngredientQuery::default(),
            &QueryParams::new(3).with_distance(true),
        )
        .unwrap();
        let result = outcome.into_result().unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result.entries()[0].recipe.name, "high");
        assert!(result.entries()[0].distance.unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_malformed_row_is_request_error() {
        let mut bad = [1.0; 9];
        bad[6] = f64::NAN;
        let catalog = Catalog::new(vec![
            record("ok", "[]", [2.0; 9]),
            record("broken", "[]", bad),
        ]);
        let err = recommend(
            &catalog,
            &NutritionVector([1.0; 9]),
            &IngredientQuery::default(),
            &QueryParams::new(1),
        )
        .unwrap_err();
        assert_eq!(
            err,
            RecommendError::MalformedRow {
                name: "broken".to_string(),
                field: "FiberContent"
            }
        );
        // The shared rows are untouched
        assert!(catalog.rows()[1].nutrition.0[6].is_nan());
    }

    #[test]
    fn test_malformed_row_outside_subset_is_ignored() {
        let mut bad = [1.0; 9];
        bad[0] = f64::NAN;
        let catalog = Catalog::new(vec![
            record("ok", r#"["rice"]"#, [2.0; 9]),
            record("broken", r#"["beef"]"#, bad),
        ]);
        let outcome = recommend(
            &catalog,
            &NutritionVector([1.0; 9]),
            &IngredientQuery::new(["rice"]),
            &QueryParams::new(1),
        )
        .unwrap();
        assert!(!outcome.is_no_result());
    }
}
