// Recipe Catalog
//
// *Le Catalogue* (The Catalog) - Immutable recipe rows and nutrition vectors

use serde::{Deserialize, Serialize};
use std::ops::{Deref, Index};
use std::sync::Arc;

/// Number of nutrition features per recipe
pub const NUTRITION_DIM: usize = 9;

/// Nutrition column names, in feature order
pub const NUTRITION_FIELDS: [&str; NUTRITION_DIM] = [
    "Calories",
    "FatContent",
    "SaturatedFatContent",
    "CholesterolContent",
    "SodiumContent",
    "CarbohydrateContent",
    "FiberContent",
    "SugarContent",
    "ProteinContent",
];

/// Fixed-length nutrition feature vector
///
/// Components follow [`NUTRITION_FIELDS`]: calories, fat, saturated fat,
/// cholesterol, sodium, carbohydrate, fiber, sugar, protein.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutritionVector(pub [f64; NUTRITION_DIM]);

impl NutritionVector {
    /// Create a vector from its nine components
    pub fn new(values: [f64; NUTRITION_DIM]) -> Self {
        Self(values)
    }

    /// Build a vector from a slice, rejecting any length other than nine
    pub fn from_slice(values: &[f64]) -> Result<Self, Error> {
        let array: [f64; NUTRITION_DIM] = values.try_into().map_err(|_| Error::DimensionMismatch {
            expected: NUTRITION_DIM,
            got: values.len(),
        })?;
        Ok(Self(array))
    }

    /// Components as a slice
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Calories component
    pub fn calories(&self) -> f64 {
        self.0[0]
    }

    /// Name of the first non-finite component, if any
    pub fn first_non_finite(&self) -> Option<&'static str> {
        self.0
            .iter()
            .position(|v| !v.is_finite())
            .map(|i| NUTRITION_FIELDS[i])
    }
}

impl From<[f64; NUTRITION_DIM]> for NutritionVector {
    fn from(values: [f64; NUTRITION_DIM]) -> Self {
        Self(values)
    }
}

impl TryFrom<Vec<f64>> for NutritionVector {
    type Error = Error;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_slice(&values)
    }
}

impl Index<usize> for NutritionVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

/// A single recipe row
///
/// Duration labels are kept as free-form text. The ingredient and
/// instruction fields hold the serialized list text exactly as stored;
/// see [`crate::format`] for recovering the lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRecord {
    /// Recipe name
    pub name: String,

    /// Cooking time label
    pub cook_time: String,

    /// Preparation time label
    pub prep_time: String,

    /// Total time label
    pub total_time: String,

    /// Serialized ingredient list, e.g. `["beef", "ginger"]`
    pub ingredients_raw: String,

    /// Serialized instruction list
    pub instructions_raw: String,

    /// Nutrition values (NaN marks a missing cell)
    pub nutrition: NutritionVector,
}

/// Read-only recipe table shared by every request
///
/// Cloning is cheap: all clones point at the same rows. There is no way to
/// mutate rows once the catalog is built.
#[derive(Debug, Clone)]
pub struct Catalog {
    rows: Arc<[RecipeRecord]>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Catalog {
    /// Create a catalog from loaded rows
    pub fn new(rows: Vec<RecipeRecord>) -> Self {
        Self { rows: rows.into() }
    }

    /// Number of recipes
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the catalog has no recipes
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in load order
    pub fn rows(&self) -> &[RecipeRecord] {
        &self.rows
    }

    /// View over every row, the starting point of a request
    pub fn subset(&self) -> FilteredSubset<'_> {
        FilteredSubset {
            rows: self.rows.iter().collect(),
        }
    }
}

impl FromIterator<RecipeRecord> for Catalog {
    fn from_iter<I: IntoIterator<Item = RecipeRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Ordered view over catalog rows, valid for one request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredSubset<'a> {
    rows: Vec<&'a RecipeRecord>,
}

impl<'a> FilteredSubset<'a> {
    /// Wrap borrowed rows, keeping their order
    pub fn from_rows(rows: Vec<&'a RecipeRecord>) -> Self {
        Self { rows }
    }

    /// Borrowed rows
    pub fn rows(&self) -> &[&'a RecipeRecord] {
        &self.rows
    }

    /// Row at a subset-relative index
    pub fn get(&self, index: usize) -> Option<&'a RecipeRecord> {
        self.rows.get(index).copied()
    }

    /// Nutrition vectors of every row, in order
    pub fn nutrition_matrix(&self) -> Vec<NutritionVector> {
        self.rows.iter().map(|r| r.nutrition).collect()
    }
}

impl<'a> Deref for FilteredSubset<'a> {
    type Target = [&'a RecipeRecord];

    fn deref(&self) -> &Self::Target {
        &self.rows
    }
}

/// Catalog errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Nutrition input has the wrong number of components
    #[error("Dimension mismatch: expected {expected} nutrition values, got {got}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual length received
        got: usize,
    },
}
