//! Catalog loading from CSV files

use flate2::read::GzDecoder;
use lerecette::{Catalog, NutritionVector, RecipeRecord};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Catalog files tried by [`load_from_dir`], in order
pub const CANDIDATE_FILES: [&str; 3] = ["dataset_optimized.csv", "dataset_test.csv", "dataset.csv"];

/// Leading bytes of a gzip stream
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// One CSV row, using the upstream column names
///
/// Columns not listed here are ignored. Empty numeric cells become NaN.
#[derive(Debug, Deserialize)]
struct CsvRecipe {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "CookTime")]
    cook_time: String,
    #[serde(rename = "PrepTime")]
    prep_time: String,
    #[serde(rename = "TotalTime")]
    total_time: String,
    #[serde(rename = "RecipeIngredientParts")]
    ingredients: String,
    #[serde(rename = "RecipeInstructions")]
    instructions: String,
    #[serde(rename = "Calories")]
    calories: Option<f64>,
    #[serde(rename = "FatContent")]
    fat: Option<f64>,
    #[serde(rename = "SaturatedFatContent")]
    saturated_fat: Option<f64>,
    #[serde(rename = "CholesterolContent")]
    cholesterol: Option<f64>,
    #[serde(rename = "SodiumContent")]
    sodium: Option<f64>,
    #[serde(rename = "CarbohydrateContent")]
    carbohydrate: Option<f64>,
    #[serde(rename = "FiberContent")]
    fiber: Option<f64>,
    #[serde(rename = "SugarContent")]
    sugar: Option<f64>,
    #[serde(rename = "ProteinContent")]
    protein: Option<f64>,
}

impl From<CsvRecipe> for RecipeRecord {
    fn from(row: CsvRecipe) -> Self {
        let nutrition = [
            row.calories,
            row.fat,
            row.saturated_fat,
            row.cholesterol,
            row.sodium,
            row.carbohydrate,
            row.fiber,
            row.sugar,
            row.protein,
        ]
        .map(|v| v.unwrap_or(f64::NAN));

        RecipeRecord {
            name: row.name,
            cook_time: row.cook_time,
            prep_time: row.prep_time,
            total_time: row.total_time,
            ingredients_raw: row.ingredients,
            instructions_raw: row.instructions,
            nutrition: NutritionVector(nutrition),
        }
    }
}

/// Open `path` as plain or gzip-compressed text, detected from its first bytes
fn open_catalog_file(path: &Path) -> Result<Box<dyn Read>, DatasetError> {
    let io_error = |e: std::io::Error| DatasetError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut reader = BufReader::new(File::open(path).map_err(io_error)?);
    let compressed = reader.fill_buf().map_err(io_error)?.starts_with(&GZIP_MAGIC);

    if compressed {
        debug!("Reading {:?} as gzip", path);
        Ok(Box::new(GzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Load a catalog from one CSV file, optionally gzip-compressed
///
/// # Errors
///
/// Returns an error if the file cannot be opened, a row cannot be parsed,
/// or the file has no rows
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog, DatasetError> {
    let path = path.as_ref();

    let mut reader = csv::Reader::from_reader(open_catalog_file(path)?);

    let mut rows = Vec::new();
    for result in reader.deserialize::<CsvRecipe>() {
        let row = result.map_err(|e| DatasetError::Parse {
            path: path.to_path_buf(),
            line: e.position().map(|p| p.line()).unwrap_or(0),
            message: e.to_string(),
        })?;
        rows.push(RecipeRecord::from(row));
    }

    if rows.is_empty() {
        return Err(DatasetError::Empty {
            path: path.to_path_buf(),
        });
    }

    let missing = rows
        .iter()
        .filter(|r| r.nutrition.first_non_finite().is_some())
        .count();
    if missing > 0 {
        warn!("{} recipes in {:?} have missing nutrition values", missing, path);
    }

    info!("Loaded {} recipes from {:?}", rows.len(), path);
    Ok(Catalog::new(rows))
}

/// Load the first usable catalog file from `dir`
///
/// Tries each of [`CANDIDATE_FILES`]; a file that exists but fails to load
/// is logged and skipped.
pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Catalog, DatasetError> {
    let dir = dir.as_ref();

    for name in CANDIDATE_FILES {
        let path = dir.join(name);
        if !path.exists() {
            info!("Dataset {:?} not found, trying next candidate", path);
            continue;
        }

        info!("Attempting to load dataset from: {:?}", path);
        match load_catalog(&path) {
            Ok(catalog) => return Ok(catalog),
            Err(e) => warn!("Failed to load dataset {:?}: {}", path, e),
        }
    }

    Err(DatasetError::NotFound {
        dir: dir.to_path_buf(),
    })
}

/// Built-in five-recipe catalog
pub fn sample_catalog() -> Catalog {
    let recipe = |name: &str,
                  times: [&str; 3],
                  ingredients: &str,
                  instructions: &str,
                  nutrition: [f64; 9]| RecipeRecord {
        name: name.to_string(),
        cook_time: times[0].to_string(),
        prep_time: times[1].to_string(),
        total_time: times[2].to_string(),
        ingredients_raw: ingredients.to_string(),
        instructions_raw: instructions.to_string(),
        nutrition: NutritionVector(nutrition),
    };

    Catalog::new(vec![
        recipe(
            "Chicken Salad",
            ["15 min", "10 min", "25 min"],
            r#"["chicken breast", "lettuce", "tomatoes", "olive oil"]"#,
            r#"["Cook chicken", "Chop vegetables", "Mix ingredients"]"#,
            [350.0, 12.0, 2.0, 85.0, 450.0, 8.0, 3.0, 4.0, 45.0],
        ),
        recipe(
            "Vegetarian Pasta",
            ["20 min", "15 min", "35 min"],
            r#"["pasta", "tomatoes", "basil", "olive oil"]"#,
            r#"["Boil pasta", "Prepare sauce", "Combine ingredients"]"#,
            [420.0, 8.0, 1.0, 0.0, 380.0, 75.0, 6.0, 8.0, 12.0],
        ),
        recipe(
            "Salmon with Rice",
            ["25 min", "10 min", "35 min"],
            r#"["salmon", "rice", "vegetables", "lemon"]"#,
            r#"["Cook salmon", "Prepare rice", "Add vegetables"]"#,
            [480.0, 18.0, 3.0, 95.0, 520.0, 45.0, 4.0, 2.0, 38.0],
        ),
        recipe(
            "Greek Salad",
            ["0 min", "15 min", "15 min"],
            r#"["cucumber", "tomatoes", "olives", "feta cheese"]"#,
            r#"["Chop vegetables", "Mix ingredients", "Add dressing"]"#,
            [180.0, 14.0, 6.0, 25.0, 680.0, 8.0, 3.0, 5.0, 6.0],
        ),
        recipe(
            "Beef Stir Fry",
            ["15 min", "20 min", "35 min"],
            r#"["beef", "vegetables", "soy sauce", "ginger"]"#,
            r#"["Slice beef", "Stir fry vegetables", "Add sauce"]"#,
            [380.0, 16.0, 5.0, 75.0, 720.0, 22.0, 5.0, 6.0, 32.0],
        ),
    ])
}

/// Catalog loading errors
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// File could not be opened
    #[error("Failed to open dataset {path:?}: {message}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        message: String,
    },

    /// A row could not be parsed
    #[error("Failed to parse dataset {path:?} at line {line}: {message}")]
    Parse {
        /// File path
        path: PathBuf,
        /// 1-based line, 0 when unknown
        line: u64,
        /// Underlying error
        message: String,
    },

    /// File has a header but no rows
    #[error("Dataset {path:?} is empty")]
    Empty {
        /// File path
        path: PathBuf,
    },

    /// No candidate file could be loaded
    #[error("No dataset file found in {dir:?}. Please ensure dataset.csv or dataset_optimized.csv exists")]
    NotFound {
        /// Directory searched
        dir: PathBuf,
    },
}
