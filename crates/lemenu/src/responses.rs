//! Request and response types for the recommendation API

use lerecette::{
    ActivityLevel, BmiCategory, FormattedRecipe, Gender, Meal, NutritionVector, Person,
    WeightLossPlan, DEFAULT_NEIGHBORS,
};
use serde::{Deserialize, Serialize};

/// Message returned when fewer candidates survive than neighbors requested
pub const NO_RESULT_MESSAGE: &str = "No recipes found matching your criteria. \
Try adjusting your nutrition requirements or ingredients.";

/// Neighbor search parameters of a prediction request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Number of recipes to return
    #[serde(default = "default_neighbors")]
    pub n_neighbors: usize,

    /// Whether to include distances
    #[serde(default)]
    pub return_distance: bool,
}

fn default_neighbors() -> usize {
    DEFAULT_NEIGHBORS
}

impl Default for Params {
    fn default() -> Self {
        Self {
            n_neighbors: DEFAULT_NEIGHBORS,
            return_distance: false,
        }
    }
}

/// Body of `POST /predict/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionIn {
    /// Nine nutrition values in canonical order
    pub nutrition_input: Vec<f64>,

    /// Ingredient terms every result must contain
    #[serde(default)]
    pub ingredients: Vec<String>,

    /// Search parameters; defaults apply when omitted
    #[serde(default)]
    pub params: Option<Params>,
}

/// One recipe in the upstream column layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[allow(missing_docs)]
pub struct RecipeOut {
    pub name: String,
    pub cook_time: String,
    pub prep_time: String,
    pub total_time: String,
    pub recipe_ingredient_parts: Vec<String>,
    pub calories: f64,
    pub fat_content: f64,
    pub saturated_fat_content: f64,
    pub cholesterol_content: f64,
    pub sodium_content: f64,
    pub carbohydrate_content: f64,
    pub fiber_content: f64,
    pub sugar_content: f64,
    pub protein_content: f64,
    pub recipe_instructions: Vec<String>,
    /// Cosine distance, only when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl From<FormattedRecipe> for RecipeOut {
    fn from(recipe: FormattedRecipe) -> Self {
        let [calories, fat, saturated_fat, cholesterol, sodium, carbohydrate, fiber, sugar, protein] =
            recipe.nutrition.0;
        Self {
            name: recipe.name,
            cook_time: recipe.cook_time,
            prep_time: recipe.prep_time,
            total_time: recipe.total_time,
            recipe_ingredient_parts: recipe.ingredients,
            calories,
            fat_content: fat,
            saturated_fat_content: saturated_fat,
            cholesterol_content: cholesterol,
            sodium_content: sodium,
            carbohydrate_content: carbohydrate,
            fiber_content: fiber,
            sugar_content: sugar,
            protein_content: protein,
            recipe_instructions: recipe.instructions,
            distance: recipe.distance,
        }
    }
}

/// Body of every `POST /predict/` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionOut {
    /// Recommended recipes, `None` when nothing matched
    pub output: Option<Vec<RecipeOut>>,

    /// Error detail
    pub error: Option<String>,

    /// Human-readable status
    pub message: String,
}

impl PredictionOut {
    /// Successful prediction
    pub fn found(recipes: Vec<FormattedRecipe>) -> Self {
        let output: Vec<RecipeOut> = recipes.into_iter().map(RecipeOut::from).collect();
        let message = format!(
            "Successfully generated {} recipe recommendations",
            output.len()
        );
        Self {
            output: Some(output),
            error: None,
            message,
        }
    }

    /// Criteria too narrow
    pub fn no_result() -> Self {
        Self {
            output: None,
            error: None,
            message: NO_RESULT_MESSAGE.to_string(),
        }
    }
}

/// Body of `POST /diet/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietIn {
    /// Age in years
    pub age: u32,

    /// Height in centimeters
    pub height: f64,

    /// Weight in kilograms
    pub weight: f64,

    /// Sex for the BMR offset
    pub gender: Gender,

    /// Exercise level
    #[serde(default)]
    pub activity: ActivityLevel,

    /// Weight goal
    #[serde(default)]
    pub plan: WeightLossPlan,

    /// Ingredient terms applied to every meal
    #[serde(default)]
    pub ingredients: Vec<String>,

    /// Recipes per meal
    #[serde(default = "default_neighbors")]
    pub n_neighbors: usize,

    /// Seed for the random meal targets
    #[serde(default)]
    pub seed: Option<u64>,
}

impl DietIn {
    /// Person profile of the request
    pub fn person(&self) -> Person {
        Person {
            age: self.age,
            height_cm: self.height,
            weight_kg: self.weight,
            gender: self.gender,
            activity: self.activity,
            plan: self.plan,
        }
    }
}

/// Calories for one weight plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanCalories {
    /// Plan
    pub plan: WeightLossPlan,
    /// Plan name
    pub label: String,
    /// Expected weekly change
    pub weekly_change: String,
    /// Daily calories under the plan
    pub calories: f64,
}

/// Recommendations for one meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealOut {
    /// Meal
    pub meal: Meal,

    /// Nutrition target used for the search
    pub target: Vec<f64>,

    /// Recipes, `None` when nothing matched
    pub output: Option<Vec<RecipeOut>>,
}

/// Body of a `POST /diet/` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietOut {
    /// Body mass index
    pub bmi: f64,

    /// BMI band
    pub bmi_category: BmiCategory,

    /// Calories per day to keep current weight
    pub maintenance_calories: f64,

    /// Calories per day under the chosen plan
    pub daily_calories: f64,

    /// Calories for every plan
    pub plans: Vec<PlanCalories>,

    /// One entry per meal, in serving order
    pub meals: Vec<MealOut>,

    /// Nine nutrition fields summed over every recommended recipe
    pub totals: NutritionVector,

    /// Calories summed over every recommended recipe
    pub total_calories: f64,

    /// Whether `total_calories` is above `daily_calories`
    pub exceeds_budget: bool,
}
