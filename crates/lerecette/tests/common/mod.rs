// Shared fixtures for lerecette integration tests

use lerecette::{Catalog, NutritionVector, RecipeRecord};

#[allow(dead_code)]
pub const TARGET: [f64; 9] = [500.0, 20.0, 5.0, 50.0, 300.0, 60.0, 8.0, 15.0, 25.0];

fn recipe(
    name: &str,
    times: (&str, &str, &str),
    ingredients: &str,
    instructions: &str,
    nutrition: [f64; 9],
) -> RecipeRecord {
    RecipeRecord {
        name: name.to_string(),
        cook_time: times.0.to_string(),
        prep_time: times.1.to_string(),
        total_time: times.2.to_string(),
        ingredients_raw: ingredients.to_string(),
        instructions_raw: instructions.to_string(),
        nutrition: NutritionVector(nutrition),
    }
}

/// The five-recipe catalog used across scenarios
#[allow(dead_code)]
pub fn five_recipes() -> Catalog {
    Catalog::new(vec![
        recipe(
            "Chicken Salad",
            ("15 min", "10 min", "25 min"),
            r#"["chicken breast", "lettuce", "tomatoes", "olive oil"]"#,
            r#"["Cook chicken", "Chop vegetables", "Mix ingredients"]"#,
            [350.0, 12.0, 2.0, 85.0, 450.0, 8.0, 3.0, 4.0, 45.0],
        ),
        recipe(
            "Vegetarian Pasta",
            ("20 min", "15 min", "35 min"),
            r#"["pasta", "tomatoes", "basil", "olive oil"]"#,
            r#"["Boil pasta", "Prepare sauce", "Combine ingredients"]"#,
            [420.0, 8.0, 1.0, 0.0, 380.0, 75.0, 6.0, 8.0, 12.0],
        ),
        recipe(
            "Salmon with Rice",
            ("25 min", "10 min", "35 min"),
            r#"["salmon", "rice", "vegetables", "lemon"]"#,
            r#"["Cook salmon", "Prepare rice", "Add vegetables"]"#,
            [480.0, 18.0, 3.0, 95.0, 520.0, 45.0, 4.0, 2.0, 38.0],
        ),
        recipe(
            "Greek Salad",
            ("0 min", "15 min", "15 min"),
            r#"["cucumber", "tomatoes", "olives", "feta cheese"]"#,
            r#"["Chop vegetables", "Mix ingredients", "Add dressing"]"#,
            [180.0, 14.0, 6.0, 25.0, 680.0, 8.0, 3.0, 5.0, 6.0],
        ),
        recipe(
            "Beef Stir Fry",
            ("15 min", "20 min", "35 min"),
            r#"["beef", "vegetables", "soy sauce", "ginger"]"#,
            r#"["Slice beef", "Stir fry vegetables", "Add sauce"]"#,
            [380.0, 16.0, 5.0, 75.0, 720.0, 22.0, 5.0, 6.0, 32.0],
        ),
    ])
}
