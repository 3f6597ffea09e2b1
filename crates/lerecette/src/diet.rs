// Diet Planning
//
// *Le Régime* (The Diet) - Calorie budgets and per-meal nutrition targets from a person's profile

use crate::format::FormattedRecipe;
use crate::recipe::{NutritionVector, NUTRITION_DIM};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::{Range, RangeInclusive};

/// Biological sex used by the BMR equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// +5 kcal offset
    Male,
    /// -161 kcal offset
    Female,
}

/// Weekly exercise level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    #[default]
    Sedentary,
    /// Light exercise
    Light,
    /// Moderate exercise, 3-5 days a week
    Moderate,
    /// Very active, 6-7 days a week
    VeryActive,
    /// Very active with a physical job
    ExtraActive,
}

impl ActivityLevel {
    /// Multiplier applied to BMR
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Little/no exercise",
            ActivityLevel::Light => "Light exercise",
            ActivityLevel::Moderate => "Moderate exercise (3-5 days/wk)",
            ActivityLevel::VeryActive => "Very active (6-7 days/wk)",
            ActivityLevel::ExtraActive => "Extra active (very active & physical job)",
        }
    }
}

/// Weight goal, expressed as a fraction of maintenance calories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightLossPlan {
    /// Keep current weight
    #[default]
    Maintain,
    /// About 0.25 kg per week
    Mild,
    /// About 0.5 kg per week
    Loss,
    /// About 1 kg per week
    Extreme,
}

impl WeightLossPlan {
    /// Every plan, mildest first
    pub const ALL: [WeightLossPlan; 4] = [
        WeightLossPlan::Maintain,
        WeightLossPlan::Mild,
        WeightLossPlan::Loss,
        WeightLossPlan::Extreme,
    ];

    /// Fraction of maintenance calories
    pub fn factor(self) -> f64 {
        match self {
            WeightLossPlan::Maintain => 1.0,
            WeightLossPlan::Mild => 0.9,
            WeightLossPlan::Loss => 0.8,
            WeightLossPlan::Extreme => 0.6,
        }
    }

    /// Plan name
    pub fn label(self) -> &'static str {
        match self {
            WeightLossPlan::Maintain => "Maintain weight",
            WeightLossPlan::Mild => "Mild weight loss",
            WeightLossPlan::Loss => "Weight loss",
            WeightLossPlan::Extreme => "Extreme weight loss",
        }
    }

    /// Expected weekly change
    pub fn weekly_change(self) -> &'static str {
        match self {
            WeightLossPlan::Maintain => "-0 kg/week",
            WeightLossPlan::Mild => "-0.25 kg/week",
            WeightLossPlan::Loss => "-0.5 kg/week",
            WeightLossPlan::Extreme => "-1 kg/week",
        }
    }
}

/// Meals of the day and their share of daily calories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Meal {
    /// 30 %
    Breakfast,
    /// 40 %
    Lunch,
    /// 30 %
    Dinner,
}

impl Meal {
    /// Meals in serving order
    pub const ALL: [Meal; 3] = [Meal::Breakfast, Meal::Lunch, Meal::Dinner];

    /// Share of daily calories
    pub fn calorie_share(self) -> f64 {
        match self {
            Meal::Breakfast => 0.3,
            Meal::Lunch => 0.4,
            Meal::Dinner => 0.3,
        }
    }
}

/// BMI band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    /// Below 18.5
    Underweight,
    /// 18.5 to 25
    Normal,
    /// 25 to 30
    Overweight,
    /// 30 and above
    Obesity,
}

impl BmiCategory {
    /// Band containing `bmi`
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obesity
        }
    }
}

/// Ranges for the non-calorie components of a meal target
const MEAL_RANGES: [Range<f64>; NUTRITION_DIM - 1] = [
    10.0..30.0,  // fat
    0.0..4.0,    // saturated fat
    0.0..30.0,   // cholesterol
    0.0..400.0,  // sodium
    40.0..75.0,  // carbohydrate
    4.0..10.0,   // fiber
    0.0..10.0,   // sugar
    30.0..100.0, // protein
];

/// Accepted age in years
pub const AGE_RANGE: RangeInclusive<u32> = 1..=120;

/// Accepted height in centimeters
pub const HEIGHT_RANGE_CM: RangeInclusive<f64> = 100.0..=250.0;

/// Accepted weight in kilograms
pub const WEIGHT_RANGE_KG: RangeInclusive<f64> = 20.0..=200.0;

/// Person profile driving a diet plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Age in years
    pub age: u32,

    /// Height in centimeters
    pub height_cm: f64,

    /// Weight in kilograms
    pub weight_kg: f64,

    /// Sex for the BMR offset
    pub gender: Gender,

    /// Exercise level
    #[serde(default)]
    pub activity: ActivityLevel,

    /// Weight goal
    #[serde(default)]
    pub plan: WeightLossPlan,
}

impl Person {
    /// Check the profile lies within the accepted input ranges
    ///
    /// Age 1-120 years, height 100-250 cm, weight 20-200 kg, all inclusive.
    pub fn validate(&self) -> Result<(), Error> {
        if !AGE_RANGE.contains(&self.age) {
            return Err(Error::InvalidProfile(format!(
                "age {} out of range {}-{}",
                self.age,
                AGE_RANGE.start(),
                AGE_RANGE.end()
            )));
        }
        if !HEIGHT_RANGE_CM.contains(&self.height_cm) {
            return Err(Error::InvalidProfile(format!(
                "height {} cm out of range {}-{}",
                self.height_cm,
                HEIGHT_RANGE_CM.start(),
                HEIGHT_RANGE_CM.end()
            )));
        }
        if !WEIGHT_RANGE_KG.contains(&self.weight_kg) {
            return Err(Error::InvalidProfile(format!(
                "weight {} kg out of range {}-{}",
                self.weight_kg,
                WEIGHT_RANGE_KG.start(),
                WEIGHT_RANGE_KG.end()
            )));
        }
        Ok(())
    }

    /// Body mass index, rounded to two decimals
    pub fn bmi(&self) -> f64 {
        let meters = self.height_cm / 100.0;
        (self.weight_kg / (meters * meters) * 100.0).round() / 100.0
    }

    /// BMI band
    pub fn bmi_category(&self) -> BmiCategory {
        BmiCategory::from_bmi(self.bmi())
    }

    /// Basal metabolic rate (Mifflin-St Jeor)
    pub fn bmr(&self) -> f64 {
        let offset = match self.gender {
            Gender::Male => 5.0,
            Gender::Female => -161.0,
        };
        10.0 * self.weight_kg + 6.25 * self.height_cm - 5.0 * self.age as f64 + offset
    }

    /// Calories per day to keep current weight
    pub fn maintenance_calories(&self) -> f64 {
        self.bmr() * self.activity.multiplier()
    }

    /// Calories per day under the chosen plan
    pub fn daily_calories(&self) -> f64 {
        self.maintenance_calories() * self.plan.factor()
    }

    /// Daily calories for every plan, mildest first
    pub fn plan_calories(&self) -> Vec<(WeightLossPlan, f64)> {
        let maintenance = self.maintenance_calories();
        WeightLossPlan::ALL
            .iter()
            .map(|plan| (*plan, maintenance * plan.factor()))
            .collect()
    }

    /// One target vector per meal
    ///
    /// Calories come from the meal's share of the daily budget; the other
    /// components are drawn uniformly from fixed healthy ranges.
    pub fn meal_targets<R: Rng>(&self, rng: &mut R) -> Vec<(Meal, NutritionVector)> {
        let daily = self.daily_calories();
        Meal::ALL
            .iter()
            .map(|meal| {
                let mut values = [0.0; NUTRITION_DIM];
                values[0] = meal.calorie_share() * daily;
                for (v, range) in values[1..].iter_mut().zip(MEAL_RANGES.iter()) {
                    *v = rng.gen_range(range.clone());
                }
                (*meal, NutritionVector(values))
            })
            .collect()
    }
}

/// Sum of nutrition values over chosen recipes
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutritionTotals(pub NutritionVector);

impl NutritionTotals {
    /// Add up every recipe
    pub fn from_recipes<'a, I>(recipes: I) -> Self
    where
        I: IntoIterator<Item = &'a FormattedRecipe>,
    {
        let mut totals = [0.0; NUTRITION_DIM];
        for recipe in recipes {
            for (t, v) in totals.iter_mut().zip(recipe.nutrition.0.iter()) {
                *t += v;
            }
        }
        Self(NutritionVector(totals))
    }

    /// Total calories
    pub fn calories(&self) -> f64 {
        self.0.calories()
    }

    /// Check whether the total exceeds a calorie budget
    pub fn exceeds(&self, budget: f64) -> bool {
        self.calories() > budget
    }
}

/// Diet planning errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Profile values are out of range
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    fn person() -> Person {
        Person {
            age: 25,
            height_cm: 170.0,
            weight_kg: 70.0,
            gender: Gender::Male,
            activity: ActivityLevel::Sedentary,
            plan: WeightLossPlan::Maintain,
        }
    }

    #[test]
    fn test_bmi() {
        let p = person();
        assert_eq!(p.bmi(), 24.22);
        assert_eq!(p.bmi_category(), BmiCategory::Normal);
    }

    #[rstest]
    #[case(18.49, BmiCategory::Underweight)]
    #[case(18.5, BmiCategory::Normal)]
    #[case(25.0, BmiCategory::Overweight)]
    #[case(29.99, BmiCategory::Overweight)]
    #[case(30.0, BmiCategory::Obesity)]
    fn test_bmi_bands(#[case] bmi: f64, #[case] expected: BmiCategory) {
        assert_eq!(BmiCategory::from_bmi(bmi), expected);
    }

    #[test]
    fn test_bmr_and_calories() {
        let p = person();
        // 700 + 1062.5 - 125 + 5
        assert!((p.bmr() - 1642.5).abs() < 1e-9);
        assert!((p.maintenance_calories() - 1971.0).abs() < 1e-9);

        let female = Person {
            gender: Gender::Female,
            activity: ActivityLevel::Moderate,
            plan: WeightLossPlan::Loss,
            ..p
        };
        assert!((female.bmr() - 1476.5).abs() < 1e-9);
        assert!((female.daily_calories() - 1476.5 * 1.55 * 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_plan_calories() {
        let plans = person().plan_calories();
        assert_eq!(plans.len(), 4);
        assert_eq!(plans[0].0, WeightLossPlan::Maintain);
        assert!((plans[3].1 - 1971.0 * 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_meal_targets() {
        let p = person();
        let mut rng = StdRng::seed_from_u64(7);
        let targets = p.meal_targets(&mut rng);
        assert_eq!(targets.len(), 3);

        let calories: f64 = targets.iter().map(|(_, v)| v.calories()).sum();
        assert!((calories - p.daily_calories()).abs() < 1e-9);
        assert!((targets[1].1.calories() - 0.4 * p.daily_calories()).abs() < 1e-9);

        for (_, v) in &targets {
            for (value, range) in v.0[1..].iter().zip(MEAL_RANGES.iter()) {
                assert!(range.contains(value));
            }
        }
    }

    #[rstest]
    #[case(1, 100.0, 20.0, true)]
    #[case(120, 250.0, 200.0, true)]
    #[case(0, 170.0, 70.0, false)]
    #[case(121, 170.0, 70.0, false)]
    #[case(25, 99.9, 70.0, false)]
    #[case(25, 250.1, 70.0, false)]
    #[case(25, 170.0, 19.9, false)]
    #[case(25, 170.0, 200.1, false)]
    #[case(25, f64::NAN, 70.0, false)]
    #[case(25, 170.0, f64::INFINITY, false)]
    fn test_validate_bounds(
        #[case] age: u32,
        #[case] height_cm: f64,
        #[case] weight_kg: f64,
        #[case] valid: bool,
    ) {
        let p = Person {
            age,
            height_cm,
            weight_kg,
            ..person()
        };
        assert_eq!(p.validate().is_ok(), valid);
    }

    #[test]
    fn test_extreme_valid_profile_has_positive_budget() {
        // Lowest budget the bounds allow: 200 + 625 - 600 - 161 = 64 kcal BMR
        let p = Person {
            age: 120,
            height_cm: 100.0,
            weight_kg: 20.0,
            gender: Gender::Female,
            activity: ActivityLevel::Sedentary,
            plan: WeightLossPlan::Extreme,
        };
        assert!(p.validate().is_ok());
        assert!((p.bmr() - 64.0).abs() < 1e-9);
        assert!((p.daily_calories() - 64.0 * 1.2 * 0.6).abs() < 1e-9);

        let mut rng = StdRng::seed_from_u64(1);
        assert!(p.meal_targets(&mut rng).iter().all(|(_, v)| v.calories() > 0.0));
    }

    #[test]
    fn test_person_serde_defaults() {
        let p: Person = serde_json::from_str(
            r#"{"age": 30, "height_cm": 180, "weight_kg": 80, "gender": "female"}"#,
        )
        .unwrap();
        assert_eq!(p.activity, ActivityLevel::Sedentary);
        assert_eq!(p.plan, WeightLossPlan::Maintain);
    }

    #[test]
    fn test_nutrition_totals() {
        let recipe = |calories: f64| FormattedRecipe {
            name: "r".to_string(),
            cook_time: String::new(),
            prep_time: String::new(),
            total_time: String::new(),
            nutrition: NutritionVector([calories, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.0]),
            ingredients: vec![],
            instructions: vec![],
            distance: None,
        };
        let recipes = vec![recipe(300.0), recipe(450.0)];
        let totals = NutritionTotals::from_recipes(&recipes);
        assert_eq!(totals.calories(), 750.0);
        assert_eq!(totals.0[8], 4.0);
        assert!(totals.exceeds(700.0));
        assert!(!totals.exceeds(750.0));
    }
}
