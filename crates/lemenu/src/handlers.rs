//! HTTP handlers for the recommendation API

use axum::{extract::State, routing, Json, Router};
use lerecette::{
    format_recommendations, recommend, Catalog, IngredientQuery, NutritionTotals,
    NutritionVector, QueryParams, Recommendation,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::ServiceConfig;
use crate::error::{ApiError, ApiResult};
use crate::responses::{
    DietIn, DietOut, MealOut, Params, PlanCalories, PredictionIn, PredictionOut, RecipeOut,
};

/// State shared across all handlers
///
/// The catalog is immutable and reference counted, so handlers clone it into
/// blocking tasks without locking.
#[derive(Clone)]
pub struct AppState {
    /// Shared recipe catalog
    pub catalog: Catalog,

    /// Immutable service configuration
    pub config: Arc<ServiceConfig>,
}

impl AppState {
    /// Create a new AppState from a loaded catalog and configuration
    pub fn new(catalog: Catalog, config: ServiceConfig) -> Self {
        Self {
            catalog,
            config: Arc::new(config),
        }
    }
}

/// Run one prediction request against `catalog`
///
/// Shared by the `/predict/` handler and the `recommend` command.
pub fn run_prediction(
    catalog: &Catalog,
    request: &PredictionIn,
    default_neighbors: usize,
) -> ApiResult<PredictionOut> {
    let target = NutritionVector::from_slice(&request.nutrition_input)
        .map_err(|e| ApiError::validation(format!("nutrition_input: {}", e)))?;

    let params = request.params.unwrap_or(Params {
        n_neighbors: default_neighbors,
        return_distance: false,
    });
    let query = IngredientQuery::new(&request.ingredients);
    let params = QueryParams::new(params.n_neighbors).with_distance(params.return_distance);

    match recommend(catalog, &target, &query, &params)? {
        Recommendation::Found(result) => Ok(PredictionOut::found(format_recommendations(&result))),
        Recommendation::NoResult {
            available,
            requested,
        } => {
            info!(
                "No result: {} candidates for {} neighbors",
                available, requested
            );
            Ok(PredictionOut::no_result())
        }
    }
}

/// Build a diet plan with per-meal recommendations
///
/// Meal targets are random unless `request.seed` is set. A meal whose search
/// fails is reported without recipes; the other meals are still planned.
pub fn run_diet(catalog: &Catalog, request: &DietIn) -> ApiResult<DietOut> {
    let person = request.person();
    person.validate()?;

    let mut rng = match request.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let query = IngredientQuery::new(&request.ingredients);
    let params = QueryParams::new(request.n_neighbors);

    let mut meals = Vec::new();
    let mut recommended = Vec::new();
    for (meal, target) in person.meal_targets(&mut rng) {
        let output = match recommend(catalog, &target, &query, &params) {
            Ok(Recommendation::Found(result)) => {
                let formatted = format_recommendations(&result);
                recommended.extend(formatted.iter().cloned());
                Some(formatted.into_iter().map(RecipeOut::from).collect())
            }
            Ok(Recommendation::NoResult { .. }) => {
                warn!("No recipes for {:?}", meal);
                None
            }
            Err(e) => {
                warn!("Recommendation for {:?} failed: {}", meal, e);
                None
            }
        };
        meals.push(MealOut {
            meal,
            target: target.as_slice().to_vec(),
            output,
        });
    }

    let totals = NutritionTotals::from_recipes(&recommended);
    let daily = person.daily_calories();
    let exceeds_budget = totals.exceeds(daily);
    if exceeds_budget {
        info!(
            "Recommended meals total {:.0} kcal over a {:.0} kcal budget",
            totals.calories(),
            daily
        );
    }

    Ok(DietOut {
        bmi: person.bmi(),
        bmi_category: person.bmi_category(),
        maintenance_calories: person.maintenance_calories(),
        daily_calories: daily,
        plans: person
            .plan_calories()
            .into_iter()
            .map(|(plan, calories)| PlanCalories {
                plan,
                label: plan.label().to_string(),
                weekly_change: plan.weekly_change().to_string(),
                calories,
            })
            .collect(),
        meals,
        totals: totals.0,
        total_calories: totals.calories(),
        exceeds_budget,
    })
}

/// GET / - Health check endpoint
pub async fn home() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "health_check": "OK",
        "message": "Diet Recommendation API is running",
    }))
}

/// POST /predict/ - Recommend recipes for a nutrition target
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictionIn>,
) -> ApiResult<Json<PredictionOut>> {
    info!(
        "Prediction request: {} ingredients, params={:?}",
        request.ingredients.len(),
        request.params
    );

    let catalog = state.catalog.clone();
    let default_neighbors = state.config.default_neighbors;
    let response = tokio::task::spawn_blocking(move || {
        run_prediction(&catalog, &request, default_neighbors)
    })
    .await
    .map_err(|e| {
        error!("Prediction task failed: {}", e);
        ApiError::internal(format!("Prediction task failed: {}", e))
    })??;

    Ok(Json(response))
}

/// POST /diet/ - Diet plan with per-meal recommendations
pub async fn diet(
    State(state): State<AppState>,
    Json(request): Json<DietIn>,
) -> ApiResult<Json<DietOut>> {
    info!("Diet request: plan={:?}, activity={:?}", request.plan, request.activity);

    let catalog = state.catalog.clone();
    let response = tokio::task::spawn_blocking(move || run_diet(&catalog, &request))
        .await
        .map_err(|e| {
            error!("Diet task failed: {}", e);
            ApiError::internal(format!("Diet task failed: {}", e))
        })??;

    Ok(Json(response))
}

/// Create router with all API endpoints
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", routing::get(home))
        .route("/predict/", routing::post(predict))
        .route("/predict", routing::post(predict))
        .route("/diet/", routing::post(diet))
        .route("/diet", routing::post(diet))
}
