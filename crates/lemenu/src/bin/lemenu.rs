//! lemenu binary entry point

use anyhow::{Context, Result as AnyhowResult};
use clap::{Parser, Subcommand, ValueEnum};
use lemenu::handlers::{run_diet, run_prediction};
use lemenu::responses::{DietIn, Params, PredictionIn};
use lemenu::{dataset, LeMenuServer, ServiceConfig};
use lerecette::{ActivityLevel, Catalog, Gender, WeightLossPlan};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Recommend recipes by nutrition profile
#[derive(Parser, Debug)]
#[command(name = "lemenu")]
#[command(author = "LeRecette Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Recommend recipes whose nutrition is closest to a target", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(global = true, long = "config", short = 'c')]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(global = true, long = "verbose", short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Host address to bind
        #[arg(long = "host")]
        host: Option<String>,

        /// Port to listen on
        #[arg(long = "port")]
        port: Option<u16>,

        #[command(flatten)]
        source: CatalogSource,
    },

    /// Recommend recipes for one nutrition target
    Recommend {
        /// Nine comma-separated values: calories, fat, saturated fat,
        /// cholesterol, sodium, carbohydrate, fiber, sugar, protein
        #[arg(long = "nutrition", value_delimiter = ',', num_args = 1.., required = true)]
        nutrition: Vec<f64>,

        /// Ingredient terms separated by ';'
        #[arg(long = "ingredients", default_value = "")]
        ingredients: String,

        /// Number of recipes
        #[arg(short = 'k', long = "neighbors")]
        neighbors: Option<usize>,

        /// Include cosine distances
        #[arg(long = "distance")]
        distance: bool,

        #[command(flatten)]
        source: CatalogSource,
    },

    /// Build a diet plan with per-meal recommendations
    Diet {
        /// Age in years
        #[arg(long = "age")]
        age: u32,

        /// Height in centimeters
        #[arg(long = "height")]
        height: f64,

        /// Weight in kilograms
        #[arg(long = "weight")]
        weight: f64,

        #[arg(long = "gender", value_enum)]
        gender: GenderArg,

        #[arg(long = "activity", value_enum, default_value = "sedentary")]
        activity: ActivityArg,

        #[arg(long = "plan", value_enum, default_value = "maintain")]
        plan: PlanArg,

        /// Recipes per meal
        #[arg(short = 'k', long = "neighbors", default_value = "5")]
        neighbors: usize,

        /// Seed for reproducible meal targets
        #[arg(long = "seed")]
        seed: Option<u64>,

        #[command(flatten)]
        source: CatalogSource,
    },
}

/// Where the catalog comes from
#[derive(clap::Args, Debug)]
struct CatalogSource {
    /// Directory holding the catalog CSV files
    #[arg(long = "data-dir", conflicts_with = "sample")]
    data_dir: Option<PathBuf>,

    /// Use the built-in five-recipe catalog
    #[arg(long = "sample")]
    sample: bool,
}

impl CatalogSource {
    fn apply(&self, config: &mut ServiceConfig) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if self.sample {
            config.use_sample = true;
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum GenderArg {
    Male,
    Female,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ActivityArg {
    Sedentary,
    Light,
    Moderate,
    VeryActive,
    ExtraActive,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PlanArg {
    Maintain,
    Mild,
    Loss,
    Extreme,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Male => Gender::Male,
            GenderArg::Female => Gender::Female,
        }
    }
}

impl From<ActivityArg> for ActivityLevel {
    fn from(arg: ActivityArg) -> Self {
        match arg {
            ActivityArg::Sedentary => ActivityLevel::Sedentary,
            ActivityArg::Light => ActivityLevel::Light,
            ActivityArg::Moderate => ActivityLevel::Moderate,
            ActivityArg::VeryActive => ActivityLevel::VeryActive,
            ActivityArg::ExtraActive => ActivityLevel::ExtraActive,
        }
    }
}

impl From<PlanArg> for WeightLossPlan {
    fn from(arg: PlanArg) -> Self {
        match arg {
            PlanArg::Maintain => WeightLossPlan::Maintain,
            PlanArg::Mild => WeightLossPlan::Mild,
            PlanArg::Loss => WeightLossPlan::Loss,
            PlanArg::Extreme => WeightLossPlan::Extreme,
        }
    }
}

#[tokio::main]
async fn main() -> AnyhowResult<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServiceConfig::from_file(path)?.with_env(),
        None => ServiceConfig::from_env(),
    };

    init_logging_impl(&config.log_level, cli.verbose);

    match cli.command {
        Commands::Serve { host, port, source } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            source.apply(&mut config);
            cmd_serve_impl(config).await
        }
        Commands::Recommend {
            nutrition,
            ingredients,
            neighbors,
            distance,
            source,
        } => {
            source.apply(&mut config);
            let request = PredictionIn {
                nutrition_input: nutrition,
                ingredients: ingredients.split(';').map(str::to_string).collect(),
                params: Some(Params {
                    n_neighbors: neighbors.unwrap_or(config.default_neighbors),
                    return_distance: distance,
                }),
            };
            cmd_recommend_impl(config, request).await
        }
        Commands::Diet {
            age,
            height,
            weight,
            gender,
            activity,
            plan,
            neighbors,
            seed,
            source,
        } => {
            source.apply(&mut config);
            let request = DietIn {
                age,
                height,
                weight,
                gender: gender.into(),
                activity: activity.into(),
                plan: plan.into(),
                ingredients: Vec::new(),
                n_neighbors: neighbors,
                seed,
            };
            cmd_diet_impl(config, request).await
        }
    }
}

/// Initialize logging implementation
///
/// `RUST_LOG` wins over the configured level; `--verbose` forces debug.
fn init_logging_impl(level: &str, verbose: bool) {
    let level = if verbose { "debug" } else { level };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Load the catalog named by the configuration
fn load_catalog(config: &ServiceConfig) -> AnyhowResult<Catalog> {
    if config.use_sample {
        return Ok(dataset::sample_catalog());
    }
    dataset::load_from_dir(&config.data_dir)
        .with_context(|| format!("Failed to load catalog from {:?}", config.data_dir))
}

/// Serve command implementation
async fn cmd_serve_impl(config: ServiceConfig) -> AnyhowResult<()> {
    let server = LeMenuServer::new(config).context("Failed to create server")?;
    info!("Server starting on: {}", server.server_url());
    server.start().await.context("Server failed")?;
    Ok(())
}

/// Recommend command implementation
async fn cmd_recommend_impl(config: ServiceConfig, request: PredictionIn) -> AnyhowResult<()> {
    let catalog = load_catalog(&config)?;
    let default_neighbors = config.default_neighbors;

    let response = tokio::task::spawn_blocking(move || {
        run_prediction(&catalog, &request, default_neighbors)
    })
    .await
    .context("Recommendation task failed")?
    .context("Recommendation failed")?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// Diet command implementation
async fn cmd_diet_impl(config: ServiceConfig, request: DietIn) -> AnyhowResult<()> {
    let catalog = load_catalog(&config)?;

    let response = tokio::task::spawn_blocking(move || run_diet(&catalog, &request))
        .await
        .context("Diet task failed")?
        .context("Diet planning failed")?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
