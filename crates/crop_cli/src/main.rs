use std::path::PathBuf;
use clap::Parser;
use crop_core::{Crop, PredictionInput, Result};
use crop_inference::{ModelLoading, PredictionService};
use crop_storage::{StoreConfig, DEFAULT_DATASET_PATH, DEFAULT_MODEL_PATH, DEFAULT_NOTEBOOK_PATH};
use crop_web::{config, AppState, ServerConfig};
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(author, version, about = "Crop recommendation service", long_about = None)]
pub struct Cli {
    /// Serialized model artifact (JSON)
    #[arg(long, env = "CROP_MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    model_path: PathBuf,
    /// Dataset served by /data (CSV with a header row)
    #[arg(long, env = "CROP_DATASET_PATH", default_value = DEFAULT_DATASET_PATH)]
    dataset_path: PathBuf,
    /// Notebook served by /notebook
    #[arg(long, env = "CROP_NOTEBOOK_PATH", default_value = DEFAULT_NOTEBOOK_PATH)]
    notebook_path: PathBuf,
    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve {
        #[arg(long, env = "CROP_HOST", default_value = config::DEFAULT_HOST)]
        host: String,
        #[arg(long, env = "CROP_PORT", default_value_t = config::DEFAULT_PORT)]
        port: u16,
        /// Origin allowed to call the API with credentials; repeat for several
        #[arg(long = "allowed-origin", env = "CROP_ALLOWED_ORIGINS", value_delimiter = ',', default_value = config::DEFAULT_ALLOWED_ORIGIN)]
        allowed_origins: Vec<String>,
        /// Load the model once at startup instead of on every request
        #[arg(long)]
        preload_model: bool,
    },
    /// Predict a crop for one set of measurements
    Predict {
        #[arg(long = "n", allow_hyphen_values = true)]
        n: f64,
        #[arg(long = "p", allow_hyphen_values = true)]
        p: f64,
        #[arg(long = "k", allow_hyphen_values = true)]
        k: f64,
        #[arg(long, allow_hyphen_values = true)]
        temperature: f64,
        #[arg(long, allow_hyphen_values = true)]
        humidity: f64,
        #[arg(long, allow_hyphen_values = true)]
        ph: f64,
        #[arg(long, allow_hyphen_values = true)]
        rainfall: f64,
    },
    /// Print the crop labels in class-index order
    Labels,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store = crop_storage::create_store(StoreConfig {
        model_path: cli.model_path,
        dataset_path: cli.dataset_path,
        notebook_path: cli.notebook_path,
    });

    match cli.command {
        Commands::Serve { host, port, allowed_origins, preload_model } => {
            let loading = if preload_model {
                ModelLoading::Preload
            } else {
                ModelLoading::PerRequest
            };
            let prediction = PredictionService::start(store.clone(), loading).await?;
            let config = ServerConfig { host, port, allowed_origins };
            crop_web::serve(config, AppState::new(store, prediction)).await?;
        }
        Commands::Predict { n, p, k, temperature, humidity, ph, rainfall } => {
            let input = PredictionInput { n, p, k, temperature, humidity, ph, rainfall };
            let crop = PredictionService::new(store).predict(&input).await?;
            info!("🌱 Predicted {}", crop);
            println!("{}", crop);
        }
        Commands::Labels => {
            for crop in Crop::ALL {
                println!("{}", crop);
            }
        }
    }

    Ok(())
}
