use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::{error, Level};

use hotspots::{
    config::ConfigLoader,
    geojson::FeatureCollection,
    samples::SampleLoader,
    vulnerability::{apply_plant_priority, apply_scores, DEFAULT_DELTA_NDVI},
    GeminiClient, WeightSuggester, WeightTriple,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Heat-vulnerability weight tuning and scoring")]
struct Cli {
    /// Maximum log level written to stderr
    #[arg(long, global = true, default_value = "info")]
    log_level: Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ask the language model for a new weight triple
    Suggest {
        /// JSON array of sampled zones
        #[arg(long, default_value = "data/samples.json")]
        samples: PathBuf,

        /// YAML generator config (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the API base URL
        #[arg(long)]
        endpoint: Option<String>,

        /// Override the model name
        #[arg(long)]
        model: Option<String>,
    },
    /// Write a vulnerability score onto every point
    Score {
        #[command(flatten)]
        io: GeoIo,

        #[command(flatten)]
        weights: WeightArgs,
    },
    /// Write the expected score drop from planting onto every point
    Priority {
        #[command(flatten)]
        io: GeoIo,

        #[command(flatten)]
        weights: WeightArgs,

        /// Increase applied to normalized NDVI
        #[arg(long, default_value_t = DEFAULT_DELTA_NDVI)]
        delta_ndvi: f64,
    },
}

#[derive(Debug, Args)]
struct GeoIo {
    /// Input GeoJSON point collection
    #[arg(long)]
    input: PathBuf,

    /// Output GeoJSON path
    #[arg(long)]
    output: PathBuf,
}

#[derive(Debug, Args)]
struct WeightArgs {
    #[arg(long, default_value_t = WeightTriple::TUNED.w1)]
    w1: f64,
    #[arg(long, default_value_t = WeightTriple::TUNED.w2)]
    w2: f64,
    #[arg(long, default_value_t = WeightTriple::TUNED.w3)]
    w3: f64,
}

impl From<&WeightArgs> for WeightTriple {
    fn from(args: &WeightArgs) -> Self {
        WeightTriple::new(args.w1, args.w2, args.w3)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Suggest {
            samples,
            config,
            endpoint,
            model,
        } => {
            let samples = SampleLoader::new(".").load(&samples)?;
            let mut config = ConfigLoader::new(".").load(config.as_deref())?;
            if let Some(endpoint) = endpoint {
                config = config.with_endpoint(endpoint);
            }
            if let Some(model) = model {
                config = config.with_model(model);
            }

            let suggester = WeightSuggester::new(GeminiClient::from_env(config)?);
            let suggestion = suggester.suggest(&samples).await?;
            println!("Full API response: {}", suggestion.reply.raw_body);
            println!("Raw text reply:\n{}", suggestion.reply.text);
            println!("Cleaned JSON text:\n{}", suggestion.cleaned);
            println!("New weights: {}", suggestion.weights);
        }
        Command::Score { io, weights } => {
            let mut points = FeatureCollection::load(&io.input)?;
            apply_scores(&mut points, &WeightTriple::from(&weights))?;
            points.save(&io.output)?;
            println!(
                "Wrote {} with vulnerability for {} points.",
                io.output.display(),
                points.features.len()
            );
        }
        Command::Priority {
            io,
            weights,
            delta_ndvi,
        } => {
            let mut points = FeatureCollection::load(&io.input)?;
            apply_plant_priority(&mut points, &WeightTriple::from(&weights), delta_ndvi)?;
            points.save(&io.output)?;
            println!(
                "Wrote {} with plantPriority for {} points.",
                io.output.display(),
                points.features.len()
            );
        }
    }
    Ok(())
}
