use crate::server;
use clap::{Args, Parser, Subcommand, ValueEnum};
use lead_scoring::config::AppConfig;
use lead_scoring::domain::Offer;
use lead_scoring::error::AppError;
use lead_scoring::ingest;
use lead_scoring::scoring::classifier::GeminiClassifier;
use lead_scoring::scoring::{formatter, ScoringPipeline};
use lead_scoring::telemetry;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "Lead Intent Scorer",
    about = "Score sales leads against an offer with rules plus an AI intent classifier",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a leads CSV against an offer JSON file and print the batch
    Score(ScoreArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Path to the offer JSON file
    #[arg(long)]
    offer: PathBuf,
    /// Path to the leads CSV file
    #[arg(long)]
    leads: PathBuf,
    /// Output format for the scored batch
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Json,
    Csv,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args).await,
    }
}

async fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let payload: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&args.offer)?)?;
    let offer = Offer::from_payload(&payload)?;
    let leads = ingest::parse_leads(File::open(&args.leads)?)?;

    let classifier = Arc::new(GeminiClassifier::new(config.classifier)?);
    let pipeline = ScoringPipeline::new(classifier);
    let batch = pipeline.run(&offer, &leads).await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&batch)?),
        OutputFormat::Csv => print!("{}", formatter::to_csv(&batch)?),
    }

    Ok(())
}
