use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

use nta_core::config::create_env_template;
use nta_core::logging::{init_logging, Logger};
use nta_core::{NewsQuery, Settings};
use nta_pipeline::{build_pipeline, PipelineOutcome, RunRegistry};
use nta_storage::EnvFileStore;
use nta_web::AppState;

const CLI_AUDIO_FILE: &str = "news_audio.mp3";

#[derive(Parser, Debug)]
#[command(author, version, about = "News to Audio WhatsApp Sender", long_about = None)]
pub struct Cli {
    /// Create a template .env file and exit
    #[arg(long)]
    create_env: bool,
    /// Where --create-env writes the template
    #[arg(long, default_value = ".env.template")]
    env_template: PathBuf,
    /// Configuration file to load
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,
    /// News category
    #[arg(long, default_value = "technology")]
    category: String,
    /// Country code
    #[arg(long, default_value = "us")]
    country: String,
    /// Number of news articles
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=50))]
    count: u32,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the registration web front end
    Serve {
        #[arg(long, default_value = "127.0.0.1:5000")]
        addr: String,
    },
}

impl Cli {
    fn query(&self) -> NewsQuery {
        NewsQuery {
            category: self.category.clone(),
            country: self.country.clone(),
            count: self.count,
        }
    }
}

/// Runs the chain once for the configured recipient. Exits 0 only when the audio was delivered;
/// no articles, a synthesis failure or a failed delivery all exit 1.
async fn send_once(cli: &Cli) -> anyhow::Result<ExitCode> {
    let settings = Settings::from_env_file(&cli.env_file)
        .with_context(|| format!("Cannot load settings from {}", cli.env_file.display()))?;
    let recipient = settings.recipient()?;
    let pipeline = build_pipeline(&settings).await;

    let outcome = pipeline
        .run(&recipient, &cli.query(), CLI_AUDIO_FILE, &Logger::new())
        .await?;

    Ok(match outcome {
        PipelineOutcome::Delivered { channel, sid, .. } => {
            info!("📨 Message sent over {}! SID: {}", channel, sid);
            ExitCode::SUCCESS
        }
        PipelineOutcome::NoArticles => {
            error!("No articles found. Exiting.");
            ExitCode::FAILURE
        }
        PipelineOutcome::SynthesisFailed { reason } => {
            error!("Failed to convert text to speech: {}", reason);
            ExitCode::FAILURE
        }
        PipelineOutcome::DeliveryFailed { audio_url, reason } => {
            error!("Failed to send {}: {}", audio_url, reason);
            info!("Note: WhatsApp delivery needs an approved sender and a recipient who opted in");
            ExitCode::FAILURE
        }
    })
}

async fn serve(cli: &Cli, addr: &str) -> anyhow::Result<ExitCode> {
    let settings = Settings::from_env_file(&cli.env_file)
        .with_context(|| format!("Cannot load settings from {}", cli.env_file.display()))?;
    let pipeline = build_pipeline(&settings).await;
    let registry = RunRegistry::new(Arc::new(pipeline), settings.synthesis_failure_policy);
    let store = EnvFileStore::new(&cli.env_file);

    let state = AppState::new(registry, Arc::new(store)).with_query(cli.query());
    nta_web::serve(state, addr).await?;
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_logging();
    let cli = Cli::parse();

    if cli.create_env {
        create_env_template(&cli.env_template)?;
        info!("Copy this file to .env and fill in your actual credentials");
        return Ok(ExitCode::SUCCESS);
    }

    match &cli.command {
        Some(Commands::Serve { addr }) => serve(&cli, addr).await,
        None => send_once(&cli).await,
    }
}
