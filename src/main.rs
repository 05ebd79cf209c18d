//! WorldPulse
//!
//! Serves country sentiment over HTTP, or runs one-off analyses from the
//! command line.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use worldpulse::{
    catalog::CountryCatalog,
    config::Config,
    fanout::{select_targets, BatchResponse},
    image::ImageTrigger,
    server::{self, AppState},
};

#[derive(Parser)]
#[command(name = "worldpulse")]
#[command(about = "Country-by-country sentiment analysis over a hosted model")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (defaults: worldpulse.toml, ~/.config/worldpulse/config.toml)
    #[arg(short, long)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve,
    /// List supported country keys
    Countries,
    /// Analyze one country
    Analyze {
        #[arg(short, long)]
        topic: String,
        /// Country key, e.g. "USA"
        #[arg(short, long)]
        country: String,
    },
    /// Analyze many countries concurrently and print JSON
    Batch {
        #[arg(short, long)]
        topic: String,
        /// CSV of country keys (default: whole catalog)
        #[arg(long)]
        countries: Option<String>,
        /// Max number of countries
        #[arg(short, long, default_value = "100")]
        limit: usize,
    },
    /// Render an image for a country
    Image {
        #[arg(short, long)]
        country: String,
        #[arg(short, long)]
        topic: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::load(Some(path))?,
        None => Config::load_default()?,
    };

    match cli.command {
        Commands::Serve => server::serve(&config).await,
        Commands::Countries => show_countries(),
        Commands::Analyze { topic, country } => analyze(config, &topic, &country).await,
        Commands::Batch {
            topic,
            countries,
            limit,
        } => batch(config, &topic, countries.as_deref(), limit).await,
        Commands::Image { country, topic } => render_image(config, &country, topic.as_deref()).await,
    }
}

fn show_countries() -> anyhow::Result<()> {
    let catalog = CountryCatalog::global();
    println!("{:<24} {}", "Key", "Name");
    println!("{}", "-".repeat(64));
    for key in catalog.keys() {
        println!("{:<24} {}", key, catalog.long_name(key).unwrap_or_default());
    }
    Ok(())
}

async fn analyze(config: Config, topic: &str, country: &str) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)?;
    let result = state.service.analyze_country(topic, country).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn batch(
    config: Config,
    topic: &str,
    countries: Option<&str>,
    limit: usize,
) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)?;
    let targets = select_targets(
        state.service.catalog(),
        countries,
        limit,
        config.fanout.max_countries,
    )?;

    let results = state
        .service
        .fan_out(topic, &targets, config.fanout.concurrency)
        .await?;

    let degraded = results.iter().filter(|r| r.is_degraded()).count();
    tracing::info!("{} of {} countries degraded", degraded, results.len());

    let response = BatchResponse {
        topic: topic.to_string(),
        results,
    };
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn render_image(config: Config, country: &str, topic: Option<&str>) -> anyhow::Result<()> {
    let catalog = CountryCatalog::global();
    let long_name = catalog
        .long_name(country)
        .ok_or_else(|| anyhow::anyhow!("Unsupported country: {}", country))?;

    let images = ImageTrigger::new(config.image, &config.server.static_dir);
    if !images.is_enabled() {
        println!("Image generation is disabled.");
        return Ok(());
    }

    match images.generate_image(country, long_name, topic).await {
        Some(url) => println!("{}", url),
        None => anyhow::bail!("Image generation failed for {}", country),
    }
    Ok(())
}
