//! Ticket warehouse ETL
//!
//! Single-shot batch pipeline:
//! - Fetch raw records from the upstream tracker
//! - Enrich with dimension keys, dates, and resolution metrics
//! - Recreate the star schema and load dimensions, facts, and summary
//! - Run the fixed analytics battery and print the result sets

use anyhow::{Context, Result};
use tracing::{error, info};

use etl_core::{build_dimensions, summarize, Enricher};
use telemetry::init_tracing_from_env;
use warehouse_client::{
    analytics::{self, AnalyticsParams, AnalyticsReport},
    load, schema, WarehouseClient, WarehouseConfig,
};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    /// Upstream record source URL
    #[serde(default = "default_source_url")]
    source_url: String,

    /// Fixed RNG seed for resolution offsets; entropy-seeded when unset
    #[serde(default)]
    seed: Option<u64>,

    #[serde(default)]
    warehouse: WarehouseConfig,

    #[serde(default)]
    analytics: AnalyticsParams,
}

fn default_source_url() -> String {
    "https://jsonplaceholder.typicode.com/todos".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            seed: None,
            warehouse: WarehouseConfig::default(),
            analytics: AnalyticsParams::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing_from_env();

    info!("Starting ticket ETL v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config()?;

    // Connect to the warehouse; the pool is released on every exit path below
    let client = WarehouseClient::connect(config.warehouse.clone())
        .await
        .context("Failed to connect to warehouse")?;

    let result = run_pipeline(&client, &config).await;
    client.close().await;

    match result {
        Ok(report) => {
            print_report(&report, &config.analytics);
            Ok(())
        }
        Err(e) => {
            error!("Pipeline run failed: {}", e);
            Err(e.into())
        }
    }
}

/// Runs one full extract-transform-load-analyze cycle.
async fn run_pipeline(
    client: &WarehouseClient,
    config: &Config,
) -> etl_core::Result<AnalyticsReport> {
    let http = reqwest::Client::new();
    let raw = ticket_source::fetch_raw_records(&http, &config.source_url).await?;
    info!(count = raw.len(), "Fetched raw records");

    let mut enricher = match config.seed {
        Some(seed) => Enricher::with_seed(seed),
        None => Enricher::from_entropy(),
    };
    let records = enricher.enrich_all(&raw)?;
    info!(count = records.len(), "Enriched and deduplicated records");

    let dimensions = build_dimensions(&records);
    let summary = summarize(&records);

    schema::recreate_schema(client).await?;
    load::load_all(client, &dimensions, &records, &summary).await?;

    analytics::run_all(client, &config.analytics).await
}

/// Prints the four analytical result sets to stdout in report order.
fn print_report(report: &AnalyticsReport, params: &AnalyticsParams) {
    println!(
        "1. Ticket Aging Analysis (Open > {} days):",
        params.aging_threshold_days
    );
    for row in &report.aging {
        println!("  {:<12} {}", row.project_name, row.aged_tickets);
    }

    println!("\n2. User Productivity (Rank by Avg Resolution):");
    for row in &report.productivity {
        println!(
            "  #{:<3} {:<12} tickets={:<4} avg_resolution_days={:.2}",
            row.resolution_rank, row.user_name, row.total_tickets, row.avg_resolution_days
        );
    }

    println!("\n3. Priority Distribution by Project:");
    for row in &report.distribution {
        println!(
            "  {:<12} {:<8} {:<8} {}",
            row.project_name, row.priority_name, row.status, row.ticket_count
        );
    }

    println!("\n4. Monthly Ticket Creation Trends:");
    for row in &report.monthly_trend {
        println!(
            "  {:<12} {}-{:02} {}",
            row.project_name, row.year, row.month, row.ticket_count
        );
    }
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("TICKET_ETL")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Manual overrides for the nested warehouse config from environment
    if let Ok(host) = std::env::var("TICKET_ETL_WAREHOUSE_HOST") {
        config.warehouse.host = host;
    }
    if let Ok(port) = std::env::var("TICKET_ETL_WAREHOUSE_PORT") {
        config.warehouse.port = port.parse().context("Invalid warehouse port")?;
    }
    if let Ok(username) = std::env::var("TICKET_ETL_WAREHOUSE_USERNAME") {
        config.warehouse.username = username;
    }
    if let Ok(password) = std::env::var("TICKET_ETL_WAREHOUSE_PASSWORD") {
        config.warehouse.password = password;
    }
    if let Ok(database) = std::env::var("TICKET_ETL_WAREHOUSE_DATABASE") {
        config.warehouse.database = database;
    }

    // Source URL override
    if let Ok(source_url) = std::env::var("TICKET_ETL_SOURCE_URL") {
        config.source_url = source_url;
    }

    Ok(config)
}
