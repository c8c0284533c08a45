//! CLI entry point for the rigtwin-ingest loader.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

use rigtwin_core::IngestConfig;
use rigtwin_graph::{GraphClient, GraphConfig};

use rigtwin_ingest::fetch::ObjectStore;
use rigtwin_ingest::{pipeline, workbook};

#[derive(Parser)]
#[command(name = "rigtwin-ingest")]
#[command(about = "Load SAP hierarchy and operating-parameter workbooks into the rigtwin asset graph")]
struct Cli {
    /// Config file prefix (default: rigtwin).
    #[arg(short, long, default_value = "rigtwin")]
    config: String,

    /// Read the hierarchy workbook from a local file instead of blob storage.
    #[arg(long)]
    hierarchy_file: Option<PathBuf>,

    /// Read the parameters workbook from a local file instead of blob storage.
    #[arg(long)]
    parameters_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().init();

    let cli = Cli::parse();
    let config = IngestConfig::load(&cli.config)?;

    let run_id = Uuid::new_v4();
    let start = std::time::Instant::now();
    tracing::info!(run_id = %run_id, root = %config.root.name, "Starting ingest run");

    // Connect to Neo4j.
    let graph_config = GraphConfig {
        uri: config.neo4j.uri.clone(),
        user: config.neo4j.user.clone(),
        password: config.neo4j.password.clone(),
        ..GraphConfig::default()
    };
    let graph = GraphClient::connect(&graph_config).await?;

    // Source failures are fatal: nothing is written without both workbooks.
    let store = ObjectStore::new(&config.source);
    let hierarchy_bytes =
        load_bytes(&store, &cli.hierarchy_file, &config.source.hierarchy_key).await?;
    let parameters_bytes =
        load_bytes(&store, &cli.parameters_file, &config.source.parameters_key).await?;

    let hierarchy = workbook::parse_workbook(&hierarchy_bytes)?;
    let parameters = workbook::parse_workbook(&parameters_bytes)?;
    tracing::info!(
        hierarchy_sheets = hierarchy.sheets.len(),
        parameter_sheets = parameters.sheets.len(),
        "Workbooks parsed"
    );

    let report = pipeline::run_pipeline(
        &graph,
        &config.root.label,
        &config.root.name,
        &config.joins,
        &hierarchy,
        &parameters,
    )
    .await;
    report.log_summary();
    tracing::info!(run_id = %run_id, duration_ms = start.elapsed().as_millis() as u64, "Ingest run finished");

    Ok(())
}

async fn load_bytes(
    store: &ObjectStore,
    local_override: &Option<PathBuf>,
    key: &str,
) -> rigtwin_ingest::error::Result<Vec<u8>> {
    match local_override {
        Some(path) => {
            tracing::info!(path = %path.display(), "Reading workbook from local file");
            Ok(tokio::fs::read(path).await?)
        }
        None => store.fetch(key).await,
    }
}
