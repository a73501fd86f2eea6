//! projgraph: load project metadata into a graph database and browse it.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use projgraph_core::ProjGraphConfig;
use projgraph_ingest::Loader;
use projgraph_server::{build_router, AppState};

fn print_help() {
    println!("projgraph: project knowledge graph dashboard");
    println!();
    println!("Usage: projgraph [command]");
    println!();
    println!("Commands:");
    println!("  (none) | serve           Start the dashboard server");
    println!("  load [csv]               Upsert projects from a CSV file");
    println!("  seed                     Add the demo organisations, themes and projects");
    println!("  help                     Show this help message");
    println!();
    println!("Environment:");
    println!("  BOLT_URL, NEO4J_USER, NEO4J_PASS   Neo4j connection (or secrets.toml)");
    println!("  PROJGRAPH_BACKEND                  neo4j | memory");
    println!("  PROJGRAPH_CSV                      default CSV path");
    println!("  PORT                               HTTP port (default 8501)");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = ProjGraphConfig::from_env()?;

    match args.get(1).map(String::as_str) {
        None | Some("serve") => serve(config).await,
        Some("load") => {
            let path = args
                .get(2)
                .map(PathBuf::from)
                .unwrap_or_else(|| config.csv_path.clone());
            let store = projgraph_store::open_store(&config).await?;
            let report = Loader::new(store.as_ref()).load_file(&path).await?;
            println!("Loaded {} projects from {}", report.rows, report.source);
            Ok(())
        }
        Some("seed") => {
            let store = projgraph_store::open_store(&config).await?;
            let report = projgraph_ingest::seed_demo_data(store.as_ref()).await?;
            println!(
                "Demo data: {} nodes created, {} already present; {} relationships created, {} already present",
                report.nodes_created,
                report.nodes_existing,
                report.relationships_created,
                report.relationships_existing
            );
            Ok(())
        }
        Some("--help") | Some("-h") | Some("help") => {
            print_help();
            Ok(())
        }
        Some(other) => {
            eprintln!("Unknown command: {}. Use 'projgraph help' for usage.", other);
            std::process::exit(1);
        }
    }
}

async fn serve(config: ProjGraphConfig) -> anyhow::Result<()> {
    let port = config.port;
    let store = projgraph_store::open_store_or_memory(&config).await;

    let state = Arc::new(AppState::new(config, store));
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("projgraph dashboard listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
