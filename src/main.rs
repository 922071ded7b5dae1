use axum::serve;
use std::sync::Arc;
use stock_suggester::api::routes::create_router;
use stock_suggester::config::AppConfig;
use stock_suggester::ingest;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new().filter_level(LevelFilter::Info).init();

    println!("Stock Suggester: Retail Recommendation Server");

    // Load configuration
    let config = AppConfig::load()?;
    println!(
        "Configuration loaded: server={}:{}",
        config.server.host, config.server.port
    );

    // The dataset is loaded once and shared read-only for the process
    // lifetime; no query ever mutates it.
    let dataset = if std::env::var("LOAD_SAMPLE_DATA").unwrap_or_default() == "true" {
        println!("Loading built-in sample dataset...");
        ingest::sample_dataset()
    } else {
        let path = config.dataset_path();
        println!("Loading dataset from {}...", path.display());
        let report = ingest::load_dataset(&path)?;
        for row in &report.skipped {
            log::warn!("skipped dataset row {}: {}", row.line, row.message);
        }
        report.dataset
    };
    println!(
        "Dataset ready: {} records, {} categories, {} locations",
        dataset.len(),
        dataset.categories.len(),
        dataset.locations.len()
    );

    run_server(create_router().with_state(Arc::new(dataset)), &config).await?;

    Ok(())
}

async fn run_server(app: axum::Router, config: &AppConfig) -> anyhow::Result<()> {
    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    println!("Stock Suggester running on http://{}", bind_address);

    serve(listener, app).await?;

    Ok(())
}
