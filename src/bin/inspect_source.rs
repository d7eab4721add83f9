use anyhow::Result;
use landuse_search::{
    columns::{ColumnLabels, Diagnostics},
    fetch::{fetch_dataset, http_client},
    table::ValueOrder,
    Config,
};
use std::{env, process::exit};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    // Optional CLI argument: a data URL overriding the configured one.
    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [DATA_URL]", args[0]);
        exit(2);
    }

    if let Err(e) = run(args.get(1).cloned()).await {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

/// Fetch the source once, bypassing any cache, and print what it contains.
async fn run(url_override: Option<String>) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(url) = url_override {
        config.data_url = url;
        config.validate()?;
    }

    let client = http_client(&config)?;
    let dataset = fetch_dataset(&client, &config.data_url).await?;
    let table = &dataset.table;
    let labels: &ColumnLabels = &config.columns;

    println!("=== Source: {} ===", dataset.source_url);
    println!("Fetched at:  {}", dataset.fetched_at.to_rfc3339());
    println!("Rows:        {}", table.num_rows());
    println!("Columns:     {}", table.num_columns());
    println!();

    println!("=== Columns ===");
    for name in table.column_names() {
        println!("- {}", name);
    }
    println!();

    println!("=== Filter columns ===");
    for name in labels.leading() {
        match table.distinct(name, ValueOrder::Lexicographic) {
            Some(values) => println!("- {:<20} {} distinct values", name, values.len()),
            None => println!("- {:<20} <absent>", name),
        }
    }

    if let Some(d) = Diagnostics::inspect(table, labels) {
        println!();
        println!("=== Missing expected columns ===");
        println!("Missing:   {}", d.missing.join(", "));
        println!("Available: {}", d.available.join(", "));
    }

    Ok(())
}
