//! Basic filing report example
//!
//! Generates a report for a ticker's latest filing, then asks one question
//! about it.
//!
//! To run this example:
//! ```bash
//! export SEC_API_KEY=your_key_here
//! export OPENAI_API_KEY=your_key_here
//!
//! cargo run --example basic_report AAPL 10-Q
//! ```

use filing_analyst::{AnalystConfig, ReportOrchestrator};
use filing_utils::{LogFormat, init_tracing, load_dotenv};
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    init_tracing("info", LogFormat::Pretty);

    let args: Vec<String> = env::args().collect();
    let ticker = args.get(1).map_or("AAPL", String::as_str);
    let filing_type = args.get(2).map_or("10-K", String::as_str);

    println!("=== SEC Filing Analysis ===\n");
    println!("Analyzing: {ticker} {filing_type}\n");

    let config = AnalystConfig::from_env()?;
    println!("Configuration:");
    println!("  - Model: {}", config.model);
    println!("  - Chunking: {} / {}", config.chunk_size, config.chunk_overlap);
    println!("  - Report cache: {:?}\n", config.report_cache);

    let orchestrator = ReportOrchestrator::from_config(config)?;

    println!("=== 1. Report ===");
    let report = orchestrator.generate_report(ticker, filing_type).await?;
    println!("{}\n", serde_json::to_string_pretty(&report)?);

    println!("=== 2. Question ===");
    let answer = orchestrator
        .answer(ticker, "What were the main drivers of revenue?")
        .await?;
    println!("{answer}\n");

    Ok(())
}
