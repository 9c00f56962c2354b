//! Command-line interface for the SEC filing analyst
//!
//! # Usage
//!
//! ```bash
//! # Serve the HTTP API (reads SEC_API_KEY and OPENAI_API_KEY from .env)
//! filing-cli serve --port 8000
//!
//! # Print a report, then ask questions about it
//! filing-cli report AAPL --filing-type 10-K --interactive
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use filing_analyst::{AnalystConfig, Report, ReportOrchestrator, server};
use filing_utils::{LogFormat, init_tracing, load_dotenv};
use std::io::{self, BufRead, Write};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "filing-cli")]
#[command(about = "Agentic analysis of SEC filings", long_about = None)]
struct Args {
    /// Log output format (text or json)
    #[arg(long, env = "LOG_FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API
    Serve {
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: IpAddr,

        #[arg(long, env = "PORT", default_value_t = 8000)]
        port: u16,
    },

    /// Generate a report for a ticker's latest filing
    Report {
        ticker: String,

        /// 10-K, 10-Q or 8-K
        #[arg(short, long, default_value = "10-K")]
        filing_type: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Ask questions about the filing after the report
        #[arg(short, long)]
        interactive: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = load_dotenv();
    let args = Args::parse();

    init_tracing("info", args.log_format);
    if let Some(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let config = AnalystConfig::from_env().context("invalid configuration")?;
    let orchestrator = Arc::new(ReportOrchestrator::from_config(config)?);

    match args.command {
        Command::Serve { host, port } => {
            server::serve(orchestrator, SocketAddr::new(host, port)).await?;
        }
        Command::Report {
            ticker,
            filing_type,
            json,
            interactive,
        } => {
            let report = orchestrator.generate_report(&ticker, &filing_type).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }

            if interactive {
                run_repl(&orchestrator, &report.ticker).await?;
            }
        }
    }

    Ok(())
}

fn print_report(report: &Report) {
    println!("{} {}\n", report.ticker, report.filing_type);
    println!("Executive summary\n\n{}\n", report.executive_summary);

    println!("Risk factors\n");
    for risk in &report.risk_factors {
        println!("  - {risk}");
    }

    let kpis = &report.financial_kpis;
    println!("\nFinancial KPIs\n");
    println!("  Total revenue: {}", kpis.total_revenue);
    println!("  Net income:    {}", kpis.net_income);
    println!("  EPS:           {}", kpis.eps);
    println!();
}

async fn run_repl(orchestrator: &ReportOrchestrator, ticker: &str) -> anyhow::Result<()> {
    println!("Ask about the {ticker} filing (/exit to quit).\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{ticker}> ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                // EOF
                println!();
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let question = input.trim();
        if question.is_empty() {
            continue;
        }
        if matches!(question, "/exit" | "/quit") {
            break;
        }

        match orchestrator.answer(ticker, question).await {
            Ok(answer) => println!("{}\n", answer.trim()),
            Err(e) => eprintln!("Error: {e}\n"),
        }
    }

    Ok(())
}
