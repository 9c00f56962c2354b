//! SEC filing analysis
//!
//! This crate turns a company's latest 10-K, 10-Q or 8-K into a structured
//! report and answers follow-up questions about it. It includes:
//!
//! - Filing retrieval from sec-api.io (query + filing reader), rate limited
//! - HTML to text conversion and heading-based section extraction
//! - Model-backed analysts for the executive summary, risk factors and
//!   headline financial KPIs
//! - Per-ticker retrieval indexes (recursive chunking + embeddings) for Q&A
//! - Report and index caches with single-flight computation
//! - An axum HTTP API compatible with the existing web frontend
//!
//! # Architecture
//!
//! [`ReportOrchestrator`] owns the caches and coordinates the pipeline:
//! - [`api::FilingProvider`]: fetches filing HTML
//! - [`text`]: plain text, sections and chunks
//! - [`agents`]: `SummaryAnalyst`, `RiskAnalyst`, `KpiAnalyst`, `QaAnalyst`
//! - [`index::RetrievalIndex`]: similarity search over filing chunks
//!
//! # Example
//!
//! ```rust,ignore
//! use filing_analyst::{AnalystConfig, ReportOrchestrator};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let orchestrator = ReportOrchestrator::from_config(AnalystConfig::from_env()?)?;
//!
//!     let report = orchestrator.generate_report("AAPL", "10-K").await?;
//!     println!("{}", report.executive_summary);
//!
//!     let answer = orchestrator.answer("AAPL", "How did services revenue change?").await?;
//!     println!("{answer}");
//!
//!     Ok(())
//! }
//! ```

pub mod agents;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod filing;
pub mod index;
pub mod orchestrator;
pub mod prompts;
pub mod report;
pub mod server;
pub mod text;

// Re-export main types for convenience
pub use cache::{Cache, CachePolicy, CacheStore, MemoryStore};
pub use config::AnalystConfig;
pub use error::{FilingError, Result};
pub use filing::FilingType;
pub use orchestrator::ReportOrchestrator;
pub use report::{FinancialKpis, IndexSummary, Report};
