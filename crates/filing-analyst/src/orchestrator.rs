//! Report orchestration
//!
//! A report request flows through cache lookup, filing fetch, HTML to text,
//! a per-form branch of analyses, retrieval index build and cache store.
//! Identical concurrent requests share one computation.

use crate::agents::{KpiAnalyst, ModelClient, QaAnalyst, RiskAnalyst, SummaryAnalyst};
use crate::api::{FilingProvider, SecApiClient};
use crate::cache::Cache;
use crate::config::AnalystConfig;
use crate::error::{FilingError, Result};
use crate::filing::{FilingType, normalize_ticker, report_key};
use crate::index::RetrievalIndex;
use crate::prompts::Prompts;
use crate::report::{
    FinancialKpis, IndexSummary, RISK_SECTION_NOT_FOUND, RISKS_NOT_APPLICABLE, Report,
};
use crate::text::{RecursiveSplitter, SectionKind, extract_section, html_to_text};
use filing_llm::providers::OpenAIProvider;
use filing_llm::{EmbeddingProvider, LLMProvider};
use std::sync::Arc;
use tokio::task::{JoinHandle, spawn_blocking};
use tracing::{info, instrument};

/// Coordinates filing retrieval, analysis, indexing and caching
pub struct ReportOrchestrator {
    config: AnalystConfig,
    provider: Arc<dyn FilingProvider>,
    embedder: Arc<dyn EmbeddingProvider>,
    summary: SummaryAnalyst,
    risk: RiskAnalyst,
    kpi: KpiAnalyst,
    qa: QaAnalyst,
    reports: Cache<Report>,
    indexes: Cache<Arc<RetrievalIndex>>,
    splitter: RecursiveSplitter,
}

impl ReportOrchestrator {
    /// Create an orchestrator over explicit collaborators
    pub fn new(
        config: AnalystConfig,
        provider: Arc<dyn FilingProvider>,
        llm: Arc<dyn LLMProvider>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self> {
        config.validate()?;

        let client = ModelClient::new(llm, Arc::new(Prompts::new()?), &config);

        Ok(Self {
            summary: SummaryAnalyst::new(client.clone(), config.summary_char_limit),
            risk: RiskAnalyst::new(client.clone()),
            kpi: KpiAnalyst::new(client.clone()),
            qa: QaAnalyst::new(client),
            reports: Cache::in_memory("reports", config.report_cache),
            indexes: Cache::in_memory("indexes", config.index_cache),
            splitter: RecursiveSplitter::new(config.chunk_size, config.chunk_overlap),
            provider,
            embedder,
            config,
        })
    }

    /// Create an orchestrator backed by sec-api.io and OpenAI
    pub fn from_config(config: AnalystConfig) -> Result<Self> {
        let provider = Arc::new(SecApiClient::from_config(&config)?);
        let openai = Arc::new(OpenAIProvider::from_env()?);
        info!(model = %config.model, "Using OpenAI for completions and embeddings");
        Self::new(config, provider, openai.clone(), openai)
    }

    /// Configuration in use
    pub fn config(&self) -> &AnalystConfig {
        &self.config
    }

    /// Generate (or return the cached) report for a ticker's latest filing
    ///
    /// Inputs are validated before any cache lookup or network call.
    #[instrument(skip(self))]
    pub async fn generate_report(&self, ticker: &str, filing_type: &str) -> Result<Report> {
        let ticker = normalize_ticker(ticker)?;
        let filing_type: FilingType = filing_type.parse()?;
        let key = report_key(&ticker, filing_type);

        let report = self
            .reports
            .get_or_compute(&key, || self.build_report(&ticker, filing_type))
            .await?;

        self.ensure_index(&ticker, filing_type).await?;
        Ok(report)
    }

    /// Fetch a filing and build its retrieval index without analysing it
    #[instrument(skip(self))]
    pub async fn index_filing(&self, ticker: &str, filing_type: &str) -> Result<IndexSummary> {
        let ticker = normalize_ticker(ticker)?;
        let filing_type: FilingType = filing_type.parse()?;

        let text = self.fetch_text(&ticker, filing_type).await?;
        let index = self.build_index(&ticker, text).await?;

        Ok(IndexSummary {
            ticker,
            filing_type,
            chunks: index.len(),
        })
    }

    /// Answer a question from the ticker's retrieval index
    #[instrument(skip(self))]
    pub async fn answer(&self, ticker: &str, question: &str) -> Result<String> {
        let ticker = normalize_ticker(ticker)?;
        let question = question.trim();
        if question.is_empty() {
            return Err(FilingError::InvalidInput(
                "Question must not be empty.".to_string(),
            ));
        }

        let index = self.indexes.get(&ticker).await.ok_or_else(|| {
            FilingError::NotFound(format!(
                "Report for {ticker} has not been generated yet. Please generate the report first."
            ))
        })?;

        let query = self
            .embedder
            .embed(&[question.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                FilingError::Other("Embedding provider returned no vector for the question".to_string())
            })?;

        let hits = index.search(&query, self.config.retrieval_top_k);
        let context: Vec<&str> = hits.iter().map(|hit| hit.text).collect();
        self.qa.answer(question, &context).await
    }

    #[instrument(skip(self))]
    async fn build_report(&self, ticker: &str, filing_type: FilingType) -> Result<Report> {
        let text = self.fetch_text(ticker, filing_type).await?;

        let (executive_summary, risk_factors, financial_kpis) = if filing_type.is_periodic() {
            self.analyze_periodic(ticker, filing_type, Arc::clone(&text)).await?
        } else {
            let summary = self.summary.summarize(ticker, filing_type, &text).await?;
            (
                summary,
                vec![RISKS_NOT_APPLICABLE.to_string()],
                FinancialKpis::unavailable(),
            )
        };

        self.build_index(ticker, text).await?;
        info!("Report generated for {} {}", ticker, filing_type);

        Ok(Report {
            ticker: ticker.to_string(),
            filing_type,
            executive_summary,
            risk_factors,
            financial_kpis,
        })
    }

    /// Summary, risks and KPIs as three independent tasks
    async fn analyze_periodic(
        &self,
        ticker: &str,
        filing_type: FilingType,
        text: Arc<str>,
    ) -> Result<(String, Vec<String>, FinancialKpis)> {
        let sections_text = Arc::clone(&text);
        let (risk_section, financial_section) = spawn_blocking(move || {
            (
                extract_section(&sections_text, SectionKind::RiskFactors).map(str::to_string),
                extract_section(&sections_text, SectionKind::FinancialStatements)
                    .map(str::to_string),
            )
        })
        .await?;

        let summary = {
            let analyst = self.summary.clone();
            let ticker = ticker.to_string();
            tokio::spawn(async move { analyst.summarize(&ticker, filing_type, &text).await })
        };

        let risks = {
            let analyst = self.risk.clone();
            tokio::spawn(async move {
                match risk_section {
                    Some(section) => analyst.extract(&section).await,
                    None => Ok(vec![RISK_SECTION_NOT_FOUND.to_string()]),
                }
            })
        };

        let kpis = {
            let analyst = self.kpi.clone();
            tokio::spawn(async move {
                match financial_section {
                    Some(section) => analyst.extract(&section).await,
                    None => Ok(FinancialKpis::unavailable()),
                }
            })
        };

        tokio::try_join!(joined(summary), joined(risks), joined(kpis))
    }

    async fn fetch_text(&self, ticker: &str, filing_type: FilingType) -> Result<Arc<str>> {
        let html = self.provider.fetch_filing_html(ticker, filing_type).await?;
        let text = spawn_blocking(move || html_to_text(&html)).await?;
        Ok(Arc::from(text))
    }

    /// Rebuild the ticker's index when it was evicted while its report stayed cached
    async fn ensure_index(&self, ticker: &str, filing_type: FilingType) -> Result<()> {
        self.indexes
            .get_or_compute(ticker, || async {
                info!("Rebuilding evicted index for {} {}", ticker, filing_type);
                let text = self.fetch_text(ticker, filing_type).await?;
                self.index_text(ticker, text).await
            })
            .await?;
        Ok(())
    }

    /// Chunk and embed the filing text, replacing the ticker's index
    async fn build_index(&self, ticker: &str, text: Arc<str>) -> Result<Arc<RetrievalIndex>> {
        let index = self.index_text(ticker, text).await?;
        self.indexes.insert(ticker, Arc::clone(&index)).await;
        Ok(index)
    }

    async fn index_text(&self, ticker: &str, text: Arc<str>) -> Result<Arc<RetrievalIndex>> {
        let splitter = self.splitter.clone();
        let chunks = spawn_blocking(move || splitter.split_text(&text)).await?;

        Ok(Arc::new(
            RetrievalIndex::build(ticker, chunks, self.embedder.as_ref()).await?,
        ))
    }
}

async fn joined<T>(handle: JoinHandle<Result<T>>) -> Result<T> {
    handle.await?
}
