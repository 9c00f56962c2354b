//! Executive summary analyst

use super::ModelClient;
use crate::error::Result;
use crate::filing::FilingType;
use crate::prompts::{SUMMARY_SYSTEM, SUMMARY_USER};
use serde_json::json;
use tracing::instrument;

/// Summarizes a whole filing
#[derive(Clone)]
pub struct SummaryAnalyst {
    client: ModelClient,
    char_limit: usize,
}

impl SummaryAnalyst {
    pub fn new(client: ModelClient, char_limit: usize) -> Self {
        Self { client, char_limit }
    }

    /// Summarize the leading `char_limit` characters of the filing text
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn summarize(
        &self,
        ticker: &str,
        filing_type: FilingType,
        text: &str,
    ) -> Result<String> {
        let vars = json!({
            "ticker": ticker,
            "filing_type": filing_type.as_str(),
            "text": truncate_chars(text, self.char_limit),
        });
        let summary = self.client.ask(SUMMARY_SYSTEM, SUMMARY_USER, vars, None).await?;
        Ok(summary.trim().to_string())
    }
}

/// Longest prefix of at most `max_chars` characters
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    text.char_indices().nth(max_chars).map_or(text, |(end, _)| &text[..end])
}
