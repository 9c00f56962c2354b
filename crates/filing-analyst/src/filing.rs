//! Filing identity: form types, ticker normalization and cache keys

use crate::error::{FilingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// SEC form types the analyst can process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilingType {
    /// Annual report
    #[serde(rename = "10-K")]
    Form10K,
    /// Quarterly report
    #[serde(rename = "10-Q")]
    Form10Q,
    /// Current report (material events)
    #[serde(rename = "8-K")]
    Form8K,
}

impl FilingType {
    /// All supported form types
    pub const ALL: [FilingType; 3] = [FilingType::Form10K, FilingType::Form10Q, FilingType::Form8K];

    /// Wire form of the type ("10-K", "10-Q", "8-K")
    pub fn as_str(&self) -> &'static str {
        match self {
            FilingType::Form10K => "10-K",
            FilingType::Form10Q => "10-Q",
            FilingType::Form8K => "8-K",
        }
    }

    /// Periodic reports get risk and KPI analysis in addition to the summary
    pub fn is_periodic(&self) -> bool {
        matches!(self, FilingType::Form10K | FilingType::Form10Q)
    }
}

impl fmt::Display for FilingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilingType {
    type Err = FilingError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        FilingType::ALL
            .into_iter()
            .find(|ft| ft.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FilingError::UnsupportedFilingType(wanted.to_string()))
    }
}

/// Trim and uppercase a ticker, rejecting blanks
pub fn normalize_ticker(raw: &str) -> Result<String> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(FilingError::InvalidInput("Ticker must not be empty.".to_string()));
    }
    Ok(ticker)
}

/// Report cache key: `{TICKER}-{filing_type}`
pub fn report_key(ticker: &str, filing_type: FilingType) -> String {
    format!("{ticker}-{filing_type}")
}
