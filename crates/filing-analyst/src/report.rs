//! Report data model

use crate::filing::FilingType;
use serde::{Deserialize, Serialize};

/// Sentinel for a KPI the model could not find
pub const NOT_AVAILABLE: &str = "N/A";

/// Risk list used when a periodic filing has no risk factors heading
pub const RISK_SECTION_NOT_FOUND: &str = "'Risk Factors' section not found.";

/// Risk list used for 8-K filings
pub const RISKS_NOT_APPLICABLE: &str = "Not applicable for 8-K filings.";

/// Generated analysis of one filing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub ticker: String,
    pub filing_type: FilingType,
    pub executive_summary: String,
    pub risk_factors: Vec<String>,
    #[serde(rename = "financialKPIs")]
    pub financial_kpis: FinancialKpis,
}

/// Headline figures pulled from the financial statements
///
/// Values are kept as the model reported them ("$391.0 billion",
/// "6.11") or [`NOT_AVAILABLE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialKpis {
    pub total_revenue: String,
    pub net_income: String,
    pub eps: String,
}

impl FinancialKpis {
    /// All values set to [`NOT_AVAILABLE`]
    pub fn unavailable() -> Self {
        Self {
            total_revenue: NOT_AVAILABLE.to_string(),
            net_income: NOT_AVAILABLE.to_string(),
            eps: NOT_AVAILABLE.to_string(),
        }
    }

    /// Whether no value was found
    pub fn is_unavailable(&self) -> bool {
        [&self.total_revenue, &self.net_income, &self.eps]
            .iter()
            .all(|v| v.as_str() == NOT_AVAILABLE)
    }
}

impl Default for FinancialKpis {
    fn default() -> Self {
        Self::unavailable()
    }
}

/// Result of indexing a filing without generating a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSummary {
    pub ticker: String,
    pub filing_type: FilingType,
    pub chunks: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_wire_format() {
        let report = Report {
            ticker: "AAPL".to_string(),
            filing_type: FilingType::Form8K,
            executive_summary: "Apple announced results.".to_string(),
            risk_factors: vec![RISKS_NOT_APPLICABLE.to_string()],
            financial_kpis: FinancialKpis::unavailable(),
        };

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "ticker": "AAPL",
                "filingType": "8-K",
                "executiveSummary": "Apple announced results.",
                "riskFactors": ["Not applicable for 8-K filings."],
                "financialKPIs": {"total_revenue": "N/A", "net_income": "N/A", "eps": "N/A"}
            })
        );
    }

    #[test]
    fn test_unavailable_kpis() {
        assert!(FinancialKpis::default().is_unavailable());
        let kpis = FinancialKpis {
            eps: "6.11".to_string(),
            ..FinancialKpis::unavailable()
        };
        assert!(!kpis.is_unavailable());
    }
}
