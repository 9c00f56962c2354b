//! Heading-based section extraction over filing plain text
//!
//! Filing text has no reliable structure once HTML is stripped, so sections
//! are located heuristically: a start heading pattern, then the nearest end
//! heading after it, capped by a per-rule maximum window. Financial
//! statements try a ladder of rules, most specific first.

use regex::Regex;
use std::sync::LazyLock;

static RISK_START: LazyLock<Regex> = LazyLock::new(|| {
    // "lA" covers OCR output that reads the digit 1 as a lowercase L.
    Regex::new(r"(?i)(?:ITEM|Item)\s+(?:1A|lA)\s*\.?\s*Risk\s*Factors").expect("valid regex")
});

static RISK_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:ITEM|Item)\s+(?:1B|lB|2|3)\s*\.?").expect("valid regex")
});

static ITEM8_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Item\s+8\s*\.?\s*Financial\s+Statements\s+and\s+Supplementary\s+Data")
        .expect("valid regex")
});

static OPERATIONS_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Consolidated\s+Statements\s+of\s+Operations").expect("valid regex")
});

static INCOME_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Statements\s+of\s+Income").expect("valid regex"));

static NOTES_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Notes\s+to\s+(?:the\s+)?Consolidated\s+Financial\s+Statements")
        .expect("valid regex")
});

/// Named document sub-range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// Item 1A, Risk Factors
    RiskFactors,
    /// Primary financial statements (income statement first)
    FinancialStatements,
}

impl SectionKind {
    fn rules(self) -> &'static [SectionRule] {
        match self {
            SectionKind::RiskFactors => &RISK_RULES,
            SectionKind::FinancialStatements => &FINANCIAL_RULES,
        }
    }

    /// Largest span, in characters, any rule of this kind can produce
    pub fn max_chars(self) -> usize {
        self.rules().iter().map(|r| r.max_chars).max().unwrap_or(0)
    }
}

struct SectionRule {
    start: &'static LazyLock<Regex>,
    end: &'static LazyLock<Regex>,
    max_chars: usize,
}

static RISK_RULES: [SectionRule; 1] = [SectionRule {
    start: &RISK_START,
    end: &RISK_END,
    max_chars: 80_000,
}];

static FINANCIAL_RULES: [SectionRule; 3] = [
    SectionRule {
        start: &ITEM8_START,
        end: &NOTES_END,
        max_chars: 60_000,
    },
    SectionRule {
        start: &OPERATIONS_START,
        end: &NOTES_END,
        max_chars: 40_000,
    },
    SectionRule {
        start: &INCOME_START,
        end: &NOTES_END,
        max_chars: 30_000,
    },
];

impl SectionRule {
    fn locate(&self, text: &str) -> Option<SectionSpan> {
        let start = self.start.find(text)?;
        let limit = advance_chars(text, start.start(), self.max_chars).max(start.end());

        let end = self
            .end
            .find_at(text, start.end())
            .map(|m| m.start())
            .filter(|&end| end <= limit)
            .unwrap_or(limit);

        Some(SectionSpan {
            start: start.start(),
            end,
        })
    }
}

/// Byte range of a located section; both ends lie on char boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpan {
    pub start: usize,
    pub end: usize,
}

impl SectionSpan {
    /// Length in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false for located spans
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Borrow the span from the text it was located in
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Byte offset `max_chars` characters after `from`, or the text length
fn advance_chars(text: &str, from: usize, max_chars: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(max_chars)
        .map_or(text.len(), |(offset, _)| from + offset)
}

/// Locate a section, trying each rule of the kind in order
pub fn locate_section(text: &str, kind: SectionKind) -> Option<SectionSpan> {
    kind.rules().iter().find_map(|rule| rule.locate(text))
}

/// Extract a section's text, `None` when no start heading is present
pub fn extract_section(text: &str, kind: SectionKind) -> Option<&str> {
    locate_section(text, kind).map(|span| span.slice(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_section_between_headings() {
        let text = "...blah Item 1A. Risk Factors\nWe face risks... Item 1B. Unresolved Staff Comments...";
        assert_eq!(
            extract_section(text, SectionKind::RiskFactors),
            Some("Item 1A. Risk Factors\nWe face risks... ")
        );
    }

    #[test]
    fn test_risk_section_alternate_end_headings() {
        let text = "ITEM 1A RISK FACTORS\nCompetition is intense.\nITEM 2. PROPERTIES";
        assert_eq!(
            extract_section(text, SectionKind::RiskFactors),
            Some("ITEM 1A RISK FACTORS\nCompetition is intense.\n")
        );

        let text = "Item 1A.Risk Factors Supply chain. Item 3. Legal Proceedings";
        assert_eq!(
            extract_section(text, SectionKind::RiskFactors),
            Some("Item 1A.Risk Factors Supply chain. ")
        );
    }

    #[test]
    fn test_risk_section_ocr_heading() {
        let text = "Item lA. Risk Factors\nMacro conditions.\nItem lB. Unresolved";
        assert_eq!(
            extract_section(text, SectionKind::RiskFactors),
            Some("Item lA. Risk Factors\nMacro conditions.\n")
        );
    }

    #[test]
    fn test_no_start_heading() {
        let text = "Item 1. Business\nWe sell things.\nItem 2. Properties";
        assert_eq!(extract_section(text, SectionKind::RiskFactors), None);
        assert_eq!(extract_section(text, SectionKind::FinancialStatements), None);
        assert_eq!(extract_section("", SectionKind::RiskFactors), None);
    }

    #[test]
    fn test_missing_end_is_bounded_by_window() {
        let text = format!("Item 1A. Risk Factors\n{}", "x".repeat(100_000));
        let section = extract_section(&text, SectionKind::RiskFactors).unwrap();
        assert_eq!(section.chars().count(), 80_000);
        assert!(section.starts_with("Item 1A. Risk Factors"));
    }

    #[test]
    fn test_missing_end_is_bounded_by_document() {
        let text = "Intro. Item 1A. Risk Factors\nShort section.";
        assert_eq!(
            extract_section(text, SectionKind::RiskFactors),
            Some("Item 1A. Risk Factors\nShort section.")
        );
    }

    #[test]
    fn test_far_end_heading_is_clamped() {
        let text = format!(
            "Item 1A. Risk Factors\n{}Item 1B. Unresolved Staff Comments",
            "y".repeat(90_000)
        );
        let span = locate_section(&text, SectionKind::RiskFactors).unwrap();
        assert_eq!(span.start, 0);
        assert_eq!(span.slice(&text).chars().count(), 80_000);
    }

    #[test]
    fn test_item8_without_notes_is_bounded() {
        let text = format!(
            "Item 8. Financial Statements and Supplementary Data\n{}",
            "z".repeat(70_000)
        );
        let section = extract_section(&text, SectionKind::FinancialStatements).unwrap();
        assert!(section.starts_with("Item 8. Financial Statements"));
        assert_eq!(section.chars().count(), 60_000);
    }

    #[test]
    fn test_operations_without_notes_is_bounded() {
        let text = format!("CONSOLIDATED STATEMENTS OF OPERATIONS\n{}", "z".repeat(50_000));
        let section = extract_section(&text, SectionKind::FinancialStatements).unwrap();
        assert!(section.starts_with("CONSOLIDATED STATEMENTS OF OPERATIONS"));
        assert_eq!(section.chars().count(), 40_000);
    }

    #[test]
    fn test_window_respects_char_boundaries() {
        let text = format!("Statements of Income\n{}", "é".repeat(40_000));
        let section = extract_section(&text, SectionKind::FinancialStatements).unwrap();
        assert_eq!(section.chars().count(), 30_000);
    }

    #[test]
    fn test_financial_ladder_prefers_item8() {
        let text = "CONSOLIDATED STATEMENTS OF OPERATIONS (see below)\n\
                    Item 8. Financial Statements and Supplementary Data\n\
                    Total net sales 391,035\n\
                    Notes to Consolidated Financial Statements\nNote 1";
        assert_eq!(
            extract_section(text, SectionKind::FinancialStatements),
            Some("Item 8. Financial Statements and Supplementary Data\nTotal net sales 391,035\n")
        );
    }

    #[test]
    fn test_financial_ladder_falls_back() {
        let text = "Index\nCONSOLIDATED STATEMENTS OF OPERATIONS\nNet income 93,736\n\
                    Notes to the Consolidated Financial Statements";
        assert_eq!(
            extract_section(text, SectionKind::FinancialStatements),
            Some("CONSOLIDATED STATEMENTS OF OPERATIONS\nNet income 93,736\n")
        );

        let text = format!("Condensed Statements of Income\n{}", "1".repeat(50_000));
        let section = extract_section(&text, SectionKind::FinancialStatements).unwrap();
        assert!(section.starts_with("Statements of Income"));
        assert_eq!(section.chars().count(), 30_000);
    }

    #[test]
    fn test_max_chars_per_kind() {
        assert_eq!(SectionKind::RiskFactors.max_chars(), 80_000);
        assert_eq!(SectionKind::FinancialStatements.max_chars(), 60_000);
    }
}
