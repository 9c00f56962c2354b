//! Risk factor analyst

use super::{ModelClient, strip_code_fence};
use crate::error::Result;
use crate::prompts::{RISK_SYSTEM, RISK_USER};
use serde_json::{Value, json};
use tracing::{instrument, warn};

/// Returned without a model call when the risk section is blank
pub const EMPTY_SECTION: &str = "Risk section was empty or not found.";

/// Returned when the model reply is valid data but not a list
pub const UNPARSEABLE: &str = "Could not parse risk factors from the provided section.";

/// Lines at or below this many characters are dropped by the line fallback
const MIN_LINE_CHARS: usize = 10;

/// Lists the most significant risks in a Risk Factors section
#[derive(Clone)]
pub struct RiskAnalyst {
    client: ModelClient,
}

impl RiskAnalyst {
    pub fn new(client: ModelClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self, section), fields(chars = section.len()))]
    pub async fn extract(&self, section: &str) -> Result<Vec<String>> {
        if section.trim().is_empty() {
            return Ok(vec![EMPTY_SECTION.to_string()]);
        }

        let reply = self
            .client
            .ask(RISK_SYSTEM, RISK_USER, json!({ "section": section }), None)
            .await?;
        Ok(parse_risks(&reply))
    }
}

/// Turn a model reply into a list of risks
///
/// Accepts a JSON array, a Python-style single-quoted list, or plain
/// bulleted lines.
pub fn parse_risks(reply: &str) -> Vec<String> {
    let body = strip_code_fence(reply);

    let parsed = serde_json::from_str::<Value>(body)
        .ok()
        .or_else(|| python_list_to_json(body).and_then(|json| serde_json::from_str(&json).ok()));

    let risks = match parsed {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Some(_) => {
            warn!("Risk reply parsed but was not a list");
            vec![UNPARSEABLE.to_string()]
        }
        None => body
            .lines()
            .filter(|line| !line.trim().is_empty() && line.chars().count() > MIN_LINE_CHARS)
            .map(|line| line.trim_matches(|c| matches!(c, '-' | '*' | ' ')).trim().to_string())
            .filter(|line| !line.is_empty())
            .collect(),
    };

    if risks.is_empty() {
        return vec![UNPARSEABLE.to_string()];
    }
    risks
}

/// Rewrite a Python list literal with quoted strings as JSON
fn python_list_to_json(body: &str) -> Option<String> {
    if !body.starts_with('[') {
        return None;
    }

    let mut out = String::with_capacity(body.len());
    let mut quote: Option<char> = None;
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (None, '\'' | '"') => {
                quote = Some(c);
                out.push('"');
            }
            (Some(_), '\\') => match chars.next()? {
                '\'' => out.push('\''),
                escaped => {
                    out.push('\\');
                    out.push(escaped);
                }
            },
            (Some(q), c) if c == q => {
                quote = None;
                out.push('"');
            }
            (Some(_), '"') => out.push_str("\\\""),
            _ => out.push(c),
        }
    }

    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::ScriptedLlm;
    use crate::config::AnalystConfig;
    use crate::prompts::Prompts;
    use std::sync::Arc;

    #[test]
    fn test_json_list() {
        assert_eq!(
            parse_risks(r#"["Supply chain risk.", "Currency risk."]"#),
            vec!["Supply chain risk.", "Currency risk."]
        );
    }

    #[test]
    fn test_fenced_python_list() {
        let reply = "```python\n['Competition is intense.', \"Apple's suppliers are concentrated.\"]\n```";
        assert_eq!(
            parse_risks(reply),
            vec!["Competition is intense.", "Apple's suppliers are concentrated."]
        );

        let reply = r#"['Customers\'s demand may fall.', 'Say \"no\" to debt.']"#;
        assert_eq!(
            parse_risks(reply),
            vec!["Customers's demand may fall.", "Say \"no\" to debt."]
        );
    }

    #[test]
    fn test_non_list_value() {
        assert_eq!(parse_risks(r#"{"risks": []}"#), vec![UNPARSEABLE]);
        assert_eq!(parse_risks("42"), vec![UNPARSEABLE]);
    }

    #[test]
    fn test_line_fallback() {
        let reply = "Here are the risks:\n- Intense competition in all markets.\n* Short\n\n  * Dependence on third-party suppliers.";
        assert_eq!(
            parse_risks(reply),
            vec![
                "Here are the risks:",
                "Intense competition in all markets.",
                "Dependence on third-party suppliers."
            ]
        );
    }

    #[test]
    fn test_nothing_usable() {
        assert_eq!(parse_risks("n/a"), vec![UNPARSEABLE]);
        assert_eq!(parse_risks(""), vec![UNPARSEABLE]);
    }

    #[tokio::test]
    async fn test_empty_section_skips_model() {
        let llm = Arc::new(ScriptedLlm::replying("[]"));
        let config = AnalystConfig::default();
        let client = ModelClient::new(llm.clone(), Arc::new(Prompts::new().unwrap()), &config);
        let analyst = RiskAnalyst::new(client);

        assert_eq!(analyst.extract("  \n").await.unwrap(), vec![EMPTY_SECTION]);
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let llm = Arc::new(ScriptedLlm::new(|_| None));
        let config = AnalystConfig::default();
        let client = ModelClient::new(llm, Arc::new(Prompts::new().unwrap()), &config);
        let analyst = RiskAnalyst::new(client);

        assert!(analyst.extract("Item 1A. Risk Factors ...").await.is_err());
    }
}
