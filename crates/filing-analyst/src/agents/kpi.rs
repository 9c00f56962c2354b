//! Financial KPI analyst

use super::{ModelClient, strip_code_fence};
use crate::error::Result;
use crate::prompts::{KPI_SYSTEM, KPI_USER};
use crate::report::{FinancialKpis, NOT_AVAILABLE};
use filing_llm::ResponseFormat;
use serde_json::{Map, Value, json};
use tracing::{instrument, warn};

/// Pulls headline figures out of the financial statements
#[derive(Clone)]
pub struct KpiAnalyst {
    client: ModelClient,
}

impl KpiAnalyst {
    pub fn new(client: ModelClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self, section), fields(chars = section.len()))]
    pub async fn extract(&self, section: &str) -> Result<FinancialKpis> {
        let reply = self
            .client
            .ask(
                KPI_SYSTEM,
                KPI_USER,
                json!({ "section": section }),
                Some(ResponseFormat::JsonObject),
            )
            .await?;
        Ok(parse_kpis(&reply))
    }
}

/// Read KPI values from a model reply, defaulting every gap to `N/A`
pub fn parse_kpis(reply: &str) -> FinancialKpis {
    let Some(object) = parse_object(reply) else {
        warn!("KPI reply was not a JSON object");
        return FinancialKpis::unavailable();
    };

    FinancialKpis {
        total_revenue: kpi_value(&object, "total_revenue"),
        net_income: kpi_value(&object, "net_income"),
        eps: kpi_value(&object, "eps"),
    }
}

fn parse_object(reply: &str) -> Option<Map<String, Value>> {
    let body = strip_code_fence(reply);
    if let Ok(Value::Object(object)) = serde_json::from_str(body) {
        return Some(object);
    }

    // Prose around the object
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str(&body[start..=end]) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

fn kpi_value(object: &Map<String, Value>, key: &str) -> String {
    match object.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::ScriptedLlm;
    use crate::config::AnalystConfig;
    use crate::prompts::Prompts;
    use std::sync::Arc;

    #[test]
    fn test_strings_and_numbers() {
        let kpis = parse_kpis(
            r#"{"total_revenue": "$391,035 million", "net_income": 93736, "eps": 6.11}"#,
        );
        assert_eq!(kpis.total_revenue, "$391,035 million");
        assert_eq!(kpis.net_income, "93736");
        assert_eq!(kpis.eps, "6.11");
    }

    #[test]
    fn test_missing_and_null_keys() {
        let kpis = parse_kpis(r#"{"total_revenue": "N/A", "net_income": null}"#);
        assert!(kpis.is_unavailable());

        let kpis = parse_kpis(r#"{"eps": "", "net_income": ["x"], "total_revenue": "10"}"#);
        assert_eq!(kpis.eps, NOT_AVAILABLE);
        assert_eq!(kpis.net_income, NOT_AVAILABLE);
        assert_eq!(kpis.total_revenue, "10");
    }

    #[test]
    fn test_fenced_and_wrapped_objects() {
        let kpis = parse_kpis("```json\n{\"eps\": \"1.52\"}\n```");
        assert_eq!(kpis.eps, "1.52");

        let kpis = parse_kpis("Here you go: {\"net_income\": \"$5B\"} Hope this helps.");
        assert_eq!(kpis.net_income, "$5B");
    }

    #[test]
    fn test_unparseable_reply() {
        assert!(parse_kpis("I could not find the statements.").is_unavailable());
        assert!(parse_kpis("[1, 2, 3]").is_unavailable());
        assert!(parse_kpis("} {").is_unavailable());
    }

    #[tokio::test]
    async fn test_requests_json_mode() {
        let llm = Arc::new(ScriptedLlm::replying(r#"{"eps": 2.5}"#));
        let config = AnalystConfig::default();
        let client = ModelClient::new(llm.clone(), Arc::new(Prompts::new().unwrap()), &config);
        let analyst = KpiAnalyst::new(client);

        let kpis = analyst.extract("Net income ...").await.unwrap();
        assert_eq!(kpis.eps, "2.5");

        let requests = llm.requests.lock().unwrap();
        assert_eq!(requests[0].response_format, Some(ResponseFormat::JsonObject));
    }
}
