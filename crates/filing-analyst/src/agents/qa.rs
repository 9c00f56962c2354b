//! Retrieval-grounded question answering

use super::ModelClient;
use crate::error::Result;
use crate::prompts::{QA_SYSTEM, QA_USER};
use serde_json::json;
use tracing::instrument;

/// Answers questions from retrieved filing chunks
#[derive(Clone)]
pub struct QaAnalyst {
    client: ModelClient,
}

impl QaAnalyst {
    pub fn new(client: ModelClient) -> Self {
        Self { client }
    }

    /// Answer using only the given context chunks; the reply is returned as is
    #[instrument(skip(self, context), fields(chunks = context.len()))]
    pub async fn answer(&self, question: &str, context: &[&str]) -> Result<String> {
        self.client
            .ask(
                QA_SYSTEM,
                QA_USER,
                json!({ "context": context, "question": question }),
                None,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::ScriptedLlm;
    use crate::config::AnalystConfig;
    use crate::prompts::Prompts;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_answer_uses_context() {
        let llm = Arc::new(ScriptedLlm::replying(" I don't know. "));
        let config = AnalystConfig::default();
        let client = ModelClient::new(llm.clone(), Arc::new(Prompts::new().unwrap()), &config);
        let analyst = QaAnalyst::new(client);

        let answer = analyst
            .answer("Who is the CEO?", &["Net sales rose.", "Services grew."])
            .await
            .unwrap();
        assert_eq!(answer, " I don't know. ");

        let requests = llm.requests.lock().unwrap();
        let user = requests[0].messages[0].text();
        assert!(user.contains("Net sales rose.\n\nServices grew."));
        assert!(user.contains("Question: Who is the CEO?"));
    }
}
