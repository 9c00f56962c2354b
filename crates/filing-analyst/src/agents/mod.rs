//! Filing analysts
//!
//! Each analyst renders its prompts, calls the chat model once and turns
//! the reply into report data. Malformed replies are recovered locally.

pub mod kpi;
pub mod qa;
pub mod risk;
pub mod summary;

pub use kpi::KpiAnalyst;
pub use qa::QaAnalyst;
pub use risk::RiskAnalyst;
pub use summary::SummaryAnalyst;

use crate::config::AnalystConfig;
use crate::error::Result;
use crate::prompts::Prompts;
use filing_llm::{CompletionRequest, LLMProvider, Message, ResponseFormat};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Chat model plus the prompt registry shared by all analysts
#[derive(Clone)]
pub struct ModelClient {
    llm: Arc<dyn LLMProvider>,
    prompts: Arc<Prompts>,
    model: String,
    temperature: f32,
    max_tokens: usize,
}

impl ModelClient {
    /// Create a client using the model settings from configuration
    pub fn new(llm: Arc<dyn LLMProvider>, prompts: Arc<Prompts>, config: &AnalystConfig) -> Self {
        Self {
            llm,
            prompts,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Render a system/user template pair and return the model's text
    pub async fn ask<S: Serialize>(
        &self,
        system: &str,
        user: &str,
        vars: S,
        format: Option<ResponseFormat>,
    ) -> Result<String> {
        let system_prompt = self.prompts.render(system, serde_json::json!({}))?;
        let user_prompt = self.prompts.render(user, vars)?;

        let mut builder = CompletionRequest::builder(&self.model)
            .system(system_prompt)
            .add_message(Message::user(user_prompt))
            .max_tokens(self.max_tokens)
            .temperature(self.temperature);
        if let Some(format) = format {
            builder = builder.response_format(format);
        }

        let response = self.llm.complete(builder.build()).await?;
        debug!(
            provider = self.llm.name(),
            template = system,
            tokens = response.usage.total(),
            "Model call completed"
        );
        Ok(response.into_text())
    }

    /// Model name used for every call
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Remove a surrounding markdown code fence, with or without a language tag
pub(crate) fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(newline) if rest[..newline].chars().all(char::is_alphanumeric) => &rest[newline + 1..],
        _ => rest,
    };
    body.trim_end().trim_end_matches("```").trim()
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use filing_llm::{
        CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, StopReason,
        TokenUsage,
    };
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Responder = Box<dyn Fn(&CompletionRequest) -> Option<String> + Send + Sync>;

    /// Chat model double answering from a closure and recording requests
    pub(crate) struct ScriptedLlm {
        responder: Responder,
        pub calls: AtomicUsize,
        pub requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedLlm {
        pub(crate) fn new(
            responder: impl Fn(&CompletionRequest) -> Option<String> + Send + Sync + 'static,
        ) -> Self {
            Self {
                responder: Box::new(responder),
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Always reply with the same text
        pub(crate) fn replying(text: &str) -> Self {
            let text = text.to_string();
            Self::new(move |_| Some(text.clone()))
        }

        /// Reply by system prompt: summary, risk, KPI and Q&A analysts
        pub(crate) fn analysts() -> Self {
            Self::new(|request| {
                let system = request.system.as_deref().unwrap_or_default();
                let reply = if system.contains("executive summary") {
                    "Revenue grew while margins held steady."
                } else if system.contains("risk analysis") {
                    r#"["Supply chain concentration.", "Regulatory scrutiny."]"#
                } else if system.contains("financial data extraction") {
                    r#"{"total_revenue": "$391.0 billion", "net_income": "$93.7 billion", "eps": 6.11}"#
                } else {
                    "Revenue was $391.0 billion."
                };
                Some(reply.to_string())
            })
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedLlm {
        async fn complete(&self, request: CompletionRequest) -> filing_llm::Result<CompletionResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let reply = (self.responder)(&request);
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request);
            }
            let text = reply.ok_or_else(|| LLMError::RequestFailed("model unavailable".to_string()))?;
            Ok(CompletionResponse {
                message: Message::assistant(text),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage {
                    input_tokens: 10,
                    output_tokens: 5,
                },
            })
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }
}
