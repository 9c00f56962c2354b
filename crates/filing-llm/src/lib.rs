//! Model provider layer for filing-rs
//!
//! This crate provides provider-agnostic abstractions for the two model
//! services the filing analyst depends on:
//!
//! - Chat completions ([`LLMProvider`]) used for summaries, risk lists,
//!   KPI extraction and question answering
//! - Text embeddings ([`EmbeddingProvider`]) used to build per-filing
//!   retrieval indexes
//!
//! Concrete implementations live behind feature flags in [`providers`].

pub mod completion;
pub mod embedding;
pub mod error;
pub mod messages;
pub mod provider;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, ResponseFormat, StopReason, TokenUsage};
pub use embedding::{EmbeddingProvider, cosine_similarity};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;

// Provider implementations (feature-gated)
#[cfg(feature = "openai")]
pub mod providers;
