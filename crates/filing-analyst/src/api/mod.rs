//! Filing provider clients

pub mod sec_api;

#[cfg(test)]
pub use sec_api::MockFilingProvider;
pub use sec_api::{FilingMetadata, FilingProvider, SecApiClient};
