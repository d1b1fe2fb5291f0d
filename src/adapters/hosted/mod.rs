//! Hosted backend adapters.
//!
//! - `rest_client` - Supabase-style REST client (`RestHostedBackend`, `RestClientFactory`)
//! - `in_memory` - In-process stand-in for tests and local development

mod in_memory;
mod rest_client;

pub use in_memory::{InMemoryClientFactory, InMemoryHostedBackend, InMemoryHostedService};
pub use rest_client::{RestClientFactory, RestHostedBackend};
