//! Content store access for sitepull.
//!
//! [`SanityClient`] queries the HTTP API for every document of a dataset;
//! [`parse_documents`] reads the same documents from a local export.

mod client;
mod error;
mod export;
mod types;

pub use client::{SanityClient, documents_query};
pub use error::ClientError;
pub use export::parse_documents;
pub use types::QueryResponse;
