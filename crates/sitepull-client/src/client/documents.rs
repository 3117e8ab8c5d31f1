//! Document queries for the content store API.

use tracing::info;

use super::SanityClient;
use crate::error::ClientError;
use crate::types::QueryResponse;
use sitepull_core::Document;

/// Every document outside the reserved `_.` system namespace.
const ALL_DOCUMENTS: &str = r#"*[!(_id in path("_.**"))]"#;

/// Published documents only.
const PUBLISHED_DOCUMENTS: &str = r#"*[!(_id in path("_.**")) && !(_id in path("drafts.**"))]"#;

/// GROQ query selecting the documents of a sync run.
pub fn documents_query(preview: bool) -> &'static str {
    if preview {
        ALL_DOCUMENTS
    } else {
        PUBLISHED_DOCUMENTS
    }
}

impl SanityClient {
    /// Fetch all documents of the dataset, including drafts when `preview`
    /// is set.
    pub fn fetch_documents(&self, preview: bool) -> Result<Vec<Document>, ClientError> {
        let url = self.query_url();

        info!(
            "Fetching documents from {}/{} (preview: {preview})",
            self.project_id, self.dataset
        );

        let mut request = self
            .agent
            .get(&url)
            .query("query", documents_query(preview))
            .query("perspective", "raw")
            .header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", &format!("Bearer {token}"));
        }
        let response = request.call()?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(ClientError::HttpResponse {
                status,
                body: error_body,
            });
        }

        let response: QueryResponse = body_reader.read_json()?;
        info!("Fetched {} documents", response.result.len());
        Ok(response.result)
    }
}
