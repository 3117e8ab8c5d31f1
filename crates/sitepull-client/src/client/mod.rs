//! Sanity HTTP query API client.
//!
//! Provides a sync HTTP client that runs GROQ queries against a project
//! dataset, authenticated with a bearer token when one is configured.

mod documents;

pub use documents::documents_query;

use std::time::Duration;

use ureq::Agent;

use crate::error::ClientError;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Content store query client.
pub struct SanityClient {
    agent: Agent,
    project_id: String,
    dataset: String,
    api_version: String,
    token: Option<String>,
}

impl SanityClient {
    /// Create a client for one project dataset.
    ///
    /// # Arguments
    /// * `project_id` - Project identifier (subdomain of the API host)
    /// * `dataset` - Dataset name, e.g. `production`
    /// * `api_version` - Dated API version, e.g. `v2021-10-21`
    /// * `token` - Read token; required to see drafts
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] if the project id or dataset is
    /// empty or contains characters that cannot appear in the URL.
    pub fn new(
        project_id: &str,
        dataset: &str,
        api_version: &str,
        token: Option<&str>,
    ) -> Result<Self, ClientError> {
        require_identifier(project_id, "project id")?;
        require_identifier(dataset, "dataset")?;

        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Ok(Self {
            agent,
            project_id: project_id.to_owned(),
            dataset: dataset.to_owned(),
            api_version: api_version.trim_matches('/').to_owned(),
            token: token.filter(|t| !t.is_empty()).map(str::to_owned),
        })
    }

    /// Get the query endpoint URL.
    fn query_url(&self) -> String {
        format!(
            "https://{}.api.sanity.io/{}/data/query/{}",
            self.project_id, self.api_version, self.dataset
        )
    }
}

/// Require an identifier that is safe to place in a URL as is.
fn require_identifier(value: &str, field: &str) -> Result<(), ClientError> {
    if value.is_empty() {
        return Err(ClientError::Validation(format!("{field} cannot be empty")));
    }
    let valid = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(ClientError::Validation(format!(
            "{field} may only contain letters, digits, '-' and '_'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_url() {
        let client = SanityClient::new("abc123", "production", "v2021-10-21", None).unwrap();
        assert_eq!(
            client.query_url(),
            "https://abc123.api.sanity.io/v2021-10-21/data/query/production"
        );
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let client = SanityClient::new("abc123", "production", "v1", Some("")).unwrap();
        assert!(client.token.is_none());
    }

    #[test]
    fn test_invalid_identifiers_rejected() {
        assert!(matches!(
            SanityClient::new("", "production", "v1", None),
            Err(ClientError::Validation(_))
        ));
        assert!(matches!(
            SanityClient::new("abc", "prod/../x", "v1", None),
            Err(ClientError::Validation(_))
        ));
    }
}
