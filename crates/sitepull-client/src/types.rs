//! Content store API response types.

use serde::Deserialize;
use sitepull_core::Document;

/// Response body of the query endpoint.
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    /// Documents matched by the query.
    pub result: Vec<Document>,
    /// Server-side query time in milliseconds.
    #[serde(default)]
    pub ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_query_response() {
        let json = r#"{
            "ms": 12,
            "query": "*[]",
            "result": [
                {"_id": "a", "_type": "post", "title": "One"},
                {"_id": "drafts.a", "_type": "post", "title": "Two"}
            ]
        }"#;
        let response: QueryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.ms, Some(12));
        assert_eq!(response.result.len(), 2);
        assert_eq!(response.result[1].id(), Some("drafts.a"));
    }
}
