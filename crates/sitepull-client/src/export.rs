//! Reading documents from a local export instead of the API.
//!
//! Accepted forms:
//! - a JSON array of documents
//! - a saved query response (`{"result": [...]}`)
//! - NDJSON, one document per line, as written by dataset exports

use serde_json::Value;
use sitepull_core::Document;

use crate::error::ClientError;
use crate::types::QueryResponse;

/// Parse documents from export text.
pub fn parse_documents(text: &str) -> Result<Vec<Document>, ClientError> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    let mut lines = trimmed.lines().filter(|line| !line.trim().is_empty());
    let Some(first) = lines.next() else {
        return Ok(Vec::new());
    };

    // A pretty-printed query response spans several lines; try it whole first.
    if let Ok(response) = serde_json::from_str::<QueryResponse>(trimmed) {
        return Ok(response.result);
    }

    std::iter::once(first)
        .chain(lines)
        .enumerate()
        .map(|(index, line)| {
            let value: Value = serde_json::from_str(line)?;
            Document::from_value(value).ok_or_else(|| {
                ClientError::Export(format!("line {} is not a JSON object", index + 1))
            })
        })
        .collect()
}
