//! Draft overlay over a fetched document collection.

use std::collections::HashMap;

use tracing::debug;

use crate::document::{Document, canonical_id};

/// Produce the published view of `documents`.
///
/// Without `preview`, drafts are dropped and everything else passes through
/// in order. With `preview`, a draft replaces the published document with the
/// same canonical id, taking the position where that identity first appeared.
/// Documents without an `_id` are kept as they are.
pub fn overlay_drafts(documents: Vec<Document>, preview: bool) -> Vec<Document> {
    if !preview {
        let total = documents.len();
        let published: Vec<Document> =
            documents.into_iter().filter(|doc| !doc.is_draft()).collect();
        debug!("Dropped {} drafts", total - published.len());
        return published;
    }

    let mut resolved: Vec<Document> = Vec::with_capacity(documents.len());
    let mut slots: HashMap<String, usize> = HashMap::new();

    for doc in documents {
        let Some(id) = doc.id() else {
            resolved.push(doc);
            continue;
        };
        let key = canonical_id(id).to_owned();
        match slots.get(&key) {
            Some(&slot) => {
                if doc.is_draft() || !resolved[slot].is_draft() {
                    debug!("Overlaying {key} with {id}");
                    resolved[slot] = doc;
                }
            }
            None => {
                slots.insert(key, resolved.len());
                resolved.push(doc);
            }
        }
    }

    resolved
}
