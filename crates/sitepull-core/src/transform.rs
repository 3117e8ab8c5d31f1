//! Field value rewriting for entries.
//!
//! Every object inside an entry is inspected for a `_type` marker:
//!
//! | `_type` | Result |
//! |---------|--------|
//! | `slug` (with `current`) | the `current` string |
//! | `image`, `file` | the referenced asset's `url` |
//! | `color` | the `hex` string |
//! | `reference` | the referenced entry, itself transformed |
//!
//! Any other object loses its internal keys and has its remaining keys
//! renamed through its `stackbit_field_names` table, if it carries one.
//! Unresolvable assets and references become `null`.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::deep_map::{FieldPath, Nodes, Visit, deep_map};
use crate::document::{Document, FIELD_NAMES_FIELD, FieldKind, MARKER_PREFIX};
use crate::error::TransformError;

/// Read-only lookups shared by every entry of a run.
#[derive(Debug, Default)]
pub struct ResolveContext<'a> {
    entries: HashMap<&'a str, &'a Document>,
    assets: HashMap<&'a str, &'a Document>,
}

impl<'a> ResolveContext<'a> {
    /// Index entries and assets by their own `_id`.
    ///
    /// Documents without an `_id` cannot be referenced and are skipped.
    pub fn new(entries: &'a [Document], assets: &'a [Document]) -> Self {
        let by_id = |docs: &'a [Document]| {
            docs.iter()
                .filter_map(|doc| doc.id().map(|id| (id, doc)))
                .collect::<HashMap<_, _>>()
        };
        Self {
            entries: by_id(entries),
            assets: by_id(assets),
        }
    }

    /// Look up an entry by id.
    pub fn entry(&self, id: &str) -> Option<&'a Document> {
        self.entries.get(id).copied()
    }

    /// Look up an asset by id.
    pub fn asset(&self, id: &str) -> Option<&'a Document> {
        self.assets.get(id).copied()
    }
}

/// Field-name rename table carried by an object.
///
/// Stored on documents as a JSON-encoded object of original name to output
/// name. A plain object is accepted too.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameTable(HashMap<String, String>);

impl RenameTable {
    /// Parse a table from its stored form.
    ///
    /// Anything that is not an object of strings yields an empty table.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(encoded) => match serde_json::from_str(encoded) {
                Ok(table) => Self(table),
                Err(e) => {
                    debug!("Ignoring malformed {FIELD_NAMES_FIELD}: {e}");
                    Self::default()
                }
            },
            Value::Object(fields) => Self(
                fields
                    .iter()
                    .filter_map(|(k, v)| v.as_str().map(|name| (k.clone(), name.to_owned())))
                    .collect(),
            ),
            _ => Self::default(),
        }
    }

    /// Output name for `key`, falling back to `key` itself.
    pub fn rename<'k>(&'k self, key: &'k str) -> &'k str {
        self.0.get(key).map_or(key, String::as_str)
    }

    /// Whether the table renames nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Rewrite every typed value in `entry`.
///
/// Root-level `stackbit_*` markers survive so the path resolver can read
/// them; nested ones are removed.
///
/// # Errors
///
/// Returns [`TransformError::CyclicReference`] if expanding references
/// leads back to an entry already being expanded on the same branch.
pub fn transform_entry(
    entry: &Document,
    ctx: &ResolveContext<'_>,
) -> Result<Document, TransformError> {
    // Ids being expanded, keyed by the path where the expansion happened.
    let mut expanding: Vec<(FieldPath, String)> = Vec::new();
    if let Some(id) = entry.id() {
        expanding.push((FieldPath::root(), id.to_owned()));
    }

    let root = Value::Object(entry.fields().clone());
    let out = deep_map::<TransformError, _>(&root, Nodes::All, |value, path, _| {
        let Value::Object(fields) = value else {
            return Ok(Visit::Keep);
        };
        let visit = match (FieldKind::of(fields), fields.get("current")) {
            (FieldKind::Slug, Some(current)) => Visit::Replace(current.clone()),
            (FieldKind::Image | FieldKind::File, _) => Visit::Replace(resolve_asset(fields, ctx)),
            (FieldKind::Color, _) => {
                Visit::Replace(fields.get("hex").cloned().unwrap_or(Value::Null))
            }
            (FieldKind::Reference, _) => resolve_reference(fields, path, &mut expanding, ctx)?,
            _ => Visit::Replace(Value::Object(reshape(fields, path.is_root()))),
        };
        Ok(visit)
    })?;

    Ok(Document::from_value(out).unwrap_or_default())
}

fn resolve_asset(fields: &Map<String, Value>, ctx: &ResolveContext<'_>) -> Value {
    let Some(asset_id) = fields
        .get("asset")
        .and_then(|asset| asset.get("_ref"))
        .and_then(Value::as_str)
    else {
        return Value::Null;
    };
    match ctx.asset(asset_id).and_then(|asset| asset.get("url")) {
        Some(url) => url.clone(),
        None => {
            debug!("Unresolved asset reference {asset_id}");
            Value::Null
        }
    }
}

fn resolve_reference(
    fields: &Map<String, Value>,
    path: &FieldPath,
    expanding: &mut Vec<(FieldPath, String)>,
    ctx: &ResolveContext<'_>,
) -> Result<Visit, TransformError> {
    let Some(target) = fields.get("_ref").and_then(Value::as_str) else {
        return Ok(Visit::Replace(Value::Null));
    };

    let chain: Vec<&str> = expanding
        .iter()
        .filter(|(at, _)| path.starts_with(at))
        .map(|(_, id)| id.as_str())
        .collect();
    if chain.contains(&target) {
        let mut chain: Vec<String> = chain.into_iter().map(str::to_owned).collect();
        chain.push(target.to_owned());
        return Err(TransformError::CyclicReference { chain });
    }

    let Some(doc) = ctx.entry(target) else {
        debug!("Unresolved reference {target} at {path}");
        return Ok(Visit::Replace(Value::Null));
    };
    expanding.push((path.clone(), target.to_owned()));
    Ok(Visit::Replace(Value::Object(reshape(doc.fields(), false))))
}

/// Drop internal keys and apply the object's rename table.
fn reshape(fields: &Map<String, Value>, at_root: bool) -> Map<String, Value> {
    let renames = fields
        .get(FIELD_NAMES_FIELD)
        .map(RenameTable::from_value)
        .unwrap_or_default();
    fields
        .iter()
        .filter(|(key, _)| !is_internal_key(key, at_root))
        .map(|(key, value)| (renames.rename(key).to_owned(), value.clone()))
        .collect()
}

fn is_internal_key(key: &str, at_root: bool) -> bool {
    key.starts_with('_')
        || key == FIELD_NAMES_FIELD
        || (!at_root && key.starts_with(MARKER_PREFIX))
}
