//! Content documents and the markers that classify them.
//!
//! A [`Document`] is a JSON object as returned by the content store. Its
//! `_id` decides draft identity, its `_type` decides whether it is a media
//! asset, and the `stackbit_model_type` marker decides the [`Role`] of an
//! entry in the generated site.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Prefix marking a document id as an unpublished draft.
pub const DRAFT_PREFIX: &str = "drafts.";

/// Marker field holding the entry role.
pub const MODEL_TYPE_FIELD: &str = "stackbit_model_type";
/// Marker field holding the page URL path.
pub const URL_PATH_FIELD: &str = "stackbit_url_path";
/// Marker field overriding the output directory.
pub const DIR_FIELD: &str = "stackbit_dir";
/// Marker field overriding the page file extension.
pub const FILE_EXT_FIELD: &str = "stackbit_file_ext";
/// Marker field holding an explicit output file path.
pub const FILE_PATH_FIELD: &str = "stackbit_file_path";
/// Marker field holding the field-name rename table.
pub const FIELD_NAMES_FIELD: &str = "stackbit_field_names";

/// Prefix shared by all routing and shaping markers.
pub(crate) const MARKER_PREFIX: &str = "stackbit_";

/// A content document: field name to JSON value, in fetch order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Wrap an existing field map.
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Build a document from a JSON value, if it is an object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    /// The document `_id`, if present and a string.
    pub fn id(&self) -> Option<&str> {
        self.get_str("_id")
    }

    /// The document `_type`, if present and a string.
    pub fn type_name(&self) -> Option<&str> {
        self.get_str("_type")
    }

    /// Whether the document id carries the draft prefix.
    pub fn is_draft(&self) -> bool {
        self.id().is_some_and(is_draft_id)
    }

    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a string field.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Remove a field, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    /// Borrow the underlying field map.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume the document, returning its field map.
    #[must_use]
    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }

    /// Classify the document as an asset or an entry.
    pub fn asset_kind(&self) -> Option<AssetKind> {
        self.type_name().and_then(AssetKind::from_type_name)
    }

    /// Role of the entry, read from the model type marker.
    pub fn role(&self) -> Role {
        Role::from_marker(self.get_str(MODEL_TYPE_FIELD))
    }
}

impl From<Map<String, Value>> for Document {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Object(doc.0)
    }
}

/// Whether an id carries the draft prefix.
pub fn is_draft_id(id: &str) -> bool {
    id.starts_with(DRAFT_PREFIX)
}

/// Strip the draft prefix from an id, if present.
pub fn canonical_id(id: &str) -> &str {
    id.strip_prefix(DRAFT_PREFIX).unwrap_or(id)
}

/// Media asset kinds stored by the content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    File,
}

impl AssetKind {
    fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "sanity.imageAsset" => Some(Self::Image),
            "sanity.fileAsset" => Some(Self::File),
            _ => None,
        }
    }
}

/// Role of an entry in the generated site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// One file at a URL-derived path.
    Page,
    /// Zero or one file at an explicit path.
    Data,
    /// Exactly one file at an explicit path.
    Config,
    /// Missing or unknown marker; the entry produces no output.
    Unrecognized(Option<String>),
}

impl Role {
    fn from_marker(marker: Option<&str>) -> Self {
        match marker {
            Some("page") => Self::Page,
            Some("data") => Self::Data,
            Some("config") => Self::Config,
            other => Self::Unrecognized(other.map(str::to_owned)),
        }
    }
}

/// Typed field value kinds, dispatched on a nested object's `_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Slug,
    Image,
    File,
    Color,
    Reference,
    Unrecognized,
}

impl FieldKind {
    pub(crate) fn of(object: &Map<String, Value>) -> Self {
        match object.get("_type").and_then(Value::as_str) {
            Some("slug") => Self::Slug,
            Some("image") => Self::Image,
            Some("file") => Self::File,
            Some("color") => Self::Color,
            Some("reference") => Self::Reference,
            _ => Self::Unrecognized,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> Document {
        Document::from_value(value).unwrap()
    }

    #[test]
    fn test_draft_identity() {
        assert!(is_draft_id("drafts.abc"));
        assert!(!is_draft_id("abc"));
        assert_eq!(canonical_id("drafts.abc"), "abc");
        assert_eq!(canonical_id("abc"), "abc");
    }

    #[test]
    fn test_document_accessors() {
        let d = doc(json!({"_id": "drafts.x", "_type": "post", "n": 1}));
        assert_eq!(d.id(), Some("drafts.x"));
        assert_eq!(d.type_name(), Some("post"));
        assert!(d.is_draft());
        assert_eq!(d.get_str("n"), None);
        assert_eq!(d.get("n"), Some(&json!(1)));
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(Document::from_value(json!([1, 2])).is_none());
        assert!(Document::from_value(json!("x")).is_none());
    }

    #[test]
    fn test_asset_kind() {
        assert_eq!(
            doc(json!({"_type": "sanity.imageAsset"})).asset_kind(),
            Some(AssetKind::Image)
        );
        assert_eq!(
            doc(json!({"_type": "sanity.fileAsset"})).asset_kind(),
            Some(AssetKind::File)
        );
        assert_eq!(doc(json!({"_type": "post"})).asset_kind(), None);
        assert_eq!(doc(json!({})).asset_kind(), None);
    }

    #[test]
    fn test_role_from_marker() {
        assert_eq!(doc(json!({"stackbit_model_type": "page"})).role(), Role::Page);
        assert_eq!(doc(json!({"stackbit_model_type": "data"})).role(), Role::Data);
        assert_eq!(
            doc(json!({"stackbit_model_type": "config"})).role(),
            Role::Config
        );
        assert_eq!(
            doc(json!({"stackbit_model_type": "object"})).role(),
            Role::Unrecognized(Some("object".to_owned()))
        );
        assert_eq!(doc(json!({})).role(), Role::Unrecognized(None));
    }

    #[test]
    fn test_field_kind() {
        let kind = |v: Value| FieldKind::of(v.as_object().unwrap());
        assert_eq!(kind(json!({"_type": "slug"})), FieldKind::Slug);
        assert_eq!(kind(json!({"_type": "image"})), FieldKind::Image);
        assert_eq!(kind(json!({"_type": "file"})), FieldKind::File);
        assert_eq!(kind(json!({"_type": "color"})), FieldKind::Color);
        assert_eq!(kind(json!({"_type": "reference"})), FieldKind::Reference);
        assert_eq!(kind(json!({"_type": "block"})), FieldKind::Unrecognized);
        assert_eq!(kind(json!({"_type": 3})), FieldKind::Unrecognized);
    }
}
