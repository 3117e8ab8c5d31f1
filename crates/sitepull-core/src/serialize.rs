//! File content rendering by output extension.
//!
//! | Extension | Output |
//! |-----------|--------|
//! | `yml`, `yaml` | block YAML of all fields |
//! | `toml` | TOML of all fields (nulls dropped) |
//! | `json` | compact JSON of all fields |
//! | `md` | YAML front matter plus the `content` field as body |
//! | `html` | the `content` field only |

use serde_json::{Map, Value};

use crate::document::Document;
use crate::error::SerializeError;

/// Field holding the free-form body of markdown and HTML files.
const CONTENT_FIELD: &str = "content";

const FRONT_MATTER_DELIMITER: &str = "---\n";

/// Render `document` as the content of the file at `path`.
///
/// # Errors
///
/// Returns [`SerializeError::UnsupportedFormat`] when the extension of
/// `path` has no serializer, or the underlying format error.
pub fn serialize(path: &str, document: &Document) -> Result<String, SerializeError> {
    match extension(path) {
        "yml" | "yaml" => Ok(serde_yaml::to_string(document.fields())?),
        "toml" => Ok(toml::to_string(&without_nulls(document.fields()))?),
        "json" => Ok(serde_json::to_string(document.fields())?),
        "md" => markdown(document),
        "html" => Ok(body(document.get(CONTENT_FIELD))),
        other => Err(SerializeError::UnsupportedFormat {
            path: path.to_owned(),
            extension: other.to_owned(),
        }),
    }
}

/// Extension of the last path segment, without the dot.
fn extension(path: &str) -> &str {
    let filename = path.rsplit('/').next().unwrap_or(path);
    filename.rsplit_once('.').map_or("", |(_, ext)| ext)
}

fn markdown(document: &Document) -> Result<String, SerializeError> {
    let mut front_matter = document.fields().clone();
    let content = front_matter.shift_remove(CONTENT_FIELD);

    // Empty front matter is an empty block, not serde_yaml's `{}`.
    let yaml = if front_matter.is_empty() {
        String::new()
    } else {
        serde_yaml::to_string(&front_matter)?
    };

    Ok(format!(
        "{FRONT_MATTER_DELIMITER}{yaml}{FRONT_MATTER_DELIMITER}{}",
        body(content.as_ref())
    ))
}

fn body(content: Option<&Value>) -> String {
    match content {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Copy of `fields` with null values removed at every depth. TOML has no null.
fn without_nulls(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), prune(value)))
        .collect()
}

fn prune(value: &Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(without_nulls(fields)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .filter(|item| !item.is_null())
                .map(prune)
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> Document {
        Document::from_value(value).unwrap()
    }

    fn sample() -> Document {
        doc(json!({
            "title": "Home",
            "weight": 3,
            "draft": false,
            "tags": ["a", "b"],
            "hero": {"heading": "Welcome", "image": "https://cdn.example.com/x.png"},
            "sections": [{"type": "cta", "label": "Go"}, {"type": "text", "body": "Line 1\nLine 2"}]
        }))
    }

    #[test]
    fn test_markdown_front_matter() {
        let out = serialize(
            "index.md",
            &doc(json!({"title": "Hi", "content": "Body text"})),
        )
        .unwrap();
        assert_eq!(out, "---\ntitle: Hi\n---\nBody text");
    }

    #[test]
    fn test_markdown_without_content() {
        let out = serialize("about.md", &doc(json!({"title": "About"}))).unwrap();
        assert_eq!(out, "---\ntitle: About\n---\n");
    }

    #[test]
    fn test_markdown_without_front_matter() {
        let out = serialize("a.md", &doc(json!({"content": "# Only body\n"}))).unwrap();
        assert_eq!(out, "---\n---\n# Only body\n");
    }

    #[test]
    fn test_markdown_front_matter_parses_back() {
        let mut fields = sample().into_fields();
        fields.insert("content".to_owned(), json!("Body"));
        let out = serialize("page.md", &Document::new(fields)).unwrap();

        let rest = out.strip_prefix("---\n").unwrap();
        let (yaml, content) = rest.split_once("---\n").unwrap();
        let parsed: Value = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed, Value::from(sample()));
        assert_eq!(content, "Body");
    }

    #[test]
    fn test_html_outputs_content_only() {
        let out = serialize(
            "pages/a.html",
            &doc(json!({"title": "ignored", "content": "<p>Hello</p>"})),
        )
        .unwrap();
        assert_eq!(out, "<p>Hello</p>");
        assert_eq!(serialize("b.html", &doc(json!({"title": "x"}))).unwrap(), "");
    }

    #[test]
    fn test_yaml_round_trip() {
        for path in ["_data/site.yml", "data/site.yaml"] {
            let out = serialize(path, &sample()).unwrap();
            let parsed: Value = serde_yaml::from_str(&out).unwrap();
            assert_eq!(parsed, Value::from(sample()));
        }
    }

    #[test]
    fn test_yaml_shared_values_are_not_aliased() {
        let shared = json!({"name": "Jane", "role": "editor"});
        let out = serialize(
            "authors.yml",
            &doc(json!({"first": shared.clone(), "second": shared})),
        )
        .unwrap();
        assert!(!out.contains('&'));
        assert!(!out.contains('*'));
        assert_eq!(out.matches("name: Jane").count(), 2);
    }

    #[test]
    fn test_toml_round_trip() {
        let out = serialize("config.toml", &sample()).unwrap();
        let parsed: Value = toml::from_str(&out).unwrap();
        assert_eq!(parsed, Value::from(sample()));
    }

    #[test]
    fn test_toml_drops_nulls() {
        let out = serialize(
            "config.toml",
            &doc(json!({"title": "x", "logo": null, "nav": {"icon": null, "label": "Home"}})),
        )
        .unwrap();
        let parsed: Value = toml::from_str(&out).unwrap();
        assert_eq!(parsed, json!({"title": "x", "nav": {"label": "Home"}}));
    }

    #[test]
    fn test_json_is_compact_and_round_trips() {
        let out = serialize("src/data/site.json", &sample()).unwrap();
        assert!(!out.contains('\n'));
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, Value::from(sample()));
    }

    #[test]
    fn test_unsupported_extension_fails() {
        let err = serialize("data/file.xyz", &sample()).unwrap_err();
        assert!(matches!(
            err,
            SerializeError::UnsupportedFormat { ref extension, .. } if extension == "xyz"
        ));
        assert!(err.to_string().contains("data/file.xyz"));
    }

    #[test]
    fn test_extension_is_case_sensitive() {
        assert!(serialize("README.MD", &sample()).is_err());
    }

    #[test]
    fn test_extension_taken_from_last_segment() {
        assert_eq!(extension("v1.2/readme"), "");
        assert_eq!(extension("a/b.c/d.json"), "json");
        assert!(serialize("v1.2/readme", &sample()).is_err());
    }
}
