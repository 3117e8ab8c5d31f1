//! Recursive tree transform over JSON values.
//!
//! [`deep_map`] walks a value depth first and offers every node to a
//! visitor before descending into it. The visitor can keep the node or
//! replace it; when the replacement is a container, its children are walked
//! in turn. This is what lets a reference be swapped for the document it
//! points at and still have that document's fields rewritten.

use std::fmt;

use serde_json::{Map, Value};

/// One step in a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Keys and indices from the root of a value to a nested node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The empty path, addressing the root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Whether this path addresses the root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Path segments from the root.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Whether `prefix` is this path or one of its ancestors.
    pub fn starts_with(&self, prefix: &FieldPath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Which nodes the visitor is offered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Nodes {
    /// Objects, arrays and scalars.
    #[default]
    All,
    /// Objects and arrays only.
    Containers,
    /// Scalars only.
    Scalars,
}

impl Nodes {
    fn visits(self, value: &Value) -> bool {
        let container = value.is_object() || value.is_array();
        match self {
            Self::All => true,
            Self::Containers => container,
            Self::Scalars => !container,
        }
    }
}

/// Visitor decision for a single node.
#[derive(Debug, Clone, PartialEq)]
pub enum Visit {
    /// Keep the node as is and descend into it.
    Keep,
    /// Substitute the node. Containers are descended into, scalars end the branch.
    Replace(Value),
}

/// Map every node of `value` through `visitor`, producing a new value.
///
/// The visitor receives the node, its path from the root, and the chain of
/// already visited containers above it (outermost first). Nodes are visited
/// pre-order, object keys in insertion order. The first visitor error stops
/// the walk and is returned.
pub fn deep_map<E, F>(value: &Value, nodes: Nodes, mut visitor: F) -> Result<Value, E>
where
    F: FnMut(&Value, &FieldPath, &[&Value]) -> Result<Visit, E>,
{
    let mut path = FieldPath::root();
    map_node(value, &mut path, &[], nodes, &mut visitor)
}

fn map_node<E, F>(
    node: &Value,
    path: &mut FieldPath,
    ancestors: &[&Value],
    nodes: Nodes,
    visitor: &mut F,
) -> Result<Value, E>
where
    F: FnMut(&Value, &FieldPath, &[&Value]) -> Result<Visit, E>,
{
    let replaced;
    let current = if nodes.visits(node) {
        match visitor(node, path, ancestors)? {
            Visit::Keep => node,
            Visit::Replace(value) => {
                replaced = value;
                &replaced
            }
        }
    } else {
        node
    };

    match current {
        Value::Object(fields) => {
            let mut chain = ancestors.to_vec();
            chain.push(current);
            let mut out = Map::with_capacity(fields.len());
            for (key, child) in fields {
                path.push(PathSegment::Key(key.clone()));
                let mapped = map_node(child, path, &chain, nodes, visitor);
                path.pop();
                out.insert(key.clone(), mapped?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => {
            let mut chain = ancestors.to_vec();
            chain.push(current);
            let mut out = Vec::with_capacity(items.len());
            for (index, child) in items.iter().enumerate() {
                path.push(PathSegment::Index(index));
                let mapped = map_node(child, path, &chain, nodes, visitor);
                path.pop();
                out.push(mapped?);
            }
            Ok(Value::Array(out))
        }
        scalar => Ok(scalar.clone()),
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_identity_preserves_shape() {
        let input = json!({"a": [1, {"b": "c"}], "d": null});
        let out =
            deep_map(&input, Nodes::All, |_, _, _| Ok::<_, Infallible>(Visit::Keep)).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn test_visits_parent_before_child() {
        let input = json!({"a": {"b": [1, 2]}});
        let mut seen = Vec::new();
        deep_map(&input, Nodes::All, |_, path, _| {
            seen.push(path.to_string());
            Ok::<_, Infallible>(Visit::Keep)
        })
        .unwrap();
        assert_eq!(seen, vec!["", "a", "a.b", "a.b[0]", "a.b[1]"]);
    }

    #[test]
    fn test_replacement_container_is_descended() {
        let input = json!({"link": {"ref": "x"}});
        let mut seen = Vec::new();
        let out = deep_map(&input, Nodes::All, |value, path, _| {
            seen.push(path.to_string());
            if value.get("ref").is_some() {
                return Ok::<_, Infallible>(Visit::Replace(json!({"n": 1})));
            }
            if value == &json!(1) {
                return Ok(Visit::Replace(json!(2)));
            }
            Ok(Visit::Keep)
        })
        .unwrap();
        assert_eq!(out, json!({"link": {"n": 2}}));
        assert_eq!(seen, vec!["", "link", "link.n"]);
    }

    #[test]
    fn test_scalar_replacement_stops_recursion() {
        let input = json!({"slug": {"current": "hello"}});
        let out = deep_map(&input, Nodes::All, |value, _, _| {
            Ok::<_, Infallible>(match value.get("current") {
                Some(current) => Visit::Replace(current.clone()),
                None => Visit::Keep,
            })
        })
        .unwrap();
        assert_eq!(out, json!({"slug": "hello"}));
    }

    #[test]
    fn test_ancestors_are_transformed_values() {
        let input = json!({"a": {"b": 1}});
        let mut depths = Vec::new();
        deep_map(&input, Nodes::All, |value, _, ancestors| {
            depths.push(ancestors.len());
            if value.is_number() {
                assert_eq!(ancestors[0], &json!({"a": {"b": 1}, "tag": true}));
                assert_eq!(ancestors[1], &json!({"b": 1, "tag": true}));
            }
            if let Some(fields) = value.as_object() {
                let mut fields = fields.clone();
                fields.insert("tag".to_owned(), json!(true));
                return Ok::<_, Infallible>(Visit::Replace(Value::Object(fields)));
            }
            Ok(Visit::Keep)
        })
        .unwrap();
        assert_eq!(depths, vec![0, 1, 2, 2, 1]);
    }

    #[test]
    fn test_node_filter() {
        let input = json!({"a": [1, "x"]});
        let mut containers = 0;
        deep_map(&input, Nodes::Containers, |value, _, _| {
            assert!(value.is_object() || value.is_array());
            containers += 1;
            Ok::<_, Infallible>(Visit::Keep)
        })
        .unwrap();
        assert_eq!(containers, 2);

        let out = deep_map(&input, Nodes::Scalars, |value, _, _| {
            assert!(!value.is_object() && !value.is_array());
            Ok::<_, Infallible>(Visit::Replace(json!(0)))
        })
        .unwrap();
        assert_eq!(out, json!({"a": [0, 0]}));
    }

    #[test]
    fn test_error_aborts_walk() {
        let input = json!({"a": 1, "b": 2});
        let result = deep_map(&input, Nodes::All, |value, _, _| {
            if value == &json!(1) {
                return Err("boom");
            }
            Ok(Visit::Keep)
        });
        assert_eq!(result, Err("boom"));
    }

    #[test]
    fn test_field_path_prefix() {
        let mut path = FieldPath::root();
        path.push(PathSegment::Key("a".to_owned()));
        let parent = path.clone();
        path.push(PathSegment::Index(3));
        assert!(path.starts_with(&parent));
        assert!(path.starts_with(&FieldPath::root()));
        assert!(!parent.starts_with(&path));
        assert_eq!(path.to_string(), "a[3]");
    }
}
