//! Field paths – the addressing scheme for every schema mutation.
//!
//! A path is an ordered list of property keys from the document root, with
//! the literal segment `items` stepping from an array node into its item
//! schema.  Traversal is strict: a segment that does not match the current
//! node's shape aborts with a `TraversalError` and the caller leaves the
//! document untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::document::{SchemaKind, SchemaNode};

/// Literal segment that steps into an array's item schema.
pub const ITEMS_SEGMENT: &str = "items";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(pub Vec<String>);

impl FieldPath {
    pub fn root() -> FieldPath {
        FieldPath(Vec::new())
    }

    pub fn from_segments<I, S>(segments: I) -> FieldPath
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldPath(segments.into_iter().map(Into::into).collect())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Path extended by one segment.
    pub fn child(&self, segment: &str) -> FieldPath {
        let mut segments = self.0.clone();
        segments.push(segment.to_string());
        FieldPath(segments)
    }

    /// Split into the parent path and the final segment.  `None` at the root.
    pub fn split_last(&self) -> Option<(FieldPath, &str)> {
        let (last, rest) = self.0.split_last()?;
        Some((FieldPath(rest.to_vec()), last.as_str()))
    }

    /// True when `self` is `other` or lies underneath it.
    pub fn starts_with(&self, other: &FieldPath) -> bool {
        self.0.len() >= other.0.len() && self.0[..other.0.len()] == other.0[..]
    }

    /// Dotted rendering used for graph edge handles (`a.b.items.c`).
    pub fn dotted(&self) -> String {
        self.0.join(".")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.dotted())
        }
    }
}

/// A path segment that cannot be followed from the node it addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalError {
    /// Prefix of the path that resolved successfully.
    pub resolved: FieldPath,
    /// The segment that failed.
    pub segment: String,
}

impl fmt::Display for TraversalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot follow segment '{}' from {}",
            self.segment, self.resolved
        )
    }
}

/// Walk `path` from `root`, returning the addressed node.
pub fn resolve<'a>(root: &'a SchemaNode, path: &FieldPath) -> Result<&'a SchemaNode, TraversalError> {
    let mut current = root;
    let mut resolved = FieldPath::root();
    for segment in &path.0 {
        current = step(current, segment).ok_or_else(|| TraversalError {
            resolved: resolved.clone(),
            segment: segment.clone(),
        })?;
        resolved = resolved.child(segment);
    }
    Ok(current)
}

/// Mutable variant of [`resolve`].
pub fn resolve_mut<'a>(
    root: &'a mut SchemaNode,
    path: &FieldPath,
) -> Result<&'a mut SchemaNode, TraversalError> {
    let mut current = root;
    let mut resolved = FieldPath::root();
    for segment in &path.0 {
        let failed = TraversalError {
            resolved: resolved.clone(),
            segment: segment.clone(),
        };
        current = step_mut(current, segment).ok_or(failed)?;
        resolved = resolved.child(segment);
    }
    Ok(current)
}

fn step<'a>(node: &'a SchemaNode, segment: &str) -> Option<&'a SchemaNode> {
    match &node.kind {
        SchemaKind::Object { properties } => properties.get(segment),
        SchemaKind::Array { items } if segment == ITEMS_SEGMENT => items.as_deref(),
        _ => None,
    }
}

fn step_mut<'a>(node: &'a mut SchemaNode, segment: &str) -> Option<&'a mut SchemaNode> {
    match &mut node.kind {
        SchemaKind::Object { properties } => properties.get_mut(segment),
        SchemaKind::Array { items } if segment == ITEMS_SEGMENT => items.as_deref_mut(),
        _ => None,
    }
}
