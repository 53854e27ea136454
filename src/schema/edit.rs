//! Mutation operations over a schema document.
//!
//! Every operation takes the document root plus a [`FieldPath`] and either
//! succeeds, returning what the graph store must be told about, or fails
//! leaving the document untouched.  Failures here are expected in normal
//! interactive use (renaming to a taken name, dropping onto a scalar) and
//! are reported to the caller for a diagnostic log, never as a user-facing
//! error.

use std::collections::BTreeMap;
use std::fmt;

use super::document::{SchemaKind, SchemaNode, SchemaType};
use super::path::{resolve, resolve_mut, FieldPath, TraversalError, ITEMS_SEGMENT};

/// What a successful mutation means for the owning graph store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Document changed, no edge handles affected.
    Changed,
    /// Nothing to do (e.g. rename to the current name).  Callers skip the
    /// replacement dispatch entirely.
    Unchanged,
    /// An edge-handle identifier changed and bound edges must follow it.
    HandleRenamed { old: String, new: String },
    /// A field vanished and edges bound to its handle must be dropped.
    HandleRemoved { handle: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditError {
    Traversal(TraversalError),
    /// Name empty (possibly after sanitization).
    EmptyName,
    /// The destination container already has a field with this name.
    NameCollision(String),
    /// The addressed node must be an object for this operation.
    NotAnObject,
    /// The path does not name a field of its parent container.
    NoSuchField(String),
    /// Retyping an object with children to a non-object would drop them.
    WouldDropChildren,
    /// The `items` pseudo-field cannot be renamed or reparented.
    ItemsNotAField,
    /// A node cannot be moved into its own subtree.
    MoveIntoSelf,
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::Traversal(e) => write!(f, "traversal failed: {e}"),
            EditError::EmptyName => write!(f, "field name is empty"),
            EditError::NameCollision(name) => write!(f, "field '{name}' already exists"),
            EditError::NotAnObject => write!(f, "target is not an object"),
            EditError::NoSuchField(name) => write!(f, "no field '{name}' at this path"),
            EditError::WouldDropChildren => {
                write!(f, "object has fields; retype would drop them")
            }
            EditError::ItemsNotAField => write!(f, "'items' is not a named field"),
            EditError::MoveIntoSelf => write!(f, "cannot move a field into itself"),
        }
    }
}

impl From<TraversalError> for EditError {
    fn from(e: TraversalError) -> Self {
        EditError::Traversal(e)
    }
}

pub type EditResult = Result<EditOutcome, EditError>;

/// Collapse a user-supplied name to the `[A-Za-z0-9_]` convention used for
/// edge handles.  Every other character becomes an underscore.
pub fn sanitize_field_name(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// First unused `base`, `base_1`, `base_2`, … within `siblings`.
pub fn unique_field_name(siblings: &BTreeMap<String, SchemaNode>, base: &str) -> String {
    if !siblings.contains_key(base) {
        return base.to_string();
    }
    let mut n = 1usize;
    loop {
        let candidate = format!("{base}_{n}");
        if !siblings.contains_key(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Name used for fields created by the add-nested affordance.
pub const DEFAULT_FIELD_NAME: &str = "new_field";

/// Add a named field of the given type directly under the document root.
pub fn add_top_level_field(root: &mut SchemaNode, raw_name: &str, ty: SchemaType) -> EditResult {
    let name = sanitize_field_name(raw_name);
    if name.is_empty() {
        return Err(EditError::EmptyName);
    }
    let properties = root.properties_mut().ok_or(EditError::NotAnObject)?;
    if properties.contains_key(&name) {
        return Err(EditError::NameCollision(name));
    }
    properties.insert(name, SchemaNode::of_type(ty));
    Ok(EditOutcome::Changed)
}

/// Insert an auto-named `string` field *inside* the object node at `path`.
///
/// Returns the generated name alongside the outcome.  The addressed node
/// must itself be an object: this inserts into it, never beside it.
pub fn add_nested_field(
    root: &mut SchemaNode,
    path: &FieldPath,
) -> Result<(String, EditOutcome), EditError> {
    let target = resolve_mut(root, path)?;
    let properties = target.properties_mut().ok_or(EditError::NotAnObject)?;
    let name = unique_field_name(properties, DEFAULT_FIELD_NAME);
    properties.insert(name.clone(), SchemaNode::scalar(SchemaType::String));
    Ok((name, EditOutcome::Changed))
}

/// Change a field's key within its immediate parent container.
pub fn rename_field(root: &mut SchemaNode, path: &FieldPath, new_name: &str) -> EditResult {
    let (parent_path, old_name) = path.split_last().ok_or(EditError::NotAnObject)?;
    if old_name == ITEMS_SEGMENT {
        let parent = resolve(root, &parent_path)?;
        if !parent.is_object() {
            return Err(EditError::ItemsNotAField);
        }
    }
    let new_name = new_name.trim();
    if new_name.is_empty() || new_name == old_name {
        return Ok(EditOutcome::Unchanged);
    }
    let old_name = old_name.to_string();
    let new_name = new_name.to_string();

    let parent = resolve_mut(root, &parent_path)?;
    let properties = parent.properties_mut().ok_or(EditError::NotAnObject)?;
    if properties.contains_key(&new_name) {
        return Err(EditError::NameCollision(new_name));
    }
    let node = properties
        .remove(&old_name)
        .ok_or(EditError::NoSuchField(old_name.clone()))?;
    properties.insert(new_name.clone(), node);
    Ok(EditOutcome::HandleRenamed {
        old: old_name,
        new: new_name,
    })
}

/// Change a node's type tag, carrying metadata (and compatible container
/// contents) onto the new shape.
pub fn retype_field(root: &mut SchemaNode, path: &FieldPath, new_ty: SchemaType) -> EditResult {
    let node = resolve_mut(root, path)?;
    if node.schema_type() == new_ty {
        return Ok(EditOutcome::Unchanged);
    }
    if let SchemaKind::Object { properties } = &node.kind {
        if !properties.is_empty() && new_ty != SchemaType::Object {
            return Err(EditError::WouldDropChildren);
        }
    }
    node.kind = match new_ty {
        SchemaType::Object => {
            let properties =
                match std::mem::replace(&mut node.kind, SchemaKind::Array { items: None }) {
                    SchemaKind::Object { properties } => properties,
                    _ => BTreeMap::new(),
                };
            SchemaKind::Object { properties }
        }
        SchemaType::Array => {
            let items =
                match std::mem::replace(&mut node.kind, SchemaKind::Array { items: None }) {
                    SchemaKind::Array { items } => items,
                    _ => None,
                };
            SchemaKind::Array { items }
        }
        scalar => SchemaKind::Scalar(scalar),
    };
    Ok(EditOutcome::Changed)
}

/// Remove the field at `path` from its parent container.  A path ending in
/// `items` clears the owning array's item schema instead.
pub fn delete_field(root: &mut SchemaNode, path: &FieldPath) -> EditResult {
    let (parent_path, leaf) = path.split_last().ok_or(EditError::NotAnObject)?;
    let leaf = leaf.to_string();
    let parent = resolve_mut(root, &parent_path)?;
    match &mut parent.kind {
        SchemaKind::Array { items } if leaf == ITEMS_SEGMENT => {
            if items.take().is_none() {
                return Ok(EditOutcome::Unchanged);
            }
            Ok(EditOutcome::Changed)
        }
        SchemaKind::Object { properties } => {
            properties
                .remove(&leaf)
                .ok_or(EditError::NoSuchField(leaf.clone()))?;
            Ok(EditOutcome::HandleRemoved { handle: leaf })
        }
        _ => Err(EditError::NotAnObject),
    }
}

/// Reparent the field at `src` into the object node at `dst`.
///
/// `dst == root` (the empty path) is always accepted; any other destination
/// must resolve to an object node.  Handles are full dotted paths because a
/// move changes the field's position in the document, not just its key.
pub fn move_field(root: &mut SchemaNode, src: &FieldPath, dst: &FieldPath) -> EditResult {
    let (src_parent, name) = src.split_last().ok_or(EditError::NotAnObject)?;
    if name == ITEMS_SEGMENT {
        // Only an array's item schema is off limits; an object may have a
        // real property that happens to be called `items`.
        let parent = resolve(root, &src_parent)?;
        if !parent.is_object() {
            return Err(EditError::ItemsNotAField);
        }
    }
    if dst.starts_with(src) {
        return Err(EditError::MoveIntoSelf);
    }
    let name = name.to_string();
    if *dst == src_parent {
        return Ok(EditOutcome::Unchanged);
    }

    // Validate the destination before detaching anything so a failure
    // cannot leave the field dangling.
    {
        let target = resolve(root, dst)?;
        let properties = target.properties().ok_or(EditError::NotAnObject)?;
        if properties.contains_key(&name) {
            return Err(EditError::NameCollision(name));
        }
    }

    let node = {
        let parent = resolve_mut(root, &src_parent)?;
        let properties = parent.properties_mut().ok_or(EditError::NotAnObject)?;
        properties
            .remove(&name)
            .ok_or(EditError::NoSuchField(name.clone()))?
    };

    // dst is not inside the detached subtree, so it still resolves.
    let target = resolve_mut(root, dst).expect("destination validated above");
    target
        .properties_mut()
        .expect("destination validated above")
        .insert(name.clone(), node);

    Ok(EditOutcome::HandleRenamed {
        old: src.dotted(),
        new: dst.child(&name).dotted(),
    })
}

/// Create a default item schema on an item-less array node.
pub fn ensure_items(root: &mut SchemaNode, path: &FieldPath, default_ty: SchemaType) -> EditResult {
    let node = resolve_mut(root, path)?;
    match &mut node.kind {
        SchemaKind::Array { items } => {
            if items.is_some() {
                return Ok(EditOutcome::Unchanged);
            }
            *items = Some(Box::new(SchemaNode::of_type(default_ty)));
            Ok(EditOutcome::Changed)
        }
        _ => Err(EditError::NotAnObject),
    }
}
