//! Visual JSON-Schema editor for one side of a node's contract.
//!
//! The component never mutates shared state directly: every interaction
//! re-reads the stored document, applies one `schema::edit` operation to a
//! working copy, and on success dispatches the complete replacement document
//! plus whatever store notification the edit outcome carries.  The graph
//! reducer then re-renders us through an `UpdateUI` command.
//!
//! Rejected edits (bad rename, drop onto a scalar, malformed drag payload)
//! are logged and swallowed; the document is left untouched.

use std::cell::RefCell;

use serde_json::json;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DataTransfer, Document, DragEvent, Element, HtmlInputElement, HtmlSelectElement};

use crate::messages::Message;
use crate::models::SchemaSide;
use crate::schema::document::{normalize_root, to_value, SchemaKind, SchemaNode, SchemaType};
use crate::schema::edit::{self, EditError, EditOutcome};
use crate::schema::path::FieldPath;
use crate::state::{dispatch_global_message, APP_STATE};
use crate::warn_log;

/// MIME type of the drag payload (a JSON-encoded source path).
const DRAG_MIME: &str = "application/json";

#[derive(Clone)]
pub struct EditorContext {
    pub container_id: String,
    pub node_id: String,
    pub side: SchemaSide,
    /// Types offered by the row selectors; the first scalar is the default
    /// item schema for `Add item schema`.
    pub type_options: Vec<SchemaType>,
}

impl EditorContext {
    fn default_item_type(&self) -> SchemaType {
        self.type_options
            .iter()
            .copied()
            .find(SchemaType::is_scalar)
            .unwrap_or(SchemaType::String)
    }
}

thread_local! {
    static OPEN_EDITOR: RefCell<Option<EditorContext>> = RefCell::new(None);
}

fn current_context() -> Option<EditorContext> {
    OPEN_EDITOR.with(|ctx| ctx.borrow().clone())
}

/// Mount the editor into `container_id` for one side of a node.
pub fn mount(document: &Document, ctx: EditorContext) -> Result<(), JsValue> {
    OPEN_EDITOR.with(|cell| {
        *cell.borrow_mut() = Some(ctx);
    });
    render(document)
}

/// Tear the editor down; subsequent refreshes are no-ops.
pub fn unmount() {
    OPEN_EDITOR.with(|cell| {
        *cell.borrow_mut() = None;
    });
}

/// Re-render from current state.  Installed as an `UpdateUI` command by the
/// graph reducer after every schema replacement.
pub fn refresh() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    if let Err(e) = render(&document) {
        warn_log!("schema editor render failed: {e:?}");
    }
}

// ---------------------------------------------------------------------------
// Edit plumbing
// ---------------------------------------------------------------------------

/// Load the working document for the mounted node.
fn working_document(ctx: &EditorContext) -> SchemaNode {
    let stored = APP_STATE.with(|state| {
        state
            .borrow()
            .node_schema(&ctx.node_id, ctx.side)
            .cloned()
    });
    normalize_root(&stored.unwrap_or_else(|| json!({ "type": "object", "properties": {} })))
}

/// Apply one mutation to a fresh working copy and dispatch the replacement
/// document plus store notifications on success.
fn apply_edit<F>(op: F)
where
    F: FnOnce(&mut SchemaNode) -> Result<EditOutcome, EditError>,
{
    let Some(ctx) = current_context() else {
        return;
    };
    let mut doc = working_document(&ctx);
    match op(&mut doc) {
        Ok(EditOutcome::Unchanged) => {}
        Ok(outcome) => {
            dispatch_global_message(Message::NodeSchemaReplaced {
                node_id: ctx.node_id.clone(),
                side: ctx.side,
                schema: to_value(&doc),
            });
            match outcome {
                EditOutcome::HandleRenamed { old, new } => {
                    dispatch_global_message(Message::EdgeHandleRenamed {
                        node_id: ctx.node_id,
                        side: ctx.side,
                        old_handle: old,
                        new_handle: new,
                    });
                }
                EditOutcome::HandleRemoved { handle } => {
                    dispatch_global_message(Message::EdgesDroppedForHandle {
                        node_id: ctx.node_id,
                        side: ctx.side,
                        handle,
                    });
                }
                EditOutcome::Changed | EditOutcome::Unchanged => {}
            }
        }
        Err(e) => warn_log!("schema edit rejected: {e}"),
    }
}

fn handle_drop(event: &DragEvent, dst: FieldPath) {
    event.prevent_default();
    event.stop_propagation();
    let Some(transfer) = event.data_transfer() else {
        return;
    };
    let Ok(raw) = transfer.get_data(DRAG_MIME) else {
        return;
    };
    let src: FieldPath = match serde_json::from_str(&raw) {
        Ok(path) => path,
        Err(e) => {
            warn_log!("dropped malformed drag payload '{raw}': {e}");
            return;
        }
    };
    apply_edit(|doc| edit::move_field(doc, &src, &dst));
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(document: &Document) -> Result<(), JsValue> {
    let Some(ctx) = current_context() else {
        return Ok(());
    };
    let Some(container) = document.get_element_by_id(&ctx.container_id) else {
        // Host removed the mount point; treat as teardown.
        unmount();
        return Ok(());
    };
    container.set_inner_html("");
    container.set_class_name("schema-editor");

    let doc = working_document(&ctx);

    // The whole surface is a drop target for reparenting to the root.
    attach_drop_target(&container, FieldPath::root())?;

    if let Some(properties) = doc.properties() {
        for (name, node) in properties {
            render_row(
                document,
                &container,
                &ctx,
                FieldPath::root().child(name),
                name,
                node,
                true,
            )?;
        }
    }

    render_add_field_footer(document, &container, &ctx)?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn render_row(
    document: &Document,
    parent: &Element,
    ctx: &EditorContext,
    path: FieldPath,
    name: &str,
    node: &SchemaNode,
    name_editable: bool,
) -> Result<(), JsValue> {
    let row = document.create_element("div")?;
    row.set_class_name("schema-row");
    row.set_attribute("draggable", "true")?;
    parent.append_child(&row)?;

    attach_drag_source(&row, path.clone())?;

    let handle = document.create_element("span")?;
    handle.set_class_name("drag-handle");
    handle.set_text_content(Some("⋮⋮"));
    row.append_child(&handle)?;

    // Name: editable input for real fields, static label for `items`.
    if name_editable {
        let input: HtmlInputElement = document.create_element("input")?.unchecked_into();
        input.set_class_name("field-name");
        input.set_value(name);
        row.append_child(&input)?;

        let rename_path = path.clone();
        let input_clone = input.clone();
        let on_change = Closure::wrap(Box::new(move |_: web_sys::Event| {
            let new_name = input_clone.value();
            apply_edit(|doc| edit::rename_field(doc, &rename_path, &new_name));
        }) as Box<dyn FnMut(_)>);
        input.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
        on_change.forget();
    } else {
        let label = document.create_element("span")?;
        label.set_class_name("field-name field-name-fixed");
        label.set_text_content(Some(name));
        row.append_child(&label)?;
    }

    render_type_select(document, &row, ctx, path.clone(), node.schema_type())?;

    match &node.kind {
        SchemaKind::Object { properties } => {
            // Object rows accept drops and offer a nested add.
            attach_drop_target(&row, path.clone())?;
            render_button(document, &row, "+", "btn-add-nested", {
                let path = path.clone();
                move || apply_edit(|doc| edit::add_nested_field(doc, &path).map(|(_, o)| o))
            })?;

            render_delete_button(document, &row, ctx, path.clone())?;

            let children = document.create_element("div")?;
            children.set_class_name("schema-children");
            row.append_child(&children)?;
            for (child_name, child) in properties {
                render_row(
                    document,
                    &children,
                    ctx,
                    path.child(child_name),
                    child_name,
                    child,
                    true,
                )?;
            }
        }
        SchemaKind::Array { items } => {
            render_delete_button(document, &row, ctx, path.clone())?;

            let children = document.create_element("div")?;
            children.set_class_name("schema-children");
            row.append_child(&children)?;
            match items {
                Some(items) => {
                    render_row(
                        document,
                        &children,
                        ctx,
                        path.child(crate::schema::path::ITEMS_SEGMENT),
                        crate::schema::path::ITEMS_SEGMENT,
                        items,
                        false,
                    )?;
                }
                None => {
                    let default_ty = ctx.default_item_type();
                    render_button(document, &children, "Add item schema", "btn-add-items", {
                        let path = path.clone();
                        move || apply_edit(|doc| edit::ensure_items(doc, &path, default_ty))
                    })?;
                }
            }
        }
        SchemaKind::Scalar(_) => {
            render_delete_button(document, &row, ctx, path)?;
        }
    }

    Ok(())
}

fn render_type_select(
    document: &Document,
    row: &Element,
    ctx: &EditorContext,
    path: FieldPath,
    current: SchemaType,
) -> Result<(), JsValue> {
    let select: HtmlSelectElement = document.create_element("select")?.unchecked_into();
    select.set_class_name("field-type");
    for ty in &ctx.type_options {
        let option = document.create_element("option")?;
        option.set_attribute("value", ty.as_str())?;
        option.set_text_content(Some(ty.as_str()));
        if *ty == current {
            option.set_attribute("selected", "selected")?;
        }
        select.append_child(&option)?;
    }
    row.append_child(&select)?;

    let select_clone = select.clone();
    let on_change = Closure::wrap(Box::new(move |_: web_sys::Event| {
        let raw = select_clone.value();
        match SchemaType::parse(&raw) {
            Some(new_ty) => apply_edit(|doc| edit::retype_field(doc, &path, new_ty)),
            None => warn_log!("unknown schema type '{raw}' selected"),
        }
    }) as Box<dyn FnMut(_)>);
    select.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
    on_change.forget();
    Ok(())
}

fn render_delete_button(
    document: &Document,
    row: &Element,
    _ctx: &EditorContext,
    path: FieldPath,
) -> Result<(), JsValue> {
    render_button(document, row, "×", "btn-delete-field", move || {
        apply_edit(|doc| edit::delete_field(doc, &path))
    })
}

fn render_button<F>(
    document: &Document,
    parent: &Element,
    label: &str,
    class: &str,
    on_click: F,
) -> Result<(), JsValue>
where
    F: Fn() + Clone + 'static,
{
    let button = document.create_element("button")?;
    button.set_class_name(&format!("btn {class}"));
    button.set_text_content(Some(label));
    parent.append_child(&button)?;

    let cb = Closure::wrap(Box::new(move |event: web_sys::MouseEvent| {
        event.stop_propagation();
        on_click();
    }) as Box<dyn FnMut(_)>);
    button.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

fn render_add_field_footer(
    document: &Document,
    container: &Element,
    ctx: &EditorContext,
) -> Result<(), JsValue> {
    let footer = document.create_element("div")?;
    footer.set_class_name("schema-add-field");
    container.append_child(&footer)?;

    let name_input: HtmlInputElement = document.create_element("input")?.unchecked_into();
    name_input.set_id("schema-new-field-name");
    name_input.set_attribute("placeholder", "field_name")?;
    footer.append_child(&name_input)?;

    let type_select: HtmlSelectElement = document.create_element("select")?.unchecked_into();
    type_select.set_id("schema-new-field-type");
    for ty in &ctx.type_options {
        // Arrays are created by retyping; the add affordance offers
        // primitives and object.
        if *ty == SchemaType::Array {
            continue;
        }
        let option = document.create_element("option")?;
        option.set_attribute("value", ty.as_str())?;
        option.set_text_content(Some(ty.as_str()));
        type_select.append_child(&option)?;
    }
    footer.append_child(&type_select)?;

    render_button(document, &footer, "Add field", "btn-add-field", move || {
        let name = crate::dom_utils::input_value("schema-new-field-name");
        let ty = crate::dom_utils::select_by_id("schema-new-field-type")
            .map(|s| s.value())
            .and_then(|v| SchemaType::parse(&v))
            .unwrap_or(SchemaType::String);
        apply_edit(|doc| edit::add_top_level_field(doc, &name, ty));
    })?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Drag and drop wiring
// ---------------------------------------------------------------------------

fn attach_drag_source(row: &Element, path: FieldPath) -> Result<(), JsValue> {
    let on_drag_start = Closure::wrap(Box::new(move |event: DragEvent| {
        event.stop_propagation();
        if let Some(transfer) = event.data_transfer() {
            let payload = serde_json::to_string(&path).unwrap_or_default();
            let _ = set_drag_payload(&transfer, &payload);
        }
    }) as Box<dyn FnMut(_)>);
    row.add_event_listener_with_callback("dragstart", on_drag_start.as_ref().unchecked_ref())?;
    on_drag_start.forget();
    Ok(())
}

fn set_drag_payload(transfer: &DataTransfer, payload: &str) -> Result<(), JsValue> {
    transfer.set_data(DRAG_MIME, payload)
}

fn attach_drop_target(el: &Element, dst: FieldPath) -> Result<(), JsValue> {
    let on_drag_over = Closure::wrap(Box::new(move |event: DragEvent| {
        event.prevent_default();
    }) as Box<dyn FnMut(_)>);
    el.add_event_listener_with_callback("dragover", on_drag_over.as_ref().unchecked_ref())?;
    on_drag_over.forget();

    let on_drop = Closure::wrap(Box::new(move |event: DragEvent| {
        handle_drop(&event, dst.clone());
    }) as Box<dyn FnMut(_)>);
    el.add_event_listener_with_callback("drop", on_drop.as_ref().unchecked_ref())?;
    on_drop.forget();
    Ok(())
}
