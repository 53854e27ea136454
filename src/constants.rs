//! Constants and default values – the single source of truth.

/// Quiet period for the workflow autosave debounce, in milliseconds.  Only
/// the trailing call after a burst of triggers fires.
pub const AUTOSAVE_QUIET_MS: u32 = 800;

/// Identifier a node persists under when it has neither a title nor a type.
pub const UNTITLED_NODE_ID: &str = "Untitled";

/// How long a toast stays on screen before it removes itself.
pub const TOAST_DURATION_MS: i32 = 4000;
