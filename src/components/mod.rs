//! DOM components.  Each renders from `APP_STATE` and dispatches messages;
//! none of them mutates shared state directly.

pub mod config_error_modal;
pub mod modal;
pub mod schema_editor;
pub mod token_panel;
