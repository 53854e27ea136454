//! Small crate-wide convenience macros.

/// Console log that only fires in debug builds.  Release builds still
/// evaluate the format arguments' side effects, so keep them pure.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{
        if cfg!(debug_assertions) {
            web_sys::console::log_1(&format!($($arg)*).into());
        }
    }};
}

/// Console warning for swallowed validation/traversal failures.  These are
/// expected no-ops, so they log in every build but never surface to the
/// user.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {{
        web_sys::console::warn_1(&format!($($arg)*).into());
    }};
}
