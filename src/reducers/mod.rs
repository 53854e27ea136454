//! Per-domain reducers.  Each returns `true` when it handled the message so
//! the root `update` can stop delegating.

pub mod graph;
pub mod tokens;
