//! Wire-contract validation for the workflow update payload.
//!
//! The contract is an embedded draft 2020-12 JSON Schema, compiled once.  A
//! debug assertion checks every outgoing PUT body against it, and the native
//! integration test in `tests/payload_contract_coverage.rs` cross-checks the
//! contract against the payload structs so neither side drifts.

use jsonschema::{Draft, JSONSchema};
use lazy_static::lazy_static;
use serde_json::Value;

pub const WORKFLOW_UPDATE_CONTRACT: &str =
    include_str!("../contracts/workflow_update.schema.json");

lazy_static! {
    static ref COMPILED: JSONSchema = {
        let doc: Value = serde_json::from_str(WORKFLOW_UPDATE_CONTRACT)
            .expect("embedded contract is valid JSON");
        JSONSchema::options()
            .with_draft(Draft::Draft202012)
            .compile(&doc)
            .expect("embedded contract compiles")
    };
}

/// True when `payload` matches the workflow-update wire contract.
pub fn validate_update_payload(payload: &Value) -> bool {
    COMPILED.is_valid(payload)
}
