//! Data structures shared across state, reducers and the network layer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which side of a node a schema document describes.  Doubles as the marker
/// forwarded to the graph store so edge rewrites touch the right handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaSide {
    Input,
    Output,
}

impl SchemaSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaSide::Input => "input",
            SchemaSide::Output => "output",
        }
    }

    pub fn parse(s: &str) -> Option<SchemaSide> {
        match s {
            "input" => Some(SchemaSide::Input),
            "output" => Some(SchemaSide::Output),
            _ => None,
        }
    }

    /// Key under a node's config where the schema document lives.
    pub fn config_key(&self) -> &'static str {
        match self {
            SchemaSide::Input => "input_schema",
            SchemaSide::Output => "output_schema",
        }
    }
}

/// A node in the workflow graph, keyed in state by its transient id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub node_id: String,
    pub node_type: String,
    #[serde(default)]
    pub config: Value,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl WorkflowNode {
    pub fn new(node_id: &str, node_type: &str) -> WorkflowNode {
        WorkflowNode {
            node_id: node_id.to_string(),
            node_type: node_type.to_string(),
            config: Value::Object(Map::new()),
            x: 0.0,
            y: 0.0,
        }
    }

    /// User-assigned display title, when present and non-empty.
    pub fn title(&self) -> Option<&str> {
        self.config
            .get("title")
            .and_then(Value::as_str)
            .filter(|t| !t.trim().is_empty())
    }

    /// Identifier this node persists under: title, else node_type, else a
    /// literal placeholder.
    pub fn persisted_id(&self) -> String {
        if let Some(title) = self.title() {
            return title.to_string();
        }
        if !self.node_type.trim().is_empty() {
            return self.node_type.clone();
        }
        crate::constants::UNTITLED_NODE_ID.to_string()
    }

    pub fn set_config_key(&mut self, key: &str, value: Value) {
        if !self.config.is_object() {
            self.config = Value::Object(Map::new());
        }
        if let Some(map) = self.config.as_object_mut() {
            map.insert(key.to_string(), value);
        }
    }
}

/// A directed connection between two nodes, optionally pinned to schema
/// field handles on either end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowEdge {
    pub source_id: String,
    pub target_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

/// Workflow document as returned by `GET /api/workflows/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiWorkflow {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub definition: Value,
}

impl ApiWorkflow {
    /// Pull nodes out of the stored definition, keyed by their persisted id.
    pub fn nodes(&self) -> HashMap<String, WorkflowNode> {
        let mut out = HashMap::new();
        if let Some(nodes) = self.definition.get("nodes").and_then(Value::as_array) {
            for raw in nodes {
                let id = raw.get("id").and_then(Value::as_str).unwrap_or_default();
                if id.is_empty() {
                    continue;
                }
                let mut node = WorkflowNode::new(
                    id,
                    raw.get("node_type").and_then(Value::as_str).unwrap_or(""),
                );
                if let Some(cfg) = raw.get("config") {
                    node.config = cfg.clone();
                }
                if let Some(coords) = raw.get("coordinates") {
                    node.x = coords.get("x").and_then(Value::as_f64).unwrap_or(0.0);
                    node.y = coords.get("y").and_then(Value::as_f64).unwrap_or(0.0);
                }
                out.insert(id.to_string(), node);
            }
        }
        out
    }

    pub fn edges(&self) -> Vec<WorkflowEdge> {
        self.definition
            .get("links")
            .and_then(Value::as_array)
            .map(|links| {
                links
                    .iter()
                    .filter_map(|raw| serde_json::from_value(raw.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn test_inputs(&self) -> Vec<Value> {
        self.definition
            .get("test_inputs")
            .and_then(Value::as_array)
            .map(|a| a.to_vec())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Persistence payload (PUT /api/workflows/{id}).  The shape of these structs
// is pinned by contracts/workflow_update.schema.json; the coverage test in
// tests/payload_contract_coverage.rs keeps the two in sync.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodePayload {
    pub id: String,
    pub node_type: String,
    pub config: Value,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkPayload {
    pub source_id: String,
    pub target_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowDefinitionPayload {
    pub nodes: Vec<NodePayload>,
    pub links: Vec<LinkPayload>,
    pub test_inputs: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowUpdatePayload {
    pub name: String,
    pub description: String,
    pub definition: WorkflowDefinitionPayload,
}

// ---------------------------------------------------------------------------
// Credential slots
// ---------------------------------------------------------------------------

/// The three per-agent secret slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Bot,
    User,
    App,
}

impl TokenType {
    pub const ALL: [TokenType; 3] = [TokenType::Bot, TokenType::User, TokenType::App];

    /// Wire name used in token endpoints.
    pub fn wire_name(&self) -> &'static str {
        match self {
            TokenType::Bot => "bot_token",
            TokenType::User => "user_token",
            TokenType::App => "app_token",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TokenType::Bot => "Bot Token",
            TokenType::User => "User Token",
            TokenType::App => "App Token",
        }
    }
}

/// Response body of `GET /api/agents/{id}/tokens/{type}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenStatusResponse {
    pub masked_token: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn persisted_id_falls_back_title_then_type_then_untitled() {
        let mut node = WorkflowNode::new("n1", "http_request");
        assert_eq!(node.persisted_id(), "http_request");

        node.set_config_key("title", json!("Fetch orders"));
        assert_eq!(node.persisted_id(), "Fetch orders");

        node.set_config_key("title", json!("   "));
        assert_eq!(node.persisted_id(), "http_request");

        node.node_type = String::new();
        assert_eq!(node.persisted_id(), "Untitled");
    }

    #[test]
    fn link_payload_omits_absent_handles() {
        let link = LinkPayload {
            source_id: "a".into(),
            target_id: "b".into(),
            source_handle: None,
            target_handle: Some("result".into()),
        };
        let v = serde_json::to_value(&link).unwrap();
        assert!(v.get("source_handle").is_none());
        assert_eq!(v["target_handle"], "result");
    }

    #[test]
    fn api_workflow_definition_unpacks() {
        let wf = ApiWorkflow {
            id: 1,
            name: "wf".into(),
            description: None,
            definition: json!({
                "nodes": [
                    { "id": "fetch", "node_type": "http_request",
                      "config": { "title": "Fetch" },
                      "coordinates": { "x": 10.0, "y": 20.0 } }
                ],
                "links": [ { "source_id": "fetch", "target_id": "out" } ],
                "test_inputs": [ { "q": 1 } ]
            }),
        };
        let nodes = wf.nodes();
        assert_eq!(nodes["fetch"].x, 10.0);
        assert_eq!(wf.edges().len(), 1);
        assert_eq!(wf.test_inputs().len(), 1);
    }
}
