use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Server-assigned node id.
///
/// The feed is not consistent about sending ids as numbers or strings, so both
/// are accepted and compared by their textual form (`5 == "5"`). The original
/// JSON shape is kept when the id is echoed back in a [`Message`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Num(i64),
    Text(String),
}

impl NodeId {
    /// Form used in DOM ids and query strings.
    pub fn as_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Num(n) => write!(f, "{n}"),
            NodeId::Text(s) => f.write_str(s),
        }
    }
}

impl PartialEq for NodeId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NodeId::Num(a), NodeId::Num(b)) => a == b,
            (NodeId::Text(a), NodeId::Text(b)) => a == b,
            (NodeId::Num(n), NodeId::Text(s)) | (NodeId::Text(s), NodeId::Num(n)) => {
                s.trim().parse::<i64>().ok() == Some(*n)
            }
        }
    }
}

impl Eq for NodeId {}

impl Hash for NodeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // must agree with the loose PartialEq above
        match self {
            NodeId::Num(n) => n.hash(state),
            NodeId::Text(s) => match s.trim().parse::<i64>() {
                Ok(n) => n.hash(state),
                Err(_) => s.hash(state),
            },
        }
    }
}

impl From<i64> for NodeId {
    fn from(n: i64) -> Self {
        NodeId::Num(n)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId::Text(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId::Text(s)
    }
}

/// Outbound command envelope: `{type, data, id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: String,
    pub id: NodeId,
}

impl Message {
    pub const REGISTER: &'static str = "node";
    pub const LIGHT: &'static str = "light";

    pub fn new(kind: impl Into<String>, data: impl Into<String>, id: NodeId) -> Self {
        Self {
            kind: kind.into(),
            data: data.into(),
            id,
        }
    }

    /// Announces a node card to the server once the socket is open.
    pub fn register(id: NodeId) -> Self {
        Self::new(Self::REGISTER, "", id)
    }

    pub fn light_on(id: NodeId) -> Self {
        Self::new(Self::LIGHT, "on", id)
    }

    pub fn light_off(id: NodeId) -> Self {
        Self::new(Self::LIGHT, "off", id)
    }
}

/// Inbound feed frame. Only `id` and `type` are required; `value` is whatever
/// the node reported.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InboundFrame {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: Value,
}

impl InboundFrame {
    /// Numeric reading carried by the frame, if it has one.
    /// Digital states arrive as booleans and chart as 0/1.
    pub fn numeric_value(&self) -> Option<f64> {
        match &self.value {
            Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub id: NodeId,
    #[serde(default)]
    pub name: Option<String>,
}

impl NodeInfo {
    pub fn title(&self) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("Node {}", self.id),
        }
    }
}

/// Node list served to the dashboard on load (`GET /api/nodes`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NodeDirectory {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub nodes: Vec<NodeInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_compare_loosely() {
        assert_eq!(NodeId::Num(7), NodeId::from("7"));
        assert_eq!(NodeId::from("abc"), NodeId::from("abc"));
        assert_ne!(NodeId::Num(7), NodeId::from("07x"));
        assert_ne!(NodeId::Num(7), NodeId::Num(8));
    }

    #[test]
    fn light_commands_carry_node_id() {
        let on = serde_json::to_value(Message::light_on(NodeId::Num(3))).unwrap();
        assert_eq!(on, json!({"type": "light", "data": "on", "id": 3}));

        let off = serde_json::to_value(Message::light_off(NodeId::from("n-1"))).unwrap();
        assert_eq!(off, json!({"type": "light", "data": "off", "id": "n-1"}));
    }

    #[test]
    fn register_message_has_empty_data() {
        let m = Message::register(NodeId::Num(12));
        assert_eq!(m.kind, "node");
        assert_eq!(m.data, "");
    }

    #[test]
    fn frame_value_defaults_to_null() {
        let f: InboundFrame = serde_json::from_str(r#"{"id": 1, "type": "response"}"#).unwrap();
        assert_eq!(f.value, Value::Null);
        assert_eq!(f.numeric_value(), None);
    }

    #[test]
    fn numeric_value_accepts_numbers_bools_and_numeric_strings() {
        let frame = |v: Value| InboundFrame {
            id: NodeId::Num(1),
            kind: "ph".into(),
            value: v,
        };
        assert_eq!(frame(json!(6.5)).numeric_value(), Some(6.5));
        assert_eq!(frame(json!(true)).numeric_value(), Some(1.0));
        assert_eq!(frame(json!(false)).numeric_value(), Some(0.0));
        assert_eq!(frame(json!(" 21.25 ")).numeric_value(), Some(21.25));
        assert_eq!(frame(json!("warm")).numeric_value(), None);
        assert_eq!(frame(json!({"v": 1})).numeric_value(), None);
    }

    #[test]
    fn directory_parses_mixed_ids() {
        let dir: NodeDirectory = serde_json::from_value(json!({
            "user_id": "u9",
            "nodes": [{"id": 1, "name": "Greenhouse"}, {"id": "b2"}]
        }))
        .unwrap();
        assert_eq!(dir.nodes.len(), 2);
        assert_eq!(dir.nodes[0].title(), "Greenhouse");
        assert_eq!(dir.nodes[1].title(), "Node b2");
    }
}
