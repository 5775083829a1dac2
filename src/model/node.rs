use super::rule::Rule;
use crate::error::UnknownNodeKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four kinds of workflow step. A node's kind never changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    EmailPrompt,
    VoicePrompt,
    Chat,
    Response,
}

impl NodeKind {
    pub const ALL: [NodeKind; 4] = [
        NodeKind::EmailPrompt,
        NodeKind::VoicePrompt,
        NodeKind::Chat,
        NodeKind::Response,
    ];

    /// The identifier used by the node editor, in drop payloads and in persisted JSON.
    pub fn type_name(self) -> &'static str {
        match self {
            NodeKind::EmailPrompt => "emailPromptNode",
            NodeKind::VoicePrompt => "voicePromptNode",
            NodeKind::Chat => "chatNode",
            NodeKind::Response => "responseNode",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            NodeKind::EmailPrompt => "Email Prompt",
            NodeKind::VoicePrompt => "Voice Call",
            NodeKind::Chat => "Chat",
            NodeKind::Response => "Response",
        }
    }

    /// Email and voice prompts are the step kinds whose outgoing connections are restricted.
    pub fn is_prompt(self) -> bool {
        matches!(self, NodeKind::EmailPrompt | NodeKind::VoicePrompt)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for NodeKind {
    type Err = UnknownNodeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .into_iter()
            .find(|kind| kind.type_name() == s)
            .ok_or_else(|| UnknownNodeKind(s.to_string()))
    }
}

/// A canvas coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, by: Position) -> Self {
        Self {
            x: self.x + by.x,
            y: self.y + by.y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailPromptData {
    pub label: String,
    #[serde(alias = "sender")]
    pub sender_id: String,
    pub subject: String,
    pub body: String,
}

impl Default for EmailPromptData {
    fn default() -> Self {
        Self {
            label: NodeKind::EmailPrompt.display_name().to_string(),
            sender_id: String::new(),
            subject: String::new(),
            body: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VoicePromptData {
    pub label: String,
    pub script: String,
    pub voice_profile: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_int"
    )]
    pub call_duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_sentiment: Option<String>,
}

impl Default for VoicePromptData {
    fn default() -> Self {
        Self {
            label: NodeKind::VoicePrompt.display_name().to_string(),
            script: String::new(),
            voice_profile: String::new(),
            call_duration: None,
            call_sentiment: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatData {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona_id: Option<String>,
}

impl Default for ChatData {
    fn default() -> Self {
        Self {
            label: NodeKind::Chat.display_name().to_string(),
            persona_id: None,
        }
    }
}

/// How a candidate answers a response step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseType {
    #[default]
    Text,
    Keywords,
    MultipleChoice,
}

/// One answer of a multiple-choice response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceOption {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_node_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseData {
    pub label: String,
    /// Seconds the candidate has to answer. Out-of-range values are kept and reported by
    /// validation; an unreadable value loads as 0.
    #[serde(deserialize_with = "lenient_time_limit")]
    pub time_limit: i64,
    pub response_type: ResponseType,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_int"
    )]
    pub min_length: Option<i64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_int"
    )]
    pub max_length: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,
    pub has_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_node_id: Option<String>,
    pub rules: Vec<Rule>,
}

impl Default for ResponseData {
    fn default() -> Self {
        Self {
            label: NodeKind::Response.display_name().to_string(),
            time_limit: 60,
            response_type: ResponseType::Text,
            min_length: None,
            max_length: None,
            keywords: Vec::new(),
            options: Vec::new(),
            has_fallback: false,
            fallback_node_id: None,
            rules: Vec::new(),
        }
    }
}

impl ResponseData {
    /// The fallback target, only when the fallback switch is on.
    pub fn active_fallback(&self) -> Option<&str> {
        if self.has_fallback {
            self.fallback_node_id.as_deref()
        } else {
            None
        }
    }
}

/// Reads an integer form field the way the editor stores it: a number, a numeric string,
/// or `null` when the input was blank or unparsable.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

fn lenient_time_limit<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(lenient_int(deserializer)?.unwrap_or(0))
}

/// Kind-specific node payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NodeData {
    EmailPrompt(EmailPromptData),
    VoicePrompt(VoicePromptData),
    Chat(ChatData),
    Response(ResponseData),
}

impl NodeData {
    pub fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::EmailPrompt => NodeData::EmailPrompt(EmailPromptData::default()),
            NodeKind::VoicePrompt => NodeData::VoicePrompt(VoicePromptData::default()),
            NodeKind::Chat => NodeData::Chat(ChatData::default()),
            NodeKind::Response => NodeData::Response(ResponseData::default()),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::EmailPrompt(_) => NodeKind::EmailPrompt,
            NodeData::VoicePrompt(_) => NodeKind::VoicePrompt,
            NodeData::Chat(_) => NodeKind::Chat,
            NodeData::Response(_) => NodeKind::Response,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            NodeData::EmailPrompt(d) => &d.label,
            NodeData::VoicePrompt(d) => &d.label,
            NodeData::Chat(d) => &d.label,
            NodeData::Response(d) => &d.label,
        }
    }

    /// Parses the payload of a node whose kind is already known.
    pub fn from_json(kind: NodeKind, value: serde_json::Value) -> Result<Self, serde_json::Error> {
        if value.is_null() {
            return Ok(Self::default_for(kind));
        }
        Ok(match kind {
            NodeKind::EmailPrompt => NodeData::EmailPrompt(serde_json::from_value(value)?),
            NodeKind::VoicePrompt => NodeData::VoicePrompt(serde_json::from_value(value)?),
            NodeKind::Chat => NodeData::Chat(serde_json::from_value(value)?),
            NodeKind::Response => NodeData::Response(serde_json::from_value(value)?),
        })
    }
}

/// A workflow step placed on the canvas.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawNode")]
pub struct Node {
    pub id: String,
    pub position: Position,
    pub selected: bool,
    pub data: NodeData,
}

impl Node {
    pub fn new(id: impl Into<String>, position: Position, data: NodeData) -> Self {
        Self {
            id: id.into(),
            position,
            selected: false,
            data,
        }
    }

    /// A node of the given kind carrying the same defaults a freshly dropped node gets.
    pub fn with_defaults(id: impl Into<String>, kind: NodeKind, position: Position) -> Self {
        Self::new(id, position, NodeData::default_for(kind))
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    pub fn as_response(&self) -> Option<&ResponseData> {
        match &self.data {
            NodeData::Response(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_chat(&self) -> Option<&ChatData> {
        match &self.data {
            NodeData::Chat(d) => Some(d),
            _ => None,
        }
    }
}

/// The editor's JSON shape: `{ id, type, position, data, selected }`.
#[derive(Deserialize)]
struct RawNode {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    position: Position,
    #[serde(default)]
    data: serde_json::Value,
    #[serde(default)]
    selected: bool,
}

impl TryFrom<RawNode> for Node {
    type Error = String;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let kind: NodeKind = raw.kind.parse().map_err(|e: UnknownNodeKind| e.to_string())?;
        let data = NodeData::from_json(kind, raw.data)
            .map_err(|e| format!("Invalid data for node '{}': {}", raw.id, e))?;
        Ok(Node {
            id: raw.id,
            position: raw.position,
            selected: raw.selected,
            data,
        })
    }
}

#[derive(Serialize)]
struct NodeView<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    position: Position,
    data: &'a NodeData,
    #[serde(skip_serializing_if = "is_false")]
    selected: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Serialize for Node {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        NodeView {
            id: &self.id,
            kind: self.kind().type_name(),
            position: self.position,
            data: &self.data,
            selected: self.selected,
        }
        .serialize(serializer)
    }
}
