//! Common test utilities for building canvases and sessions.
use simflow::prelude::*;
use std::sync::Arc;

/// A node of `kind` with default data at the origin.
#[allow(dead_code)]
pub fn node(id: &str, kind: NodeKind) -> Node {
    Node::with_defaults(id, kind, Position::default())
}

/// A response node whose data is shaped by `edit`.
#[allow(dead_code)]
pub fn response(id: &str, edit: impl FnOnce(&mut ResponseData)) -> Node {
    let mut data = ResponseData::default();
    edit(&mut data);
    Node::new(id, Position::default(), NodeData::Response(data))
}

#[allow(dead_code)]
pub fn chat_with_persona(id: &str, persona_id: &str) -> Node {
    Node::new(
        id,
        Position::default(),
        NodeData::Chat(ChatData {
            label: "Chat".to_string(),
            persona_id: Some(persona_id.to_string()),
        }),
    )
}

#[allow(dead_code)]
pub fn text_length_rule(id: &str, threshold: f64, target: &str) -> Rule {
    Rule::new(
        id,
        ConditionType::TextLength,
        Operator::GreaterThan,
        threshold,
        target,
    )
}

/// A small interview canvas:
///
/// ```text
/// email-1 --explicit--> response-1 --fallback--> chat-1
///                                  --rule r1 (Text Length > 50)--> voice-1
/// voice-1 --explicit--> response-2
/// ```
#[allow(dead_code)]
pub fn create_interview_graph() -> GraphStore {
    let mut store = GraphStore::new();
    let nodes = vec![
        node("email-1", NodeKind::EmailPrompt),
        response("response-1", |d| {
            d.has_fallback = true;
            d.fallback_node_id = Some("chat-1".to_string());
            d.rules = vec![text_length_rule("r1", 50.0, "voice-1")];
        }),
        node("chat-1", NodeKind::Chat),
        node("voice-1", NodeKind::VoicePrompt),
        node("response-2", NodeKind::Response),
    ];
    let edges = vec![
        Edge::explicit("e1", "email-1", "response-1"),
        Edge::explicit("e2", "voice-1", "response-2"),
    ];
    store
        .insert_all(nodes, edges)
        .expect("interview graph should be valid");
    store
}

/// A session driven by a manual clock, with the default configuration.
#[allow(dead_code)]
pub fn manual_session() -> (Session, Arc<ManualClock>) {
    manual_session_with(EditorConfig::default())
}

#[allow(dead_code)]
pub fn manual_session_with(config: EditorConfig) -> (Session, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let session = Session::builder()
        .config(config)
        .clock(clock.clone())
        .build();
    (session, clock)
}

/// The quiet period of the default configuration plus one millisecond.
#[allow(dead_code)]
pub fn past_quiet_period() -> std::time::Duration {
    std::time::Duration::from_millis(501)
}

/// A saved canvas in the node editor's JSON format.
#[allow(dead_code)]
pub const SAVED_CANVAS_JSON: &str = r#"{
  "nodes": [
    {
      "id": "emailPromptNode-1",
      "type": "emailPromptNode",
      "position": { "x": 100, "y": 50 },
      "data": { "label": "Email Prompt", "sender": "hr", "subject": "Welcome", "body": "Hi there" }
    },
    {
      "id": "responseNode-1",
      "type": "responseNode",
      "position": { "x": 100, "y": 250 },
      "data": {
        "label": "Response",
        "timeLimit": 90,
        "responseType": "text",
        "hasFallback": true,
        "fallbackNodeId": "chatNode-1",
        "rules": [
          { "id": "rule-1", "conditionType": "textLength", "operator": "greaterThan", "value": 50, "targetNodeId": "chatNode-1" },
          { "id": "rule-2", "conditionType": "keywordMatch", "operator": "contains", "value": ["refund", "manager"], "targetNodeId": "chatNode-1", "logic": "OR" }
        ]
      }
    },
    {
      "id": "chatNode-1",
      "type": "chatNode",
      "position": { "x": 400, "y": 250 },
      "data": { "label": "Chat", "personaId": "persona-angry" },
      "selected": true
    }
  ],
  "edges": [
    { "id": "edge-1", "source": "emailPromptNode-1", "target": "responseNode-1" }
  ],
  "simulationName": "Refund escalation",
  "timestamp": "2026-03-01T12:00:00Z"
}"#;

/// A canvas saved with values the properties panel accepts but validation flags.
#[allow(dead_code)]
pub const CANVAS_WITH_NEGATIVE_FIELDS_JSON: &str = r#"{
  "nodes": [
    { "id": "voice-1", "type": "voicePromptNode", "position": { "x": 0, "y": 0 },
      "data": { "script": "Hello", "voiceProfile": "calm", "callDuration": -3 } },
    { "id": "response-1", "type": "responseNode", "position": { "x": 0, "y": 200 },
      "data": { "timeLimit": -10, "minLength": -5, "maxLength": "40" } }
  ],
  "edges": [
    { "id": "e1", "source": "voice-1", "target": "response-1" }
  ],
  "simulationName": "Negative fields"
}"#;

/// A canvas holding a node kind this crate does not know.
#[allow(dead_code)]
pub const CANVAS_WITH_UNKNOWN_KIND_JSON: &str = r#"{
  "nodes": [
    { "id": "email-1", "type": "emailPromptNode", "position": { "x": 0, "y": 0 } },
    { "id": "fallback-1", "type": "customNode", "position": { "x": 200, "y": 100 },
      "data": { "label": "Fallback Node" } },
    { "id": "response-1", "type": "responseNode", "position": { "x": 0, "y": 200 },
      "data": { "hasFallback": true, "fallbackNodeId": "fallback-1" } }
  ],
  "edges": [
    { "id": "e1", "source": "email-1", "target": "response-1" },
    { "id": "e2", "source": "response-1", "target": "fallback-1" }
  ],
  "simulationName": "Escalation draft"
}"#;

#[allow(dead_code)]
pub const PERSONAS_JSON: &str = r#"[
  { "id": "persona-angry", "name": "Angry customer", "type": "customer", "tone": 9, "sampleResponses": ["This is unacceptable"] },
  { "id": "persona-calm", "name": "Calm customer", "tone": 2 }
]"#;
