//! Unit tests for the node model, input mapping, field validation, configuration and
//! persistence helpers.
mod common;
use common::*;
use simflow::error::{ConfigError, UnknownNodeKind};
use simflow::input::DragContext;
use simflow::persist::{load_personas_or_default, personas_from_json};
use simflow::prelude::*;
use simflow::validation::{FieldIssue, validate_graph, validate_persona};

fn fields(issues: &[FieldIssue]) -> Vec<&str> {
    issues.iter().map(|i| i.field.as_str()).collect()
}

#[test]
fn test_node_kind_identifiers_round_trip() {
    for kind in NodeKind::ALL {
        assert_eq!(kind.type_name().parse::<NodeKind>(), Ok(kind));
    }
    assert_eq!(
        "customNode".parse::<NodeKind>(),
        Err(UnknownNodeKind("customNode".to_string()))
    );
    assert_eq!(NodeKind::VoicePrompt.to_string(), "Voice Call");
}

#[test]
fn test_default_node_data() {
    let email = node("e", NodeKind::EmailPrompt);
    assert_eq!(email.data.label(), "Email Prompt");

    let response = node("r", NodeKind::Response);
    let data = response.as_response().expect("response data");
    assert_eq!(data.time_limit, 60);
    assert_eq!(data.response_type, ResponseType::Text);
    assert!(data.rules.is_empty());
    assert_eq!(data.active_fallback(), None);
}

#[test]
fn test_node_json_uses_editor_shape() {
    let node = chat_with_persona("chat-1", "persona-1");

    let json = serde_json::to_value(&node).expect("serializes");

    assert_eq!(
        json,
        serde_json::json!({
            "id": "chat-1",
            "type": "chatNode",
            "position": { "x": 0.0, "y": 0.0 },
            "data": { "label": "Chat", "personaId": "persona-1" }
        })
    );
}

#[test]
fn test_node_json_with_missing_data_gets_defaults() {
    let node: Node = serde_json::from_str(
        r#"{ "id": "v", "type": "voicePromptNode", "position": { "x": 1, "y": 2 } }"#,
    )
    .expect("data is optional");

    assert_eq!(node.kind(), NodeKind::VoicePrompt);
    assert_eq!(node.data.label(), "Voice Call");
    assert_eq!(node.position, Position::new(1.0, 2.0));

    let node: Node = serde_json::from_str(
        r#"{ "id": "r", "type": "responseNode", "data": { "timeLimit": null, "minLength": "12" } }"#,
    )
    .expect("blank form fields are tolerated");
    let data = node.as_response().expect("response data");
    assert_eq!(data.time_limit, 0);
    assert_eq!(data.min_length, Some(12));
}

#[test]
fn test_node_json_with_unknown_type_fails() {
    let result: Result<Node, _> =
        serde_json::from_str(r#"{ "id": "x", "type": "customNode", "data": {} }"#);

    let message = result.unwrap_err().to_string();
    assert!(message.contains("Unknown node kind 'customNode'"));
}

#[test]
fn test_rule_summaries_and_operator_options() {
    assert_eq!(
        Operator::allowed_for(ConditionType::TextLength),
        &[Operator::GreaterThan, Operator::LessThan, Operator::Equals]
    );
    assert_eq!(
        Operator::allowed_for(ConditionType::KeywordMatch),
        &[Operator::Contains, Operator::NotContains]
    );
    assert!(Operator::Equals.is_allowed_for(ConditionType::TimeTaken));
    assert!(!Operator::Contains.is_allowed_for(ConditionType::TimeTaken));

    let rule = Rule::new("r", ConditionType::TimeTaken, Operator::Equals, 30.0, "t");
    assert_eq!(rule.summary(), "Time Taken = 30");
    assert_eq!(RuleValue::from("42").as_number(), Some(42.0));
    assert!(RuleValue::Set(vec![]).is_empty());

    let huge = Rule::new("h", ConditionType::TimeTaken, Operator::GreaterThan, 1e20, "t");
    assert_eq!(huge.summary(), "Time Taken > 100000000000000000000");
    assert_eq!(RuleValue::Number(-12.0).to_string(), "-12");
    assert_eq!(RuleValue::Number(2.5).to_string(), "2.5");
}

#[test]
fn test_shortcut_mapping() {
    assert_eq!(Shortcut::from_chord(&KeyChord::ctrl('z')), Some(Shortcut::Undo));
    assert_eq!(Shortcut::from_chord(&KeyChord::cmd('Z').with_shift()), Some(Shortcut::Redo));
    assert_eq!(Shortcut::from_chord(&KeyChord::ctrl('y')), Some(Shortcut::Redo));
    assert_eq!(Shortcut::from_chord(&KeyChord::cmd('c')), Some(Shortcut::Copy));
    assert_eq!(Shortcut::from_chord(&KeyChord::ctrl('v')), Some(Shortcut::Paste));
    assert_eq!(Shortcut::from_chord(&KeyChord::new('v')), None);
    assert_eq!(Shortcut::from_chord(&KeyChord::new('z').with_shift()), None);
    assert!(!KeyOutcome::Ignored.prevents_default());
}

#[test]
fn test_drag_context_prefers_primary_payload() {
    let mut drag = DragContext::default();
    drag.begin("chatNode");

    assert_eq!(
        drag.resolve(&DropPayload::new("emailPromptNode")),
        Ok(Some(NodeKind::EmailPrompt))
    );
    assert_eq!(drag.pending(), Some("chatNode"));

    assert_eq!(
        drag.resolve(&DropPayload::new("  ")),
        Ok(Some(NodeKind::Chat))
    );
    assert_eq!(drag.pending(), None);
    assert_eq!(drag.resolve(&DropPayload::empty()), Ok(None));
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[test]
    fn test_fresh_email_prompt_reports_required_fields() {
        let issues = validate_node(&node("e", NodeKind::EmailPrompt));
        assert_eq!(fields(&issues), vec!["senderId", "subject", "body"]);
    }

    #[test]
    fn test_length_limits() {
        let mut email = EmailPromptData {
            sender_id: "hr".to_string(),
            subject: "s".repeat(200),
            body: "b".repeat(5000),
            ..Default::default()
        };
        let node_ok = Node::new("e", Position::default(), NodeData::EmailPrompt(email.clone()));
        assert!(validate_node(&node_ok).is_empty());

        email.subject.push('s');
        email.body.push('b');
        let node_long = Node::new("e", Position::default(), NodeData::EmailPrompt(email));
        let issues = validate_node(&node_long);
        assert_eq!(fields(&issues), vec!["subject", "body"]);
        assert!(issues[0].message.contains("200 characters or less"));

        let voice = VoicePromptData {
            script: "x".repeat(2001),
            voice_profile: "calm".to_string(),
            ..Default::default()
        };
        let voice = Node::new("v", Position::default(), NodeData::VoicePrompt(voice));
        assert_eq!(fields(&validate_node(&voice)), vec!["script"]);
    }

    #[test]
    fn test_response_checks() {
        let bad = response("r", |d| {
            d.time_limit = 3601;
            d.rules = vec![
                Rule::new("a", ConditionType::TextLength, Operator::Contains, 10.0, "t"),
                Rule::new("b", ConditionType::TimeTaken, Operator::LessThan, "soon", "t"),
                Rule::new(
                    "c",
                    ConditionType::KeywordMatch,
                    Operator::Contains,
                    Vec::<String>::new(),
                    "t",
                ),
            ];
        });

        let issues = validate_node(&bad);

        assert_eq!(
            fields(&issues),
            vec![
                "timeLimit",
                "rules[0].operator",
                "rules[1].value",
                "rules[2].value"
            ]
        );
        assert!(validate_node(&node("r", NodeKind::Response)).is_empty());
        assert!(validate_node(&node("c", NodeKind::Chat)).is_empty());
    }

    #[test]
    fn test_negative_numbers_are_reported() {
        let bad = response("r", |d| {
            d.time_limit = -10;
            d.min_length = Some(-5);
            d.max_length = Some(0);
        });

        let issues = validate_node(&bad);

        assert_eq!(fields(&issues), vec!["timeLimit", "minLength"]);
        assert_eq!(issues[0].message, "Time limit must be a positive number");
        assert_eq!(
            issues[1].message,
            "Minimum length must be a non-negative number"
        );

        let too_long = response("r", |d| d.time_limit = 3601);
        assert_eq!(
            validate_node(&too_long)[0].message,
            "Time limit cannot exceed 3600 seconds"
        );
    }

    #[test]
    fn test_validate_graph_walks_every_node() {
        let nodes = vec![
            node("e", NodeKind::EmailPrompt),
            node("c", NodeKind::Chat),
            node("v", NodeKind::VoicePrompt),
        ];

        let issues = validate_graph(&nodes);

        assert_eq!(issues.len(), 5);
        assert_eq!(issues[4].subject_id, "v");
        assert_eq!(issues[4].to_string(), "v.voiceProfile: Voice profile is required");
    }

    #[test]
    fn test_persona_checks() {
        let mut persona = Persona::new("p", "Calm customer");
        assert!(validate_persona(&persona).is_empty());

        persona.name = " ".to_string();
        persona.tone = 11;
        assert_eq!(fields(&validate_persona(&persona)), vec!["name", "tone"]);
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config =
            EditorConfig::from_json(r#"{ "maxHistory": 10, "pasteReferences": "remapInternal" }"#)
                .expect("valid config");

        assert_eq!(config.max_history, 10);
        assert_eq!(config.paste_references, PasteReferencePolicy::RemapInternal);
        assert_eq!(config.debounce_ms, 500);
        assert_eq!(config.paste_offset, Position::new(20.0, 20.0));
        assert!(!config.flush_on_teardown);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = EditorConfig::from_json(r#"{ "maxHistory": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "maxHistory", .. }));

        let err = EditorConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = EditorConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}

#[cfg(test)]
mod persistence_tests {
    use super::*;

    #[test]
    fn test_saved_canvas_parses() {
        let document = CanvasDocument::from_json(SAVED_CANVAS_JSON).expect("valid canvas");

        assert_eq!(document.simulation_name, "Refund escalation");
        assert_eq!(document.nodes.len(), 3);
        assert_eq!(document.edges.len(), 1);
        assert_eq!(document.edges[0].kind, EdgeKind::Explicit);

        let email = match &document.nodes[0].data {
            NodeData::EmailPrompt(data) => data,
            other => panic!("expected email data, got {:?}", other),
        };
        assert_eq!(email.sender_id, "hr");

        let response = document.nodes[1].as_response().expect("response data");
        assert_eq!(response.time_limit, 90);
        assert_eq!(response.rules[1].logic, Some(RuleLogic::Or));
        assert_eq!(
            response.rules[1].value,
            RuleValue::Set(vec!["refund".to_string(), "manager".to_string()])
        );
        assert!(document.nodes[2].selected);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let document = CanvasDocument::from_json("{}").expect("every field is optional");

        assert!(document.nodes.is_empty());
        assert_eq!(document.simulation_name, DEFAULT_SIMULATION_NAME);
    }

    #[test]
    fn test_load_or_default_swallows_bad_input() {
        let document = CanvasDocument::load_or_default(Some("{ \"nodes\": 7 }"));
        assert!(document.nodes.is_empty());
        assert_eq!(document.simulation_name, DEFAULT_SIMULATION_NAME);

        let document = CanvasDocument::load_or_default(Some(SAVED_CANVAS_JSON));
        assert_eq!(document.nodes.len(), 3);
    }

    #[test]
    fn test_negative_fields_keep_the_canvas() {
        let document = CanvasDocument::load_or_default(Some(CANVAS_WITH_NEGATIVE_FIELDS_JSON));

        assert_eq!(document.simulation_name, "Negative fields");
        assert_eq!(document.nodes.len(), 2);
        assert_eq!(document.edges.len(), 1);

        let data = document.nodes[1].as_response().expect("response data");
        assert_eq!(data.time_limit, -10);
        assert_eq!(data.min_length, Some(-5));
        assert_eq!(data.max_length, Some(40));

        let issues = validate_graph(&document.nodes);
        assert_eq!(
            fields(&issues),
            vec!["callDuration", "timeLimit", "minLength"]
        );
        assert_eq!(issues[0].subject_id, "voice-1");
    }

    #[test]
    fn test_unknown_node_kinds_are_skipped() {
        let document = CanvasDocument::from_json(CANVAS_WITH_UNKNOWN_KIND_JSON)
            .expect("readable nodes are kept");

        let ids: Vec<&str> = document.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["email-1", "response-1"]);
        assert_eq!(document.edges.len(), 2);
        assert_eq!(document.simulation_name, "Escalation draft");
    }

    #[test]
    fn test_save_and_reload_file() {
        let path = std::env::temp_dir().join(format!("simflow-{}.json", std::process::id()));
        let document = CanvasDocument::from_json(SAVED_CANVAS_JSON).unwrap();

        document.save(&path).expect("temp dir is writable");
        let reloaded = CanvasDocument::from_file(&path).expect("file was just written");
        std::fs::remove_file(&path).ok();

        assert_eq!(reloaded, document);
        assert!(matches!(
            CanvasDocument::from_file(&path),
            Err(PersistError::Io { .. })
        ));
    }

    #[test]
    fn test_personas_parse_with_defaults() {
        let personas = personas_from_json(PERSONAS_JSON).expect("valid personas");

        assert_eq!(personas.len(), 2);
        assert_eq!(personas[0].persona_type, "customer");
        assert_eq!(personas[0].tone, 9);
        assert_eq!(personas[1].avatar_url, "");
        assert!(personas[1].sample_responses.is_empty());

        assert!(load_personas_or_default(Some("[{]")).is_empty());
        assert!(load_personas_or_default(None).is_empty());
    }
}
