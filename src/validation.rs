//! Field-level checks the properties panel runs before a step is considered complete.
//!
//! Issues are reported, never enforced: the graph store accepts incomplete steps so the
//! user can fill them in over several edits.

use crate::model::{EmailPromptData, Node, NodeData, Persona, ResponseData, VoicePromptData};
use std::fmt;

pub const MAX_SUBJECT_LEN: usize = 200;
pub const MAX_BODY_LEN: usize = 5000;
pub const MAX_SCRIPT_LEN: usize = 2000;
pub const MAX_TIME_LIMIT: i64 = 3600;
pub const TONE_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

/// One problem with one field of a node or persona.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Id of the node or persona the field belongs to.
    pub subject_id: String,
    /// Field name as it appears in the JSON payload, e.g. `subject` or `rules[0].value`.
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    fn new(subject_id: &str, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.to_string(),
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.subject_id, self.field, self.message)
    }
}

pub fn validate_node(node: &Node) -> Vec<FieldIssue> {
    let mut issues = Vec::new();
    match &node.data {
        NodeData::EmailPrompt(data) => check_email(&node.id, data, &mut issues),
        NodeData::VoicePrompt(data) => check_voice(&node.id, data, &mut issues),
        NodeData::Chat(_) => {}
        NodeData::Response(data) => check_response(&node.id, data, &mut issues),
    }
    issues
}

/// Runs [`validate_node`] over every node, in node order.
pub fn validate_graph(nodes: &[Node]) -> Vec<FieldIssue> {
    nodes.iter().flat_map(validate_node).collect()
}

pub fn validate_persona(persona: &Persona) -> Vec<FieldIssue> {
    let mut issues = Vec::new();
    if persona.name.trim().is_empty() {
        issues.push(FieldIssue::new(&persona.id, "name", "Name is required"));
    }
    if !TONE_RANGE.contains(&persona.tone) {
        issues.push(FieldIssue::new(
            &persona.id,
            "tone",
            format!(
                "Tone must be between {} and {}",
                TONE_RANGE.start(),
                TONE_RANGE.end()
            ),
        ));
    }
    issues
}

fn check_email(id: &str, data: &EmailPromptData, issues: &mut Vec<FieldIssue>) {
    if data.sender_id.trim().is_empty() {
        issues.push(FieldIssue::new(id, "senderId", "Sender is required"));
    }
    check_text(id, "subject", "Subject", &data.subject, MAX_SUBJECT_LEN, issues);
    check_text(id, "body", "Body", &data.body, MAX_BODY_LEN, issues);
}

fn check_voice(id: &str, data: &VoicePromptData, issues: &mut Vec<FieldIssue>) {
    check_text(id, "script", "Script", &data.script, MAX_SCRIPT_LEN, issues);
    if data.voice_profile.trim().is_empty() {
        issues.push(FieldIssue::new(id, "voiceProfile", "Voice profile is required"));
    }
    check_non_negative(id, "callDuration", "Call duration", data.call_duration, issues);
}

fn check_response(id: &str, data: &ResponseData, issues: &mut Vec<FieldIssue>) {
    if data.time_limit <= 0 {
        issues.push(FieldIssue::new(
            id,
            "timeLimit",
            "Time limit must be a positive number",
        ));
    } else if data.time_limit > MAX_TIME_LIMIT {
        issues.push(FieldIssue::new(
            id,
            "timeLimit",
            format!("Time limit cannot exceed {} seconds", MAX_TIME_LIMIT),
        ));
    }
    check_non_negative(id, "minLength", "Minimum length", data.min_length, issues);
    check_non_negative(id, "maxLength", "Maximum length", data.max_length, issues);

    for (i, rule) in data.rules.iter().enumerate() {
        if let Err(message) = rule.check_operator() {
            issues.push(FieldIssue::new(id, format!("rules[{}].operator", i), message));
        }
        if rule.condition_type.is_numeric() {
            if rule.value.as_number().is_none() {
                issues.push(FieldIssue::new(
                    id,
                    format!("rules[{}].value", i),
                    format!("{} needs a numeric value", rule.condition_type),
                ));
            }
        } else if rule.value.is_empty() {
            issues.push(FieldIssue::new(
                id,
                format!("rules[{}].value", i),
                "At least one keyword is required",
            ));
        }
    }
}

fn check_non_negative(
    id: &str,
    field: &str,
    name: &str,
    value: Option<i64>,
    issues: &mut Vec<FieldIssue>,
) {
    if value.is_some_and(|v| v < 0) {
        issues.push(FieldIssue::new(
            id,
            field,
            format!("{} must be a non-negative number", name),
        ));
    }
}

fn check_text(
    id: &str,
    field: &str,
    name: &str,
    value: &str,
    max_len: usize,
    issues: &mut Vec<FieldIssue>,
) {
    if value.trim().is_empty() {
        issues.push(FieldIssue::new(id, field, format!("{} is required", name)));
    } else if value.chars().count() > max_len {
        issues.push(FieldIssue::new(
            id,
            field,
            format!("{} must be {} characters or less", name, max_len),
        ));
    }
}
