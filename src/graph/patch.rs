use crate::model::{ChoiceOption, NodeData, NodeKind, ResponseType, Rule};

// Partial updates. `None` leaves a field untouched; for optional fields `Some(None)` clears it.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmailPromptPatch {
    pub label: Option<String>,
    pub sender_id: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoicePromptPatch {
    pub label: Option<String>,
    pub script: Option<String>,
    pub voice_profile: Option<String>,
    pub call_duration: Option<Option<i64>>,
    pub call_sentiment: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatPatch {
    pub label: Option<String>,
    pub persona_id: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponsePatch {
    pub label: Option<String>,
    pub time_limit: Option<i64>,
    pub response_type: Option<ResponseType>,
    pub min_length: Option<Option<i64>>,
    pub max_length: Option<Option<i64>>,
    pub keywords: Option<Vec<String>>,
    pub options: Option<Vec<ChoiceOption>>,
    pub has_fallback: Option<bool>,
    pub fallback_node_id: Option<Option<String>>,
    pub rules: Option<Vec<Rule>>,
}

/// A property edit for one node. The variant must match the node's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum NodePatch {
    EmailPrompt(EmailPromptPatch),
    VoicePrompt(VoicePromptPatch),
    Chat(ChatPatch),
    Response(ResponsePatch),
}

impl NodePatch {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodePatch::EmailPrompt(_) => NodeKind::EmailPrompt,
            NodePatch::VoicePrompt(_) => NodeKind::VoicePrompt,
            NodePatch::Chat(_) => NodeKind::Chat,
            NodePatch::Response(_) => NodeKind::Response,
        }
    }

    /// Rules this patch would install, if any.
    pub(crate) fn rules(&self) -> Option<&[Rule]> {
        match self {
            NodePatch::Response(p) => p.rules.as_deref(),
            _ => None,
        }
    }

    /// Applies the patch. Fails with the data's actual kind when the variants differ.
    pub(crate) fn apply(self, data: &mut NodeData) -> Result<(), NodeKind> {
        match (self, data) {
            (NodePatch::EmailPrompt(p), NodeData::EmailPrompt(d)) => {
                set(&mut d.label, p.label);
                set(&mut d.sender_id, p.sender_id);
                set(&mut d.subject, p.subject);
                set(&mut d.body, p.body);
            }
            (NodePatch::VoicePrompt(p), NodeData::VoicePrompt(d)) => {
                set(&mut d.label, p.label);
                set(&mut d.script, p.script);
                set(&mut d.voice_profile, p.voice_profile);
                set(&mut d.call_duration, p.call_duration);
                set(&mut d.call_sentiment, p.call_sentiment);
            }
            (NodePatch::Chat(p), NodeData::Chat(d)) => {
                set(&mut d.label, p.label);
                set(&mut d.persona_id, p.persona_id);
            }
            (NodePatch::Response(p), NodeData::Response(d)) => {
                set(&mut d.label, p.label);
                set(&mut d.time_limit, p.time_limit);
                set(&mut d.response_type, p.response_type);
                set(&mut d.min_length, p.min_length);
                set(&mut d.max_length, p.max_length);
                set(&mut d.keywords, p.keywords);
                set(&mut d.options, p.options);
                set(&mut d.has_fallback, p.has_fallback);
                set(&mut d.fallback_node_id, p.fallback_node_id);
                set(&mut d.rules, p.rules);
            }
            (_, other) => return Err(other.kind()),
        }
        Ok(())
    }
}

fn set<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}

impl From<EmailPromptPatch> for NodePatch {
    fn from(patch: EmailPromptPatch) -> Self {
        NodePatch::EmailPrompt(patch)
    }
}

impl From<VoicePromptPatch> for NodePatch {
    fn from(patch: VoicePromptPatch) -> Self {
        NodePatch::VoicePrompt(patch)
    }
}

impl From<ChatPatch> for NodePatch {
    fn from(patch: ChatPatch) -> Self {
        NodePatch::Chat(patch)
    }
}

impl From<ResponsePatch> for NodePatch {
    fn from(patch: ResponsePatch) -> Self {
        NodePatch::Response(patch)
    }
}
