use serde::{Deserialize, Serialize};

/// A simulated counterpart a chat step can talk as. Owned outside the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(rename = "type", default)]
    pub persona_type: String,
    #[serde(default)]
    pub response_style: String,
    /// 1 (warm) to 10 (hostile).
    #[serde(default = "default_tone")]
    pub tone: u8,
    #[serde(default)]
    pub sample_responses: Vec<String>,
}

fn default_tone() -> u8 {
    5
}

impl Persona {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar_url: String::new(),
            persona_type: String::new(),
            response_style: String::new(),
            tone: default_tone(),
            sample_responses: Vec::new(),
        }
    }
}
