use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ParseOptions {
    pub disambiguation: Disambiguation,
    pub limits: Limits,
}

/// What happens when a message that started like a request fails to parse as one.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Disambiguation {
    /// The first token decides the message kind and errors propagate.
    #[default]
    Committed,
    /// Buffer the whole input and reread it as a Simple-Response on a grammar error.
    Fallback,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Limits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_head_bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_body_bytes: Option<usize>,
}
