use serde::Deserialize;

// clients send category ids either as numbers or as strings, depending on
// which form produced them
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LooseText {
    Number(i64),
    Text(String),
}

impl LooseText {
    /// Zero and the empty string count as "not provided".
    pub fn is_truthy(&self) -> bool {
        match self {
            LooseText::Number(n) => *n != 0,
            LooseText::Text(s) => !s.is_empty(),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            LooseText::Number(n) => n.to_string(),
            LooseText::Text(s) => s,
        }
    }
}
