use serde::{Deserialize, Serialize};

/// `{name, value, signing}`. `signing = true` means the label participates in signature
/// normalization (not otherwise interpreted by the construction engine itself).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub signing: bool,
}

impl Label {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            signing: false,
        }
    }
}
