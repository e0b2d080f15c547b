use crate::access_or_input::AccessOrInput;
use crate::meta::ElementMeta;
use serde::{Deserialize, Serialize};

/// `{elementMeta, type, sourceRefs[], accessOrInput}` — sources carry no `relation` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    #[serde(flatten)]
    pub meta: ElementMeta,
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(default)]
    pub source_refs: Vec<String>,
    #[serde(flatten)]
    pub access_or_input: AccessOrInput,
}
