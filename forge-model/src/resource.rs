use crate::access_or_input::AccessOrInput;
use crate::meta::ElementMeta;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Relation {
    Local,
    External,
}

/// `{elementMeta, type, relation, sourceRefs[], accessOrInput}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    #[serde(flatten)]
    pub meta: ElementMeta,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub relation: Option<Relation>,
    #[serde(default)]
    pub source_refs: Vec<String>,
    #[serde(flatten)]
    pub access_or_input: AccessOrInput,
}
