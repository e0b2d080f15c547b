use crate::component::Component;
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: &str = "v2";

/// A signature entry carried by a descriptor. Signing and signature verification are explicit
/// non-goals of the construction engine (see spec §1); this type exists only so a descriptor can
/// round-trip a `signatures` list it did not itself produce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    pub digest: String,
    pub signature: String,
    #[serde(default)]
    pub media_type: Option<String>,
}

/// The published, normalized form of a component version produced by the engine. Exactly one
/// descriptor exists per constructed or copied DAG vertex.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Descriptor {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    pub component: Component,
    #[serde(default)]
    pub signatures: Vec<Signature>,
}

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

impl Descriptor {
    pub fn new(component: Component) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            component,
            signatures: Vec::new(),
        }
    }

    pub fn identity(&self) -> crate::identity::ComponentIdentity {
        self.component.identity()
    }
}
