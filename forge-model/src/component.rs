use crate::label::Label;
use crate::meta::ComponentMeta;
use crate::reference::Reference;
use crate::resource::Resource;
use crate::source::Source;
use serde::{Deserialize, Serialize};

/// A labeled name; used for `Component::provider`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub name: String,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl Provider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: Vec::new(),
        }
    }
}

/// `{meta, provider, resources[], sources[], references[]}`.
///
/// Each collection's elements must have unique identities within that collection — enforced by
/// [`crate::validate::validate_component`], not by this type itself (construction from a
/// constructor document always goes through validation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    #[serde(flatten)]
    pub meta: ComponentMeta,
    pub provider: Provider,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default, rename = "componentReferences")]
    pub references: Vec<Reference>,
}

impl Component {
    pub fn identity(&self) -> crate::identity::ComponentIdentity {
        self.meta.identity()
    }
}
