use crate::identity::Identity;
use crate::label::Label;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Metadata shared by resources, sources, and references: name/version plus optional extra
/// identity keys and labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementMeta {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub extra_identity: IndexMap<String, String>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl ElementMeta {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            extra_identity: IndexMap::new(),
            labels: Vec::new(),
        }
    }

    pub fn identity(&self) -> Result<Identity, crate::identity::IdentityError> {
        Identity::with_extra(&self.name, &self.version, self.extra_identity.clone())
    }
}

/// Metadata carried by a component version: name/version/labels/creation-time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentMeta {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default = "Utc::now")]
    pub creation_time: DateTime<Utc>,
}

impl ComponentMeta {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            labels: Vec::new(),
            creation_time: Utc::now(),
        }
    }

    pub fn identity(&self) -> crate::identity::ComponentIdentity {
        crate::identity::ComponentIdentity::new(self.name.clone(), self.version.clone())
    }
}
