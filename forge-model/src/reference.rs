use crate::meta::ElementMeta;
use serde::{Deserialize, Serialize};

/// `{elementMeta, component}` — `component` is the target component's name; version is carried
/// in `elementMeta.version`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    #[serde(flatten)]
    pub meta: ElementMeta,
    pub component: String,
}

impl Reference {
    /// The identity of the referenced component version.
    pub fn target_identity(&self) -> crate::identity::ComponentIdentity {
        crate::identity::ComponentIdentity::new(self.component.clone(), self.meta.version.clone())
    }
}
