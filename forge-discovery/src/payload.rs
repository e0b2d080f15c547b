use forge_model::{Component, Descriptor};

/// What [`crate::resolve::resolve`] found for a vertex identity: either a component still
/// awaiting construction (from the constructor document) or an already-published descriptor
/// fetched from an external repository (spec §4.3, C4 `Resolve`).
#[derive(Debug, Clone)]
pub enum VertexPayload {
    Constructor(Component),
    External(Descriptor),
}

impl VertexPayload {
    pub fn is_external(&self) -> bool {
        matches!(self, VertexPayload::External(_))
    }

    pub fn component(&self) -> &Component {
        match self {
            VertexPayload::Constructor(c) => c,
            VertexPayload::External(d) => &d.component,
        }
    }
}
