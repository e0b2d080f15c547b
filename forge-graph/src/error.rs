/// Raised by [`crate::dag::Dag`] operations.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("reference cycle detected among: {}", participants.join(" -> "))]
    Cycle { participants: Vec<String> },
    #[error("vertex {id} not found")]
    VertexNotFound { id: String },
    #[error("attribute {key} of vertex {vertex} was already set")]
    AttributeAlreadySet { vertex: String, key: &'static str },
}
