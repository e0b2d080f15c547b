use forge_model::{SafeDisplay, ValidationError};
use forge_registry::{CredentialError, DigestError, InputMethodError, RegistryError, RepositoryError};

/// The construction engine's top-level error type (spec §7). Each boundary crate's own error
/// composes in via `#[from]`; `anyhow::Error` is reserved for the CLI binary edge and never
/// appears here.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("reference cycle detected among: {}", participants.join(" -> "))]
    Cycle { participants: Vec<String> },

    #[error("vertex {vertex} is missing a descriptor for dependency {missing}")]
    MissingDependency { vertex: String, missing: String },

    #[error(transparent)]
    Resolve(#[from] forge_discovery::DiscoveryError),

    #[error(transparent)]
    InputMethod(#[from] InputMethodError),

    #[error("resource or source {identity} has no access after input processing")]
    MissingAccess { identity: String },

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Digest(#[from] DigestError),

    #[error("an input method did not return a processed resource or blob for {identity}")]
    NoProcessedOutput { identity: String },

    #[error("construction was cancelled")]
    Cancelled,

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl From<forge_graph::GraphError> for EngineError {
    fn from(source: forge_graph::GraphError) -> Self {
        match source {
            forge_graph::GraphError::Cycle { participants } => EngineError::Cycle { participants },
            forge_graph::GraphError::VertexNotFound { id } => EngineError::Internal {
                message: format!("vertex {id} not found"),
            },
            forge_graph::GraphError::AttributeAlreadySet { vertex, key } => {
                EngineError::Internal {
                    message: format!("attribute {key} of vertex {vertex} was already set"),
                }
            }
        }
    }
}

impl SafeDisplay for EngineError {
    fn to_safe_string(&self) -> String {
        match self {
            EngineError::Validation(e) => e.to_safe_string(),
            EngineError::Cycle { .. } => "a reference cycle was detected".to_string(),
            EngineError::MissingDependency { .. } => {
                "an internal dependency-ordering invariant was violated".to_string()
            }
            EngineError::Resolve(e) => e.to_safe_string(),
            EngineError::InputMethod(e) => e.to_safe_string(),
            EngineError::MissingAccess { .. } => {
                "an element was left without an access after processing".to_string()
            }
            EngineError::Repository(e) => e.to_safe_string(),
            EngineError::Registry(e) => e.to_safe_string(),
            EngineError::Credential(e) => e.to_safe_string(),
            EngineError::Digest(e) => e.to_safe_string(),
            EngineError::NoProcessedOutput { .. } => {
                "an input method produced no usable output".to_string()
            }
            EngineError::Cancelled => "construction was cancelled".to_string(),
            EngineError::Internal { .. } => "an internal error occurred".to_string(),
        }
    }
}
