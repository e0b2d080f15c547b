use forge_model::SafeDisplay;
use forge_registry::RepositoryError;

/// Raised by [`crate::resolve::resolve`] when an identity is present neither in the
/// constructor document nor in any external repository (spec §8 invariant 10, scenario S6).
#[derive(Debug, Clone, thiserror::Error)]
pub enum DiscoveryError {
    #[error("cannot resolve id {identity}")]
    Unresolvable { identity: String },
    #[error("cannot resolve id {identity}: {source}")]
    ExternalLookupFailed {
        identity: String,
        #[source]
        source: RepositoryError,
    },
}

impl SafeDisplay for DiscoveryError {
    fn to_safe_string(&self) -> String {
        match self {
            DiscoveryError::Unresolvable { identity } => format!("cannot resolve id {identity}"),
            DiscoveryError::ExternalLookupFailed { identity, .. } => {
                format!("cannot resolve id {identity}")
            }
        }
    }
}
