use crate::safe_display::SafeDisplay;

/// Malformed constructor document; surfaced before any I/O (spec §7 `ValidationError`).
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("duplicate identity {identity} among {kind} of component {component}")]
    DuplicateIdentity {
        component: String,
        kind: &'static str,
        identity: String,
    },
    #[error("{kind} {identity} of component {component} has neither access nor input")]
    MissingAccessOrInput {
        component: String,
        kind: &'static str,
        identity: String,
    },
    #[error("{kind} {identity} of component {component} has both access and input")]
    ConflictingAccessOrInput {
        component: String,
        kind: &'static str,
        identity: String,
    },
    #[error(
        "resource {identity} of component {component} has relation=external but also an input"
    )]
    ExternalRelationWithInput { component: String, identity: String },
    #[error("resource {identity} of component {component} has an access but no relation")]
    AccessWithoutRelation { component: String, identity: String },
    #[error("identity error in component {component}: {source}")]
    Identity {
        component: String,
        #[source]
        source: crate::identity::IdentityError,
    },
}

impl SafeDisplay for ValidationError {
    fn to_safe_string(&self) -> String {
        self.to_string()
    }
}
