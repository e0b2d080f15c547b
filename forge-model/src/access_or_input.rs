use crate::typed_spec::TypedSpec;
use serde::{Deserialize, Serialize};

/// A tagged union with exactly one side populated. Both missing or both present is a validation
/// error (see [`crate::error::ValidationError`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AccessOrInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<TypedSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<TypedSpec>,
}

impl AccessOrInput {
    pub fn access(spec: TypedSpec) -> Self {
        Self {
            access: Some(spec),
            input: None,
        }
    }

    pub fn input(spec: TypedSpec) -> Self {
        Self {
            access: None,
            input: Some(spec),
        }
    }

    pub fn is_access(&self) -> bool {
        self.access.is_some()
    }

    pub fn is_input(&self) -> bool {
        self.input.is_some()
    }

    /// `Ok(())` iff exactly one side is populated.
    pub fn validate(&self) -> Result<(), AccessOrInputError> {
        match (&self.access, &self.input) {
            (None, None) => Err(AccessOrInputError::Neither),
            (Some(_), Some(_)) => Err(AccessOrInputError::Both),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AccessOrInputError {
    #[error("neither access nor input is set")]
    Neither,
    #[error("both access and input are set")]
    Both,
}
