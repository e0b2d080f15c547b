use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The versioned type tag carried by every opaque typed spec (`{name, version}`).
///
/// Registries (forge-registry) dispatch on this tag after alias/default resolution; the payload
/// itself is never interpreted by the core engine, only by the plug-in that owns the tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypedTag {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl TypedTag {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Some(version.into()),
        }
    }

    pub fn unversioned(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }
}

impl fmt::Display for TypedTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}/{}", self.name, v),
            None => write!(f, "{}", self.name),
        }
    }
}

/// An opaque typed specification: a type tag plus a plug-in-owned payload. Used for both
/// `access` and `input` variants of [`crate::AccessOrInput`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedSpec {
    #[serde(rename = "type")]
    pub tag: TypedTag,
    #[serde(flatten)]
    pub payload: Value,
}

impl TypedSpec {
    pub fn new(tag: TypedTag, payload: Value) -> Self {
        Self { tag, payload }
    }
}
