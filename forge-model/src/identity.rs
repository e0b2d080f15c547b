use indexmap::IndexMap;
use std::fmt;

/// Reserved identity keys that every non-component element carries implicitly.
pub const NAME_KEY: &str = "name";
pub const VERSION_KEY: &str = "version";

/// An ordered mapping of string keys to string values that always contains `name` and `version`,
/// plus optional extra identity keys. Identities are compared by canonical serialization of their
/// key/value pairs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    // Keys other than `name`/`version`, kept in insertion order; `name` and `version` are stored
    // separately so they can never collide with extra identity.
    name: String,
    version: String,
    extra: IndexMap<String, String>,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("extra identity must not contain a reserved key: {0}")]
    ReservedKey(String),
}

impl Identity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            extra: IndexMap::new(),
        }
    }

    pub fn with_extra(
        name: impl Into<String>,
        version: impl Into<String>,
        extra: IndexMap<String, String>,
    ) -> Result<Self, IdentityError> {
        if extra.contains_key(NAME_KEY) {
            return Err(IdentityError::ReservedKey(NAME_KEY.to_string()));
        }
        if extra.contains_key(VERSION_KEY) {
            return Err(IdentityError::ReservedKey(VERSION_KEY.to_string()));
        }
        Ok(Self {
            name: name.into(),
            version: version.into(),
            extra,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn extra(&self) -> &IndexMap<String, String> {
        &self.extra
    }

    /// Canonical string form used as the DAG's vertex key and for identity comparison:
    /// `name:version` followed by sorted `key=value` extra identity pairs.
    pub fn canonical(&self) -> String {
        let mut buf = format!("{}:{}", self.name, self.version);
        let mut extras: Vec<(&String, &String)> = self.extra.iter().collect();
        extras.sort_by(|a, b| a.0.cmp(b.0));
        for (k, v) in extras {
            buf.push(',');
            buf.push_str(k);
            buf.push('=');
            buf.push_str(v);
        }
        buf
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

/// A component identity is `{name, version}` only — no extra identity keys are permitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentIdentity {
    pub name: String,
    pub version: String,
}

impl ComponentIdentity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    pub fn canonical(&self) -> String {
        format!("{}:{}", self.name, self.version)
    }
}

impl fmt::Display for ComponentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::assert;

    #[test]
    fn canonical_is_stable_regardless_of_extra_insertion_order() {
        let mut a = IndexMap::new();
        a.insert("arch".to_string(), "amd64".to_string());
        a.insert("os".to_string(), "linux".to_string());

        let mut b = IndexMap::new();
        b.insert("os".to_string(), "linux".to_string());
        b.insert("arch".to_string(), "amd64".to_string());

        let id_a = Identity::with_extra("demo", "v1.0.0", a).unwrap();
        let id_b = Identity::with_extra("demo", "v1.0.0", b).unwrap();

        assert!(id_a.canonical() == id_b.canonical());
    }

    #[test]
    fn extra_identity_rejects_reserved_keys() {
        let mut extra = IndexMap::new();
        extra.insert(NAME_KEY.to_string(), "oops".to_string());
        let err = Identity::with_extra("demo", "v1.0.0", extra).unwrap_err();
        assert!(err == IdentityError::ReservedKey(NAME_KEY.to_string()));
    }
}
