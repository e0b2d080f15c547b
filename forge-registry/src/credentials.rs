use std::collections::HashMap;
use std::fmt;

/// A resolved credential map, opaque to the engine beyond being handed to the plug-in that
/// requested it.
pub type Credentials = HashMap<String, String>;

/// The structured key a plug-in uses to ask the credential resolver for credentials. Returned
/// by `GetResourceCredentialConsumerIdentity` and friends (spec §6).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConsumerIdentity {
    /// The plug-in needs no credentials; the resolver is never consulted.
    NotNeeded,
    Identity(String),
}

impl fmt::Display for ConsumerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsumerIdentity::NotNeeded => write!(f, "<none>"),
            ConsumerIdentity::Identity(id) => write!(f, "{id}"),
        }
    }
}
