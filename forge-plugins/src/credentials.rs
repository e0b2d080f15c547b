use async_trait::async_trait;
use forge_registry::{ConsumerIdentity, CredentialError, CredentialResolver, Credentials};
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;

/// A credential resolver backed by a fixed map, populated once at startup (e.g. from the CLI's
/// process environment). Looks up by the consumer identity's string form; `NotNeeded` never
/// reaches [`CredentialResolver::resolve`] because callers check it first.
pub struct StaticCredentialResolver {
    credentials: HashMap<String, Credentials>,
}

impl StaticCredentialResolver {
    pub fn new(credentials: HashMap<String, Credentials>) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl CredentialResolver for StaticCredentialResolver {
    async fn resolve(
        &self,
        identity: &ConsumerIdentity,
        cancellation: &CancellationToken,
    ) -> Result<Credentials, CredentialError> {
        if cancellation.is_cancelled() {
            return Err(CredentialError::Cancelled);
        }
        let key = identity.to_string();
        self.credentials
            .get(&key)
            .cloned()
            .ok_or(CredentialError::NotFound { identity: key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::assert;

    #[tokio::test]
    async fn resolves_a_known_identity() {
        let mut map = HashMap::new();
        let mut creds = Credentials::new();
        creds.insert("token".to_string(), "secret".to_string());
        map.insert("registry.example.com".to_string(), creds);
        let resolver = StaticCredentialResolver::new(map);

        let resolved = resolver
            .resolve(
                &ConsumerIdentity::Identity("registry.example.com".to_string()),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert!(resolved.get("token").map(String::as_str) == Some("secret"));
    }

    #[tokio::test]
    async fn unknown_identity_is_not_found() {
        let resolver = StaticCredentialResolver::new(HashMap::new());
        let err = resolver
            .resolve(
                &ConsumerIdentity::Identity("unknown".to_string()),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CredentialError::NotFound { .. }));
    }
}
