use async_trait::async_trait;
use bytes::Bytes;
use forge_model::{Blob, Resource};
use forge_registry::{
    ConsumerIdentity, Credentials, RepositoryError, ResourceRepository, ResourceRepositoryProvider,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// A by-value resource repository backed by an in-memory map keyed by resource identity,
/// standing in for a real artifact store (e.g. a Maven or npm registry) in tests and local runs.
pub struct InMemoryResourceRepository {
    blobs: RwLock<HashMap<String, Bytes>>,
}

impl Default for InMemoryResourceRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryResourceRepository {
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub async fn seed(&self, identity: impl Into<String>, content: Bytes) {
        self.blobs.write().await.insert(identity.into(), content);
    }

    fn identity_of(resource: &Resource) -> String {
        resource
            .meta
            .identity()
            .map(|id| id.canonical())
            .unwrap_or_else(|_| format!("{}:{}", resource.meta.name, resource.meta.version))
    }
}

#[async_trait]
impl ResourceRepository for InMemoryResourceRepository {
    fn credential_consumer_identity(&self, _resource: &Resource) -> ConsumerIdentity {
        ConsumerIdentity::NotNeeded
    }

    async fn download_resource(
        &self,
        resource: &Resource,
        _credentials: &Credentials,
        cancellation: &CancellationToken,
    ) -> Result<Blob, RepositoryError> {
        if cancellation.is_cancelled() {
            return Err(RepositoryError::Cancelled);
        }
        let identity = Self::identity_of(resource);
        let bytes = self
            .blobs
            .read()
            .await
            .get(&identity)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound {
                name: resource.meta.name.clone(),
                version: resource.meta.version.clone(),
            })?;
        Ok(Blob::from_bytes(bytes, None))
    }
}

/// Always hands out the same in-memory repository, regardless of which resource is asked for.
/// Suitable when a deployment has exactly one by-value source of resource content.
pub struct SingleResourceRepositoryProvider {
    repository: Arc<dyn ResourceRepository>,
}

impl SingleResourceRepositoryProvider {
    pub fn new(repository: Arc<dyn ResourceRepository>) -> Self {
        Self { repository }
    }
}

impl ResourceRepositoryProvider for SingleResourceRepositoryProvider {
    fn repository_for(&self, _resource: &Resource) -> Option<Arc<dyn ResourceRepository>> {
        Some(self.repository.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::assert;
    use forge_model::{AccessOrInput, ElementMeta, TypedSpec, TypedTag};

    fn resource(name: &str) -> Resource {
        Resource {
            meta: ElementMeta::new(name, "v1.0.0"),
            resource_type: "blob".to_string(),
            relation: None,
            source_refs: vec![],
            access_or_input: AccessOrInput::access(TypedSpec::new(
                TypedTag::new("maven", "v1"),
                serde_json::json!({}),
            )),
        }
    }

    #[tokio::test]
    async fn downloads_a_seeded_blob() {
        let repo = InMemoryResourceRepository::new();
        let r = resource("lib.jar");
        repo.seed(
            r.meta.identity().unwrap().canonical(),
            Bytes::from_static(b"jar bytes"),
        )
        .await;
        let blob = repo
            .download_resource(&r, &Credentials::new(), &CancellationToken::new())
            .await
            .unwrap();
        assert!(blob.meta.size == Some(9));
    }

    #[tokio::test]
    async fn missing_resource_is_not_found() {
        let repo = InMemoryResourceRepository::new();
        let err = repo
            .download_resource(
                &resource("missing.jar"),
                &Credentials::new(),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }
}
