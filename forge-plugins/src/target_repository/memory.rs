use crate::digest::sha256_digest;
use async_trait::async_trait;
use bytes::Bytes;
use forge_model::{Blob, Descriptor, Resource, Source};
use forge_registry::{RepositoryError, TargetRepository};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Default)]
struct Inner {
    descriptors: HashMap<String, Descriptor>,
    blobs: HashMap<String, Bytes>,
}

/// Stores descriptors and local blobs in process memory (spec §4.7). Suitable for tests and
/// small local runs; not persisted across process restarts.
pub struct InMemoryTargetRepository {
    inner: RwLock<Inner>,
}

impl Default for InMemoryTargetRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTargetRepository {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

fn key(name: &str, version: &str) -> String {
    format!("{name}:{version}")
}

fn attach_digest_and_size(
    access_or_input: &mut forge_model::AccessOrInput,
    digest: &str,
    size: usize,
) {
    if let Some(spec) = access_or_input.access.as_mut() {
        if let serde_json::Value::Object(map) = &mut spec.payload {
            map.insert("digest".to_string(), serde_json::Value::String(digest.to_string()));
            map.insert("size".to_string(), serde_json::Value::from(size));
        }
    }
}

#[async_trait]
impl TargetRepository for InMemoryTargetRepository {
    async fn get_component_version(
        &self,
        name: &str,
        version: &str,
        cancellation: &CancellationToken,
    ) -> Result<Option<Descriptor>, RepositoryError> {
        if cancellation.is_cancelled() {
            return Err(RepositoryError::Cancelled);
        }
        Ok(self.inner.read().await.descriptors.get(&key(name, version)).cloned())
    }

    async fn add_component_version(
        &self,
        descriptor: Descriptor,
        cancellation: &CancellationToken,
    ) -> Result<(), RepositoryError> {
        if cancellation.is_cancelled() {
            return Err(RepositoryError::Cancelled);
        }
        let name = descriptor.component.meta.name.clone();
        let version = descriptor.component.meta.version.clone();
        debug!(%name, %version, "storing component version in memory");
        self.inner.write().await.descriptors.insert(key(&name, &version), descriptor);
        Ok(())
    }

    async fn add_local_resource(
        &self,
        _name: &str,
        _version: &str,
        resource: Resource,
        blob: Blob,
        cancellation: &CancellationToken,
    ) -> Result<Resource, RepositoryError> {
        if cancellation.is_cancelled() {
            return Err(RepositoryError::Cancelled);
        }
        let bytes = blob
            .collect_to_bytes()
            .await
            .map_err(|e| RepositoryError::Backend { message: e.to_string() })?;
        let digest = sha256_digest(&bytes);
        let mut resource = resource;
        attach_digest_and_size(&mut resource.access_or_input, &digest, bytes.len());
        self.inner.write().await.blobs.insert(digest, bytes);
        Ok(resource)
    }

    async fn add_local_source(
        &self,
        _name: &str,
        _version: &str,
        source: Source,
        blob: Blob,
        cancellation: &CancellationToken,
    ) -> Result<Source, RepositoryError> {
        if cancellation.is_cancelled() {
            return Err(RepositoryError::Cancelled);
        }
        let bytes = blob
            .collect_to_bytes()
            .await
            .map_err(|e| RepositoryError::Backend { message: e.to_string() })?;
        let digest = sha256_digest(&bytes);
        let mut source = source;
        attach_digest_and_size(&mut source.access_or_input, &digest, bytes.len());
        self.inner.write().await.blobs.insert(digest, bytes);
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::assert;
    use forge_model::{ComponentMeta, Provider};

    fn descriptor(name: &str, version: &str) -> Descriptor {
        Descriptor::new(forge_model::Component {
            meta: ComponentMeta::new(name, version),
            provider: Provider::new("acme"),
            resources: vec![],
            sources: vec![],
            references: vec![],
        })
    }

    #[tokio::test]
    async fn add_then_get_round_trips() {
        let repo = InMemoryTargetRepository::new();
        repo.add_component_version(
            descriptor("example.com/demo", "v1.0.0"),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
        let found = repo
            .get_component_version("example.com/demo", "v1.0.0", &CancellationToken::new())
            .await
            .unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn missing_component_version_is_none() {
        let repo = InMemoryTargetRepository::new();
        let found = repo
            .get_component_version("example.com/missing", "v1.0.0", &CancellationToken::new())
            .await
            .unwrap();
        assert!(found.is_none());
    }
}
