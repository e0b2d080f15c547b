use crate::digest::{sha256_digest, split_digest};
use async_trait::async_trait;
use forge_model::{Blob, Descriptor, Resource, Source};
use forge_registry::{RepositoryError, TargetRepository};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// An OCI-layout-inspired, content-addressable-on-filesystem repository: blobs live under
/// `blobs/<algorithm>/<digest>`, one descriptor JSON file per component version under
/// `components/<name>/<version>.json` (spec §4.7 "CTF on filesystem").
pub struct FilesystemTargetRepository {
    root: PathBuf,
}

impl FilesystemTargetRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn descriptor_path(&self, name: &str, version: &str) -> PathBuf {
        self.root.join("components").join(name).join(format!("{version}.json"))
    }

    fn blob_path(&self, digest: &str) -> Option<PathBuf> {
        let (algorithm, hex) = split_digest(digest)?;
        Some(self.root.join("blobs").join(algorithm).join(hex))
    }

    async fn write_blob(&self, bytes: &[u8]) -> Result<String, RepositoryError> {
        let digest = sha256_digest(bytes);
        let path = self
            .blob_path(&digest)
            .ok_or_else(|| RepositoryError::Backend {
                message: format!("malformed digest {digest}"),
            })?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RepositoryError::Backend { message: e.to_string() })?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| RepositoryError::Backend { message: e.to_string() })?;
        Ok(digest)
    }
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
impl TargetRepository for FilesystemTargetRepository {
    async fn get_component_version(
        &self,
        name: &str,
        version: &str,
        cancellation: &CancellationToken,
    ) -> Result<Option<Descriptor>, RepositoryError> {
        if cancellation.is_cancelled() {
            return Err(RepositoryError::Cancelled);
        }
        let path = self.descriptor_path(name, version);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let descriptor: Descriptor = serde_json::from_slice(&bytes).map_err(|e| {
                    RepositoryError::Backend { message: e.to_string() }
                })?;
                Ok(Some(descriptor))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RepositoryError::Backend { message: e.to_string() }),
        }
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
        let path = self.descriptor_path(&name, &version);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RepositoryError::Backend { message: e.to_string() })?;
        }
        let json = serde_json::to_vec_pretty(&descriptor)
            .map_err(|e| RepositoryError::Backend { message: e.to_string() })?;
        debug!(%name, %version, path = %path.display(), "writing component descriptor");
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| RepositoryError::Backend { message: e.to_string() })
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
        let digest = self.write_blob(&bytes).await?;
        let mut resource = resource;
        attach_digest_and_size(&mut resource.access_or_input, &digest, bytes.len());
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
        let digest = self.write_blob(&bytes).await?;
        let mut source = source;
        attach_digest_and_size(&mut source.access_or_input, &digest, bytes.len());
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::assert;
    use forge_model::{ComponentMeta, Provider};

    #[tokio::test]
    async fn add_then_get_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FilesystemTargetRepository::new(dir.path());
        let descriptor = Descriptor::new(forge_model::Component {
            meta: ComponentMeta::new("example.com/demo", "v1.0.0"),
            provider: Provider::new("acme"),
            resources: vec![],
            sources: vec![],
            references: vec![],
        });
        repo.add_component_version(descriptor, &CancellationToken::new())
            .await
            .unwrap();

        let found = repo
            .get_component_version("example.com/demo", "v1.0.0", &CancellationToken::new())
            .await
            .unwrap();
        assert!(found.is_some());
        assert!(dir
            .path()
            .join("components/example.com/demo/v1.0.0.json")
            .exists());
    }

    #[tokio::test]
    async fn missing_component_version_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FilesystemTargetRepository::new(dir.path());
        let found = repo
            .get_component_version("example.com/missing", "v1.0.0", &CancellationToken::new())
            .await
            .unwrap();
        assert!(found.is_none());
    }
}
