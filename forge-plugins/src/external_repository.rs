use async_trait::async_trait;
use forge_model::Descriptor;
use forge_registry::{ExternalComponentRepository, ExternalComponentRepositoryProvider, RepositoryError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

fn key(name: &str, version: &str) -> String {
    format!("{name}:{version}")
}

/// A statically-seeded external component repository, standing in for a remote registry the
/// engine reads `componentReferences` from but never writes to.
pub struct InMemoryExternalComponentRepository {
    descriptors: RwLock<HashMap<String, Descriptor>>,
}

impl Default for InMemoryExternalComponentRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryExternalComponentRepository {
    pub fn new() -> Self {
        Self {
            descriptors: RwLock::new(HashMap::new()),
        }
    }

    pub async fn seed(&self, descriptor: Descriptor) {
        let name = descriptor.component.meta.name.clone();
        let version = descriptor.component.meta.version.clone();
        self.descriptors.write().await.insert(key(&name, &version), descriptor);
    }
}

#[async_trait]
impl ExternalComponentRepository for InMemoryExternalComponentRepository {
    async fn get_component_version(
        &self,
        name: &str,
        version: &str,
    ) -> Result<Descriptor, RepositoryError> {
        self.descriptors
            .read()
            .await
            .get(&key(name, version))
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound {
                name: name.to_string(),
                version: version.to_string(),
            })
    }
}

/// Hands out the same external repository regardless of the requested identity, the common case
/// for a deployment with exactly one upstream registry.
pub struct SingleExternalComponentRepositoryProvider {
    repository: Arc<dyn ExternalComponentRepository>,
}

impl SingleExternalComponentRepositoryProvider {
    pub fn new(repository: Arc<dyn ExternalComponentRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ExternalComponentRepositoryProvider for SingleExternalComponentRepositoryProvider {
    async fn repository_for(
        &self,
        _name: &str,
        _version: &str,
    ) -> Result<Arc<dyn ExternalComponentRepository>, RepositoryError> {
        Ok(self.repository.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::assert;
    use forge_model::{Component, ComponentMeta, Provider};

    fn descriptor(name: &str, version: &str) -> Descriptor {
        Descriptor::new(Component {
            meta: ComponentMeta::new(name, version),
            provider: Provider::new("acme"),
            resources: vec![],
            sources: vec![],
            references: vec![],
        })
    }

    #[tokio::test]
    async fn finds_a_seeded_descriptor() {
        let repo = InMemoryExternalComponentRepository::new();
        repo.seed(descriptor("example.com/lib", "v1.0.0")).await;
        let found = repo
            .get_component_version("example.com/lib", "v1.0.0")
            .await
            .unwrap();
        assert!(found.component.meta.name == "example.com/lib");
    }

    #[tokio::test]
    async fn missing_descriptor_is_not_found() {
        let repo = InMemoryExternalComponentRepository::new();
        let err = repo
            .get_component_version("example.com/missing", "v1.0.0")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }
}
