use crate::error::DiscoveryError;
use crate::payload::VertexPayload;
use forge_model::{Component, ComponentIdentity};
use forge_registry::{ExternalComponentRepositoryProvider, RepositoryError};
use indexmap::IndexMap;
use tracing::debug;

/// `Resolve(id)` (spec §4.3, C4): a constructor-document hit always wins; otherwise consult the
/// external repository provider. `constructor_components` is keyed by
/// [`ComponentIdentity::canonical`].
pub async fn resolve(
    id: &ComponentIdentity,
    constructor_components: &IndexMap<String, Component>,
    external_provider: &dyn ExternalComponentRepositoryProvider,
) -> Result<VertexPayload, DiscoveryError> {
    if let Some(component) = constructor_components.get(&id.canonical()) {
        debug!(identity = %id, "resolved from constructor document");
        return Ok(VertexPayload::Constructor(component.clone()));
    }

    let repository = match external_provider.repository_for(&id.name, &id.version).await {
        Ok(repository) => repository,
        Err(RepositoryError::NotFound { .. }) => {
            return Err(DiscoveryError::Unresolvable {
                identity: id.canonical(),
            })
        }
        Err(source) => {
            return Err(DiscoveryError::ExternalLookupFailed {
                identity: id.canonical(),
                source,
            })
        }
    };

    match repository.get_component_version(&id.name, &id.version).await {
        Ok(descriptor) => {
            debug!(identity = %id, "resolved from external repository");
            Ok(VertexPayload::External(descriptor))
        }
        Err(RepositoryError::NotFound { .. }) => Err(DiscoveryError::Unresolvable {
            identity: id.canonical(),
        }),
        Err(source) => Err(DiscoveryError::ExternalLookupFailed {
            identity: id.canonical(),
            source,
        }),
    }
}

/// `Discover(payload)` (spec §4.3, C4): the child identities named by a resolved vertex's
/// component references.
pub fn discover(payload: &VertexPayload) -> Vec<ComponentIdentity> {
    payload
        .component()
        .references
        .iter()
        .map(|reference| reference.target_identity())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::assert;
    use async_trait::async_trait;
    use forge_model::{ComponentMeta, Provider, Reference};
    use forge_registry::ExternalComponentRepository;
    use std::sync::Arc;

    struct EmptyProvider;

    #[async_trait]
    impl ExternalComponentRepositoryProvider for EmptyProvider {
        async fn repository_for(
            &self,
            name: &str,
            version: &str,
        ) -> Result<Arc<dyn ExternalComponentRepository>, RepositoryError> {
            Err(RepositoryError::NotFound {
                name: name.to_string(),
                version: version.to_string(),
            })
        }
    }

    fn component(name: &str, version: &str, references: Vec<Reference>) -> Component {
        Component {
            meta: ComponentMeta::new(name, version),
            provider: Provider::new("acme"),
            resources: vec![],
            sources: vec![],
            references,
        }
    }

    #[tokio::test]
    async fn resolves_from_constructor_document() {
        let component = component("example.com/a", "v1.0.0", vec![]);
        let identity = component.identity();
        let mut map = IndexMap::new();
        map.insert(identity.canonical(), component);

        let resolved = resolve(&identity, &map, &EmptyProvider).await.unwrap();
        assert!(!resolved.is_external());
    }

    #[tokio::test]
    async fn fails_when_neither_constructor_nor_external_has_it() {
        let identity = ComponentIdentity::new("example.com/missing", "v1.0.0");
        let err = resolve(&identity, &IndexMap::new(), &EmptyProvider)
            .await
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::Unresolvable { .. }));
    }

    #[test]
    fn discover_reads_child_identities_from_references() {
        let reference = Reference {
            meta: forge_model::ElementMeta::new("b", "v1.0.0"),
            component: "example.com/b".to_string(),
        };
        let component = component("example.com/a", "v1.0.0", vec![reference]);
        let ids = discover(&VertexPayload::Constructor(component));
        assert!(ids.len() == 1);
        assert!(ids[0].canonical() == "example.com/b:v1.0.0");
    }
}
