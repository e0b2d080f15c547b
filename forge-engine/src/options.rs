use crate::config::{ConflictPolicy, CopyPolicy};
use crate::error::EngineError;
use forge_model::{Component, Descriptor};
use forge_registry::{
    CredentialResolver, ExternalComponentRepositoryProvider, PluginRegistry,
    ResourceDigestProcessorProvider, ResourceInputMethod, ResourceInputMethodProvider,
    ResourceRepositoryProvider, SourceInputMethod, SourceInputMethodProvider,
    TargetRepositoryProvider,
};
use std::sync::Arc;

pub type OnStartComponentConstruct = Arc<dyn Fn(&Component) + Send + Sync>;
pub type OnEndComponentConstruct =
    Arc<dyn Fn(&Component, Option<&Descriptor>, Option<&EngineError>) + Send + Sync>;

/// Everything `Construct` needs beyond the constructor document itself (spec §4.1
/// "Configuration"). Built with [`ConstructOptions::new`] plus `with_*` overrides; unset
/// optional providers fall back to the crate-wide default registries, which start out empty —
/// callers populate them or supply their own provider.
#[derive(Clone)]
pub struct ConstructOptions {
    pub target_repository_provider: Arc<dyn TargetRepositoryProvider>,
    pub resource_input_method_provider: Arc<dyn ResourceInputMethodProvider>,
    pub source_input_method_provider: Arc<dyn SourceInputMethodProvider>,
    pub resource_repository_provider: Option<Arc<dyn ResourceRepositoryProvider>>,
    pub resource_digest_processor_provider: Option<Arc<dyn ResourceDigestProcessorProvider>>,
    pub external_component_repository_provider: Arc<dyn ExternalComponentRepositoryProvider>,
    pub credential_resolver: Arc<dyn CredentialResolver>,
    pub concurrency_limit: usize,
    pub component_version_conflict_policy: ConflictPolicy,
    pub external_component_version_copy_policy: CopyPolicy,
    pub on_start_component_construct: Option<OnStartComponentConstruct>,
    pub on_end_component_construct: Option<OnEndComponentConstruct>,
}

impl ConstructOptions {
    pub fn new(
        target_repository_provider: Arc<dyn TargetRepositoryProvider>,
        external_component_repository_provider: Arc<dyn ExternalComponentRepositoryProvider>,
        credential_resolver: Arc<dyn CredentialResolver>,
    ) -> Self {
        Self {
            target_repository_provider,
            resource_input_method_provider: Arc::new(PluginRegistry::<dyn ResourceInputMethod>::new()),
            source_input_method_provider: Arc::new(PluginRegistry::<dyn SourceInputMethod>::new()),
            resource_repository_provider: None,
            resource_digest_processor_provider: None,
            external_component_repository_provider,
            credential_resolver,
            concurrency_limit: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            component_version_conflict_policy: ConflictPolicy::default(),
            external_component_version_copy_policy: CopyPolicy::default(),
            on_start_component_construct: None,
            on_end_component_construct: None,
        }
    }

    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit.max(1);
        self
    }

    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.component_version_conflict_policy = policy;
        self
    }

    pub fn with_copy_policy(mut self, policy: CopyPolicy) -> Self {
        self.external_component_version_copy_policy = policy;
        self
    }

    pub fn with_resource_input_method_provider(
        mut self,
        provider: Arc<dyn ResourceInputMethodProvider>,
    ) -> Self {
        self.resource_input_method_provider = provider;
        self
    }

    pub fn with_source_input_method_provider(
        mut self,
        provider: Arc<dyn SourceInputMethodProvider>,
    ) -> Self {
        self.source_input_method_provider = provider;
        self
    }

    pub fn with_resource_repository_provider(
        mut self,
        provider: Arc<dyn ResourceRepositoryProvider>,
    ) -> Self {
        self.resource_repository_provider = Some(provider);
        self
    }

    pub fn with_resource_digest_processor_provider(
        mut self,
        provider: Arc<dyn ResourceDigestProcessorProvider>,
    ) -> Self {
        self.resource_digest_processor_provider = Some(provider);
        self
    }

    pub fn with_on_start_component_construct(mut self, hook: OnStartComponentConstruct) -> Self {
        self.on_start_component_construct = Some(hook);
        self
    }

    pub fn with_on_end_component_construct(mut self, hook: OnEndComponentConstruct) -> Self {
        self.on_end_component_construct = Some(hook);
        self
    }
}
