use crate::contracts::{ResourceDigestProcessor, ResourceInputMethod, SourceInputMethod};
use crate::error::RegistryError;
use crate::registry::PluginRegistry;
use forge_model::TypedTag;
use std::sync::Arc;

/// Resolves a resource's `input` type tag to a [`ResourceInputMethod`]. Defaults to a
/// [`PluginRegistry`], but `Construct` accepts any implementation (spec §4.1, "Default to a
/// process-wide registry").
pub trait ResourceInputMethodProvider: Send + Sync {
    fn get_for(&self, tag: &TypedTag) -> Result<Arc<dyn ResourceInputMethod>, RegistryError>;
}

/// Symmetric to [`ResourceInputMethodProvider`] for sources.
pub trait SourceInputMethodProvider: Send + Sync {
    fn get_for(&self, tag: &TypedTag) -> Result<Arc<dyn SourceInputMethod>, RegistryError>;
}

/// Resolves a resource to its configured digest processor, when one is configured at all.
pub trait ResourceDigestProcessorProvider: Send + Sync {
    fn get_for(&self, tag: &TypedTag) -> Result<Arc<dyn ResourceDigestProcessor>, RegistryError>;
}

impl ResourceInputMethodProvider for PluginRegistry<dyn ResourceInputMethod> {
    fn get_for(&self, tag: &TypedTag) -> Result<Arc<dyn ResourceInputMethod>, RegistryError> {
        PluginRegistry::get_for(self, tag)
    }
}

impl SourceInputMethodProvider for PluginRegistry<dyn SourceInputMethod> {
    fn get_for(&self, tag: &TypedTag) -> Result<Arc<dyn SourceInputMethod>, RegistryError> {
        PluginRegistry::get_for(self, tag)
    }
}

impl ResourceDigestProcessorProvider for PluginRegistry<dyn ResourceDigestProcessor> {
    fn get_for(&self, tag: &TypedTag) -> Result<Arc<dyn ResourceDigestProcessor>, RegistryError> {
        PluginRegistry::get_for(self, tag)
    }
}
