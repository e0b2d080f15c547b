use crate::error::RegistryError;
use forge_model::TypedTag;
use std::collections::HashMap;
use std::sync::Arc;

/// Type-tag-indexed lookup shared by every plug-in kind the engine dispatches on: input
/// methods, resource repositories, digest processors, target repositories, credential
/// resolvers. Keyed by the tag's canonical `name/version` string after alias and
/// default-version resolution (spec §4.4).
pub struct PluginRegistry<P: ?Sized> {
    aliases: HashMap<String, String>,
    default_versions: HashMap<String, String>,
    entries: HashMap<String, Arc<P>>,
}

impl<P: ?Sized> Default for PluginRegistry<P> {
    fn default() -> Self {
        Self {
            aliases: HashMap::new(),
            default_versions: HashMap::new(),
            entries: HashMap::new(),
        }
    }
}

impl<P: ?Sized> PluginRegistry<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// `alias` resolves to `canonical_name` before version defaulting or lookup.
    pub fn register_alias(&mut self, alias: impl Into<String>, canonical_name: impl Into<String>) {
        self.aliases.insert(alias.into(), canonical_name.into());
    }

    /// The version used when a caller passes an unversioned tag for `name`.
    pub fn set_default_version(&mut self, name: impl Into<String>, version: impl Into<String>) {
        self.default_versions.insert(name.into(), version.into());
    }

    /// Register `plugin` under `tag`. Re-registering the exact same plug-in (by pointer
    /// identity) under the same canonical tag is a no-op; registering a different plug-in
    /// under an already-occupied tag is a fatal `Conflict`.
    pub fn register(&mut self, tag: &TypedTag, plugin: Arc<P>) -> Result<(), RegistryError> {
        let canonical = self.canonical_key(tag)?;
        match self.entries.get(&canonical) {
            Some(existing) if Arc::ptr_eq(existing, &plugin) => Ok(()),
            Some(_) => Err(RegistryError::Conflict { tag: canonical }),
            None => {
                self.entries.insert(canonical, plugin);
                Ok(())
            }
        }
    }

    /// Resolves `tag` (applying alias dereferencing and default-version population) and
    /// returns the registered plug-in, or `NotFound`/`NoDefaultVersion`.
    pub fn get_for(&self, tag: &TypedTag) -> Result<Arc<P>, RegistryError> {
        let canonical = self.canonical_key(tag)?;
        self.entries
            .get(&canonical)
            .cloned()
            .ok_or(RegistryError::NotFound { tag: canonical })
    }

    fn canonical_key(&self, tag: &TypedTag) -> Result<String, RegistryError> {
        let name = self
            .aliases
            .get(&tag.name)
            .cloned()
            .unwrap_or_else(|| tag.name.clone());
        let version = match &tag.version {
            Some(v) => v.clone(),
            None => self
                .default_versions
                .get(&name)
                .cloned()
                .ok_or_else(|| RegistryError::NoDefaultVersion { name: name.clone() })?,
        };
        Ok(format!("{name}/{version}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::assert;

    trait Greeter: Send + Sync {
        fn greet(&self) -> &str;
    }

    struct Hello;
    impl Greeter for Hello {
        fn greet(&self) -> &str {
            "hello"
        }
    }

    #[test]
    fn resolves_unversioned_tag_via_default_version() {
        let mut registry: PluginRegistry<dyn Greeter> = PluginRegistry::new();
        registry.set_default_version("utf8", "v2alpha1");
        let plugin: Arc<dyn Greeter> = Arc::new(Hello);
        registry
            .register(&TypedTag::new("utf8", "v2alpha1"), plugin)
            .unwrap();

        let found = registry.get_for(&TypedTag::unversioned("utf8")).unwrap();
        assert!(found.greet() == "hello");
    }

    #[test]
    fn resolves_alias_before_lookup() {
        let mut registry: PluginRegistry<dyn Greeter> = PluginRegistry::new();
        registry.register_alias("helm", "helmChart");
        let plugin: Arc<dyn Greeter> = Arc::new(Hello);
        registry
            .register(&TypedTag::new("helmChart", "v1"), plugin)
            .unwrap();

        let found = registry.get_for(&TypedTag::new("helm", "v1")).unwrap();
        assert!(found.greet() == "hello");
    }

    #[test]
    fn reregistering_same_plugin_is_a_no_op() {
        let mut registry: PluginRegistry<dyn Greeter> = PluginRegistry::new();
        let plugin: Arc<dyn Greeter> = Arc::new(Hello);
        let tag = TypedTag::new("utf8", "v2alpha1");
        registry.register(&tag, plugin.clone()).unwrap();
        assert!(registry.register(&tag, plugin).is_ok());
    }

    #[test]
    fn registering_different_plugin_under_same_tag_conflicts() {
        let mut registry: PluginRegistry<dyn Greeter> = PluginRegistry::new();
        let tag = TypedTag::new("utf8", "v2alpha1");
        registry.register(&tag, Arc::new(Hello)).unwrap();
        let err = registry.register(&tag, Arc::new(Hello)).unwrap_err();
        assert!(matches!(err, RegistryError::Conflict { .. }));
    }

    #[test]
    fn unversioned_tag_without_default_is_not_found() {
        let registry: PluginRegistry<dyn Greeter> = PluginRegistry::new();
        let err = registry
            .get_for(&TypedTag::unversioned("mystery"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::NoDefaultVersion { .. }));
    }
}
