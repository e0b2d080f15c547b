use crate::cli::ConstructArgs;
use forge_engine::ConstructOptions;
use forge_model::TypedTag;
use forge_plugins::{
    FileInputMethod, FilesystemTargetRepository, InMemoryExternalComponentRepository,
    SingleExternalComponentRepositoryProvider, SingleTargetRepositoryProvider,
    StaticCredentialResolver, Utf8InputMethod,
};
use forge_registry::{PluginRegistry, ResourceInputMethod, SourceInputMethod};
use std::collections::HashMap;
use std::sync::Arc;

/// Builds [`ConstructOptions`] wired to the default plug-ins (spec §4.7, A3): `utf8` and `file`
/// input methods, a content-addressable filesystem target repository rooted at `--target-dir`,
/// no external registry (callers reference only components present in the document), and an
/// empty credential store (every credential lookup falls back to "no credentials found").
pub fn default_construct_options(args: &ConstructArgs) -> ConstructOptions {
    let mut resource_input_methods: PluginRegistry<dyn ResourceInputMethod> = PluginRegistry::new();
    let mut source_input_methods: PluginRegistry<dyn SourceInputMethod> = PluginRegistry::new();

    let utf8 = Arc::new(Utf8InputMethod);
    let file = Arc::new(FileInputMethod::new(
        args.file.parent().unwrap_or_else(|| std::path::Path::new(".")),
    ));

    resource_input_methods
        .register(&TypedTag::new("utf8", "v2alpha1"), utf8.clone())
        .expect("first registration of utf8 never conflicts");
    resource_input_methods
        .register(&TypedTag::new("file", "v1"), file.clone())
        .expect("first registration of file never conflicts");
    source_input_methods
        .register(&TypedTag::new("utf8", "v2alpha1"), utf8)
        .expect("first registration of utf8 never conflicts");
    source_input_methods
        .register(&TypedTag::new("file", "v1"), file)
        .expect("first registration of file never conflicts");

    let target_repository = Arc::new(FilesystemTargetRepository::new(&args.target_dir));
    let target_repository_provider = Arc::new(SingleTargetRepositoryProvider::new(target_repository));

    let external_repository = Arc::new(InMemoryExternalComponentRepository::new());
    let external_repository_provider = Arc::new(SingleExternalComponentRepositoryProvider::new(
        external_repository,
    ));

    let credential_resolver = Arc::new(StaticCredentialResolver::new(HashMap::new()));

    let mut options = ConstructOptions::new(
        target_repository_provider,
        external_repository_provider,
        credential_resolver,
    )
    .with_resource_input_method_provider(Arc::new(resource_input_methods))
    .with_source_input_method_provider(Arc::new(source_input_methods));

    if let Some(concurrency) = args.concurrency {
        options = options.with_concurrency_limit(concurrency);
    }
    if let Some(policy) = args.conflict_policy {
        options = options.with_conflict_policy(policy.into());
    }
    if let Some(policy) = args.copy_policy {
        options = options.with_copy_policy(policy.into());
    }

    options
}
