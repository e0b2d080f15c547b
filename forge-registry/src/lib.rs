//! Plug-in contracts and type-tag-indexed registries (spec §4.4 "Plug-in registries").
//!
//! This crate owns the boundary traits every concrete plug-in implements (input methods,
//! repositories, digest processors, credential resolvers) and the generic [`PluginRegistry`]
//! used to look them up by versioned type tag. It has no knowledge of the DAG or the
//! orchestrator; those depend on this crate, not the other way around.

pub mod contracts;
pub mod credentials;
pub mod error;
pub mod providers;
pub mod registry;

pub use contracts::{
    CredentialResolver, ExternalComponentRepository, ExternalComponentRepositoryProvider,
    ProcessedResource, ProcessedSource, ResourceDigestProcessor, ResourceInputMethod,
    ResourceRepository, ResourceRepositoryProvider, SourceInputMethod, TargetRepository,
    TargetRepositoryProvider,
};
pub use credentials::{ConsumerIdentity, Credentials};
pub use error::{CredentialError, DigestError, InputMethodError, RegistryError, RepositoryError};
pub use providers::{
    ResourceDigestProcessorProvider, ResourceInputMethodProvider, SourceInputMethodProvider,
};
pub use registry::PluginRegistry;
