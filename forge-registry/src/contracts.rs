use crate::credentials::{ConsumerIdentity, Credentials};
use crate::error::{CredentialError, DigestError, InputMethodError, RepositoryError};
use async_trait::async_trait;
use forge_model::{Blob, Descriptor, Resource, Source};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// What a resource input method produced: either a fully-formed resource (it already stored the
/// content itself, e.g. an external-chart recipe) or a blob the engine must upload as a local
/// resource (spec §4.2, "has input").
pub enum ProcessedResource {
    Resource(Resource),
    Blob(Blob),
}

/// Symmetric to [`ProcessedResource`] for sources.
pub enum ProcessedSource {
    Source(Source),
    Blob(Blob),
}

/// Resolves a resource's `input` type tag to the method that materializes its content (spec §6
/// "Input method contract"). `cancellation` must be honored promptly: implementations that can
/// observe it mid-flight (streaming reads, network calls) should check it at natural yield
/// points rather than only at entry.
#[async_trait]
pub trait ResourceInputMethod: Send + Sync {
    fn credential_consumer_identity(&self, resource: &Resource) -> ConsumerIdentity;

    async fn process_resource(
        &self,
        resource: &Resource,
        credentials: &Credentials,
        cancellation: &CancellationToken,
    ) -> Result<ProcessedResource, InputMethodError>;
}

/// Symmetric to [`ResourceInputMethod`] for sources.
#[async_trait]
pub trait SourceInputMethod: Send + Sync {
    fn credential_consumer_identity(&self, source: &Source) -> ConsumerIdentity;

    async fn process_source(
        &self,
        source: &Source,
        credentials: &Credentials,
        cancellation: &CancellationToken,
    ) -> Result<ProcessedSource, InputMethodError>;
}

/// Populates or validates a by-reference resource's digest (spec §6 "Digest processor
/// contract"). Absence of a configured processor is not an error; callers treat it as optional.
#[async_trait]
pub trait ResourceDigestProcessor: Send + Sync {
    fn credential_consumer_identity(&self, resource: &Resource) -> ConsumerIdentity;

    async fn process_digest(
        &self,
        resource: &Resource,
        credentials: &Credentials,
        cancellation: &CancellationToken,
    ) -> Result<Resource, DigestError>;
}

/// Fetches the blob behind a by-value `access` for copy into the target repository (spec §6
/// "Resource repository contract").
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    fn credential_consumer_identity(&self, resource: &Resource) -> ConsumerIdentity;

    async fn download_resource(
        &self,
        resource: &Resource,
        credentials: &Credentials,
        cancellation: &CancellationToken,
    ) -> Result<Blob, RepositoryError>;
}

/// Resolves a resource access to the repository holding its content, when by-value copy is
/// requested.
pub trait ResourceRepositoryProvider: Send + Sync {
    fn repository_for(&self, resource: &Resource) -> Option<Arc<dyn ResourceRepository>>;
}

/// The write target for constructed and copied component versions (spec §6 "Target repository
/// contract"). One logical repository per component, resolved via
/// [`TargetRepositoryProvider`].
#[async_trait]
pub trait TargetRepository: Send + Sync {
    async fn get_component_version(
        &self,
        name: &str,
        version: &str,
        cancellation: &CancellationToken,
    ) -> Result<Option<Descriptor>, RepositoryError>;

    async fn add_component_version(
        &self,
        descriptor: Descriptor,
        cancellation: &CancellationToken,
    ) -> Result<(), RepositoryError>;

    async fn add_local_resource(
        &self,
        name: &str,
        version: &str,
        resource: Resource,
        blob: Blob,
        cancellation: &CancellationToken,
    ) -> Result<Resource, RepositoryError>;

    async fn add_local_source(
        &self,
        name: &str,
        version: &str,
        source: Source,
        blob: Blob,
        cancellation: &CancellationToken,
    ) -> Result<Source, RepositoryError>;
}

/// Resolves a component identity to the target repository it should be written to.
pub trait TargetRepositoryProvider: Send + Sync {
    fn repository_for(
        &self,
        name: &str,
        version: &str,
    ) -> Result<Arc<dyn TargetRepository>, RepositoryError>;
}

/// Read-only access to an externally-referenced component version (spec §6 "External repository
/// provider contract").
#[async_trait]
pub trait ExternalComponentRepository: Send + Sync {
    async fn get_component_version(
        &self,
        name: &str,
        version: &str,
    ) -> Result<Descriptor, RepositoryError>;
}

/// Resolves `(name, version)` to the external repository that might hold it.
#[async_trait]
pub trait ExternalComponentRepositoryProvider: Send + Sync {
    async fn repository_for(
        &self,
        name: &str,
        version: &str,
    ) -> Result<Arc<dyn ExternalComponentRepository>, RepositoryError>;
}

/// Maps a [`ConsumerIdentity`] to a credential map (spec §6 "Credential resolver contract").
/// `NotFound` is best-effort recoverable; every other error is fatal.
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    async fn resolve(
        &self,
        identity: &ConsumerIdentity,
        cancellation: &CancellationToken,
    ) -> Result<Credentials, CredentialError>;
}
