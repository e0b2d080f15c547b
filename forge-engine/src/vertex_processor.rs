use crate::config::{ConflictPolicy, CopyPolicy};
use crate::error::EngineError;
use crate::options::ConstructOptions;
use forge_discovery::VertexPayload;
use forge_model::{AccessOrInput, Component, Descriptor, Relation, Resource, Source};
use forge_registry::{
    ConsumerIdentity, Credentials, CredentialError, ProcessedResource, ProcessedSource,
};
use forge_graph::Dag;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Dispatches a single vertex's payload to construction or copy processing (spec §4.2, C5).
/// `semaphore` is the same pool the orchestrator draws vertex-level permits from: per-vertex
/// resource and source processing enqueues new work against it rather than opening a second
/// pool.
pub async fn process_vertex(
    vertex_id: &str,
    payload: &VertexPayload,
    dag: &Dag,
    options: &ConstructOptions,
    semaphore: &Arc<Semaphore>,
    cancellation: &CancellationToken,
) -> Result<Descriptor, EngineError> {
    if cancellation.is_cancelled() {
        return Err(EngineError::Cancelled);
    }
    match payload {
        VertexPayload::Constructor(component) => {
            process_constructor_vertex(vertex_id, component, dag, options, semaphore, cancellation)
                .await
        }
        VertexPayload::External(descriptor) => {
            process_external_vertex(vertex_id, descriptor, options, cancellation).await
        }
    }
}

async fn process_constructor_vertex(
    vertex_id: &str,
    component: &Component,
    dag: &Dag,
    options: &ConstructOptions,
    semaphore: &Arc<Semaphore>,
    cancellation: &CancellationToken,
) -> Result<Descriptor, EngineError> {
    for reference in &component.references {
        let child_id = reference.target_identity().canonical();
        if !dag.has_attribute(&child_id, "descriptor").await {
            return Err(EngineError::MissingDependency {
                vertex: vertex_id.to_string(),
                missing: child_id,
            });
        }
    }

    let component = Arc::new(component.clone());

    let resources = {
        let component = component.clone();
        let options = options.clone();
        process_elements_concurrently(component.resources.len(), semaphore, cancellation, move |index| {
            let component = component.clone();
            let options = options.clone();
            let cancellation = cancellation.clone();
            async move {
                process_resource(&component, &component.resources[index], &options, &cancellation).await
            }
        })
        .await?
    };

    let sources = {
        let component = component.clone();
        let options = options.clone();
        process_elements_concurrently(component.sources.len(), semaphore, cancellation, move |index| {
            let component = component.clone();
            let options = options.clone();
            let cancellation = cancellation.clone();
            async move {
                process_source(&component, &component.sources[index], &options, &cancellation).await
            }
        })
        .await?
    };

    for resource in &resources {
        if !resource.access_or_input.is_access() {
            return Err(EngineError::MissingAccess {
                identity: element_identity(&resource.meta, &component),
            });
        }
    }
    for source in &sources {
        if !source.access_or_input.is_access() {
            return Err(EngineError::MissingAccess {
                identity: element_identity(&source.meta, &component),
            });
        }
    }

    let mut final_component = component.as_ref().clone();
    final_component.resources = resources;
    final_component.sources = sources;

    if let Some(hook) = &options.on_start_component_construct {
        hook(&final_component);
    }

    let descriptor = Descriptor::new(final_component.clone());
    let result = apply_conflict_policy(
        &final_component.meta.name,
        &final_component.meta.version,
        descriptor.clone(),
        options,
        cancellation,
    )
    .await;

    if let Some(hook) = &options.on_end_component_construct {
        hook(&final_component, result.as_ref().ok(), result.as_ref().err());
    }
    result?;

    info!(vertex = vertex_id, "component constructed");
    Ok(descriptor)
}

async fn process_external_vertex(
    vertex_id: &str,
    descriptor: &Descriptor,
    options: &ConstructOptions,
    cancellation: &CancellationToken,
) -> Result<Descriptor, EngineError> {
    if options.external_component_version_copy_policy == CopyPolicy::Skip {
        debug!(vertex = vertex_id, "copy policy is skip, recording descriptor only");
        return Ok(descriptor.clone());
    }

    apply_conflict_policy(
        &descriptor.component.meta.name,
        &descriptor.component.meta.version,
        descriptor.clone(),
        options,
        cancellation,
    )
    .await?;

    copy_local_blobs_best_effort(descriptor, options, cancellation).await;

    info!(vertex = vertex_id, "external component version copied");
    Ok(descriptor.clone())
}

/// Best-effort copy of local blobs referenced by an external descriptor (spec §9 open question
/// (a), resolved as: copy only local blobs reachable via a configured resource repository;
/// failures are logged, never fatal).
async fn copy_local_blobs_best_effort(
    descriptor: &Descriptor,
    options: &ConstructOptions,
    cancellation: &CancellationToken,
) {
    let Some(provider) = &options.resource_repository_provider else {
        return;
    };
    let name = &descriptor.component.meta.name;
    let version = &descriptor.component.meta.version;
    let Ok(target_repo) = options.target_repository_provider.repository_for(name, version) else {
        return;
    };

    for resource in &descriptor.component.resources {
        if cancellation.is_cancelled() {
            return;
        }
        if resource.relation != Some(Relation::Local) {
            continue;
        }
        let Some(repository) = provider.repository_for(resource) else {
            continue;
        };
        let identity = repository.credential_consumer_identity(resource);
        let credentials = match resolve_credentials(options, &identity, cancellation).await {
            Ok(credentials) => credentials,
            Err(err) => {
                warn!(%name, %version, resource = %resource.meta.name, error = %err, "best-effort external blob copy failed to resolve credentials");
                continue;
            }
        };
        match repository.download_resource(resource, &credentials, cancellation).await {
            Ok(blob) => {
                if let Err(err) = target_repo
                    .add_local_resource(name, version, resource.clone(), blob, cancellation)
                    .await
                {
                    warn!(%name, %version, resource = %resource.meta.name, error = %err, "best-effort external blob copy failed");
                }
            }
            Err(err) => {
                warn!(%name, %version, resource = %resource.meta.name, error = %err, "best-effort external blob download failed");
            }
        }
    }
}

async fn apply_conflict_policy(
    name: &str,
    version: &str,
    descriptor: Descriptor,
    options: &ConstructOptions,
    cancellation: &CancellationToken,
) -> Result<(), EngineError> {
    let repository = options.target_repository_provider.repository_for(name, version)?;

    match options.component_version_conflict_policy {
        ConflictPolicy::AbortAndFail => {
            if repository
                .get_component_version(name, version, cancellation)
                .await?
                .is_some()
            {
                return Err(forge_registry::RepositoryError::AlreadyExists {
                    name: name.to_string(),
                    version: version.to_string(),
                }
                .into());
            }
            repository.add_component_version(descriptor, cancellation).await?;
        }
        ConflictPolicy::Skip => {
            if repository
                .get_component_version(name, version, cancellation)
                .await?
                .is_some()
            {
                debug!(%name, %version, "conflict policy skip: component version already exists");
                return Ok(());
            }
            repository.add_component_version(descriptor, cancellation).await?;
        }
        ConflictPolicy::Replace => {
            repository.add_component_version(descriptor, cancellation).await?;
        }
    }
    Ok(())
}

async fn process_resource(
    component: &Component,
    resource: &Resource,
    options: &ConstructOptions,
    cancellation: &CancellationToken,
) -> Result<Resource, EngineError> {
    if resource.access_or_input.is_input() {
        return process_resource_input(component, resource, options, cancellation).await;
    }

    let by_value_repository = options
        .resource_repository_provider
        .as_ref()
        .and_then(|provider| provider.repository_for(resource));

    if let Some(repository) = by_value_repository {
        let identity = element_identity(&resource.meta, component);
        let consumer_identity = repository.credential_consumer_identity(resource);
        let credentials = resolve_credentials(options, &consumer_identity, cancellation).await?;
        let blob = repository
            .download_resource(resource, &credentials, cancellation)
            .await
            .map_err(EngineError::from)?;
        let mut defaulted = resource.clone();
        default_resource_relation(&mut defaulted);
        default_element_version(&mut defaulted.meta.version, &component.meta.version);
        let uploaded = options
            .target_repository_provider
            .repository_for(&component.meta.name, &component.meta.version)?
            .add_local_resource(
                &component.meta.name,
                &component.meta.version,
                defaulted,
                blob,
                cancellation,
            )
            .await
            .map_err(EngineError::from)?;
        debug!(%identity, "resource copied by value");
        return Ok(uploaded);
    }

    let mut by_reference = resource.clone();
    if let Some(digest_provider) = &options.resource_digest_processor_provider {
        if let Some(tag) = access_tag(&resource.access_or_input) {
            let processor = digest_provider.get_for(&tag)?;
            let identity = processor.credential_consumer_identity(resource);
            let credentials = resolve_credentials(options, &identity, cancellation).await?;
            by_reference = processor
                .process_digest(&by_reference, &credentials, cancellation)
                .await
                .map_err(EngineError::from)?;
        }
    }
    Ok(by_reference)
}

async fn process_resource_input(
    component: &Component,
    resource: &Resource,
    options: &ConstructOptions,
    cancellation: &CancellationToken,
) -> Result<Resource, EngineError> {
    let tag = access_or_input_tag(&resource.access_or_input)
        .expect("validated resources always have access or input");
    let method = options.resource_input_method_provider.get_for(&tag)?;
    let identity = method.credential_consumer_identity(resource);
    let credentials = resolve_credentials(options, &identity, cancellation).await?;

    match method
        .process_resource(resource, &credentials, cancellation)
        .await?
    {
        ProcessedResource::Resource(processed) => Ok(processed),
        ProcessedResource::Blob(blob) => {
            let mut defaulted = resource.clone();
            default_resource_relation(&mut defaulted);
            default_element_version(&mut defaulted.meta.version, &component.meta.version);
            default_resource_access_from_blob(&mut defaulted, &blob);
            let repository = options
                .target_repository_provider
                .repository_for(&component.meta.name, &component.meta.version)?;
            let uploaded = repository
                .add_local_resource(
                    &component.meta.name,
                    &component.meta.version,
                    defaulted,
                    blob,
                    cancellation,
                )
                .await
                .map_err(EngineError::from)?;
            Ok(uploaded)
        }
    }
}

async fn process_source(
    component: &Component,
    source: &Source,
    options: &ConstructOptions,
    cancellation: &CancellationToken,
) -> Result<Source, EngineError> {
    if !source.access_or_input.is_input() {
        return Ok(source.clone());
    }

    let tag = access_or_input_tag(&source.access_or_input)
        .expect("validated sources always have access or input");
    let method = options.source_input_method_provider.get_for(&tag)?;
    let identity = method.credential_consumer_identity(source);
    let credentials = resolve_credentials(options, &identity, cancellation).await?;

    match method
        .process_source(source, &credentials, cancellation)
        .await?
    {
        ProcessedSource::Source(processed) => Ok(processed),
        ProcessedSource::Blob(blob) => {
            let mut defaulted = source.clone();
            default_element_version(&mut defaulted.meta.version, &component.meta.version);
            let repository = options
                .target_repository_provider
                .repository_for(&component.meta.name, &component.meta.version)?;
            let uploaded = repository
                .add_local_source(
                    &component.meta.name,
                    &component.meta.version,
                    defaulted,
                    blob,
                    cancellation,
                )
                .await
                .map_err(EngineError::from)?;
            Ok(uploaded)
        }
    }
}

async fn resolve_credentials(
    options: &ConstructOptions,
    identity: &ConsumerIdentity,
    cancellation: &CancellationToken,
) -> Result<Credentials, EngineError> {
    if matches!(identity, ConsumerIdentity::NotNeeded) {
        return Ok(Credentials::new());
    }
    match options.credential_resolver.resolve(identity, cancellation).await {
        Ok(credentials) => Ok(credentials),
        Err(CredentialError::NotFound { identity }) => {
            warn!(%identity, "no credentials found, proceeding with an empty credential map");
            Ok(Credentials::new())
        }
        Err(other) => Err(EngineError::from(other)),
    }
}

/// Runs `count` independently-indexed tasks (one per resource or one per source) against
/// `semaphore`'s existing pool and writes each result back by its original index, so concurrent
/// completion order never reorders the output (spec §4.2 "for each resource and each source in
/// parallel", §5 "indexed write-back, not append").
async fn process_elements_concurrently<F, Fut, T>(
    count: usize,
    semaphore: &Arc<Semaphore>,
    cancellation: &CancellationToken,
    make_task: F,
) -> Result<Vec<T>, EngineError>
where
    F: Fn(usize) -> Fut,
    Fut: Future<Output = Result<T, EngineError>> + Send + 'static,
    T: Send + 'static,
{
    if count == 0 {
        return Ok(Vec::new());
    }
    if cancellation.is_cancelled() {
        return Err(EngineError::Cancelled);
    }

    let mut slots: Vec<Option<T>> = (0..count).map(|_| None).collect();
    let mut join_set = JoinSet::new();
    for index in 0..count {
        let semaphore = semaphore.clone();
        let cancellation = cancellation.clone();
        let fut = make_task(index);
        join_set.spawn(async move {
            if cancellation.is_cancelled() {
                return (index, Err(EngineError::Cancelled));
            }
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("semaphore is never closed during construct");
            (index, fut.await)
        });
    }

    while let Some(joined) = join_set.join_next().await {
        let (index, result) = joined.map_err(|e| EngineError::Internal {
            message: format!("element processing task failed: {e}"),
        })?;
        slots[index] = Some(result?);
    }

    Ok(slots
        .into_iter()
        .map(|slot| slot.expect("every index is written before join_set drains"))
        .collect())
}

fn default_resource_relation(resource: &mut Resource) {
    if resource.relation.is_none() {
        resource.relation = Some(Relation::Local);
    }
}

fn default_element_version(version: &mut String, component_version: &str) {
    if version.is_empty() {
        *version = component_version.to_string();
    }
}

fn default_resource_access_from_blob(resource: &mut Resource, blob: &forge_model::Blob) {
    if resource.access_or_input.is_access() {
        return;
    }
    let tag = forge_model::TypedTag::new("localBlob", "v1");
    let media_type = blob.meta.media_type.clone();
    resource.access_or_input = AccessOrInput::access(forge_model::TypedSpec::new(
        tag,
        serde_json::json!({ "mediaType": media_type }),
    ));
}

fn access_tag(access_or_input: &AccessOrInput) -> Option<forge_model::TypedTag> {
    access_or_input.access.as_ref().map(|spec| spec.tag.clone())
}

fn access_or_input_tag(access_or_input: &AccessOrInput) -> Option<forge_model::TypedTag> {
    access_or_input
        .input
        .as_ref()
        .or(access_or_input.access.as_ref())
        .map(|spec| spec.tag.clone())
}

fn element_identity(meta: &forge_model::ElementMeta, component: &Component) -> String {
    meta.identity()
        .map(|id| id.canonical())
        .unwrap_or_else(|_| format!("{}/{}:{}", component.meta.name, meta.name, meta.version))
}
