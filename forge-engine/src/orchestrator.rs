use crate::error::EngineError;
use crate::options::ConstructOptions;
use crate::vertex_processor::process_vertex;
use forge_discovery::VertexPayload;
use forge_graph::Dag;
use forge_model::{Component, ComponentIdentity, ValidationError};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

/// The construction engine's public entry point (spec §4.1, C6). Stateless: every call takes
/// its own constructor document, options, and cancellation token.
pub struct Engine {
    dag: Arc<Dag>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            dag: Arc::new(Dag::new()),
        }
    }

    /// Exposes the DAG for inspection; safe to call concurrently with [`Self::construct`] (the
    /// DAG's own read lock serializes against in-flight writes).
    pub fn get_graph(&self) -> Arc<Dag> {
        self.dag.clone()
    }

    /// Runs the full construct-and-publish pipeline to completion: validate, seed roots,
    /// discover the reachable sub-DAG, process every vertex in reverse topological order, and
    /// publish to the target repository (spec §4.1 `Construct`).
    pub async fn construct(
        &self,
        components: Vec<Component>,
        options: &ConstructOptions,
        cancellation: CancellationToken,
    ) -> Result<(), EngineError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("construct", run_id = %run_id);
        self.construct_inner(components, options, cancellation)
            .instrument(span)
            .await
    }

    async fn construct_inner(
        &self,
        components: Vec<Component>,
        options: &ConstructOptions,
        cancellation: CancellationToken,
    ) -> Result<(), EngineError> {
        for component in &components {
            forge_model::validate_component(component).map_err(EngineError::Validation)?;
        }
        validate_no_duplicate_top_level_identities(&components)?;

        let mut by_identity = IndexMap::new();
        let mut roots = Vec::with_capacity(components.len());
        for component in components {
            let identity = component.identity();
            let id = identity.canonical();
            self.dag.add_vertex(&id).await;
            roots.push(identity.clone());
            by_identity.insert(id, component);
        }
        let by_identity = Arc::new(by_identity);

        let semaphore = Arc::new(Semaphore::new(options.concurrency_limit.max(1)));

        self.discover_all(roots, &by_identity, options, &semaphore, &cancellation)
            .await?;
        info!("discovery complete");

        self.process_all(options, &semaphore, &cancellation).await?;
        info!("processing complete");

        Ok(())
    }

    async fn discover_all(
        &self,
        roots: Vec<ComponentIdentity>,
        constructor_components: &Arc<IndexMap<String, Component>>,
        options: &ConstructOptions,
        semaphore: &Arc<Semaphore>,
        cancellation: &CancellationToken,
    ) -> Result<(), EngineError> {
        let mut enqueued: HashSet<String> = HashSet::new();
        let mut frontier = Vec::with_capacity(roots.len());
        for identity in roots {
            enqueued.insert(identity.canonical());
            frontier.push(identity);
        }

        let external_provider = options.external_component_repository_provider.clone();

        while !frontier.is_empty() {
            if cancellation.is_cancelled() {
                return Err(EngineError::Cancelled);
            }

            let mut join_set = JoinSet::new();
            for identity in frontier.drain(..) {
                let dag = self.dag.clone();
                let constructor_components = constructor_components.clone();
                let external_provider = external_provider.clone();
                let semaphore = semaphore.clone();
                let span = info_span!("discover_vertex", vertex = %identity.canonical());
                join_set.spawn(
                    async move {
                        let _permit = semaphore
                            .acquire_owned()
                            .await
                            .expect("semaphore is never closed during construct");
                        discover_vertex(identity, dag, constructor_components, external_provider).await
                    }
                    .instrument(span),
                );
            }

            let mut next_frontier = Vec::new();
            while let Some(joined) = join_set.join_next().await {
                let children = joined
                    .map_err(|e| EngineError::Internal {
                        message: format!("discovery task failed: {e}"),
                    })??;
                for child in children {
                    if enqueued.insert(child.canonical()) {
                        next_frontier.push(child);
                    }
                }
            }
            frontier = next_frontier;
        }
        Ok(())
    }

    async fn process_all(
        &self,
        options: &ConstructOptions,
        semaphore: &Arc<Semaphore>,
        cancellation: &CancellationToken,
    ) -> Result<(), EngineError> {
        let levels = self.compute_processing_levels().await;

        for level in levels {
            if cancellation.is_cancelled() {
                return Err(EngineError::Cancelled);
            }

            let mut join_set = JoinSet::new();
            for vertex_id in level {
                let dag = self.dag.clone();
                let semaphore = semaphore.clone();
                let payload = dag
                    .get_attribute::<VertexPayload>(&vertex_id, "value")
                    .await
                    .ok_or_else(|| EngineError::Internal {
                        message: format!("vertex {vertex_id} has no discovered payload"),
                    })?;
                let options = options.clone();
                let cancellation = cancellation.clone();
                let span = info_span!("process_vertex", vertex = %vertex_id);
                join_set.spawn(
                    async move {
                        let _permit = semaphore
                            .acquire_owned()
                            .await
                            .expect("semaphore is never closed during construct");
                        let descriptor =
                            process_vertex(&vertex_id, &payload, &dag, &options, &semaphore, &cancellation)
                                .await?;
                        dag.set_attribute(&vertex_id, "descriptor", descriptor)
                            .await
                            .map_err(EngineError::from)?;
                        Ok::<(), EngineError>(())
                    }
                    .instrument(span),
                );
            }

            while let Some(joined) = join_set.join_next().await {
                joined.map_err(|e| EngineError::Internal {
                    message: format!("processing task failed: {e}"),
                })??;
            }
        }
        Ok(())
    }

    /// Batches of vertex ids where every vertex in a batch has all of its children already
    /// assigned to an earlier batch — the bounded-parallel analogue of "reverse topological
    /// order" (spec §4.1 step 4): within a batch, order is irrelevant; across batches, order is
    /// a strict dependency barrier.
    async fn compute_processing_levels(&self) -> Vec<Vec<String>> {
        let ids = self.dag.all_ids().await;
        let mut children_of = std::collections::HashMap::with_capacity(ids.len());
        for id in &ids {
            children_of.insert(id.clone(), self.dag.children_of(id).await);
        }

        let mut remaining: std::collections::HashMap<String, usize> = ids
            .iter()
            .map(|id| (id.clone(), children_of[id].len()))
            .collect();

        let mut parents_of: std::collections::HashMap<String, Vec<String>> =
            ids.iter().map(|id| (id.clone(), Vec::new())).collect();
        for (parent, children) in &children_of {
            for child in children {
                parents_of.get_mut(child).expect("known vertex").push(parent.clone());
            }
        }

        let mut levels = Vec::new();
        let mut ready: Vec<String> = ids
            .iter()
            .filter(|id| remaining[id.as_str()] == 0)
            .cloned()
            .collect();

        while !ready.is_empty() {
            debug!(level_size = ready.len(), "processing level ready");
            for id in &ready {
                for parent in &parents_of[id] {
                    let count = remaining.get_mut(parent).expect("known vertex");
                    *count -= 1;
                }
            }
            let next_ready = ids
                .iter()
                .filter(|id| remaining[id.as_str()] == 0 && !levels_contains(&levels, id) && !ready.contains(id))
                .cloned()
                .collect::<Vec<_>>();
            levels.push(std::mem::take(&mut ready));
            ready = next_ready;
        }
        levels
    }
}

fn levels_contains(levels: &[Vec<String>], id: &str) -> bool {
    levels.iter().any(|level| level.iter().any(|v| v == id))
}

async fn discover_vertex(
    identity: ComponentIdentity,
    dag: Arc<Dag>,
    constructor_components: Arc<IndexMap<String, Component>>,
    external_provider: Arc<dyn forge_registry::ExternalComponentRepositoryProvider>,
) -> Result<Vec<ComponentIdentity>, EngineError> {
    let vertex_id = identity.canonical();
    let payload = forge_discovery::resolve(&identity, &constructor_components, external_provider.as_ref())
        .await
        .map_err(EngineError::from)?;

    let children = forge_discovery::discover(&payload);
    for child in &children {
        let child_id = child.canonical();
        dag.add_vertex(&child_id).await;
        dag.add_edge(&vertex_id, &child_id).await.map_err(EngineError::from)?;
    }

    dag.set_attribute(&vertex_id, "value", payload)
        .await
        .map_err(EngineError::from)?;

    Ok(children)
}

fn validate_no_duplicate_top_level_identities(components: &[Component]) -> Result<(), EngineError> {
    let mut seen = HashSet::new();
    for component in components {
        let id = component.identity().canonical();
        if !seen.insert(id.clone()) {
            return Err(EngineError::Validation(ValidationError::DuplicateIdentity {
                component: id,
                kind: "components",
                identity: "top-level".to_string(),
            }));
        }
    }
    Ok(())
}
