use crate::error::GraphError;
use indexmap::{IndexMap, IndexSet};
use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

type AnyValue = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
struct VertexRecord {
    children: IndexSet<String>,
    attributes: HashMap<&'static str, AnyValue>,
}

struct Inner {
    vertices: IndexMap<String, VertexRecord>,
}

/// A synchronized, string-keyed DAG of component-version vertices (spec §4.3, C3).
///
/// Reads take a shared lock, writes an exclusive one; both edge mutation and attribute
/// mutation go through the same lock, so attribute reads can never race a concurrent vertex or
/// edge insertion. Attributes are append-only per key: a second write to the same
/// `(vertex, key)` pair is [`GraphError::AttributeAlreadySet`].
pub struct Dag {
    inner: RwLock<Inner>,
}

impl Default for Dag {
    fn default() -> Self {
        Self::new()
    }
}

impl Dag {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                vertices: IndexMap::new(),
            }),
        }
    }

    /// Inserts `id` if absent. Idempotent: inserting an existing id is a no-op and returns
    /// `false`.
    pub async fn add_vertex(&self, id: &str) -> bool {
        let mut inner = self.inner.write().await;
        if inner.vertices.contains_key(id) {
            false
        } else {
            inner.vertices.insert(id.to_string(), VertexRecord::default());
            true
        }
    }

    /// Adds the edge `parent -> child` (parent references child). Both vertices must already
    /// exist. Fails with [`GraphError::Cycle`] if `child` can already reach `parent`, which
    /// would close a cycle.
    pub async fn add_edge(&self, parent: &str, child: &str) -> Result<(), GraphError> {
        let mut inner = self.inner.write().await;

        if !inner.vertices.contains_key(parent) {
            return Err(GraphError::VertexNotFound {
                id: parent.to_string(),
            });
        }
        if !inner.vertices.contains_key(child) {
            return Err(GraphError::VertexNotFound {
                id: child.to_string(),
            });
        }

        if parent == child || reaches(&inner, child, parent) {
            let mut participants = vec![parent.to_string()];
            participants.extend(shortest_path(&inner, child, parent));
            return Err(GraphError::Cycle { participants });
        }

        inner
            .vertices
            .get_mut(parent)
            .expect("checked above")
            .children
            .insert(child.to_string());
        Ok(())
    }

    pub async fn contains_vertex(&self, id: &str) -> bool {
        self.inner.read().await.vertices.contains_key(id)
    }

    /// Direct children of `id`, in edge-insertion order.
    pub async fn children_of(&self, id: &str) -> Vec<String> {
        self.inner
            .read()
            .await
            .vertices
            .get(id)
            .map(|record| record.children.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// All vertex ids, in insertion order.
    pub async fn all_ids(&self) -> Vec<String> {
        self.inner.read().await.vertices.keys().cloned().collect()
    }

    /// Vertices with no incoming edge, in insertion order.
    pub async fn roots(&self) -> Vec<String> {
        let inner = self.inner.read().await;
        let mut has_parent: HashMap<&str, bool> =
            inner.vertices.keys().map(|k| (k.as_str(), false)).collect();
        for record in inner.vertices.values() {
            for child in &record.children {
                has_parent.insert(child.as_str(), true);
            }
        }
        inner
            .vertices
            .keys()
            .filter(|id| !has_parent.get(id.as_str()).copied().unwrap_or(false))
            .cloned()
            .collect()
    }

    /// All ids in topological order (parents before children), breaking ties by insertion
    /// order. Uses Kahn's algorithm over in-degree.
    pub async fn topological_order(&self) -> Vec<String> {
        let inner = self.inner.read().await;
        let mut in_degree: HashMap<&str, usize> =
            inner.vertices.keys().map(|k| (k.as_str(), 0)).collect();
        for record in inner.vertices.values() {
            for child in &record.children {
                *in_degree.get_mut(child.as_str()).expect("known vertex") += 1;
            }
        }

        let mut queue: VecDeque<String> = inner
            .vertices
            .keys()
            .filter(|id| in_degree[id.as_str()] == 0)
            .cloned()
            .collect();

        let mut order = Vec::with_capacity(inner.vertices.len());
        while let Some(id) = queue.pop_front() {
            order.push(id.clone());
            if let Some(record) = inner.vertices.get(&id) {
                for child in &record.children {
                    let degree = in_degree.get_mut(child.as_str()).expect("known vertex");
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(child.clone());
                    }
                }
            }
        }
        order
    }

    /// [`Self::topological_order`] reversed: children before parents, the order `Construct`
    /// (C6) processes vertices in.
    pub async fn reverse_topological_order(&self) -> Vec<String> {
        let mut order = self.topological_order().await;
        order.reverse();
        order
    }

    /// Writes attribute `key` for `id` exactly once; a second write to the same key is
    /// [`GraphError::AttributeAlreadySet`].
    pub async fn set_attribute<T: Any + Send + Sync>(
        &self,
        id: &str,
        key: &'static str,
        value: T,
    ) -> Result<(), GraphError> {
        let mut inner = self.inner.write().await;
        let record = inner
            .vertices
            .get_mut(id)
            .ok_or_else(|| GraphError::VertexNotFound { id: id.to_string() })?;
        if record.attributes.contains_key(key) {
            return Err(GraphError::AttributeAlreadySet {
                vertex: id.to_string(),
                key,
            });
        }
        record.attributes.insert(key, Arc::new(value));
        Ok(())
    }

    /// Reads attribute `key` for `id`, if present and of type `T`.
    pub async fn get_attribute<T: Any + Send + Sync>(
        &self,
        id: &str,
        key: &'static str,
    ) -> Option<Arc<T>> {
        let inner = self.inner.read().await;
        let record = inner.vertices.get(id)?;
        let value = record.attributes.get(key)?.clone();
        value.downcast::<T>().ok()
    }

    pub async fn has_attribute(&self, id: &str, key: &'static str) -> bool {
        let inner = self.inner.read().await;
        inner
            .vertices
            .get(id)
            .map(|r| r.attributes.contains_key(key))
            .unwrap_or(false)
    }

    pub async fn vertex_count(&self) -> usize {
        self.inner.read().await.vertices.len()
    }
}

fn reaches(inner: &Inner, from: &str, to: &str) -> bool {
    let mut stack = vec![from.to_string()];
    let mut seen = IndexSet::new();
    while let Some(current) = stack.pop() {
        if current == to {
            return true;
        }
        if !seen.insert(current.clone()) {
            continue;
        }
        if let Some(record) = inner.vertices.get(&current) {
            for child in &record.children {
                stack.push(child.clone());
            }
        }
    }
    false
}

fn shortest_path(inner: &Inner, from: &str, to: &str) -> Vec<String> {
    let mut queue = VecDeque::new();
    let mut came_from: HashMap<String, String> = HashMap::new();
    queue.push_back(from.to_string());
    let mut visited = IndexSet::new();
    visited.insert(from.to_string());

    while let Some(current) = queue.pop_front() {
        if current == to {
            let mut path = vec![current.clone()];
            let mut cursor = current;
            while let Some(prev) = came_from.get(&cursor) {
                path.push(prev.clone());
                cursor = prev.clone();
            }
            path.reverse();
            return path;
        }
        if let Some(record) = inner.vertices.get(&current) {
            for child in &record.children {
                if visited.insert(child.clone()) {
                    came_from.insert(child.clone(), current.clone());
                    queue.push_back(child.clone());
                }
            }
        }
    }
    vec![from.to_string(), to.to_string()]
}
