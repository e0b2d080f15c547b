//! Synchronized DAG of component-version vertices (spec §4.3, C3).
//!
//! [`Dag`] stores string-keyed vertices, directed edges, and a per-vertex attribute map under
//! a single `tokio::sync::RwLock`. It knows nothing about components, descriptors, or
//! plug-ins — attributes are stored as `Arc<dyn Any + Send + Sync>` and typed back out by the
//! caller (forge-discovery, forge-engine).

pub mod dag;
pub mod error;

pub use dag::Dag;
pub use error::GraphError;
