//! The construction orchestrator and vertex processor (spec §4.1–§4.2, C5/C6) plus the ambient
//! configuration layer (spec §4.5, A1) that feeds it.
//!
//! [`Engine::construct`] is the crate's single public entry point: validate the constructor
//! document, build the reachable DAG via `forge_discovery`, process every vertex in
//! reverse-topological batches bounded by a `tokio::sync::Semaphore`, and publish to the target
//! repository through `forge_registry`'s contracts.

pub mod config;
pub mod error;
pub mod options;
pub mod orchestrator;
pub mod vertex_processor;

pub use config::{ConfigLoader, ConflictPolicy, CopyPolicy, EngineConfig, HasConfigExamples, TracingConfig};
pub use error::EngineError;
pub use options::{ConstructOptions, OnEndComponentConstruct, OnStartComponentConstruct};
pub use orchestrator::Engine;
