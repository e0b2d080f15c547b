//! Vertex resolution and child-identity discovery (spec §4.3, C4).
//!
//! [`resolve::resolve`] turns an identity into either a constructor component or an externally
//! fetched descriptor; [`resolve::discover`] reads the child identities named by that payload's
//! `componentReferences`. Neither function touches the DAG directly — forge-engine drives both
//! against [`forge_graph::Dag`].

pub mod error;
pub mod payload;
pub mod resolve;

pub use error::DiscoveryError;
pub use payload::VertexPayload;
pub use resolve::{discover, resolve};
