//! Core data model for the component construction engine.
//!
//! This crate defines the types that describe a component version and its constituent
//! resources, sources, and references, plus the identity and validation rules that every
//! other crate in the workspace builds on. It has no knowledge of the DAG, the plug-in
//! registries, or the engine itself.

pub mod access_or_input;
pub mod blob;
pub mod component;
pub mod descriptor;
pub mod error;
pub mod identity;
pub mod label;
pub mod meta;
pub mod reference;
pub mod resource;
pub mod safe_display;
pub mod source;
pub mod typed_spec;
pub mod validate;

pub use access_or_input::{AccessOrInput, AccessOrInputError};
pub use blob::{Blob, BlobChunks, BlobMeta};
pub use component::{Component, Provider};
pub use descriptor::{Descriptor, Signature, SCHEMA_VERSION};
pub use error::ValidationError;
pub use identity::{ComponentIdentity, Identity, IdentityError};
pub use label::Label;
pub use meta::{ComponentMeta, ElementMeta};
pub use reference::Reference;
pub use resource::{Relation, Resource};
pub use safe_display::SafeDisplay;
pub use source::Source;
pub use typed_spec::{TypedSpec, TypedTag};
pub use validate::validate_component;
