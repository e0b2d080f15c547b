//! Minimal, concrete plug-ins for the construction engine: `file`/`utf8` input methods, an
//! in-memory and a content-addressable filesystem target repository, in-memory resource and
//! external-component repositories, and a static credential resolver. Everything here is wired
//! together by `forge-cli`, and doubles as test fixtures for `forge-engine`'s integration tests.

mod error;

pub mod credentials;
pub mod digest;
pub mod external_repository;
pub mod input_methods;
pub mod resource_repository;
pub mod target_repository;

pub use credentials::StaticCredentialResolver;
pub use digest::{sha256_digest, split_digest};
pub use external_repository::{
    InMemoryExternalComponentRepository, SingleExternalComponentRepositoryProvider,
};
pub use input_methods::{FileInputMethod, Utf8InputMethod};
pub use resource_repository::{InMemoryResourceRepository, SingleResourceRepositoryProvider};
pub use target_repository::{
    FilesystemTargetRepository, InMemoryTargetRepository, SingleTargetRepositoryProvider,
};
