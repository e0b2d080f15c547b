pub mod memory;

pub use memory::{InMemoryResourceRepository, SingleResourceRepositoryProvider};
