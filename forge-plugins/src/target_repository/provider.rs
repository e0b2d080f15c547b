use forge_registry::{RepositoryError, TargetRepository, TargetRepositoryProvider};
use std::sync::Arc;

/// Hands out the same target repository for every component, the common case for a single local
/// or single remote target (spec §4.7: "resolved via `TargetRepositoryProvider`").
pub struct SingleTargetRepositoryProvider {
    repository: Arc<dyn TargetRepository>,
}

impl SingleTargetRepositoryProvider {
    pub fn new(repository: Arc<dyn TargetRepository>) -> Self {
        Self { repository }
    }
}

impl TargetRepositoryProvider for SingleTargetRepositoryProvider {
    fn repository_for(
        &self,
        _name: &str,
        _version: &str,
    ) -> Result<Arc<dyn TargetRepository>, RepositoryError> {
        Ok(self.repository.clone())
    }
}
