use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// `AddComponentVersion` behavior when the target already contains `(name, version)` (spec
/// §4.1, §4.2 "Conflict policy").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    AbortAndFail,
    Skip,
    Replace,
}

impl Default for ConflictPolicy {
    fn default() -> Self {
        ConflictPolicy::AbortAndFail
    }
}

/// Behavior for externally-referenced component versions (spec §4.2 "External vertex").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CopyPolicy {
    CopyOrFail,
    Skip,
}

impl Default for CopyPolicy {
    fn default() -> Self {
        CopyPolicy::Skip
    }
}

/// Tracing/log formatting, following the teacher's local-dev-pretty-vs-JSON split
/// (`golem_common::tracing::TracingConfig`). Consumed only by the CLI binary (spec §4.6): the
/// engine never initializes a subscriber itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracingConfig {
    pub json: bool,
    pub env_filter: String,
}

impl TracingConfig {
    pub fn local_dev() -> Self {
        Self {
            json: false,
            env_filter: "info".to_string(),
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::local_dev()
    }
}

/// Layered engine configuration (spec §4.5, A1): compiled-in defaults, overridden by an
/// optional TOML file, overridden by `APP_`-prefixed environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub concurrency_limit: usize,
    pub component_version_conflict_policy: ConflictPolicy,
    pub external_component_version_copy_policy: CopyPolicy,
    pub tracing: TracingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: default_concurrency_limit(),
            component_version_conflict_policy: ConflictPolicy::default(),
            external_component_version_copy_policy: CopyPolicy::default(),
            tracing: TracingConfig::default(),
        }
    }
}

fn default_concurrency_limit() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// A named example configuration, surfaced for documentation generation (mirrors the teacher's
/// `golem_common::config::{ConfigExample, HasConfigExamples}`).
pub struct ConfigExample<T> {
    pub name: &'static str,
    pub value: T,
}

pub trait HasConfigExamples<T> {
    fn examples() -> Vec<ConfigExample<T>>;
}

impl HasConfigExamples<EngineConfig> for EngineConfig {
    fn examples() -> Vec<ConfigExample<EngineConfig>> {
        vec![ConfigExample {
            name: "default",
            value: EngineConfig::default(),
        }]
    }
}

/// Loads a `T: Default + Serialize + DeserializeOwned` from compiled-in defaults, an optional
/// TOML file, then `APP_`-prefixed environment variables, in that precedence order.
pub struct ConfigLoader<T> {
    toml_path: PathBuf,
    _marker: std::marker::PhantomData<T>,
}

impl<T> ConfigLoader<T>
where
    T: Default + Serialize + for<'de> Deserialize<'de>,
{
    pub fn new(toml_path: impl AsRef<Path>) -> Self {
        Self {
            toml_path: toml_path.as_ref().to_path_buf(),
            _marker: std::marker::PhantomData,
        }
    }

    pub fn load(&self) -> Result<T, figment::Error> {
        Figment::new()
            .merge(Serialized::defaults(T::default()))
            .merge(Toml::file(&self.toml_path))
            .merge(Env::prefixed("APP_").split("_"))
            .extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::assert;

    #[test]
    fn default_config_loads_without_a_file_or_env() {
        let loader: ConfigLoader<EngineConfig> = ConfigLoader::new("does-not-exist.toml");
        let config = loader.load().unwrap();
        assert!(config.concurrency_limit >= 1);
        assert!(config.component_version_conflict_policy == ConflictPolicy::AbortAndFail);
        assert!(config.external_component_version_copy_policy == CopyPolicy::Skip);
    }

    #[test]
    fn env_override_takes_precedence_over_default() {
        std::env::set_var("APP_CONCURRENCY_LIMIT", "7");
        let loader: ConfigLoader<EngineConfig> = ConfigLoader::new("does-not-exist.toml");
        let config = loader.load().unwrap();
        std::env::remove_var("APP_CONCURRENCY_LIMIT");
        assert!(config.concurrency_limit == 7);
    }
}
