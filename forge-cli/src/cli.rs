use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Content-addressable component artifact construction engine.
#[derive(Debug, Parser)]
#[command(name = "forge", version, about, long_about = None)]
pub struct ForgeCommand {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the DAG for a constructor document and publish every reachable component version.
    Construct(ConstructArgs),
}

#[derive(Debug, Parser)]
pub struct ConstructArgs {
    /// Path to the constructor document (YAML, `{components: [...]}`).
    #[arg(long)]
    pub file: PathBuf,

    /// Directory the filesystem target repository writes component versions and blobs under.
    #[arg(long)]
    pub target_dir: PathBuf,

    /// Maximum number of vertices discovered or processed at once. Defaults to the configured
    /// value (compiled-in default, optionally overridden by config file or environment).
    #[arg(long)]
    pub concurrency: Option<usize>,

    #[arg(long, value_enum)]
    pub conflict_policy: Option<ConflictPolicyArg>,

    #[arg(long, value_enum)]
    pub copy_policy: Option<CopyPolicyArg>,

    /// Optional TOML file layered under the compiled-in defaults and above by `APP_` env vars.
    #[arg(long, default_value = "forge.toml")]
    pub config: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConflictPolicyArg {
    AbortAndFail,
    Skip,
    Replace,
}

impl From<ConflictPolicyArg> for forge_engine::ConflictPolicy {
    fn from(value: ConflictPolicyArg) -> Self {
        match value {
            ConflictPolicyArg::AbortAndFail => forge_engine::ConflictPolicy::AbortAndFail,
            ConflictPolicyArg::Skip => forge_engine::ConflictPolicy::Skip,
            ConflictPolicyArg::Replace => forge_engine::ConflictPolicy::Replace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CopyPolicyArg {
    CopyOrFail,
    Skip,
}

impl From<CopyPolicyArg> for forge_engine::CopyPolicy {
    fn from(value: CopyPolicyArg) -> Self {
        match value {
            CopyPolicyArg::CopyOrFail => forge_engine::CopyPolicy::CopyOrFail,
            CopyPolicyArg::Skip => forge_engine::CopyPolicy::Skip,
        }
    }
}
