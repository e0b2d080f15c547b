mod cli;
mod document;
mod tracing_init;
mod wiring;

use anyhow::Context;
use clap::Parser;
use cli::{Command, ConstructArgs, ForgeCommand};
use forge_engine::{ConfigLoader, Engine, EngineConfig};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    let command = ForgeCommand::parse();
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building the async runtime")?
        .block_on(async_main(command))
}

async fn async_main(command: ForgeCommand) -> anyhow::Result<()> {
    match command.command {
        Command::Construct(args) => run_construct(args).await,
    }
}

async fn run_construct(args: ConstructArgs) -> anyhow::Result<()> {
    let config: EngineConfig = ConfigLoader::new(&args.config)
        .load()
        .context("loading engine configuration")?;
    tracing_init::init_tracing(&config.tracing);

    let components = document::load_constructor_document(&args.file)?;
    info!(count = components.len(), "loaded constructor document");

    let mut options = wiring::default_construct_options(&args);
    if args.concurrency.is_none() {
        options = options.with_concurrency_limit(config.concurrency_limit);
    }
    if args.conflict_policy.is_none() {
        options = options.with_conflict_policy(config.component_version_conflict_policy);
    }
    if args.copy_policy.is_none() {
        options = options.with_copy_policy(config.external_component_version_copy_policy);
    }

    let engine = Engine::new();
    let result = engine
        .construct(components, &options, CancellationToken::new())
        .await;

    let graph = engine.get_graph();
    for vertex_id in graph.all_ids().await {
        if graph.has_attribute(&vertex_id, "descriptor").await {
            println!("constructed {vertex_id}");
        }
    }

    match result {
        Ok(()) => {
            info!("construct completed successfully");
            Ok(())
        }
        Err(err) => {
            error!(error = %err, "construct failed");
            anyhow::bail!("construct failed: {}", forge_model::SafeDisplay::to_safe_string(&err));
        }
    }
}
