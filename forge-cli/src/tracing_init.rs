use forge_engine::TracingConfig;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initializes the global `tracing` subscriber from configuration (spec §4.6). The only place in
/// the whole crate allowed to do so — library code only emits spans and events.
pub fn init_tracing(config: &TracingConfig) {
    let env_filter = EnvFilter::try_new(&config.env_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = FmtSubscriber::builder().with_env_filter(env_filter);

    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
