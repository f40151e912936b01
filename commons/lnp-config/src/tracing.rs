use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Install a `fmt` subscriber filtered by `RUST_LOG` plus `default_env`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing(default_env: &str) {
    let directive = default_env
        .parse()
        .unwrap_or_else(|_| "info".parse().expect("static directive"));
    let filter = EnvFilter::builder()
        .with_env_var("RUST_LOG")
        .from_env_lossy()
        .add_directive(directive);

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(filter)
        .try_init();
}
