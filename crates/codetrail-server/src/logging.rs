//! Tracing subscriber setup, shared by every embedder of the facade.

/// Initialize a `tracing_subscriber::fmt` layer honoring `RUST_LOG`.
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
