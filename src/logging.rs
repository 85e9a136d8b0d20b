use tracing_subscriber::EnvFilter;

/// Install the global log subscriber.
///
/// `RUST_LOG` wins when set; otherwise this crate logs at debug in debug
/// builds and info in release, and dependencies only log warnings.
pub fn setup(is_debug: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let default = if is_debug {
        "photo_grid=debug,warn"
    } else {
        "photo_grid=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
}
