use tracing_subscriber::EnvFilter;

/// Fallback level; anything louder would interleave with the prompts.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Build the filter directive from `STRAVA_EXPORT_LOG_LEVEL`, then
/// `RUST_LOG`, then [`DEFAULT_LOG_LEVEL`], keeping HTTP internals quiet.
pub fn filter_directive(level: Option<String>, rust_log: Option<String>) -> String {
    let level = level
        .or(rust_log)
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    format!("{level},hyper=warn,reqwest=warn")
}

/// Install the global subscriber. Logs go to stderr so stdout stays the
/// user-facing screen.
pub fn init_tracing() {
    let directive = filter_directive(
        std::env::var("STRAVA_EXPORT_LOG_LEVEL").ok(),
        std::env::var("RUST_LOG").ok(),
    );
    let env_filter = EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| EnvFilter::new(format!("{DEFAULT_LOG_LEVEL},hyper=warn,reqwest=warn")));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    tracing::debug!("log filter: {}", directive);
}
