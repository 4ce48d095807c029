//! Named log channels.
//!
//! Every crate logs through one of three tracing targets so the subscriber
//! configured at startup can route and filter them independently.

/// Application lifecycle: startup, shutdown, session lifecycle events.
pub const MAIN: &str = "betterqr::main";

/// One record per handled HTTP request.
pub const REQUESTS: &str = "betterqr::requests";

/// Persistence layer: connection, migrations, store operations.
pub const DB: &str = "betterqr::db";

/// All channels, in the order they are configured.
pub const CHANNELS: [&str; 3] = [MAIN, REQUESTS, DB];

/// Log levels accepted by the logging configuration.
pub const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Returns `true` when `level` names a supported log level (case-insensitive).
pub fn is_valid_level(level: &str) -> bool {
    LEVELS.iter().any(|l| l.eq_ignore_ascii_case(level))
}

/// Builds a filter directive that applies `level` to every channel.
pub fn channel_directives(level: &str) -> String {
    let level = level.to_ascii_lowercase();
    let mut directives = vec!["warn".to_string()];
    directives.extend(CHANNELS.iter().map(|c| format!("{c}={level}")));
    directives.push(format!("tower_http={level}"));
    directives.join(",")
}
