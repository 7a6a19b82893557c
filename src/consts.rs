//! Project-wide constants.

use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "Meow-tivation";

/// Endpoint value that means "no webhook configured yet".
pub const UNCONFIGURED_ENDPOINT: &str = "YOUR_N8N_WEBHOOK_URL_HERE";

/// Minimum time the loading indicator stays up, even for instant sources.
pub const DEFAULT_MIN_LOADING: Duration = Duration::from_millis(2000);

/// Key under which the handoff slot lives.
pub const HANDOFF_KEY: &str = "dailyQuoteData";

/// Delay before the result screen bounces back to the request screen.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1000);

/// How long an envelope failure stays on screen before redirecting.
pub const ERROR_DISPLAY_DELAY: Duration = Duration::from_millis(2000);

/// Per-character delay of the quote reveal.
pub const REVEAL_INTERVAL: Duration = Duration::from_millis(30);

/// How long the result screen waits on an image before using the placeholder.
pub const IMAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest a one-shot copy keeps serving the clipboard before exiting.
pub const CLIPBOARD_HOLD: Duration = Duration::from_secs(3);

/// How long a toast notice stays visible.
pub const NOTICE_DURATION: Duration = Duration::from_millis(3000);

/// Handoff location that lives and dies with the process.
pub const EPHEMERAL_SESSION: &str = ":memory:";

/// Handoff database shared by the one-shot subcommands, so `request`
/// can hand off to a later `result`.
pub fn default_session_path() -> PathBuf {
    std::env::temp_dir().join("meowtivation").join("session.db")
}

/// Where the handoff slot lives. An explicit path always wins. Otherwise
/// an interactive session keeps a private in-memory slot and the one-shot
/// subcommands share [`default_session_path`].
pub fn session_location(explicit: Option<&Path>, interactive: bool) -> String {
    match explicit {
        Some(path) => path.to_string_lossy().into_owned(),
        None if interactive => EPHEMERAL_SESSION.to_string(),
        None => default_session_path().to_string_lossy().into_owned(),
    }
}

/// Default settings database: `~/.meowtivation/config.db`.
/// Falls back to the temp dir when there is no home directory.
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".meowtivation")
        .join("config.db")
}

/// Current UTC time as an RFC 3339 string with millisecond precision.
pub fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Format a duration as whole milliseconds (e.g. `2000 ms`).
pub fn format_millis(d: Duration) -> String {
    format!("{} ms", d.as_millis())
}
