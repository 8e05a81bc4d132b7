use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const OPTIMIZE_TIMEOUT: Duration = Duration::from_secs(120);
pub const WEB_HEALTH_TIMEOUT: Duration = Duration::from_secs(10);
pub const SNAPSHOT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);
pub const HISTORY_LIMIT: usize = 10;

/// Base URL of the optimization service, overridable at build time with `LYRA_API_URL`.
pub fn api_url() -> String {
    option_env!("LYRA_API_URL")
        .filter(|url| !url.trim().is_empty())
        .unwrap_or(DEFAULT_API_URL)
        .trim_end_matches('/')
        .to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Web,
    Extension,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistPolicy {
    /// Write the snapshot on every field edit and before unload.
    pub on_change: bool,
    /// Write the snapshot (with the trimmed prompt) when a request is submitted.
    pub on_submit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessages {
    pub checking: &'static str,
    pub connected: &'static str,
    pub unavailable: &'static str,
    pub connection_failed: &'static str,
    pub offline: &'static str,
    pub optimizing: &'static str,
    pub complete: &'static str,
    pub failed: &'static str,
    pub ready_again: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    pub variant: Variant,
    pub api_url: String,
    pub optimize_timeout: Duration,
    pub health_timeout: Option<Duration>,
    /// Snapshots older than this are ignored on load. `None` keeps them forever.
    pub snapshot_max_age: Option<Duration>,
    /// Number of history entries kept. `None` disables history and the latest-result key.
    pub history_limit: Option<usize>,
    pub persist: PersistPolicy,
    pub track_analytics: bool,
    pub allow_form_reset: bool,
    pub submit_shortcut: bool,
    pub selection_feedback: bool,
    pub error_prefix: &'static str,
    pub messages: StatusMessages,
}

impl ControllerConfig {
    pub fn web(api_url: impl Into<String>) -> Self {
        Self {
            variant: Variant::Web,
            api_url: api_url.into(),
            optimize_timeout: OPTIMIZE_TIMEOUT,
            health_timeout: Some(WEB_HEALTH_TIMEOUT),
            snapshot_max_age: Some(SNAPSHOT_MAX_AGE),
            history_limit: Some(HISTORY_LIMIT),
            persist: PersistPolicy {
                on_change: true,
                on_submit: false,
            },
            track_analytics: true,
            allow_form_reset: true,
            submit_shortcut: true,
            selection_feedback: true,
            error_prefix: "Failed to optimize prompt. ",
            messages: StatusMessages {
                checking: "Checking connection...",
                connected: "Connected and ready",
                unavailable: "Backend service unavailable",
                connection_failed: "Backend connection failed",
                offline: "Backend offline - Please ensure the server is running",
                optimizing: "Optimizing with Lyra's 4-D Methodology...",
                complete: "Optimization complete",
                failed: "Optimization failed",
                ready_again: "Ready for new optimization",
            },
        }
    }

    pub fn extension(api_url: impl Into<String>) -> Self {
        Self {
            variant: Variant::Extension,
            api_url: api_url.into(),
            optimize_timeout: OPTIMIZE_TIMEOUT,
            health_timeout: None,
            snapshot_max_age: None,
            history_limit: None,
            persist: PersistPolicy {
                on_change: false,
                on_submit: true,
            },
            track_analytics: false,
            allow_form_reset: false,
            submit_shortcut: false,
            selection_feedback: false,
            error_prefix: "",
            messages: StatusMessages {
                checking: "Checking connection...",
                connected: "Ready",
                unavailable: "API unavailable",
                connection_failed: "Connection failed",
                offline: "Backend offline",
                optimizing: "Optimizing...",
                complete: "Optimization complete",
                failed: "Optimization failed",
                ready_again: "Ready",
            },
        }
    }

    pub fn for_variant(variant: Variant, api_url: impl Into<String>) -> Self {
        match variant {
            Variant::Web => Self::web(api_url),
            Variant::Extension => Self::extension(api_url),
        }
    }
}
