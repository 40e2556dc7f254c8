//! Logging infrastructure for rangefilter.
//!
//! Events are emitted through `tracing` on target "rangefilter" and carry an
//! `event` field for filtering. The crate never installs a global subscriber;
//! applications configure one via `tracing_subscriber` or similar.
//!
//! ## Conventions
//!
//! - `event`: snake_case event name (required)
//! - `component`: subsystem (e.g., "decompose", "scan")
//! - Use `%` for Display, `?` for Debug formatting

/// Target for all rangefilter log events.
pub(crate) const RANGEFILTER_TARGET: &str = "rangefilter";

/// Macro for debug-level log events.
///
/// # Example
/// ```ignore
/// log_debug!(
///     component = "decompose",
///     event = "filter_decomposed",
///     disjuncts = sets.len(),
/// );
/// ```
macro_rules! log_debug {
    ($($field:tt)*) => {
        ::tracing::debug!(target: $crate::observability::RANGEFILTER_TARGET, $($field)*)
    };
}

/// Macro for trace-level log events.
macro_rules! log_trace {
    ($($field:tt)*) => {
        ::tracing::trace!(target: $crate::observability::RANGEFILTER_TARGET, $($field)*)
    };
}

/// Macro for warn-level log events.
macro_rules! log_warn {
    ($($field:tt)*) => {
        ::tracing::warn!(target: $crate::observability::RANGEFILTER_TARGET, $($field)*)
    };
}

pub(crate) use log_debug;
pub(crate) use log_trace;
pub(crate) use log_warn;
