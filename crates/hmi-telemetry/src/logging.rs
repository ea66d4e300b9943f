//! Structured log helpers.
//!
//! Every component log line carries a `component` field so that JSON logs
//! from several bus components can be told apart.

/// Log an event tagged with the emitting bus component.
///
/// ```rust,ignore
/// log_event!(info, "RC", "Settings notification sent", allowed = true);
/// ```
#[macro_export]
macro_rules! log_event {
    (info, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (warn, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (error, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };

    (debug, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a bus frame with its method and correlation id.
#[macro_export]
macro_rules! log_frame_event {
    ($level:ident, $component:expr, $msg:expr, $method:expr, $id:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = $component,
            method = %$method,
            id = %$id,
            $($($field)*,)?
            $msg
        )
    };
}
