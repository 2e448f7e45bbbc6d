//! One macro per level. Each forces logger initialization and forwards to `tracing::event!` with the threshold
//! attached as a field, which `ThresholdFilterLayer` reads and `VertexFieldFormatter` hides.
//!
//! A leading expression is always taken as the threshold, so a message with format arguments must spell its threshold
//! out: `info!(0, "{} vertices", n)`, never `info!("{} vertices", n)`.

/// Internal: shared body of every level macro.
#[doc(hidden)]
#[macro_export]
macro_rules! log_event {
    ($level:expr, $critical:expr, $threshold:expr, $($arg:tt)+) => {
        {
            $crate::log::init_logger();
            tracing::event!(
                $level,
                critical = $critical,
                threshold = $threshold,
                message = format_args!($($arg)+)
            );
        }
    };
}

#[macro_export]
macro_rules! critical {
    ($threshold:expr, $($arg:tt)+) => {
        $crate::log_event!(tracing::Level::ERROR, true, $threshold, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log_event!(tracing::Level::ERROR, true, 0, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($threshold:expr, $($arg:tt)+) => {
        $crate::log_event!(tracing::Level::ERROR, false, $threshold, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log_event!(tracing::Level::ERROR, false, 0, $($arg)+)
    };
}

#[macro_export]
macro_rules! warning {
    ($threshold:expr, $($arg:tt)+) => {
        $crate::log_event!(tracing::Level::WARN, false, $threshold, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log_event!(tracing::Level::WARN, false, 0, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($threshold:expr, $($arg:tt)+) => {
        $crate::log_event!(tracing::Level::INFO, false, $threshold, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log_event!(tracing::Level::INFO, false, 0, $($arg)+)
    };
}

#[macro_export]
macro_rules! debug {
    ($threshold:expr, $($arg:tt)+) => {
        $crate::log_event!(tracing::Level::DEBUG, false, $threshold, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log_event!(tracing::Level::DEBUG, false, 0, $($arg)+)
    };
}

#[macro_export]
macro_rules! trace {
    ($threshold:expr, $($arg:tt)+) => {
        $crate::log_event!(tracing::Level::TRACE, false, $threshold, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log_event!(tracing::Level::TRACE, false, 0, $($arg)+)
    };
}


// Makes the macros importable from the `log` module.
pub use {critical, error, warning, info, debug, trace};
