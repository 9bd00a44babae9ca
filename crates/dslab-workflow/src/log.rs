//! Logging facilities.
//!
//! Messages are formatted as `[<time> <LEVEL> <component>] <message>`, where time is the current simulation time.

use atty::Stream;
use colored::{Color, ColoredString, Colorize};

pub use colored;

/// Applies the color to the string if stderr (log) goes to console.
pub fn get_colored(s: &str, color: Color) -> ColoredString {
    if atty::is(Stream::Stderr) {
        s.color(color)
    } else {
        s.normal()
    }
}

/// Logs a message at the info level.
///
/// # Examples
///
/// ```rust
/// use dslab_workflow::log_info;
///
/// let time = 1.5;
/// log_info!(time, "controller", "started");
/// log_info!(time, "controller", "submitted {} tasks", 3);
/// ```
#[macro_export]
macro_rules! log_info {
    ($time:expr, $name:expr, $msg:expr) => (
        log::info!(
            target: $name,
            "[{:.3} {}  {}] {}",
            $time, $crate::log::get_colored("INFO", $crate::log::colored::Color::Green), $name, $msg
        )
    );
    ($time:expr, $name:expr, $format:expr, $($arg:tt)+) => (
        log::info!(
            target: $name,
            concat!("[{:.3} {}  {}] ", $format),
            $time, $crate::log::get_colored("INFO", $crate::log::colored::Color::Green), $name, $($arg)+
        )
    );
}

/// Logs a message at the debug level.
#[macro_export]
macro_rules! log_debug {
    ($time:expr, $name:expr, $msg:expr) => (
        log::debug!(
            target: $name,
            "[{:.3} {} {}] {}",
            $time, $crate::log::get_colored("DEBUG", $crate::log::colored::Color::Blue), $name, $msg
        )
    );
    ($time:expr, $name:expr, $format:expr, $($arg:tt)+) => (
        log::debug!(
            target: $name,
            concat!("[{:.3} {} {}] ", $format),
            $time, $crate::log::get_colored("DEBUG", $crate::log::colored::Color::Blue), $name, $($arg)+
        )
    );
}

/// Logs a message at the trace level.
#[macro_export]
macro_rules! log_trace {
    ($time:expr, $name:expr, $msg:expr) => (
        log::trace!(
            target: $name,
            "[{:.3} {} {}] {}",
            $time, $crate::log::get_colored("TRACE", $crate::log::colored::Color::Cyan), $name, $msg
        )
    );
    ($time:expr, $name:expr, $format:expr, $($arg:tt)+) => (
        log::trace!(
            target: $name,
            concat!("[{:.3} {} {}] ", $format),
            $time, $crate::log::get_colored("TRACE", $crate::log::colored::Color::Cyan), $name, $($arg)+
        )
    );
}

/// Logs a message at the warn level.
#[macro_export]
macro_rules! log_warn {
    ($time:expr, $name:expr, $msg:expr) => (
        log::warn!(
            target: $name,
            "[{:.3} {}  {}] {}",
            $time, $crate::log::get_colored("WARN", $crate::log::colored::Color::Yellow), $name, $msg
        )
    );
    ($time:expr, $name:expr, $format:expr, $($arg:tt)+) => (
        log::warn!(
            target: $name,
            concat!("[{:.3} {}  {}] ", $format),
            $time, $crate::log::get_colored("WARN", $crate::log::colored::Color::Yellow), $name, $($arg)+
        )
    );
}

/// Logs a message at the error level.
#[macro_export]
macro_rules! log_error {
    ($time:expr, $name:expr, $msg:expr) => (
        log::error!(
            target: $name,
            "[{:.3} {} {}] {}",
            $time, $crate::log::get_colored("ERROR", $crate::log::colored::Color::Red), $name, $msg
        )
    );
    ($time:expr, $name:expr, $format:expr, $($arg:tt)+) => (
        log::error!(
            target: $name,
            concat!("[{:.3} {} {}] ", $format),
            $time, $crate::log::get_colored("ERROR", $crate::log::colored::Color::Red), $name, $($arg)+
        )
    );
}
