//! FILENAME: core/pivot-engine/src/logging.rs
// PURPOSE: Category-tagged logging on top of the `log` facade.
//
// The engine never installs a logger; whatever the host application set up
// receives the records. The category becomes the log target, so hosts can
// filter with e.g. `RUST_LOG=PIVOT=debug`.

use log::Level;

/// Write an ENTER line for function entry
pub fn write_log_enter(level: Level, category: &str, func_name: &str, params: &str) {
    if params.is_empty() {
        log::log!(target: category, level, "ENTER {}", func_name);
    } else {
        log::log!(target: category, level, "ENTER {} {}", func_name, params);
    }
}

/// Write an EXIT line for function exit
pub fn write_log_exit(level: Level, category: &str, func_name: &str, result: &str) {
    if result.is_empty() {
        log::log!(target: category, level, "EXIT {}", func_name);
    } else {
        log::log!(target: category, level, "EXIT {} {}", func_name, result);
    }
}

// ============================================================================
// MACRO DEFINITIONS & EXPORTS
// ============================================================================

#[macro_export]
macro_rules! log_debug {
    ($cat:expr, $($arg:tt)*) => {
        ::log::debug!(target: $cat, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_info {
    ($cat:expr, $($arg:tt)*) => {
        ::log::info!(target: $cat, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($cat:expr, $($arg:tt)*) => {
        ::log::warn!(target: $cat, $($arg)*)
    };
}

// ENTER/EXIT macros for function tracing. Arguments are only formatted when
// the category is enabled at debug level.

#[macro_export]
macro_rules! log_enter {
    ($cat:expr, $func:expr) => {
        $crate::logging::write_log_enter(::log::Level::Debug, $cat, $func, "")
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        if ::log::log_enabled!(target: $cat, ::log::Level::Debug) {
            $crate::logging::write_log_enter(::log::Level::Debug, $cat, $func, &format!($($arg)*))
        }
    };
}

#[macro_export]
macro_rules! log_exit {
    ($cat:expr, $func:expr) => {
        $crate::logging::write_log_exit(::log::Level::Debug, $cat, $func, "")
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        if ::log::log_enabled!(target: $cat, ::log::Level::Debug) {
            $crate::logging::write_log_exit(::log::Level::Debug, $cat, $func, &format!($($arg)*))
        }
    };
}
