//! Lightweight, configurable logging shared by all codemill crates.
//!
//! Levels come from the CODEMILL_LOG environment variable:
//! - off (default) - no logs
//! - info - basic operation logs
//! - debug - detailed diagnostic logs
//! - warn / error - problems only

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

static INIT: Once = Once::new();

/// Initialize diagnostics based on the CODEMILL_LOG environment variable.
///
/// Call once at startup; subsequent calls are ignored.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let log_level = std::env::var("CODEMILL_LOG").unwrap_or_else(|_| "off".to_string());

        let level = match log_level.as_str() {
            "off" => return,
            "debug" => emit::Level::Debug,
            "info" => emit::Level::Info,
            "warn" => emit::Level::Warn,
            "error" => emit::Level::Error,
            other => {
                eprintln!("Warning: Unknown CODEMILL_LOG value '{}', using 'info'", other);
                emit::Level::Info
            }
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(level))
            .init();

        // The runtime must outlive the process; there is no shutdown hook.
        std::mem::forget(rt);
    });
}

/// Log basic operations (walks, command emission, session lifecycle).
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log detailed diagnostics (per-path decisions, payload sizes, internal state).
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log recoverable issues (fallbacks, partial captures, odd input).
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log failures that prevent normal operation.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

pub use init_diagnostics as init;
