//! Logging facilities for Horizon Icons.
//!
//! Horizon Icons uses the `tracing` crate for instrumentation. Nothing is
//! printed unless the application installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_icons_core::queue=debug")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "horizon_icons_core";
    /// Icon registry target (updates, ticks).
    pub const STORAGE: &str = "horizon_icons_core::storage";
    /// Subscription dispatch target.
    pub const SUBSCRIPTION: &str = "horizon_icons_core::subscription";
    /// Load queue target.
    pub const QUEUE: &str = "horizon_icons_core::queue";
    /// Loader registry target.
    pub const LOADER: &str = "horizon_icons_core::loader";
    /// Scheduler target.
    pub const SCHEDULER: &str = "horizon_icons_core::scheduler";
}

/// Span names used for tracing.
pub mod span_names {
    /// Notification tick delivery.
    pub const TICK: &str = "horizon_icons::tick";
    /// Queue flush for one registry.
    pub const FLUSH: &str = "horizon_icons::flush";
}

/// Extract a readable message from a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message() {
        let payload = std::panic::catch_unwind(|| panic!("boom")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload = std::panic::catch_unwind(|| panic!("{} items", 3)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "3 items");
    }
}
