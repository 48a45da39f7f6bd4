//! Log targets for the networking module.

/// Target names for log filtering.
pub mod targets {
    /// Networking crate target.
    pub const NET: &str = "horizon_icons_net";
    /// Redundant fetcher target (host attempts, failover).
    pub const FETCH: &str = "horizon_icons_net::fetch";
    /// Icon API loader target.
    pub const API: &str = "horizon_icons_net::api";
    /// Provider configuration target.
    pub const CONFIG: &str = "horizon_icons_net::config";
}
