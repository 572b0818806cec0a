//! Application constants
//!
//! Centralized chain parameters, polling cadence, retry limits, and UI timing used
//! throughout the application.

/// Chain parameters the explorer relies on for its estimates
pub mod chain {
    /// Blocks per second assumed for every DAA-score based estimate
    pub const BLOCKS_PER_SECOND: u64 = 5;

    /// Sompi per displayed HTN
    pub const SOMPI_PER_HTN: f64 = 100_000_000.0;

    /// Blue-score depth after which a transaction is shown as finalized
    pub const FINALITY_DEPTH: u64 = 86_400;

    /// DAA score at which the next scheduled hard fork activates
    pub const NEXT_HARD_FORK_DAA_SCORE: u64 = 123_956_218;

    /// Display currency unit
    pub const TICKER: &str = "HTN";

    /// Network label shown on the dashboard
    pub const NETWORK_NAME: &str = "hoosat mainnet";
}

/// Polling cadence for the network stats view
pub mod poll {
    /// Full refresh (DAG info, node info, server version)
    pub const STATS_INTERVAL_MS: u64 = 30_000;

    /// Mempool-only refresh
    pub const MEMPOOL_INTERVAL_MS: u64 = 1_000;

    /// Virtual chain blue score refresh while a transaction is open
    pub const BLUE_SCORE_INTERVAL_MS: u64 = 1_000;
}

/// Transaction view retry limits
pub mod retry {
    /// Lookups answered "not found" before giving up
    pub const MAX_NOT_FOUND: u32 = 100;

    /// Delay between not-found lookups
    pub const NOT_FOUND_DELAY_MS: u64 = 1_000;

    /// Re-fetches allowed while a recent transaction is still unaccepted
    pub const MAX_NOT_ACCEPTED: u32 = 6;

    /// Delay between not-accepted re-fetches
    pub const NOT_ACCEPTED_DELAY_MS: u64 = 2_000;

    /// Only transactions younger than this are re-fetched while unaccepted
    pub const NOT_ACCEPTED_WINDOW_MS: i64 = 60_000;
}

/// Application state and behavior constants
pub mod app {
    /// Duration to show toast notifications (seconds)
    pub const TOAST_DURATION_SECS: u64 = 2;

    /// How long a changed value stays highlighted
    pub const HIGHLIGHT_MS: u64 = 300;

    /// Target UI frame rate
    pub const RENDER_FPS: u32 = 20;
}

/// Wire-level markers returned by the REST backend
pub mod api {
    /// `detail` value the backend uses instead of a 404 for unknown transactions
    pub const TX_NOT_FOUND_DETAIL: &str = "Transaction not found";

    /// Node daemon name used in the server version endpoint
    pub const NODE_DAEMON: &str = "htnd";
}
