//! Network stats view state and the estimates derived from it.
//!
//! The backend reports the node's difficulty only. Difficulty and hashrate
//! shown to the user are estimates: both are scaled by the blocks-per-second
//! constant, and hashrate is taken as twice the difficulty. The factor of two
//! is a heuristic carried over from the Kaspa explorer, not a measurement.

use chrono::{DateTime, Duration as ChronoDuration, Utc};

use crate::constants::chain::BLOCKS_PER_SECOND;
use crate::types::{DagSnapshot, StatsUpdate};
use crate::util_text::format_countdown;

/// Display difficulty: reported difficulty times blocks per second
pub fn estimated_difficulty(reported: f64) -> f64 {
    reported * BLOCKS_PER_SECOND as f64
}

/// Estimated hashrate: twice the reported difficulty, times blocks per second
pub fn estimated_hashrate(reported: f64) -> f64 {
    reported * 2.0 * BLOCKS_PER_SECOND as f64
}

/// Whole seconds until `target` is reached from `current`, truncated toward zero.
/// Negative once the target has been passed.
pub fn seconds_to_daa_score(target: u64, current: u64) -> i64 {
    let secs = (target as i128 - current as i128) / BLOCKS_PER_SECOND as i128;
    i64::try_from(secs).unwrap_or(if secs < 0 { i64::MIN } else { i64::MAX })
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct HardForkEstimate {
    pub active: bool,
    pub eta_utc: Option<DateTime<Utc>>,
    pub remaining_secs: Option<u64>,
}

impl HardForkEstimate {
    pub fn compute(target: u64, current: u64, now: DateTime<Utc>) -> Self {
        let secs = seconds_to_daa_score(target, current);
        if secs <= 0 {
            return Self::default();
        }
        // Past chrono's date range the countdown still shows, the date does not
        let eta_utc = ChronoDuration::try_seconds(secs).and_then(|d| now.checked_add_signed(d));
        Self {
            active: true,
            eta_utc,
            remaining_secs: Some(secs as u64),
        }
    }

    /// "702h 29m 24s"
    pub fn countdown(&self) -> Option<String> {
        self.remaining_secs.map(format_countdown)
    }

    /// "Tue, 14 Oct 2025 12:00:00 GMT"
    pub fn eta_display(&self) -> Option<String> {
        self.eta_utc
            .map(|t| t.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
    }
}

/// Values whose change the view flashes briefly
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StatField {
    BlockCount,
    HeaderCount,
    VirtualDaaScore,
    Hashrate,
    HardForkEta,
}

#[derive(Clone, Debug)]
pub struct NetworkStats {
    pub snapshot: Option<DagSnapshot>,
    pub difficulty: Option<f64>,
    pub hashrate: Option<f64>,
    pub mempool_size: Option<u64>,
    pub server_version: String,
    pub hard_fork: HardForkEstimate,
    /// True until the first full cycle completes
    pub is_loading: bool,
    /// Set when the last full cycle hit any failure
    pub fetch_error: bool,
    hard_fork_target: u64,
}

impl NetworkStats {
    pub fn new(hard_fork_target: u64) -> Self {
        Self {
            snapshot: None,
            difficulty: None,
            hashrate: None,
            mempool_size: None,
            server_version: String::new(),
            hard_fork: HardForkEstimate::default(),
            is_loading: true,
            fetch_error: false,
            hard_fork_target,
        }
    }

    pub fn hard_fork_target(&self) -> u64 {
        self.hard_fork_target
    }

    /// Apply one update and report which highlighted fields changed.
    /// Failed fetches never clear what is already displayed.
    pub fn apply(&mut self, update: StatsUpdate, now: DateTime<Utc>) -> Vec<StatField> {
        let mut changed = Vec::new();
        match update {
            StatsUpdate::CycleStarted => {}
            StatsUpdate::Dag(dag) => {
                let prev = self.snapshot;
                let prev_hashrate = self.hashrate;
                let prev_eta = self.hard_fork.eta_utc;

                self.snapshot = Some(dag);
                self.difficulty = Some(estimated_difficulty(dag.difficulty));
                self.hashrate = Some(estimated_hashrate(dag.difficulty));
                self.hard_fork = HardForkEstimate::compute(self.hard_fork_target, dag.virtual_daa_score, now);

                if prev.map(|p| p.block_count) != Some(dag.block_count) {
                    changed.push(StatField::BlockCount);
                }
                if prev.map(|p| p.header_count) != Some(dag.header_count) {
                    changed.push(StatField::HeaderCount);
                }
                if prev_hashrate != self.hashrate {
                    changed.push(StatField::Hashrate);
                }
                if self.hard_fork.active {
                    if prev.map(|p| p.virtual_daa_score) != Some(dag.virtual_daa_score) {
                        changed.push(StatField::VirtualDaaScore);
                    }
                    if prev_eta != self.hard_fork.eta_utc {
                        changed.push(StatField::HardForkEta);
                    }
                }
            }
            StatsUpdate::Mempool(size) => self.mempool_size = Some(size),
            StatsUpdate::ServerVersion(version) => self.server_version = version,
            StatsUpdate::CycleFinished { failed } => {
                self.is_loading = false;
                self.fetch_error = failed;
            }
        }
        changed
    }
}
