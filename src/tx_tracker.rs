//! Transaction lookup state machine.
//!
//! A freshly broadcast transaction is often not indexed yet, and an indexed one
//! may still be waiting for acceptance. The tracker re-fetches on a fixed
//! cadence in both cases, each with its own bounded budget:
//!
//! - not found: up to [`MAX_NOT_FOUND`] lookups, one per second, then give up
//! - found but unaccepted and younger than a minute: up to [`MAX_NOT_ACCEPTED`]
//!   re-fetches, one every two seconds, then show it as-is
//!
//! [`step`] is the pure transition function; [`run_tx_view`] drives it against
//! an [`ExplorerApi`] and reports progress as [`AppEvent`]s.

use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{sleep_until, Duration, Instant};

use crate::api::ExplorerApi;
use crate::constants::retry::{
    MAX_NOT_ACCEPTED, MAX_NOT_FOUND, NOT_ACCEPTED_DELAY_MS, NOT_ACCEPTED_WINDOW_MS,
    NOT_FOUND_DELAY_MS,
};
use crate::fee::previous_tx_ids;
use crate::types::{AppEvent, Transaction, TxLookup, TxUpdate};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TxPhase {
    /// First lookup in flight
    Fetching,
    /// Last lookup came back empty, another one is scheduled
    NotFound,
    /// Found but not accepted yet, another lookup is scheduled
    Pending,
    /// Found; no further lookups
    Settled,
    /// Not found after exhausting the retry budget
    GaveUp,
    /// Transport or decoding failure
    Failed,
}

impl TxPhase {
    /// Whether the tracker will issue no further lookups
    pub fn is_terminal(self) -> bool {
        matches!(self, TxPhase::Settled | TxPhase::GaveUp | TxPhase::Failed)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RetryState {
    /// Lookups so far that answered "not found"
    pub not_found_retries: u32,
    /// Re-fetches left while the transaction is unaccepted
    pub not_accepted_left: u32,
}

impl Default for RetryState {
    fn default() -> Self {
        Self {
            not_found_retries: 0,
            not_accepted_left: MAX_NOT_ACCEPTED,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TrackerState {
    pub phase: TxPhase,
    pub retries: RetryState,
}

impl Default for TrackerState {
    fn default() -> Self {
        Self {
            phase: TxPhase::Fetching,
            retries: RetryState::default(),
        }
    }
}

/// Outcome of one lookup, as seen by the state machine
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    Found { is_accepted: bool, block_time_ms: u64 },
    NotFound,
    Failed,
}

impl Lookup {
    pub fn of(tx: &Transaction) -> Self {
        Lookup::Found {
            is_accepted: tx.is_accepted,
            block_time_ms: tx.block_time,
        }
    }
}

/// What the driver should do after a transition
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Next {
    pub retry_in: Option<Duration>,
}

/// Pure transition: apply one lookup outcome at wall-clock time `now_ms`.
pub fn step(state: TrackerState, lookup: Lookup, now_ms: i64) -> (TrackerState, Next) {
    let mut retries = state.retries;
    match lookup {
        Lookup::NotFound => {
            retries.not_found_retries = retries.not_found_retries.saturating_add(1);
            if retries.not_found_retries < MAX_NOT_FOUND {
                (
                    TrackerState { phase: TxPhase::NotFound, retries },
                    Next { retry_in: Some(Duration::from_millis(NOT_FOUND_DELAY_MS)) },
                )
            } else {
                (TrackerState { phase: TxPhase::GaveUp, retries }, Next { retry_in: None })
            }
        }
        Lookup::Found { is_accepted, block_time_ms } => {
            // A missing block time counts as "just now"
            let age_ms = if block_time_ms == 0 {
                0
            } else {
                now_ms.saturating_sub(block_time_ms as i64)
            };
            if !is_accepted && age_ms < NOT_ACCEPTED_WINDOW_MS && retries.not_accepted_left > 0 {
                retries.not_accepted_left -= 1;
                (
                    TrackerState { phase: TxPhase::Pending, retries },
                    Next { retry_in: Some(Duration::from_millis(NOT_ACCEPTED_DELAY_MS)) },
                )
            } else {
                (TrackerState { phase: TxPhase::Settled, retries }, Next { retry_in: None })
            }
        }
        Lookup::Failed => (TrackerState { phase: TxPhase::Failed, retries }, Next { retry_in: None }),
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Drive the lookup loop for one transaction id until it reaches a terminal
/// phase. Meant to be spawned on a [`crate::scheduler::Scheduler`]; aborting
/// the task cancels any pending delay.
pub async fn run_tx_view(
    api: Arc<dyn ExplorerApi>,
    id: String,
    generation: u64,
    events: UnboundedSender<AppEvent>,
) {
    let emit = |update: TxUpdate| events.send(AppEvent::Tx { generation, update }).is_ok();
    let mut state = TrackerState::default();

    log::info!("[tx] tracking {id}");
    emit(TxUpdate::Status {
        phase: state.phase,
        not_found_retries: 0,
    });

    loop {
        let started = Instant::now();
        let (lookup, found) = match api.transaction(&id).await {
            Ok(TxLookup::Found(tx)) => (Lookup::of(&tx), Some(tx)),
            Ok(TxLookup::NotFound) => (Lookup::NotFound, None),
            Err(e) => {
                log::warn!("[tx] lookup {id} failed: {e:#}");
                (Lookup::Failed, None)
            }
        };

        let (next_state, next) = step(state, lookup, now_ms());
        state = next_state;

        if !emit(TxUpdate::Status {
            phase: state.phase,
            not_found_retries: state.retries.not_found_retries,
        }) {
            break;
        }

        if let Some(tx) = found {
            let prev_ids = previous_tx_ids(&tx);
            if !emit(TxUpdate::Loaded(tx)) {
                break;
            }
            if !prev_ids.is_empty() {
                resolve_previous(api.as_ref(), &prev_ids, &emit).await;
            }
        }

        match next.retry_in {
            Some(delay) => {
                log::debug!("[tx] {id} {:?}, retrying in {}ms", state.phase, delay.as_millis());
                sleep_until(started + delay).await;
            }
            None => break,
        }
    }

    log::info!("[tx] {id} done: {:?}", state.phase);
    emit(TxUpdate::Finished);
}

/// Batch-fetch the transactions referenced by the inputs. A failed or partial
/// batch only suppresses the fee display.
async fn resolve_previous(
    api: &dyn ExplorerApi,
    ids: &[String],
    emit: &impl Fn(TxUpdate) -> bool,
) {
    match api.transactions(ids).await {
        Ok(txs) => {
            let complete = txs.len() == ids.len();
            if !complete {
                log::info!("[tx] resolved {}/{} previous transactions", txs.len(), ids.len());
            }
            emit(TxUpdate::Previous { txs, complete });
        }
        Err(e) => {
            log::warn!("[tx] previous transaction lookup failed: {e:#}");
        }
    }
}
