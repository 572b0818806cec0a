use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{interval, interval_at, Duration, Instant, MissedTickBehavior};

use crate::{
    api::ExplorerApi,
    types::{AppEvent, StatsUpdate},
};

/// Run one full refresh: DAG info and node info concurrently, then the
/// best-effort server version. Each successful piece is reported on its own;
/// failures leave the previous values in place.
pub async fn refresh_stats(
    api: &dyn ExplorerApi,
    generation: u64,
    tx: &UnboundedSender<AppEvent>,
) -> bool {
    let send = |update: StatsUpdate| tx.send(AppEvent::Stats { generation, update }).is_ok();
    if !send(StatsUpdate::CycleStarted) {
        return false;
    }

    let (dag, info) = futures::future::join(api.blockdag_info(), api.node_info()).await;
    let mut failed = false;

    match dag {
        Ok(dag) => {
            log::debug!(
                "[stats] blockdag: blocks={} daa={}",
                dag.block_count,
                dag.virtual_daa_score
            );
            send(StatsUpdate::Dag(dag));
        }
        Err(e) => {
            log::warn!("[stats] blockdag info failed: {e:#}");
            failed = true;
        }
    }
    match info {
        Ok(info) => {
            send(StatsUpdate::Mempool(info.mempool_size));
        }
        Err(e) => {
            log::warn!("[stats] node info failed: {e:#}");
            failed = true;
        }
    }

    match api.server_version().await {
        Ok(version) => {
            send(StatsUpdate::ServerVersion(version));
        }
        Err(e) => log::debug!("[stats] server version unavailable: {e:#}"),
    }

    send(StatsUpdate::CycleFinished { failed })
}

/// Full refresh immediately, then every `period_ms`. Cycles never overlap: a
/// slow cycle delays the next tick rather than stacking requests.
pub async fn run_stats_poller(
    api: Arc<dyn ExplorerApi>,
    period_ms: u64,
    generation: u64,
    tx: UnboundedSender<AppEvent>,
) {
    log::info!("[stats] full refresh every {period_ms}ms");
    let mut ticker = interval(Duration::from_millis(period_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        if !refresh_stats(api.as_ref(), generation, &tx).await {
            break;
        }
    }
}

/// Mempool-only refresh every `period_ms`, starting one period after activation
pub async fn run_mempool_poller(
    api: Arc<dyn ExplorerApi>,
    period_ms: u64,
    generation: u64,
    tx: UnboundedSender<AppEvent>,
) {
    let period = Duration::from_millis(period_ms);
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        match api.node_info().await {
            Ok(info) => {
                let update = StatsUpdate::Mempool(info.mempool_size);
                if tx.send(AppEvent::Stats { generation, update }).is_err() {
                    break;
                }
            }
            Err(e) => log::debug!("[stats] mempool refresh failed: {e:#}"),
        }
    }
}

/// Virtual chain blue score, immediately and then every `period_ms`
pub async fn run_blue_score_poller(
    api: Arc<dyn ExplorerApi>,
    period_ms: u64,
    generation: u64,
    tx: UnboundedSender<AppEvent>,
) {
    let mut ticker = interval(Duration::from_millis(period_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        match api.virtual_blue_score().await {
            Ok(score) => {
                if tx.send(AppEvent::BlueScore { generation, score }).is_err() {
                    break;
                }
            }
            Err(e) => log::debug!("[stats] blue score refresh failed: {e:#}"),
        }
    }
}
