use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    api::ExplorerApi,
    config::Config,
    router::Route,
    scheduler::Scheduler,
    source_stats::{run_blue_score_poller, run_mempool_poller, run_stats_poller},
    tx_tracker::run_tx_view,
    types::AppEvent,
};

/// Starts and tears down the background work behind each view. Only one view is
/// live at a time; opening a route cancels everything the previous one started.
pub struct ViewController {
    api: Arc<dyn ExplorerApi>,
    cfg: Config,
    events: UnboundedSender<AppEvent>,
    scheduler: Scheduler,
}

impl ViewController {
    pub fn new(api: Arc<dyn ExplorerApi>, cfg: Config, events: UnboundedSender<AppEvent>) -> Self {
        Self {
            api,
            cfg,
            events,
            scheduler: Scheduler::new(),
        }
    }

    /// Open `route` and return the generation its events will carry
    pub fn open(&mut self, route: &Route) -> u64 {
        let generation = self.scheduler.reset();
        log::info!("[views] open {route:?} (generation {generation})");

        match route {
            Route::Dashboard => {
                self.scheduler.spawn(run_stats_poller(
                    self.api.clone(),
                    self.cfg.stats_interval_ms,
                    generation,
                    self.events.clone(),
                ));
                self.scheduler.spawn(run_mempool_poller(
                    self.api.clone(),
                    self.cfg.mempool_interval_ms,
                    generation,
                    self.events.clone(),
                ));
            }
            Route::Tx { id } => {
                self.scheduler.spawn(run_tx_view(
                    self.api.clone(),
                    id.clone(),
                    generation,
                    self.events.clone(),
                ));
                self.scheduler.spawn(run_blue_score_poller(
                    self.api.clone(),
                    self.cfg.blue_score_interval_ms,
                    generation,
                    self.events.clone(),
                ));
            }
        }
        generation
    }

    /// Stop everything without opening another view
    pub fn close(&mut self) {
        self.scheduler.reset();
    }

    pub fn active_tasks(&self) -> usize {
        self.scheduler.active()
    }
}
