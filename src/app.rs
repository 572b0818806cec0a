use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::confirm::{classify, Confirmation};
use crate::constants::app::{HIGHLIGHT_MS, RENDER_FPS, TOAST_DURATION_SECS};
use crate::fee::{fee_sompi, index_by_id};
use crate::router::Route;
use crate::stats::{NetworkStats, StatField};
use crate::theme::{ColorScheme, Theme};
use crate::tx_tracker::TxPhase;
use crate::types::{AppEvent, Transaction, TxUpdate};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing a transaction id or link to open
    Goto,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TxTab {
    Outputs,
    Inputs,
}

/// Everything the transaction page shows for one id
#[derive(Clone, Debug)]
pub struct TxView {
    pub id: String,
    pub phase: TxPhase,
    pub not_found_retries: u32,
    pub tx: Option<Transaction>,
    pub previous: HashMap<String, Transaction>,
    /// Every referenced previous transaction came back
    pub show_fee: bool,
    /// The driver has stopped
    pub finished: bool,
}

impl TxView {
    pub fn new(id: String) -> Self {
        Self {
            id,
            phase: TxPhase::Fetching,
            not_found_retries: 0,
            tx: None,
            previous: HashMap::new(),
            show_fee: false,
            finished: false,
        }
    }

    /// Fee in sompi, only when it can be shown
    pub fn fee_sompi(&self) -> Option<i128> {
        let tx = self.tx.as_ref()?;
        if !self.show_fee {
            return None;
        }
        Some(fee_sompi(tx, &self.previous))
    }

    pub fn confirmation(&self, blue_score: u64) -> Option<Confirmation> {
        let tx = self.tx.as_ref()?;
        Some(classify(tx.is_accepted, blue_score, tx.accepting_block_blue_score))
    }

    fn apply(&mut self, update: TxUpdate) {
        match update {
            TxUpdate::Status { phase, not_found_retries } => {
                self.phase = phase;
                self.not_found_retries = not_found_retries;
            }
            TxUpdate::Loaded(tx) => self.tx = Some(*tx),
            TxUpdate::Previous { txs, complete } => {
                self.previous = index_by_id(txs);
                self.show_fee = complete;
            }
            TxUpdate::Finished => self.finished = true,
        }
    }
}

pub struct App {
    quit: bool,
    route: Route,
    pending_route: Option<Route>,
    /// Generation of the live view; events from older ones are dropped
    generation: u64,

    stats: NetworkStats,
    tx_view: Option<TxView>,
    blue_score: u64,

    tab: TxTab,
    show_additional: bool,
    scroll: u16,

    input_mode: InputMode,
    goto_query: String,

    highlights: HashMap<StatField, Instant>,
    toast_message: Option<(String, Instant)>,

    theme: Theme,
    fps: u32,
}

impl App {
    pub fn new(theme: Theme, hard_fork_target: u64) -> Self {
        Self {
            quit: false,
            route: Route::Dashboard,
            pending_route: None,
            generation: 0,
            stats: NetworkStats::new(hard_fork_target),
            tx_view: None,
            blue_score: 0,
            tab: TxTab::Outputs,
            show_additional: false,
            scroll: 0,
            input_mode: InputMode::Normal,
            goto_query: String::new(),
            highlights: HashMap::new(),
            toast_message: None,
            theme,
            fps: RENDER_FPS,
        }
    }

    // ----- getters -----
    pub fn fps(&self) -> u32 { self.fps }
    pub fn quit_flag(&self) -> bool { self.quit }
    pub fn route(&self) -> &Route { &self.route }
    pub fn generation(&self) -> u64 { self.generation }
    pub fn stats(&self) -> &NetworkStats { &self.stats }
    pub fn tx_view(&self) -> Option<&TxView> { self.tx_view.as_ref() }
    pub fn blue_score(&self) -> u64 { self.blue_score }
    pub fn tab(&self) -> TxTab { self.tab }
    pub fn show_additional(&self) -> bool { self.show_additional }
    pub fn scroll(&self) -> u16 { self.scroll }
    pub fn input_mode(&self) -> InputMode { self.input_mode }
    pub fn goto_query(&self) -> &str { &self.goto_query }
    pub fn theme(&self) -> ColorScheme { self.theme.colors() }

    // ----- navigation -----

    /// Request a view change; the event loop opens it via [`crate::views::ViewController`]
    pub fn navigate(&mut self, route: Route) {
        self.pending_route = Some(route);
    }

    pub fn take_navigation(&mut self) -> Option<Route> {
        self.pending_route.take()
    }

    /// Switch to `route` whose background work was started under `generation`.
    /// View state from the previous route is discarded.
    pub fn enter(&mut self, route: Route, generation: u64) {
        self.generation = generation;
        self.tab = TxTab::Outputs;
        self.show_additional = false;
        self.scroll = 0;
        self.highlights.clear();
        match &route {
            Route::Dashboard => {
                self.stats = NetworkStats::new(self.stats.hard_fork_target());
                self.tx_view = None;
            }
            Route::Tx { id } => {
                self.tx_view = Some(TxView::new(id.clone()));
                self.blue_score = 0;
            }
        }
        self.route = route;
    }

    pub fn on_event(&mut self, ev: AppEvent) {
        match ev {
            AppEvent::Quit => self.quit = true,
            AppEvent::Stats { generation, update } => {
                if generation != self.generation {
                    log::debug!("[app] dropped stale stats event (gen {generation})");
                    return;
                }
                let now = Instant::now();
                for field in self.stats.apply(update, chrono::Utc::now()) {
                    self.highlights.insert(field, now);
                }
            }
            AppEvent::Tx { generation, update } => {
                if generation != self.generation {
                    log::debug!("[app] dropped stale tx event (gen {generation})");
                    return;
                }
                if let Some(view) = self.tx_view.as_mut() {
                    view.apply(update);
                }
            }
            AppEvent::BlueScore { generation, score } => {
                if generation == self.generation {
                    self.blue_score = score;
                }
            }
        }
    }

    /// Whether `field` changed within the last highlight window
    pub fn is_highlighted(&self, field: StatField) -> bool {
        self.highlights
            .get(&field)
            .is_some_and(|t| t.elapsed() < Duration::from_millis(HIGHLIGHT_MS))
    }

    // ----- tx page controls -----
    pub fn set_tab(&mut self, tab: TxTab) {
        if self.tab != tab {
            self.tab = tab;
            self.scroll = 0;
        }
    }

    pub fn toggle_tab(&mut self) {
        self.set_tab(match self.tab {
            TxTab::Outputs => TxTab::Inputs,
            TxTab::Inputs => TxTab::Outputs,
        });
    }

    pub fn toggle_additional(&mut self) {
        self.show_additional = !self.show_additional;
    }

    pub fn scroll_down(&mut self, n: u16) {
        self.scroll = self.scroll.saturating_add(n);
    }

    pub fn scroll_up(&mut self, n: u16) {
        self.scroll = self.scroll.saturating_sub(n);
    }

    // ----- goto prompt -----
    pub fn start_goto(&mut self) {
        self.input_mode = InputMode::Goto;
        self.goto_query.clear();
    }

    pub fn goto_add_char(&mut self, c: char) {
        self.goto_query.push(c);
    }

    pub fn goto_backspace(&mut self) {
        self.goto_query.pop();
    }

    pub fn cancel_goto(&mut self) {
        self.input_mode = InputMode::Normal;
        self.goto_query.clear();
    }

    /// Parse the typed text as a route and navigate to it
    pub fn submit_goto(&mut self) {
        let query = std::mem::take(&mut self.goto_query);
        self.input_mode = InputMode::Normal;
        match crate::router::parse(&query) {
            Some(route) => self.navigate(route),
            None => self.show_toast(format!("Not a transaction id or link: {query}")),
        }
    }

    // ----- toast -----
    pub fn show_toast(&mut self, msg: String) {
        self.toast_message = Some((msg, Instant::now()));
    }

    pub fn toast_message(&self) -> Option<&str> {
        self.toast_message
            .as_ref()
            .filter(|(_, at)| at.elapsed() < Duration::from_secs(TOAST_DURATION_SECS))
            .map(|(m, _)| m.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DagSnapshot, StatsUpdate, TxInput, TxOutput};

    fn dag() -> DagSnapshot {
        DagSnapshot {
            block_count: 1,
            header_count: 1,
            virtual_daa_score: 1,
            difficulty: 1.0,
        }
    }

    fn sample_tx() -> Transaction {
        Transaction {
            id: "t".into(),
            hash: "t".into(),
            subnetwork_id: String::new(),
            block_time: 0,
            mass: Some(2036),
            is_accepted: true,
            accepting_block_hash: Some("b".into()),
            accepting_block_blue_score: Some(50),
            block_hashes: vec!["b".into()],
            inputs: vec![TxInput {
                previous_outpoint_hash: "p".into(),
                previous_outpoint_index: 0,
                signature_script: None,
            }],
            outputs: vec![TxOutput {
                index: 0,
                amount: 90,
                script_public_key_address: None,
                script_public_key_type: None,
            }],
        }
    }

    fn prev_tx() -> Transaction {
        Transaction {
            id: "p".into(),
            inputs: vec![],
            outputs: vec![TxOutput {
                index: 0,
                amount: 100,
                script_public_key_address: Some("hoosat:qq".into()),
                script_public_key_type: None,
            }],
            ..sample_tx()
        }
    }

    #[test]
    fn stale_generation_events_are_ignored() {
        let mut app = App::new(Theme::default(), 0);
        app.enter(Route::Dashboard, 3);
        app.on_event(AppEvent::Stats { generation: 2, update: StatsUpdate::Mempool(9) });
        assert_eq!(app.stats().mempool_size, None);
        app.on_event(AppEvent::Stats { generation: 3, update: StatsUpdate::Mempool(9) });
        assert_eq!(app.stats().mempool_size, Some(9));
    }

    #[test]
    fn changing_transaction_resets_view_state() {
        let mut app = App::new(Theme::default(), 0);
        app.enter(Route::Tx { id: "a".into() }, 1);
        app.on_event(AppEvent::Tx {
            generation: 1,
            update: TxUpdate::Status { phase: TxPhase::NotFound, not_found_retries: 4 },
        });
        app.set_tab(TxTab::Inputs);
        app.on_event(AppEvent::BlueScore { generation: 1, score: 77 });

        app.enter(Route::Tx { id: "b".into() }, 2);
        let view = app.tx_view().unwrap();
        assert_eq!(view.id, "b");
        assert_eq!(view.not_found_retries, 0);
        assert_eq!(view.phase, TxPhase::Fetching);
        assert_eq!(app.tab(), TxTab::Outputs);
        assert_eq!(app.blue_score(), 0);

        // a late event from the first view must not leak into the second
        app.on_event(AppEvent::Tx {
            generation: 1,
            update: TxUpdate::Loaded(Box::new(sample_tx())),
        });
        assert!(app.tx_view().unwrap().tx.is_none());
    }

    #[test]
    fn fee_only_shown_with_complete_inputs() {
        let mut app = App::new(Theme::default(), 0);
        app.enter(Route::Tx { id: "t".into() }, 1);
        app.on_event(AppEvent::Tx { generation: 1, update: TxUpdate::Loaded(Box::new(sample_tx())) });
        assert_eq!(app.tx_view().unwrap().fee_sompi(), None);

        app.on_event(AppEvent::Tx {
            generation: 1,
            update: TxUpdate::Previous { txs: vec![prev_tx()], complete: true },
        });
        assert_eq!(app.tx_view().unwrap().fee_sompi(), Some(10));

        app.on_event(AppEvent::Tx {
            generation: 1,
            update: TxUpdate::Previous { txs: vec![], complete: false },
        });
        assert_eq!(app.tx_view().unwrap().fee_sompi(), None);
    }

    #[test]
    fn confirmation_follows_blue_score() {
        let mut app = App::new(Theme::default(), 0);
        app.enter(Route::Tx { id: "t".into() }, 1);
        app.on_event(AppEvent::Tx { generation: 1, update: TxUpdate::Loaded(Box::new(sample_tx())) });
        let view = app.tx_view().unwrap();
        assert_eq!(view.confirmation(app.blue_score()), Some(Confirmation::Unknown));
        app.on_event(AppEvent::BlueScore { generation: 1, score: 100 });
        let view = app.tx_view().unwrap();
        assert_eq!(view.confirmation(app.blue_score()), Some(Confirmation::Count(50)));
    }

    #[test]
    fn dag_update_flashes_changed_fields() {
        let mut app = App::new(Theme::default(), 0);
        app.enter(Route::Dashboard, 1);
        app.on_event(AppEvent::Stats { generation: 1, update: StatsUpdate::Dag(dag()) });
        assert!(app.is_highlighted(StatField::BlockCount));
        assert!(!app.is_highlighted(StatField::HardForkEta));
    }

    #[test]
    fn goto_prompt_navigates() {
        let mut app = App::new(Theme::default(), 0);
        app.start_goto();
        for c in "htnx://txs/abc".chars() {
            app.goto_add_char(c);
        }
        app.submit_goto();
        assert_eq!(app.input_mode(), InputMode::Normal);
        assert_eq!(app.take_navigation(), Some(Route::Tx { id: "abc".into() }));
        assert_eq!(app.take_navigation(), None);

        app.start_goto();
        app.goto_add_char('?');
        app.submit_goto();
        assert!(app.take_navigation().is_none());
        assert!(app.toast_message().is_some());
    }
}
