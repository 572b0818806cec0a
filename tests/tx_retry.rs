//! Transaction driver against a fake backend, on a paused clock

mod common;

use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::time::{sleep, Duration, Instant};

use common::{input, output, tx, FakeApi, TxAnswer};
use htnx::{
    app::App,
    config::Config,
    confirm::Confirmation,
    router::Route,
    theme::Theme,
    tx_tracker::{run_tx_view, TxPhase},
    types::{AppEvent, TxUpdate},
    views::ViewController,
};

const ID: &str = "ab4f2c1d9e8f7a6b5c4d3e2f1a0b9c8d7e6f5a4b3c2d1e0f9a8b7c6d5e4f3a2b";

fn drain(rx: &mut UnboundedReceiver<AppEvent>) -> Vec<TxUpdate> {
    let mut out = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        if let AppEvent::Tx { update, .. } = ev {
            out.push(update);
        }
    }
    out
}

fn last_status(updates: &[TxUpdate]) -> Option<(TxPhase, u32)> {
    updates.iter().rev().find_map(|u| match u {
        TxUpdate::Status { phase, not_found_retries } => Some((*phase, *not_found_retries)),
        _ => None,
    })
}

fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}

#[tokio::test(start_paused = true)]
async fn unknown_transaction_gives_up_after_one_hundred_lookups() {
    let api = Arc::new(FakeApi::new());
    let (events, mut rx) = unbounded_channel();

    let start = Instant::now();
    run_tx_view(api.clone(), ID.to_string(), 1, events).await;

    assert_eq!(FakeApi::count(&api.tx_calls), 100);
    assert!(start.elapsed() >= Duration::from_secs(99));
    assert!(start.elapsed() < Duration::from_secs(100));

    let updates = drain(&mut rx);
    assert_eq!(last_status(&updates), Some((TxPhase::GaveUp, 100)));
    assert_eq!(updates.last(), Some(&TxUpdate::Finished));
    assert!(!updates.iter().any(|u| matches!(u, TxUpdate::Loaded(_))));
}

#[tokio::test(start_paused = true)]
async fn retries_count_up_while_waiting_for_indexing() {
    let api = Arc::new(FakeApi::new());
    let (events, mut rx) = unbounded_channel();
    let handle = tokio::spawn(run_tx_view(api.clone(), ID.to_string(), 1, events));

    sleep(Duration::from_millis(2500)).await;
    assert_eq!(FakeApi::count(&api.tx_calls), 3);
    assert_eq!(last_status(&drain(&mut rx)), Some((TxPhase::NotFound, 3)));

    // Indexed on the next attempt
    api.answer_tx(TxAnswer::Found(tx(ID)));
    handle.await.unwrap();

    assert_eq!(FakeApi::count(&api.tx_calls), 4);
    let updates = drain(&mut rx);
    assert_eq!(last_status(&updates), Some((TxPhase::Settled, 3)));
    assert!(updates.iter().any(|u| matches!(u, TxUpdate::Loaded(t) if t.id == ID)));
}

#[tokio::test(start_paused = true)]
async fn leaving_the_view_cancels_the_pending_retry() {
    let api = Arc::new(FakeApi::new());
    let (events, _rx) = unbounded_channel();
    let mut views = ViewController::new(api.clone(), Config::default(), events);

    views.open(&Route::Tx { id: ID.to_string() });
    sleep(Duration::from_millis(2500)).await;
    assert_eq!(FakeApi::count(&api.tx_calls), 3);

    views.open(&Route::Dashboard);
    sleep(Duration::from_secs(10)).await;
    assert_eq!(FakeApi::count(&api.tx_calls), 3);

    views.close();
    assert_eq!(views.active_tasks(), 0);
}

#[tokio::test(start_paused = true)]
async fn recent_unaccepted_transaction_is_refetched_six_times() {
    let api = Arc::new(FakeApi::new());
    let mut pending = tx(ID);
    pending.is_accepted = false;
    pending.block_time = now_ms();
    api.answer_tx(TxAnswer::Found(pending));

    let (events, mut rx) = unbounded_channel();
    let start = Instant::now();
    run_tx_view(api.clone(), ID.to_string(), 1, events).await;

    assert_eq!(FakeApi::count(&api.tx_calls), 7);
    assert!(start.elapsed() >= Duration::from_secs(12));
    assert_eq!(last_status(&drain(&mut rx)), Some((TxPhase::Settled, 0)));
}

#[tokio::test(start_paused = true)]
async fn old_unaccepted_transaction_is_shown_as_is() {
    let api = Arc::new(FakeApi::new());
    let mut stale = tx(ID);
    stale.is_accepted = false;
    stale.block_time = now_ms() - 5 * 60 * 1000;
    api.answer_tx(TxAnswer::Found(stale));

    let (events, mut rx) = unbounded_channel();
    run_tx_view(api.clone(), ID.to_string(), 1, events).await;

    assert_eq!(FakeApi::count(&api.tx_calls), 1);
    assert_eq!(last_status(&drain(&mut rx)), Some((TxPhase::Settled, 0)));
}

#[tokio::test(start_paused = true)]
async fn transport_failure_stops_the_driver() {
    let api = Arc::new(FakeApi::new());
    api.answer_tx(TxAnswer::Fail);

    let (events, mut rx) = unbounded_channel();
    run_tx_view(api.clone(), ID.to_string(), 1, events).await;

    assert_eq!(FakeApi::count(&api.tx_calls), 1);
    let updates = drain(&mut rx);
    assert_eq!(last_status(&updates), Some((TxPhase::Failed, 0)));
    assert_eq!(updates.last(), Some(&TxUpdate::Finished));
}

fn spending_tx() -> htnx::types::Transaction {
    let mut t = tx(ID);
    t.inputs = vec![input("p1", 0), input("p2", 1), input("p1", 1)];
    t.outputs = vec![output(0, 150_000_000)];
    t
}

fn previous() -> Vec<htnx::types::Transaction> {
    let mut p1 = tx("p1");
    p1.outputs = vec![output(0, 100_000_000), output(1, 50_000_000)];
    let mut p2 = tx("p2");
    p2.outputs = vec![output(0, 1), output(1, 10_000_000)];
    vec![p1, p2]
}

async fn load_into_app(api: Arc<FakeApi>) -> App {
    let mut app = App::new(Theme::default(), 0);
    app.enter(Route::Tx { id: ID.to_string() }, 1);

    let (events, mut rx) = unbounded_channel();
    run_tx_view(api, ID.to_string(), 1, events).await;
    while let Ok(ev) = rx.try_recv() {
        app.on_event(ev);
    }
    app
}

#[tokio::test(start_paused = true)]
async fn fee_is_shown_when_every_previous_transaction_resolves() {
    let api = Arc::new(FakeApi::new());
    api.answer_tx(TxAnswer::Found(spending_tx()));
    api.answer_batch(previous());

    let app = load_into_app(api.clone()).await;
    assert_eq!(FakeApi::count(&api.batch_calls), 1);

    let view = app.tx_view().unwrap();
    assert!(view.finished);
    assert!(view.show_fee);
    assert_eq!(view.previous.len(), 2);
    assert_eq!(view.fee_sompi(), Some(10_000_000));
}

#[tokio::test(start_paused = true)]
async fn partial_batch_hides_the_fee() {
    let api = Arc::new(FakeApi::new());
    api.answer_tx(TxAnswer::Found(spending_tx()));
    api.answer_batch(previous().into_iter().filter(|t| t.id == "p1").collect());

    let app = load_into_app(api).await;
    let view = app.tx_view().unwrap();
    assert!(!view.show_fee);
    assert_eq!(view.fee_sompi(), None);
    assert!(view.tx.is_some());
}

#[tokio::test(start_paused = true)]
async fn tx_view_tracks_the_virtual_blue_score() {
    let api = Arc::new(FakeApi::new());
    api.answer_tx(TxAnswer::Found(tx(ID)));
    let (events, mut rx) = unbounded_channel();
    let mut views = ViewController::new(api.clone(), Config::default(), events);

    let mut app = App::new(Theme::default(), 0);
    let route = Route::Tx { id: ID.to_string() };
    let generation = views.open(&route);
    app.enter(route, generation);

    sleep(Duration::from_millis(10)).await;
    while let Ok(ev) = rx.try_recv() {
        app.on_event(ev);
    }

    assert_eq!(app.blue_score(), 9_000);
    let view = app.tx_view().unwrap();
    assert_eq!(view.confirmation(app.blue_score()), Some(Confirmation::Count(10)));
}
