// Native binary for htnx - Terminal UI mode

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io::{self, Write},
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use htnx::{
    api::{ExplorerApi, HttpApi},
    app::{App, InputMode, TxTab},
    config::{load, Config},
    router::{self, Route},
    types::{AppEvent, StatsUpdate, TxUpdate},
    ui,
    views::ViewController,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();

    let cfg = load().context("Failed to load configuration")?;
    init_logging(&cfg)?;
    cfg.log_summary();

    let initial = match cfg.route.as_deref() {
        Some(raw) => router::parse(raw)
            .with_context(|| format!("Not a transaction id or link: {raw}"))?,
        None => Route::Dashboard,
    };
    log::info!("htnx starting against {} (route {initial:?})", cfg.api_url);

    let api: Arc<dyn ExplorerApi> = Arc::new(HttpApi::new(&cfg.api_url, cfg.http_timeout_ms));
    let (tx, rx) = unbounded_channel::<AppEvent>();
    let mut controller = ViewController::new(api, cfg.clone(), tx);
    let mut app = App::new(cfg.theme, cfg.hard_fork_daa_score);
    app.navigate(initial);

    if cfg.print {
        return print_report(&mut app, &mut controller, rx).await;
    }

    // terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_loop(&mut app, &mut controller, &mut terminal, rx).await;

    // cleanup
    controller.close();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

/// The TUI owns stderr, so logs go to `--log-file` or nowhere; `--print` logs to stderr.
fn init_logging(cfg: &Config) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(path) = &cfg.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    } else if !cfg.print {
        return Ok(());
    }
    builder.init();
    Ok(())
}

fn open_pending(app: &mut App, controller: &mut ViewController) {
    if let Some(route) = app.take_navigation() {
        let generation = controller.open(&route);
        app.enter(route, generation);
    }
}

async fn run_loop(
    app: &mut App,
    controller: &mut ViewController,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut rx: UnboundedReceiver<AppEvent>,
) -> Result<()> {
    let mut last_frame = Instant::now();

    loop {
        open_pending(app, controller);

        // frame budget (coalesced renders)
        let frame_ms = 1000u32.saturating_div(app.fps()) as u64;
        let budget = Duration::from_millis(frame_ms.max(1));
        let wait = budget.saturating_sub(last_frame.elapsed());

        if event::poll(wait)? {
            if let Event::Key(k) = event::read()? {
                if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                    handle_key(app, k);
                }
            }
        }
        while let Ok(ev) = rx.try_recv() {
            app.on_event(ev);
        }

        if last_frame.elapsed() >= budget {
            terminal.draw(|f| ui::draw(f, app))?;
            last_frame = Instant::now();
        }
        if app.quit_flag() {
            break;
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, k: KeyEvent) {
    if app.input_mode() == InputMode::Goto {
        match k.code {
            KeyCode::Enter => app.submit_goto(),
            KeyCode::Esc => app.cancel_goto(),
            KeyCode::Backspace => app.goto_backspace(),
            KeyCode::Char(c) if !k.modifiers.contains(KeyModifiers::CONTROL) => {
                app.goto_add_char(c)
            }
            _ => {}
        }
        return;
    }

    match (k.code, k.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.on_event(AppEvent::Quit);
        }
        (KeyCode::Char('g'), _) | (KeyCode::Char('/'), _) => app.start_goto(),
        (KeyCode::Char('h'), _) | (KeyCode::Esc, _) => {
            if *app.route() != Route::Dashboard {
                app.navigate(Route::Dashboard);
            }
        }
        (KeyCode::Char('r'), _) => {
            let current = app.route().clone();
            app.navigate(current);
            app.show_toast("Reloading".to_string());
        }

        // tx page
        (KeyCode::Tab, _) | (KeyCode::BackTab, _) => app.toggle_tab(),
        (KeyCode::Char('o'), _) => app.set_tab(TxTab::Outputs),
        (KeyCode::Char('i'), _) => app.set_tab(TxTab::Inputs),
        (KeyCode::Char('d'), _) => app.toggle_additional(),
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.scroll_down(1),
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.scroll_up(1),
        (KeyCode::PageDown, _) => app.scroll_down(10),
        (KeyCode::PageUp, _) => app.scroll_up(10),
        (KeyCode::Home, _) => app.scroll_up(u16::MAX),
        _ => {}
    }
}

/// Run the initial route until its first result is in, then print it as text.
async fn print_report(
    app: &mut App,
    controller: &mut ViewController,
    mut rx: UnboundedReceiver<AppEvent>,
) -> Result<()> {
    open_pending(app, controller);

    while let Some(ev) = rx.recv().await {
        let done = matches!(
            (app.route(), &ev),
            (Route::Dashboard, AppEvent::Stats { update: StatsUpdate::CycleFinished { .. }, .. })
                | (Route::Tx { .. }, AppEvent::Tx { update: TxUpdate::Finished, .. })
        );
        app.on_event(ev);
        if done {
            break;
        }
    }
    // pick up a blue score that arrived alongside the last update
    while let Ok(ev) = rx.try_recv() {
        app.on_event(ev);
    }
    controller.close();

    let mut out = io::stdout().lock();
    match app.route() {
        Route::Dashboard => {
            if app.stats().fetch_error {
                writeln!(out, "error: could not reach the explorer API")?;
            }
            for row in ui::network_rows(app.stats()) {
                writeln!(out, "{:<20} {}", row.label, row.value)?;
            }
        }
        Route::Tx { .. } => {
            let Some(view) = app.tx_view() else {
                return Ok(());
            };
            if let Some((title, body)) = ui::tx_placeholder(view) {
                writeln!(out, "{title}\n{body}")?;
                return Ok(());
            }
            for row in ui::tx_rows(view, app.blue_score(), true) {
                writeln!(out, "{:<20} {}", row.label, row.value)?;
            }
            writeln!(out, "\nInputs")?;
            for line in ui::input_lines(view) {
                writeln!(out, "  {line}")?;
            }
            writeln!(out, "\nOutputs")?;
            for line in ui::output_lines(view) {
                writeln!(out, "  {line}")?;
            }
        }
    }
    Ok(())
}
