mod app;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::{App, MenuItem};
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crate::state::refresher::PeriodicRefresher;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::error;
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal();

    tui_logger::init_logger(log::LevelFilter::Error)?;
    tui_logger::set_default_level(log::LevelFilter::Error);

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    let app = Arc::new(Mutex::new(App::new(ui_event_tx.clone())));

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let (api_url, session, qa_mode) = {
        let guard = app.lock().await;
        (
            guard.settings.api_url.clone(),
            guard.settings.session(),
            guard.settings.qa_mode,
        )
    };
    let network_worker =
        NetworkWorker::new(api_url, session, qa_mode, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Periodic board refresh thread (every 60s)
    let periodic_updater = PeriodicRefresher::new(ui_event_tx.clone());
    let periodic_task = tokio::spawn(periodic_updater.run());

    // Trigger the current-week load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, network_req_tx, network_resp_rx).await;

    input_handler.abort();
    network_task.abort();
    periodic_task.abort();

    Ok(())
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("frenzytui {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "frenzytui - NFL Frenzy weekly pick'em terminal UI

Usage:
  frenzytui
  frenzytui --help
  frenzytui --version

Environment:
  FRENZY_API_URL   Backend base URL (default http://127.0.0.1:8000/api)
  FRENZY_TOKEN     Bearer token for private endpoints and submissions
  FRENZY_USER_ID   Numeric user id matching the token
  FRENZY_QA        Set to 1 to bypass reveal locks (QA preview)
  FRENZY_LOG       Log level for the in-app log pane (error..trace, off)"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &network_requests).await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw =
                    handle_network_response(response, &app, &network_requests, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let _ = network_requests.send(NetworkRequest::LoadCurrentWeek).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
        UiEvent::CountdownTick => {
            let mut guard = app.lock().await;
            if guard.state.active_tab != MenuItem::Picks {
                return false;
            }
            guard.tick_countdown();
            true
        }
        UiEvent::RefreshTick => {
            // Only the weekly board auto-refreshes, and only while visible.
            let guard = app.lock().await;
            if guard.state.active_tab != MenuItem::Weekly {
                return false;
            }
            let week = guard.state.board.week;
            drop(guard);
            let _ = network_requests
                .send(NetworkRequest::LoadWeeklyBoard { week })
                .await;
            false
        }
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        NetworkResponse::CurrentWeekLoaded { week } => {
            let mut guard = app.lock().await;
            guard.on_current_week(week);
            let current = guard.state.current_week;
            drop(guard);
            // season history for the dashboard markers, plus real schedules
            // to refine the current and previous week's provisional locks
            let _ = network_requests.send(NetworkRequest::LoadSeasonPicks).await;
            let _ = network_requests
                .send(NetworkRequest::LoadWeekGames { week: current })
                .await;
            if current > 1 {
                let _ = network_requests
                    .send(NetworkRequest::LoadWeekGames { week: current - 1 })
                    .await;
            }
        }
        NetworkResponse::WeekGamesLoaded { week, games } => {
            let mut guard = app.lock().await;
            guard.on_week_games(week, games);
        }
        NetworkResponse::SeasonPicksLoaded { picks } => {
            let mut guard = app.lock().await;
            guard.on_season_picks(picks);
        }
        NetworkResponse::WeekPickLoaded { week, pick } => {
            let mut guard = app.lock().await;
            guard.on_week_pick(week, pick);
        }
        NetworkResponse::WeeklyBoardLoaded { week, board, reveal } => {
            let mut guard = app.lock().await;
            guard.on_weekly_board(week, *board, reveal);
        }
        NetworkResponse::OverallLoaded { standings } => {
            let mut guard = app.lock().await;
            guard.on_overall(standings);
        }
        NetworkResponse::PickSubmitted { week } => {
            let mut guard = app.lock().await;
            guard.on_pick_submitted(week);
            drop(guard);
            // the accepted pick changes history and the week's stored pick
            let _ = network_requests.send(NetworkRequest::LoadSeasonPicks).await;
            let _ = network_requests
                .send(NetworkRequest::LoadWeekPick { week })
                .await;
        }
        NetworkResponse::PickRejected { week, message } => {
            let mut guard = app.lock().await;
            guard.on_pick_rejected(week, message);
        }
        NetworkResponse::Error { message } => {
            error!("Network error: {message}");
            let mut guard = app.lock().await;
            guard.on_error(message);
        }
    }
    !loading.is_loading
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::Hide);
    let _ = execute!(stdout, terminal::EnterAlternateScreen);
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = terminal::enable_raw_mode();
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
