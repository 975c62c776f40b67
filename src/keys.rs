use crate::app::{App, MenuItem};
use crate::state::app_state::PredictionField;
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    // While a prediction field is focused, keys go to it, not the bindings.
    if guard.state.active_tab == MenuItem::Picks && guard.state.picks.editing.is_some() {
        match key_event.code {
            Char(c) => guard.state.picks.push_input(c),
            KeyCode::Backspace => guard.state.picks.pop_input(),
            KeyCode::Enter | KeyCode::Esc => guard.state.picks.editing = None,
            _ => {}
        }
        return;
    }

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Dashboard),
        (_, Char('2'), _) => {
            if guard.state.picks.week == 0 {
                let current = guard.state.current_week;
                guard.set_picks_week(current);
            }
            let week = guard.state.picks.week;
            guard.update_tab(MenuItem::Picks);
            drop(guard);
            request_picks_form(network_requests, week).await;
            return;
        }
        (_, Char('3'), _) => {
            if guard.state.board.week == 0 {
                let current = guard.state.current_week;
                guard.set_board_week(current);
            }
            guard.update_tab(MenuItem::Weekly);
            let week = guard.state.board.week;
            drop(guard);
            let _ = network_requests
                .send(NetworkRequest::LoadWeeklyBoard { week })
                .await;
            return;
        }
        (_, Char('4'), _) => {
            guard.update_tab(MenuItem::Overall);
            drop(guard);
            let _ = network_requests.send(NetworkRequest::LoadOverall).await;
            return;
        }
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Dashboard: pick a week, jump to its form or board
        (MenuItem::Dashboard, Char('j') | KeyCode::Down, _) => guard.state.dashboard.select_down(),
        (MenuItem::Dashboard, Char('k') | KeyCode::Up, _) => guard.state.dashboard.select_up(),
        (MenuItem::Dashboard, KeyCode::Enter, _) => {
            let week = guard.state.dashboard.selected_week();
            guard.set_picks_week(week);
            guard.update_tab(MenuItem::Picks);
            drop(guard);
            request_picks_form(network_requests, week).await;
            return;
        }
        (MenuItem::Dashboard, Char('b'), _) => {
            let week = guard.state.dashboard.selected_week();
            guard.set_board_week(week);
            guard.update_tab(MenuItem::Weekly);
            drop(guard);
            let _ = network_requests
                .send(NetworkRequest::LoadWeeklyBoard { week })
                .await;
            return;
        }

        // Picks form
        (MenuItem::Picks, Char('j') | KeyCode::Down, _) => guard.state.picks.cursor_down(),
        (MenuItem::Picks, Char('k') | KeyCode::Up, _) => guard.state.picks.cursor_up(),
        (MenuItem::Picks, Char('h') | KeyCode::Left, _) => guard.choose_team(false),
        (MenuItem::Picks, Char('l') | KeyCode::Right, _) => guard.choose_team(true),
        (MenuItem::Picks, Char('g'), _) => {
            guard.state.picks.editing = Some(PredictionField::Gotw);
        }
        (MenuItem::Picks, Char('p'), _) => {
            guard.state.picks.editing = Some(PredictionField::Potw);
        }
        (MenuItem::Picks, Char('s') | KeyCode::Enter, _) => {
            match guard.prepare_submission() {
                Ok(submission) => {
                    guard.state.picks.feedback = Some("Submitting...".to_owned());
                    drop(guard);
                    let _ = network_requests
                        .send(NetworkRequest::SubmitPick { submission })
                        .await;
                    return;
                }
                Err(message) => guard.state.picks.feedback = Some(message),
            }
        }
        (MenuItem::Picks, Char('['), _) => {
            let week = guard.state.picks.week.saturating_sub(1).max(1);
            guard.set_picks_week(week);
            drop(guard);
            request_picks_form(network_requests, week).await;
            return;
        }
        (MenuItem::Picks, Char(']'), _) => {
            let week = guard.state.picks.week + 1;
            guard.set_picks_week(week);
            let week = guard.state.picks.week;
            drop(guard);
            request_picks_form(network_requests, week).await;
            return;
        }
        (MenuItem::Picks, KeyCode::Esc, _) => guard.update_tab(MenuItem::Dashboard),

        // Weekly board
        (MenuItem::Weekly, Char('j') | KeyCode::Down, _) => {
            guard.state.board.scroll = guard.state.board.scroll.saturating_add(1);
        }
        (MenuItem::Weekly, Char('k') | KeyCode::Up, _) => {
            guard.state.board.scroll = guard.state.board.scroll.saturating_sub(1);
        }
        (MenuItem::Weekly, Char('['), _) => {
            let week = guard.state.board.week.saturating_sub(1).max(1);
            guard.set_board_week(week);
            drop(guard);
            let _ = network_requests
                .send(NetworkRequest::LoadWeeklyBoard { week })
                .await;
            return;
        }
        (MenuItem::Weekly, Char(']'), _) => {
            let week = guard.state.board.week + 1;
            guard.set_board_week(week);
            let week = guard.state.board.week;
            drop(guard);
            let _ = network_requests
                .send(NetworkRequest::LoadWeeklyBoard { week })
                .await;
            return;
        }
        (MenuItem::Weekly, Char('r'), _) => {
            let week = guard.state.board.week;
            drop(guard);
            let _ = network_requests
                .send(NetworkRequest::LoadWeeklyBoard { week })
                .await;
            return;
        }
        (MenuItem::Weekly, KeyCode::Esc, _) => guard.update_tab(MenuItem::Dashboard),

        // Overall standings
        (MenuItem::Overall, Char('j') | KeyCode::Down, _) => {
            guard.state.overall.scroll = guard.state.overall.scroll.saturating_add(1);
        }
        (MenuItem::Overall, Char('k') | KeyCode::Up, _) => {
            guard.state.overall.scroll = guard.state.overall.scroll.saturating_sub(1);
        }
        (MenuItem::Overall, Char('r'), _) => {
            drop(guard);
            let _ = network_requests.send(NetworkRequest::LoadOverall).await;
            return;
        }
        (MenuItem::Overall, KeyCode::Esc, _) => guard.update_tab(MenuItem::Dashboard),

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}

/// The form needs three loads: the week's schedule, the season history for
/// used-team markers, and the pick already on file.
async fn request_picks_form(network_requests: &mpsc::Sender<NetworkRequest>, week: u32) {
    let _ = network_requests
        .send(NetworkRequest::LoadWeekGames { week })
        .await;
    let _ = network_requests.send(NetworkRequest::LoadSeasonPicks).await;
    let _ = network_requests
        .send(NetworkRequest::LoadWeekPick { week })
        .await;
}
