use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, parse_prediction};
use crate::state::countdown::CountdownTimer;
use crate::state::messages::UiEvent;
use chrono::Utc;
use frenzy_api::lock::RevealLock;
use frenzy_api::{
    Game, OverallRow, PickSubmission, SeasonPick, TOTAL_WEEKS, WeeklyBoard, merge, rules,
};
use tokio::sync::mpsc;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Dashboard,
    Picks,
    Weekly,
    Overall,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
    ui_events: mpsc::Sender<UiEvent>,
    /// Alive only while the Picks tab is current; dropping it aborts the
    /// tick task.
    countdown_timer: Option<CountdownTimer>,
}

impl App {
    pub fn new(ui_events: mpsc::Sender<UiEvent>) -> Self {
        let settings = AppSettings::load();

        let app = Self {
            state: AppState::new(),
            settings,
            ui_events,
            countdown_timer: None,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Network response handlers — called from main_ui_loop. Week-scoped
    // responses are dropped when their week no longer matches the view;
    // in-flight fetches are never cancelled, this guard is what keeps a
    // stale response from overwriting a newer view.
    // -----------------------------------------------------------------------

    pub fn on_current_week(&mut self, week: u32) {
        self.state.last_error = None;
        let week = week.clamp(1, TOTAL_WEEKS);
        self.state.current_week = week;
        self.state.dashboard.selected = week as usize - 1;
        if self.state.picks.week == 0 {
            self.state.picks.reset_for_week(week);
        }
        if self.state.board.week == 0 {
            self.state.board.week = week;
        }
    }

    pub fn on_week_games(&mut self, week: u32, games: Vec<Game>) {
        self.state.dashboard.games_by_week.insert(week, games.clone());
        if self.state.picks.week == week {
            self.state.picks.set_games(games, Utc::now());
        }
    }

    pub fn on_season_picks(&mut self, picks: Vec<SeasonPick>) {
        self.state.season_picks = picks;
    }

    pub fn on_week_pick(&mut self, week: u32, pick: Option<SeasonPick>) {
        if self.state.picks.week == week {
            self.state.picks.set_existing(pick);
        }
    }

    pub fn on_weekly_board(&mut self, week: u32, mut board: WeeklyBoard, reveal: RevealLock) {
        if self.state.board.week != week {
            return;
        }
        self.state.last_error = None;
        if reveal.locked {
            merge::sort_locked(&mut board.rows);
        } else {
            merge::sort_unlocked(&mut board.rows);
        }
        self.state.board.board = Some(board);
        self.state.board.reveal = reveal;
        self.state.board.scroll = 0;
    }

    pub fn on_overall(&mut self, standings: Vec<OverallRow>) {
        self.state.overall.standings = standings;
        self.state.overall.loaded = true;
    }

    pub fn on_pick_submitted(&mut self, week: u32) {
        if self.state.picks.week == week {
            self.state.picks.feedback = Some(format!("Pick submitted for week {week}."));
        }
    }

    pub fn on_pick_rejected(&mut self, week: u32, message: String) {
        if self.state.picks.week == week {
            self.state.picks.feedback = Some(message);
        }
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;

        // one countdown timer, alive only while the form is visible
        if next == MenuItem::Picks {
            self.countdown_timer = Some(CountdownTimer::start(self.ui_events.clone()));
        } else {
            self.countdown_timer = None;
        }
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Week navigation
    // -----------------------------------------------------------------------

    /// Point the picks form at a week, clearing any half-edited state. The
    /// countdown restarts too: the previous week may have stopped the timer
    /// by locking.
    pub fn set_picks_week(&mut self, week: u32) {
        self.state.picks.reset_for_week(week.clamp(1, TOTAL_WEEKS));
        if self.state.active_tab == MenuItem::Picks {
            self.countdown_timer = Some(CountdownTimer::start(self.ui_events.clone()));
        }
    }

    pub fn set_board_week(&mut self, week: u32) {
        let week = week.clamp(1, TOTAL_WEEKS);
        if self.state.board.week != week {
            self.state.board.week = week;
            self.state.board.board = None;
            self.state.board.scroll = 0;
        }
    }

    pub fn tick_countdown(&mut self) {
        let deadline = self.state.picks.submission_lock.deadline;
        self.state.picks.countdown = self.state.picks.countdown.update(deadline, Utc::now());
        // Locked is terminal for the week; stop the tick task instead of
        // letting it fire every second against a finished countdown.
        if self.state.picks.countdown.is_locked() {
            self.countdown_timer = None;
        }
    }

    #[cfg(test)]
    fn countdown_timer_running(&self) -> bool {
        self.countdown_timer.is_some()
    }

    // -----------------------------------------------------------------------
    // Picks form
    // -----------------------------------------------------------------------

    /// Select the away (`top`) or home side of the game under the cursor.
    /// Constraint violations leave the selection unchanged and explain why.
    pub fn choose_team(&mut self, home: bool) {
        let Some(game) = self.state.picks.current_game() else {
            return;
        };
        let team = if home { game.home_team.clone() } else { game.away_team.clone() };
        let ruling = rules::check_pick(
            &self.state.season_picks,
            &self.state.picks.games,
            &team,
            self.state.picks.week,
            Utc::now(),
        );
        match ruling.message(&team) {
            Some(message) => self.state.picks.feedback = Some(message),
            None => {
                self.state.picks.chosen_team = Some(team);
                self.state.picks.feedback = None;
            }
        }
    }

    /// Validate the form and build the submission payload. Every failure is
    /// a user-facing message for the feedback line.
    pub fn prepare_submission(&self) -> Result<PickSubmission, String> {
        let picks = &self.state.picks;
        let now = Utc::now();

        let user_id = self
            .settings
            .session()
            .map(|s| s.user_id)
            .ok_or_else(|| "Set FRENZY_TOKEN and FRENZY_USER_ID to submit picks.".to_owned())?;

        if picks.countdown.is_locked() || picks.submission_lock.is_locked(now) {
            return Err("Picks are locked for this week.".to_owned());
        }

        let team = picks
            .chosen_team
            .clone()
            .ok_or_else(|| "Choose a team first.".to_owned())?;

        let ruling = rules::check_pick(
            &self.state.season_picks,
            &picks.games,
            &team,
            picks.week,
            now,
        );
        if let Some(message) = ruling.message(&team) {
            return Err(message);
        }

        Ok(PickSubmission {
            user_id,
            week: picks.week,
            team,
            gotw_prediction: parse_prediction(&picks.gotw_input)?,
            potw_prediction: parse_prediction(&picks.potw_input)?,
        })
    }
}
