use crate::app::MenuItem;
use crate::state::countdown::Countdown;
use chrono::{DateTime, Utc};
use frenzy_api::lock::{RevealLock, SubmissionLock};
use frenzy_api::{Game, OverallRow, SeasonPick, TOTAL_WEEKS, WeeklyBoard};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Dashboard — the 18-week season overview
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct DashboardState {
    /// Selected week index, 0-based.
    pub selected: usize,
    /// Real schedules, fetched for the current and previous week to refine
    /// the provisional lock guesses.
    pub games_by_week: HashMap<u32, Vec<Game>>,
}

impl DashboardState {
    pub fn select_down(&mut self) {
        if self.selected + 1 < TOTAL_WEEKS as usize {
            self.selected += 1;
        }
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_week(&self) -> u32 {
        self.selected as u32 + 1
    }

    /// Whether a week's picks form is closed. Weeks with a known schedule
    /// use the real first-Sunday boundary; the rest get the provisional
    /// guess that past weeks are closed and current/future weeks are open.
    pub fn submission_locked(&self, week: u32, current_week: u32, now: DateTime<Utc>) -> bool {
        match self.games_by_week.get(&week) {
            Some(games) => SubmissionLock::for_week(games).is_locked(now),
            None => week < current_week,
        }
    }
}

// ---------------------------------------------------------------------------
// Picks form
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionField {
    Gotw,
    Potw,
}

#[derive(Debug, Default)]
pub struct PicksState {
    pub week: u32,
    pub games: Vec<Game>,
    pub games_loaded: bool,
    /// The pick already on file for this week, if any. Editing it is allowed
    /// until the week locks.
    pub existing: Option<SeasonPick>,
    pub cursor: usize,
    pub chosen_team: Option<String>,
    pub gotw_input: String,
    pub potw_input: String,
    pub editing: Option<PredictionField>,
    pub countdown: Countdown,
    pub submission_lock: SubmissionLock,
    /// Validation or submit feedback shown under the form.
    pub feedback: Option<String>,
}

impl PicksState {
    pub fn reset_for_week(&mut self, week: u32) {
        *self = PicksState { week, ..PicksState::default() };
    }

    pub fn set_games(&mut self, games: Vec<Game>, now: DateTime<Utc>) {
        self.submission_lock = SubmissionLock::for_week(&games);
        self.games = games;
        self.games_loaded = true;
        self.countdown = self.countdown.update(self.submission_lock.deadline, now);
        if self.cursor >= self.games.len() {
            self.cursor = self.games.len().saturating_sub(1);
        }
    }

    /// Prefill the form from the pick on file. User edits in progress win
    /// over a late-arriving fetch.
    pub fn set_existing(&mut self, pick: Option<SeasonPick>) {
        if let Some(pick) = &pick {
            if self.chosen_team.is_none() {
                self.chosen_team = Some(pick.team.clone());
            }
            if self.gotw_input.is_empty()
                && let Some(g) = pick.gotw_prediction
            {
                self.gotw_input = g.to_string();
            }
            if self.potw_input.is_empty()
                && let Some(p) = pick.potw_prediction
            {
                self.potw_input = p.to_string();
            }
        }
        self.existing = pick;
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.games.len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn current_game(&self) -> Option<&Game> {
        self.games.get(self.cursor)
    }

    pub fn push_input(&mut self, c: char) {
        if !c.is_ascii_digit() {
            return;
        }
        let input = match self.editing {
            Some(PredictionField::Gotw) => &mut self.gotw_input,
            Some(PredictionField::Potw) => &mut self.potw_input,
            None => return,
        };
        if input.len() < 4 {
            input.push(c);
        }
    }

    pub fn pop_input(&mut self) {
        let input = match self.editing {
            Some(PredictionField::Gotw) => &mut self.gotw_input,
            Some(PredictionField::Potw) => &mut self.potw_input,
            None => return,
        };
        input.pop();
    }
}

/// Empty input means "no prediction"; `0` is a real guess.
pub fn parse_prediction(input: &str) -> Result<Option<i64>, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|_| format!("'{trimmed}' is not a whole number."))
}

// ---------------------------------------------------------------------------
// Weekly board / overall standings
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct BoardState {
    pub week: u32,
    pub board: Option<WeeklyBoard>,
    pub reveal: RevealLock,
    pub scroll: u16,
}

#[derive(Debug, Default)]
pub struct OverallState {
    pub standings: Vec<OverallRow>,
    pub loaded: bool,
    pub scroll: u16,
}

// ---------------------------------------------------------------------------
// Top-level state
// ---------------------------------------------------------------------------

pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub current_week: u32,
    /// The user's full season history; drives "Submitted" markers and the
    /// one-team-per-season rule.
    pub season_picks: Vec<SeasonPick>,
    pub dashboard: DashboardState,
    pub picks: PicksState,
    pub board: BoardState,
    pub overall: OverallState,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            active_tab: MenuItem::default(),
            previous_tab: MenuItem::default(),
            show_logs: false,
            last_error: None,
            current_week: 1,
            season_picks: Vec::new(),
            dashboard: DashboardState::default(),
            picks: PicksState::default(),
            board: BoardState::default(),
            overall: OverallState::default(),
        }
    }

    pub fn week_pick(&self, week: u32) -> Option<&SeasonPick> {
        self.season_picks.iter().find(|p| p.week == week)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        // a Sunday
        Utc.with_ymd_and_hms(2024, 9, 22, 12, 0, 0).unwrap()
    }

    #[test]
    fn provisional_locks_refine_with_real_schedules() {
        let mut dash = DashboardState::default();
        // no schedule known: past weeks closed, current open
        assert!(dash.submission_locked(2, 3, now()));
        assert!(!dash.submission_locked(3, 3, now()));

        // a real schedule for the previous week with a late Sunday kickoff
        // reopens it
        dash.games_by_week.insert(
            2,
            vec![Game {
                kickoff: Some(Utc.with_ymd_and_hms(2024, 9, 22, 20, 0, 0).unwrap()),
                ..Game::default()
            }],
        );
        assert!(!dash.submission_locked(2, 3, now()));
    }

    #[test]
    fn existing_pick_prefills_but_never_clobbers_edits() {
        let mut picks = PicksState::default();
        picks.chosen_team = Some("Jets".into());
        picks.set_existing(Some(SeasonPick {
            week: 1,
            team: "Bears".into(),
            gotw_prediction: Some(0),
            potw_prediction: None,
        }));
        assert_eq!(picks.chosen_team.as_deref(), Some("Jets"));
        // zero is a real prediction and round-trips into the input
        assert_eq!(picks.gotw_input, "0");
    }

    #[test]
    fn prediction_input_rules() {
        assert_eq!(parse_prediction(""), Ok(None));
        assert_eq!(parse_prediction(" 0 "), Ok(Some(0)));
        assert_eq!(parse_prediction("41"), Ok(Some(41)));
        assert!(parse_prediction("lots").is_err());
    }

    #[test]
    fn digit_input_is_capped_and_field_scoped() {
        let mut picks = PicksState::default();
        picks.editing = Some(PredictionField::Gotw);
        for c in "123456".chars() {
            picks.push_input(c);
        }
        picks.push_input('x');
        assert_eq!(picks.gotw_input, "1234");
        assert!(picks.potw_input.is_empty());
        picks.pop_input();
        assert_eq!(picks.gotw_input, "123");
    }
}
