use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use frenzy_api::lock::RevealLock;
use frenzy_api::{Game, OverallRow, PickSubmission, SeasonPick, WeeklyBoard};

/// Week-scoped requests carry their week so the matching response can be
/// checked against the view the user is on by the time it arrives.
#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadCurrentWeek,
    LoadWeekGames { week: u32 },
    LoadSeasonPicks,
    LoadWeekPick { week: u32 },
    LoadWeeklyBoard { week: u32 },
    LoadOverall,
    SubmitPick { submission: PickSubmission },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    CurrentWeekLoaded { week: u32 },
    WeekGamesLoaded { week: u32, games: Vec<Game> },
    SeasonPicksLoaded { picks: Vec<SeasonPick> },
    WeekPickLoaded { week: u32, pick: Option<SeasonPick> },
    WeeklyBoardLoaded { week: u32, board: Box<WeeklyBoard>, reveal: RevealLock },
    OverallLoaded { standings: Vec<OverallRow> },
    PickSubmitted { week: u32 },
    /// Write-path failures always surface with the backend's reason.
    PickRejected { week: u32, message: String },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    /// 1 Hz tick from the picks-form countdown timer.
    CountdownTick,
    /// 60 s tick from the periodic refresher; acted on only while the
    /// weekly board is the active view.
    RefreshTick,
}
