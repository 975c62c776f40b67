use crate::state::messages::{NetworkRequest, NetworkResponse};
use frenzy_api::client::{ApiError, FrenzyApi};
use frenzy_api::{PickSubmission, Session};
use log::{debug, error};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

pub struct NetworkWorker {
    client: FrenzyApi,
    session: Option<Session>,
    qa_mode: bool,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        base_url: String,
        session: Option<Session>,
        qa_mode: bool,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client: FrenzyApi::new(base_url),
            session,
            qa_mode,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let result = match request {
                NetworkRequest::LoadCurrentWeek => self.handle_load_current_week().await,
                NetworkRequest::LoadWeekGames { week } => self.handle_load_games(week).await,
                NetworkRequest::LoadSeasonPicks => self.handle_load_season_picks().await,
                NetworkRequest::LoadWeekPick { week } => self.handle_load_week_pick(week).await,
                NetworkRequest::LoadWeeklyBoard { week } => self.handle_load_board(week).await,
                NetworkRequest::LoadOverall => self.handle_load_overall().await,
                NetworkRequest::SubmitPick { submission } => {
                    self.handle_submit_pick(submission).await
                }
            };

            debug!("network request complete");
            self.stop_loading_animation(result.is_ok()).await;

            let response = result.unwrap_or_else(|err| NetworkResponse::Error {
                message: err.to_string(),
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_load_current_week(&self) -> Result<NetworkResponse, ApiError> {
        debug!("loading current week");
        let week = self.client.fetch_current_week().await;
        Ok(NetworkResponse::CurrentWeekLoaded { week })
    }

    async fn handle_load_games(&self, week: u32) -> Result<NetworkResponse, ApiError> {
        debug!("loading games for week {week}");
        let games = self.client.fetch_games(week).await?;
        Ok(NetworkResponse::WeekGamesLoaded { week, games })
    }

    /// Season history needs credentials; without them a new/anonymous user
    /// simply has no history, which degrades cleanly everywhere it is used.
    async fn handle_load_season_picks(&self) -> Result<NetworkResponse, ApiError> {
        let Some(session) = self.session.as_ref() else {
            debug!("no session configured, season history unavailable");
            return Ok(NetworkResponse::SeasonPicksLoaded { picks: Vec::new() });
        };
        let picks = self.client.fetch_season_picks(session).await?;
        Ok(NetworkResponse::SeasonPicksLoaded { picks })
    }

    async fn handle_load_week_pick(&self, week: u32) -> Result<NetworkResponse, ApiError> {
        let Some(session) = self.session.as_ref() else {
            return Ok(NetworkResponse::WeekPickLoaded { week, pick: None });
        };
        let pick = self.client.fetch_week_pick(session, week).await?;
        Ok(NetworkResponse::WeekPickLoaded { week, pick })
    }

    async fn handle_load_board(&self, week: u32) -> Result<NetworkResponse, ApiError> {
        debug!("loading weekly board for week {week}");
        let (board, reveal) = self.client.load_weekly_board(week, self.qa_mode).await?;
        Ok(NetworkResponse::WeeklyBoardLoaded { week, board: Box::new(board), reveal })
    }

    async fn handle_load_overall(&self) -> Result<NetworkResponse, ApiError> {
        debug!("loading overall standings");
        let standings = self.client.fetch_overall().await?;
        Ok(NetworkResponse::OverallLoaded { standings })
    }

    /// Submission failures never become a bare `Error`: the form needs the
    /// reason, so rejections map to `PickRejected` with the message.
    async fn handle_submit_pick(
        &self,
        submission: PickSubmission,
    ) -> Result<NetworkResponse, ApiError> {
        let week = submission.week;
        let Some(session) = self.session.as_ref() else {
            return Ok(NetworkResponse::PickRejected {
                week,
                message: "Set FRENZY_TOKEN and FRENZY_USER_ID to submit picks.".to_owned(),
            });
        };
        debug!("submitting pick for week {week}");
        match self.client.submit_pick(session, &submission).await {
            Ok(()) => Ok(NetworkResponse::PickSubmitted { week }),
            Err(ApiError::Rejected(message)) => {
                Ok(NetworkResponse::PickRejected { week, message })
            }
            Err(other) => Ok(NetworkResponse::PickRejected { week, message: other.to_string() }),
        }
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state = LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}
