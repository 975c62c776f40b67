use crate::lock::RevealLock;
use crate::wire::{ErrorBody, OverallResponse, PublicPicksResponse, WeeklyBoardResponse};
use crate::{Game, OverallRow, PickSubmission, Row, SeasonPick, Session, WeeklyBoard};
use crate::{merge, normalize, schedule};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

/// Pick'em backend client. Every call is an independent, tolerant read
/// except `submit_pick`, which surfaces the backend's validation verdict.
#[derive(Debug, Clone)]
pub struct FrenzyApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    /// The backend rejected a submission; the message is user-facing.
    Rejected(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Rejected(msg) => write!(f, "{msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl FrenzyApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("frenzytui/0.1 (terminal pick'em client)")
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Current week number; anything odd in the payload defaults to week 1.
    pub async fn fetch_current_week(&self) -> u32 {
        let url = format!("{}/admin/current_week", self.base_url);
        match self.get::<Value>(&url, None).await {
            Ok(payload) => normalize::normalize_current_week(&payload),
            Err(_) => 1,
        }
    }

    /// Games for a week, each normalized from whatever shape the backend
    /// sent. Non-array payloads become an empty week.
    pub async fn fetch_games(&self, week: u32) -> ApiResult<Vec<Game>> {
        let url = format!("{}/games/week/{week}", self.base_url);
        let raw = self.get::<Value>(&url, None).await?;
        let games = raw
            .as_array()
            .map(|items| items.iter().map(normalize::normalize_game).collect())
            .unwrap_or_default();
        Ok(games)
    }

    /// The user's full season pick history. Empty for a new user.
    pub async fn fetch_season_picks(&self, session: &Session) -> ApiResult<Vec<SeasonPick>> {
        let url = format!(
            "{}/picks/season/private?user_id={}",
            self.base_url, session.user_id
        );
        let raw = self.get::<Value>(&url, Some(session)).await?;
        Ok(parse_season_picks(&raw))
    }

    /// The user's existing pick for one week, if any.
    pub async fn fetch_week_pick(
        &self,
        session: &Session,
        week: u32,
    ) -> ApiResult<Option<SeasonPick>> {
        let url = format!(
            "{}/picks/week/{week}/private?user_id={}",
            self.base_url, session.user_id
        );
        let raw = self.get::<Value>(&url, Some(session)).await?;
        Ok(parse_season_picks(&raw).into_iter().next())
    }

    /// Create or update a pick. Validation rejections (duplicate team,
    /// locked game, missing field) come back as `ApiError::Rejected` with
    /// the backend's own message.
    pub async fn submit_pick(
        &self,
        session: &Session,
        submission: &PickSubmission,
    ) -> ApiResult<()> {
        let url = format!("{}/picks/submit", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&session.token)
            .json(submission)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;

        if response.status().is_success() {
            return Ok(());
        }
        let is_client_error = response.status().is_client_error();
        let body: ErrorBody = response.json().await.unwrap_or_default();
        let message = body
            .error
            .unwrap_or_else(|| "Failed to submit pick. Please try again.".to_owned());
        if is_client_error {
            Err(ApiError::Rejected(message))
        } else {
            Err(ApiError::Other(message))
        }
    }

    /// Public picks for a week: the pre-reveal name list and post-reveal
    /// overlay source. Rows are normalized; ids may be absent by design.
    pub async fn fetch_public_picks(&self, week: u32, qa: bool) -> ApiResult<PublicPicks> {
        let url = format!(
            "{}/picks/week/{week}/public{}",
            self.base_url,
            qa_query(qa)
        );
        let raw: PublicPicksResponse = self.get(&url, None).await?;
        Ok(PublicPicks {
            rows: raw
                .picks
                .unwrap_or_default()
                .iter()
                .map(normalize::normalize_row)
                .collect(),
            locked: raw.locked,
            unlock_at: parse_unlock(raw.unlock_at_iso.as_deref()),
            qa_mode: raw.qa_mode.unwrap_or(false),
        })
    }

    /// The scored weekly leaderboard, rows normalized.
    pub async fn fetch_weekly_board(&self, week: u32, qa: bool) -> ApiResult<WeeklyBoard> {
        let url = format!("{}/leaderboard/week/{week}{}", self.base_url, qa_query(qa));
        let raw: WeeklyBoardResponse = self.get(&url, None).await?;
        Ok(map_board_response(raw, week))
    }

    /// Season standings; an empty result set is a normal pre-season state.
    pub async fn fetch_overall(&self) -> ApiResult<Vec<OverallRow>> {
        let url = format!("{}/leaderboard/overall", self.base_url);
        let raw: OverallResponse = self.get(&url, None).await?;
        Ok(raw.standings.unwrap_or_default())
    }

    /// Assemble the display-ready weekly board.
    ///
    /// Fallback chain:
    /// 1) scored leaderboard, overlaid with public picks when not
    ///    server-locked (a failed overlay probe degrades to scored-only);
    /// 2) public-picks-only board when the scored fetch fails;
    /// 3) the primary error only when both are unreachable.
    ///
    /// When neither payload carried an unlock instant, one is computed from
    /// the week's first Sunday kickoff. The reveal decision is made here so
    /// every view shares one verdict.
    pub async fn load_weekly_board(
        &self,
        week: u32,
        qa: bool,
    ) -> ApiResult<(WeeklyBoard, RevealLock)> {
        let board = match self.fetch_weekly_board(week, qa).await {
            Ok(mut board) => {
                if board.locked != Some(true)
                    && let Ok(overlay) = self.fetch_public_picks(week, qa).await
                {
                    board.rows = merge::merge_rows(board.rows, &overlay.rows);
                    // inherit lock/qa metadata the primary omitted
                    board.locked = board.locked.or(overlay.locked);
                    board.unlock_at = board.unlock_at.or(overlay.unlock_at);
                    board.qa_mode = board.qa_mode || overlay.qa_mode;
                }
                board
            }
            Err(primary_err) => match self.fetch_public_picks(week, qa).await {
                Ok(only) => WeeklyBoard {
                    week,
                    factor: 1,
                    locked: only.locked,
                    unlock_at: only.unlock_at,
                    qa_mode: only.qa_mode,
                    rows: only.rows,
                    ..WeeklyBoard::default()
                },
                Err(_) => return Err(primary_err),
            },
        };

        let computed = if board.unlock_at.is_none() {
            self.fetch_games(week)
                .await
                .ok()
                .as_deref()
                .and_then(schedule::first_sunday_kickoff)
        } else {
            None
        };

        let mut reveal = RevealLock::decide(
            board.locked,
            board.unlock_at,
            computed,
            qa,
            Utc::now(),
        );
        // Once the backend has revealed pick details there is nothing left
        // to hide, whatever the lock metadata claims.
        if reveal.locked && board.any_pick_visible() {
            reveal.locked = false;
        }
        Ok((board, reveal))
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(
        &self,
        url: &str,
        session: Option<&Session>,
    ) -> ApiResult<T> {
        let mut request = self.client.get(url).timeout(self.timeout);
        if let Some(session) = session {
            request = request.bearer_auth(&session.token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

/// Normalized public-picks payload.
#[derive(Debug, Clone, Default)]
pub struct PublicPicks {
    pub rows: Vec<Row>,
    pub locked: Option<bool>,
    pub unlock_at: Option<DateTime<Utc>>,
    pub qa_mode: bool,
}

fn qa_query(qa: bool) -> &'static str {
    if qa { "?qa=1" } else { "" }
}

fn parse_unlock(iso: Option<&str>) -> Option<DateTime<Utc>> {
    iso.and_then(|s| schedule::parse_instant(&Value::String(s.to_owned())))
}

fn map_board_response(raw: WeeklyBoardResponse, requested_week: u32) -> WeeklyBoard {
    WeeklyBoard {
        week: raw.week.unwrap_or(requested_week),
        factor: raw
            .factor
            .map(|f| f as u32)
            .filter(|&f| f >= 1)
            .unwrap_or(1),
        locked: raw.locked,
        unlock_at: parse_unlock(raw.unlock_at_iso.as_deref()),
        qa_mode: raw.qa_mode.unwrap_or(false),
        gotw_actual_total: raw.gotw.and_then(|g| g.actual_total),
        potw_actual_yards: raw.potw.and_then(|p| p.actual_yards),
        rows: raw
            .rows
            .unwrap_or_default()
            .iter()
            .map(normalize::normalize_row)
            .collect(),
    }
}

fn parse_season_picks(raw: &Value) -> Vec<SeasonPick> {
    let items = match raw {
        Value::Array(items) => items.as_slice(),
        // A bare object is a single pick.
        Value::Object(_) => std::slice::from_ref(raw),
        _ => &[],
    };
    items
        .iter()
        .filter_map(|item| {
            let row = normalize::normalize_row(item);
            let week = item
                .get("week")
                .and_then(Value::as_u64)
                .and_then(|w| u32::try_from(w).ok())?;
            Some(SeasonPick {
                week,
                team: row.team?,
                gotw_prediction: row.gotw_prediction,
                potw_prediction: row.potw_prediction,
            })
        })
        .collect()
}
