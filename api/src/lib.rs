pub mod client;
pub mod lock;
pub mod merge;
pub mod normalize;
pub mod rules;
pub mod schedule;
pub mod wire;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the backend's wire drift
// ---------------------------------------------------------------------------

pub const TOTAL_WEEKS: u32 = 18;

/// One scheduled NFL game inside a week. Read-only snapshot; the client
/// never mutates games.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Game {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    /// Parsed from whichever kickoff field the backend happened to send.
    /// None = unparseable; such games never participate in lock math.
    pub kickoff: Option<DateTime<Utc>>,
    pub favorite: Option<String>,
    pub spread: Option<f64>,
    pub home_score: Option<u16>,
    pub away_score: Option<u16>,
}

impl Game {
    /// Whether a given team plays in this game.
    pub fn has_team(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }

    /// True once the kickoff instant has passed. Games with no parseable
    /// kickoff never self-lock.
    pub fn kicked_off(&self, now: DateTime<Utc>) -> bool {
        self.kickoff.is_some_and(|k| now >= k)
    }
}

/// A user's own pick for one week, as returned by the private endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SeasonPick {
    pub week: u32,
    pub team: String,
    pub gotw_prediction: Option<i64>,
    pub potw_prediction: Option<i64>,
}

/// Payload for creating or updating a pick.
#[derive(Debug, Clone, Serialize)]
pub struct PickSubmission {
    pub user_id: i64,
    pub week: u32,
    pub team: String,
    pub gotw_prediction: Option<i64>,
    pub potw_prediction: Option<i64>,
}

/// Canonical leaderboard/pick row. Every loosely-shaped backend record is
/// normalized into this one shape (see `normalize`); merged rows on the
/// weekly board are also this type.
///
/// Absence is always `None` — a GOTW guess of 0 is a real prediction and
/// must never collapse into "no prediction".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Row {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    // pick-related (may be hidden pre-reveal)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gotw_prediction: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potw_prediction: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_correct_pick: Option<bool>,
    /// GOTW closeness rank, 1..=3 when awarded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gotw_rank: Option<u8>,
    #[serde(default)]
    pub potw_exact: bool,

    // scoring (only on scored leaderboard rows)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_points: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus_points: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_points: Option<i64>,
    #[serde(default)]
    pub is_weekly_winner: bool,
}

impl Row {
    /// True when any pick detail is visible on this row. Rows from a locked
    /// week carry identity only.
    pub fn has_pick_detail(&self) -> bool {
        self.team.is_some() || self.gotw_prediction.is_some() || self.potw_prediction.is_some()
    }

    /// Display-name fallback chain: display name, email local-part,
    /// "User {id}", positional "Player {n}". The same chain everywhere a
    /// name is shown, so one user never appears under two labels.
    pub fn label(&self, idx: usize) -> String {
        if let Some(name) = self.display_name.as_deref().filter(|s| !s.trim().is_empty()) {
            return name.trim().to_owned();
        }
        if let Some(local) = self
            .email
            .as_deref()
            .and_then(|e| e.split('@').next())
            .filter(|s| !s.trim().is_empty())
        {
            return local.trim().to_owned();
        }
        if let Some(id) = self.user_id {
            return format!("User {id}");
        }
        format!("Player {}", idx + 1)
    }
}

/// The assembled weekly leaderboard: scored rows overlaid with public picks,
/// plus the week's lock metadata.
#[derive(Debug, Clone, Default)]
pub struct WeeklyBoard {
    pub week: u32,
    /// Scoring multiplier; > 1 on a double-points week.
    pub factor: u32,
    pub locked: Option<bool>,
    pub unlock_at: Option<DateTime<Utc>>,
    pub qa_mode: bool,
    pub gotw_actual_total: Option<i64>,
    pub potw_actual_yards: Option<i64>,
    pub rows: Vec<Row>,
}

impl WeeklyBoard {
    pub fn any_pick_visible(&self) -> bool {
        self.rows.iter().any(Row::has_pick_detail)
    }
}

/// One row of the season standings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverallRow {
    pub user_id: Option<i64>,
    pub display_name: Option<String>,
    #[serde(default)]
    pub total_points: i64,
    #[serde(default)]
    pub weeks_scored: u32,
    #[serde(default)]
    pub correct_favorites: u32,
    #[serde(default)]
    pub correct_underdogs: u32,
    #[serde(default)]
    pub gotw_firsts: u32,
    #[serde(default)]
    pub potw_exact: u32,
}

/// Explicit request context for authenticated calls. Passed to each client
/// method instead of living in ambient storage, so fetch logic is testable
/// without a global environment.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub token: String,
}
