//! Raw wire shapes for the backend's JSON responses. Envelope fields are
//! typed; the row payloads stay as `serde_json::Value` because their field
//! names drift across backend versions and go through `normalize` instead.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WeeklyBoardResponse {
    pub week: Option<u32>,
    pub factor: Option<f64>,
    pub locked: Option<bool>,
    pub unlock_at_iso: Option<String>,
    pub qa_mode: Option<bool>,
    pub gotw: Option<GotwMeta>,
    pub potw: Option<PotwMeta>,
    pub rows: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GotwMeta {
    pub actual_total: Option<i64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PotwMeta {
    pub actual_yards: Option<i64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PublicPicksResponse {
    pub picks: Option<Vec<Value>>,
    pub locked: Option<bool>,
    pub unlock_at_iso: Option<String>,
    pub qa_mode: Option<bool>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct OverallResponse {
    pub standings: Option<Vec<crate::OverallRow>>,
}

/// Validation failures come back as `{ "error": "..." }`.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ErrorBody {
    pub error: Option<String>,
}
