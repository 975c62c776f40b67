//! Normalization of loosely-typed backend records into canonical rows.
//!
//! The backend has gone through several field-name generations for the same
//! concepts; every alias chain below starts with the canonical modern name
//! and falls back through the legacy ones. Normalization is total (never
//! panics, whatever the shape) and idempotent (a canonical row re-normalizes
//! to itself, because the canonical name leads each chain).

use crate::{Game, Row};
use serde_json::Value;

const TEAM_ALIASES: &[&str] = &[
    "team",
    "team_pick",
    "pick_team",
    "selected_team",
    "selection",
    "team_name",
    "team_abbr",
];
const GOTW_ALIASES: &[&str] = &[
    "gotw_prediction",
    "gotw_pick",
    "gotw_guess",
    "gotw",
    "game_of_the_week",
];
const POTW_ALIASES: &[&str] = &[
    "potw_prediction",
    "potw_pick",
    "potw_guess",
    "potw",
    "player_of_the_week",
];
const FAVORITE_ALIASES: &[&str] = &["is_favorite", "favorite"];
const CORRECT_ALIASES: &[&str] = &["is_correct_pick", "correct", "correct_pick"];
const NAME_ALIASES: &[&str] = &["display_name", "first_name", "name"];
const USER_ID_ALIASES: &[&str] = &["user_id", "id"];

/// First present, non-null, non-empty field among `names`.
fn field<'a>(record: &'a Value, names: &[&str]) -> Option<&'a Value> {
    let map = record.as_object()?;
    names
        .iter()
        .filter_map(|name| map.get(*name))
        .find(|v| match v {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        })
}

fn opt_string(record: &Value, names: &[&str]) -> Option<String> {
    match field(record, names)? {
        Value::String(s) => Some(s.clone()),
        // Some legacy rows carried bare numbers where strings belong.
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Integer-or-absent. Accepts JSON numbers and numeric strings; anything
/// else is absent, never zero.
fn opt_i64(record: &Value, names: &[&str]) -> Option<i64> {
    match field(record, names)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn opt_bool(record: &Value, names: &[&str]) -> Option<bool> {
    match field(record, names)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        _ => None,
    }
}

fn opt_f64(record: &Value, names: &[&str]) -> Option<f64> {
    match field(record, names)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Case-insensitive, trimmed identity key for name/email matching.
pub fn name_key(s: &str) -> Option<String> {
    let key = s.trim().to_lowercase();
    (!key.is_empty()).then_some(key)
}

/// Normalize one pick/leaderboard record of any vintage into a canonical
/// `Row`. Used for both the public-picks payload and the scored leaderboard
/// payload; scoring fields are simply absent on the former.
pub fn normalize_row(record: &Value) -> Row {
    Row {
        user_id: opt_i64(record, USER_ID_ALIASES),
        display_name: opt_string(record, NAME_ALIASES),
        email: opt_string(record, &["email"]),

        team: opt_string(record, TEAM_ALIASES),
        gotw_prediction: opt_i64(record, GOTW_ALIASES),
        potw_prediction: opt_i64(record, POTW_ALIASES),
        is_favorite: opt_bool(record, FAVORITE_ALIASES),
        is_correct_pick: opt_bool(record, CORRECT_ALIASES),
        gotw_rank: opt_i64(record, &["gotw_rank"])
            .filter(|r| (1..=3).contains(r))
            .map(|r| r as u8),
        potw_exact: opt_bool(record, &["potw_exact"]).unwrap_or(false),

        base_points: opt_i64(record, &["base_points"]),
        bonus_points: opt_i64(record, &["bonus_points"]),
        total_points: opt_i64(record, &["total_points"]),
        is_weekly_winner: opt_bool(record, &["is_weekly_winner"]).unwrap_or(false),
    }
}

/// Normalize one game record. Kickoff parsing is delegated to `schedule`;
/// a game the backend sent without a usable id is kept (it can still render)
/// under a positional placeholder id chosen by the caller.
pub fn normalize_game(record: &Value) -> Game {
    Game {
        id: opt_string(record, &["id", "game_id"]).unwrap_or_default(),
        home_team: opt_string(record, &["home_team", "home"]).unwrap_or_default(),
        away_team: opt_string(record, &["away_team", "away"]).unwrap_or_default(),
        kickoff: crate::schedule::parse_kickoff(record),
        favorite: opt_string(record, &["favorite", "favorite_team"]),
        spread: opt_f64(record, &["spread", "point_spread"]),
        home_score: opt_i64(record, &["home_score"]).and_then(|s| u16::try_from(s).ok()),
        away_score: opt_i64(record, &["away_score"]).and_then(|s| u16::try_from(s).ok()),
    }
}

/// The current-week endpoint has returned, at various times, a bare number,
/// `{ "current_week": 5 }`, and `{ "current_week": { "week_number": 5 } }`.
/// Anything unrecognizable defaults to week 1.
pub fn normalize_current_week(payload: &Value) -> u32 {
    let inner = payload.get("current_week").unwrap_or(payload);
    let n = match inner {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Object(_) => opt_i64(inner, &["week_number", "week"]),
        _ => None,
    };
    n.filter(|n| (1..=crate::TOTAL_WEEKS as i64).contains(n))
        .map(|n| n as u32)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_and_null_records_normalize_to_all_absent() {
        for record in [json!({}), json!(null), json!([1, 2]), json!("junk")] {
            let row = normalize_row(&record);
            assert_eq!(row.team, None);
            assert_eq!(row.gotw_prediction, None);
            assert_eq!(row.is_favorite, None);
            assert!(!row.potw_exact);
            assert_eq!(row.total_points, None);
        }
    }

    #[test]
    fn legacy_aliases_resolve_and_modern_name_wins() {
        let row = normalize_row(&json!({
            "pick_team": "Bears",
            "gotw_guess": 41,
            "player_of_the_week": "95",
            "favorite": true,
            "correct_pick": false,
        }));
        assert_eq!(row.team.as_deref(), Some("Bears"));
        assert_eq!(row.gotw_prediction, Some(41));
        assert_eq!(row.potw_prediction, Some(95));
        assert_eq!(row.is_favorite, Some(true));
        assert_eq!(row.is_correct_pick, Some(false));

        // modern name takes precedence when both are present
        let row = normalize_row(&json!({ "team": "Lions", "team_pick": "Bears" }));
        assert_eq!(row.team.as_deref(), Some("Lions"));
    }

    #[test]
    fn zero_prediction_is_not_absent() {
        let row = normalize_row(&json!({ "gotw_prediction": 0 }));
        assert_eq!(row.gotw_prediction, Some(0));
    }

    #[test]
    fn empty_string_and_null_count_as_absent() {
        let row = normalize_row(&json!({ "team": "", "gotw_prediction": null }));
        assert_eq!(row.team, None);
        assert_eq!(row.gotw_prediction, None);
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_row(&json!({
            "name": "amy",
            "email": "amy@example.com",
            "selected_team": "Packers",
            "gotw": 44,
            "potw_exact": true,
            "base_points": 2,
            "total_points": 3,
            "is_weekly_winner": true,
        }));
        let round_tripped = serde_json::to_value(&once).unwrap();
        assert_eq!(normalize_row(&round_tripped), once);
    }

    #[test]
    fn gotw_rank_outside_1_to_3_is_dropped() {
        assert_eq!(normalize_row(&json!({ "gotw_rank": 2 })).gotw_rank, Some(2));
        assert_eq!(normalize_row(&json!({ "gotw_rank": 0 })).gotw_rank, None);
        assert_eq!(normalize_row(&json!({ "gotw_rank": 9 })).gotw_rank, None);
    }

    #[test]
    fn label_falls_back_through_the_chain() {
        let mut row = normalize_row(&json!({ "email": "jdoe@example.com" }));
        assert_eq!(row.label(0), "jdoe");
        row.email = None;
        row.user_id = Some(7);
        assert_eq!(row.label(0), "User 7");
        row.user_id = None;
        assert_eq!(row.label(2), "Player 3");

        let named = normalize_row(&json!({ "first_name": "Dana", "email": "x@y.z" }));
        assert_eq!(named.label(0), "Dana");
    }

    #[test]
    fn current_week_tolerates_every_observed_shape() {
        assert_eq!(normalize_current_week(&json!(5)), 5);
        assert_eq!(normalize_current_week(&json!({ "current_week": 7 })), 7);
        assert_eq!(
            normalize_current_week(&json!({ "current_week": { "week_number": 3 } })),
            3
        );
        assert_eq!(normalize_current_week(&json!({ "current_week": { "week": 4 } })), 4);
        assert_eq!(normalize_current_week(&json!("nonsense")), 1);
        assert_eq!(normalize_current_week(&json!(99)), 1);
        assert_eq!(normalize_current_week(&json!(null)), 1);
    }

    #[test]
    fn game_fields_normalize_with_spread_and_scores() {
        let game = normalize_game(&json!({
            "id": 12,
            "home_team": "Bears",
            "away_team": "Lions",
            "kickoff": "2024-09-22T17:00:00Z",
            "favorite": "Lions",
            "spread": "3.5",
            "home_score": 20,
            "away_score": 27,
        }));
        assert_eq!(game.id, "12");
        assert!(game.kickoff.is_some());
        assert_eq!(game.spread, Some(3.5));
        assert_eq!(game.away_score, Some(27));
        assert!(game.has_team("Bears"));
        assert!(!game.has_team("Packers"));
    }

    #[test]
    fn name_key_trims_and_lowercases() {
        assert_eq!(name_key("  Amy "), Some("amy".into()));
        assert_eq!(name_key("   "), None);
    }
}
