//! Kickoff-time parsing and the weekly lock boundary.
//!
//! The lock boundary for a week is the earliest kickoff that falls on a
//! UTC Sunday: the first point where who-picked-whom becomes competitive
//! information. A week with no Sunday game has no time-based boundary and
//! locks only on explicit server say-so.

use crate::Game;
use chrono::{DateTime, Datelike, TimeZone, Utc, Weekday};
use serde_json::Value;

/// Kickoff field names the backend has used across versions, newest first.
const KICKOFF_ALIASES: &[&str] = &["kickoff", "start_time", "kickoff_time", "game_time"];

/// Parse the kickoff instant out of a raw game record, trying each known
/// field name in order. Malformed or missing values yield `None`.
pub fn parse_kickoff(record: &Value) -> Option<DateTime<Utc>> {
    let map = record.as_object()?;
    KICKOFF_ALIASES
        .iter()
        .filter_map(|name| map.get(*name))
        .find_map(parse_instant)
}

/// Tolerant timestamp parsing: RFC 3339, RFC 2822, naive date-times taken
/// as UTC, and integer epoch seconds or milliseconds.
pub fn parse_instant(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_instant_str(s),
        Value::Number(n) => {
            let n = n.as_i64()?;
            // Heuristic: past ~2286 as seconds means it was milliseconds.
            // unsigned_abs, because i64::MIN can arrive as a JSON number.
            if n.unsigned_abs() >= 100_000_000_000 {
                Utc.timestamp_millis_opt(n).single()
            } else {
                Utc.timestamp_opt(n, 0).single()
            }
        }
        _ => None,
    }
}

fn parse_instant_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

/// The earliest kickoff in `games` whose UTC calendar day is a Sunday.
/// Games with unparseable kickoffs are excluded, never fatal.
pub fn first_sunday_kickoff(games: &[Game]) -> Option<DateTime<Utc>> {
    games
        .iter()
        .filter_map(|g| g.kickoff)
        .filter(|k| k.weekday() == Weekday::Sun)
        .min()
}
