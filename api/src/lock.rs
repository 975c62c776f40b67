//! The two lock concepts of the league.
//!
//! `RevealLock` hides other people's pick details on the leaderboard until
//! the week's boundary passes — an accidental spoiler is worse than a late
//! reveal, so every ambiguity resolves toward locked. `SubmissionLock` stops
//! pick edits on the form. Both currently key off the same first-Sunday
//! kickoff, but they are independently triggerable and stay separate types.

use chrono::{DateTime, Local, Utc};

/// Banner text when no unlock instant is known at all.
const UNLOCK_FALLBACK_TEXT: &str = "Sunday 11:00 AM (Arizona)";

/// Effective "hide pick details" decision for one week.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RevealLock {
    pub locked: bool,
    pub unlock_at: Option<DateTime<Utc>>,
}

impl RevealLock {
    /// Decide the reveal lock from up to three inputs, in priority order:
    ///
    /// 1. `qa_override` — QA escape hatch, never lock.
    /// 2. `server_locked` — an explicit server flag locks outright.
    /// 3. The unlock instant (server-supplied, else computed from the
    ///    schedule) against `now`.
    ///
    /// Server-locked with no known instant locks indefinitely; server
    /// reporting unlocked while the instant is still in the future stays
    /// locked until the instant passes.
    pub fn decide(
        server_locked: Option<bool>,
        server_unlock_at: Option<DateTime<Utc>>,
        computed_unlock_at: Option<DateTime<Utc>>,
        qa_override: bool,
        now: DateTime<Utc>,
    ) -> Self {
        let unlock_at = server_unlock_at.or(computed_unlock_at);
        if qa_override {
            return Self { locked: false, unlock_at };
        }
        let locked =
            server_locked == Some(true) || unlock_at.is_some_and(|unlock| now < unlock);
        Self { locked, unlock_at }
    }

    /// Human-readable unlock time for the banner, in local time; a fixed
    /// descriptive placeholder when no instant is known.
    pub fn display_text(&self) -> String {
        match self.unlock_at {
            Some(at) => at
                .with_timezone(&Local)
                .format("%a %b %-d, %-I:%M %p")
                .to_string(),
            None => UNLOCK_FALLBACK_TEXT.to_owned(),
        }
    }
}

/// The picks-form deadline: the week's first Sunday kickoff. Per-game
/// kickoff locks are handled separately via `Game::kicked_off`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SubmissionLock {
    pub deadline: Option<DateTime<Utc>>,
}

impl SubmissionLock {
    pub fn for_week(games: &[crate::Game]) -> Self {
        Self { deadline: crate::schedule::first_sunday_kickoff(games) }
    }

    /// No Sunday boundary means the week never globally locks; per-game
    /// locks still apply.
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.deadline.is_some_and(|d| now >= d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 22, h, m, s).unwrap()
    }

    #[test]
    fn lock_bias_holds_for_every_input_combination() {
        let unlock = at(17, 0, 0);
        let before = at(16, 59, 0);
        let after = at(17, 0, 1);

        for server_locked in [None, Some(false), Some(true)] {
            for unlock_at in [None, Some(unlock)] {
                for now in [before, after] {
                    let lock = RevealLock::decide(server_locked, unlock_at, None, false, now);
                    let must_lock = server_locked == Some(true)
                        || unlock_at.is_some_and(|u| now < u);
                    assert_eq!(lock.locked, must_lock, "{server_locked:?} {unlock_at:?} {now}");
                }
            }
        }
    }

    #[test]
    fn qa_override_beats_everything() {
        let lock = RevealLock::decide(Some(true), Some(at(23, 0, 0)), None, true, at(1, 0, 0));
        assert!(!lock.locked);
        // the instant is still reported so QA sees what would apply
        assert_eq!(lock.unlock_at, Some(at(23, 0, 0)));
    }

    #[test]
    fn server_locked_without_instant_locks_indefinitely() {
        let lock = RevealLock::decide(Some(true), None, None, false, at(23, 59, 59));
        assert!(lock.locked);
        assert_eq!(lock.unlock_at, None);
        assert_eq!(lock.display_text(), UNLOCK_FALLBACK_TEXT);
    }

    #[test]
    fn server_unlocked_still_hides_until_computed_instant() {
        // server says unlocked, no unlock instant of its own, one Sunday
        // game at 17:00Z
        let computed = Some(at(17, 0, 0));
        let before = RevealLock::decide(Some(false), None, computed, false, at(16, 59, 0));
        assert!(before.locked);
        assert_eq!(before.unlock_at, computed);

        let after = RevealLock::decide(Some(false), None, computed, false, at(17, 0, 1));
        assert!(!after.locked);
    }

    #[test]
    fn server_instant_wins_over_computed() {
        let server = Some(at(18, 0, 0));
        let computed = Some(at(17, 0, 0));
        let lock = RevealLock::decide(None, server, computed, false, at(17, 30, 0));
        assert!(lock.locked);
        assert_eq!(lock.unlock_at, server);
    }

    #[test]
    fn submission_lock_tracks_first_sunday() {
        let games = vec![crate::Game {
            kickoff: Some(at(17, 0, 0)),
            ..crate::Game::default()
        }];
        let lock = SubmissionLock::for_week(&games);
        assert!(!lock.is_locked(at(16, 0, 0)));
        assert!(lock.is_locked(at(17, 0, 0)));

        let no_sunday = SubmissionLock { deadline: None };
        assert!(!no_sunday.is_locked(at(23, 0, 0)));
    }
}
