//! Live countdown to the picks-form deadline.
//!
//! The state machine is pure and one-way: once `Locked`, later ticks never
//! reopen it, even if the deadline moves. The ticking itself lives in
//! `CountdownTimer`, whose handle aborts its task on drop so switching weeks
//! or leaving the form never leaves two timers running.

use crate::state::messages::UiEvent;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Countdown {
    /// No deadline known; the form stays open.
    #[default]
    Idle,
    Counting {
        remaining_secs: i64,
    },
    Locked,
}

impl Countdown {
    /// Advance against the wall clock. The single transition is
    /// Counting -> Locked when remaining hits zero.
    pub fn update(self, deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        if self == Countdown::Locked {
            return Countdown::Locked;
        }
        match deadline {
            None => Countdown::Idle,
            Some(d) => {
                let remaining = (d - now).num_seconds();
                if remaining <= 0 {
                    Countdown::Locked
                } else {
                    Countdown::Counting { remaining_secs: remaining }
                }
            }
        }
    }

    pub fn is_locked(&self) -> bool {
        *self == Countdown::Locked
    }

    /// Banner line for the picks form, or `None` while idle.
    pub fn banner(&self) -> Option<String> {
        match self {
            Countdown::Idle => None,
            Countdown::Counting { remaining_secs } => Some(format!(
                "Picks lock in {}",
                format_remaining(*remaining_secs)
            )),
            Countdown::Locked => Some("Picks are locked for this week.".to_owned()),
        }
    }
}

/// `"{h}h {m}m {s}s"`, floor-truncated, never negative.
pub fn format_remaining(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Owns the 1 Hz tick task for the picks form. At most one exists at a time;
/// the previous one is dropped (and its task aborted) before a new week's
/// timer starts.
pub struct CountdownTimer {
    handle: JoinHandle<()>,
}

impl CountdownTimer {
    pub fn start(events: mpsc::Sender<UiEvent>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            loop {
                interval.tick().await;
                if events.send(UiEvent::CountdownTick).await.is_err() {
                    break;
                }
            }
        });
        Self { handle }
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.handle.abort();
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
    fn counts_down_then_locks_exactly_once() {
        let deadline = Some(at(17, 0, 0));
        let counting = Countdown::default().update(deadline, at(16, 59, 58));
        assert_eq!(counting, Countdown::Counting { remaining_secs: 2 });

        let locked = counting.update(deadline, at(17, 0, 0));
        assert_eq!(locked, Countdown::Locked);

        // a later (even future) deadline never reopens a locked countdown
        let still_locked = locked.update(Some(at(23, 0, 0)), at(17, 0, 1));
        assert_eq!(still_locked, Countdown::Locked);
    }

    #[test]
    fn no_deadline_stays_idle() {
        let c = Countdown::default().update(None, at(12, 0, 0));
        assert_eq!(c, Countdown::Idle);
        assert!(c.banner().is_none());
    }

    #[test]
    fn remaining_formats_floor_truncated_and_never_negative() {
        assert_eq!(format_remaining(3_723), "1h 2m 3s");
        assert_eq!(format_remaining(59), "0h 0m 59s");
        assert_eq!(format_remaining(-5), "0h 0m 0s");
    }

    #[test]
    fn banner_reflects_each_phase() {
        let counting = Countdown::Counting { remaining_secs: 61 };
        assert_eq!(counting.banner().unwrap(), "Picks lock in 0h 1m 1s");
        assert!(Countdown::Locked.banner().unwrap().contains("locked"));
    }
}
