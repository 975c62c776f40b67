//! Client-side validation of a candidate pick against the one-and-done
//! rule and kickoff locks. The backend re-checks on submit; running the
//! same rules here gives the user a precise message before the round-trip.

use crate::{Game, SeasonPick};
use chrono::{DateTime, Utc};

/// Outcome of checking a candidate (team, week) against season history and
/// the week's schedule. Reasons are distinct so the form can message each
/// one precisely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickRuling {
    Allowed,
    /// Team already used in a different week this season.
    TeamReused { week: u32 },
    /// The game containing this team has already kicked off.
    GameLocked,
    /// Team does not appear in any of this week's games.
    UnknownTeam,
}

impl PickRuling {
    pub fn message(&self, team: &str) -> Option<String> {
        match self {
            PickRuling::Allowed => None,
            PickRuling::TeamReused { week } => Some(format!(
                "You already used {team} in week {week}. Choose a different team."
            )),
            PickRuling::GameLocked => {
                Some("That game has already kicked off. Choose another game.".to_owned())
            }
            PickRuling::UnknownTeam => {
                Some(format!("{team} does not play this week.")).filter(|_| !team.is_empty())
            }
        }
    }
}

/// Check a candidate pick. Re-submitting the same team for the same week is
/// editing, not reuse, and is allowed.
pub fn check_pick(
    history: &[SeasonPick],
    games: &[Game],
    team: &str,
    week: u32,
    now: DateTime<Utc>,
) -> PickRuling {
    if let Some(prior) = history.iter().find(|p| p.team == team && p.week != week) {
        return PickRuling::TeamReused { week: prior.week };
    }
    let Some(game) = games.iter().find(|g| g.has_team(team)) else {
        return PickRuling::UnknownTeam;
    };
    if game.kicked_off(now) {
        return PickRuling::GameLocked;
    }
    PickRuling::Allowed
}

/// Teams spent in other weeks this season; drives the "used" markers on the
/// form. The given week's own pick is excluded because editing it is allowed.
pub fn used_teams(history: &[SeasonPick], week: u32) -> Vec<String> {
    history
        .iter()
        .filter(|p| p.week != week)
        .map(|p| p.team.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 22, 12, 0, 0).unwrap()
    }

    fn pick(team: &str, week: u32) -> SeasonPick {
        SeasonPick { week, team: team.into(), ..SeasonPick::default() }
    }

    fn game(home: &str, away: &str, kickoff_offset_hours: i64) -> Game {
        Game {
            id: format!("{home}-{away}"),
            home_team: home.into(),
            away_team: away.into(),
            kickoff: Some(now() + chrono::Duration::hours(kickoff_offset_hours)),
            ..Game::default()
        }
    }

    #[test]
    fn reusing_a_team_in_another_week_is_rejected() {
        let history = [pick("Bears", 1)];
        let games = [game("Bears", "Lions", 5)];
        assert_eq!(
            check_pick(&history, &games, "Bears", 2, now()),
            PickRuling::TeamReused { week: 1 }
        );
    }

    #[test]
    fn editing_the_same_week_is_allowed() {
        let history = [pick("Bears", 1)];
        let games = [game("Bears", "Lions", 5)];
        assert_eq!(check_pick(&history, &games, "Bears", 1, now()), PickRuling::Allowed);
    }

    #[test]
    fn kicked_off_game_is_locked() {
        let history = [pick("Bears", 1)];
        let games = [game("Packers", "Vikings", -2)];
        assert_eq!(check_pick(&history, &games, "Packers", 2, now()), PickRuling::GameLocked);
    }

    #[test]
    fn game_with_no_kickoff_does_not_self_lock() {
        let mut g = game("Packers", "Vikings", 0);
        g.kickoff = None;
        assert_eq!(check_pick(&[], &[g], "Vikings", 2, now()), PickRuling::Allowed);
    }

    #[test]
    fn team_not_in_this_weeks_games() {
        let games = [game("Bears", "Lions", 5)];
        assert_eq!(check_pick(&[], &games, "Jets", 2, now()), PickRuling::UnknownTeam);
    }

    #[test]
    fn used_teams_exclude_the_week_being_edited() {
        let history = [pick("Bears", 1), pick("Lions", 2)];
        assert_eq!(used_teams(&history, 2), ["Bears"]);
        assert_eq!(used_teams(&history, 3), ["Bears", "Lions"]);
    }

    #[test]
    fn rulings_carry_distinct_messages() {
        assert!(PickRuling::Allowed.message("Bears").is_none());
        let reused = PickRuling::TeamReused { week: 3 }.message("Bears").unwrap();
        assert!(reused.contains("week 3"));
        assert_ne!(reused, PickRuling::GameLocked.message("Bears").unwrap());
    }
}
