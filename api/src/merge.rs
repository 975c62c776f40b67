//! Reconciling scored leaderboard rows with the public-picks overlay, and
//! the display orderings for the weekly board.
//!
//! The public endpoint may omit numeric user ids, so matching falls back
//! from id to normalized email to normalized name — a deliberate
//! lower-confidence mechanism, not a defect. Scored data is authoritative
//! and is never overwritten by the overlay.

use crate::Row;
use crate::normalize::name_key;
use std::cmp::Reverse;
use std::collections::HashMap;

/// Merge public pick rows into scored rows, one output row per scored row.
/// Pick fields are filled only where the scored row's own value is absent;
/// scored rows with no match pass through unchanged.
pub fn merge_rows(scored: Vec<Row>, public: &[Row]) -> Vec<Row> {
    let by_id: HashMap<i64, &Row> = public
        .iter()
        .filter_map(|p| p.user_id.map(|id| (id, p)))
        .collect();
    let by_email: HashMap<String, &Row> = public
        .iter()
        .filter_map(|p| p.email.as_deref().and_then(name_key).map(|k| (k, p)))
        .collect();
    let by_name: HashMap<String, &Row> = public
        .iter()
        .filter_map(|p| p.display_name.as_deref().and_then(name_key).map(|k| (k, p)))
        .collect();

    scored
        .into_iter()
        .map(|row| {
            let matched = row
                .user_id
                .and_then(|id| by_id.get(&id))
                .or_else(|| {
                    row.email
                        .as_deref()
                        .and_then(name_key)
                        .and_then(|k| by_email.get(&k))
                })
                .or_else(|| {
                    row.display_name
                        .as_deref()
                        .and_then(name_key)
                        .and_then(|k| by_name.get(&k))
                });
            match matched {
                Some(public_row) => overlay(row, public_row),
                None => row,
            }
        })
        .collect()
}

fn overlay(mut row: Row, public: &Row) -> Row {
    row.team = row.team.or_else(|| public.team.clone());
    row.gotw_prediction = row.gotw_prediction.or(public.gotw_prediction);
    row.potw_prediction = row.potw_prediction.or(public.potw_prediction);
    row.is_favorite = row.is_favorite.or(public.is_favorite);
    row.is_correct_pick = row.is_correct_pick.or(public.is_correct_pick);
    row.gotw_rank = row.gotw_rank.or(public.gotw_rank);
    row.potw_exact = row.potw_exact || public.potw_exact;
    row
}

/// Locked ordering: names only, alphabetical, case-insensitive. `sort_by`
/// is stable, so equal names keep their incoming order across renders.
pub fn sort_locked(rows: &mut [Row]) {
    let keys: Vec<String> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| r.label(i).to_lowercase())
        .collect();
    sort_by_keys(rows, keys, |a, b| a.cmp(b));
}

/// Unlocked ordering: weekly winners first, then total points descending
/// (absent counts as zero), then name ascending.
pub fn sort_unlocked(rows: &mut [Row]) {
    let keys: Vec<(bool, Reverse<i64>, String)> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            (
                !r.is_weekly_winner,
                Reverse(r.total_points.unwrap_or(0)),
                r.label(i).to_lowercase(),
            )
        })
        .collect();
    sort_by_keys(rows, keys, |a, b| a.cmp(b));
}

// Labels are positional ("Player {n}"), so keys are computed against the
// incoming order before sorting rows by them.
fn sort_by_keys<K, F>(rows: &mut [Row], keys: Vec<K>, cmp: F)
where
    F: Fn(&K, &K) -> std::cmp::Ordering,
{
    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&a, &b| cmp(&keys[a], &keys[b]).then(a.cmp(&b)));
    let reordered: Vec<Row> = order.iter().map(|&i| rows[i].clone()).collect();
    rows.clone_from_slice(&reordered);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(id: Option<i64>, name: &str, points: Option<i64>) -> Row {
        Row {
            user_id: id,
            display_name: Some(name.into()),
            total_points: points,
            ..Row::default()
        }
    }

    fn public_pick(id: Option<i64>, name: &str, team: &str) -> Row {
        Row {
            user_id: id,
            display_name: Some(name.into()),
            team: Some(team.into()),
            gotw_prediction: Some(40),
            ..Row::default()
        }
    }

    #[test]
    fn scored_values_are_never_overwritten() {
        let mut row = scored(Some(1), "Amy", Some(5));
        row.team = Some("Bears".into());
        row.gotw_prediction = Some(33);
        let merged = merge_rows(vec![row], &[public_pick(Some(1), "Amy", "Lions")]);
        assert_eq!(merged[0].team.as_deref(), Some("Bears"));
        assert_eq!(merged[0].gotw_prediction, Some(33));
    }

    #[test]
    fn absent_pick_fields_fill_from_the_overlay() {
        let merged = merge_rows(
            vec![scored(Some(1), "Amy", Some(5))],
            &[public_pick(Some(1), "Amy", "Lions")],
        );
        assert_eq!(merged[0].team.as_deref(), Some("Lions"));
        assert_eq!(merged[0].gotw_prediction, Some(40));
        // scoring side of the merged row is untouched
        assert_eq!(merged[0].total_points, Some(5));
    }

    #[test]
    fn id_match_wins_over_a_conflicting_name() {
        let public = [
            public_pick(Some(1), "Completely Different", "Lions"),
            public_pick(None, "Amy", "Packers"),
        ];
        let merged = merge_rows(vec![scored(Some(1), "Amy", None)], &public);
        assert_eq!(merged[0].team.as_deref(), Some("Lions"));
    }

    #[test]
    fn email_match_is_tried_before_name() {
        let mut by_email = public_pick(None, "Someone Else", "Lions");
        by_email.email = Some("AMY@Example.com ".into());
        let by_name = public_pick(None, "Amy", "Packers");

        let mut row = scored(None, "Amy", None);
        row.email = Some(" amy@example.com".into());
        let merged = merge_rows(vec![row], &[by_email, by_name]);
        assert_eq!(merged[0].team.as_deref(), Some("Lions"));
    }

    #[test]
    fn name_match_is_case_insensitive_and_trimmed() {
        let merged = merge_rows(
            vec![scored(None, "  amy ", None)],
            &[public_pick(None, "Amy", "Lions")],
        );
        assert_eq!(merged[0].team.as_deref(), Some("Lions"));
    }

    #[test]
    fn unmatched_scored_rows_pass_through() {
        let merged = merge_rows(
            vec![scored(Some(9), "Zed", Some(2))],
            &[public_pick(Some(1), "Amy", "Lions")],
        );
        assert_eq!(merged[0].team, None);
        assert_eq!(merged[0].total_points, Some(2));
    }

    #[test]
    fn unlocked_order_is_points_desc_with_name_tiebreak() {
        let mut rows = vec![
            scored(None, "Bob", Some(10)),
            scored(None, "Amy", Some(10)),
            scored(None, "Zed", Some(5)),
        ];
        sort_unlocked(&mut rows);
        let names: Vec<_> = rows.iter().enumerate().map(|(i, r)| r.label(i)).collect();
        assert_eq!(names, ["Amy", "Bob", "Zed"]);
    }

    #[test]
    fn weekly_winner_leads_regardless_of_points() {
        let mut winner = scored(None, "Zed", Some(3));
        winner.is_weekly_winner = true;
        let mut rows = vec![scored(None, "Amy", Some(10)), winner];
        sort_unlocked(&mut rows);
        assert!(rows[0].is_weekly_winner);
    }

    #[test]
    fn absent_points_sort_as_zero() {
        let mut rows = vec![scored(None, "Amy", None), scored(None, "Bob", Some(1))];
        sort_unlocked(&mut rows);
        assert_eq!(rows[0].display_name.as_deref(), Some("Bob"));
    }

    #[test]
    fn extreme_point_totals_still_sort_last() {
        let mut rows = vec![
            scored(None, "Amy", Some(i64::MIN)),
            scored(None, "Bob", Some(0)),
            scored(None, "Cid", Some(i64::MAX)),
        ];
        sort_unlocked(&mut rows);
        let names: Vec<_> = rows.iter().enumerate().map(|(i, r)| r.label(i)).collect();
        assert_eq!(names, ["Cid", "Bob", "Amy"]);
    }

    #[test]
    fn locked_order_is_alphabetical_and_stable() {
        let mut rows = vec![
            scored(None, "zed", None),
            scored(Some(1), "Amy", None),
            scored(Some(2), "amy", None),
        ];
        sort_locked(&mut rows);
        assert_eq!(rows[0].user_id, Some(1));
        assert_eq!(rows[1].user_id, Some(2));
        assert_eq!(rows[2].display_name.as_deref(), Some("zed"));
    }
}
