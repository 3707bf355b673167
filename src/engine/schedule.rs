//! Round-robin fixture scheduling using the circle method.
//!
//! Slot 0 stays fixed while the remaining slots rotate one position per round.
//! An odd number of clubs is padded with a bye placed in the fixed slot, which
//! keeps home and away counts exactly level for every club. With an even
//! number of clubs each club's home and away counts differ by at most one.

use crate::constants::calendar::ROUND_INTERVAL_DAYS;
use crate::error::AppError;
use crate::models::{ClubId, FixtureDraft, SeasonId};
use chrono::{Days, NaiveDate};
use std::collections::BTreeSet;
use tracing::debug;

/// Pairs of slot indices `(home, away)` for one round of a single round-robin
/// over `slot_count` slots.
///
/// Pure: the pairing is recomputed from the round index alone, so rounds can
/// be produced in any order. `slot_count` must be even and at least 2; rounds
/// beyond `slot_count - 2` wrap around.
pub fn round_pairings(slot_count: usize, round: usize) -> Vec<(usize, usize)> {
    if slot_count < 2 {
        return Vec::new();
    }
    let rotating = slot_count - 1;
    let shift = round % rotating;

    let slot_at = |position: usize| -> usize {
        if position == 0 {
            0
        } else {
            1 + (position - 1 + rotating - shift) % rotating
        }
    };

    (0..slot_count / 2)
        .map(|i| {
            let a = slot_at(i);
            let b = slot_at(slot_count - 1 - i);
            let a_at_home = if i == 0 { round % 2 == 0 } else { i % 2 == 1 };
            if a_at_home { (a, b) } else { (b, a) }
        })
        .collect()
}

/// Number of rounds a schedule over `club_count` clubs and `legs` legs has
pub fn round_count(club_count: usize, legs: u8) -> usize {
    let slots = club_count + club_count % 2;
    slots.saturating_sub(1) * usize::from(legs)
}

/// Builds the full fixture list for a season.
///
/// Clubs are de-duplicated and ordered by id before slots are assigned, so the
/// same club set always yields the same calendar. Round numbers start at 1 and
/// each round is played `ROUND_INTERVAL_DAYS` after the previous one. A second
/// leg repeats the first with home and away reversed, continuing the round
/// numbering and the weekly cadence.
///
/// # Errors
/// * `AppError::Validation` - fewer than two distinct clubs, or `legs` not 1 or 2
pub fn build_round_robin(
    clubs: &[ClubId],
    season_id: SeasonId,
    start_date: NaiveDate,
    legs: u8,
) -> Result<Vec<FixtureDraft>, AppError> {
    if !(1..=2).contains(&legs) {
        return Err(AppError::validation(format!(
            "legs must be 1 or 2, got {legs}"
        )));
    }

    let distinct: BTreeSet<ClubId> = clubs.iter().copied().collect();
    if distinct.len() < 2 {
        return Err(AppError::validation(format!(
            "season {season_id} needs at least 2 clubs to build a schedule, got {}",
            distinct.len()
        )));
    }

    // None marks the bye
    let mut slots: Vec<Option<ClubId>> = Vec::with_capacity(distinct.len() + 1);
    if distinct.len() % 2 == 1 {
        slots.push(None);
    }
    slots.extend(distinct.iter().copied().map(Some));

    let rounds_per_leg = slots.len() - 1;
    let mut fixtures = Vec::with_capacity(distinct.len() * (distinct.len() - 1) / 2 * usize::from(legs));

    for leg in 0..usize::from(legs) {
        for round in 0..rounds_per_leg {
            let round_index = leg * rounds_per_leg + round;
            let date = round_date(start_date, round_index)?;
            let round_number = u32::try_from(round_index + 1)
                .map_err(|_| AppError::validation("too many rounds"))?;

            for (home, away) in round_pairings(slots.len(), round) {
                let (Some(home_club), Some(away_club)) = (slots[home], slots[away]) else {
                    continue;
                };
                let (home_club_id, away_club_id) = if leg == 0 {
                    (home_club, away_club)
                } else {
                    (away_club, home_club)
                };
                fixtures.push(FixtureDraft {
                    season_id,
                    round: round_number,
                    date,
                    home_club_id,
                    away_club_id,
                });
            }
        }
    }

    debug!(
        "Built round-robin: season_id={}, clubs={}, legs={}, rounds={}, fixtures={}",
        season_id,
        distinct.len(),
        legs,
        rounds_per_leg * usize::from(legs),
        fixtures.len()
    );

    Ok(fixtures)
}

fn round_date(start_date: NaiveDate, round_index: usize) -> Result<NaiveDate, AppError> {
    let offset = (round_index as u64).saturating_mul(ROUND_INTERVAL_DAYS as u64);
    start_date
        .checked_add_days(Days::new(offset))
        .ok_or_else(|| AppError::datetime_parse_error(format!("round {round_index} date overflows")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn clubs(n: i64) -> Vec<ClubId> {
        (1..=n).map(|i| i * 10).collect()
    }

    #[test]
    fn test_round_pairings_cover_every_slot_once() {
        for slot_count in (2..=20).step_by(2) {
            for round in 0..slot_count - 1 {
                let pairs = round_pairings(slot_count, round);
                assert_eq!(pairs.len(), slot_count / 2);
                let mut seen = HashSet::new();
                for (a, b) in pairs {
                    assert_ne!(a, b);
                    assert!(seen.insert(a), "slot {a} twice in round {round}");
                    assert!(seen.insert(b), "slot {b} twice in round {round}");
                }
                assert_eq!(seen.len(), slot_count);
            }
        }
    }

    #[test]
    fn test_round_pairings_are_pure() {
        assert_eq!(round_pairings(8, 3), round_pairings(8, 3));
        assert_eq!(round_pairings(8, 0), round_pairings(8, 14));
    }

    #[test]
    fn test_four_clubs_single_leg() {
        let fixtures = build_round_robin(&[1, 2, 3, 4], 1, date(2024, 8, 1), 1).unwrap();
        assert_eq!(fixtures.len(), 6);

        let mut per_round: HashMap<u32, Vec<&FixtureDraft>> = HashMap::new();
        for f in &fixtures {
            per_round.entry(f.round).or_default().push(f);
        }
        assert_eq!(per_round.len(), 3);
        for (round, list) in &per_round {
            assert_eq!(list.len(), 2, "round {round} should have 2 fixtures");
            let mut seen = HashSet::new();
            for f in list {
                assert!(seen.insert(f.home_club_id));
                assert!(seen.insert(f.away_club_id));
            }
        }

        assert_eq!(per_round[&1][0].date, date(2024, 8, 1));
        assert_eq!(per_round[&2][0].date, date(2024, 8, 8));
        assert_eq!(per_round[&3][0].date, date(2024, 8, 15));
    }

    #[test]
    fn test_single_leg_counts_for_many_sizes() {
        for n in 2..=15 {
            let ids = clubs(n);
            let fixtures = build_round_robin(&ids, 7, date(2024, 8, 1), 1).unwrap();
            let n = n as usize;
            assert_eq!(fixtures.len(), n * (n - 1) / 2, "n={n}");

            let mut appearances: HashMap<ClubId, usize> = HashMap::new();
            let mut pairs = HashSet::new();
            let mut per_round: HashMap<u32, HashSet<ClubId>> = HashMap::new();
            for f in &fixtures {
                assert_ne!(f.home_club_id, f.away_club_id);
                *appearances.entry(f.home_club_id).or_default() += 1;
                *appearances.entry(f.away_club_id).or_default() += 1;
                let key = (f.home_club_id.min(f.away_club_id), f.home_club_id.max(f.away_club_id));
                assert!(pairs.insert(key), "pairing {key:?} repeated");
                let round = per_round.entry(f.round).or_default();
                assert!(round.insert(f.home_club_id));
                assert!(round.insert(f.away_club_id));
            }
            for id in &ids {
                assert_eq!(appearances[id], n - 1, "club {id} with n={n}");
            }
        }
    }

    #[test]
    fn test_double_leg_each_club_hosts_each_opponent_once() {
        for n in 2..=12 {
            let ids = clubs(n);
            let fixtures = build_round_robin(&ids, 1, date(2024, 8, 1), 2).unwrap();
            let n = n as usize;
            assert_eq!(fixtures.len(), n * (n - 1));

            let ordered: HashSet<(ClubId, ClubId)> = fixtures
                .iter()
                .map(|f| (f.home_club_id, f.away_club_id))
                .collect();
            assert_eq!(ordered.len(), fixtures.len());
            for a in &ids {
                for b in &ids {
                    if a != b {
                        assert!(ordered.contains(&(*a, *b)));
                    }
                }
            }
        }
    }

    #[test]
    fn test_double_leg_rounds_and_dates_continue() {
        let fixtures = build_round_robin(&[1, 2, 3, 4], 1, date(2024, 8, 1), 2).unwrap();
        let max_round = fixtures.iter().map(|f| f.round).max().unwrap();
        assert_eq!(max_round, 6);
        assert_eq!(round_count(4, 2), 6);

        let round_four: Vec<_> = fixtures.iter().filter(|f| f.round == 4).collect();
        assert!(round_four.iter().all(|f| f.date == date(2024, 8, 22)));

        // Second leg mirrors the first with venues swapped
        let first: Vec<_> = fixtures.iter().filter(|f| f.round == 1).collect();
        for f in first {
            assert!(round_four
                .iter()
                .any(|g| g.home_club_id == f.away_club_id && g.away_club_id == f.home_club_id));
        }
    }

    #[test]
    fn test_home_and_away_are_balanced() {
        for n in 2..=16 {
            let ids = clubs(n);
            let fixtures = build_round_robin(&ids, 1, date(2024, 8, 1), 1).unwrap();
            let mut home: HashMap<ClubId, i64> = HashMap::new();
            let mut away: HashMap<ClubId, i64> = HashMap::new();
            for f in &fixtures {
                *home.entry(f.home_club_id).or_default() += 1;
                *away.entry(f.away_club_id).or_default() += 1;
            }
            for id in &ids {
                let diff = home.get(id).copied().unwrap_or(0) - away.get(id).copied().unwrap_or(0);
                assert!(diff.abs() <= 1, "club {id} with n={n}: diff {diff}");
            }
        }
    }

    #[test]
    fn test_odd_club_count_has_byes_but_no_bye_fixtures() {
        let fixtures = build_round_robin(&[1, 2, 3, 4, 5], 1, date(2024, 8, 1), 1).unwrap();
        assert_eq!(fixtures.len(), 10);
        // 5 rounds of 2 fixtures, one club resting each round
        for round in 1..=5 {
            assert_eq!(fixtures.iter().filter(|f| f.round == round).count(), 2);
        }
    }

    #[test]
    fn test_duplicate_club_ids_are_ignored() {
        let fixtures = build_round_robin(&[3, 1, 3, 2, 1], 1, date(2024, 8, 1), 1).unwrap();
        assert_eq!(fixtures.len(), 3);
    }

    #[test]
    fn test_fewer_than_two_clubs_is_validation_error() {
        let err = build_round_robin(&[1], 4, date(2024, 8, 1), 1).unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert!(err.to_string().contains("season 4"));

        let err = build_round_robin(&[], 4, date(2024, 8, 1), 2).unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn test_invalid_leg_count_is_validation_error() {
        for legs in [0, 3] {
            let err = build_round_robin(&[1, 2], 1, date(2024, 8, 1), legs).unwrap_err();
            assert!(matches!(err, AppError::Validation { .. }));
        }
    }

    #[test]
    fn test_same_input_same_calendar() {
        let a = build_round_robin(&[4, 2, 9, 7], 1, date(2024, 8, 1), 2).unwrap();
        let b = build_round_robin(&[9, 7, 4, 2], 1, date(2024, 8, 1), 2).unwrap();
        assert_eq!(a, b);
    }
}
