use crate::error::AppError;
use crate::models::{ClubId, SeasonId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Points for a win
pub const POINTS_FOR_WIN: u32 = 3;
/// Points for a draw
pub const POINTS_FOR_DRAW: u32 = 1;

/// Final score of a played fixture, as the aggregator needs it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchScore {
    pub home_club_id: ClubId,
    pub away_club_id: ClubId,
    pub home_goals: u32,
    pub away_goals: u32,
}

/// One club's season record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingRow {
    pub position: usize,
    pub club_id: ClubId,
    pub club_name: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub points: u32,
}

impl StandingRow {
    fn empty(club_id: ClubId, club_name: &str) -> Self {
        Self {
            position: 0,
            club_id,
            club_name: club_name.to_string(),
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
        }
    }

    fn record(&mut self, scored: u32, conceded: u32) {
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => {
                self.won += 1;
                self.points += POINTS_FOR_WIN;
            }
            std::cmp::Ordering::Equal => {
                self.drawn += 1;
                self.points += POINTS_FOR_DRAW;
            }
            std::cmp::Ordering::Less => self.lost += 1,
        }
    }
}

/// Ranked league table of a season
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueTable {
    pub season_id: SeasonId,
    pub rows: Vec<StandingRow>,
}

/// Folds match scores into a ranked table.
///
/// Every club in `clubs` gets a row, including clubs that have not played.
/// Ordering: points, goal difference and goals scored descending, then club
/// name ascending ignoring case, then club id. The result does not depend on
/// the order of `matches`.
///
/// # Errors
/// * `AppError::NotFound` - a match references a club that is not in `clubs`
pub fn compute_table(
    season_id: SeasonId,
    clubs: &[(ClubId, String)],
    matches: &[MatchScore],
) -> Result<LeagueTable, AppError> {
    let mut rows: HashMap<ClubId, StandingRow> = clubs
        .iter()
        .map(|(id, name)| (*id, StandingRow::empty(*id, name)))
        .collect();

    for score in matches {
        rows.get_mut(&score.home_club_id)
            .ok_or_else(|| AppError::not_found("Club", score.home_club_id))?
            .record(score.home_goals, score.away_goals);
        rows.get_mut(&score.away_club_id)
            .ok_or_else(|| AppError::not_found("Club", score.away_club_id))?
            .record(score.away_goals, score.home_goals);
    }

    let mut rows: Vec<StandingRow> = rows
        .into_values()
        .map(|mut row| {
            row.goal_difference = i64::from(row.goals_for) - i64::from(row.goals_against);
            row
        })
        .collect();

    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goal_difference.cmp(&a.goal_difference))
            .then(b.goals_for.cmp(&a.goals_for))
            .then_with(|| a.club_name.to_lowercase().cmp(&b.club_name.to_lowercase()))
            .then(a.club_id.cmp(&b.club_id))
    });
    for (index, row) in rows.iter_mut().enumerate() {
        row.position = index + 1;
    }

    Ok(LeagueTable { season_id, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clubs() -> Vec<(ClubId, String)> {
        vec![
            (1, "Alpha".to_string()),
            (2, "bravo".to_string()),
            (3, "Charlie".to_string()),
            (4, "Delta".to_string()),
        ]
    }

    fn score(home: ClubId, away: ClubId, hg: u32, ag: u32) -> MatchScore {
        MatchScore {
            home_club_id: home,
            away_club_id: away,
            home_goals: hg,
            away_goals: ag,
        }
    }

    fn row(table: &LeagueTable, club_id: ClubId) -> &StandingRow {
        table.rows.iter().find(|r| r.club_id == club_id).unwrap()
    }

    #[test]
    fn test_win_draw_loss_accounting() {
        let matches = vec![score(1, 2, 2, 1), score(3, 4, 0, 0), score(2, 3, 0, 3)];
        let table = compute_table(1, &clubs(), &matches).unwrap();

        let alpha = row(&table, 1);
        assert_eq!((alpha.played, alpha.won, alpha.drawn, alpha.lost), (1, 1, 0, 0));
        assert_eq!((alpha.goals_for, alpha.goals_against, alpha.points), (2, 1, 3));

        let bravo = row(&table, 2);
        assert_eq!((bravo.played, bravo.won, bravo.lost), (2, 0, 2));
        assert_eq!(bravo.goal_difference, -4);
        assert_eq!(bravo.points, 0);

        let charlie = row(&table, 3);
        assert_eq!((charlie.won, charlie.drawn, charlie.points), (1, 1, 4));
        assert_eq!(charlie.goal_difference, 3);

        let delta = row(&table, 4);
        assert_eq!((delta.drawn, delta.points), (1, 1));
    }

    #[test]
    fn test_ordering_points_then_difference_then_goals_for_then_name() {
        // Charlie 4 pts, Alpha 3 pts (+1), Delta 1 pt, Bravo 0
        let matches = vec![score(1, 2, 2, 1), score(3, 4, 0, 0), score(2, 3, 0, 3)];
        let table = compute_table(1, &clubs(), &matches).unwrap();
        let order: Vec<ClubId> = table.rows.iter().map(|r| r.club_id).collect();
        assert_eq!(order, vec![3, 1, 4, 2]);
        let positions: Vec<usize> = table.rows.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_goals_for_breaks_equal_difference() {
        // Alpha and Charlie both win by one, Charlie with more goals
        let matches = vec![score(1, 2, 1, 0), score(3, 4, 3, 2)];
        let table = compute_table(1, &clubs(), &matches).unwrap();
        assert_eq!(table.rows[0].club_id, 3);
        assert_eq!(table.rows[1].club_id, 1);
    }

    #[test]
    fn test_name_tiebreak_ignores_case() {
        // No matches: everything is level, name decides
        let clubs = vec![
            (10, "delta".to_string()),
            (11, "Bravo".to_string()),
            (12, "alpha".to_string()),
            (13, "Charlie".to_string()),
        ];
        let table = compute_table(1, &clubs, &[]).unwrap();
        let names: Vec<&str> = table.rows.iter().map(|r| r.club_name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "Bravo", "Charlie", "delta"]);
        assert!(table.rows.iter().all(|r| r.played == 0 && r.points == 0));
    }

    #[test]
    fn test_match_order_does_not_matter() {
        let mut matches = vec![
            score(1, 2, 2, 1),
            score(3, 4, 0, 0),
            score(2, 3, 0, 3),
            score(4, 1, 2, 2),
            score(1, 3, 1, 1),
            score(2, 4, 5, 0),
        ];
        let expected = compute_table(9, &clubs(), &matches).unwrap();
        for _ in 0..matches.len() {
            matches.rotate_left(1);
            assert_eq!(compute_table(9, &clubs(), &matches).unwrap(), expected);
        }
        matches.reverse();
        assert_eq!(compute_table(9, &clubs(), &matches).unwrap(), expected);
    }

    #[test]
    fn test_unknown_club_is_not_found() {
        let err = compute_table(1, &clubs(), &[score(1, 99, 1, 0)]).unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("99"));
    }
}
