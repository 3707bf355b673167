use crate::models::PlayerId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A goal as the leaderboard sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredGoal {
    /// None when nobody could be credited (empty roster)
    pub player_id: Option<PlayerId>,
    pub player_name: String,
    pub is_own_goal: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorerEntry {
    pub rank: usize,
    pub player_id: PlayerId,
    pub player_name: String,
    pub goals: u32,
}

/// Ranks players by goals scored.
///
/// Own goals never count. Ties on goals are ordered by name, then id, and do
/// not share a rank: ranks are 1..=k by output position.
pub fn top_scorers(goals: &[ScoredGoal], limit: usize) -> Vec<ScorerEntry> {
    let mut tally: HashMap<PlayerId, (&str, u32)> = HashMap::new();
    for goal in goals.iter().filter(|g| !g.is_own_goal) {
        let Some(player_id) = goal.player_id else {
            continue;
        };
        tally.entry(player_id).or_insert((goal.player_name.as_str(), 0)).1 += 1;
    }

    let mut ranked: Vec<(PlayerId, &str, u32)> = tally
        .into_iter()
        .map(|(id, (name, count))| (id, name, count))
        .collect();
    ranked.sort_by(|a, b| b.2.cmp(&a.2).then(a.1.cmp(b.1)).then(a.0.cmp(&b.0)));

    ranked
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, (player_id, name, goals))| ScorerEntry {
            rank: index + 1,
            player_id,
            player_name: name.to_string(),
            goals,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(player_id: PlayerId, name: &str) -> ScoredGoal {
        ScoredGoal {
            player_id: Some(player_id),
            player_name: name.to_string(),
            is_own_goal: false,
        }
    }

    fn own_goal(player_id: PlayerId, name: &str) -> ScoredGoal {
        ScoredGoal {
            is_own_goal: true,
            ..goal(player_id, name)
        }
    }

    #[test]
    fn test_counts_and_orders_by_goals() {
        let goals = vec![
            goal(1, "Mbappe"),
            goal(2, "Giroud"),
            goal(1, "Mbappe"),
            goal(3, "Dembele"),
            goal(1, "Mbappe"),
            goal(2, "Giroud"),
        ];
        let board = top_scorers(&goals, 10);
        assert_eq!(board.len(), 3);
        assert_eq!((board[0].player_id, board[0].goals, board[0].rank), (1, 3, 1));
        assert_eq!((board[1].player_id, board[1].goals, board[1].rank), (2, 2, 2));
        assert_eq!((board[2].player_id, board[2].goals, board[2].rank), (3, 1, 3));
    }

    #[test]
    fn test_own_goals_never_count() {
        let goals = vec![own_goal(5, "Unlucky"), own_goal(5, "Unlucky"), goal(6, "Clinical")];
        let board = top_scorers(&goals, 10);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].player_name, "Clinical");

        // A player with both kinds only gets the real ones
        let goals = vec![goal(7, "Mixed"), own_goal(7, "Mixed"), goal(7, "Mixed")];
        assert_eq!(top_scorers(&goals, 10)[0].goals, 2);
    }

    #[test]
    fn test_ties_break_by_name_and_ranks_stay_distinct() {
        let goals = vec![goal(1, "Zidane"), goal(2, "Anelka"), goal(3, "Henry")];
        let board = top_scorers(&goals, 10);
        let names: Vec<&str> = board.iter().map(|e| e.player_name.as_str()).collect();
        assert_eq!(names, vec!["Anelka", "Henry", "Zidane"]);
        let ranks: Vec<usize> = board.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_limit_truncates() {
        let goals: Vec<ScoredGoal> = (1..=15).map(|i| goal(i, &format!("P{i:02}"))).collect();
        assert_eq!(top_scorers(&goals, 10).len(), 10);
        assert!(top_scorers(&goals, 0).is_empty());
    }

    #[test]
    fn test_uncredited_goals_are_skipped() {
        let goals = vec![ScoredGoal {
            player_id: None,
            player_name: String::new(),
            is_own_goal: false,
        }];
        assert!(top_scorers(&goals, 10).is_empty());
    }
}
