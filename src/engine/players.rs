use crate::constants::DEFAULT_BEST_PLAYERS_LIMIT;
use crate::models::{Club, ClubId, Player, PlayerId, Position, SeasonId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Label shown instead of a club for players without one
pub const FREE_AGENT_LABEL: &str = "(free agent)";

/// Filters for the best-players view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestPlayersQuery {
    /// Only players of clubs in this season; free agents are dropped
    pub season_id: Option<SeasonId>,
    pub position: Option<Position>,
    pub limit: usize,
}

impl Default for BestPlayersQuery {
    fn default() -> Self {
        Self {
            season_id: None,
            position: None,
            limit: DEFAULT_BEST_PLAYERS_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedPlayer {
    pub rank: usize,
    pub id: PlayerId,
    pub name: String,
    pub age: u8,
    pub position: Position,
    pub club: String,
    /// Overall score truncated to an integer
    pub overall: u32,
}

/// Ranks players by overall score, best first, ties by name then id.
pub fn best_players(players: &[Player], clubs: &[Club], query: &BestPlayersQuery) -> Vec<RankedPlayer> {
    let clubs_by_id: HashMap<ClubId, &Club> = clubs.iter().map(|c| (c.id, c)).collect();

    let mut candidates: Vec<(&Player, Option<&Club>)> = players
        .iter()
        .filter(|p| query.position.is_none_or(|pos| p.position == pos))
        .map(|p| (p, p.club_id.and_then(|id| clubs_by_id.get(&id).copied())))
        .filter(|(_, club)| match query.season_id {
            Some(season_id) => club.is_some_and(|c| c.season_id == season_id),
            None => true,
        })
        .collect();

    candidates.sort_by(|(a, _), (b, _)| {
        b.overall()
            .total_cmp(&a.overall())
            .then_with(|| a.name.cmp(&b.name))
            .then(a.id.cmp(&b.id))
    });

    candidates
        .into_iter()
        .take(query.limit)
        .enumerate()
        .map(|(index, (player, club))| RankedPlayer {
            rank: index + 1,
            id: player.id,
            name: player.name.clone(),
            age: player.age,
            position: player.position,
            club: club.map_or_else(|| FREE_AGENT_LABEL.to_string(), |c| c.name.clone()),
            overall: player.overall().trunc() as u32,
        })
        .collect()
}
