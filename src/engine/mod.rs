//! Pure league algorithms. Nothing in here touches storage or the clock.

pub mod players;
pub mod rating;
pub mod schedule;
pub mod scorers;
pub mod simulator;
pub mod standings;

pub use players::{BestPlayersQuery, FREE_AGENT_LABEL, RankedPlayer, best_players};
pub use rating::{RosterRating, rate_roster};
pub use schedule::build_round_robin;
pub use scorers::{ScoredGoal, ScorerEntry, top_scorers};
pub use simulator::{SimulatedMatch, simulate_match};
pub use standings::{LeagueTable, MatchScore, StandingRow, compute_table};
