pub mod club;
pub mod fixture;
pub mod player;

pub type LeagueId = i64;
pub type SeasonId = i64;
pub type StadiumId = i64;
pub type ClubId = i64;
pub type PlayerId = i64;
pub type FixtureId = i64;
pub type MatchId = i64;
pub type GoalId = i64;

pub use club::{Club, League, NewClub, Season, Stadium};
pub use fixture::{Fixture, FixtureDraft, Goal, GoalDraft, Match, Side};
pub use player::{Attributes, NewPlayer, Player, Position};
