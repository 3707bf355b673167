//! Storage seam for league data.
//!
//! Every method is a short synchronous request/response call. Implementations
//! are the arbiter of concurrent writers: `create_match` is a compare-and-create
//! and `insert_fixtures` is atomic per call, so callers never need their own
//! locks around simulation or schedule generation.

pub mod memory;

pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::{
    Club, ClubId, Fixture, FixtureDraft, FixtureId, Goal, GoalDraft, League, LeagueId, Match,
    MatchId, NewClub, NewPlayer, Player, PlayerId, Season, SeasonId, Stadium,
};

/// A goal together with the display name of the player involved
#[derive(Debug, Clone, PartialEq)]
pub struct GoalWithScorer {
    pub goal: Goal,
    pub scorer_name: Option<String>,
}

pub trait Store: Send + Sync {
    fn create_league(&self, name: &str, country: &str) -> Result<League, AppError>;
    fn get_league(&self, id: LeagueId) -> Result<League, AppError>;

    /// # Errors
    /// * `AppError::NotFound` - the league does not exist
    fn create_season(&self, league_id: LeagueId, year: &str) -> Result<Season, AppError>;
    fn get_season(&self, id: SeasonId) -> Result<Season, AppError>;

    fn create_stadium(&self, name: &str, city: &str, capacity: u32) -> Result<Stadium, AppError>;

    /// # Errors
    /// * `AppError::NotFound` - the season or the stadium does not exist
    fn create_club(&self, club: NewClub) -> Result<Club, AppError>;
    fn get_club(&self, id: ClubId) -> Result<Club, AppError>;
    /// Clubs of a season ordered by id
    fn clubs_for_season(&self, season_id: SeasonId) -> Result<Vec<Club>, AppError>;
    fn all_clubs(&self) -> Result<Vec<Club>, AppError>;

    /// # Errors
    /// * `AppError::NotFound` - the player's club does not exist
    fn create_player(&self, player: NewPlayer) -> Result<Player, AppError>;
    fn get_player(&self, id: PlayerId) -> Result<Player, AppError>;
    fn players_for_club(&self, club_id: ClubId) -> Result<Vec<Player>, AppError>;
    fn all_players(&self) -> Result<Vec<Player>, AppError>;

    /// Inserts a season's fixtures in one atomic step.
    ///
    /// With `clear_existing` every fixture of the season is removed first,
    /// together with its match and goals. A draft whose (round, home, away)
    /// triple already exists in the season, or appears twice in `drafts`,
    /// aborts the whole insert.
    ///
    /// # Errors
    /// * `AppError::NotFound` - the season or a referenced club does not exist
    /// * `AppError::Validation` - a draft belongs to another season
    /// * `AppError::Conflict` - a fixture triple collides; nothing is written
    fn insert_fixtures(
        &self,
        season_id: SeasonId,
        drafts: &[FixtureDraft],
        clear_existing: bool,
    ) -> Result<Vec<Fixture>, AppError>;

    /// Fixtures of a season ordered by round then id, optionally one round only
    fn fixtures_for_season(
        &self,
        season_id: SeasonId,
        round: Option<u32>,
    ) -> Result<Vec<Fixture>, AppError>;
    fn get_fixture(&self, id: FixtureId) -> Result<Fixture, AppError>;

    fn match_for_fixture(&self, fixture_id: FixtureId) -> Result<Option<Match>, AppError>;

    /// Records a fixture's result, goals included, or nothing at all.
    ///
    /// # Errors
    /// * `AppError::NotFound` - the fixture does not exist
    /// * `AppError::AlreadyPlayed` - a match already exists for the fixture
    fn create_match(
        &self,
        fixture_id: FixtureId,
        home_goals: u32,
        away_goals: u32,
        goals: &[GoalDraft],
    ) -> Result<(Match, Vec<Goal>), AppError>;

    /// Goals of a match in recorded order
    fn goals_for_match(&self, match_id: MatchId) -> Result<Vec<Goal>, AppError>;

    /// Deletes the matches and goals of the given fixtures, returning how many
    /// matches were removed. Fixtures without a match are ignored.
    fn delete_results(&self, fixture_ids: &[FixtureId]) -> Result<usize, AppError>;

    /// Played fixtures of a season with their match
    fn season_results(&self, season_id: SeasonId) -> Result<Vec<(Fixture, Match)>, AppError>;

    /// Every goal scored in a season's matches
    fn season_goals(&self, season_id: SeasonId) -> Result<Vec<GoalWithScorer>, AppError>;
}
