use super::{GoalWithScorer, Store};
use crate::error::AppError;
use crate::models::{
    Club, ClubId, Fixture, FixtureDraft, FixtureId, Goal, GoalDraft, GoalId, League, LeagueId,
    Match, MatchId, NewClub, NewPlayer, Player, PlayerId, Season, SeasonId, Stadium, StadiumId,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Last id handed out per table
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct Sequences {
    league: i64,
    season: i64,
    stadium: i64,
    club: i64,
    player: i64,
    fixture: i64,
    #[serde(rename = "match")]
    match_: i64,
    goal: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct Tables {
    #[serde(default)]
    sequences: Sequences,
    #[serde(default)]
    leagues: BTreeMap<LeagueId, League>,
    #[serde(default)]
    seasons: BTreeMap<SeasonId, Season>,
    #[serde(default)]
    stadiums: BTreeMap<StadiumId, Stadium>,
    #[serde(default)]
    clubs: BTreeMap<ClubId, Club>,
    #[serde(default)]
    players: BTreeMap<PlayerId, Player>,
    #[serde(default)]
    fixtures: BTreeMap<FixtureId, Fixture>,
    #[serde(default)]
    matches: BTreeMap<MatchId, Match>,
    #[serde(default)]
    goals: BTreeMap<GoalId, Goal>,
}

impl Tables {
    fn match_of(&self, fixture_id: FixtureId) -> Option<&Match> {
        self.matches.values().find(|m| m.fixture_id == fixture_id)
    }

    fn require_season(&self, id: SeasonId) -> Result<&Season, AppError> {
        self.seasons.get(&id).ok_or_else(|| AppError::not_found("Season", id))
    }

    fn require_club(&self, id: ClubId) -> Result<&Club, AppError> {
        self.clubs.get(&id).ok_or_else(|| AppError::not_found("Club", id))
    }

    /// Removes matches of the given fixtures and their goals
    fn remove_results(&mut self, fixture_ids: &HashSet<FixtureId>) -> usize {
        let match_ids: HashSet<MatchId> = self
            .matches
            .values()
            .filter(|m| fixture_ids.contains(&m.fixture_id))
            .map(|m| m.id)
            .collect();
        self.goals.retain(|_, g| !match_ids.contains(&g.match_id));
        self.matches.retain(|id, _| !match_ids.contains(id));
        match_ids.len()
    }
}

/// In-memory store with an optional JSON snapshot on disk.
///
/// All tables live behind one `RwLock`; each trait call takes the lock once,
/// which makes every write atomic with respect to other callers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, AppError> {
        self.tables
            .read()
            .map_err(|_| AppError::storage_error("store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, AppError> {
        self.tables
            .write()
            .map_err(|_| AppError::storage_error("store lock poisoned"))
    }

    /// Builds a store from snapshot JSON. Blank input yields an empty store.
    pub fn from_json(content: &str) -> Result<Self, AppError> {
        if content.trim().is_empty() {
            return Ok(Self::new());
        }
        let tables: Tables = serde_json::from_str(content)?;
        Ok(Self {
            tables: RwLock::new(tables),
        })
    }

    pub fn to_json(&self) -> Result<String, AppError> {
        let tables = self.read()?;
        Ok(serde_json::to_string_pretty(&*tables)?)
    }

    /// Loads a snapshot file. A missing file is an empty store.
    pub async fn load(path: &Path) -> Result<Self, AppError> {
        match fs::read_to_string(path).await {
            Ok(content) => {
                let store = Self::from_json(&content)?;
                info!("Loaded league snapshot from {}", path.display());
                Ok(store)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No snapshot at {}, starting empty", path.display());
                Ok(Self::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Writes the snapshot, replacing the file only once the new content is
    /// fully on disk.
    pub async fn save(&self, path: &Path) -> Result<(), AppError> {
        let content = self.to_json()?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await?;
        }

        let tmp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&tmp_path, path).await?;

        debug!("Saved league snapshot to {} ({} bytes)", path.display(), content.len());
        Ok(())
    }
}

impl Store for MemoryStore {
    fn create_league(&self, name: &str, country: &str) -> Result<League, AppError> {
        let mut tables = self.write()?;
        let league = League {
            id: next_id(&mut tables.sequences.league),
            name: name.to_string(),
            country: country.to_string(),
        };
        tables.leagues.insert(league.id, league.clone());
        Ok(league)
    }

    fn get_league(&self, id: LeagueId) -> Result<League, AppError> {
        self.read()?
            .leagues
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found("League", id))
    }

    fn create_season(&self, league_id: LeagueId, year: &str) -> Result<Season, AppError> {
        let mut tables = self.write()?;
        if !tables.leagues.contains_key(&league_id) {
            return Err(AppError::not_found("League", league_id));
        }
        let season = Season {
            id: next_id(&mut tables.sequences.season),
            league_id,
            year: year.to_string(),
        };
        tables.seasons.insert(season.id, season.clone());
        Ok(season)
    }

    fn get_season(&self, id: SeasonId) -> Result<Season, AppError> {
        self.read()?.require_season(id).cloned()
    }

    fn create_stadium(&self, name: &str, city: &str, capacity: u32) -> Result<Stadium, AppError> {
        let mut tables = self.write()?;
        let stadium = Stadium {
            id: next_id(&mut tables.sequences.stadium),
            name: name.to_string(),
            city: city.to_string(),
            capacity,
        };
        tables.stadiums.insert(stadium.id, stadium.clone());
        Ok(stadium)
    }

    fn create_club(&self, club: NewClub) -> Result<Club, AppError> {
        let mut tables = self.write()?;
        tables.require_season(club.season_id)?;
        if let Some(stadium_id) = club.stadium_id
            && !tables.stadiums.contains_key(&stadium_id)
        {
            return Err(AppError::not_found("Stadium", stadium_id));
        }
        let club = Club {
            id: next_id(&mut tables.sequences.club),
            season_id: club.season_id,
            name: club.name,
            budget: club.budget,
            stadium_id: club.stadium_id,
        };
        tables.clubs.insert(club.id, club.clone());
        Ok(club)
    }

    fn get_club(&self, id: ClubId) -> Result<Club, AppError> {
        self.read()?.require_club(id).cloned()
    }

    fn clubs_for_season(&self, season_id: SeasonId) -> Result<Vec<Club>, AppError> {
        Ok(self
            .read()?
            .clubs
            .values()
            .filter(|c| c.season_id == season_id)
            .cloned()
            .collect())
    }

    fn all_clubs(&self) -> Result<Vec<Club>, AppError> {
        Ok(self.read()?.clubs.values().cloned().collect())
    }

    fn create_player(&self, player: NewPlayer) -> Result<Player, AppError> {
        let mut tables = self.write()?;
        if let Some(club_id) = player.club_id {
            tables.require_club(club_id)?;
        }
        let player = Player {
            id: next_id(&mut tables.sequences.player),
            name: player.name,
            age: player.age,
            position: player.position,
            attributes: player.attributes,
            club_id: player.club_id,
        };
        tables.players.insert(player.id, player.clone());
        Ok(player)
    }

    fn get_player(&self, id: PlayerId) -> Result<Player, AppError> {
        self.read()?
            .players
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Player", id))
    }

    fn players_for_club(&self, club_id: ClubId) -> Result<Vec<Player>, AppError> {
        Ok(self
            .read()?
            .players
            .values()
            .filter(|p| p.club_id == Some(club_id))
            .cloned()
            .collect())
    }

    fn all_players(&self) -> Result<Vec<Player>, AppError> {
        Ok(self.read()?.players.values().cloned().collect())
    }

    fn insert_fixtures(
        &self,
        season_id: SeasonId,
        drafts: &[FixtureDraft],
        clear_existing: bool,
    ) -> Result<Vec<Fixture>, AppError> {
        let mut tables = self.write()?;
        tables.require_season(season_id)?;

        let pairing_key = |round: u32, a: ClubId, b: ClubId| (round, a.min(b), a.max(b));

        // Everything is checked before the first mutation
        let existing: Vec<&Fixture> = if clear_existing {
            Vec::new()
        } else {
            tables
                .fixtures
                .values()
                .filter(|f| f.season_id == season_id)
                .collect()
        };
        let mut taken: BTreeSet<(u32, ClubId, ClubId)> = existing
            .iter()
            .map(|f| pairing_key(f.round, f.home_club_id, f.away_club_id))
            .collect();
        let mut ordered: BTreeSet<(ClubId, ClubId)> = existing
            .iter()
            .map(|f| (f.home_club_id, f.away_club_id))
            .collect();
        let mut busy: BTreeSet<(u32, ClubId)> = existing
            .iter()
            .flat_map(|f| [(f.round, f.home_club_id), (f.round, f.away_club_id)])
            .collect();

        for draft in drafts {
            if draft.season_id != season_id {
                return Err(AppError::validation(format!(
                    "fixture draft for season {} passed to season {season_id}",
                    draft.season_id
                )));
            }
            if draft.home_club_id == draft.away_club_id {
                return Err(AppError::validation(format!(
                    "club {} cannot play itself (season {season_id}, round {})",
                    draft.home_club_id, draft.round
                )));
            }
            for club_id in [draft.home_club_id, draft.away_club_id] {
                if tables.require_club(club_id)?.season_id != season_id {
                    return Err(AppError::validation(format!(
                        "club {club_id} is not part of season {season_id}"
                    )));
                }
            }
            if !taken.insert(pairing_key(draft.round, draft.home_club_id, draft.away_club_id)) {
                return Err(AppError::conflict(format!(
                    "season {season_id} already has a round {} fixture between clubs {} and {}",
                    draft.round, draft.home_club_id, draft.away_club_id
                )));
            }
            if !ordered.insert((draft.home_club_id, draft.away_club_id)) {
                return Err(AppError::conflict(format!(
                    "season {season_id} already has club {} at home to club {} (round {})",
                    draft.home_club_id, draft.away_club_id, draft.round
                )));
            }
            for club_id in [draft.home_club_id, draft.away_club_id] {
                if !busy.insert((draft.round, club_id)) {
                    return Err(AppError::conflict(format!(
                        "season {season_id} round {}: club {club_id} already plays in this round ({} vs {})",
                        draft.round, draft.home_club_id, draft.away_club_id
                    )));
                }
            }
        }

        if clear_existing {
            let removed: HashSet<FixtureId> = tables
                .fixtures
                .values()
                .filter(|f| f.season_id == season_id)
                .map(|f| f.id)
                .collect();
            let matches_removed = tables.remove_results(&removed);
            tables.fixtures.retain(|id, _| !removed.contains(id));
            debug!(
                "Cleared season {}: fixtures={}, matches={}",
                season_id,
                removed.len(),
                matches_removed
            );
        }

        let mut created = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let fixture = Fixture::from_draft(next_id(&mut tables.sequences.fixture), draft.clone());
            tables.fixtures.insert(fixture.id, fixture.clone());
            created.push(fixture);
        }
        Ok(created)
    }

    fn fixtures_for_season(
        &self,
        season_id: SeasonId,
        round: Option<u32>,
    ) -> Result<Vec<Fixture>, AppError> {
        let tables = self.read()?;
        let mut fixtures: Vec<Fixture> = tables
            .fixtures
            .values()
            .filter(|f| f.season_id == season_id && round.is_none_or(|r| f.round == r))
            .cloned()
            .collect();
        fixtures.sort_by_key(|f| (f.round, f.id));
        Ok(fixtures)
    }

    fn get_fixture(&self, id: FixtureId) -> Result<Fixture, AppError> {
        self.read()?
            .fixtures
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Fixture", id))
    }

    fn match_for_fixture(&self, fixture_id: FixtureId) -> Result<Option<Match>, AppError> {
        Ok(self.read()?.match_of(fixture_id).cloned())
    }

    fn create_match(
        &self,
        fixture_id: FixtureId,
        home_goals: u32,
        away_goals: u32,
        goals: &[GoalDraft],
    ) -> Result<(Match, Vec<Goal>), AppError> {
        let mut tables = self.write()?;
        if !tables.fixtures.contains_key(&fixture_id) {
            return Err(AppError::not_found("Fixture", fixture_id));
        }
        if let Some(existing) = tables.match_of(fixture_id) {
            return Err(AppError::already_played(fixture_id, existing.id));
        }

        let played = Match {
            id: next_id(&mut tables.sequences.match_),
            fixture_id,
            home_goals,
            away_goals,
        };
        tables.matches.insert(played.id, played.clone());

        let mut stored = Vec::with_capacity(goals.len());
        for draft in goals {
            let goal = Goal::from_draft(next_id(&mut tables.sequences.goal), played.id, draft.clone());
            tables.goals.insert(goal.id, goal.clone());
            stored.push(goal);
        }
        Ok((played, stored))
    }

    fn goals_for_match(&self, match_id: MatchId) -> Result<Vec<Goal>, AppError> {
        Ok(self
            .read()?
            .goals
            .values()
            .filter(|g| g.match_id == match_id)
            .cloned()
            .collect())
    }

    fn delete_results(&self, fixture_ids: &[FixtureId]) -> Result<usize, AppError> {
        let mut tables = self.write()?;
        let ids: HashSet<FixtureId> = fixture_ids.iter().copied().collect();
        Ok(tables.remove_results(&ids))
    }

    fn season_results(&self, season_id: SeasonId) -> Result<Vec<(Fixture, Match)>, AppError> {
        let tables = self.read()?;
        let mut results: Vec<(Fixture, Match)> = tables
            .matches
            .values()
            .filter_map(|m| {
                let fixture = tables.fixtures.get(&m.fixture_id)?;
                (fixture.season_id == season_id).then(|| (fixture.clone(), m.clone()))
            })
            .collect();
        results.sort_by_key(|(f, _)| (f.round, f.id));
        Ok(results)
    }

    fn season_goals(&self, season_id: SeasonId) -> Result<Vec<GoalWithScorer>, AppError> {
        let tables = self.read()?;
        let season_matches: HashSet<MatchId> = tables
            .matches
            .values()
            .filter(|m| {
                tables
                    .fixtures
                    .get(&m.fixture_id)
                    .is_some_and(|f| f.season_id == season_id)
            })
            .map(|m| m.id)
            .collect();

        Ok(tables
            .goals
            .values()
            .filter(|g| season_matches.contains(&g.match_id))
            .map(|g| GoalWithScorer {
                goal: g.clone(),
                scorer_name: g
                    .player_id
                    .and_then(|id| tables.players.get(&id))
                    .map(|p| p.name.clone()),
            })
            .collect())
    }
}
