//! League operations wired to a [`Store`].
//!
//! These are the entry points the command layer calls. Each one loads what the
//! pure engine needs from the store, runs the engine, and writes results back.

use crate::constants::DEFAULT_TOP_SCORERS_LIMIT;
use crate::engine::players::{BestPlayersQuery, RankedPlayer, best_players as rank_players};
use crate::engine::rating::{RosterRating, rate_roster};
use crate::engine::schedule::build_round_robin;
use crate::engine::scorers::{ScoredGoal, ScorerEntry, top_scorers};
use crate::engine::simulator::simulate_match;
use crate::engine::standings::{LeagueTable, MatchScore, compute_table};
use crate::error::AppError;
use crate::models::{Club, ClubId, Fixture, FixtureId, Goal, Match, SeasonId};
use crate::store::Store;
use chrono::NaiveDate;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// A freshly simulated fixture
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    pub fixture: Fixture,
    pub played: Match,
    pub goals: Vec<Goal>,
}

/// Summary of a batch simulation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationReport {
    /// Matches removed by a reset before simulating
    pub reset_matches: usize,
    /// Newly recorded results, ordered by round then fixture id
    pub simulated: Vec<SimulationOutcome>,
    /// Fixtures another writer recorded first
    pub already_played: Vec<FixtureId>,
}

/// Generates and stores a season's fixture calendar.
///
/// # Errors
/// * `AppError::NotFound` - the season does not exist
/// * `AppError::Validation` - fewer than two clubs, or an invalid leg count
/// * `AppError::Conflict` - fixtures already exist and `clear_existing` is false
#[instrument(skip(store))]
pub fn generate_schedule<S: Store + ?Sized>(
    store: &S,
    season_id: SeasonId,
    start_date: NaiveDate,
    legs: u8,
    clear_existing: bool,
) -> Result<Vec<Fixture>, AppError> {
    store.get_season(season_id)?;
    let club_ids: Vec<ClubId> = store
        .clubs_for_season(season_id)?
        .iter()
        .map(|c| c.id)
        .collect();

    let drafts = build_round_robin(&club_ids, season_id, start_date, legs)?;
    let fixtures = store.insert_fixtures(season_id, &drafts, clear_existing)?;

    info!(
        "Generated schedule: season_id={}, clubs={}, legs={}, fixtures={}",
        season_id,
        club_ids.len(),
        legs,
        fixtures.len()
    );
    Ok(fixtures)
}

/// Simulates one fixture and records the result.
///
/// # Errors
/// * `AppError::NotFound` - the fixture or one of its clubs does not exist
/// * `AppError::AlreadyPlayed` - the fixture already has a result
#[instrument(skip(store, rng))]
pub fn simulate_fixture<S, R>(
    store: &S,
    fixture_id: FixtureId,
    rng: &mut R,
) -> Result<SimulationOutcome, AppError>
where
    S: Store + ?Sized,
    R: Rng + ?Sized,
{
    let fixture = store.get_fixture(fixture_id)?;
    if let Some(existing) = store.match_for_fixture(fixture_id)? {
        return Err(AppError::already_played(fixture_id, existing.id));
    }

    store.get_club(fixture.home_club_id)?;
    store.get_club(fixture.away_club_id)?;
    let home_roster = store.players_for_club(fixture.home_club_id)?;
    let away_roster = store.players_for_club(fixture.away_club_id)?;

    let result = simulate_match(&home_roster, &away_roster, rng);
    // A concurrent writer may still win between the check above and here
    let (played, goals) =
        store.create_match(fixture_id, result.home_goals, result.away_goals, &result.goals)?;

    info!(
        "Simulated fixture {}: {}-{} ({} goals, xG {:.2}-{:.2})",
        fixture_id,
        played.home_goals,
        played.away_goals,
        goals.len(),
        result.home_expected_goals,
        result.away_expected_goals
    );
    Ok(SimulationOutcome {
        fixture,
        played,
        goals,
    })
}

/// Fixtures of a season (or one round of it) that still need a result,
/// after optionally wiping existing results.
fn pending_fixtures<S: Store + ?Sized>(
    store: &S,
    season_id: SeasonId,
    round: Option<u32>,
    reset: bool,
) -> Result<(Vec<Fixture>, usize), AppError> {
    store.get_season(season_id)?;
    let fixtures = store.fixtures_for_season(season_id, round)?;

    let reset_matches = if reset {
        let ids: Vec<FixtureId> = fixtures.iter().map(|f| f.id).collect();
        let removed = store.delete_results(&ids)?;
        info!(
            "Reset results: season_id={}, round={:?}, matches_removed={}",
            season_id, round, removed
        );
        removed
    } else {
        0
    };

    let mut pending = Vec::with_capacity(fixtures.len());
    for fixture in fixtures {
        if store.match_for_fixture(fixture.id)?.is_none() {
            pending.push(fixture);
        }
    }
    debug!(
        "Pending fixtures: season_id={}, round={:?}, count={}",
        season_id,
        round,
        pending.len()
    );
    Ok((pending, reset_matches))
}

fn record_outcome(
    report: &mut SimulationReport,
    fixture_id: FixtureId,
    outcome: Result<SimulationOutcome, AppError>,
) -> Result<(), AppError> {
    match outcome {
        Ok(outcome) => report.simulated.push(outcome),
        Err(e) if e.is_already_played() => {
            warn!("Fixture {} was recorded by another writer: {}", fixture_id, e);
            report.already_played.push(fixture_id);
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

/// Simulates every unplayed fixture of a season in calendar order.
///
/// With `reset` the season's existing results are deleted first, so every
/// fixture is simulated again.
#[instrument(skip(store, rng))]
pub fn simulate_season<S, R>(
    store: &S,
    season_id: SeasonId,
    reset: bool,
    rng: &mut R,
) -> Result<SimulationReport, AppError>
where
    S: Store + ?Sized,
    R: Rng + ?Sized,
{
    simulate_pending(store, season_id, None, reset, rng)
}

/// Simulates the unplayed fixtures of one round.
#[instrument(skip(store, rng))]
pub fn simulate_round<S, R>(
    store: &S,
    season_id: SeasonId,
    round: u32,
    reset: bool,
    rng: &mut R,
) -> Result<SimulationReport, AppError>
where
    S: Store + ?Sized,
    R: Rng + ?Sized,
{
    simulate_pending(store, season_id, Some(round), reset, rng)
}

fn simulate_pending<S, R>(
    store: &S,
    season_id: SeasonId,
    round: Option<u32>,
    reset: bool,
    rng: &mut R,
) -> Result<SimulationReport, AppError>
where
    S: Store + ?Sized,
    R: Rng + ?Sized,
{
    let (pending, reset_matches) = pending_fixtures(store, season_id, round, reset)?;
    let mut report = SimulationReport {
        reset_matches,
        ..SimulationReport::default()
    };
    for fixture in pending {
        let outcome = simulate_fixture(store, fixture.id, rng);
        record_outcome(&mut report, fixture.id, outcome)?;
    }
    Ok(report)
}

/// Seed of the RNG used for one fixture in a concurrent run
pub fn fixture_seed(base_seed: u64, fixture_id: FixtureId) -> u64 {
    base_seed ^ (fixture_id as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Simulates pending fixtures on `workers` blocking tasks.
///
/// Each fixture gets its own RNG seeded from `base_seed` and its id, so the
/// results do not depend on how fixtures are spread over workers. The store's
/// compare-and-create decides races: a lost race lands in `already_played`.
#[instrument(skip(store))]
pub async fn simulate_concurrently<S: Store + 'static>(
    store: Arc<S>,
    season_id: SeasonId,
    round: Option<u32>,
    reset: bool,
    base_seed: u64,
    workers: usize,
) -> Result<SimulationReport, AppError> {
    let (pending, reset_matches) = pending_fixtures(&*store, season_id, round, reset)?;
    let workers = workers.max(1);
    let chunk_size = pending.len().div_ceil(workers).max(1);

    let mut handles = Vec::with_capacity(workers);
    for chunk in pending.chunks(chunk_size) {
        let store = Arc::clone(&store);
        let fixture_ids: Vec<FixtureId> = chunk.iter().map(|f| f.id).collect();
        handles.push(tokio::task::spawn_blocking(move || {
            fixture_ids
                .into_iter()
                .map(|fixture_id| {
                    let mut rng = SmallRng::seed_from_u64(fixture_seed(base_seed, fixture_id));
                    (fixture_id, simulate_fixture(&*store, fixture_id, &mut rng))
                })
                .collect::<Vec<_>>()
        }));
    }

    let mut report = SimulationReport {
        reset_matches,
        ..SimulationReport::default()
    };
    for handle in handles {
        let outcomes = handle
            .await
            .map_err(|e| AppError::storage_error(format!("simulation worker failed: {e}")))?;
        for (fixture_id, outcome) in outcomes {
            record_outcome(&mut report, fixture_id, outcome)?;
        }
    }
    report
        .simulated
        .sort_by_key(|o| (o.fixture.round, o.fixture.id));

    info!(
        "Concurrent simulation: season_id={}, workers={}, simulated={}, already_played={}",
        season_id,
        workers,
        report.simulated.len(),
        report.already_played.len()
    );
    Ok(report)
}

/// Deletes the results of a season, or of one round, keeping the fixtures.
#[instrument(skip(store))]
pub fn reset_results<S: Store + ?Sized>(
    store: &S,
    season_id: SeasonId,
    round: Option<u32>,
) -> Result<usize, AppError> {
    store.get_season(season_id)?;
    let ids: Vec<FixtureId> = store
        .fixtures_for_season(season_id, round)?
        .iter()
        .map(|f| f.id)
        .collect();
    let removed = store.delete_results(&ids)?;
    info!("Reset {} results in season {}", removed, season_id);
    Ok(removed)
}

/// League table of a season from every recorded result.
#[instrument(skip(store))]
pub fn compute_standings<S: Store + ?Sized>(
    store: &S,
    season_id: SeasonId,
) -> Result<LeagueTable, AppError> {
    store.get_season(season_id)?;
    let clubs: Vec<(ClubId, String)> = store
        .clubs_for_season(season_id)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let scores: Vec<MatchScore> = store
        .season_results(season_id)?
        .into_iter()
        .map(|(fixture, played)| MatchScore {
            home_club_id: fixture.home_club_id,
            away_club_id: fixture.away_club_id,
            home_goals: played.home_goals,
            away_goals: played.away_goals,
        })
        .collect();
    compute_table(season_id, &clubs, &scores)
}

/// Top scorers of a season, own goals excluded.
#[instrument(skip(store))]
pub fn compute_top_scorers<S: Store + ?Sized>(
    store: &S,
    season_id: SeasonId,
    limit: Option<usize>,
) -> Result<Vec<ScorerEntry>, AppError> {
    store.get_season(season_id)?;
    let goals: Vec<ScoredGoal> = store
        .season_goals(season_id)?
        .into_iter()
        .map(|g| ScoredGoal {
            player_id: g.goal.player_id,
            player_name: g.scorer_name.unwrap_or_default(),
            is_own_goal: g.goal.is_own_goal,
        })
        .collect();
    Ok(top_scorers(&goals, limit.unwrap_or(DEFAULT_TOP_SCORERS_LIMIT)))
}

/// Attack and defense ratings of a club's current roster.
pub fn rate_club<S: Store + ?Sized>(
    store: &S,
    club_id: ClubId,
) -> Result<(Club, RosterRating), AppError> {
    let club = store.get_club(club_id)?;
    let rating = rate_roster(&store.players_for_club(club_id)?);
    Ok((club, rating))
}

/// Best players across the store, optionally scoped to a season and position.
pub fn best_players<S: Store + ?Sized>(
    store: &S,
    query: &BestPlayersQuery,
) -> Result<Vec<RankedPlayer>, AppError> {
    if let Some(season_id) = query.season_id {
        store.get_season(season_id)?;
    }
    Ok(rank_players(&store.all_players()?, &store.all_clubs()?, query))
}
