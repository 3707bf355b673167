use crate::cli::{Args, ConfigArgs, SimulationOptions, parse_position};
use crossterm::{
    execute,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::SetTitle,
};
use footysim::config::Config;
use footysim::config::validation::parse_start_date;
use footysim::engine::BestPlayersQuery;
use footysim::error::AppError;
use footysim::models::{ClubId, FixtureId, Goal, LeagueId, SeasonId};
use footysim::render;
use footysim::services::{self, SimulationReport};
use footysim::store::{MemoryStore, Store};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::collections::HashMap;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

const TERMINAL_TITLE: &str = "FOOTYSIM";

/// Settings shared by every command after CLI flags, env and config are merged
#[derive(Debug, Clone)]
pub struct Context {
    pub data_path: PathBuf,
    pub seed: Option<u64>,
    pub config: Config,
}

impl Context {
    pub fn new(args: &Args, config: Config) -> Self {
        let data_path = args
            .data_file
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| config.data_file());
        Self {
            data_path,
            seed: args.seed.or(config.seed),
            config,
        }
    }

    /// Seed for this run. Without a configured seed a fresh one is drawn.
    pub fn base_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    async fn open_store(&self) -> Result<MemoryStore, AppError> {
        MemoryStore::load(&self.data_path).await
    }
}

fn print_heading(title: &str) -> Result<(), AppError> {
    execute!(
        stdout(),
        SetTitle(TERMINAL_TITLE),
        SetForegroundColor(Color::Cyan),
        SetAttribute(Attribute::Bold),
        Print(title),
        SetAttribute(Attribute::Reset),
        ResetColor,
        Print("\n")
    )?;
    Ok(())
}

fn print_notice(message: &str) -> Result<(), AppError> {
    execute!(
        stdout(),
        SetForegroundColor(Color::Yellow),
        Print(message),
        ResetColor,
        Print("\n")
    )?;
    Ok(())
}

fn club_names<S: Store + ?Sized>(
    store: &S,
    season_id: SeasonId,
) -> Result<HashMap<ClubId, String>, AppError> {
    Ok(store
        .clubs_for_season(season_id)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect())
}

fn goals_with_names<S: Store + ?Sized>(store: &S, goals: &[Goal]) -> Vec<(Goal, Option<String>)> {
    goals
        .iter()
        .map(|goal| {
            let name = goal
                .player_id
                .and_then(|id| store.get_player(id).ok())
                .map(|p| p.name);
            (goal.clone(), name)
        })
        .collect()
}

/// One line per simulated fixture plus what was skipped or reset.
pub fn format_report(
    report: &SimulationReport,
    names: &HashMap<ClubId, String>,
    scope: &str,
) -> String {
    let mut lines = Vec::new();
    if report.reset_matches > 0 {
        lines.push(format!("Reset {} existing results", report.reset_matches));
    }
    if report.simulated.is_empty() && report.already_played.is_empty() {
        lines.push(format!("Nothing to simulate: every fixture of {scope} has been played."));
        return lines.join("\n");
    }
    for outcome in &report.simulated {
        lines.push(format!(
            "Round {:>2}: {} {} – {} {}",
            outcome.fixture.round,
            render::club_label(names, outcome.fixture.home_club_id),
            outcome.played.home_goals,
            outcome.played.away_goals,
            render::club_label(names, outcome.fixture.away_club_id)
        ));
    }
    for fixture_id in &report.already_played {
        lines.push(format!("Fixture {fixture_id} was already played, skipped"));
    }
    lines.push(format!(
        "Simulated {} fixture{} of {scope}",
        report.simulated.len(),
        if report.simulated.len() == 1 { "" } else { "s" }
    ));
    lines.join("\n")
}

/// Handles `init-db`. An existing snapshot is left untouched.
pub async fn handle_init_db(ctx: &Context) -> Result<(), AppError> {
    if ctx.data_path.exists() {
        println!("Snapshot already exists at {}", ctx.data_path.display());
        return Ok(());
    }
    MemoryStore::new().save(&ctx.data_path).await?;
    println!("Created empty snapshot at {}", ctx.data_path.display());
    Ok(())
}

pub async fn handle_seed(ctx: &Context) -> Result<(), AppError> {
    let store = ctx.open_store().await?;
    let summary = footysim::seed::seed_minimal(&store)?;
    store.save(&ctx.data_path).await?;

    print_heading("Seed complete")?;
    println!(
        "League {} ({}), season {} (id {})",
        summary.league.name, summary.league.id, summary.season.year, summary.season.id
    );
    for club in &summary.clubs {
        println!("  {:>3}  {}", club.id, club.name);
    }
    println!("{} players created", summary.players);
    Ok(())
}

pub async fn handle_create_season(
    ctx: &Context,
    year: &str,
    league_id: LeagueId,
) -> Result<(), AppError> {
    let year = year.trim();
    if year.is_empty() {
        return Err(AppError::validation("season year cannot be empty"));
    }
    let store = ctx.open_store().await?;
    let season = store.create_season(league_id, year)?;
    store.save(&ctx.data_path).await?;
    println!(
        "Created season {} (id {}) in league {}",
        season.year, season.id, season.league_id
    );
    Ok(())
}

pub async fn handle_schedule(
    ctx: &Context,
    season_id: SeasonId,
    start_date: Option<&str>,
    force: bool,
    rounds: Option<u8>,
) -> Result<(), AppError> {
    let start = match start_date {
        Some(value) => parse_start_date(value)?,
        None => ctx.config.start_date()?,
    };
    let legs = rounds.unwrap_or(ctx.config.default_legs);

    let store = ctx.open_store().await?;
    let fixtures = services::generate_schedule(&store, season_id, start, legs, force)?;
    store.save(&ctx.data_path).await?;

    let last_round = fixtures.iter().map(|f| f.round).max().unwrap_or(0);
    println!(
        "Created {} fixtures over {} rounds for season {} starting {}",
        fixtures.len(),
        last_round,
        season_id,
        start
    );
    Ok(())
}

pub async fn handle_simulate(ctx: &Context, fixture_id: FixtureId) -> Result<(), AppError> {
    let store = ctx.open_store().await?;
    let mut rng = SmallRng::seed_from_u64(ctx.base_seed());
    let outcome = services::simulate_fixture(&store, fixture_id, &mut rng)?;
    store.save(&ctx.data_path).await?;

    let home = store.get_club(outcome.fixture.home_club_id)?;
    let away = store.get_club(outcome.fixture.away_club_id)?;
    let goals = goals_with_names(&store, &outcome.goals);
    print_heading(&format!(
        "Round {}, {}",
        outcome.fixture.round, outcome.fixture.date
    ))?;
    print!(
        "{}",
        render::format_match_result(&home.name, &away.name, &outcome.played, &goals)
    );
    Ok(())
}

/// Handles `simulate-season` and `simulate-round`
pub async fn handle_simulate_batch(
    ctx: &Context,
    season_id: SeasonId,
    round: Option<u32>,
    options: &SimulationOptions,
) -> Result<(), AppError> {
    let store = Arc::new(ctx.open_store().await?);
    let base_seed = ctx.base_seed();
    debug!(
        "Batch simulation: season_id={}, round={:?}, workers={}, seed={}",
        season_id, round, options.workers, base_seed
    );

    let report = if options.workers > 1 {
        services::simulate_concurrently(
            Arc::clone(&store),
            season_id,
            round,
            options.reset,
            base_seed,
            options.workers,
        )
        .await?
    } else {
        let mut rng = SmallRng::seed_from_u64(base_seed);
        match round {
            Some(round) => {
                services::simulate_round(&*store, season_id, round, options.reset, &mut rng)?
            }
            None => services::simulate_season(&*store, season_id, options.reset, &mut rng)?,
        }
    };

    if report.reset_matches > 0 || !report.simulated.is_empty() {
        store.save(&ctx.data_path).await?;
    }

    let scope = match round {
        Some(round) => format!("season {season_id} round {round}"),
        None => format!("season {season_id}"),
    };
    let text = format_report(&report, &club_names(&*store, season_id)?, &scope);
    if report.simulated.is_empty() && report.already_played.is_empty() {
        print_notice(&text)?;
    } else {
        println!("{text}");
    }
    Ok(())
}

pub async fn handle_table(ctx: &Context, season_id: SeasonId) -> Result<(), AppError> {
    let store = ctx.open_store().await?;
    let season = store.get_season(season_id)?;
    let table = services::compute_standings(&store, season_id)?;
    print_heading(&format!("League table, season {}", season.year))?;
    print!("{}", render::format_table(&table));
    Ok(())
}

pub async fn handle_fixtures(
    ctx: &Context,
    season_id: SeasonId,
    round: Option<u32>,
) -> Result<(), AppError> {
    let store = ctx.open_store().await?;
    let season = store.get_season(season_id)?;
    let fixtures = store.fixtures_for_season(season_id, round)?;
    if fixtures.is_empty() {
        print_notice(&format!(
            "No fixtures scheduled for season {}. Run `footysim schedule {}` first.",
            season.year, season_id
        ))?;
        return Ok(());
    }

    let mut rows = Vec::with_capacity(fixtures.len());
    for fixture in fixtures {
        let played = store.match_for_fixture(fixture.id)?;
        rows.push((fixture, played));
    }
    print_heading(&format!("Fixtures, season {}", season.year))?;
    print!(
        "{}",
        render::format_fixtures(&rows, &club_names(&store, season_id)?)
    );
    Ok(())
}

pub async fn handle_top_scorers(
    ctx: &Context,
    season_id: SeasonId,
    limit: usize,
) -> Result<(), AppError> {
    let store = ctx.open_store().await?;
    let season = store.get_season(season_id)?;
    let entries = services::compute_top_scorers(&store, season_id, Some(limit))?;
    if entries.is_empty() {
        print_notice(&format!("No goals recorded yet in season {}", season.year))?;
        return Ok(());
    }
    print!("{}", render::format_top_scorers(&entries, &season.year));
    Ok(())
}

pub async fn handle_best_players(
    ctx: &Context,
    season: Option<SeasonId>,
    position: Option<&str>,
    limit: usize,
    json: bool,
) -> Result<(), AppError> {
    let query = BestPlayersQuery {
        season_id: season,
        position: parse_position(position)?,
        limit,
    };
    let store = ctx.open_store().await?;
    let ranked = services::best_players(&store, &query)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
        return Ok(());
    }
    if ranked.is_empty() {
        print_notice("No players match the filters")?;
        return Ok(());
    }
    print!("{}", render::format_best_players(&ranked));
    Ok(())
}

pub async fn handle_rate(ctx: &Context, club_id: ClubId) -> Result<(), AppError> {
    let store = ctx.open_store().await?;
    let (club, rating) = services::rate_club(&store, club_id)?;
    print!("{}", render::format_rating(&club, &rating));
    Ok(())
}

/// Handles `config`. Without update flags the current settings are listed.
///
/// Updates start from the file on disk, not the env-overridden values, so
/// `FOOTYSIM_*` variables never get persisted by accident.
pub async fn handle_config_command(args: &ConfigArgs) -> Result<(), AppError> {
    if args.list || !args.has_updates() {
        print_heading("footysim configuration")?;
        return Config::display().await;
    }

    let config_path = Config::get_config_path();
    let mut config = if Path::new(&config_path).exists() {
        Config::load_from_path(&config_path).await?
    } else {
        Config::default()
    };

    if let Some(new_data_path) = &args.new_data_file_path {
        config.data_file_path = Some(new_data_path.clone());
    }

    if let Some(new_log_path) = &args.new_log_file_path {
        config.log_file_path = Some(new_log_path.clone());
    } else if args.clear_log_file_path {
        config.log_file_path = None;
        println!("Custom log file path cleared. Using default location.");
    }

    if let Some(legs) = args.new_legs {
        config.default_legs = legs;
    }

    if let Some(seed) = args.new_seed {
        config.seed = Some(seed);
    } else if args.clear_seed {
        config.seed = None;
        println!("Fixed seed cleared. Simulations are random again.");
    }

    config.validate()?;
    config.save().await?;
    info!("Config updated at {}", config_path);
    println!("Config updated successfully!");
    Ok(())
}
