// src/main.rs
mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Args, Command};
use commands::Context;
use footysim::config::Config;
use footysim::error::AppError;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Config subcommands must work even when the stored file is broken
    let config = match (&args.command, Config::load().await) {
        (_, Ok(config)) => config,
        (Command::Config(_), Err(_)) => Config::default(),
        (_, Err(e)) => return Err(e),
    };

    // Keep the guard in scope for the whole program so log lines get flushed
    let (log_file_path, _guard) = logging::setup_logging(&args, &config).await?;
    info!(
        "{} {} starting, logging to {}",
        footysim::NAME,
        footysim::VERSION,
        log_file_path
    );

    let ctx = Context::new(&args, config);
    match &args.command {
        Command::InitDb => commands::handle_init_db(&ctx).await,
        Command::Seed => commands::handle_seed(&ctx).await,
        Command::CreateSeason { year, league_id } => {
            commands::handle_create_season(&ctx, year, *league_id).await
        }
        Command::Schedule {
            season_id,
            start_date,
            force,
            rounds,
        } => {
            commands::handle_schedule(&ctx, *season_id, start_date.as_deref(), *force, *rounds)
                .await
        }
        Command::Simulate { fixture_id } => commands::handle_simulate(&ctx, *fixture_id).await,
        Command::SimulateSeason { season_id, options } => {
            commands::handle_simulate_batch(&ctx, *season_id, None, options).await
        }
        Command::SimulateRound {
            season_id,
            round,
            options,
        } => commands::handle_simulate_batch(&ctx, *season_id, Some(*round), options).await,
        Command::Table { season_id } => commands::handle_table(&ctx, *season_id).await,
        Command::Fixtures { season_id, round } => {
            commands::handle_fixtures(&ctx, *season_id, *round).await
        }
        Command::Topscorers { season_id, limit } => {
            commands::handle_top_scorers(&ctx, *season_id, *limit).await
        }
        Command::BestPlayers {
            season,
            position,
            limit,
            json,
        } => {
            commands::handle_best_players(&ctx, *season, position.as_deref(), *limit, *json).await
        }
        Command::Rate { club_id } => commands::handle_rate(&ctx, *club_id).await,
        Command::Config(config_args) => commands::handle_config_command(config_args).await,
    }
}
