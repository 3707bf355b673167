use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args as ClapArgs, Parser, Subcommand};
use footysim::models::{ClubId, FixtureId, LeagueId, Position, SeasonId};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Football league season simulator
///
/// Builds round-robin fixture calendars, simulates matches with goal scorers
/// and own goals, and prints league tables and scorer rankings. League data is
/// kept in a JSON snapshot file between runs.
///
/// Typical session:
/// - footysim seed
/// - footysim schedule 1
/// - footysim simulate-season 1
/// - footysim table 1
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Seed for the random number generator. Same seed, same results.
    /// Overrides the seed from config and FOOTYSIM_SEED.
    #[arg(long, global = true, help_heading = "Simulation")]
    pub seed: Option<u64>,

    /// Use a specific league snapshot file instead of the configured one.
    #[arg(long = "data-file", global = true, help_heading = "Storage")]
    pub data_file: Option<String>,

    /// Also print logs to the terminal. Logs always go to the log file.
    #[arg(long, global = true, help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", global = true, help_heading = "Debug")]
    pub log_file: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty league snapshot if none exists
    #[command(name = "init-db", alias = "initdb")]
    InitDb,

    /// Insert a demo league with four clubs and their squads
    Seed,

    /// Create a season in an existing league
    #[command(name = "create-season")]
    CreateSeason {
        /// Season label, e.g. 2024/2025
        year: String,
        /// League the season belongs to
        #[arg(long = "league-id", short = 'l', default_value_t = 1)]
        league_id: LeagueId,
    },

    /// Generate the round-robin calendar of a season
    Schedule {
        season_id: SeasonId,
        /// First matchday in YYYY-MM-DD format (default from config: 2024-08-01)
        #[arg(long = "start-date")]
        start_date: Option<String>,
        /// Delete existing fixtures and results before generating
        #[arg(long)]
        force: bool,
        /// 1 = single round-robin, 2 = home and away
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
        rounds: Option<u8>,
    },

    /// Simulate one fixture and show the score and scorers
    Simulate { fixture_id: FixtureId },

    /// Simulate every unplayed fixture of a season
    #[command(name = "simulate-season")]
    SimulateSeason {
        season_id: SeasonId,
        #[command(flatten)]
        options: SimulationOptions,
    },

    /// Simulate the unplayed fixtures of one round
    #[command(name = "simulate-round")]
    SimulateRound {
        season_id: SeasonId,
        round: u32,
        #[command(flatten)]
        options: SimulationOptions,
    },

    /// Show the league table of a season
    Table { season_id: SeasonId },

    /// List the fixtures of a season with results
    Fixtures {
        season_id: SeasonId,
        /// Only show this round
        #[arg(long)]
        round: Option<u32>,
    },

    /// Show the top scorers of a season (own goals excluded)
    Topscorers {
        season_id: SeasonId,
        #[arg(long, default_value_t = footysim::constants::DEFAULT_TOP_SCORERS_LIMIT)]
        limit: usize,
    },

    /// Rank players by overall rating
    #[command(name = "best-players")]
    BestPlayers {
        /// Only players of clubs in this season
        #[arg(long)]
        season: Option<SeasonId>,
        /// GK, DF, MF or FW (case-insensitive)
        #[arg(long)]
        position: Option<String>,
        #[arg(long, default_value_t = footysim::constants::DEFAULT_BEST_PLAYERS_LIMIT)]
        limit: usize,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show a club's attack and defense ratings
    Rate { club_id: ClubId },

    /// Show or change the configuration
    Config(ConfigArgs),
}

#[derive(ClapArgs, Debug, Default)]
pub struct SimulationOptions {
    /// Delete existing results first and simulate everything again
    #[arg(long)]
    pub reset: bool,
    /// Simulate on this many parallel workers
    #[arg(long, default_value_t = 1)]
    pub workers: usize,
}

#[derive(ClapArgs, Debug, Default)]
pub struct ConfigArgs {
    /// List current configuration settings
    #[arg(long, short = 'l')]
    pub list: bool,

    /// Set a persistent snapshot file location
    #[arg(long = "set-data-file")]
    pub new_data_file_path: Option<String>,

    /// Set a persistent custom log file location
    #[arg(long = "set-log-file")]
    pub new_log_file_path: Option<String>,

    /// Clear the custom log file path and use the default location
    #[arg(long = "clear-log-file")]
    pub clear_log_file_path: bool,

    /// Set the default number of legs used by `schedule`
    #[arg(long = "set-legs", value_parser = clap::value_parser!(u8).range(1..=2))]
    pub new_legs: Option<u8>,

    /// Set a fixed RNG seed
    #[arg(long = "set-seed")]
    pub new_seed: Option<u64>,

    /// Clear the fixed RNG seed
    #[arg(long = "clear-seed")]
    pub clear_seed: bool,
}

impl ConfigArgs {
    /// True when any option changes the stored config
    pub fn has_updates(&self) -> bool {
        self.new_data_file_path.is_some()
            || self.new_log_file_path.is_some()
            || self.clear_log_file_path
            || self.new_legs.is_some()
            || self.new_seed.is_some()
            || self.clear_seed
    }
}

/// Parses an optional position filter
pub fn parse_position(value: Option<&str>) -> Result<Option<Position>, footysim::AppError> {
    value.map(str::parse::<Position>).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_schedule_arguments() {
        let args = Args::try_parse_from([
            "footysim",
            "schedule",
            "3",
            "--start-date",
            "2025-08-09",
            "--force",
            "--rounds",
            "1",
        ])
        .unwrap();
        match args.command {
            Command::Schedule {
                season_id,
                start_date,
                force,
                rounds,
            } => {
                assert_eq!(season_id, 3);
                assert_eq!(start_date.as_deref(), Some("2025-08-09"));
                assert!(force);
                assert_eq!(rounds, Some(1));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_rounds_must_be_one_or_two() {
        assert!(Args::try_parse_from(["footysim", "schedule", "1", "--rounds", "3"]).is_err());
    }

    #[test]
    fn test_global_seed_after_subcommand() {
        let args =
            Args::try_parse_from(["footysim", "simulate-season", "1", "--workers", "4", "--seed", "9"])
                .unwrap();
        assert_eq!(args.seed, Some(9));
        match args.command {
            Command::SimulateSeason { season_id, options } => {
                assert_eq!(season_id, 1);
                assert_eq!(options.workers, 4);
                assert!(!options.reset);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_best_players_defaults() {
        let args = Args::try_parse_from(["footysim", "best-players", "--position", "fw"]).unwrap();
        match args.command {
            Command::BestPlayers {
                season,
                position,
                limit,
                json,
            } => {
                assert_eq!(season, None);
                assert_eq!(limit, 20);
                assert!(!json);
                assert_eq!(parse_position(position.as_deref()).unwrap(), Some(Position::Forward));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(parse_position(Some("XX")).is_err());
    }

    #[test]
    fn test_config_updates_detected() {
        let args = Args::try_parse_from(["footysim", "config", "--set-seed", "5"]).unwrap();
        match args.command {
            Command::Config(config) => {
                assert!(config.has_updates());
                assert!(!config.list);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
