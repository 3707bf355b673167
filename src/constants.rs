//! Application-wide constants and simulation tuning values
//!
//! The match model constants are tunable parameters, not measured ground truth.
//! Changing them changes score distributions but none of the structural
//! guarantees (non-negative scores, ordered goals, one match per fixture).

/// Default season start date used when neither CLI nor config provide one
pub const DEFAULT_START_DATE: &str = "2024-08-01";

/// Default number of legs (1 = single round-robin, 2 = home and away)
pub const DEFAULT_LEGS: u8 = 2;

/// Default number of rows shown by the top scorer table
pub const DEFAULT_TOP_SCORERS_LIMIT: usize = 10;

/// Default number of rows shown by the best players ranking
pub const DEFAULT_BEST_PLAYERS_LIMIT: usize = 20;

/// Name of the log file written to the log directory
pub const LOG_FILE_NAME: &str = "footysim.log";

/// Name of the league snapshot file written to the data directory
pub const DATA_FILE_NAME: &str = "league.json";

/// Roster rating constants
pub mod rating {
    /// Rating of a club that has no players at all
    pub const LEAGUE_AVERAGE: f64 = 50.0;

    /// Lower bound of attack/defense ratings
    pub const MIN_RATING: f64 = 1.0;

    /// Upper bound of attack/defense ratings
    pub const MAX_RATING: f64 = 100.0;

    /// Weight of forwards relative to midfielders in the attack rating
    pub const FORWARD_ATTACK_WEIGHT: f64 = 2.0;

    /// Weight of goalkeepers relative to defenders in the defense rating
    pub const GOALKEEPER_DEFENSE_WEIGHT: f64 = 2.0;
}

/// Match simulation constants
pub mod simulation {
    /// Multiplier applied to the home side's attack rating
    pub const HOME_ADVANTAGE: f64 = 1.10;

    /// Expected goals of a side whose attack equals the opponent's defense
    pub const BASE_EXPECTED_GOALS: f64 = 1.35;

    /// Lower clamp for expected goals
    pub const MIN_EXPECTED_GOALS: f64 = 0.2;

    /// Upper clamp for expected goals
    pub const MAX_EXPECTED_GOALS: f64 = 4.0;

    /// Probability that a goal is an own goal by the conceding side
    pub const OWN_GOAL_PROBABILITY: f64 = 0.03;

    /// Last minute of regulation time
    pub const REGULATION_MINUTES: u8 = 90;

    /// Probability that a goal drawn in the final minute falls in stoppage time
    pub const STOPPAGE_TIME_PROBABILITY: f64 = 0.10;

    /// Maximum added time in minutes
    pub const MAX_ADDED_TIME: u8 = 5;

    /// Scorer selection weights by position (attacking bias)
    pub const SCORER_WEIGHT_FW: f64 = 6.0;
    pub const SCORER_WEIGHT_MF: f64 = 3.0;
    pub const SCORER_WEIGHT_DF: f64 = 1.0;
    pub const SCORER_WEIGHT_GK: f64 = 0.1;

    /// Own goal culprit weights by position on the conceding side
    pub const OWN_GOAL_WEIGHT_DF: f64 = 4.0;
    pub const OWN_GOAL_WEIGHT_MF: f64 = 2.0;
    pub const OWN_GOAL_WEIGHT_GK: f64 = 1.0;
    pub const OWN_GOAL_WEIGHT_FW: f64 = 1.0;
}

/// Calendar constants
pub mod calendar {
    /// Days between consecutive rounds
    pub const ROUND_INTERVAL_DAYS: i64 = 7;
}

/// Environment variable names
pub mod env_vars {
    /// Environment variable for data file path override
    pub const DATA_FILE: &str = "FOOTYSIM_DATA_FILE";

    /// Environment variable for log file path override
    pub const LOG_FILE: &str = "FOOTYSIM_LOG_FILE";

    /// Environment variable for RNG seed override
    pub const SEED: &str = "FOOTYSIM_SEED";
}
