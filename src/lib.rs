//! Football league season simulator library
//!
//! This library builds round-robin fixture calendars, simulates matches from
//! club rosters, and derives league tables and scorer rankings from the
//! recorded results.
//!
//! # Examples
//!
//! ```rust,no_run
//! use footysim::error::AppError;
//! use footysim::store::MemoryStore;
//! use footysim::{render, seed, services};
//! use chrono::NaiveDate;
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//!
//! fn main() -> Result<(), AppError> {
//!     let store = MemoryStore::new();
//!     let demo = seed::seed_minimal(&store)?;
//!
//!     // Home and away calendar, one round per week
//!     let start = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
//!     services::generate_schedule(&store, demo.season.id, start, 2, false)?;
//!
//!     let mut rng = SmallRng::seed_from_u64(42);
//!     services::simulate_season(&store, demo.season.id, false, &mut rng)?;
//!
//!     let table = services::compute_standings(&store, demo.season.id)?;
//!     print!("{}", render::format_table(&table));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod models;
pub mod render;
pub mod seed;
pub mod services;
pub mod store;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use config::Config;
pub use engine::{
    BestPlayersQuery, LeagueTable, RankedPlayer, RosterRating, ScorerEntry, SimulatedMatch,
    StandingRow,
};
pub use error::AppError;
pub use services::{SimulationOutcome, SimulationReport};
pub use store::{MemoryStore, Store};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
