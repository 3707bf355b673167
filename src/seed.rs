//! Minimal demo data: one league, one season, four clubs with full squads.

use crate::error::AppError;
use crate::models::{Attributes, Club, League, NewClub, NewPlayer, Position, Season};
use crate::store::Store;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use tracing::info;

/// Squad composition of every seeded club
pub const SEED_SQUAD: [(Position, usize); 4] = [
    (Position::Goalkeeper, 2),
    (Position::Defender, 5),
    (Position::Midfielder, 5),
    (Position::Forward, 4),
];

/// Seed for player generation; fixed so every run yields the same squads
const SEED_RNG_SEED: u64 = 2024;

const LEAGUE_NAME: &str = "Ligue Démo";
const LEAGUE_COUNTRY: &str = "France";
const SEASON_YEAR: &str = "2024/2025";

/// (club, stadium, city, capacity)
const CLUBS: [(&str, &str, &str, u32); 4] = [
    ("Olympique Lyonnais", "Groupama Stadium", "Lyon", 59_186),
    ("FC Nantes", "Stade de la Beaujoire", "Nantes", 35_322),
    ("RC Lens", "Stade Bollaert-Delelis", "Lens", 38_223),
    ("Stade Rennais", "Roazhon Park", "Rennes", 29_778),
];

const FIRST_NAMES: [&str; 16] = [
    "Antoine", "Hugo", "Lucas", "Théo", "Jules", "Nabil", "Yanis", "Karim", "Olivier", "Bastien",
    "Mathis", "Rayan", "Enzo", "Samuel", "Adrien", "Kylian",
];

const LAST_NAMES: [&str; 16] = [
    "Martin", "Bernard", "Dubois", "Lefèvre", "Moreau", "Laurent", "Girard", "Bonnet", "Mercier",
    "Fontaine", "Chevalier", "Robin", "Gauthier", "Perrin", "Morel", "Fournier",
];

/// What a seed run created
#[derive(Debug, Clone)]
pub struct SeedSummary {
    pub league: League,
    pub season: Season,
    pub clubs: Vec<Club>,
    pub players: usize,
}

/// Attribute ranges (pace, shot, pass, defend) per position
fn attribute_ranges(position: Position) -> [RangeInclusive<u8>; 4] {
    match position {
        Position::Goalkeeper => [40..=60, 10..=30, 40..=60, 65..=85],
        Position::Defender => [55..=75, 30..=50, 50..=70, 65..=85],
        Position::Midfielder => [60..=80, 50..=70, 65..=85, 45..=65],
        Position::Forward => [70..=90, 65..=85, 55..=75, 20..=40],
    }
}

fn generate_player<R: Rng + ?Sized>(
    rng: &mut R,
    position: Position,
    club: &Club,
) -> Result<NewPlayer, AppError> {
    let [pace, shot, pass, defend] = attribute_ranges(position).map(|range| rng.random_range(range));
    let first = FIRST_NAMES[rng.random_range(0..FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.random_range(0..LAST_NAMES.len())];
    Ok(NewPlayer {
        name: format!("{first} {last}"),
        age: rng.random_range(18..=34),
        position,
        attributes: Attributes::new(pace, shot, pass, defend)?,
        club_id: Some(club.id),
    })
}

/// Inserts the demo league. Running it again adds an independent copy.
pub fn seed_minimal<S: Store + ?Sized>(store: &S) -> Result<SeedSummary, AppError> {
    let mut rng = SmallRng::seed_from_u64(SEED_RNG_SEED);

    let league = store.create_league(LEAGUE_NAME, LEAGUE_COUNTRY)?;
    let season = store.create_season(league.id, SEASON_YEAR)?;

    let mut clubs = Vec::with_capacity(CLUBS.len());
    let mut players = 0;
    for (club_name, stadium_name, city, capacity) in CLUBS {
        let stadium = store.create_stadium(stadium_name, city, capacity)?;
        let club = store.create_club(NewClub {
            stadium_id: Some(stadium.id),
            ..NewClub::new(season.id, club_name)
        })?;

        for (position, count) in SEED_SQUAD {
            for _ in 0..count {
                store.create_player(generate_player(&mut rng, position, &club)?)?;
                players += 1;
            }
        }
        clubs.push(club);
    }

    info!(
        "Seeded league {} season {}: clubs={}, players={}",
        league.id,
        season.id,
        clubs.len(),
        players
    );
    Ok(SeedSummary {
        league,
        season,
        clubs,
        players,
    })
}
