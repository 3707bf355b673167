use crate::engine::simulator::SimulatedMatch;
use crate::engine::standings::MatchScore;
use crate::error::AppError;
use crate::models::{
    Attributes, Club, ClubId, Fixture, NewClub, NewPlayer, Player, PlayerId, Position, SeasonId,
    Side,
};
use crate::seed::SEED_SQUAD;
use crate::store::Store;

/// Test utilities for creating mock data and testing scenarios
pub struct TestDataBuilder;

impl TestDataBuilder {
    /// Creates a free agent with the given attributes
    pub fn create_player(
        id: PlayerId,
        name: &str,
        position: Position,
        pace: u8,
        shot: u8,
        pass: u8,
        defend: u8,
    ) -> Player {
        Player {
            id,
            name: name.to_string(),
            age: 25,
            position,
            attributes: Attributes {
                pace,
                shot,
                pass,
                defend,
            },
            club_id: None,
        }
    }

    /// Creates a full squad shaped like a seeded club, every attribute equal to `quality`.
    /// Player ids are `id_base`, `id_base + 1`, ...
    pub fn create_squad(id_base: PlayerId, quality: u8) -> Vec<Player> {
        SEED_SQUAD
            .iter()
            .flat_map(|(position, count)| std::iter::repeat_n(*position, *count))
            .enumerate()
            .map(|(i, position)| {
                let id = id_base + i as PlayerId;
                Self::create_player(
                    id,
                    &format!("{} {id}", position.code()),
                    position,
                    quality,
                    quality,
                    quality,
                    quality,
                )
            })
            .collect()
    }

    /// Creates a club record without going through a store
    pub fn create_club(id: ClubId, season_id: SeasonId, name: &str) -> Club {
        Club {
            id,
            season_id,
            name: name.to_string(),
            budget: 50_000_000.0,
            stadium_id: None,
        }
    }

    /// Creates a final score for the standings aggregator
    pub fn create_score(home: ClubId, away: ClubId, home_goals: u32, away_goals: u32) -> MatchScore {
        MatchScore {
            home_club_id: home,
            away_club_id: away,
            home_goals,
            away_goals,
        }
    }

    /// Creates a league, one season and `club_count` clubs with full squads
    /// of the given quality in `store`. Returns the season id and the clubs.
    pub fn populate_season<S: Store + ?Sized>(
        store: &S,
        club_count: usize,
        quality: u8,
    ) -> Result<(SeasonId, Vec<Club>), AppError> {
        let league = store.create_league("Test League", "France")?;
        let season = store.create_season(league.id, "2024/2025")?;

        let mut clubs = Vec::with_capacity(club_count);
        for i in 0..club_count {
            let club = store.create_club(NewClub::new(season.id, format!("Club {}", i + 1)))?;
            for player in Self::create_squad(0, quality) {
                store.create_player(NewPlayer {
                    name: format!("{} {}", club.name, player.name),
                    age: player.age,
                    position: player.position,
                    attributes: player.attributes,
                    club_id: Some(club.id),
                })?;
            }
            clubs.push(club);
        }
        Ok((season.id, clubs))
    }
}

/// Property-based testing utilities
pub struct PropertyTesting;

impl PropertyTesting {
    /// Validates that a simulated match is internally consistent
    pub fn validate_simulated_match(result: &SimulatedMatch) -> Result<(), String> {
        if result.goals.len() as u32 != result.home_goals + result.away_goals {
            return Err(format!(
                "{} goal events for a {}-{} score",
                result.goals.len(),
                result.home_goals,
                result.away_goals
            ));
        }
        if result.credited(Side::Home) != result.home_goals {
            return Err("Home credit does not match home goals".to_string());
        }
        if result.credited(Side::Away) != result.away_goals {
            return Err("Away credit does not match away goals".to_string());
        }

        for (i, goal) in result.goals.iter().enumerate() {
            if !(1..=90).contains(&goal.minute) {
                return Err(format!("Goal {i} minute {} is outside 1-90", goal.minute));
            }
            if goal.added_time.is_some() && goal.minute != 90 {
                return Err(format!("Goal {i} has added time outside minute 90"));
            }
            if i > 0 {
                let prev = &result.goals[i - 1];
                if (prev.minute, prev.added_time.unwrap_or(0))
                    > (goal.minute, goal.added_time.unwrap_or(0))
                {
                    return Err(format!("Goal {i} is out of chronological order"));
                }
            }
        }

        Ok(())
    }

    /// Validates that no club appears twice in a round and nobody plays itself
    pub fn validate_fixture_rounds(fixtures: &[Fixture]) -> Result<(), String> {
        let mut seen = std::collections::HashSet::new();
        for fixture in fixtures {
            if fixture.home_club_id == fixture.away_club_id {
                return Err(format!("Club {} plays itself", fixture.home_club_id));
            }
            for club in [fixture.home_club_id, fixture.away_club_id] {
                if !seen.insert((fixture.round, club)) {
                    return Err(format!("Club {club} plays twice in round {}", fixture.round));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::simulator::simulate_match;
    use crate::store::MemoryStore;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_create_squad_shape() {
        let squad = TestDataBuilder::create_squad(100, 70);
        assert_eq!(squad.len(), 16);
        assert_eq!(squad[0].id, 100);
        assert_eq!(squad[15].id, 115);
        let forwards = squad.iter().filter(|p| p.position == Position::Forward).count();
        let keepers = squad.iter().filter(|p| p.position == Position::Goalkeeper).count();
        assert_eq!((forwards, keepers), (4, 2));
        assert!(squad.iter().all(|p| p.attributes.shot == 70));
    }

    #[test]
    fn test_populate_season() {
        let store = MemoryStore::new();
        let (season_id, clubs) = TestDataBuilder::populate_season(&store, 3, 60).unwrap();
        assert_eq!(clubs.len(), 3);
        assert_eq!(store.clubs_for_season(season_id).unwrap(), clubs);
        assert_eq!(store.players_for_club(clubs[1].id).unwrap().len(), 16);
    }

    #[test]
    fn test_validate_simulated_match_valid() {
        let home = TestDataBuilder::create_squad(1, 70);
        let away = TestDataBuilder::create_squad(100, 70);
        let result = simulate_match(&home, &away, &mut SmallRng::seed_from_u64(1));
        assert!(PropertyTesting::validate_simulated_match(&result).is_ok());
    }

    #[test]
    fn test_validate_simulated_match_rejects_inconsistent_score() {
        let home = TestDataBuilder::create_squad(1, 70);
        let away = TestDataBuilder::create_squad(100, 70);
        let mut result = simulate_match(&home, &away, &mut SmallRng::seed_from_u64(1));
        result.home_goals += 1;
        assert!(PropertyTesting::validate_simulated_match(&result).is_err());
    }

    #[test]
    fn test_validate_fixture_rounds_rejects_double_booking() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
        let fixture = |id, home, away| Fixture {
            id,
            season_id: 1,
            round: 1,
            date,
            home_club_id: home,
            away_club_id: away,
        };
        assert!(PropertyTesting::validate_fixture_rounds(&[fixture(1, 1, 2), fixture(2, 3, 4)]).is_ok());
        assert!(PropertyTesting::validate_fixture_rounds(&[fixture(1, 1, 2), fixture(2, 2, 3)]).is_err());
        assert!(PropertyTesting::validate_fixture_rounds(&[fixture(1, 5, 5)]).is_err());
    }
}
