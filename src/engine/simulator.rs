//! Stochastic match simulation.
//!
//! Each side's goal count is drawn from a Poisson distribution whose mean is
//! the side's expected goals, derived from its attack rating against the
//! opponent's defense rating. Goals then get a minute and a scorer. All
//! randomness comes from the caller's RNG, so a seeded RNG reproduces a match
//! exactly.

use crate::constants::simulation::{
    BASE_EXPECTED_GOALS, HOME_ADVANTAGE, MAX_ADDED_TIME, MAX_EXPECTED_GOALS, MIN_EXPECTED_GOALS,
    OWN_GOAL_PROBABILITY, OWN_GOAL_WEIGHT_DF, OWN_GOAL_WEIGHT_FW, OWN_GOAL_WEIGHT_GK,
    OWN_GOAL_WEIGHT_MF, REGULATION_MINUTES, SCORER_WEIGHT_DF, SCORER_WEIGHT_FW, SCORER_WEIGHT_GK,
    SCORER_WEIGHT_MF, STOPPAGE_TIME_PROBABILITY,
};
use crate::engine::rating::{RosterRating, rate_roster};
use crate::models::{GoalDraft, Player, Position, Side};
use rand::Rng;

/// Outcome of one simulated match, not yet persisted
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedMatch {
    pub home_goals: u32,
    pub away_goals: u32,
    pub home_rating: RosterRating,
    pub away_rating: RosterRating,
    pub home_expected_goals: f64,
    pub away_expected_goals: f64,
    /// Ordered by minute, ties kept in generation order
    pub goals: Vec<GoalDraft>,
}

impl SimulatedMatch {
    /// Number of goals credited to a side, own goals by the opponent included
    pub fn credited(&self, side: Side) -> u32 {
        self.goals.iter().filter(|g| g.credited_to == side).count() as u32
    }
}

/// Expected goals of an attack against a defense.
///
/// Increases with `attack`, decreases with `defense`, and stays within
/// [`MIN_EXPECTED_GOALS`, `MAX_EXPECTED_GOALS`].
pub fn expected_goals(attack: f64, defense: f64) -> f64 {
    let ratio = attack / defense.max(f64::EPSILON);
    (BASE_EXPECTED_GOALS * ratio).clamp(MIN_EXPECTED_GOALS, MAX_EXPECTED_GOALS)
}

/// Draws a Poisson-distributed count with mean `lambda` (Knuth's method).
pub fn sample_poisson<R: Rng + ?Sized>(lambda: f64, rng: &mut R) -> u32 {
    if lambda <= 0.0 {
        return 0;
    }
    let limit = (-lambda).exp();
    let mut k = 0;
    let mut product = 1.0;
    loop {
        product *= rng.random::<f64>();
        if product <= limit {
            return k;
        }
        k += 1;
    }
}

/// Simulates a match between two rosters.
///
/// Home attack is boosted by [`HOME_ADVANTAGE`] before expected goals are
/// computed. Every goal has a small chance of being an own goal by a player of
/// the conceding side; it still counts for the attacking side.
pub fn simulate_match<R: Rng + ?Sized>(
    home_roster: &[Player],
    away_roster: &[Player],
    rng: &mut R,
) -> SimulatedMatch {
    let home_rating = rate_roster(home_roster);
    let away_rating = rate_roster(away_roster);

    let home_expected_goals = expected_goals(home_rating.attack * HOME_ADVANTAGE, away_rating.defense);
    let away_expected_goals = expected_goals(away_rating.attack, home_rating.defense);

    let home_goals = sample_poisson(home_expected_goals, rng);
    let away_goals = sample_poisson(away_expected_goals, rng);

    let mut goals = Vec::with_capacity((home_goals + away_goals) as usize);
    for _ in 0..home_goals {
        goals.push(draw_goal(Side::Home, home_roster, away_roster, rng));
    }
    for _ in 0..away_goals {
        goals.push(draw_goal(Side::Away, away_roster, home_roster, rng));
    }

    // Stable sort keeps generation order for goals in the same minute
    goals.sort_by_key(|g| (g.minute, g.added_time.unwrap_or(0)));

    SimulatedMatch {
        home_goals,
        away_goals,
        home_rating,
        away_rating,
        home_expected_goals,
        away_expected_goals,
        goals,
    }
}

fn draw_goal<R: Rng + ?Sized>(
    credited_to: Side,
    attacking: &[Player],
    conceding: &[Player],
    rng: &mut R,
) -> GoalDraft {
    let (minute, added_time) = draw_minute(rng);

    if rng.random_bool(OWN_GOAL_PROBABILITY)
        && let Some(culprit) = pick_weighted(conceding, own_goal_weight, rng)
    {
        return GoalDraft {
            player_id: Some(culprit.id),
            minute,
            added_time,
            is_own_goal: true,
            credited_to,
        };
    }

    GoalDraft {
        player_id: pick_weighted(attacking, scorer_weight, rng).map(|p| p.id),
        minute,
        added_time,
        is_own_goal: false,
        credited_to,
    }
}

fn draw_minute<R: Rng + ?Sized>(rng: &mut R) -> (u8, Option<u8>) {
    let minute = rng.random_range(1..=REGULATION_MINUTES);
    if minute == REGULATION_MINUTES && rng.random_bool(STOPPAGE_TIME_PROBABILITY) {
        (minute, Some(rng.random_range(1..=MAX_ADDED_TIME)))
    } else {
        (minute, None)
    }
}

fn scorer_weight(player: &Player) -> f64 {
    let base = match player.position {
        Position::Forward => SCORER_WEIGHT_FW,
        Position::Midfielder => SCORER_WEIGHT_MF,
        Position::Defender => SCORER_WEIGHT_DF,
        Position::Goalkeeper => SCORER_WEIGHT_GK,
    };
    base * (1.0 + f64::from(player.attributes.shot) / 100.0)
}

fn own_goal_weight(player: &Player) -> f64 {
    match player.position {
        Position::Defender => OWN_GOAL_WEIGHT_DF,
        Position::Midfielder => OWN_GOAL_WEIGHT_MF,
        Position::Goalkeeper => OWN_GOAL_WEIGHT_GK,
        Position::Forward => OWN_GOAL_WEIGHT_FW,
    }
}

fn pick_weighted<'a, R, W>(roster: &'a [Player], weight: W, rng: &mut R) -> Option<&'a Player>
where
    R: Rng + ?Sized,
    W: Fn(&Player) -> f64,
{
    if roster.is_empty() {
        return None;
    }
    let total: f64 = roster.iter().map(&weight).sum();
    if total <= 0.0 {
        return roster.get(rng.random_range(0..roster.len()));
    }

    let mut target = rng.random::<f64>() * total;
    for player in roster {
        let w = weight(player);
        if target < w {
            return Some(player);
        }
        target -= w;
    }
    roster.last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::TestDataBuilder;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_same_seed_same_match() {
        let home = TestDataBuilder::create_squad(100, 75);
        let away = TestDataBuilder::create_squad(200, 65);

        let a = simulate_match(&home, &away, &mut SmallRng::seed_from_u64(42));
        let b = simulate_match(&home, &away, &mut SmallRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_goal_list_matches_score_and_is_ordered() {
        let home = TestDataBuilder::create_squad(100, 70);
        let away = TestDataBuilder::create_squad(200, 70);

        for seed in 0..500 {
            let result = simulate_match(&home, &away, &mut SmallRng::seed_from_u64(seed));
            assert_eq!(result.goals.len() as u32, result.home_goals + result.away_goals);
            assert_eq!(result.credited(Side::Home), result.home_goals);
            assert_eq!(result.credited(Side::Away), result.away_goals);

            for pair in result.goals.windows(2) {
                let a = (pair[0].minute, pair[0].added_time.unwrap_or(0));
                let b = (pair[1].minute, pair[1].added_time.unwrap_or(0));
                assert!(a <= b, "goals out of order with seed {seed}");
            }
            for goal in &result.goals {
                assert!((1..=90).contains(&goal.minute));
                if goal.added_time.is_some() {
                    assert_eq!(goal.minute, 90);
                }
            }
        }
    }

    #[test]
    fn test_scorers_come_from_the_right_roster() {
        let home = TestDataBuilder::create_squad(100, 70);
        let away = TestDataBuilder::create_squad(200, 70);
        let home_ids: Vec<_> = home.iter().map(|p| p.id).collect();
        let away_ids: Vec<_> = away.iter().map(|p| p.id).collect();

        let mut own_goals = 0;
        for seed in 0..2000 {
            let result = simulate_match(&home, &away, &mut SmallRng::seed_from_u64(seed));
            for goal in &result.goals {
                let scorer = goal.player_id.unwrap();
                let scorer_is_home = home_ids.contains(&scorer);
                assert!(scorer_is_home || away_ids.contains(&scorer));
                match (goal.credited_to, goal.is_own_goal) {
                    (Side::Home, false) | (Side::Away, true) => assert!(scorer_is_home),
                    (Side::Away, false) | (Side::Home, true) => assert!(!scorer_is_home),
                }
                if goal.is_own_goal {
                    own_goals += 1;
                }
            }
        }
        assert!(own_goals > 0, "some own goals expected over 2000 matches");
    }

    #[test]
    fn test_own_goal_rate_is_small() {
        let home = TestDataBuilder::create_squad(100, 70);
        let away = TestDataBuilder::create_squad(200, 70);
        let mut rng = SmallRng::seed_from_u64(7);

        let (mut goals, mut own_goals) = (0u32, 0u32);
        for _ in 0..4000 {
            let result = simulate_match(&home, &away, &mut rng);
            goals += result.goals.len() as u32;
            own_goals += result.goals.iter().filter(|g| g.is_own_goal).count() as u32;
        }
        let rate = f64::from(own_goals) / f64::from(goals);
        assert!(rate > 0.01 && rate < 0.06, "own goal rate {rate}");
    }

    #[test]
    fn test_forwards_score_most() {
        let home = TestDataBuilder::create_squad(100, 70);
        let away = TestDataBuilder::create_squad(200, 70);
        let mut rng = SmallRng::seed_from_u64(11);

        let mut by_position = std::collections::HashMap::new();
        for _ in 0..2000 {
            let result = simulate_match(&home, &away, &mut rng);
            for goal in result.goals.iter().filter(|g| !g.is_own_goal) {
                let id = goal.player_id.unwrap();
                let scorer = home.iter().chain(away.iter()).find(|p| p.id == id).unwrap();
                *by_position.entry(scorer.position).or_insert(0u32) += 1;
            }
        }
        let fw = by_position.get(&Position::Forward).copied().unwrap_or(0);
        let mf = by_position.get(&Position::Midfielder).copied().unwrap_or(0);
        let df = by_position.get(&Position::Defender).copied().unwrap_or(0);
        let gk = by_position.get(&Position::Goalkeeper).copied().unwrap_or(0);
        assert!(fw > df && mf > df && df > gk, "fw={fw} mf={mf} df={df} gk={gk}");
    }

    #[test]
    fn test_home_advantage_and_strength_show_in_averages() {
        let even = TestDataBuilder::create_squad(100, 70);
        let also_even = TestDataBuilder::create_squad(200, 70);
        let mut rng = SmallRng::seed_from_u64(3);

        let (mut home_total, mut away_total) = (0u32, 0u32);
        for _ in 0..5000 {
            let result = simulate_match(&even, &also_even, &mut rng);
            home_total += result.home_goals;
            away_total += result.away_goals;
        }
        assert!(home_total > away_total, "home {home_total} away {away_total}");

        let strong = TestDataBuilder::create_squad(300, 90);
        let weak = TestDataBuilder::create_squad(400, 40);
        let (mut strong_total, mut weak_total) = (0u32, 0u32);
        for _ in 0..2000 {
            let result = simulate_match(&weak, &strong, &mut rng);
            weak_total += result.home_goals;
            strong_total += result.away_goals;
        }
        assert!(strong_total > weak_total * 2, "strong {strong_total} weak {weak_total}");
    }

    #[test]
    fn test_empty_rosters_still_simulate() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut saw_goal = false;
        for _ in 0..200 {
            let result = simulate_match(&[], &[], &mut rng);
            assert!((result.home_expected_goals - 1.35 * 1.10).abs() < 1e-9);
            for goal in &result.goals {
                saw_goal = true;
                assert_eq!(goal.player_id, None);
                assert!(!goal.is_own_goal);
            }
        }
        assert!(saw_goal);
    }

    #[test]
    fn test_expected_goals_is_monotonic_and_clamped() {
        assert!(expected_goals(60.0, 50.0) > expected_goals(50.0, 50.0));
        assert!(expected_goals(50.0, 60.0) < expected_goals(50.0, 50.0));
        assert!((expected_goals(50.0, 50.0) - 1.35).abs() < 1e-9);
        assert!((expected_goals(100.0, 1.0) - 4.0).abs() < 1e-9);
        assert!((expected_goals(1.0, 100.0) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_poisson_mean_is_close_to_lambda() {
        let mut rng = SmallRng::seed_from_u64(99);
        for lambda in [0.5, 1.35, 3.0] {
            let n = 20_000;
            let total: u64 = (0..n).map(|_| u64::from(sample_poisson(lambda, &mut rng))).sum();
            let mean = total as f64 / f64::from(n);
            assert!((mean - lambda).abs() < lambda * 0.05, "lambda {lambda} mean {mean}");
        }
        assert_eq!(sample_poisson(0.0, &mut rng), 0);
    }
}
