use crate::constants::rating::{
    FORWARD_ATTACK_WEIGHT, GOALKEEPER_DEFENSE_WEIGHT, LEAGUE_AVERAGE, MAX_RATING, MIN_RATING,
};
use crate::models::{Player, Position};
use serde::{Deserialize, Serialize};

/// Attack and defense strength of a club, both within [1, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RosterRating {
    pub attack: f64,
    pub defense: f64,
}

impl Default for RosterRating {
    fn default() -> Self {
        Self {
            attack: LEAGUE_AVERAGE,
            defense: LEAGUE_AVERAGE,
        }
    }
}

/// Derives attack and defense ratings from a roster.
///
/// Attack is the mean of (shot, pass) over midfielders and forwards, forwards
/// counting double. Defense is the mean of (pace, defend) over defenders and
/// goalkeepers, goalkeepers counting double. When a roster has nobody in the
/// relevant positions the unweighted mean over the whole roster is used, and an
/// empty roster rates at the league average.
pub fn rate_roster(roster: &[Player]) -> RosterRating {
    if roster.is_empty() {
        return RosterRating::default();
    }

    let attack = weighted_mean(roster, Player::attacking_score, |position| match position {
        Position::Forward => FORWARD_ATTACK_WEIGHT,
        Position::Midfielder => 1.0,
        _ => 0.0,
    });
    let defense = weighted_mean(roster, Player::defensive_score, |position| match position {
        Position::Goalkeeper => GOALKEEPER_DEFENSE_WEIGHT,
        Position::Defender => 1.0,
        _ => 0.0,
    });

    RosterRating {
        attack: clamp_rating(attack),
        defense: clamp_rating(defense),
    }
}

fn weighted_mean<S, W>(roster: &[Player], score: S, weight: W) -> f64
where
    S: Fn(&Player) -> f64,
    W: Fn(Position) -> f64,
{
    let (total, weights) = roster.iter().fold((0.0, 0.0), |(total, weights), player| {
        let w = weight(player.position);
        (total + score(player) * w, weights + w)
    });

    if weights > 0.0 {
        total / weights
    } else {
        // Fallback: whole roster, unweighted
        roster.iter().map(&score).sum::<f64>() / roster.len() as f64
    }
}

fn clamp_rating(value: f64) -> f64 {
    value.clamp(MIN_RATING, MAX_RATING)
}
