use serde::{Deserialize, Serialize};

use super::{ClubId, LeagueId, SeasonId, StadiumId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub id: LeagueId,
    pub name: String,
    pub country: String,
}

/// A season of a league. `year` is a free label such as `2024/2025`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub id: SeasonId,
    pub league_id: LeagueId,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stadium {
    pub id: StadiumId,
    pub name: String,
    pub city: String,
    pub capacity: u32,
}

/// A club belongs to exactly one season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    pub id: ClubId,
    pub season_id: SeasonId,
    pub name: String,
    #[serde(default = "default_budget")]
    pub budget: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stadium_id: Option<StadiumId>,
}

fn default_budget() -> f64 {
    50_000_000.0
}

/// Club data before the store has assigned an identifier
#[derive(Debug, Clone, PartialEq)]
pub struct NewClub {
    pub season_id: SeasonId,
    pub name: String,
    pub budget: f64,
    pub stadium_id: Option<StadiumId>,
}

impl NewClub {
    pub fn new(season_id: SeasonId, name: impl Into<String>) -> Self {
        Self {
            season_id,
            name: name.into(),
            budget: default_budget(),
            stadium_id: None,
        }
    }
}
