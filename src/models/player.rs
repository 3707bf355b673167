use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{ClubId, PlayerId};

/// Playing position. Parsed case-insensitively from `GK`, `DF`, `MF`, `FW`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "GK")]
    Goalkeeper,
    #[serde(rename = "DF")]
    Defender,
    #[serde(rename = "MF")]
    Midfielder,
    #[serde(rename = "FW")]
    Forward,
}

impl Position {
    pub fn code(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DF",
            Position::Midfielder => "MF",
            Position::Forward => "FW",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Position {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GK" => Ok(Position::Goalkeeper),
            "DF" => Ok(Position::Defender),
            "MF" => Ok(Position::Midfielder),
            "FW" => Ok(Position::Forward),
            other => Err(AppError::validation(format!(
                "invalid position '{other}', use GK/DF/MF/FW"
            ))),
        }
    }
}

/// The four 0-100 skill attributes of a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAttributes")]
pub struct Attributes {
    pub pace: u8,
    pub shot: u8,
    pub pass: u8,
    pub defend: u8,
}

impl Attributes {
    pub fn new(pace: u8, shot: u8, pass: u8, defend: u8) -> Result<Self, AppError> {
        for (name, value) in [("pace", pace), ("shot", shot), ("pass", pass), ("defend", defend)] {
            if value > 100 {
                return Err(AppError::validation(format!(
                    "attribute {name}={value} is outside 0-100"
                )));
            }
        }
        Ok(Self {
            pace,
            shot,
            pass,
            defend,
        })
    }
}

/// Snapshot form of [`Attributes`], range-checked on the way in
#[derive(Deserialize)]
struct RawAttributes {
    pace: u8,
    shot: u8,
    pass: u8,
    defend: u8,
}

impl TryFrom<RawAttributes> for Attributes {
    type Error = AppError;

    fn try_from(raw: RawAttributes) -> Result<Self, Self::Error> {
        Attributes::new(raw.pace, raw.shot, raw.pass, raw.defend)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub age: u8,
    pub position: Position,
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club_id: Option<ClubId>,
}

impl Player {
    /// Overall score: unweighted mean of pace, shot, pass and defend
    pub fn overall(&self) -> f64 {
        let a = &self.attributes;
        (f64::from(a.pace) + f64::from(a.shot) + f64::from(a.pass) + f64::from(a.defend)) / 4.0
    }

    /// Mean of the attacking attributes (shot, pass)
    pub fn attacking_score(&self) -> f64 {
        (f64::from(self.attributes.shot) + f64::from(self.attributes.pass)) / 2.0
    }

    /// Mean of the defensive attributes (pace, defend)
    pub fn defensive_score(&self) -> f64 {
        (f64::from(self.attributes.pace) + f64::from(self.attributes.defend)) / 2.0
    }
}

/// Player data before the store has assigned an identifier
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlayer {
    pub name: String,
    pub age: u8,
    pub position: Position,
    pub attributes: Attributes,
    pub club_id: Option<ClubId>,
}
