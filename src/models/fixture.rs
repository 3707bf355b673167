use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ClubId, FixtureId, GoalId, MatchId, PlayerId, SeasonId};

/// Which side of a fixture something refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

/// A fixture as produced by the scheduler, before it is stored
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixtureDraft {
    pub season_id: SeasonId,
    pub round: u32,
    pub date: NaiveDate,
    pub home_club_id: ClubId,
    pub away_club_id: ClubId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: FixtureId,
    pub season_id: SeasonId,
    pub round: u32,
    pub date: NaiveDate,
    pub home_club_id: ClubId,
    pub away_club_id: ClubId,
}

impl Fixture {
    pub fn from_draft(id: FixtureId, draft: FixtureDraft) -> Self {
        Self {
            id,
            season_id: draft.season_id,
            round: draft.round,
            date: draft.date,
            home_club_id: draft.home_club_id,
            away_club_id: draft.away_club_id,
        }
    }
}

/// The realized result of a fixture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub fixture_id: FixtureId,
    pub home_goals: u32,
    pub away_goals: u32,
}

/// A goal produced by the simulator, before it is stored.
///
/// `credited_to` is the side whose tally the goal counts for. For an own goal
/// the scorer plays for the other side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalDraft {
    /// `None` when the scorer's side fielded no players
    pub player_id: Option<PlayerId>,
    pub minute: u8,
    pub added_time: Option<u8>,
    pub is_own_goal: bool,
    pub credited_to: Side,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub match_id: MatchId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<PlayerId>,
    pub minute: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_time: Option<u8>,
    #[serde(default)]
    pub is_own_goal: bool,
    pub credited_to: Side,
}

impl Goal {
    pub fn from_draft(id: GoalId, match_id: MatchId, draft: GoalDraft) -> Self {
        Self {
            id,
            match_id,
            player_id: draft.player_id,
            minute: draft.minute,
            added_time: draft.added_time,
            is_own_goal: draft.is_own_goal,
            credited_to: draft.credited_to,
        }
    }

    /// Display form of the goal time: `67'` or `90+3'`
    pub fn time_display(&self) -> String {
        match self.added_time {
            Some(extra) => format!("{}+{}'", self.minute, extra),
            None => format!("{}'", self.minute),
        }
    }
}
