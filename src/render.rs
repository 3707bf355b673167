//! Plain-text rendering of league views.
//!
//! Every function returns a `String` so the command layer decides where output
//! goes and tests can assert on exact text.

use crate::engine::players::RankedPlayer;
use crate::engine::rating::RosterRating;
use crate::engine::scorers::ScorerEntry;
use crate::engine::standings::LeagueTable;
use crate::models::{Club, ClubId, Fixture, Goal, Match, Side};
use std::collections::HashMap;

/// Display name of a club, falling back to its id
pub fn club_label(names: &HashMap<ClubId, String>, club_id: ClubId) -> String {
    names
        .get(&club_id)
        .cloned()
        .unwrap_or_else(|| format!("Club {club_id}"))
}

pub fn format_table(table: &LeagueTable) -> String {
    let header = format!(
        "{:>2}  {:<22} {:>2} {:>2} {:>2} {:>2}  {:>3} {:>3} {:>3}  {:>3}",
        "#", "Club", "P", "W", "D", "L", "GF", "GA", "GD", "PTS"
    );
    let mut out = format!("{header}\n{}\n", "-".repeat(header.len()));
    for row in &table.rows {
        out.push_str(&format!(
            "{:>2}  {:<22} {:>2} {:>2} {:>2} {:>2}  {:>3} {:>3} {:>3}  {:>3}\n",
            row.position,
            row.club_name,
            row.played,
            row.won,
            row.drawn,
            row.lost,
            row.goals_for,
            row.goals_against,
            row.goal_difference,
            row.points
        ));
    }
    out
}

/// Fixture list grouped by round, results shown where a match exists.
/// Expects fixtures already ordered by round.
pub fn format_fixtures(
    fixtures: &[(Fixture, Option<Match>)],
    names: &HashMap<ClubId, String>,
) -> String {
    let mut out = String::new();
    let mut current_round = None;
    for (fixture, played) in fixtures {
        if current_round != Some(fixture.round) {
            current_round = Some(fixture.round);
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("=== Round {} ===\n", fixture.round));
        }
        let home = club_label(names, fixture.home_club_id);
        let away = club_label(names, fixture.away_club_id);
        let line = match played {
            Some(m) => format!(
                "{} : {home} {}–{} {away}\n",
                fixture.date, m.home_goals, m.away_goals
            ),
            None => format!("{} : {home} vs {away}  —  to play\n", fixture.date),
        };
        out.push_str(&line);
    }
    out
}

/// Score line followed by the goals in order
pub fn format_match_result(
    home_name: &str,
    away_name: &str,
    played: &Match,
    goals: &[(Goal, Option<String>)],
) -> String {
    let mut out = format!(
        "{home_name} {} – {} {away_name}\n",
        played.home_goals, played.away_goals
    );
    for (goal, scorer) in goals {
        let scorer = scorer.as_deref().unwrap_or("Unknown");
        let side = match goal.credited_to {
            Side::Home => home_name,
            Side::Away => away_name,
        };
        let own_goal = if goal.is_own_goal { " (og)" } else { "" };
        out.push_str(&format!(
            "  {:>6} {scorer}{own_goal} [{side}]\n",
            goal.time_display()
        ));
    }
    out
}

pub fn format_top_scorers(entries: &[ScorerEntry], season_label: &str) -> String {
    let mut out = format!(
        "Top {} scorers, season {season_label}\n{}\n",
        entries.len(),
        "-".repeat(37)
    );
    for entry in entries {
        let plural = if entry.goals == 1 { "" } else { "s" };
        out.push_str(&format!(
            "{:>2}. {:<22} {} goal{plural}\n",
            entry.rank, entry.player_name, entry.goals
        ));
    }
    out
}

pub fn format_best_players(players: &[RankedPlayer]) -> String {
    let header = format!(
        "{:>3}  {:<24} {:>3}  {:<3} {:<22} {:>3}",
        "#", "Player", "Age", "Pos", "Club", "OVR"
    );
    let mut out = format!("{header}\n{}\n", "-".repeat(header.len()));
    for p in players {
        out.push_str(&format!(
            "{:>3}  {:<24} {:>3}  {:<3} {:<22} {:>3}\n",
            p.rank,
            p.name,
            p.age,
            p.position.code(),
            p.club,
            p.overall
        ));
    }
    out
}

pub fn format_rating(club: &Club, rating: &RosterRating) -> String {
    format!(
        "{} (club {})\n  Attack:  {:>5.1}\n  Defense: {:>5.1}\n",
        club.name, club.id, rating.attack, rating.defense
    )
}
