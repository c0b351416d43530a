//! League table and scorer aggregation
//!
//! Pure functions over already-loaded rows. Only results whose status counts
//! toward standings contribute; the table is rebuilt from scratch on each call.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::Team;
use crate::domain::state::ResultStatus;

pub const POINTS_FOR_WIN: i32 = 3;
pub const POINTS_FOR_DRAW: i32 = 1;

/// A submitted result joined with its fixture's sides
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScoredFixture {
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub home_score: i32,
    pub away_score: i32,
    pub status: ResultStatus,
}

/// One row of the league table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingRow {
    pub team_id: Uuid,
    pub team_name: String,
    pub played: i32,
    pub won: i32,
    pub drawn: i32,
    pub lost: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_difference: i32,
    pub points: i32,
}

impl StandingRow {
    fn empty(team: &Team) -> Self {
        StandingRow {
            team_id: team.id,
            team_name: team.name.clone(),
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
        }
    }

    fn record(&mut self, scored: i32, conceded: i32) {
        self.played = self.played.saturating_add(1);
        self.goals_for = self.goals_for.saturating_add(scored);
        self.goals_against = self.goals_against.saturating_add(conceded);
        self.goal_difference = self.goals_for.saturating_sub(self.goals_against);
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => {
                self.won = self.won.saturating_add(1);
                self.points = self.points.saturating_add(POINTS_FOR_WIN);
            }
            std::cmp::Ordering::Equal => {
                self.drawn = self.drawn.saturating_add(1);
                self.points = self.points.saturating_add(POINTS_FOR_DRAW);
            }
            std::cmp::Ordering::Less => self.lost = self.lost.saturating_add(1),
        }
    }
}

/// Build the league table.
///
/// Every team gets a row, including teams without results. Ordering is
/// points, goal difference, goals scored (all descending), then team name.
pub fn league_table(teams: &[Team], results: &[ScoredFixture]) -> Vec<StandingRow> {
    let mut rows: HashMap<Uuid, StandingRow> = teams
        .iter()
        .map(|team| (team.id, StandingRow::empty(team)))
        .collect();

    for result in results.iter().filter(|r| r.status.counts_toward_standings()) {
        if let Some(home) = rows.get_mut(&result.home_team_id) {
            home.record(result.home_score, result.away_score);
        }
        if let Some(away) = rows.get_mut(&result.away_team_id) {
            away.record(result.away_score, result.home_score);
        }
    }

    let mut table: Vec<StandingRow> = rows.into_values().collect();
    table.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goal_difference.cmp(&a.goal_difference))
            .then(b.goals_for.cmp(&a.goals_for))
            .then_with(|| a.team_name.to_lowercase().cmp(&b.team_name.to_lowercase()))
    });
    table
}

/// A goal joined with its scorer and the owning result's status
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScorerGoal {
    pub player_id: Uuid,
    pub player_name: String,
    pub team_id: Option<Uuid>,
    pub status: ResultStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopScorer {
    pub player_id: Uuid,
    pub player_name: String,
    pub team_id: Option<Uuid>,
    pub goals: i32,
}

/// Goal tally from approved results, most goals first
pub fn top_scorers(goals: &[ScorerGoal], limit: usize) -> Vec<TopScorer> {
    let mut tally: HashMap<Uuid, TopScorer> = HashMap::new();

    for goal in goals.iter().filter(|g| g.status.counts_toward_standings()) {
        tally
            .entry(goal.player_id)
            .or_insert_with(|| TopScorer {
                player_id: goal.player_id,
                player_name: goal.player_name.clone(),
                team_id: goal.team_id,
                goals: 0,
            })
            .goals += 1;
    }

    let mut scorers: Vec<TopScorer> = tally.into_values().collect();
    scorers.sort_by(|a, b| {
        b.goals
            .cmp(&a.goals)
            .then_with(|| a.player_name.cmp(&b.player_name))
    });
    scorers.truncate(limit);
    scorers
}
