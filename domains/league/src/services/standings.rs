//! Read-side aggregates over approved results

use matchday_common::Result;

use crate::domain::standings::{self, StandingRow, TopScorer};
use crate::repository::LeagueStore;

pub const DEFAULT_TOP_SCORERS_LIMIT: usize = 10;

pub async fn league_table(store: &dyn LeagueStore) -> Result<Vec<StandingRow>> {
    let mut tx = store.begin().await?;
    let teams = tx.list_teams().await?;
    let results = tx.scored_fixtures().await?;
    Ok(standings::league_table(&teams, &results))
}

pub async fn top_scorers(store: &dyn LeagueStore, limit: usize) -> Result<Vec<TopScorer>> {
    let mut tx = store.begin().await?;
    let goals = tx.scorer_goals().await?;
    Ok(standings::top_scorers(&goals, limit))
}
