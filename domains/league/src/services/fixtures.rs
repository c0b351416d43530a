//! Fixture scheduling

use chrono::{DateTime, Utc};
use matchday_auth::Actor;
use matchday_common::{Error, Result};
use uuid::Uuid;

use crate::domain::entities::Fixture;
use crate::domain::state::{FixtureEvent, FixtureStateMachine};
use crate::repository::{LeagueStore, LeagueTx};

pub(crate) async fn require_fixture(tx: &mut dyn LeagueTx, fixture_id: Uuid) -> Result<Fixture> {
    tx.lock_fixture(fixture_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Fixture {} not found", fixture_id)))
}

/// Schedule a match between two approved teams (administrators only)
pub async fn create_fixture(
    store: &dyn LeagueStore,
    actor: &Actor,
    home_team_id: Uuid,
    away_team_id: Uuid,
    kick_off: DateTime<Utc>,
    location_id: Option<Uuid>,
) -> Result<Fixture> {
    actor.require_admin()?;
    let fixture = Fixture::new(home_team_id, away_team_id, kick_off, location_id)?;

    let mut tx = store.begin().await?;
    for team_id in [home_team_id, away_team_id] {
        let team = tx
            .get_team(team_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Team {} not found", team_id)))?;
        if !team.is_approved() {
            return Err(Error::Validation(format!(
                "Team '{}' is not approved for league play",
                team.name
            )));
        }
    }

    tx.insert_fixture(&fixture).await?;
    tx.commit().await?;

    tracing::info!(
        fixture_id = %fixture.id,
        home_team_id = %home_team_id,
        away_team_id = %away_team_id,
        kick_off = %kick_off,
        "Fixture scheduled"
    );
    Ok(fixture)
}

/// Move a fixture that has not been played to a new kick-off time
pub async fn delay_fixture(
    store: &dyn LeagueStore,
    actor: &Actor,
    fixture_id: Uuid,
    new_kick_off: DateTime<Utc>,
) -> Result<Fixture> {
    actor.require_admin()?;

    let mut tx = store.begin().await?;
    let mut fixture = require_fixture(tx.as_mut(), fixture_id).await?;
    let next = FixtureStateMachine::transition(fixture.status, FixtureEvent::Delay)?;

    tx.update_fixture_schedule(fixture_id, next, new_kick_off)
        .await?;
    tx.commit().await?;

    tracing::info!(
        fixture_id = %fixture_id,
        previous_kick_off = %fixture.kick_off,
        kick_off = %new_kick_off,
        "Fixture delayed"
    );
    fixture.status = next;
    fixture.kick_off = new_kick_off;
    Ok(fixture)
}
