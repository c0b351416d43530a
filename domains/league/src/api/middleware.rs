//! League domain state and auth backend integration

use axum::extract::FromRef;
use matchday_auth::AuthBackend;
use std::sync::Arc;

use crate::repository::LeagueStore;

/// Application state for the league API
#[derive(Clone)]
pub struct LeagueState {
    pub store: Arc<dyn LeagueStore>,
    pub auth: AuthBackend,
}

impl LeagueState {
    pub fn new(store: Arc<dyn LeagueStore>, auth: AuthBackend) -> Self {
        Self { store, auth }
    }
}

impl FromRef<LeagueState> for AuthBackend {
    fn from_ref(state: &LeagueState) -> Self {
        state.auth.clone()
    }
}
