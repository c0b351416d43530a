//! League domain layer: entities, state machines, policies, standings

pub mod entities;
pub mod policy;
pub mod standings;
pub mod state;
pub mod validation;
