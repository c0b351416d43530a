//! Request handlers grouped by workflow

pub mod configuration;
pub mod matches;
pub mod players;
pub mod roster_requests;
pub mod teams;
