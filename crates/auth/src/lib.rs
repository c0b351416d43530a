//! Identity consumption for the league API
//!
//! The identity provider is external: it issues JWTs carrying the user id and
//! role names. This crate validates those tokens and turns them into an
//! explicit [`Actor`] that every league operation receives as a parameter.

mod actor;
mod backend;
mod claims;
mod config;
mod error;
mod extractors;
mod jwt;

pub use actor::Actor;
pub use backend::AuthBackend;
pub use claims::LeagueClaims;
pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::{AdminUser, AuthUser};
