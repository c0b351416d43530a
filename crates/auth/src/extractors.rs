//! Axum extractors for authentication
//!
//! Generic over any state `S` where `AuthBackend: FromRef<S>`.
//! This is axum's idiomatic nested-state pattern.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::actor::Actor;
use crate::backend::AuthBackend;
use crate::error::AuthError;
use crate::jwt::extract_bearer_token;

/// Authenticated actor extractor (JWT bearer)
#[derive(Debug)]
pub struct AuthUser(pub Actor);

impl<S> FromRequestParts<S> for AuthUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let backend = AuthBackend::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthorization)?;

        let token = extract_bearer_token(auth_header)?;
        let actor = backend.authenticate_jwt(&token)?;

        Ok(AuthUser(actor))
    }
}

/// Administrator extractor.
///
/// Like `AuthUser` but rejects actors without the admin role with 403.
/// This is the coarse role gate; per-resource standing is checked by the
/// league policies afterwards.
#[derive(Debug)]
pub struct AdminUser(pub Actor);

impl<S> FromRequestParts<S> for AdminUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let AuthUser(actor) = AuthUser::from_request_parts(parts, state).await?;

        if !actor.is_admin() {
            return Err(AuthError::AdminRequired);
        }

        Ok(AdminUser(actor))
    }
}
