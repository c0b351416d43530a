//! JWT claims types

use serde::{Deserialize, Serialize};

/// JWT claims issued by the identity provider
#[derive(Debug, Serialize, Deserialize)]
pub struct LeagueClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Role names granted to the user
    #[serde(default)]
    pub roles: Vec<String>,
    /// Issued at
    pub iat: u64,
    /// Expires at
    pub exp: u64,
    /// Audience
    #[serde(default)]
    pub aud: Option<String>,
}
