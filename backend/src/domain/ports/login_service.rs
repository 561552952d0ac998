//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call this port to turn credentials into an [`Actor`]
//! without knowing how identities are resolved.

use async_trait::async_trait;

use crate::domain::{Actor, Error, LoginCredentials};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated actor.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Actor, Error>;
}
