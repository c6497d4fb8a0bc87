//! Sign-in orchestration: provider identity → local user → session token

use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use super::provider::{IdentityProvider, ProviderError, SingleSignOnUser};
use crate::auth::{Authenticator, TokenError};
use crate::common::{safe_email_log, safe_token_log};
use crate::users::{NewUser, RepositoryError, User, UserRepository};

#[derive(Debug, thiserror::Error)]
pub enum SsoError {
    #[error("authorization code cannot be empty")]
    EmptyCode,

    #[error("email cannot be empty")]
    EmptyEmail,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Sign-in flow for one identity provider.
///
/// Accounts are linked by email alone: the same address arriving through
/// any provider resolves to the same local user.
#[derive(Clone)]
pub struct SingleSignOn {
    identity_provider: Arc<dyn IdentityProvider>,
    authenticator: Authenticator,
    repository: Arc<dyn UserRepository>,
}

impl SingleSignOn {
    pub fn new(
        identity_provider: Arc<dyn IdentityProvider>,
        authenticator: Authenticator,
        repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            identity_provider,
            authenticator,
            repository,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.identity_provider.name()
    }

    pub fn get_authorization_url(&self) -> Result<Url, SsoError> {
        Ok(self.identity_provider.get_authorization_url()?)
    }

    pub fn is_signed_in(&self, token: &str) -> bool {
        self.authenticator.get_user_id(token).is_ok()
    }

    /// Completes the authorization-code flow and returns a session token.
    pub async fn sign_in(&self, code: &str) -> Result<String, SsoError> {
        if code.is_empty() {
            return Err(SsoError::EmptyCode);
        }

        let provider = self.provider_name();

        let identity_token = self.identity_provider.get_identity_token(code).await?;
        debug!(
            provider,
            identity_token = %safe_token_log(&identity_token),
            "Exchanged authorization code"
        );

        let single_sign_on_user = self
            .identity_provider
            .get_single_sign_on_user(&identity_token)
            .await?;

        let user = self.get_or_create_user(single_sign_on_user).await?;
        let token = self.authenticator.create_token(user.id)?;

        info!(
            provider,
            user_id = user.id,
            email = %safe_email_log(&user.email),
            "User signed in via single sign-on"
        );
        Ok(token)
    }

    /// Looks the user up by email, creating the record on first sign-in.
    pub async fn get_or_create_user(
        &self,
        single_sign_on_user: SingleSignOnUser,
    ) -> Result<User, SsoError> {
        if single_sign_on_user.email.is_empty() {
            return Err(SsoError::EmptyEmail);
        }

        match self
            .repository
            .get_user_by_email(&single_sign_on_user.email)
            .await
        {
            Ok(user) => return Ok(user),
            Err(RepositoryError::UserNotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let email = single_sign_on_user.email.clone();
        let created = self
            .repository
            .create_user(NewUser {
                email: single_sign_on_user.email,
                name: single_sign_on_user.name,
                picture: single_sign_on_user.picture,
            })
            .await;

        match created {
            Ok(user) => {
                info!(
                    provider = self.provider_name(),
                    user_id = user.id,
                    email = %safe_email_log(&user.email),
                    "Created new user account"
                );
                Ok(user)
            }
            // A concurrent sign-in inserted the same email first.
            Err(RepositoryError::Conflict(_)) => {
                warn!(
                    email = %safe_email_log(&email),
                    "Concurrent first sign-in detected, re-reading user"
                );
                Ok(self.repository.get_user_by_email(&email).await?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Builds per-provider [`SingleSignOn`]s that share one authenticator and store,
/// so any provider's session token verifies everywhere.
#[derive(Clone)]
pub struct SingleSignOnFactory {
    authenticator: Authenticator,
    repository: Arc<dyn UserRepository>,
}

impl SingleSignOnFactory {
    pub fn new(authenticator: Authenticator, repository: Arc<dyn UserRepository>) -> Self {
        Self {
            authenticator,
            repository,
        }
    }

    pub fn new_single_sign_on(
        &self,
        identity_provider: Arc<dyn IdentityProvider>,
    ) -> SingleSignOn {
        SingleSignOn::new(
            identity_provider,
            self.authenticator.clone(),
            self.repository.clone(),
        )
    }
}
