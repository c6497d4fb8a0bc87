// Application state shared across all modules

use std::collections::HashMap;
use std::sync::Arc;

use crate::auth::{Authenticator, Jwt};
use crate::common::config::Config;
use crate::sso::{IdentityProvider, SingleSignOn, SingleSignOnFactory};
use crate::users::{UserManager, UserRepository};

/// Application state containing configuration and the wired-up services.
/// Built once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub authenticator: Authenticator,
    pub user_manager: UserManager,
    /// One sign-in flow per provider, keyed by the provider's route name.
    pub single_sign_ons: HashMap<&'static str, SingleSignOn>,
}

impl AppState {
    /// Wires every provider to one shared authenticator and user store.
    pub fn new(
        config: Config,
        repository: Arc<dyn UserRepository>,
        providers: Vec<Arc<dyn IdentityProvider>>,
    ) -> Self {
        let tokenizer = Arc::new(Jwt::new(config.jwt_secret.as_bytes()));
        let authenticator = Authenticator::new(tokenizer, config.token_lifetime);
        let factory = SingleSignOnFactory::new(authenticator.clone(), repository.clone());

        let single_sign_ons = providers
            .into_iter()
            .map(|provider| (provider.name(), factory.new_single_sign_on(provider)))
            .collect();

        Self {
            config,
            authenticator,
            user_manager: UserManager::new(repository),
            single_sign_ons,
        }
    }

    pub fn single_sign_on(&self, provider: &str) -> Option<&SingleSignOn> {
        self.single_sign_ons.get(provider)
    }
}
