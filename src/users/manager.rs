//! Read access to users for authenticated callers

use std::sync::Arc;

use super::models::User;
use super::repository::{RepositoryError, UserRepository};

#[derive(Clone)]
pub struct UserManager {
    repository: Arc<dyn UserRepository>,
}

impl UserManager {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_user_by_id(&self, id: i64) -> Result<User, RepositoryError> {
        if id < 1 {
            return Err(RepositoryError::UserNotFound(format!("invalid user id {}", id)));
        }
        self.repository.get_user_by_id(id).await
    }
}
