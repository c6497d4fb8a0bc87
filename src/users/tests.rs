//! Tests for users module
//!
//! These run against an in-memory SQLite store with the real schema.

use super::*;
use crate::common::migrations::run_migrations;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

async fn setup_test_db() -> SqlitePool {
    // a single connection keeps every query on the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        name: "Test User".to_string(),
        picture: "http://example.com/p.png".to_string(),
    }
}

#[tokio::test]
async fn test_create_and_get_user() {
    let repository = SqliteUserRepository::new(setup_test_db().await);

    let created = repository.create_user(new_user("a@x.com")).await.unwrap();
    assert!(created.id >= 1);
    assert_eq!(created.email, "a@x.com");
    assert_eq!(created.picture, "http://example.com/p.png");

    let by_email = repository.get_user_by_email("a@x.com").await.unwrap();
    assert_eq!(by_email, created);

    let by_id = repository.get_user_by_id(created.id).await.unwrap();
    assert_eq!(by_id, created);
}

#[tokio::test]
async fn test_missing_user_is_not_found() {
    let repository = SqliteUserRepository::new(setup_test_db().await);

    let by_email = repository.get_user_by_email("nobody@x.com").await;
    assert!(matches!(by_email, Err(RepositoryError::UserNotFound(_))));

    let by_id = repository.get_user_by_id(42).await;
    assert!(matches!(by_id, Err(RepositoryError::UserNotFound(_))));
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let repository = SqliteUserRepository::new(setup_test_db().await);

    repository.create_user(new_user("dup@x.com")).await.unwrap();
    let second = repository.create_user(new_user("dup@x.com")).await;

    assert!(matches!(second, Err(RepositoryError::Conflict(_))));
}

#[tokio::test]
async fn test_user_manager_rejects_non_positive_ids() {
    let repository = Arc::new(SqliteUserRepository::new(setup_test_db().await));
    let manager = UserManager::new(repository.clone());

    assert!(matches!(
        manager.get_user_by_id(0).await,
        Err(RepositoryError::UserNotFound(_))
    ));

    let created = repository.create_user(new_user("m@x.com")).await.unwrap();
    let fetched = manager.get_user_by_id(created.id).await.unwrap();
    assert_eq!(fetched.email, "m@x.com");
}
