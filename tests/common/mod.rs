// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use bookkeep::application::{EntryService, UserService};
use bookkeep::domain::{EntryDraft, EntryKind, NewUser, User, UserId};
use bookkeep::storage::Repository;
use tempfile::TempDir;

/// Helper to create both services over a shared temporary database
pub async fn test_services() -> Result<(EntryService, UserService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite:{}?mode=rwc", db_path.to_str().unwrap());
    let repo = Repository::init(&db_url).await?;
    Ok((
        EntryService::new(repo.clone()),
        UserService::new(repo),
        temp_dir,
    ))
}

/// Register a throwaway user with the given email
pub async fn register_user(users: &UserService, email: &str) -> Result<User> {
    Ok(users
        .register(NewUser::new("Test User", email, "secret"))
        .await?)
}

/// A draft that passes every business rule, owned by the given user
pub fn valid_draft(user_id: UserId) -> EntryDraft {
    EntryDraft::new("Salary", 9, 2020, 10_000)
        .with_user(user_id)
        .with_kind(EntryKind::Income)
}
