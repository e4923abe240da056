mod common;

use anyhow::Result;
use bookkeep::application::AppError;
use bookkeep::domain::NewUser;
use common::{register_user, test_services};

#[tokio::test]
async fn test_register_assigns_id() -> Result<()> {
    let (_entries, users, _temp) = test_services().await?;

    let user = users
        .register(NewUser::new("Alice", "alice@example.com", "s3cret"))
        .await?;

    assert!(user.id > 0);
    assert_eq!(user.name, "Alice");
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.password, "s3cret");

    Ok(())
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() -> Result<()> {
    let (_entries, users, _temp) = test_services().await?;

    register_user(&users, "alice@example.com").await?;

    let err = users
        .register(NewUser::new("Impostor", "alice@example.com", "other"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EmailAlreadyRegistered(_)));

    // The original registration is untouched
    let original = users.authenticate("alice@example.com", "secret").await?;
    assert_eq!(original.name, "Test User");

    Ok(())
}

#[tokio::test]
async fn test_validate_email_uniqueness() -> Result<()> {
    let (_entries, users, _temp) = test_services().await?;

    users.validate_email_uniqueness("free@example.com").await?;

    register_user(&users, "taken@example.com").await?;
    let err = users
        .validate_email_uniqueness("taken@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EmailAlreadyRegistered(_)));

    Ok(())
}

#[tokio::test]
async fn test_authenticate_succeeds_with_matching_credentials() -> Result<()> {
    let (_entries, users, _temp) = test_services().await?;

    let registered = register_user(&users, "alice@example.com").await?;
    let user = users.authenticate("alice@example.com", "secret").await?;

    assert_eq!(user.id, registered.id);
    assert_eq!(user.email, "alice@example.com");

    Ok(())
}

#[tokio::test]
async fn test_authenticate_distinguishes_failure_kinds() -> Result<()> {
    let (_entries, users, _temp) = test_services().await?;

    register_user(&users, "alice@example.com").await?;

    let err = users
        .authenticate("nobody@example.com", "secret")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UserNotFound));

    let err = users
        .authenticate("alice@example.com", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidPassword));

    Ok(())
}

#[tokio::test]
async fn test_find_by_id_present_and_absent() -> Result<()> {
    let (_entries, users, _temp) = test_services().await?;

    let registered = register_user(&users, "alice@example.com").await?;

    let found = users.find_by_id(registered.id).await?;
    assert_eq!(found.unwrap().email, "alice@example.com");

    assert!(users.find_by_id(999).await?.is_none());

    Ok(())
}
