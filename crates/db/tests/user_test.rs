//! Integration tests for the user repository.

mod common;

use std::sync::Arc;

use punchcard_core::StoreError;
use punchcard_core::user::{AccountType, NewUser, RegisterInput, UserError, UserService, UserStore};
use punchcard_db::UserRepository;
use punchcard_shared::types::UserId;

fn new_user(email: &str) -> NewUser {
    NewUser {
        name: "Ada".to_string(),
        email: email.to_string(),
        password_digest: "d1g3st".to_string(),
        account_type: AccountType::Owner,
    }
}

#[tokio::test]
async fn test_user_create_and_find() {
    let db = common::setup().await;
    let repo = UserRepository::new(db);

    let user = repo.create(new_user("ada@example.com")).await.unwrap();
    assert_eq!(user.account_type, AccountType::Owner);

    let by_id = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(by_id, user);

    let by_email = repo.find_by_email("ada@example.com").await.unwrap().unwrap();
    assert_eq!(by_email.id, user.id);

    assert!(repo.find_by_id(UserId::new(999)).await.unwrap().is_none());
    assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let db = common::setup().await;
    let repo = UserRepository::new(db);

    repo.create(new_user("ada@example.com")).await.unwrap();
    let err = repo.create(new_user("ada@example.com")).await.unwrap_err();

    assert!(matches!(err, StoreError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn test_find_by_credentials_is_exact() {
    let db = common::setup().await;
    let repo = UserRepository::new(db);
    let user = repo.create(new_user("ada@example.com")).await.unwrap();

    let found = repo
        .find_by_credentials("ada@example.com", "d1g3st")
        .await
        .unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));

    assert!(
        repo.find_by_credentials("ada@example.com", "wrong")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_set_account_type() {
    let db = common::setup().await;
    let repo = UserRepository::new(db);
    let user = repo.create(new_user("ada@example.com")).await.unwrap();

    assert!(
        repo.set_account_type(user.id, AccountType::AdminEmployee)
            .await
            .unwrap()
    );
    let updated = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(updated.account_type, AccountType::AdminEmployee);

    assert!(
        !repo
            .set_account_type(UserId::new(999), AccountType::Employee)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_register_through_service() {
    let db = common::setup().await;
    let service = UserService::new(Arc::new(UserRepository::new(db)));

    let input = |password2: &str| RegisterInput {
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        password1: "pw".to_string(),
        password2: password2.to_string(),
        account_type: AccountType::Customer,
    };

    let user = service.register(input("pw")).await.unwrap();
    assert_eq!(service.display_name(user.id).await.unwrap(), "Ada");

    let Err(UserError::Validation(errors)) = service.register(input("other")).await else {
        panic!("expected validation error");
    };
    assert_eq!(
        errors.messages(),
        ["Email has already been used.", "Passwords do not match."]
    );
}
