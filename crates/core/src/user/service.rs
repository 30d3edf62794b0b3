//! User service implementation.

use std::future::Future;
use std::sync::Arc;

use punchcard_shared::{ValidationErrors, types::UserId};

use super::error::UserError;
use super::types::{AccountType, NewUser, RegisterInput, User, UserProfile};
use crate::store::StoreError;

const EMAIL_TAKEN: &str = "Email has already been used.";
const PASSWORD_MISMATCH: &str = "Passwords do not match.";
const EMAIL_REQUIRED: &str = "An email is required.";
const PASSWORD_REQUIRED: &str = "A password is required.";

/// Store trait for user accounts.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait UserStore: Send + Sync {
    /// Insert a new account. A duplicate email is a `StoreError::Conflict`.
    fn create(&self, input: NewUser) -> impl Future<Output = Result<User, StoreError>> + Send;

    /// Find account by ID.
    fn find_by_id(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;

    /// Find account by email.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;

    /// Find the account whose email and password digest both match.
    fn find_by_credentials(
        &self,
        email: &str,
        password_digest: &str,
    ) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;

    /// Change the access type. Returns false if the account does not exist.
    fn set_account_type(
        &self,
        id: UserId,
        account_type: AccountType,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

/// Account registration and lookup.
pub struct UserService<U: UserStore> {
    users: Arc<U>,
}

impl<U: UserStore> UserService<U> {
    /// Create a new user service.
    #[must_use]
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// Register an account.
    ///
    /// Every check runs, so a duplicate email and mismatched passwords are
    /// reported together. Nothing is written unless all checks pass.
    ///
    /// # Errors
    ///
    /// Returns `UserError::Validation` with every failed check, or a store error.
    pub async fn register(&self, input: RegisterInput) -> Result<User, UserError> {
        let mut errors = ValidationErrors::new();

        let taken = self.users.find_by_email(&input.email).await?.is_some();
        errors.check(taken, EMAIL_TAKEN);
        errors.check(input.password1 != input.password2, PASSWORD_MISMATCH);
        errors.check(input.email.is_empty(), EMAIL_REQUIRED);
        errors.check(input.password1.is_empty(), PASSWORD_REQUIRED);
        errors.into_result().map_err(UserError::Validation)?;

        let new_user = NewUser {
            name: input.name,
            email: input.email,
            password_digest: input.password1,
            account_type: input.account_type,
        };

        match self.users.create(new_user).await {
            Ok(user) => Ok(user),
            // Lost a race with a concurrent registration for the same email.
            Err(StoreError::Conflict(_)) => {
                let mut errors = ValidationErrors::new();
                errors.push(EMAIL_TAKEN);
                Err(UserError::Validation(errors))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Find the account matching an email and password digest.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store fails; a mismatch is `Ok(None)`.
    pub async fn authenticate(
        &self,
        email: &str,
        password_digest: &str,
    ) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .find_by_credentials(email, password_digest)
            .await?)
    }

    /// Change an account's access type.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if the account does not exist.
    pub async fn set_account_type(
        &self,
        id: UserId,
        account_type: AccountType,
    ) -> Result<(), UserError> {
        if self.users.set_account_type(id, account_type).await? {
            Ok(())
        } else {
            Err(UserError::NotFound(id))
        }
    }

    /// Public fields of an account.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if the account does not exist.
    pub async fn lookup(&self, id: UserId) -> Result<UserProfile, UserError> {
        self.get(id).await.map(|user| user.profile())
    }

    /// Display name of an account.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if the account does not exist.
    pub async fn display_name(&self, id: UserId) -> Result<String, UserError> {
        self.get(id).await.map(|user| user.name)
    }

    /// Full account record.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` if the account does not exist.
    pub async fn get(&self, id: UserId) -> Result<User, UserError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }
}
