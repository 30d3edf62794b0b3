//! User repository for database operations.

use punchcard_core::StoreError;
use punchcard_core::user::{AccountType, NewUser, User, UserStore};
use punchcard_shared::types::UserId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use super::store_error;
use crate::entities::users;

/// User repository implementation.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl UserStore for UserRepository {
    async fn create(&self, input: NewUser) -> Result<User, StoreError> {
        let user = users::ActiveModel {
            name: Set(input.name),
            email: Set(input.email),
            password_digest: Set(input.password_digest),
            account_type: Set(input.account_type.code()),
            ..Default::default()
        };

        let model = user.insert(&self.db).await.map_err(store_error)?;
        tracing::info!(user_id = model.id, "registered user");
        to_domain(model)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        users::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(to_domain)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(to_domain)
            .transpose()
    }

    async fn find_by_credentials(
        &self,
        email: &str,
        password_digest: &str,
    ) -> Result<Option<User>, StoreError> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .filter(users::Column::PasswordDigest.eq(password_digest))
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(to_domain)
            .transpose()
    }

    async fn set_account_type(
        &self,
        id: UserId,
        account_type: AccountType,
    ) -> Result<bool, StoreError> {
        let result = users::Entity::update_many()
            .col_expr(
                users::Column::AccountType,
                sea_orm::sea_query::Expr::value(account_type.code()),
            )
            .filter(users::Column::Id.eq(id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(store_error)?;

        tracing::debug!(user_id = %id, %account_type, rows = result.rows_affected, "set account type");
        Ok(result.rows_affected > 0)
    }
}

/// Convert database model to domain user.
fn to_domain(model: users::Model) -> Result<User, StoreError> {
    let account_type = AccountType::from_code(model.account_type).ok_or_else(|| {
        StoreError::corrupt(format!(
            "user {} has unknown account type {}",
            model.id, model.account_type
        ))
    })?;

    Ok(User {
        id: UserId::new(model.id),
        name: model.name,
        email: model.email,
        password_digest: model.password_digest,
        account_type,
    })
}
