//! Shared setup for repository integration tests.

#![allow(dead_code)]

use punchcard_core::restaurant::{NewRestaurant, RestaurantStore};
use punchcard_core::user::{AccountType, NewUser, UserStore};
use punchcard_db::migration::{Migrator, MigratorTrait};
use punchcard_db::{RestaurantRepository, UserRepository};
use punchcard_shared::types::{RestaurantId, UserId};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Database URL from environment, or a fresh in-memory SQLite database.
fn get_database_url() -> String {
    std::env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string())
}

/// Connects and runs every migration.
pub async fn setup() -> DatabaseConnection {
    let mut options = ConnectOptions::new(get_database_url());
    // Each in-memory SQLite connection is its own database.
    options.max_connections(1).sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Inserts a restaurant and returns its ID.
pub async fn restaurant(db: &DatabaseConnection, name: &str) -> RestaurantId {
    RestaurantRepository::new(db.clone())
        .create(NewRestaurant {
            name: name.to_string(),
            address: "1 Main St".to_string(),
        })
        .await
        .expect("Failed to create restaurant")
        .id
}

/// Inserts a customer and returns its ID.
pub async fn customer(db: &DatabaseConnection, email: &str) -> UserId {
    UserRepository::new(db.clone())
        .create(NewUser {
            name: "Test Customer".to_string(),
            email: email.to_string(),
            password_digest: "digest".to_string(),
            account_type: AccountType::Customer,
        })
        .await
        .expect("Failed to create user")
        .id
}
