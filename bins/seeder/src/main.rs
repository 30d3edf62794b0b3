//! Database seeder for Punchcard development and testing.
//!
//! Seeds an owner, a customer, one restaurant with a few coupons and
//! achievements, and some progress for the customer. Everything goes through
//! the services, so seeded data passes the same validation as real input.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use punchcard_core::achievement::{AchievementService, CreateAchievementInput, Goal, Requirement};
use punchcard_core::coupon::{CouponService, CreateCouponInput};
use punchcard_core::level::LevelCurve;
use punchcard_core::restaurant::{NewRestaurant, RestaurantStore};
use punchcard_core::user::{AccountType, RegisterInput, UserService, UserStore};
use punchcard_core::validity::{DateWindow, Validity};
use punchcard_db::{
    AchievementRepository, CouponRepository, PointsRepository, ProgressRepository,
    RestaurantRepository, UserRepository,
};
use punchcard_shared::{AppConfig, telemetry, types::RestaurantId};
use sea_orm::DatabaseConnection;
use tracing::info;

const OWNER_EMAIL: &str = "owner@punchcard.dev";
const CUSTOMER_EMAIL: &str = "customer@punchcard.dev";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    telemetry::init(&config.logging);

    let db = punchcard_db::connect_with(&config.database)
        .await
        .context("failed to connect to database")?;

    let users = Arc::new(UserRepository::new(db.clone()));
    if users.find_by_email(OWNER_EMAIL).await?.is_some() {
        info!("seed data already present, skipping");
        return Ok(());
    }

    seed_users(&users).await?;
    let restaurant = seed_restaurant(&db).await?;
    seed_coupons(&db, restaurant, LevelCurve::from(&config.program)).await?;
    seed_achievements(&db, &users, restaurant).await?;

    info!("seeding complete");
    Ok(())
}

/// Seeds an owner and a customer account.
async fn seed_users(users: &Arc<UserRepository>) -> Result<()> {
    let service = UserService::new(Arc::clone(users));

    for (name, email, account_type) in [
        ("Test Owner", OWNER_EMAIL, AccountType::Owner),
        ("Test Customer", CUSTOMER_EMAIL, AccountType::Customer),
    ] {
        let user = service
            .register(RegisterInput {
                name: name.to_string(),
                email: email.to_string(),
                password1: "seed-digest".to_string(),
                password2: "seed-digest".to_string(),
                account_type,
            })
            .await
            .with_context(|| format!("failed to register {email}"))?;
        info!(user_id = %user.id, %account_type, "seeded user");
    }
    Ok(())
}

async fn seed_restaurant(db: &DatabaseConnection) -> Result<RestaurantId> {
    let restaurant = RestaurantRepository::new(db.clone())
        .create(NewRestaurant {
            name: "Noodle Bar".to_string(),
            address: "1 Main St".to_string(),
        })
        .await?;
    info!(restaurant_id = %restaurant.id, "seeded restaurant");
    Ok(restaurant.id)
}

async fn seed_coupons(
    db: &DatabaseConnection,
    restaurant_id: RestaurantId,
    levels: LevelCurve,
) -> Result<()> {
    let service = CouponService::new(
        Arc::new(CouponRepository::new(db.clone())),
        Arc::new(PointsRepository::new(db.clone())),
        levels,
    );
    let today = Utc::now().date_naive();

    let coupons = [
        ("Free drink", "Any size", 30, 0, true),
        ("Half-price bowl", "One bowl per visit", 80, 2, false),
    ];
    for (name, description, points, level, indefinite) in coupons {
        let coupon = service
            .create_coupon(CreateCouponInput {
                restaurant_id,
                name: name.to_string(),
                points,
                description: description.to_string(),
                level,
                begin: (!indefinite).then_some(today),
                expiration: (!indefinite).then(|| today + Duration::days(30)),
                indefinite,
            })
            .await
            .with_context(|| format!("failed to create coupon {name}"))?;
        info!(coupon_id = %coupon.id, "seeded coupon");
    }
    Ok(())
}

async fn seed_achievements(
    db: &DatabaseConnection,
    users: &UserRepository,
    restaurant_id: RestaurantId,
) -> Result<()> {
    let service = AchievementService::new(
        Arc::new(AchievementRepository::new(db.clone())),
        Arc::new(ProgressRepository::new(db.clone())),
    );
    let today = Utc::now().date_naive();
    let month = DateWindow::new(today, today + Duration::days(30))
        .context("seed window is inverted")?;

    let regular = service
        .create_achievement(CreateAchievementInput {
            restaurant_id,
            name: "Regular".to_string(),
            experience: 50,
            points: 20,
            requirement: Requirement {
                goal: Goal::Visit { times: 5 },
                validity: Validity::Indefinite,
            },
        })
        .await?;
    service
        .create_achievement(CreateAchievementInput {
            restaurant_id,
            name: "Ramen month".to_string(),
            experience: 120,
            points: 40,
            requirement: Requirement {
                goal: Goal::PurchaseItem {
                    item: "Ramen".to_string(),
                    quantity: 4,
                },
                validity: Validity::Window(month),
            },
        })
        .await?;

    let customer = users
        .find_by_email(CUSTOMER_EMAIL)
        .await?
        .context("seeded customer is missing")?;
    for _ in 0..2 {
        service.record_progress(customer.id, regular.id).await?;
    }
    info!(user_id = %customer.id, achievement_id = %regular.id, "seeded progress");
    Ok(())
}
