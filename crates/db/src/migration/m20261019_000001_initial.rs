//! Initial schema: accounts, restaurants, coupons, achievements, progress and balances.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::PasswordDigest)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::AccountType)
                            .integer()
                            .not_null()
                            .default(-1),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Restaurants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Restaurants::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Restaurants::Name).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Restaurants::Address)
                            .string_len(256)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Coupons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Coupons::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Coupons::RestaurantId).integer().not_null())
                    .col(ColumnDef::new(Coupons::Name).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Coupons::Description)
                            .string_len(1024)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Coupons::Points).integer().not_null())
                    .col(
                        ColumnDef::new(Coupons::Level)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Coupons::Begin).date().null())
                    .col(ColumnDef::new(Coupons::Expiration).date().null())
                    .col(
                        ColumnDef::new(Coupons::Deleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_coupons_restaurant")
                            .from(Coupons::Table, Coupons::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_coupons_restaurant")
                    .table(Coupons::Table)
                    .col(Coupons::RestaurantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Achievements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Achievements::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Achievements::RestaurantId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Achievements::Name).string_len(64).not_null())
                    .col(ColumnDef::new(Achievements::Experience).integer().not_null())
                    .col(ColumnDef::new(Achievements::Points).integer().not_null())
                    .col(ColumnDef::new(Achievements::Requirement).json().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_achievements_restaurant")
                            .from(Achievements::Table, Achievements::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_achievements_restaurant")
                    .table(Achievements::Table)
                    .col(Achievements::RestaurantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CustomerAchievementProgress::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CustomerAchievementProgress::AchievementId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CustomerAchievementProgress::UserId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CustomerAchievementProgress::Progress)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CustomerAchievementProgress::Total)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(CustomerAchievementProgress::AchievementId)
                            .col(CustomerAchievementProgress::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_progress_achievement")
                            .from(
                                CustomerAchievementProgress::Table,
                                CustomerAchievementProgress::AchievementId,
                            )
                            .to(Achievements::Table, Achievements::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_progress_user")
                            .from(
                                CustomerAchievementProgress::Table,
                                CustomerAchievementProgress::UserId,
                            )
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Progress is always read per user
        manager
            .create_index(
                Index::create()
                    .name("idx_progress_user")
                    .table(CustomerAchievementProgress::Table)
                    .col(CustomerAchievementProgress::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Points::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Points::UserId).integer().not_null())
                    .col(ColumnDef::new(Points::RestaurantId).integer().not_null())
                    .col(
                        ColumnDef::new(Points::Points)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Points::Experience)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(
                        Index::create()
                            .col(Points::UserId)
                            .col(Points::RestaurantId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_points_user")
                            .from(Points::Table, Points::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_points_restaurant")
                            .from(Points::Table, Points::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Points::Table).to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(CustomerAchievementProgress::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Achievements::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Coupons::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Restaurants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordDigest,
    AccountType,
}

#[derive(DeriveIden)]
enum Restaurants {
    Table,
    Id,
    Name,
    Address,
}

#[derive(DeriveIden)]
enum Coupons {
    Table,
    Id,
    RestaurantId,
    Name,
    Description,
    Points,
    Level,
    Begin,
    Expiration,
    Deleted,
}

#[derive(DeriveIden)]
enum Achievements {
    Table,
    Id,
    RestaurantId,
    Name,
    Experience,
    Points,
    Requirement,
}

#[derive(DeriveIden)]
enum CustomerAchievementProgress {
    Table,
    AchievementId,
    UserId,
    Progress,
    Total,
}

#[derive(DeriveIden)]
enum Points {
    Table,
    UserId,
    RestaurantId,
    Points,
    Experience,
}
