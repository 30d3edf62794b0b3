//! `SeaORM` Entity for users table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_digest: String,
    /// -1 customer, 0 employee, 1 owner, 2 admin employee.
    pub account_type: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::points::Entity")]
    Points,
    #[sea_orm(has_many = "super::customer_achievement_progress::Entity")]
    CustomerAchievementProgress,
}

impl Related<super::points::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Points.def()
    }
}

impl Related<super::customer_achievement_progress::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomerAchievementProgress.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
