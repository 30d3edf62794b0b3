//! `SeaORM` Entity for achievements table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "achievements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub restaurant_id: i32,
    pub name: String,
    pub experience: i32,
    pub points: i32,
    /// Serialized `punchcard_core::achievement::Requirement`.
    pub requirement: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::restaurants::Entity",
        from = "Column::RestaurantId",
        to = "super::restaurants::Column::Id",
        on_delete = "Cascade"
    )]
    Restaurants,
    #[sea_orm(has_many = "super::customer_achievement_progress::Entity")]
    CustomerAchievementProgress,
}

impl Related<super::restaurants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Restaurants.def()
    }
}

impl Related<super::customer_achievement_progress::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomerAchievementProgress.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
