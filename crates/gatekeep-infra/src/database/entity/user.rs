//! User entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{FromQueryResult, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    pub password: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Listing projection: every column except the password hash.
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult)]
pub struct Summary {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTimeWithTimeZone,
}

/// Conversion from SeaORM Model to Domain User.
impl From<Model> for gatekeep_core::domain::User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            password_hash: Some(model.password),
            created_at: model.created_at.into(),
        }
    }
}

impl From<Summary> for gatekeep_core::domain::User {
    fn from(row: Summary) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
            password_hash: None,
            created_at: row.created_at.into(),
        }
    }
}

/// Active model for a fresh row with a generated id.
impl From<gatekeep_core::ports::NewUserRow> for ActiveModel {
    fn from(row: gatekeep_core::ports::NewUserRow) -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            email: Set(row.email),
            name: Set(row.name),
            password: Set(row.password_hash),
            created_at: Set(chrono::Utc::now().into()),
        }
    }
}
