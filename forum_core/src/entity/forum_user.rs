use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Insert-only record of every user who authored a thread or post in a forum.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "forum_users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub forum: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub nickname: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::Nickname",
        to = "super::user::Column::Nickname"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::forum::Entity",
        from = "Column::Forum",
        to = "super::forum::Column::Slug"
    )]
    Forum,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::forum::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Forum.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
