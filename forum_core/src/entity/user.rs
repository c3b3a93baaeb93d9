use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub nickname: String,
    pub fullname: String,
    pub about: String,
    #[sea_orm(unique)]
    pub email: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::forum_user::Entity")]
    ForumUser,
}

impl Related<super::forum_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ForumUser.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
