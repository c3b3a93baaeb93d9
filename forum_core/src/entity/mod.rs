// SeaORM entities
// One module per table created by `models::migrator`.

pub mod forum;
pub mod forum_user;
pub mod post;
pub mod thread;
pub mod user;
pub mod vote;

#[cfg(test)]
mod tests;

pub mod prelude {
    // Re-export all entities for convenience
    pub use super::forum::{
        ActiveModel as ForumActiveModel, Column as ForumColumn, Entity as Forum,
        Model as ForumModel,
    };
    pub use super::forum_user::{
        ActiveModel as ForumUserActiveModel, Column as ForumUserColumn, Entity as ForumUser,
        Model as ForumUserModel,
    };
    pub use super::post::{
        ActiveModel as PostActiveModel, Column as PostColumn, Entity as Post,
        Model as PostModel,
    };
    pub use super::thread::{
        ActiveModel as ThreadActiveModel, Column as ThreadColumn, Entity as Thread,
        Model as ThreadModel,
    };
    pub use super::user::{
        ActiveModel as UserActiveModel, Column as UserColumn, Entity as User,
        Model as UserModel,
    };
    pub use super::vote::{
        ActiveModel as VoteActiveModel, Column as VoteColumn, Entity as Vote,
        Model as VoteModel,
    };

    // Re-export commonly used SeaORM types and traits
    pub use sea_orm::{
        sea_query::{Expr, OnConflict},
        ActiveModelTrait,
        ActiveValue,

        ColumnTrait,
        Condition,
        ConnectionTrait,

        // Database and connection types
        Database,
        DatabaseConnection,
        DatabaseTransaction,
        // Common result types
        DbErr,

        // Core traits
        EntityTrait,
        JoinType,
        ModelTrait,
        NotSet,
        Order,
        PaginatorTrait,
        QueryFilter,
        QueryOrder,
        QuerySelect,
        RelationTrait,
        // Active model helpers
        Set,
        SqlErr,
        TransactionTrait,

        Unchanged,
    };
}
