use sea_orm::{DatabaseConnection, IntoActiveModel};
use thiserror::Error;
use tracing::info;

use super::{violation, Violation, WriteGate};
use crate::{
    entity::prelude::*,
    error::ErrorKind,
    models::requests::{ProfileUpdate, UserProfile},
};

#[derive(Debug, Error)]
pub enum UsersServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),

    #[error("user not found")]
    UserNotFound,

    /// Every user holding the requested nickname or email.
    #[error("user already exists")]
    AlreadyExists(Vec<UserModel>),

    #[error("email is taken by another user")]
    UpdateConflict,
}

impl UsersServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UsersServiceError::DbError(_) => ErrorKind::StorageFailure,
            UsersServiceError::UserNotFound => ErrorKind::NotFound,
            UsersServiceError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            UsersServiceError::UpdateConflict => ErrorKind::UpdateConflict,
        }
    }
}

#[derive(Clone)]
pub struct UsersService {
    db: DatabaseConnection,
    gate: WriteGate,
}

impl UsersService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_gate(db, WriteGate::default())
    }

    pub fn with_gate(db: DatabaseConnection, gate: WriteGate) -> Self {
        Self { db, gate }
    }

    /// Register a new user. On a nickname or email collision the conflicting
    /// users are handed back instead.
    pub async fn create_user(
        &self,
        nickname: &str,
        profile: UserProfile,
    ) -> Result<UserModel, UsersServiceError> {
        let user = UserActiveModel {
            nickname: Set(nickname.to_owned()),
            fullname: Set(profile.fullname),
            about: Set(profile.about),
            email: Set(profile.email.clone()),
        };

        let _write = self.gate.enter().await;
        match User::insert(user).exec_with_returning(&self.db).await {
            Ok(user) => {
                info!(nickname = %user.nickname, "created user");
                Ok(user)
            }
            Err(err) if violation(&err) == Some(Violation::Unique) => {
                let existing = self.list_profiles_matching(nickname, &profile.email).await?;
                Err(UsersServiceError::AlreadyExists(existing))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn get_profile(&self, nickname: &str) -> Result<UserModel, UsersServiceError> {
        User::find_by_id(nickname)
            .one(&self.db)
            .await?
            .ok_or(UsersServiceError::UserNotFound)
    }

    /// Overwrite the fields `patch` carries; absent or empty ones are kept.
    pub async fn update_profile(
        &self,
        nickname: &str,
        patch: ProfileUpdate,
    ) -> Result<UserModel, UsersServiceError> {
        let _write = self.gate.enter().await;
        let user = self.get_profile(nickname).await?;

        if let Some(email) = patch.email() {
            let taken = User::find()
                .filter(UserColumn::Email.eq(email))
                .filter(UserColumn::Nickname.ne(nickname))
                .count(&self.db)
                .await?;
            if taken > 0 {
                return Err(UsersServiceError::UpdateConflict);
            }
        }

        if patch.is_empty() {
            return Ok(user);
        }

        let mut active = user.into_active_model();
        if let Some(fullname) = patch.fullname() {
            active.fullname = Set(fullname.to_owned());
        }
        if let Some(about) = patch.about() {
            active.about = Set(about.to_owned());
        }
        if let Some(email) = patch.email() {
            active.email = Set(email.to_owned());
        }

        match active.update(&self.db).await {
            Ok(user) => Ok(user),
            Err(err) if violation(&err) == Some(Violation::Unique) => {
                Err(UsersServiceError::UpdateConflict)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Users whose nickname or email equals the given one, by nickname.
    pub async fn list_profiles_matching(
        &self,
        nickname: &str,
        email: &str,
    ) -> Result<Vec<UserModel>, UsersServiceError> {
        let users = User::find()
            .filter(
                Condition::any()
                    .add(UserColumn::Nickname.eq(nickname))
                    .add(UserColumn::Email.eq(email)),
            )
            .order_by_asc(UserColumn::Nickname)
            .all(&self.db)
            .await?;

        Ok(users)
    }

    /// True if any user holds `nickname` or `email`. Pass an empty string
    /// to check only the other one.
    pub async fn exists(&self, nickname: &str, email: &str) -> Result<bool, UsersServiceError> {
        let matching = User::find()
            .filter(
                Condition::any()
                    .add(UserColumn::Nickname.eq(nickname))
                    .add(UserColumn::Email.eq(email)),
            )
            .count(&self.db)
            .await?;

        Ok(matching > 0)
    }
}
