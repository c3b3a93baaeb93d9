use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use forum_core::{
    error::ErrorKind,
    models::paging::PageError,
    service::{
        admin::AdminServiceError, forums::ForumsServiceError, posts::PostsServiceError,
        threads::ThreadsServiceError, users::UsersServiceError,
    },
};

/// A failed request: the error class decides the status, `body` is sent as
/// is.
#[derive(Debug)]
pub struct ApiError {
    kind: ErrorKind,
    body: Value,
}

impl ApiError {
    pub fn message(kind: ErrorKind, message: impl std::fmt::Display) -> Self {
        Self {
            kind,
            body: json!({ "message": message.to_string() }),
        }
    }

    /// 409 whose body is the entity already holding the key.
    pub fn conflict(existing: impl Serialize) -> Self {
        let body = serde_json::to_value(existing)
            .unwrap_or_else(|err| json!({ "message": err.to_string() }));
        Self {
            kind: ErrorKind::AlreadyExists,
            body,
        }
    }

    pub fn malformed(message: impl std::fmt::Display) -> Self {
        Self::message(ErrorKind::MalformedInput, message)
    }
}

pub fn status(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound | ErrorKind::AuthorNotFound => StatusCode::NOT_FOUND,
        ErrorKind::AlreadyExists | ErrorKind::UpdateConflict | ErrorKind::InvalidParent => {
            StatusCode::CONFLICT
        }
        ErrorKind::MalformedInput => StatusCode::BAD_REQUEST,
        ErrorKind::StorageFailure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (status(self.kind), Json(self.body)).into_response()
    }
}

// Storage failures are logged with their cause; clients only see the
// top-level message.
fn storage(err: impl std::error::Error) -> ApiError {
    let cause = err.source().map(ToString::to_string).unwrap_or_default();
    error!(error = %err, %cause, "storage failure");
    ApiError::message(ErrorKind::StorageFailure, err)
}

impl From<UsersServiceError> for ApiError {
    fn from(err: UsersServiceError) -> Self {
        match err {
            UsersServiceError::AlreadyExists(users) => ApiError::conflict(users),
            UsersServiceError::DbError(_) => storage(err),
            other => ApiError::message(other.kind(), other),
        }
    }
}

impl From<ForumsServiceError> for ApiError {
    fn from(err: ForumsServiceError) -> Self {
        match err {
            ForumsServiceError::AlreadyExists(forum) => ApiError::conflict(forum),
            ForumsServiceError::ThreadAlreadyExists(thread) => ApiError::conflict(thread),
            ForumsServiceError::DbError(_) => storage(err),
            other => ApiError::message(other.kind(), other),
        }
    }
}

impl From<ThreadsServiceError> for ApiError {
    fn from(err: ThreadsServiceError) -> Self {
        match err {
            ThreadsServiceError::DbError(_) => storage(err),
            other => ApiError::message(other.kind(), other),
        }
    }
}

impl From<PostsServiceError> for ApiError {
    fn from(err: PostsServiceError) -> Self {
        match err {
            PostsServiceError::DbError(_) => storage(err),
            other => ApiError::message(other.kind(), other),
        }
    }
}

impl From<AdminServiceError> for ApiError {
    fn from(err: AdminServiceError) -> Self {
        storage(err)
    }
}

impl From<PageError> for ApiError {
    fn from(err: PageError) -> Self {
        ApiError::message(err.kind(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_its_status() {
        let expected = [
            (ErrorKind::NotFound, 404),
            (ErrorKind::AuthorNotFound, 404),
            (ErrorKind::AlreadyExists, 409),
            (ErrorKind::UpdateConflict, 409),
            (ErrorKind::InvalidParent, 409),
            (ErrorKind::MalformedInput, 400),
            (ErrorKind::StorageFailure, 500),
        ];
        for (kind, code) in expected {
            assert_eq!(status(kind).as_u16(), code, "{kind}");
        }
    }

    #[test]
    fn test_page_errors_are_bad_requests() {
        let err = ApiError::from(PageError::Sort("sideways".to_owned()));
        assert_eq!(err.kind, ErrorKind::MalformedInput);
        assert_eq!(err.body["message"], "unknown sort mode `sideways`");
    }
}
