use serde::Serialize;
use std::fmt;

/// Failure classes every service error collapses into. Transports map these
/// onto their own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    AuthorNotFound,
    InvalidParent,
    UpdateConflict,
    MalformedInput,
    StorageFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::AlreadyExists => "already exists",
            ErrorKind::AuthorNotFound => "author not found",
            ErrorKind::InvalidParent => "invalid parent",
            ErrorKind::UpdateConflict => "update conflict",
            ErrorKind::MalformedInput => "malformed input",
            ErrorKind::StorageFailure => "storage failure",
        };
        f.write_str(name)
    }
}
