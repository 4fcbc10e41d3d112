//! Entity models: each operation is one or more round trips to the store.
//!
//! Every operation accepts anything that can hand out a Postgres connection
//! (`&PgPool`, `&mut PgConnection`, `&mut Transaction`), so tests can run a
//! whole scenario inside a transaction and roll it back.

use thiserror::Error;

use crate::auth::password::PasswordError;
use crate::filter::FilterError;

pub mod company;
pub mod job;
pub mod user;

pub use company::{Company, CompanyDetail};
pub use job::{Job, JobDetail, JobSummary};
pub use user::{User, UserWithJobs};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    PasswordHash(String),
}

impl From<PasswordError> for ModelError {
    fn from(err: PasswordError) -> Self {
        ModelError::PasswordHash(err.to_string())
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

pub(crate) fn is_check_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_check_violation())
}
