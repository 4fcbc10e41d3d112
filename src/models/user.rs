use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sqlx::{Acquire, FromRow, Postgres};

use super::{is_unique_violation, ModelError};
use crate::auth::PasswordHasher;
use crate::database::params::{bind_param_query_as, SqlParam};
use crate::database::{sql_for_partial_update, ColumnMap, FieldUpdates};
use crate::schemas::{NewUser, UserUpdate};

pub const USER_COLUMNS: ColumnMap = &[
    ("firstName", "first_name"),
    ("lastName", "last_name"),
    ("isAdmin", "is_admin"),
];

const SELECT_COLUMNS: &str = "username, first_name, last_name, email, is_admin";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

/// User plus the ids of the jobs they applied to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserWithJobs {
    #[serde(flatten)]
    pub user: User,
    pub jobs: Vec<i32>,
}

#[derive(Debug, FromRow)]
struct UserWithPassword {
    #[sqlx(flatten)]
    user: User,
    password: String,
}

/// One row of users LEFT JOIN applications.
#[derive(Debug, Clone, FromRow)]
pub struct UserJobRow {
    #[sqlx(flatten)]
    pub user: User,
    pub job_id: Option<i32>,
}

/// Fold joined rows into one entry per user, in encounter order, collecting
/// each user's job ids. Rows need not be adjacent per user.
pub fn group_applications(rows: Vec<UserJobRow>) -> Vec<UserWithJobs> {
    let mut grouped: IndexMap<String, UserWithJobs> = IndexMap::new();

    for row in rows {
        let entry = grouped
            .entry(row.user.username.clone())
            .or_insert_with(|| UserWithJobs { user: row.user, jobs: Vec::new() });
        if let Some(job_id) = row.job_id {
            entry.jobs.push(job_id);
        }
    }

    grouped.into_values().collect()
}

impl User {
    /// Check credentials; any mismatch is the same unauthorized error.
    pub async fn authenticate<'c, A>(
        db: A,
        hasher: &PasswordHasher,
        username: &str,
        password: &str,
    ) -> Result<User, ModelError>
    where
        A: Acquire<'c, Database = Postgres>,
    {
        let mut conn = db.acquire().await?;

        let sql = format!("SELECT {}, password FROM users WHERE username = $1", SELECT_COLUMNS);
        let found = sqlx::query_as::<_, UserWithPassword>(&sql)
            .bind(username)
            .fetch_optional(&mut *conn)
            .await?;

        match found {
            Some(row) if hasher.verify_password(password, &row.password) => Ok(row.user),
            _ => {
                tracing::warn!(%username, "failed login attempt");
                Err(ModelError::Unauthorized("Invalid username/password".to_string()))
            }
        }
    }

    /// Create a user with a hashed password; a taken username is a bad request.
    pub async fn register<'c, A>(db: A, hasher: &PasswordHasher, data: NewUser) -> Result<User, ModelError>
    where
        A: Acquire<'c, Database = Postgres>,
    {
        let mut conn = db.acquire().await?;

        let duplicate = sqlx::query_scalar::<_, String>("SELECT username FROM users WHERE username = $1")
            .bind(&data.username)
            .fetch_optional(&mut *conn)
            .await?;
        if duplicate.is_some() {
            return Err(ModelError::BadRequest(format!("Duplicate username: {}", data.username)));
        }

        let hashed_password = hasher.hash_password(&data.password)?;

        let sql = format!(
            "INSERT INTO users (username, password, first_name, last_name, email, is_admin) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            SELECT_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&data.username)
            .bind(&hashed_password)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(&data.email)
            .bind(data.is_admin)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ModelError::BadRequest(format!("Duplicate username: {}", data.username))
                } else {
                    e.into()
                }
            })?;

        tracing::info!(username = %user.username, is_admin = user.is_admin, "user registered");
        Ok(user)
    }

    /// All users ordered by username, each with the jobs they applied to.
    pub async fn find_all<'c, A>(db: A) -> Result<Vec<UserWithJobs>, ModelError>
    where
        A: Acquire<'c, Database = Postgres>,
    {
        let mut conn = db.acquire().await?;

        let rows = sqlx::query_as::<_, UserJobRow>(
            "SELECT u.username, u.first_name, u.last_name, u.email, u.is_admin, a.job_id \
             FROM users AS u \
             LEFT JOIN applications AS a ON a.username = u.username \
             ORDER BY u.username, a.job_id",
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(group_applications(rows))
    }

    pub async fn get<'c, A>(db: A, username: &str) -> Result<UserWithJobs, ModelError>
    where
        A: Acquire<'c, Database = Postgres>,
    {
        let mut conn = db.acquire().await?;

        let sql = format!("SELECT {} FROM users WHERE username = $1", SELECT_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| ModelError::NotFound(format!("No user: {}", username)))?;

        let jobs = sqlx::query_scalar::<_, i32>(
            "SELECT job_id FROM applications WHERE username = $1 ORDER BY job_id",
        )
        .bind(username)
        .fetch_all(&mut *conn)
        .await?;

        Ok(UserWithJobs { user, jobs })
    }

    /// Partial update; a new password is hashed before it is stored.
    pub async fn update<'c, A>(
        db: A,
        hasher: &PasswordHasher,
        username: &str,
        data: UserUpdate,
    ) -> Result<User, ModelError>
    where
        A: Acquire<'c, Database = Postgres>,
    {
        let mut updates = FieldUpdates::new();
        if let Some(password) = data.password {
            updates.insert("password".into(), SqlParam::from(hasher.hash_password(&password)?));
        }
        if let Some(v) = data.first_name {
            updates.insert("firstName".into(), SqlParam::from(v));
        }
        if let Some(v) = data.last_name {
            updates.insert("lastName".into(), SqlParam::from(v));
        }
        if let Some(v) = data.email {
            updates.insert("email".into(), SqlParam::from(v));
        }

        let update = sql_for_partial_update(updates, USER_COLUMNS)?;
        let sql = format!(
            "UPDATE users SET {} WHERE username = ${} RETURNING {}",
            update.set_cols,
            update.key_index(),
            SELECT_COLUMNS
        );

        let mut conn = db.acquire().await?;
        let mut q = sqlx::query_as::<_, User>(&sql);
        for p in update.values.iter() {
            q = bind_param_query_as(q, p);
        }
        q = bind_param_query_as(q, &SqlParam::from(username));

        q.fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| ModelError::NotFound(format!("No user: {}", username)))
    }

    pub async fn remove<'c, A>(db: A, username: &str) -> Result<(), ModelError>
    where
        A: Acquire<'c, Database = Postgres>,
    {
        let mut conn = db.acquire().await?;

        sqlx::query_scalar::<_, String>("DELETE FROM users WHERE username = $1 RETURNING username")
            .bind(username)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| ModelError::NotFound(format!("No user: {}", username)))?;

        tracing::info!(%username, "user removed");
        Ok(())
    }

    /// Record that `username` applied to job `job_id`.
    pub async fn apply_to_job<'c, A>(db: A, username: &str, job_id: i32) -> Result<(), ModelError>
    where
        A: Acquire<'c, Database = Postgres>,
    {
        let mut conn = db.acquire().await?;

        sqlx::query_scalar::<_, i32>("SELECT id FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| ModelError::NotFound(format!("No job: {}", job_id)))?;

        sqlx::query_scalar::<_, String>("SELECT username FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| ModelError::NotFound(format!("No username: {}", username)))?;

        sqlx::query("INSERT INTO applications (job_id, username) VALUES ($1, $2)")
            .bind(job_id)
            .bind(username)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ModelError::BadRequest(format!("Already applied to job: {}", job_id))
                } else {
                    e.into()
                }
            })?;

        tracing::info!(%username, job_id, "application recorded");
        Ok(())
    }
}
