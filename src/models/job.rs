use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{Acquire, FromRow, Postgres};

use super::company::Company;
use super::{is_foreign_key_violation, ModelError};
use crate::database::params::{bind_param_query_as, SqlParam};
use crate::database::{sql_for_partial_update, ColumnMap};
use crate::filter::{job_filter, FilterParams};
use crate::schemas::{JobUpdate, NewJob};

pub const JOB_COLUMNS: ColumnMap = &[("companyHandle", "company_handle")];

const SELECT_COLUMNS: &str = "id, title, salary, equity, company_handle";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// Job as listed under its company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JobSummary {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
}

/// Job with its company embedded in place of the handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDetail {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company: Company,
}

impl Job {
    pub async fn create<'c, A>(db: A, data: NewJob) -> Result<Job, ModelError>
    where
        A: Acquire<'c, Database = Postgres>,
    {
        let mut conn = db.acquire().await?;

        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) VALUES ($1, $2, $3, $4) RETURNING {}",
            SELECT_COLUMNS
        );
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(&data.title)
            .bind(data.salary)
            .bind(data.equity)
            .bind(&data.company_handle)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    ModelError::BadRequest(format!("No company: {}", data.company_handle))
                } else {
                    e.into()
                }
            })?;

        tracing::info!(id = job.id, company = %job.company_handle, "job created");
        Ok(job)
    }

    /// Jobs ordered by title, optionally narrowed by `title`, `minSalary`
    /// and `hasEquity`. A filtered search matching nothing is not found; the
    /// unfiltered listing may be empty.
    pub async fn find_all<'c, A>(db: A, params: &FilterParams) -> Result<Vec<Job>, ModelError>
    where
        A: Acquire<'c, Database = Postgres>,
    {
        let filter = job_filter(params);
        let mut conn = db.acquire().await?;

        let Some(clause) = filter else {
            let sql = format!("SELECT {} FROM jobs ORDER BY title, id", SELECT_COLUMNS);
            return Ok(sqlx::query_as::<_, Job>(&sql).fetch_all(&mut *conn).await?);
        };

        let sql = format!("SELECT {} FROM jobs WHERE {} ORDER BY title, id", SELECT_COLUMNS, clause.sql);
        let mut q = sqlx::query_as::<_, Job>(&sql);
        for p in clause.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let jobs = q.fetch_all(&mut *conn).await?;

        if jobs.is_empty() {
            return Err(ModelError::NotFound("No jobs found".to_string()));
        }
        Ok(jobs)
    }

    pub async fn get<'c, A>(db: A, id: i32) -> Result<JobDetail, ModelError>
    where
        A: Acquire<'c, Database = Postgres>,
    {
        let mut conn = db.acquire().await?;

        let sql = format!("SELECT {} FROM jobs WHERE id = $1", SELECT_COLUMNS);
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| ModelError::NotFound(format!("No job: {}", id)))?;

        let company = sqlx::query_as::<_, Company>(
            "SELECT handle, name, description, num_employees, logo_url FROM companies WHERE handle = $1",
        )
        .bind(&job.company_handle)
        .fetch_one(&mut *conn)
        .await?;

        Ok(JobDetail {
            id: job.id,
            title: job.title,
            salary: job.salary,
            equity: job.equity,
            company,
        })
    }

    pub async fn update<'c, A>(db: A, id: i32, data: JobUpdate) -> Result<Job, ModelError>
    where
        A: Acquire<'c, Database = Postgres>,
    {
        let update = sql_for_partial_update(data.into_updates(), JOB_COLUMNS)?;
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING {}",
            update.set_cols,
            update.key_index(),
            SELECT_COLUMNS
        );
        tracing::debug!(%sql, "updating job");

        let mut conn = db.acquire().await?;
        let mut q = sqlx::query_as::<_, Job>(&sql);
        for p in update.values.iter() {
            q = bind_param_query_as(q, p);
        }
        q = bind_param_query_as(q, &SqlParam::from(id));

        q.fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| ModelError::NotFound(format!("No job: {}", id)))
    }

    pub async fn remove<'c, A>(db: A, id: i32) -> Result<(), ModelError>
    where
        A: Acquire<'c, Database = Postgres>,
    {
        let mut conn = db.acquire().await?;

        sqlx::query_scalar::<_, i32>("DELETE FROM jobs WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| ModelError::NotFound(format!("No job: {}", id)))?;

        tracing::info!(id, "job removed");
        Ok(())
    }
}
