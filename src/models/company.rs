use serde::{Deserialize, Serialize};
use sqlx::{Acquire, FromRow, Postgres};

use super::job::JobSummary;
use super::{is_check_violation, is_unique_violation, ModelError};
use crate::database::params::{bind_param_query_as, SqlParam};
use crate::database::{sql_for_partial_update, ColumnMap};
use crate::filter::{company_filter, FilterParams};
use crate::schemas::{CompanyUpdate, NewCompany};

/// Public field names that differ from their column names.
pub const COMPANY_COLUMNS: ColumnMap = &[("numEmployees", "num_employees"), ("logoUrl", "logo_url")];

const SELECT_COLUMNS: &str = "handle, name, description, num_employees, logo_url";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// Company with the jobs it has posted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<JobSummary>,
}

impl Company {
    /// Insert a company; a taken handle is a bad request.
    pub async fn create<'c, A>(db: A, data: NewCompany) -> Result<Company, ModelError>
    where
        A: Acquire<'c, Database = Postgres>,
    {
        let mut conn = db.acquire().await?;

        let duplicate = sqlx::query_scalar::<_, String>("SELECT handle FROM companies WHERE handle = $1")
            .bind(&data.handle)
            .fetch_optional(&mut *conn)
            .await?;
        if duplicate.is_some() {
            return Err(ModelError::BadRequest(format!("Duplicate company: {}", data.handle)));
        }

        let sql = format!(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            SELECT_COLUMNS
        );
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(&data.handle)
            .bind(&data.name)
            .bind(&data.description)
            .bind(data.num_employees)
            .bind(&data.logo_url)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| {
                // name is unique too
                if is_unique_violation(&e) {
                    ModelError::BadRequest(format!("Duplicate company: {}", data.name))
                } else if is_check_violation(&e) {
                    ModelError::BadRequest(format!("Invalid company: {}", data.handle))
                } else {
                    e.into()
                }
            })?;

        tracing::info!(handle = %company.handle, "company created");
        Ok(company)
    }

    /// All companies ordered by name, optionally narrowed by `name`,
    /// `minEmployees` and `maxEmployees`. No match is an empty list.
    pub async fn find_all<'c, A>(db: A, params: &FilterParams) -> Result<Vec<Company>, ModelError>
    where
        A: Acquire<'c, Database = Postgres>,
    {
        let filter = company_filter(params)?;
        let mut conn = db.acquire().await?;

        let companies = match filter {
            None => {
                let sql = format!("SELECT {} FROM companies ORDER BY name", SELECT_COLUMNS);
                sqlx::query_as::<_, Company>(&sql).fetch_all(&mut *conn).await?
            }
            Some(clause) => {
                let sql = format!(
                    "SELECT {} FROM companies WHERE {} ORDER BY name",
                    SELECT_COLUMNS, clause.sql
                );
                let mut q = sqlx::query_as::<_, Company>(&sql);
                for p in clause.params.iter() {
                    q = bind_param_query_as(q, p);
                }
                q.fetch_all(&mut *conn).await?
            }
        };

        Ok(companies)
    }

    pub async fn get<'c, A>(db: A, handle: &str) -> Result<CompanyDetail, ModelError>
    where
        A: Acquire<'c, Database = Postgres>,
    {
        let mut conn = db.acquire().await?;

        let sql = format!("SELECT {} FROM companies WHERE handle = $1", SELECT_COLUMNS);
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(handle)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| ModelError::NotFound(format!("No company: {}", handle)))?;

        let jobs = sqlx::query_as::<_, JobSummary>(
            "SELECT id, title, salary, equity FROM jobs WHERE company_handle = $1 ORDER BY id",
        )
        .bind(handle)
        .fetch_all(&mut *conn)
        .await?;

        Ok(CompanyDetail { company, jobs })
    }

    /// Partial update of the supplied fields; an empty update fails before
    /// touching the store.
    pub async fn update<'c, A>(db: A, handle: &str, data: CompanyUpdate) -> Result<Company, ModelError>
    where
        A: Acquire<'c, Database = Postgres>,
    {
        let update = sql_for_partial_update(data.into_updates(), COMPANY_COLUMNS)?;
        let sql = format!(
            "UPDATE companies SET {} WHERE handle = ${} RETURNING {}",
            update.set_cols,
            update.key_index(),
            SELECT_COLUMNS
        );
        tracing::debug!(%sql, "updating company");

        let mut conn = db.acquire().await?;
        let mut q = sqlx::query_as::<_, Company>(&sql);
        for p in update.values.iter() {
            q = bind_param_query_as(q, p);
        }
        q = bind_param_query_as(q, &SqlParam::from(handle));

        q.fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ModelError::BadRequest("Duplicate company name".to_string())
                } else {
                    e.into()
                }
            })?
            .ok_or_else(|| ModelError::NotFound(format!("No company: {}", handle)))
    }

    pub async fn remove<'c, A>(db: A, handle: &str) -> Result<(), ModelError>
    where
        A: Acquire<'c, Database = Postgres>,
    {
        let mut conn = db.acquire().await?;

        sqlx::query_scalar::<_, String>("DELETE FROM companies WHERE handle = $1 RETURNING handle")
            .bind(handle)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| ModelError::NotFound(format!("No company: {}", handle)))?;

        tracing::info!(%handle, "company removed");
        Ok(())
    }
}
