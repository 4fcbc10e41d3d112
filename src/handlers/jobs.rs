use axum::extract::State;

use crate::extract::{JobId, SearchParams, ValidatedJson};
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Job, JobDetail};
use crate::schemas::{validate_params, JobSearch, JobUpdate, NewJob};
use crate::AppState;

/// POST /jobs (admin)
pub async fn create(State(state): State<AppState>, ValidatedJson(body): ValidatedJson<NewJob>) -> ApiResult<Job> {
    let job = Job::create(&state.pool, body).await?;
    Ok(ApiResponse::created("job", job))
}

/// GET /jobs?title=&minSalary=&hasEquity=
pub async fn list(State(state): State<AppState>, SearchParams(params): SearchParams) -> ApiResult<Vec<Job>> {
    validate_params::<JobSearch>(&params)?;

    let jobs = Job::find_all(&state.pool, &params).await?;
    Ok(ApiResponse::success("jobs", jobs))
}

/// GET /jobs/:id
pub async fn get(State(state): State<AppState>, JobId(id): JobId) -> ApiResult<JobDetail> {
    let job = Job::get(&state.pool, id).await?;
    Ok(ApiResponse::success("job", job))
}

/// PATCH /jobs/:id (admin)
pub async fn update(
    State(state): State<AppState>,
    JobId(id): JobId,
    ValidatedJson(body): ValidatedJson<JobUpdate>,
) -> ApiResult<Job> {
    let job = Job::update(&state.pool, id, body).await?;
    Ok(ApiResponse::success("job", job))
}

/// DELETE /jobs/:id (admin)
pub async fn remove(State(state): State<AppState>, JobId(id): JobId) -> ApiResult<i32> {
    Job::remove(&state.pool, id).await?;
    Ok(ApiResponse::success("deleted", id))
}
