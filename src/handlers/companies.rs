use axum::extract::{Path, State};

use crate::extract::{SearchParams, ValidatedJson};
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Company, CompanyDetail};
use crate::schemas::{validate_params, CompanySearch, CompanyUpdate, NewCompany};
use crate::AppState;

/// POST /companies (admin)
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<NewCompany>,
) -> ApiResult<Company> {
    let company = Company::create(&state.pool, body).await?;
    Ok(ApiResponse::created("company", company))
}

/// GET /companies?name=&minEmployees=&maxEmployees=
pub async fn list(State(state): State<AppState>, SearchParams(params): SearchParams) -> ApiResult<Vec<Company>> {
    validate_params::<CompanySearch>(&params)?;

    let companies = Company::find_all(&state.pool, &params).await?;
    Ok(ApiResponse::success("companies", companies))
}

/// GET /companies/:handle
pub async fn get(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<CompanyDetail> {
    let company = Company::get(&state.pool, &handle).await?;
    Ok(ApiResponse::success("company", company))
}

/// PATCH /companies/:handle (admin)
pub async fn update(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    ValidatedJson(body): ValidatedJson<CompanyUpdate>,
) -> ApiResult<Company> {
    let company = Company::update(&state.pool, &handle, body).await?;
    Ok(ApiResponse::success("company", company))
}

/// DELETE /companies/:handle (admin)
pub async fn remove(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<String> {
    Company::remove(&state.pool, &handle).await?;
    Ok(ApiResponse::success("deleted", handle))
}
