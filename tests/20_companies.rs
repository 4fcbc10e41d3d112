#[macro_use]
mod common;

use anyhow::Result;
use serde_json::json;

use jobly_api::auth::PasswordHasher;
use jobly_api::filter::coerce_query_params;
use jobly_api::models::{Company, ModelError};
use jobly_api::schemas::CompanyUpdate;

fn params(pairs: &[(&str, &str)]) -> jobly_api::filter::FilterParams {
    coerce_query_params(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
}

#[tokio::test]
async fn create_rejects_duplicate_handle() -> Result<()> {
    let pool = pool_or_skip!();
    let mut tx = pool.begin().await?;

    let created = Company::create(&mut *tx, common::new_company("dup", "Dup", Some(5))).await?;
    assert_eq!(created.handle, "dup");
    assert_eq!(created.num_employees, Some(5));

    let err = Company::create(&mut *tx, common::new_company("dup", "Dup Again", None))
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::BadRequest(ref m) if m == "Duplicate company: dup"));

    tx.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn create_rejects_uppercase_handle() -> Result<()> {
    let pool = pool_or_skip!();
    let mut tx = pool.begin().await?;

    let err = Company::create(&mut *tx, common::new_company("PC2", "Upper", None))
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::BadRequest(ref m) if m == "Invalid company: PC2"));

    tx.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn find_all_filters_by_name_and_size() -> Result<()> {
    let pool = pool_or_skip!();
    let mut tx = pool.begin().await?;
    common::seed(&mut tx, &PasswordHasher::new(1)?).await?;

    let handles = |companies: Vec<Company>| {
        companies
            .into_iter()
            .filter(|c| c.handle.starts_with('c') && c.handle.len() == 2)
            .map(|c| c.handle)
            .collect::<Vec<_>>()
    };

    let all = Company::find_all(&mut *tx, &params(&[])).await?;
    assert_eq!(handles(all), vec!["c1", "c2", "c3"]);

    let by_name = Company::find_all(&mut *tx, &params(&[("name", "C1")])).await?;
    assert_eq!(handles(by_name), vec!["c1"]);

    let ranged = Company::find_all(&mut *tx, &params(&[("minEmployees", "2"), ("maxEmployees", "3")])).await?;
    assert_eq!(handles(ranged), vec!["c2", "c3"]);

    let none = Company::find_all(&mut *tx, &params(&[("name", "zzz-no-match")])).await?;
    assert!(none.is_empty());

    let err = Company::find_all(&mut *tx, &params(&[("minEmployees", "3"), ("maxEmployees", "1")]))
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::Filter(_)));

    tx.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn get_includes_jobs() -> Result<()> {
    let pool = pool_or_skip!();
    let mut tx = pool.begin().await?;
    let seed = common::seed(&mut tx, &PasswordHasher::new(1)?).await?;

    let detail = Company::get(&mut *tx, "c1").await?;
    assert_eq!(detail.company.name, "C1");
    let ids: Vec<i32> = detail.jobs.iter().map(|j| j.id).collect();
    assert_eq!(ids, seed.job_ids);

    let body = serde_json::to_value(&detail)?;
    assert_eq!(body["numEmployees"], json!(1));
    assert_eq!(body["jobs"][0]["title"], "J1");

    let err = Company::get(&mut *tx, "nope").await.unwrap_err();
    assert!(matches!(err, ModelError::NotFound(ref m) if m == "No company: nope"));

    tx.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn update_and_remove() -> Result<()> {
    let pool = pool_or_skip!();
    let mut tx = pool.begin().await?;
    common::seed(&mut tx, &PasswordHasher::new(1)?).await?;

    let updated = Company::update(
        &mut *tx,
        "c1",
        CompanyUpdate {
            name: Some("Renamed".into()),
            num_employees: Some(10),
            logo_url: Some("http://new.img".into()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.num_employees, Some(10));
    assert_eq!(updated.description, "Desc C1");

    let err = Company::update(&mut *tx, "c1", CompanyUpdate::default()).await.unwrap_err();
    assert!(matches!(err, ModelError::BadRequest(ref m) if m == "No data"));

    let err = Company::update(
        &mut *tx,
        "nope",
        CompanyUpdate {
            name: Some("x".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ModelError::NotFound(_)));

    Company::remove(&mut *tx, "c2").await?;
    assert!(matches!(Company::get(&mut *tx, "c2").await, Err(ModelError::NotFound(_))));
    assert!(matches!(Company::remove(&mut *tx, "c2").await, Err(ModelError::NotFound(_))));

    tx.rollback().await?;
    Ok(())
}
