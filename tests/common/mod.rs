#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use sqlx::PgPool;

use jobly_api::auth::create_token;
use jobly_api::config::{test_database_url, AppConfig};
use jobly_api::database::{DatabaseManager, MIGRATOR};
use jobly_api::models::{Company, Job, User};
use jobly_api::schemas::{NewCompany, NewJob, NewUser};
use jobly_api::{app, AppState};

/// Bind a migrated test pool or return early from an `anyhow::Result` test.
#[allow(unused_macros)]
macro_rules! pool_or_skip {
    () => {
        match common::test_pool().await {
            Some(pool) => pool,
            None => return Ok(()),
        }
    };
}

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub config: AppConfig,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn token(&self, username: &str, is_admin: bool) -> String {
        create_token(username, is_admin, &self.config.security).expect("sign test token")
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = client.get(self.url("/health")).send().await {
                // any envelope means the router is up, store or no store
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Test configuration, honoring DATABASE_URL but always on the test database.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::test();
    if let Ok(url) = std::env::var("DATABASE_URL") {
        config.database.url = test_database_url(&url).unwrap_or(url);
    }
    config.database.connection_timeout = 3;
    config
}

/// Serve the app in-process on a free port. The pool is lazy, so routes that
/// never reach the store work without a database.
pub async fn spawn_app() -> Result<TestServer> {
    let config = test_config();
    let pool = DatabaseManager::connect_lazy(&config.database)?;
    let state = AppState::new(pool, config.clone())?;

    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app(state)).await;
    });

    let server = TestServer {
        port,
        base_url: format!("http://127.0.0.1:{}", port),
        config,
    };
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Migrated pool on the test database, or `None` (and a note on stderr) when
/// it is unreachable so store-backed tests can skip.
pub async fn test_pool() -> Option<PgPool> {
    let config = test_config();
    let pool = match DatabaseManager::connect(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("skipping: test database unavailable ({})", e);
            return None;
        }
    };
    if let Err(e) = MIGRATOR.run(&pool).await {
        eprintln!("skipping: test database migration failed ({})", e);
        return None;
    }
    Some(pool)
}

pub fn new_company(handle: &str, name: &str, num_employees: Option<i32>) -> NewCompany {
    NewCompany {
        handle: handle.to_string(),
        name: name.to_string(),
        description: format!("Desc {}", name),
        num_employees,
        logo_url: None,
    }
}

pub fn new_user(username: &str, is_admin: bool) -> NewUser {
    NewUser {
        username: username.to_string(),
        password: "password1".to_string(),
        first_name: "First".to_string(),
        last_name: "Last".to_string(),
        email: format!("{}@example.com", username),
        is_admin,
    }
}

pub fn new_job(title: &str, salary: Option<i32>, equity: Option<&str>, company_handle: &str) -> NewJob {
    NewJob {
        title: title.to_string(),
        salary,
        equity: equity.map(|e| e.parse().expect("decimal literal")),
        company_handle: company_handle.to_string(),
    }
}

/// Fixture rows shared by the store-backed suites, created inside the
/// caller's transaction: companies c1..c3, jobs j1..j3 and users u1, u2.
pub struct Seed {
    pub job_ids: Vec<i32>,
}

pub async fn seed(tx: &mut sqlx::PgConnection, hasher: &jobly_api::auth::PasswordHasher) -> Result<Seed> {
    for (handle, name, employees) in [("c1", "C1", 1), ("c2", "C2", 2), ("c3", "C3", 3)] {
        Company::create(&mut *tx, new_company(handle, name, Some(employees))).await?;
    }

    let mut job_ids = Vec::new();
    for job in [
        new_job("J1", Some(1), Some("0.1"), "c1"),
        new_job("J2", Some(2), Some("0.2"), "c1"),
        new_job("J3", Some(3), None, "c1"),
    ] {
        job_ids.push(Job::create(&mut *tx, job).await?.id);
    }

    User::register(&mut *tx, hasher, new_user("u1", false)).await?;
    User::register(&mut *tx, hasher, new_user("u2", false)).await?;

    Ok(Seed { job_ids })
}
