#![allow(dead_code)]

use chrono::Utc;
use shortly::domain::click_event::ClickEvent;
use shortly::domain::click_worker::click_channel;
use shortly::domain::repositories::UrlRepository;
use shortly::infrastructure::persistence::{
    InMemoryUrlRepository, SqliteUrlRepository, connect_pool, run_migrations,
};
use shortly::state::AppState;
use shortly::utils::code_generator::CodeGenerator;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub const TEST_BASE_URL: &str = "http://sho.rt";

/// Fresh in-memory database with the schema applied.
pub async fn create_test_pool() -> SqlitePool {
    let pool = connect_pool("sqlite::memory:", 1, Duration::from_secs(5))
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

/// File-backed database inside `dir`, shared by several connections.
pub async fn create_file_pool(dir: &tempfile::TempDir, max_connections: u32) -> SqlitePool {
    let url = format!("sqlite://{}", dir.path().join("shortly.db").display());
    let pool = connect_pool(&url, max_connections, Duration::from_secs(10))
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

pub async fn create_test_link(pool: &SqlitePool, code: &str, url: &str) {
    sqlx::query("INSERT INTO urls (code, target, clicks, created_at) VALUES (?1, ?2, 0, ?3)")
        .bind(code)
        .bind(url)
        .bind(Utc::now())
        .execute(pool)
        .await
        .unwrap();
}

pub async fn get_clicks(pool: &SqlitePool, code: &str) -> i64 {
    sqlx::query_scalar("SELECT clicks FROM urls WHERE code = ?1")
        .bind(code)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn create_state(repository: Arc<dyn UrlRepository>) -> (AppState, mpsc::Receiver<ClickEvent>) {
    let (sender, rx) = click_channel(100);

    let state = AppState::new(
        repository,
        sender,
        CodeGenerator::default(),
        10,
        TEST_BASE_URL,
    );

    (state, rx)
}

pub fn create_test_state(pool: SqlitePool) -> (AppState, mpsc::Receiver<ClickEvent>) {
    create_state(Arc::new(SqliteUrlRepository::new(Arc::new(pool))))
}

pub fn create_memory_state() -> (AppState, mpsc::Receiver<ClickEvent>) {
    create_state(Arc::new(InMemoryUrlRepository::new()))
}
