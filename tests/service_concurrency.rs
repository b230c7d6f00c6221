mod common;

use shortly::application::services::{ResolveService, ShortenService};
use shortly::domain::click_worker::{click_channel, run_click_worker};
use shortly::domain::repositories::UrlRepository;
use shortly::error::AppError;
use shortly::infrastructure::persistence::{InMemoryUrlRepository, SqliteUrlRepository};
use shortly::utils::code_generator::CodeGenerator;
use std::collections::HashSet;
use std::sync::Arc;

fn shorten_service(repo: Arc<dyn UrlRepository>) -> Arc<ShortenService<dyn UrlRepository>> {
    Arc::new(ShortenService::new(
        repo,
        CodeGenerator::default(),
        10,
        common::TEST_BASE_URL,
    ))
}

async fn race_for_custom_code(repo: Arc<dyn UrlRepository>) {
    let service = shorten_service(Arc::clone(&repo));

    let mut handles = vec![];
    for i in 0..20 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service
                .shorten(
                    format!("https://example.com/{i}"),
                    Some("promo1".to_string()),
                )
                .await
        }));
    }

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(link) => {
                assert_eq!(link.code, "promo1");
                assert_eq!(link.short_url, "http://sho.rt/promo1");
                successes += 1;
            }
            Err(AppError::CodeConflict { .. }) => conflicts += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 19);
    assert_eq!(repo.stats().await.unwrap().links, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_custom_code_single_winner_memory() {
    race_for_custom_code(Arc::new(InMemoryUrlRepository::new())).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_custom_code_single_winner_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let pool = common::create_file_pool(&dir, 8).await;

    race_for_custom_code(Arc::new(SqliteUrlRepository::new(Arc::new(pool)))).await;
}

async fn generate_distinct_codes(repo: Arc<dyn UrlRepository>) {
    let service = shorten_service(Arc::clone(&repo));

    let mut handles = vec![];
    for i in 0..200 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            let target = format!("https://example.com/page/{i}");
            let link = service.shorten(target.clone(), None).await.unwrap();
            (link.code, target)
        }));
    }

    let mut codes = HashSet::new();
    for handle in handles {
        let (code, target) = handle.await.unwrap();
        let record = repo.get(&code).await.unwrap().unwrap();
        assert_eq!(record.target, target);
        assert!(codes.insert(code));
    }

    assert_eq!(codes.len(), 200);
    assert_eq!(repo.stats().await.unwrap().links, 200);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_generated_codes_are_distinct_memory() {
    generate_distinct_codes(Arc::new(InMemoryUrlRepository::new())).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_generated_codes_are_distinct_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let pool = common::create_file_pool(&dir, 8).await;

    generate_distinct_codes(Arc::new(SqliteUrlRepository::new(Arc::new(pool)))).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_resolve_counts_every_click_eventually() {
    let repo: Arc<dyn UrlRepository> = Arc::new(InMemoryUrlRepository::new());
    let link = shorten_service(Arc::clone(&repo))
        .shorten("https://example.com/hot".to_string(), None)
        .await
        .unwrap();

    let (sender, rx) = click_channel(1_000);
    let worker = tokio::spawn(run_click_worker(rx, Arc::clone(&repo), 4));
    let resolver = Arc::new(ResolveService::new(Arc::clone(&repo), sender));

    let mut handles = vec![];
    for _ in 0..500 {
        let resolver = Arc::clone(&resolver);
        let code = link.code.clone();
        handles.push(tokio::spawn(async move { resolver.resolve(&code).await }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), "https://example.com/hot");
    }

    // dropping the last sender lets the worker drain and exit
    drop(resolver);
    worker.await.unwrap();

    let record = repo.get(&link.code).await.unwrap().unwrap();
    assert_eq!(record.clicks, 500);
}

#[tokio::test]
async fn test_resolve_unknown_code_leaves_store_unchanged() {
    let repo: Arc<dyn UrlRepository> = Arc::new(InMemoryUrlRepository::new());
    let (sender, _rx) = click_channel(10);
    let resolver = ResolveService::new(Arc::clone(&repo), sender);

    let result = resolver.resolve("nothere").await;

    assert!(matches!(result, Err(AppError::NotFound { .. })));
    assert_eq!(repo.stats().await.unwrap().links, 0);
}
