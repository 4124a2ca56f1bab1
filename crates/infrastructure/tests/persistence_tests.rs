//! Persistence integration tests against a real SQLite file
//!
//! Exercises the properties the credit state depends on: server-side atomic
//! increments under concurrency, breaker flips visible across connections,
//! and the monitor's reset-before-exhaustion behavior.

use std::sync::Arc;

use application::ports::CreditStorePort;
use application::services::CreditMonitor;
use chrono::{Duration, Utc};
use domain::Codename;
use infrastructure::config::DatabaseConfig;
use infrastructure::persistence::{SqliteCreditStore, create_pool};
use tempfile::TempDir;

fn file_backed_store(dir: &TempDir, max_connections: u32) -> SqliteCreditStore {
    let config = DatabaseConfig {
        path: dir
            .path()
            .join("parley-test.db")
            .to_string_lossy()
            .into_owned(),
        max_connections,
        run_migrations: true,
    };
    let pool = create_pool(&config).unwrap();
    SqliteCreditStore::new(Arc::new(pool))
}

#[tokio::test]
async fn concurrent_usage_increments_sum_exactly() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(file_backed_store(&dir, 5));

    let mut handles = Vec::new();
    for _ in 0..20 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store.add_usage(Codename::Orion, 1, 10, Utc::now()).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let record = store
        .get_providers(&[Codename::Orion])
        .await
        .unwrap()
        .remove(0);
    assert_eq!(record.daily_usage, 20);
    assert_eq!(record.monthly_usage, 200);
}

#[tokio::test]
async fn breaker_flip_is_visible_to_subsequent_reads() {
    let dir = TempDir::new().unwrap();
    let store = file_backed_store(&dir, 5);

    store
        .disable_provider(Codename::Titan, Utc::now())
        .await
        .unwrap();

    let mut record = store
        .get_providers(&[Codename::Titan])
        .await
        .unwrap()
        .remove(0);
    assert!(!record.credit_status);

    // gate does not re-enable a tripped provider without a reset window
    let outcome = record.evaluate(Utc::now());
    assert!(!outcome.eligible);
}

#[tokio::test]
async fn check_credits_applies_elapsed_reset_before_exhaustion() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(file_backed_store(&dir, 5));

    // Over-limit counters from a window that elapsed two days ago
    let mut record = store
        .get_providers(&[Codename::Orion])
        .await
        .unwrap()
        .remove(0);
    record.daily_usage = 150;
    record.daily_limit = 100;
    record.credit_status = false;
    record.last_reset_daily = Utc::now() - Duration::days(2);
    store.save_provider(&record).await.unwrap();

    let monitor = CreditMonitor::new(store.clone());
    let report = monitor.check_credits().await.unwrap();

    assert!(report.newly_exhausted.is_empty());
    let reloaded = store
        .get_providers(&[Codename::Orion])
        .await
        .unwrap()
        .remove(0);
    assert!(reloaded.credit_status);
    assert_eq!(reloaded.daily_usage, 0);
}

#[tokio::test]
async fn reset_credits_reenables_every_provider() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(file_backed_store(&dir, 5));

    for codename in Codename::ALL {
        store.add_usage(codename, 5, 500, Utc::now()).await.unwrap();
        store.disable_provider(codename, Utc::now()).await.unwrap();
    }

    let monitor = CreditMonitor::new(store.clone());
    monitor.reset_credits().await.unwrap();

    let records = store.list_providers().await.unwrap();
    assert_eq!(records.len(), 7);
    for record in records {
        assert!(record.credit_status, "{} still disabled", record.codename);
        assert_eq!(record.daily_usage, 0);
        assert_eq!(record.monthly_usage, 0);
    }
}

#[tokio::test]
async fn exhausted_listing_reports_quota_reasons() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(file_backed_store(&dir, 5));

    // Push Vox over its daily limit (seeded at 100)
    store
        .add_usage(Codename::Vox, 100, 0, Utc::now())
        .await
        .unwrap();
    // Breaker-trip Echo with clean counters
    store
        .disable_provider(Codename::Echo, Utc::now())
        .await
        .unwrap();

    let monitor = CreditMonitor::new(store);
    let exhausted = monitor.exhausted_providers().await.unwrap();

    let vox = exhausted
        .iter()
        .find(|e| e.codename == Codename::Vox)
        .unwrap();
    assert_eq!(vox.reason, "Daily limit exceeded");
    assert_eq!(vox.daily_usage, 100);

    let echo = exhausted
        .iter()
        .find(|e| e.codename == Codename::Echo)
        .unwrap();
    assert_eq!(echo.reason, "Disabled after call failure");
}
