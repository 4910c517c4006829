//! Tests for the lock retry on database open
//!
//! Run with: cargo test --test connection_retry_test -- --nocapture

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::TempDir;

use userdesk_core::adapters::duckdb::DuckDbUserRepository;
use userdesk_core::{ErrorKind, UserRepository, UserDraft};

/// Racing opens of one file all succeed, waiting out each other's locks
#[test]
fn test_concurrent_opens_succeed() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.duckdb");

    {
        let repo = DuckDbUserRepository::open(&db_path).unwrap();
        repo.ensure_schema().unwrap();
        repo.create(&UserDraft::new("John", "john@example.com").unwrap())
            .unwrap();
        repo.close().unwrap();
    }

    let barrier = Arc::new(Barrier::new(3));
    let db_path = Arc::new(db_path);

    let handles: Vec<_> = (0..3)
        .map(|i| {
            let barrier = Arc::clone(&barrier);
            let db_path = Arc::clone(&db_path);

            thread::spawn(move || {
                barrier.wait();

                let start = Instant::now();
                let result = DuckDbUserRepository::open(&db_path).map(|repo| {
                    let count = repo.list(None).map(|users| users.len());
                    // Hold the connection briefly to create contention
                    thread::sleep(Duration::from_millis(100));
                    let closed = repo.close();
                    (count, closed)
                });
                println!("Thread {}: finished after {:?}", i, start.elapsed());

                match result {
                    Ok((Ok(count), Ok(()))) => Ok(count),
                    Ok((Err(e), _)) | Ok((_, Err(e))) | Err(e) => Err(e.to_string()),
                }
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for result in &results {
        assert_eq!(result, &Ok(1), "every opener should see the existing user");
    }
}

/// An error that is not a lock conflict is surfaced as a database error
#[test]
fn test_missing_directory_fails() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("missing").join("test.duckdb");

    let err = match DuckDbUserRepository::open(&db_path) {
        Ok(_) => panic!("opening inside a missing directory should fail"),
        Err(e) => e,
    };

    assert_eq!(err.kind(), ErrorKind::Unknown);
    assert!(!db_path.exists());
}
