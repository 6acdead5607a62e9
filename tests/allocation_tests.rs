//! # Allocation Tests
//!
//! Ledger-backed allocation against a real SQLite file.
//!
//! ## Coverage
//!
//! - Numbering continues across process restarts (reopening the file)
//! - Concurrent allocators on separate connections never overlap
//! - An allocation that would overflow the code width commits nothing
//! - Deleting the ledger file restarts numbering at 1

use labelsheet::allocator::{Allocator, AllocatorConfig};
use labelsheet::code::CodeWidth;
use labelsheet::error::LabelError;
use labelsheet::ledger::{Ledger, SqliteLedger};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::thread;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn allocator_at(path: &Path, width: u8) -> Allocator {
    let ledger = Arc::new(SqliteLedger::open(path).unwrap());
    Allocator::new(
        ledger,
        AllocatorConfig {
            width: CodeWidth::new(width).unwrap(),
            max_batch: 1000,
        },
    )
}

fn allocate_strings(allocator: &Allocator, prefix: &str, count: u32) -> Vec<String> {
    allocator
        .allocate(prefix, count)
        .unwrap()
        .iter()
        .map(|c| c.to_string())
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[test]
fn test_round_trip_on_empty_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let allocator = allocator_at(&dir.path().join("labels.db"), 6);

    assert_eq!(
        allocate_strings(&allocator, "T", 3),
        ["T-000001", "T-000002", "T-000003"]
    );
    assert_eq!(allocate_strings(&allocator, "T", 2), ["T-000004", "T-000005"]);
}

#[test]
fn test_numbering_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("labels.db");

    {
        let allocator = allocator_at(&path, 6);
        allocate_strings(&allocator, "T", 10);
        allocate_strings(&allocator, "AB", 2);
    }

    let allocator = allocator_at(&path, 6);
    assert_eq!(allocate_strings(&allocator, "T", 1), ["T-000011"]);
    assert_eq!(allocate_strings(&allocator, "AB", 1), ["AB-000003"]);
    assert_eq!(allocator.ledger().stats().unwrap().total, 14);
}

#[test]
fn test_deleting_ledger_resets_numbering() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("labels.db");

    {
        let allocator = allocator_at(&path, 5);
        allocate_strings(&allocator, "T", 7);
    }

    for suffix in ["", "-wal", "-shm"] {
        let file = dir.path().join(format!("labels.db{}", suffix));
        if file.exists() {
            std::fs::remove_file(file).unwrap();
        }
    }

    let allocator = allocator_at(&path, 5);
    assert_eq!(allocate_strings(&allocator, "T", 1), ["T-00001"]);
}

#[test]
fn test_exhaustion_is_atomic() {
    let dir = tempfile::tempdir().unwrap();
    let allocator = allocator_at(&dir.path().join("labels.db"), 3);

    allocate_strings(&allocator, "Q", 990);
    let before = allocator.ledger().stats().unwrap().total;

    let err = allocator.allocate("Q", 10).unwrap_err();
    assert!(matches!(err, LabelError::Exhaustion { last: 990, .. }));
    assert_eq!(allocator.ledger().stats().unwrap().total, before);

    // The remaining space is still usable.
    let rest = allocate_strings(&allocator, "Q", 9);
    assert_eq!(rest.first().map(String::as_str), Some("Q-991"));
    assert_eq!(rest.last().map(String::as_str), Some("Q-999"));
}

#[test]
fn test_concurrent_allocators_never_overlap() {
    const THREADS: usize = 8;
    const ROUNDS: usize = 4;
    const BATCH: u32 = 25;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("labels.db");

    // Create the file and schema before the writers race.
    drop(SqliteLedger::open(&path).unwrap());

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let path = path.clone();
            thread::spawn(move || {
                let allocator = allocator_at(&path, 6);
                let mut issued = Vec::new();
                for _ in 0..ROUNDS {
                    let batch = allocator.allocate("T", BATCH).unwrap();
                    // Each batch is contiguous.
                    for pair in batch.windows(2) {
                        assert_eq!(pair[1].number(), pair[0].number() + 1);
                    }
                    issued.extend(batch.iter().map(|c| c.number()));
                }
                issued
            })
        })
        .collect();

    let mut all: Vec<u64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();

    let expected = THREADS * ROUNDS * BATCH as usize;
    let unique: HashSet<u64> = all.iter().copied().collect();
    assert_eq!(unique.len(), expected);

    all.sort_unstable();
    assert_eq!(all, (1..=expected as u64).collect::<Vec<_>>());
}

#[test]
fn test_validation_happens_before_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let allocator = allocator_at(&dir.path().join("labels.db"), 6);

    assert!(matches!(
        allocator.allocate("??", 1),
        Err(LabelError::Validation(_))
    ));
    assert!(matches!(
        allocator.allocate("T", 1001),
        Err(LabelError::Validation(_))
    ));
    assert_eq!(allocator.ledger().stats().unwrap().total, 0);
}
