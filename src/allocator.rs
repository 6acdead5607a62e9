//! # Code Allocator
//!
//! Hands out contiguous blocks of never-used codes for a prefix.
//!
//! ## Algorithm
//!
//! ```text
//! validate prefix + count          (no ledger access on failure)
//! BEGIN IMMEDIATE                  (write lock before reading)
//!   last = MAX(number) WHERE prefix = ? AND width = ?
//!   next = last + 1                (1 on an empty ledger)
//!   next + count - 1 > 10^width-1  → ROLLBACK, exhaustion error
//!   INSERT next .. next+count-1
//! COMMIT
//! ```
//!
//! The transactional half lives in [`Ledger::allocate`](crate::ledger::Ledger::allocate);
//! the block arithmetic is [`plan_block`] so every ledger backend shares it.

use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::code::{Code, CodeWidth, Prefix};
use crate::error::LabelError;
use crate::ledger::Ledger;

/// Default upper bound on a single allocation request.
pub const DEFAULT_MAX_BATCH: u32 = 1000;

/// Per-deployment allocation settings.
#[derive(Debug, Clone, Copy)]
pub struct AllocatorConfig {
    /// Digits in every numeric suffix
    pub width: CodeWidth,
    /// Largest accepted `count`
    pub max_batch: u32,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            width: CodeWidth::default(),
            max_batch: DEFAULT_MAX_BATCH,
        }
    }
}

/// A validated allocation request, ready for the ledger.
#[derive(Debug, Clone)]
pub struct BlockRequest {
    pub prefix: Prefix,
    pub count: u32,
    pub width: CodeWidth,
}

/// Compute the numbers for the next block after `last`.
///
/// Fails with [`LabelError::Exhaustion`] when the block does not fit the
/// width; callers must then commit nothing.
pub fn plan_block(
    last: Option<u64>,
    request: &BlockRequest,
) -> Result<RangeInclusive<u64>, LabelError> {
    if request.count == 0 {
        return Err(LabelError::validation("count must be at least 1"));
    }

    let last = last.unwrap_or(0);
    let max = request.width.max_number();
    let first = last + 1;
    let end = last + request.count as u64;

    if end > max {
        return Err(LabelError::Exhaustion {
            prefix: request.prefix.to_string(),
            last,
            requested: request.count,
            max,
        });
    }

    Ok(first..=end)
}

/// Turn a planned range into codes.
pub fn codes_for(range: RangeInclusive<u64>, request: &BlockRequest) -> Result<Vec<Code>, LabelError> {
    range
        .map(|n| Code::new(request.prefix.clone(), n, request.width))
        .collect()
}

/// Allocator bound to one ledger handle.
#[derive(Clone)]
pub struct Allocator {
    ledger: Arc<dyn Ledger>,
    config: AllocatorConfig,
}

impl Allocator {
    pub fn new(ledger: Arc<dyn Ledger>, config: AllocatorConfig) -> Self {
        Self { ledger, config }
    }

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Arc<dyn Ledger> {
        &self.ledger
    }

    /// Validate a raw request without touching the ledger.
    pub fn validate(&self, prefix: &str, count: u32) -> Result<BlockRequest, LabelError> {
        let prefix = Prefix::parse(prefix)?;

        if count == 0 || count > self.config.max_batch {
            return Err(LabelError::validation(format!(
                "count must be between 1 and {}, got {}",
                self.config.max_batch, count
            )));
        }

        Ok(BlockRequest {
            prefix,
            count,
            width: self.config.width,
        })
    }

    /// Allocate `count` new codes for `prefix`.
    pub fn allocate(&self, prefix: &str, count: u32) -> Result<Vec<Code>, LabelError> {
        let request = self.validate(prefix, count)?;

        match self.ledger.allocate(&request) {
            Ok(codes) => {
                if let (Some(first), Some(last)) = (codes.first(), codes.last()) {
                    tracing::info!(
                        prefix = %request.prefix,
                        count = codes.len(),
                        first = %first,
                        last = %last,
                        "allocated codes"
                    );
                }
                Ok(codes)
            }
            Err(e) => {
                tracing::warn!(prefix = %request.prefix, count, error = %e, "allocation failed");
                Err(e)
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{LabelRecord, LedgerStats};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn request(prefix: &str, count: u32, width: CodeWidth) -> BlockRequest {
        BlockRequest {
            prefix: Prefix::parse(prefix).unwrap(),
            count,
            width,
        }
    }

    /// In-memory ledger counting calls.
    #[derive(Default)]
    struct MemoryLedger {
        codes: Mutex<Vec<Code>>,
        calls: AtomicUsize,
    }

    impl Ledger for MemoryLedger {
        fn allocate(&self, request: &BlockRequest) -> Result<Vec<Code>, LabelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut codes = self.codes.lock().unwrap();
            let last = codes
                .iter()
                .filter(|c| c.prefix() == &request.prefix && c.width() == request.width)
                .map(|c| c.number())
                .max();
            let block = codes_for(plan_block(last, request)?, request)?;
            codes.extend(block.iter().cloned());
            Ok(block)
        }

        fn recent(&self, _limit: usize) -> Result<Vec<LabelRecord>, LabelError> {
            Ok(Vec::new())
        }

        fn stats(&self) -> Result<LedgerStats, LabelError> {
            Ok(LedgerStats {
                total: self.codes.lock().unwrap().len() as u64,
            })
        }
    }

    #[test]
    fn test_plan_block_empty_ledger() {
        let range = plan_block(None, &request("T", 3, CodeWidth::SIX)).unwrap();
        assert_eq!(range, 1..=3);
    }

    #[test]
    fn test_plan_block_continues() {
        let range = plan_block(Some(3), &request("T", 2, CodeWidth::SIX)).unwrap();
        assert_eq!(range, 4..=5);
    }

    #[test]
    fn test_plan_block_exhaustion() {
        let width = CodeWidth::new(3).unwrap();
        assert_eq!(plan_block(Some(998), &request("T", 1, width)).unwrap(), 999..=999);

        let err = plan_block(Some(998), &request("T", 2, width)).unwrap_err();
        assert!(matches!(err, LabelError::Exhaustion { last: 998, max: 999, .. }));
    }

    #[test]
    fn test_validation_skips_ledger() {
        let ledger = Arc::new(MemoryLedger::default());
        let allocator = Allocator::new(ledger.clone(), AllocatorConfig::default());

        assert!(allocator.allocate("BAD!", 1).is_err());
        assert!(allocator.allocate("T", 0).is_err());
        assert!(allocator.allocate("T", DEFAULT_MAX_BATCH + 1).is_err());
        assert_eq!(ledger.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_allocate_round_trip() {
        let ledger = Arc::new(MemoryLedger::default());
        let allocator = Allocator::new(ledger, AllocatorConfig::default());

        let first: Vec<String> = allocator
            .allocate("T", 3)
            .unwrap()
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(first, ["T-000001", "T-000002", "T-000003"]);

        let second: Vec<String> = allocator
            .allocate("t", 2)
            .unwrap()
            .iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(second, ["T-000004", "T-000005"]);
    }

    #[test]
    fn test_prefixes_are_independent() {
        let ledger = Arc::new(MemoryLedger::default());
        let allocator = Allocator::new(ledger, AllocatorConfig::default());

        allocator.allocate("T", 5).unwrap();
        let other = allocator.allocate("AB", 1).unwrap();
        assert_eq!(other[0].to_string(), "AB-000001");
    }
}
