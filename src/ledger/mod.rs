//! # Code Ledger
//!
//! Durable, append-only record of every code ever issued.
//!
//! The ledger is the only stateful dependency in the crate. It is passed to
//! the [`Allocator`](crate::allocator::Allocator) as an explicit handle;
//! geometry and rendering never see it.
//!
//! ## Modules
//!
//! - [`sqlite`]: SQLite-backed ledger (the production backend)

pub mod sqlite;

pub use sqlite::SqliteLedger;

use serde::Serialize;

use crate::allocator::BlockRequest;
use crate::code::Code;
use crate::error::LabelError;

/// One issued code as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelRecord {
    pub id: i64,
    pub code: String,
    pub prefix: String,
    pub number: u64,
    pub width: u8,
    /// RFC 3339 UTC timestamp of the allocating transaction
    pub created_at: String,
}

/// Summary counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedgerStats {
    pub total: u64,
}

/// Storage backend for issued codes.
///
/// Implementations must make [`allocate`](Ledger::allocate) atomic: either
/// every code of the block is committed or none is, and two concurrent calls
/// for the same prefix never observe the same "last number".
pub trait Ledger: Send + Sync {
    /// Reserve and persist the next block described by `request`.
    fn allocate(&self, request: &BlockRequest) -> Result<Vec<Code>, LabelError>;

    /// Most recently issued records, newest first.
    fn recent(&self, limit: usize) -> Result<Vec<LabelRecord>, LabelError>;

    fn stats(&self) -> Result<LedgerStats, LabelError>;
}
