//! Server state and configuration.

use std::path::PathBuf;
use std::sync::Arc;

use crate::allocator::{Allocator, AllocatorConfig};
use crate::error::LabelError;
use crate::layout::SheetLayout;
use crate::ledger::{Ledger, SqliteLedger};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Path to the SQLite ledger (e.g., "data/labels.db")
    pub ledger_path: PathBuf,
    /// Code width and batch limit
    pub allocator: AllocatorConfig,
    /// Layout used when a request names none
    pub default_layout: SheetLayout,
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub allocator: Allocator,
}

impl AppState {
    /// Open the configured ledger and build the state around it.
    pub fn open(config: ServerConfig) -> Result<Self, LabelError> {
        let ledger = SqliteLedger::open(&config.ledger_path)?;
        Ok(Self::with_ledger(config, Arc::new(ledger)))
    }

    /// Build state around an existing ledger handle.
    pub fn with_ledger(config: ServerConfig, ledger: Arc<dyn Ledger>) -> Self {
        let allocator = Allocator::new(ledger, config.allocator);
        Self { config, allocator }
    }

    /// Resolve an optional layout name from a request.
    pub fn layout(&self, name: Option<&str>) -> Result<SheetLayout, LabelError> {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            None => Ok(self.config.default_layout.clone()),
            Some(n) if n.eq_ignore_ascii_case(&self.config.default_layout.name) => {
                Ok(self.config.default_layout.clone())
            }
            // Requests may only name built-ins; file paths stay a CLI concern.
            Some(n) => SheetLayout::by_name(n)
                .ok_or_else(|| LabelError::validation(format!("unknown layout '{}'", n))),
        }
    }
}
