//! Composition root: owns the single ledger instance and serializes access.

use crate::config::{load_config, Config};
use crate::error::LedgerError;
use crate::ledger::{Block, Ledger};
use crate::persistence::{BlockStore, Database, InMemoryStore};
use crate::vote::Vote;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::warn;

/// One process-wide ledger, explicitly constructed at startup and injected
/// into whatever handles submissions and inspection. Submitting (with its
/// embedded seal and proof-of-work search) and reading both go through the
/// same mutex, so the chain and pending buffer always change atomically with
/// respect to concurrent callers.
pub struct Node {
    pub config: Config,
    ledger: Arc<Mutex<Ledger>>,
}

impl Node {
    /// Load `config.toml` and bring the ledger up from the configured store.
    pub fn init() -> Result<Self, Box<dyn std::error::Error>> {
        let config = load_config()?;
        Self::init_with(config)
    }

    pub fn init_with(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let _ = tracing_subscriber::fmt::try_init();

        let store: Box<dyn BlockStore> = match Database::open(&config.database.path) {
            Ok(db) => Box::new(db),
            Err(e) => {
                warn!(
                    "Failed to open DB at {}: {}. Falling back to in-memory storage.",
                    config.database.path, e
                );
                Box::new(InMemoryStore::new())
            }
        };

        let ledger = Ledger::open(store, config.ledger.clone())?;

        Ok(Self {
            config,
            ledger: Arc::new(Mutex::new(ledger)),
        })
    }

    /// Submit one vote; buffers it and seals a block at the batching
    /// threshold. Returns the index of the block that holds (or will hold)
    /// the vote.
    pub fn submit_vote(&self, vote: Vote) -> Result<u64, LedgerError> {
        self.ledger.lock().submit_item(vote.into_item())
    }

    pub fn validate(&self) -> bool {
        self.ledger.lock().validate_chain()
    }

    /// Detached copy of the full chain for inspection and visualization
    /// endpoints; never a live view.
    pub fn chain_snapshot(&self) -> Vec<Block> {
        self.ledger.lock().chain().to_vec()
    }

    pub fn last_block(&self) -> Block {
        self.ledger.lock().last_block()
    }

    pub fn pending_count(&self) -> usize {
        self.ledger.lock().pending().len()
    }
}
