//! Database persistence layer for VoteChain

use crate::error::LedgerError;
use crate::ledger::Block;
use rusqlite::{params, Connection};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Abstraction over the storage collaborator. On startup the ledger pulls
/// the whole chain with `load_all`; every seal hands the new block to
/// `persist` before the in-memory chain advances.
pub trait BlockStore: Send + Sync {
    /// Every persisted block, in ascending index order. May be empty.
    fn load_all(&self) -> Result<Vec<Block>, LedgerError>;
    /// Durably record a freshly sealed block.
    fn persist(&self, block: &Block) -> Result<(), LedgerError>;
}

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &str) -> Result<Self, LedgerError> {
        let conn = Connection::open(path)
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to open database: {}", e)))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS blocks (
                block_index INTEGER PRIMARY KEY,
                timestamp INTEGER NOT NULL,
                previous_hash TEXT NOT NULL,
                hash TEXT NOT NULL,
                nonce INTEGER NOT NULL,
                items TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| LedgerError::DatabaseError(format!("Failed to create blocks table: {}", e)))?;

        Ok(Database {
            conn: Mutex::new(conn),
        })
    }
}

impl BlockStore for Database {
    fn load_all(&self) -> Result<Vec<Block>, LedgerError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| LedgerError::DatabaseError("Mutex poisoned".to_string()))?;

        let mut stmt = conn
            .prepare(
                "SELECT block_index, timestamp, previous_hash, hash, nonce, items
                 FROM blocks ORDER BY block_index ASC",
            )
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map([], |row| {
                let index: i64 = row.get(0)?;
                let timestamp: i64 = row.get(1)?;
                let previous_hash: String = row.get(2)?;
                let hash: String = row.get(3)?;
                let nonce: i64 = row.get(4)?;
                let items_json: String = row.get(5)?;

                let items: Vec<Value> = serde_json::from_str(&items_json)
                    .map_err(|_| rusqlite::Error::InvalidQuery)?;

                Ok(Block {
                    index: index as u64,
                    timestamp: timestamp as u64,
                    items,
                    previous_hash,
                    nonce: nonce as u64,
                    hash,
                })
            })
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to query blocks: {}", e)))?;

        let mut blocks = Vec::new();
        for row in rows {
            blocks.push(
                row.map_err(|e| LedgerError::DatabaseError(format!("Failed to load block: {}", e)))?,
            );
        }
        Ok(blocks)
    }

    fn persist(&self, block: &Block) -> Result<(), LedgerError> {
        let items_json = serde_json::to_string(&block.items)
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to serialize items: {}", e)))?;

        let conn = self
            .conn
            .lock()
            .map_err(|_| LedgerError::DatabaseError("Mutex poisoned".to_string()))?;

        conn.execute(
            "INSERT OR REPLACE INTO blocks (block_index, timestamp, previous_hash, hash, nonce, items)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                block.index as i64,
                block.timestamp as i64,
                block.previous_hash,
                block.hash,
                block.nonce as i64,
                items_json,
            ],
        )
        .map_err(|e| LedgerError::DatabaseError(format!("Failed to save block: {}", e)))?;

        Ok(())
    }
}

/// Simple in-memory store useful for tests and ephemeral runs. Clones share
/// the same underlying blocks, so a rehydrated ledger sees earlier seals.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    blocks: Arc<Mutex<Vec<Block>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockStore for InMemoryStore {
    fn load_all(&self) -> Result<Vec<Block>, LedgerError> {
        let mut blocks = self
            .blocks
            .lock()
            .map_err(|_| LedgerError::DatabaseError("Mutex poisoned".to_string()))?
            .clone();
        blocks.sort_by_key(|b| b.index);
        Ok(blocks)
    }

    fn persist(&self, block: &Block) -> Result<(), LedgerError> {
        let mut blocks = self
            .blocks
            .lock()
            .map_err(|_| LedgerError::DatabaseError("Mutex poisoned".to_string()))?;
        blocks.retain(|b| b.index != block.index);
        blocks.push(block.clone());
        Ok(())
    }
}
