use crate::config::LedgerConfig;
use crate::crypto::sha256_hex;
use crate::error::LedgerError;
use crate::persistence::BlockStore;
use crate::pow;
use serde_json::{json, Value};
use tracing::info;

/// Sentinel standing in for the digest of the virtual genesis predecessor.
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Fixed nonce assigned to the genesis block; no search is run for it.
pub const GENESIS_NONCE: u64 = 100;

/// Number of buffered votes that triggers a seal.
pub const BATCH_THRESHOLD: usize = 2;

/// One sealed unit of the chain. Immutable once sealed: every field feeds the
/// content digest, and the digest of each block is the `previous_hash` of the
/// next.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Block {
    /// 1-based position in the chain.
    pub index: u64,
    /// Milliseconds since the Unix epoch at seal time.
    pub timestamp: u64,
    /// The votes batched into this block, as opaque JSON payloads.
    pub items: Vec<Value>,
    /// Digest of the predecessor, or [`GENESIS_PREVIOUS_HASH`].
    pub previous_hash: String,
    /// Proof-of-work solution found against the predecessor.
    pub nonce: u64,
    /// Canonical content digest of the five fields above.
    pub hash: String,
}

impl Block {
    /// Construct a block and stamp it with its content digest.
    pub fn seal(
        index: u64,
        timestamp: u64,
        items: Vec<Value>,
        previous_hash: String,
        nonce: u64,
    ) -> Self {
        let mut block = Block {
            index,
            timestamp,
            items,
            previous_hash,
            nonce,
            hash: String::new(),
        };
        block.hash = block.digest();
        block
    }

    /// Canonical content digest over every field except `hash` itself.
    ///
    /// The payload is a JSON object rendered with sorted keys and compact
    /// separators (serde_json's default map is a BTreeMap, so key order never
    /// depends on insertion or platform), hashed with SHA-256. Recomputing
    /// this on a stored block must reproduce the stored `hash` exactly.
    pub fn digest(&self) -> String {
        let payload = json!({
            "index": self.index,
            "items": self.items,
            "nonce": self.nonce,
            "previous_hash": self.previous_hash,
            "timestamp": self.timestamp,
        });
        sha256_hex(payload.to_string().as_bytes())
    }

    /// The well-defined predecessor of an empty chain. Never persisted and
    /// never appears in the chain; all fields are constants so repeated reads
    /// return equal content.
    pub fn virtual_genesis() -> Self {
        Block {
            index: 0,
            timestamp: 0,
            items: Vec::new(),
            previous_hash: GENESIS_PREVIOUS_HASH.to_string(),
            nonce: GENESIS_NONCE,
            hash: GENESIS_PREVIOUS_HASH.to_string(),
        }
    }
}

fn now_millis() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}

/// The append-only hash chain plus the buffer of not-yet-sealed votes.
///
/// Not internally synchronized: `submit_item` and `seal_block` read the tail
/// and append, so all access must go through one serialization point (see
/// [`crate::node::Node`], which wraps the ledger in a mutex).
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Value>,
    settings: LedgerConfig,
    store: Box<dyn BlockStore>,
}

impl Ledger {
    /// Create a ledger with an empty chain and an empty buffer. Nothing is
    /// loaded from or written to the store until the first seal.
    pub fn new(store: Box<dyn BlockStore>, settings: LedgerConfig) -> Self {
        Ledger {
            chain: Vec::new(),
            pending: Vec::new(),
            settings,
            store,
        }
    }

    /// Rehydrate a ledger from the store. Blocks arrive wholesale in
    /// ascending index order and are trusted unless `validate_on_load` is
    /// set. If the store holds no blocks, a genesis block is sealed and
    /// persisted immediately.
    pub fn open(store: Box<dyn BlockStore>, settings: LedgerConfig) -> Result<Self, LedgerError> {
        let chain = store.load_all()?;
        let mut ledger = Ledger {
            chain,
            pending: Vec::new(),
            settings,
            store,
        };

        if ledger.settings.validate_on_load && !ledger.validate_chain() {
            return Err(LedgerError::CorruptChain(
                "persisted chain failed validation on load".to_string(),
            ));
        }

        if ledger.chain.is_empty() {
            ledger.seal_genesis()?;
        }

        info!("Ledger initialized with {} blocks", ledger.chain.len());
        Ok(ledger)
    }

    /// The genesis block carries the sentinel predecessor hash and a fixed
    /// nonce; the proof-of-work search starts with its successor.
    fn seal_genesis(&mut self) -> Result<Block, LedgerError> {
        let block = Block::seal(
            1,
            now_millis(),
            Vec::new(),
            GENESIS_PREVIOUS_HASH.to_string(),
            GENESIS_NONCE,
        );
        self.store.persist(&block)?;
        self.chain.push(block.clone());
        info!("Sealed genesis block {}", block.hash);
        Ok(block)
    }

    /// Buffer a vote payload, sealing a block when the buffer reaches the
    /// batching threshold. The payload is opaque: no shape validation happens
    /// at this layer.
    ///
    /// Returns the 1-based index of the block that does (seal triggered) or
    /// will (still buffering) contain this item. An `Err` means a triggered
    /// seal failed; the item stays buffered and rides the next successful
    /// seal.
    pub fn submit_item(&mut self, item: Value) -> Result<u64, LedgerError> {
        self.pending.push(item);

        if self.pending.len() >= self.settings.batch_threshold {
            let sealed = self.seal_block()?;
            return Ok(sealed.index);
        }

        Ok(self.last_block().index + 1)
    }

    /// Seal the pending buffer into the next block.
    ///
    /// Runs the proof-of-work search against the current tail (the virtual
    /// genesis when the chain is empty), then persists the new block before
    /// appending it: if persistence fails, neither the chain nor the buffer
    /// changes, so a sealed block can never exist in memory without being
    /// durable.
    pub fn seal_block(&mut self) -> Result<Block, LedgerError> {
        let tail = self.last_block();

        let nonce = match self.settings.max_pow_attempts {
            Some(limit) => pow::find_proof_bounded(tail.nonce, &tail.hash, limit)?,
            None => pow::find_proof(tail.nonce, &tail.hash),
        };

        let block = Block::seal(
            tail.index + 1,
            now_millis(),
            self.pending.clone(),
            tail.hash.clone(),
            nonce,
        );

        self.store.persist(&block)?;
        self.chain.push(block.clone());
        self.pending.clear();

        info!(
            "Sealed block {} with {} votes (nonce {})",
            block.index,
            block.items.len(),
            block.nonce
        );
        Ok(block)
    }

    /// The tail of the chain, or the constant virtual genesis predecessor
    /// when the chain is empty.
    pub fn last_block(&self) -> Block {
        self.chain.last().cloned().unwrap_or_else(Block::virtual_genesis)
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending(&self) -> &[Value] {
        &self.pending
    }

    /// Full structural and proof-of-work validation of the chain.
    pub fn validate_chain(&self) -> bool {
        super::validation::validate_chain(&self.chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerConfig;
    use crate::persistence::InMemoryStore;

    fn test_ledger() -> Ledger {
        Ledger::new(Box::new(InMemoryStore::new()), LedgerConfig::default())
    }

    fn item(label: &str) -> Value {
        json!({ "ballot": label })
    }

    #[test]
    fn digest_is_deterministic() {
        let block = Block::seal(1, 1234, vec![item("a")], "1".to_string(), 100);
        assert_eq!(block.digest(), block.digest());
        assert_eq!(block.hash, block.digest());
    }

    #[test]
    fn digest_changes_with_any_field() {
        let base = Block::seal(1, 1234, vec![item("a")], "1".to_string(), 100);

        let mut changed = base.clone();
        changed.index = 2;
        assert_ne!(base.digest(), changed.digest());

        let mut changed = base.clone();
        changed.timestamp = 1235;
        assert_ne!(base.digest(), changed.digest());

        let mut changed = base.clone();
        changed.items = vec![item("b")];
        assert_ne!(base.digest(), changed.digest());

        let mut changed = base.clone();
        changed.previous_hash = "2".to_string();
        assert_ne!(base.digest(), changed.digest());

        let mut changed = base.clone();
        changed.nonce = 101;
        assert_ne!(base.digest(), changed.digest());
    }

    #[test]
    fn virtual_genesis_is_constant() {
        assert_eq!(Block::virtual_genesis(), Block::virtual_genesis());
        let genesis = Block::virtual_genesis();
        assert_eq!(genesis.index, 0);
        assert_eq!(genesis.previous_hash, GENESIS_PREVIOUS_HASH);
        assert_eq!(genesis.nonce, GENESIS_NONCE);
        assert_eq!(genesis.hash, GENESIS_PREVIOUS_HASH);
    }

    #[test]
    fn single_submission_buffers_without_sealing() {
        let mut ledger = test_ledger();

        let admitted = ledger.submit_item(item("a")).unwrap();

        assert_eq!(admitted, 1);
        assert_eq!(ledger.pending().len(), 1);
        assert!(ledger.chain().is_empty());
        assert_eq!(ledger.last_block(), Block::virtual_genesis());
    }

    #[test]
    fn threshold_submission_seals_a_block() {
        let mut ledger = test_ledger();

        ledger.submit_item(item("a")).unwrap();
        let admitted = ledger.submit_item(item("b")).unwrap();

        assert_eq!(admitted, 1);
        assert_eq!(ledger.chain().len(), 1);
        assert!(ledger.pending().is_empty());

        let sealed = ledger.last_block();
        assert_eq!(sealed.index, 1);
        assert_eq!(sealed.previous_hash, GENESIS_PREVIOUS_HASH);
        assert_eq!(sealed.items, vec![item("a"), item("b")]);
        assert!(crate::pow::is_valid_proof(
            GENESIS_NONCE,
            sealed.nonce,
            GENESIS_PREVIOUS_HASH
        ));
    }

    #[test]
    fn sealed_block_links_to_previous_tail() {
        let mut ledger = test_ledger();

        ledger.submit_item(item("a")).unwrap();
        ledger.submit_item(item("b")).unwrap();
        let first = ledger.last_block();

        ledger.submit_item(item("c")).unwrap();
        let admitted = ledger.submit_item(item("d")).unwrap();
        let second = ledger.last_block();

        assert_eq!(admitted, 2);
        assert_eq!(second.previous_hash, first.digest());
        assert!(crate::pow::is_valid_proof(first.nonce, second.nonce, &first.hash));
    }

    #[test]
    fn admission_index_points_at_next_block_while_buffering() {
        let mut ledger = test_ledger();

        ledger.submit_item(item("a")).unwrap();
        ledger.submit_item(item("b")).unwrap();

        // Chain now holds block 1; a lone buffered vote belongs to block 2.
        let admitted = ledger.submit_item(item("c")).unwrap();
        assert_eq!(admitted, 2);
        assert_eq!(ledger.pending().len(), 1);
    }

    #[test]
    fn last_block_is_idempotent() {
        let mut ledger = test_ledger();
        assert_eq!(ledger.last_block(), ledger.last_block());

        ledger.submit_item(item("a")).unwrap();
        ledger.submit_item(item("b")).unwrap();
        assert_eq!(ledger.last_block(), ledger.last_block());
    }

    #[test]
    fn open_on_empty_store_seals_genesis() {
        let ledger =
            Ledger::open(Box::new(InMemoryStore::new()), LedgerConfig::default()).unwrap();

        assert_eq!(ledger.chain().len(), 1);
        let genesis = ledger.last_block();
        assert_eq!(genesis.index, 1);
        assert_eq!(genesis.previous_hash, GENESIS_PREVIOUS_HASH);
        assert_eq!(genesis.nonce, GENESIS_NONCE);
        assert!(genesis.items.is_empty());
        assert!(ledger.validate_chain());
    }

    #[test]
    fn admission_index_after_genesis() {
        let mut ledger =
            Ledger::open(Box::new(InMemoryStore::new()), LedgerConfig::default()).unwrap();

        // Genesis occupies index 1, so the first buffered vote lands in 2.
        let admitted = ledger.submit_item(item("a")).unwrap();
        assert_eq!(admitted, 2);
    }

    #[test]
    fn explicit_seal_of_empty_buffer_produces_empty_block() {
        let mut ledger = test_ledger();
        let sealed = ledger.seal_block().unwrap();

        assert_eq!(sealed.index, 1);
        assert!(sealed.items.is_empty());
        assert!(ledger.validate_chain());
    }
}
