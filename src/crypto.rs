//! Hashing primitives for VoteChain

use sha2::{Digest, Sha256};

/// SHA-256 over raw bytes, rendered as lowercase hex.
///
/// Every digest in the ledger goes through this function so that block
/// hashes, proof-of-work guesses and persisted hashes all share one encoding.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
