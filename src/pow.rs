//! Proof-of-work search gating block admission.
//!
//! A candidate nonce is valid when the SHA-256 digest of the concatenated
//! predecessor nonce, candidate nonce and predecessor hash starts with
//! [`DIFFICULTY_ZEROS`] hex zero characters. The difficulty is a fixed
//! constant; there is no retargeting.

use crate::crypto::sha256_hex;
use crate::error::LedgerError;

/// Number of leading hex zeros a valid proof digest must carry.
pub const DIFFICULTY_ZEROS: usize = 4;

/// The admission predicate: does `sha256(last_nonce ++ candidate ++ last_hash)`
/// start with [`DIFFICULTY_ZEROS`] zeros?
pub fn is_valid_proof(last_nonce: u64, candidate: u64, last_hash: &str) -> bool {
    let guess = format!("{}{}{}", last_nonce, candidate, last_hash);
    let digest = sha256_hex(guess.as_bytes());
    digest.bytes().take(DIFFICULTY_ZEROS).all(|b| b == b'0')
}

/// Sequential brute-force scan from candidate 0. Unbounded: a solution exists
/// with probability 1, roughly one per `16^DIFFICULTY_ZEROS` attempts.
pub fn find_proof(last_nonce: u64, last_hash: &str) -> u64 {
    let mut candidate = 0u64;
    while !is_valid_proof(last_nonce, candidate, last_hash) {
        candidate += 1;
    }
    candidate
}

/// Bounded variant of [`find_proof`] for callers that need a latency ceiling.
/// Gives up after `max_attempts` candidates instead of scanning forever.
pub fn find_proof_bounded(
    last_nonce: u64,
    last_hash: &str,
    max_attempts: u64,
) -> Result<u64, LedgerError> {
    for candidate in 0..max_attempts {
        if is_valid_proof(last_nonce, candidate, last_hash) {
            return Ok(candidate);
        }
    }
    Err(LedgerError::ProofOfWorkExhausted(max_attempts))
}
