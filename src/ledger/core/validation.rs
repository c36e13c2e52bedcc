use crate::ledger::core::chain::Block;
use crate::pow;

/// Full chain validation: the pairwise linkage and proof-of-work walk of
/// [`validate_links`], plus a re-derivation of every block's own digest so
/// that in-place edits to any block, including the tail, are caught.
pub fn validate_chain(chain: &[Block]) -> bool {
    validate_links(chain) && chain.iter().all(block_intact)
}

/// Walks adjacent pairs, failing at the first pair whose linkage or
/// proof-of-work does not hold. Empty and single-block chains are valid.
/// Does not re-derive any block's own digest; see [`validate_chain`].
pub fn validate_links(chain: &[Block]) -> bool {
    chain.windows(2).all(|pair| pair_valid(&pair[0], &pair[1]))
}

fn pair_valid(previous: &Block, current: &Block) -> bool {
    if current.previous_hash != previous.digest() {
        return false;
    }
    pow::is_valid_proof(previous.nonce, current.nonce, &previous.hash)
}

/// A block whose stored hash no longer matches its content has been edited
/// after sealing.
fn block_intact(block: &Block) -> bool {
    block.digest() == block.hash
}
