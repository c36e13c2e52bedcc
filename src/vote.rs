//! Vote payload submitted by the request layer.
//!
//! The ledger treats every item as an opaque JSON payload; this record is the
//! shape the voting front end actually casts, kept on the caller's side of
//! that boundary.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub voter_id: u64,
    pub candidate_id: u64,
    pub election_id: u64,
    /// RFC 3339 submission time, stamped when the vote is created.
    pub cast_at: String,
}

impl Vote {
    pub fn new(voter_id: u64, candidate_id: u64, election_id: u64) -> Self {
        Vote {
            voter_id,
            candidate_id,
            election_id,
            cast_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Render the vote as the opaque item the ledger buffers.
    pub fn into_item(self) -> Value {
        json!({
            "voter_id": self.voter_id,
            "candidate_id": self.candidate_id,
            "election_id": self.election_id,
            "cast_at": self.cast_at,
        })
    }
}
