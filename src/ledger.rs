// Thin re-export module: implementation is in `ledger/core.rs` to allow
// progressive decomposition of ledger responsibilities (chain management,
// sealing, validation).

pub mod core;
pub use self::core::*;
