// crates/renown-store/src/lib.rs
//
// renown-store: Storage layer for the Renown engine.
//
// Provides the two `StateStore` backends (RocksDB for the daemon and CLI,
// an in-memory store for tests and simulations) and `FileLedger`, a
// JSON-file-backed stand-in for the external activity ledger that also
// accepts reward credits.

pub mod ledger;
pub mod memory;
pub mod rocks;

// Re-export key types for ergonomic access from downstream crates.
pub use ledger::{FileLedger, LedgerRecord};
pub use memory::MemoryStore;
pub use rocks::RocksStateStore;
