//! Memory Adapters
//!
//! Process-local implementations of storage ports.
//!
//! ## Available Adapters
//!
//! - **InMemorySessionStore** - active engagement sessions with per-session leases

mod in_memory_session_store;

pub use in_memory_session_store::InMemorySessionStore;
