//! In-memory storage backend.
//!
//! Tables live in a `BTreeMap` per table name wrapped in `Arc<RwLock<_>>`.
//! Data is not persisted and will be lost when the gateway is dropped.
//!
//! # Example
//!
//! ```rust,ignore
//! use moviestore::storage::inmemory::InMemoryGateway;
//!
//! let gateway = InMemoryGateway::new();
//! // Hand it to a MovieRepository...
//! ```

mod gateway;

pub use gateway::InMemoryGateway;
