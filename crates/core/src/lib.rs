//! Core record model and storage abstractions for moviestore.
//!
//! Everything in this crate is pure apart from calls made through the
//! injected [`storage::StoreGateway`].

pub mod movie;
pub mod storage;
