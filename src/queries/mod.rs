//! Remote-backed pipeline stages.
//!
//! Each module provides a lightweight struct borrowing a
//! [`Session`](crate::session::Session) for its transport, rate limiters and
//! caches.

pub mod card_types;
pub mod deck_table;
pub mod decks;

pub use card_types::CardTypeResolver;
pub use deck_table::DeckTableFetcher;
pub use decks::{DeckDownloader, DownloadProgress};
