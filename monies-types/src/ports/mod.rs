//! Port traits (interfaces for adapters).
//!
//! Persistence adapters implement these; the core never depends on a
//! concrete database.

mod repository;

pub use repository::MoneyRepository;
