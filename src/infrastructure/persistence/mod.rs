//! # Persistence
//!
//! Repository ports and the in-memory reference implementation.

pub mod in_memory;
pub mod traits;

pub use in_memory::InMemoryNegotiationStore;
pub use traits::{
    NegotiationHistoryRepository, Page, Pagination, QuoteFilter, QuoteRepository,
    RepositoryError, RepositoryResult,
};
