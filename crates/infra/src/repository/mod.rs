//! Generic keyed storage boundary.
//!
//! One repository per entity kind. Repositories store and return whole
//! entities and know nothing about relationships between kinds; that is the
//! facade's responsibility.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryRepository;
pub use r#trait::Repository;
