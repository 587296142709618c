//! Infrastructure layer: storage, relation indexes, config and the facade
//! that ties the entity kinds together.

pub mod config;
pub mod facade;
pub mod relation_index;
pub mod repository;


pub use config::{DeletePolicy, LodgebaseConfig};
pub use facade::{Facade, Repositories};
pub use relation_index::RelationIndex;
pub use repository::{InMemoryRepository, Repository};
