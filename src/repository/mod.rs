//! Repository Layer
//!
//! Data access abstractions and implementations.

mod traits;
mod db;
mod document;
mod document_store;
mod memory_store;


pub use traits::{RecordStore, ProfileStore, FLEETS_COLLECTION};
pub use db::init_db;
pub use document_store::SqliteDocumentStore;
pub use memory_store::MemoryDocumentStore;
