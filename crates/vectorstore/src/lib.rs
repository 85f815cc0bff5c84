//! Reference document index backends for ragturn.
//!
//! These backends rank by keyword overlap; they exist so a turn can run
//! end-to-end without an external vector database. Production deployments
//! plug their own [`ragturn_core::IndexFactory`] in instead.

pub mod factory;
pub mod file_backend;
pub mod in_memory;

pub use factory::StoreFactory;
pub use file_backend::FileIndex;
pub use in_memory::InMemoryIndex;
