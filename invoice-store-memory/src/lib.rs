//! In-memory backend for the invoice repository seam.
//!
//! Holds clients and invoices in process memory behind an `RwLock`. Used by
//! the CLI (which loads its working set from CSV on every run) and by tests
//! that need a real repository without a database.

mod factory;
mod repository;

pub use factory::MemoryRepositoryFactory;
pub use repository::MemoryRepository;
