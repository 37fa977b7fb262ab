//! Command implementations for the invoicing CLI.
//!
//! Each subcommand lives in [`commands`] and returns its output as a
//! `String`, so the binary only does argument parsing and printing.

pub mod commands;

use invoice_core::store::RepositoryRegistry;
use invoice_store_memory::MemoryRepositoryFactory;

/// Registry of every storage backend the CLI knows about.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(MemoryRepositoryFactory));
    registry
}
