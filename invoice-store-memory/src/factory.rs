use async_trait::async_trait;

use invoice_core::store::factory::{RepositoryFactory, StoreConfig};
use invoice_core::{InvoiceRepository, RepositoryError};

use crate::repository::MemoryRepository;

/// Factory for the `memory` backend.
///
/// The connection string is ignored; every `create` call returns a fresh,
/// empty store.
pub struct MemoryRepositoryFactory;

#[async_trait]
impl RepositoryFactory for MemoryRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        _config: &StoreConfig,
    ) -> Result<Box<dyn InvoiceRepository>, RepositoryError> {
        Ok(Box::new(MemoryRepository::new()))
    }
}
