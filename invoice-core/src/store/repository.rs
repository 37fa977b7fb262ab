use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Client, Invoice, NewClient, NewInvoice};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    #[error("duplicate record: {0}")]
    Duplicate(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Storage seam for clients and invoices.
///
/// The calculation and rendering layers never touch a backend directly; they
/// receive models loaded through this trait. Backends live in their own
/// crates and register themselves via the
/// [`RepositoryRegistry`](crate::store::factory::RepositoryRegistry).
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    // Clients
    async fn create_client(&self, client: NewClient) -> Result<Client, RepositoryError>;
    async fn get_client(&self, id: i64) -> Result<Client, RepositoryError>;
    async fn update_client(&self, client: &Client) -> Result<(), RepositoryError>;

    /// Deletes a client and every invoice issued to it.
    async fn delete_client(&self, id: i64) -> Result<(), RepositoryError>;

    async fn list_clients(&self) -> Result<Vec<Client>, RepositoryError>;

    // Invoices
    async fn create_invoice(&self, invoice: NewInvoice) -> Result<Invoice, RepositoryError>;
    async fn get_invoice(&self, id: i64) -> Result<Invoice, RepositoryError>;
    async fn delete_invoice(&self, id: i64) -> Result<(), RepositoryError>;
    async fn list_invoices(&self) -> Result<Vec<Invoice>, RepositoryError>;

    async fn list_invoices_for_client(
        &self,
        client_id: i64,
    ) -> Result<Vec<Invoice>, RepositoryError>;
}
