use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::debug;

use invoice_core::{
    Client, Invoice, InvoiceRepository, NewClient, NewInvoice, RepositoryError,
};

#[derive(Default)]
struct State {
    clients: BTreeMap<i64, Client>,
    invoices: BTreeMap<i64, Invoice>,
    next_client_id: i64,
    next_invoice_id: i64,
}

/// In-memory [`InvoiceRepository`] over `RwLock`ed maps.
///
/// Ids are assigned sequentially starting at 1. The unique `invoice_id`
/// constraint and the client/invoice foreign key are enforced the way a
/// relational backend would enforce them.
pub struct MemoryRepository {
    state: RwLock<State>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, RepositoryError> {
        self.state
            .read()
            .map_err(|_| RepositoryError::Storage("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, RepositoryError> {
        self.state
            .write()
            .map_err(|_| RepositoryError::Storage("store lock poisoned".to_string()))
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InvoiceRepository for MemoryRepository {
    async fn create_client(
        &self,
        client: NewClient,
    ) -> Result<Client, RepositoryError> {
        let mut state = self.write()?;
        state.next_client_id += 1;
        let id = state.next_client_id;

        let client = client.with_id(id);
        state.clients.insert(id, client.clone());
        debug!(client_id = id, "created client");
        Ok(client)
    }

    async fn get_client(
        &self,
        id: i64,
    ) -> Result<Client, RepositoryError> {
        self.read()?
            .clients
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn update_client(
        &self,
        client: &Client,
    ) -> Result<(), RepositoryError> {
        let mut state = self.write()?;
        if !state.clients.contains_key(&client.id) {
            return Err(RepositoryError::NotFound);
        }
        state.clients.insert(client.id, client.clone());
        Ok(())
    }

    async fn delete_client(
        &self,
        id: i64,
    ) -> Result<(), RepositoryError> {
        let mut state = self.write()?;
        if state.clients.remove(&id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        // Cascade: a client's invoices do not outlive the client.
        state.invoices.retain(|_, invoice| invoice.client_id != id);
        debug!(client_id = id, "deleted client and its invoices");
        Ok(())
    }

    async fn list_clients(&self) -> Result<Vec<Client>, RepositoryError> {
        Ok(self.read()?.clients.values().cloned().collect())
    }

    async fn create_invoice(
        &self,
        invoice: NewInvoice,
    ) -> Result<Invoice, RepositoryError> {
        let mut state = self.write()?;

        if !state.clients.contains_key(&invoice.client_id) {
            return Err(RepositoryError::NotFound);
        }
        if state
            .invoices
            .values()
            .any(|existing| existing.invoice_id == invoice.invoice_id)
        {
            return Err(RepositoryError::Duplicate(format!(
                "invoice_id '{}' already exists",
                invoice.invoice_id
            )));
        }

        state.next_invoice_id += 1;
        let id = state.next_invoice_id;

        let invoice = invoice.with_id(id);
        state.invoices.insert(id, invoice.clone());
        debug!(invoice_id = id, "created invoice");
        Ok(invoice)
    }

    async fn get_invoice(
        &self,
        id: i64,
    ) -> Result<Invoice, RepositoryError> {
        self.read()?
            .invoices
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn delete_invoice(
        &self,
        id: i64,
    ) -> Result<(), RepositoryError> {
        let mut state = self.write()?;
        if state.invoices.remove(&id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn list_invoices(&self) -> Result<Vec<Invoice>, RepositoryError> {
        Ok(self.read()?.invoices.values().cloned().collect())
    }

    async fn list_invoices_for_client(
        &self,
        client_id: i64,
    ) -> Result<Vec<Invoice>, RepositoryError> {
        Ok(self
            .read()?
            .invoices
            .values()
            .filter(|invoice| invoice.client_id == client_id)
            .cloned()
            .collect())
    }
}
