use std::collections::HashMap;

use async_trait::async_trait;

use super::repository::{InvoiceRepository, RepositoryError};

/// Connection settings handed to a backend factory.
///
/// `backend` picks the factory; `connection_string` means whatever that
/// backend wants it to mean (a file path, a URL, nothing at all). The
/// memory backend ignores it entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: String,
    pub connection_string: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            connection_string: String::new(),
        }
    }
}

/// Opens repositories for one storage backend.
///
/// Each backend crate exports a unit struct implementing this trait; the
/// CLI registers every known backend under its `backend_name` at startup.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    /// Lowercase name this factory is registered under.
    fn backend_name(&self) -> &'static str;

    /// Open the backing store described by `config` and hand back a
    /// working repository.
    async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn InvoiceRepository>, RepositoryError>;
}

/// Maps backend names to their factories.
pub struct RepositoryRegistry {
    factories: HashMap<&'static str, Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Adds a factory, replacing any earlier one registered under the
    /// same name.
    pub fn register(&mut self, factory: Box<dyn RepositoryFactory>) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Registered backend names, sorted.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Opens a repository through the factory named by `config.backend`.
    ///
    /// # Errors
    ///
    /// [`RepositoryError::Configuration`] when no such backend is
    /// registered; otherwise whatever the chosen factory returns.
    pub async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn InvoiceRepository>, RepositoryError> {
        let factory = self.factories.get(config.backend.as_str()).ok_or_else(|| {
            RepositoryError::Configuration(format!(
                "no '{}' backend registered (available: {})",
                config.backend,
                self.available_backends().join(", ")
            ))
        })?;

        factory.create(config).await
    }
}

impl Default for RepositoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::models::{Client, Invoice, NewClient, NewInvoice};

    use super::*;

    // The registry tests only route create calls; none of the repository
    // methods are ever reached.
    struct NullRepository;

    #[async_trait]
    impl InvoiceRepository for NullRepository {
        async fn create_client(&self, _client: NewClient) -> Result<Client, RepositoryError> {
            unimplemented!()
        }
        async fn get_client(&self, _id: i64) -> Result<Client, RepositoryError> {
            unimplemented!()
        }
        async fn update_client(&self, _client: &Client) -> Result<(), RepositoryError> {
            unimplemented!()
        }
        async fn delete_client(&self, _id: i64) -> Result<(), RepositoryError> {
            unimplemented!()
        }
        async fn list_clients(&self) -> Result<Vec<Client>, RepositoryError> {
            unimplemented!()
        }
        async fn create_invoice(&self, _invoice: NewInvoice) -> Result<Invoice, RepositoryError> {
            unimplemented!()
        }
        async fn get_invoice(&self, _id: i64) -> Result<Invoice, RepositoryError> {
            unimplemented!()
        }
        async fn delete_invoice(&self, _id: i64) -> Result<(), RepositoryError> {
            unimplemented!()
        }
        async fn list_invoices(&self) -> Result<Vec<Invoice>, RepositoryError> {
            unimplemented!()
        }
        async fn list_invoices_for_client(
            &self,
            _client_id: i64,
        ) -> Result<Vec<Invoice>, RepositoryError> {
            unimplemented!()
        }
    }

    /// Counts how often its `create` runs, so tests can tell exactly which
    /// factory the registry dispatched to.
    struct CountingFactory {
        name: &'static str,
        opened: Arc<AtomicUsize>,
    }

    impl CountingFactory {
        fn boxed(name: &'static str) -> (Box<dyn RepositoryFactory>, Arc<AtomicUsize>) {
            let opened = Arc::new(AtomicUsize::new(0));
            let factory = Box::new(Self {
                name,
                opened: opened.clone(),
            });
            (factory, opened)
        }
    }

    #[async_trait]
    impl RepositoryFactory for CountingFactory {
        fn backend_name(&self) -> &'static str {
            self.name
        }
        async fn create(
            &self,
            _config: &StoreConfig,
        ) -> Result<Box<dyn InvoiceRepository>, RepositoryError> {
            self.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(NullRepository))
        }
    }

    struct BrokenFactory;

    #[async_trait]
    impl RepositoryFactory for BrokenFactory {
        fn backend_name(&self) -> &'static str {
            "broken"
        }
        async fn create(
            &self,
            _config: &StoreConfig,
        ) -> Result<Box<dyn InvoiceRepository>, RepositoryError> {
            Err(RepositoryError::Connection(
                "backend unavailable".to_string(),
            ))
        }
    }

    fn config_for(backend: &str) -> StoreConfig {
        StoreConfig {
            backend: backend.to_string(),
            connection_string: String::new(),
        }
    }

    #[test]
    fn default_config_targets_the_memory_backend() {
        let config = StoreConfig::default();

        assert_eq!(config.backend, "memory");
        assert_eq!(config.connection_string, "");
    }

    #[test]
    fn empty_registry_knows_no_backends() {
        assert!(RepositoryRegistry::new().available_backends().is_empty());
    }

    #[test]
    fn backend_list_is_sorted_and_free_of_duplicates() {
        let mut registry = RepositoryRegistry::new();
        let (zeta, _) = CountingFactory::boxed("zeta");
        let (alpha, _) = CountingFactory::boxed("alpha");
        let (zeta_again, _) = CountingFactory::boxed("zeta");
        registry.register(zeta);
        registry.register(alpha);
        registry.register(zeta_again);

        assert_eq!(registry.available_backends(), vec!["alpha", "zeta"]);
    }

    #[tokio::test]
    async fn create_opens_only_the_requested_backend() {
        let mut registry = RepositoryRegistry::new();
        let (memory, memory_opened) = CountingFactory::boxed("memory");
        let (other, other_opened) = CountingFactory::boxed("other");
        registry.register(memory);
        registry.register(other);

        registry
            .create(&config_for("memory"))
            .await
            .expect("create failed");

        assert_eq!(memory_opened.load(Ordering::SeqCst), 1);
        assert_eq!(other_opened.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn replaced_factory_never_sees_another_create() {
        let mut registry = RepositoryRegistry::new();
        let (old, old_opened) = CountingFactory::boxed("memory");
        let (new, new_opened) = CountingFactory::boxed("memory");
        registry.register(old);
        registry.register(new);

        registry
            .create(&StoreConfig::default())
            .await
            .expect("create failed");

        assert_eq!(old_opened.load(Ordering::SeqCst), 0);
        assert_eq!(new_opened.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unregistered_backend_is_a_configuration_error() {
        let mut registry = RepositoryRegistry::new();
        let (memory, _) = CountingFactory::boxed("memory");
        registry.register(memory);

        let err = registry
            .create(&config_for("postgres"))
            .await
            .err()
            .expect("expected an error");

        match err {
            RepositoryError::Configuration(message) => {
                assert!(message.contains("postgres"), "message: {message}");
                assert!(message.contains("memory"), "message: {message}");
            }
            other => panic!("expected Configuration, got {other:#?}"),
        }
    }

    #[tokio::test]
    async fn factory_failures_pass_through_unchanged() {
        let mut registry = RepositoryRegistry::new();
        registry.register(Box::new(BrokenFactory));

        let err = registry
            .create(&config_for("broken"))
            .await
            .err()
            .expect("expected an error");

        assert_eq!(
            err,
            RepositoryError::Connection("backend unavailable".to_string())
        );
    }
}
