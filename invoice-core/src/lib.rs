pub mod calculations;
pub mod models;
pub mod store;

pub use store::repository::{InvoiceRepository, RepositoryError};
pub use models::*;
