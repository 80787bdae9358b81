pub mod catalog;
pub mod service;

pub use catalog::{InMemoryWineCatalog, PostgresWineCatalog, WineCatalog};
pub use service::{LedgerError, LedgerService};
