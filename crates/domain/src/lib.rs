pub mod aggregates;
pub mod commands;
pub mod events;
pub mod wine;

pub use aggregates::stock::{NegativeStockError, StockSummary};
pub use events::{EventType, NewInventoryEvent, StoredInventoryEvent};
pub use wine::{NewWine, Wine, WineType};
