//! Product catalog module.
//!
//! Contains the read-only snapshots served by the product and stock lookups.

mod inventory;
mod product;

pub use inventory::StockRecord;
pub use product::Product;
