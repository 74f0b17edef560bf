//! Key-value persistence layer for the cart workspace.
//!
//! Provides a raw byte-store port ([`KvStore`]) with several backends and a
//! typed wrapper ([`Cache`]) that handles JSON serialization.
//!
//! # Example
//!
//! ```rust
//! use cart_cache::{cache_key, Cache};
//!
//! let cache = Cache::memory();
//! let key = cache_key!("cart", "default");
//!
//! cache.set(&key, &vec![1u64, 2, 3]).unwrap();
//! let ids: Option<Vec<u64>> = cache.get(&key).unwrap();
//! assert_eq!(ids, Some(vec![1, 2, 3]));
//! ```

mod error;
mod file;
mod kv;
mod memory;
#[cfg(target_arch = "wasm32")]
mod spin;

pub use error::CacheError;
pub use file::FileStore;
pub use kv::{Cache, KvStore};
pub use memory::MemoryStore;
#[cfg(target_arch = "wasm32")]
pub use spin::SpinStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KvStore, MemoryStore};
}
