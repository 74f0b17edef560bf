//! Per-product serialization of cart operations.
//!
//! Operations on the same product run strictly one after another, in the
//! order they asked for the gate (tokio's mutex is FIFO). Operations on
//! different products do not wait for each other.

use crate::ids::ProductId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Hands out one async lock per product id.
#[derive(Debug, Default)]
pub struct ProductGate {
    slots: Mutex<HashMap<ProductId, Arc<AsyncMutex<()>>>>,
}

/// Proof of exclusive access to one product; released on drop.
#[derive(Debug)]
pub struct GateGuard {
    product_id: ProductId,
    _lock: OwnedMutexGuard<()>,
}

impl GateGuard {
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }
}

impl ProductGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other operation holds `product_id`.
    pub async fn acquire(&self, product_id: ProductId) -> GateGuard {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            // Idle slots are only referenced by the map.
            slots.retain(|_, slot| Arc::strong_count(slot) > 1);
            Arc::clone(slots.entry(product_id).or_default())
        };

        GateGuard {
            product_id,
            _lock: slot.lock_owned().await,
        }
    }

    /// Number of products with an operation running or queued.
    pub fn busy(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.values().filter(|slot| Arc::strong_count(slot) > 1).count()
    }
}
