//! Single-flight lanes
//!
//! At most one command per entity is between dispatch and settlement.
//! Commands on the same entity queue on its lane in arrival order, so a later
//! command's response always lands after an earlier one's.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    sync::{Arc, Mutex, PoisonError},
};

use rustc_hash::FxHashMap;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Entity a command is serialized against.
///
/// Detail keys cover the single order or product on screen, whichever id
/// is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Cart,
    OrderList,
    OrderDetail,
    Catalog,
    ProductDetail,
}

impl Display for EntityKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            EntityKey::Cart => f.write_str("cart"),
            EntityKey::OrderList => f.write_str("orders"),
            EntityKey::OrderDetail => f.write_str("order"),
            EntityKey::Catalog => f.write_str("catalog"),
            EntityKey::ProductDetail => f.write_str("product"),
        }
    }
}

/// Per-entity async mutexes, shared by every store.
#[derive(Debug, Default)]
pub struct Lanes {
    lanes: Mutex<FxHashMap<EntityKey, Arc<AsyncMutex<()>>>>,
}

/// Held from dispatch to settlement.
#[derive(Debug)]
pub struct LaneGuard {
    key: EntityKey,
    _guard: OwnedMutexGuard<()>,
}

impl LaneGuard {
    pub fn key(&self) -> EntityKey {
        self.key
    }
}

impl Lanes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the lane of `key` to be free and take it.
    pub async fn acquire(&self, key: EntityKey) -> LaneGuard {
        let lane = {
            let mut lanes = self.lanes.lock().unwrap_or_else(PoisonError::into_inner);

            // Idle lanes are only referenced by the map.
            lanes.retain(|_, lane| Arc::strong_count(lane) > 1);

            Arc::clone(lanes.entry(key).or_default())
        };

        LaneGuard {
            key,
            _guard: lane.lock_owned().await,
        }
    }

    /// Number of lanes with a holder or a waiter.
    pub fn active(&self) -> usize {
        self.lanes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|lane| Arc::strong_count(lane) > 1)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;

    #[tokio::test]
    async fn same_entity_waits_for_release() {
        let lanes = Lanes::new();
        let held = lanes.acquire(EntityKey::Cart).await;

        let blocked = timeout(Duration::from_millis(20), lanes.acquire(EntityKey::Cart)).await;
        assert!(blocked.is_err(), "second cart command should wait");

        drop(held);

        let next = timeout(Duration::from_millis(20), lanes.acquire(EntityKey::Cart)).await;
        assert!(next.is_ok(), "cart lane should be free after release");
    }

    #[tokio::test]
    async fn different_entities_do_not_block() {
        let lanes = Lanes::new();
        let _cart = lanes.acquire(EntityKey::Cart).await;

        let order = timeout(
            Duration::from_millis(20),
            lanes.acquire(EntityKey::OrderDetail),
        )
        .await;

        assert!(order.is_ok(), "order lane should not wait on the cart lane");

        drop(order);

        assert_eq!(lanes.active(), 1, "dropped order guard frees its lane");
    }

    #[tokio::test]
    async fn idle_lanes_are_pruned() {
        let lanes = Lanes::new();

        for key in [
            EntityKey::OrderList,
            EntityKey::OrderDetail,
            EntityKey::Catalog,
            EntityKey::ProductDetail,
        ] {
            let guard = lanes.acquire(key).await;
            assert_eq!(guard.key(), key);
        }

        let _cart = lanes.acquire(EntityKey::Cart).await;

        assert_eq!(lanes.active(), 1);
    }
}
