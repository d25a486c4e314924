//! # Store Container
//!
//! Shared state for the whole platform and the accessors that hand out
//! per-entity repositories.
//!
//! ## Locking Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Store Internals                                  │
//! │                                                                         │
//! │   Store ──► Arc<Shared> ──┬── RwLock<Collections>                      │
//! │   (Clone)                 │    products, users, branches, rewards,     │
//! │                           │    cart_items, cart_rewards, orders,       │
//! │                           │    inventory, redemptions                  │
//! │                           │                                             │
//! │                           └── StoreConfig (immutable after startup)    │
//! │                                                                         │
//! │   Every repository operation is exactly ONE read(..) or write(..)      │
//! │   closure. Multi-entity updates (debit points + push cart reward)      │
//! │   therefore commit atomically or not at all.                           │
//! │                                                                         │
//! │   Reads return clones - no references escape the lock.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, RwLock};

use tracing::info;

use qahwa_core::{
    Branch, CartItem, CartReward, CoreResult, InventoryItem, Order, Product, Redemption, Reward,
    User,
};

use crate::config::StoreConfig;
use crate::repository::branch::BranchRepository;
use crate::repository::cart::CartRepository;
use crate::repository::inventory::InventoryRepository;
use crate::repository::order::OrderRepository;
use crate::repository::product::ProductRepository;
use crate::repository::reward::RewardRepository;
use crate::repository::user::UserRepository;
use crate::seed;

// =============================================================================
// Collections
// =============================================================================

/// Every entity collection, insertion-ordered, keyed by id via linear scan.
#[derive(Debug, Default)]
pub(crate) struct Collections {
    pub products: Vec<Product>,
    pub users: Vec<User>,
    pub branches: Vec<Branch>,
    pub rewards: Vec<Reward>,
    pub cart_items: Vec<CartItem>,
    pub cart_rewards: Vec<CartReward>,
    pub orders: Vec<Order>,
    pub inventory: Vec<InventoryItem>,
    pub redemptions: Vec<Redemption>,
}

// =============================================================================
// Shared State
// =============================================================================

/// The state behind every repository handle.
#[derive(Debug)]
pub(crate) struct Shared {
    collections: RwLock<Collections>,
    pub(crate) config: StoreConfig,
}

impl Shared {
    fn new(collections: Collections, config: StoreConfig) -> Self {
        Shared {
            collections: RwLock::new(collections),
            config,
        }
    }

    /// Runs `f` under the read lock.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&Collections) -> R) -> R {
        let guard = self.collections.read().expect("store lock poisoned");
        f(&guard)
    }

    /// Runs `f` under the write lock. One closure per operation; everything
    /// the closure touches commits together.
    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut Collections) -> R) -> R {
        let mut guard = self.collections.write().expect("store lock poisoned");
        f(&mut guard)
    }
}

// =============================================================================
// Store
// =============================================================================

/// Handle to the in-memory entity store.
///
/// Cheap to clone; clones share the same underlying state.
///
/// ## Usage
/// ```rust
/// use qahwa_store::{Store, StoreConfig};
///
/// let store = Store::new(StoreConfig::default()).expect("valid config");
/// let espresso = store.products().get("prod_espresso");
/// assert!(espresso.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct Store {
    shared: Arc<Shared>,
}

impl Store {
    /// Builds a store from the given configuration.
    ///
    /// Validates the config and, when `seed.demo_data` is set, inserts the
    /// demo dataset.
    pub fn new(config: StoreConfig) -> CoreResult<Self> {
        config.validate()?;

        let mut collections = Collections::default();
        if config.seed.demo_data {
            seed::populate(&mut collections);
        }

        info!(
            cafe = %config.cafe.name,
            seeded = config.seed.demo_data,
            "Entity store initialized"
        );

        Ok(Store {
            shared: Arc::new(Shared::new(collections, config)),
        })
    }

    /// Builds an empty, unseeded store with default policies.
    ///
    /// Intended for tests that want full control over the dataset.
    pub fn empty() -> Self {
        let mut config = StoreConfig::default();
        config.seed.demo_data = false;

        Store {
            shared: Arc::new(Shared::new(Collections::default(), config)),
        }
    }

    /// Returns the configuration this store was built with.
    pub fn config(&self) -> &StoreConfig {
        &self.shared.config
    }

    // =========================================================================
    // Repository Accessors
    // =========================================================================

    /// Returns the product repository.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.shared.clone())
    }

    /// Returns the user repository.
    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.shared.clone())
    }

    /// Returns the branch repository.
    pub fn branches(&self) -> BranchRepository {
        BranchRepository::new(self.shared.clone())
    }

    /// Returns the reward catalog and ledger repository.
    pub fn rewards(&self) -> RewardRepository {
        RewardRepository::new(self.shared.clone())
    }

    /// Returns the cart repository.
    pub fn carts(&self) -> CartRepository {
        CartRepository::new(self.shared.clone())
    }

    /// Returns the order repository.
    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.shared.clone())
    }

    /// Returns the inventory repository.
    pub fn inventory(&self) -> InventoryRepository {
        InventoryRepository::new(self.shared.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
