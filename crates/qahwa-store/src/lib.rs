//! # qahwa-store: In-Memory Entity Store for Qahwa
//!
//! This crate owns all runtime state for the café platform: products, users,
//! branches, rewards, carts, orders, and inventory, held in memory behind a
//! single lock and reached through per-entity repositories.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Qahwa Data Flow                                  │
//! │                                                                         │
//! │  Caller (API handler, demo binary, test)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    qahwa-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │     Store     │    │  Repositories │    │     Seed     │  │   │
//! │  │   │  (store.rs)   │    │ (product.rs)  │    │  (seed.rs)   │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ Arc<Shared>   │◄───│ ProductRepo   │    │ demo menu,   │  │   │
//! │  │   │ RwLock over   │    │ CartRepo      │    │ branches,    │  │   │
//! │  │   │ Collections   │    │ OrderRepo ... │    │ rewards ...  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      qahwa-core                                 │   │
//! │  │   pure math: cart aggregation, loyalty, routing, validation     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - Shared state container and repository accessors
//! - [`config`] - TOML/env configuration with validation
//! - [`ids`] - Entity identifier generation
//! - [`repository`] - Repository implementations (product, cart, order, etc.)
//!
//! ## Usage
//!
//! ```rust
//! use qahwa_store::{Store, StoreConfig};
//!
//! let mut config = StoreConfig::default();
//! config.seed.demo_data = true;
//! let store = Store::new(config).expect("valid default config");
//!
//! let menu = store.products().list(&Default::default());
//! assert!(!menu.is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod ids;
pub mod repository;
pub mod store;

mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::StoreConfig;
pub use store::Store;

// Repository re-exports for convenience
pub use repository::branch::BranchRepository;
pub use repository::cart::CartRepository;
pub use repository::inventory::InventoryRepository;
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
pub use repository::reward::RewardRepository;
pub use repository::user::UserRepository;
