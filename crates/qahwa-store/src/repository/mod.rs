//! # Repository Layer
//!
//! One repository per entity, all sharing the store's locked collections.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Repository Layer                                  │
//! │                                                                         │
//! │   Store accessor          Repository              Owns                  │
//! │   ──────────────          ──────────              ────                  │
//! │   store.products()   ──►  ProductRepository       menu CRUD + stock    │
//! │   store.users()      ──►  UserRepository          profiles + points    │
//! │   store.branches()   ──►  BranchRepository        locations + hours    │
//! │   store.rewards()    ──►  RewardRepository        catalog + ledger     │
//! │   store.carts()      ──►  CartRepository          lines + summaries    │
//! │   store.orders()     ──►  OrderRepository         placement + status   │
//! │   store.inventory()  ──►  InventoryRepository     back-of-house stock  │
//! │                                                                         │
//! │   Common contract: get → Option<T>, list → Vec<T>, mutations →         │
//! │   CoreResult<T> with NotFound on missing ids. Input structs            │
//! │   (NewProduct, ProductUpdate, ...) are plain serde types; entities     │
//! │   are never accepted wholesale from callers.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod branch;
pub mod cart;
pub mod inventory;
pub mod order;
pub mod product;
pub mod reward;
pub mod user;
