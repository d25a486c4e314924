//! # Entity Identifier Generation
//!
//! Every stored entity gets an id of the form:
//!
//! ```text
//! {prefix}_{unix_millis}_{8 hex chars}
//!
//! prod_1735804800123_9f3a1c2e
//! └┬─┘ └─────┬──────┘ └──┬───┘
//!  │         │           └── first 8 chars of a random UUID v4
//!  │         └── creation time in milliseconds (roughly sortable)
//!  └── entity prefix
//! ```
//!
//! Prefixes in use: `prod`, `user`, `branch`, `rwd`, `item` (cart line),
//! `crw` (applied cart reward), `order`, `inv`, `rdm` (redemption).
//!
//! Seed data uses stable hand-written ids instead (`prod_latte`) so demo
//! lookups and tests stay deterministic.

use chrono::Utc;
use uuid::Uuid;

/// Generates a fresh entity id for the given prefix.
///
/// Collision resistance comes from the UUID suffix; the millisecond stamp
/// keeps ids roughly ordered by creation time, which makes logs and debug
/// dumps easy to scan.
pub fn entity_id(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}", prefix, millis, &suffix[..8])
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_shape() {
        let id = entity_id("prod");
        assert!(id.starts_with("prod_"));

        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 8);
        assert!(parts[2].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_entity_id_unique() {
        let a = entity_id("order");
        let b = entity_id("order");
        assert_ne!(a, b);
    }

    #[test]
    fn test_entity_id_keeps_prefix_verbatim() {
        assert!(entity_id("rdm").starts_with("rdm_"));
        assert!(entity_id("crw").starts_with("crw_"));
    }
}
