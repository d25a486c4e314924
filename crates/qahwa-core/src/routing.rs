//! # Branch Routing
//!
//! Picks the branch that should prepare an order, and estimates how long
//! preparation will take.
//!
//! ## Selection Cascade
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         route_order(...)                                │
//! │                                                                         │
//! │  1. keep open branches ──────────── none? ──► Err(NoOpenBranches)      │
//! │       │                                                                 │
//! │  2. preferred branch open? ───────────────► use it                     │
//! │       │ no                                                              │
//! │  3. pickup + customer location? ──────────► nearest by haversine       │
//! │       │ no                                                              │
//! │  4. fewest queued orders (pending + preparing, ties → first)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The caller owns the data: it passes every branch plus a map of queue
//! depths, and gets back a reference into its own slice. Nothing here
//! touches shared state or the clock.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::types::{Branch, GeoPoint, OrderType};

// =============================================================================
// Distance
// =============================================================================

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates in kilometers.
///
/// Standard haversine formula. Accurate to ~0.5% which is far more than
/// "which café is closer" needs.
///
/// ## Example
/// ```rust
/// use qahwa_core::routing::haversine_km;
/// use qahwa_core::types::GeoPoint;
///
/// let riyadh = GeoPoint { latitude: 24.7136, longitude: 46.6753 };
/// let jeddah = GeoPoint { latitude: 21.4858, longitude: 39.1925 };
///
/// let d = haversine_km(riyadh, jeddah);
/// assert!(d > 800.0 && d < 900.0);
/// ```
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlat = (to.latitude - from.latitude).to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

// =============================================================================
// Branch Selection
// =============================================================================

/// Selects the branch that should prepare an order.
///
/// ## Arguments
/// * `branches` - Every branch; closed ones are filtered out here
/// * `preferred_branch_id` - The customer's chosen branch, if any
/// * `customer_location` - Where the customer is, if they shared it
/// * `order_type` - Pickup orders with a location route to the nearest branch
/// * `queue_depths` - Pending + preparing order counts keyed by branch id;
///   branches missing from the map count as idle
///
/// ## Returns
/// A reference into `branches`, or `NoOpenBranches` when nothing is open.
pub fn route_order<'a>(
    branches: &'a [Branch],
    preferred_branch_id: Option<&str>,
    customer_location: Option<GeoPoint>,
    order_type: OrderType,
    queue_depths: &HashMap<String, usize>,
) -> CoreResult<&'a Branch> {
    let open: Vec<&Branch> = branches.iter().filter(|b| b.is_open).collect();
    if open.is_empty() {
        return Err(CoreError::NoOpenBranches);
    }

    // An open preferred branch wins outright
    if let Some(id) = preferred_branch_id {
        if let Some(branch) = open.iter().copied().find(|b| b.id == id) {
            return Ok(branch);
        }
    }

    // Pickup with a known location: closest wins
    if order_type == OrderType::Pickup {
        if let Some(location) = customer_location {
            return open
                .iter()
                .copied()
                .min_by(|a, b| {
                    haversine_km(location, a.location)
                        .total_cmp(&haversine_km(location, b.location))
                })
                .ok_or(CoreError::NoOpenBranches);
        }
    }

    // Load balance: fewest queued orders, ties go to the first branch
    open.iter()
        .copied()
        .min_by_key(|b| queue_depths.get(&b.id).copied().unwrap_or(0))
        .ok_or(CoreError::NoOpenBranches)
}

// =============================================================================
// Preparation Estimate
// =============================================================================

/// Preparation estimate in minutes for an order of `total_quantity` items.
///
/// Linear model: `base + per_item × quantity`. The store's configuration
/// supplies the coefficients (defaults: 5 and 3).
///
/// ## Example
/// ```rust
/// use qahwa_core::routing::estimate_minutes;
///
/// // 3 drinks with the default model: 5 + 3 × 3 = 14 minutes
/// assert_eq!(estimate_minutes(3, 5, 3), 14);
/// ```
#[inline]
pub const fn estimate_minutes(total_quantity: i64, base: i64, per_item: i64) -> i64 {
    base + per_item * total_quantity
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::BilingualText;
    use crate::types::WorkingHours;
    use chrono::{NaiveTime, Utc};

    fn test_branch(id: &str, lat: f64, lon: f64, is_open: bool) -> Branch {
        let now = Utc::now();
        Branch {
            id: id.to_string(),
            name: BilingualText::new(format!("Branch {id}"), format!("فرع {id}")),
            address: BilingualText::new("King Fahd Road", "طريق الملك فهد"),
            phone: "0112345678".to_string(),
            location: GeoPoint {
                latitude: lat,
                longitude: lon,
            },
            working_hours: WorkingHours {
                opens_at: NaiveTime::MIN,
                closes_at: NaiveTime::MIN,
            },
            is_open,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_haversine_zero_distance() {
        let p = GeoPoint {
            latitude: 24.7136,
            longitude: 46.6753,
        };
        assert!(haversine_km(p, p) < 1e-9);
    }

    #[test]
    fn test_haversine_one_degree_at_equator() {
        // One degree of longitude at the equator is ~111.19 km
        let a = GeoPoint {
            latitude: 0.0,
            longitude: 0.0,
        };
        let b = GeoPoint {
            latitude: 0.0,
            longitude: 1.0,
        };
        let d = haversine_km(a, b);
        assert!((d - 111.19).abs() < 0.5, "got {d}");
    }

    #[test]
    fn test_haversine_riyadh_to_jeddah() {
        let riyadh = GeoPoint {
            latitude: 24.7136,
            longitude: 46.6753,
        };
        let jeddah = GeoPoint {
            latitude: 21.4858,
            longitude: 39.1925,
        };
        let d = haversine_km(riyadh, jeddah);
        assert!(d > 800.0 && d < 900.0, "got {d}");
    }

    #[test]
    fn test_no_branches_at_all() {
        let err = route_order(&[], None, None, OrderType::Pickup, &HashMap::new());
        assert!(matches!(err, Err(CoreError::NoOpenBranches)));
    }

    #[test]
    fn test_all_branches_closed() {
        let branches = vec![
            test_branch("a", 24.7, 46.6, false),
            test_branch("b", 24.8, 46.7, false),
        ];
        let err = route_order(&branches, None, None, OrderType::Pickup, &HashMap::new());
        assert!(matches!(err, Err(CoreError::NoOpenBranches)));
    }

    #[test]
    fn test_preferred_open_branch_wins() {
        let branches = vec![
            test_branch("a", 24.7, 46.6, true),
            test_branch("b", 24.8, 46.7, true),
        ];
        // Even though "a" would win every other rule, the preference holds
        let chosen = route_order(
            &branches,
            Some("b"),
            Some(branches[0].location),
            OrderType::Pickup,
            &HashMap::new(),
        )
        .unwrap();
        assert_eq!(chosen.id, "b");
    }

    #[test]
    fn test_closed_preferred_branch_falls_through() {
        let branches = vec![
            test_branch("a", 24.7, 46.6, true),
            test_branch("b", 24.8, 46.7, false),
        ];
        let chosen = route_order(&branches, Some("b"), None, OrderType::Pickup, &HashMap::new())
            .unwrap();
        assert_eq!(chosen.id, "a");
    }

    #[test]
    fn test_pickup_with_location_routes_to_nearest() {
        let branches = vec![
            test_branch("far", 25.5, 47.5, true),
            test_branch("near", 24.72, 46.68, true),
        ];
        let customer = GeoPoint {
            latitude: 24.7136,
            longitude: 46.6753,
        };
        let chosen = route_order(
            &branches,
            None,
            Some(customer),
            OrderType::Pickup,
            &HashMap::new(),
        )
        .unwrap();
        assert_eq!(chosen.id, "near");
    }

    #[test]
    fn test_delivery_ignores_location_and_balances_load() {
        let branches = vec![
            test_branch("near_busy", 24.72, 46.68, true),
            test_branch("far_idle", 25.5, 47.5, true),
        ];
        let customer = GeoPoint {
            latitude: 24.7136,
            longitude: 46.6753,
        };
        let mut depths = HashMap::new();
        depths.insert("near_busy".to_string(), 5);
        depths.insert("far_idle".to_string(), 1);

        let chosen = route_order(
            &branches,
            None,
            Some(customer),
            OrderType::Delivery,
            &depths,
        )
        .unwrap();
        assert_eq!(chosen.id, "far_idle");
    }

    #[test]
    fn test_no_location_routes_to_least_loaded() {
        let branches = vec![
            test_branch("a", 24.7, 46.6, true),
            test_branch("b", 24.8, 46.7, true),
            test_branch("c", 24.9, 46.8, true),
        ];
        let mut depths = HashMap::new();
        depths.insert("a".to_string(), 3);
        depths.insert("b".to_string(), 1);
        depths.insert("c".to_string(), 2);

        let chosen =
            route_order(&branches, None, None, OrderType::Pickup, &depths).unwrap();
        assert_eq!(chosen.id, "b");
    }

    #[test]
    fn test_missing_queue_depth_counts_as_idle() {
        let branches = vec![
            test_branch("a", 24.7, 46.6, true),
            test_branch("b", 24.8, 46.7, true),
        ];
        let mut depths = HashMap::new();
        depths.insert("a".to_string(), 2);
        // "b" absent from the map → depth 0

        let chosen =
            route_order(&branches, None, None, OrderType::Delivery, &depths).unwrap();
        assert_eq!(chosen.id, "b");
    }

    #[test]
    fn test_load_tie_goes_to_first_branch() {
        let branches = vec![
            test_branch("a", 24.7, 46.6, true),
            test_branch("b", 24.8, 46.7, true),
        ];
        let chosen = route_order(&branches, None, None, OrderType::Pickup, &HashMap::new())
            .unwrap();
        assert_eq!(chosen.id, "a");
    }

    #[test]
    fn test_estimate_minutes_linear_model() {
        assert_eq!(estimate_minutes(3, 5, 3), 14);
        assert_eq!(estimate_minutes(1, 5, 3), 8);
        assert_eq!(estimate_minutes(0, 5, 3), 5);
    }
}
