//! Demo dataset: a small Riyadh café.
//!
//! Seeded entities use stable hand-written ids (`prod_latte`,
//! `branch_olaya`, ...) so walkthroughs and docs can reference them
//! directly. Ids minted at runtime keep the timestamped shape from
//! [`crate::ids`].

use chrono::{DateTime, Duration, NaiveTime, Utc};
use tracing::info;

use qahwa_core::{
    BilingualText, Branch, GeoPoint, InventoryItem, Product, ProductStatus, Reward, RewardKind,
    User, WorkingHours,
};

use crate::store::Collections;

// =============================================================================
// Builders
// =============================================================================

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    en: &str,
    ar: &str,
    description: Option<(&str, &str)>,
    category: &str,
    price_halalas: i64,
    stock: i64,
    now: DateTime<Utc>,
) -> Product {
    Product {
        id: id.to_string(),
        name: BilingualText::new(en, ar),
        description: description.map(|(d_en, d_ar)| BilingualText::new(d_en, d_ar)),
        category: category.to_string(),
        price_halalas,
        stock,
        status: ProductStatus::Active,
        created_at: now,
        updated_at: now,
    }
}

#[allow(clippy::too_many_arguments)]
fn branch(
    id: &str,
    en: &str,
    ar: &str,
    latitude: f64,
    longitude: f64,
    opens: (u32, u32),
    closes: (u32, u32),
    is_open: bool,
    now: DateTime<Utc>,
) -> Branch {
    Branch {
        id: id.to_string(),
        name: BilingualText::new(en, ar),
        address: BilingualText::new(format!("{en} District, Riyadh"), format!("حي {ar}، الرياض")),
        phone: "0112000400".to_string(),
        location: GeoPoint {
            latitude,
            longitude,
        },
        working_hours: WorkingHours {
            opens_at: hm(opens.0, opens.1),
            closes_at: hm(closes.0, closes.1),
        },
        is_open,
        created_at: now,
        updated_at: now,
    }
}

#[allow(clippy::too_many_arguments)]
fn inventory_item(
    id: &str,
    en: &str,
    ar: &str,
    category: &str,
    current_stock: i64,
    min_stock: i64,
    max_stock: i64,
    unit: &str,
    cost_halalas: i64,
    price_halalas: i64,
    restocked_days_ago: Option<i64>,
    now: DateTime<Utc>,
) -> InventoryItem {
    InventoryItem {
        id: id.to_string(),
        name: BilingualText::new(en, ar),
        category: category.to_string(),
        current_stock,
        min_stock,
        max_stock,
        unit: unit.to_string(),
        cost_halalas,
        price_halalas,
        supplier: Some("Riyadh Roastery Supplies".to_string()),
        last_restocked: restocked_days_ago.map(|d| now - Duration::days(d)),
        created_at: now,
        updated_at: now,
    }
}

// =============================================================================
// Dataset
// =============================================================================

/// Fills an empty collection set with the demo café.
pub(crate) fn populate(c: &mut Collections) {
    let now = Utc::now();

    // ----- Menu -----
    c.products.extend([
        product("prod_espresso", "Espresso", "إسبريسو", None, "espresso", 1000, 100, now),
        product(
            "prod_double_espresso",
            "Double Espresso",
            "إسبريسو مزدوج",
            None,
            "espresso",
            1200,
            100,
            now,
        ),
        product("prod_cappuccino", "Cappuccino", "كابتشينو", None, "espresso", 1600, 80, now),
        product("prod_latte", "Latte", "لاتيه", None, "espresso", 1700, 80, now),
        product("prod_flat_white", "Flat White", "فلات وايت", None, "espresso", 1700, 60, now),
        product(
            "prod_spanish_latte",
            "Spanish Latte",
            "لاتيه إسباني",
            Some((
                "Espresso with sweetened condensed milk",
                "إسبريسو مع حليب مكثف محلى",
            )),
            "espresso",
            1900,
            60,
            now,
        ),
        product(
            "prod_v60",
            "V60",
            "في ٦٠",
            Some(("Hand-poured single origin", "قهوة مقطرة محضرة يدويا")),
            "brew",
            1800,
            40,
            now,
        ),
        product("prod_cold_brew", "Cold Brew", "كولد برو", None, "brew", 2000, 40, now),
        product(
            "prod_saudi_coffee",
            "Saudi Coffee",
            "قهوة سعودية",
            Some(("With cardamom and saffron", "بالهيل والزعفران")),
            "brew",
            1400,
            50,
            now,
        ),
        product("prod_croissant", "Croissant", "كرواسون", None, "pastry", 1200, 30, now),
        product("prod_maamoul", "Date Maamoul", "معمول التمر", None, "pastry", 900, 40, now),
        product(
            "prod_pistachio_cake",
            "Pistachio Cake",
            "كيكة الفستق",
            None,
            "pastry",
            2200,
            20,
            now,
        ),
    ]);

    // ----- Branches -----
    c.branches.extend([
        branch(
            "branch_olaya",
            "Olaya",
            "العليا",
            24.6944,
            46.6846,
            (6, 0),
            (23, 30),
            true,
            now,
        ),
        branch(
            "branch_diriyah",
            "Diriyah",
            "الدرعية",
            24.7372,
            46.5753,
            (7, 0),
            (23, 0),
            true,
            now,
        ),
        // Airport kiosk closed for refurbishment
        branch(
            "branch_airport",
            "Airport",
            "المطار",
            24.9578,
            46.6989,
            (0, 0),
            (23, 59),
            false,
            now,
        ),
    ]);

    // ----- Reward catalog -----
    c.rewards.extend([
        Reward {
            id: "rwd_discount10".to_string(),
            name: BilingualText::new("10 SR Off", "خصم ١٠ ريال"),
            description: Some(BilingualText::new(
                "10 SR off orders of 20 SR or more",
                "خصم ١٠ ريال للطلبات من ٢٠ ريال فأكثر",
            )),
            kind: RewardKind::Discount,
            value: 1000,
            points_required: 100,
            is_active: true,
            min_order_halalas: Some(2000),
            max_usage_per_user: None,
            expiry_days: None,
            created_at: now,
            updated_at: now,
        },
        Reward {
            id: "rwd_free_drink".to_string(),
            name: BilingualText::new("Free Drink", "مشروب مجاني"),
            description: None,
            kind: RewardKind::FreeItem,
            value: 0,
            points_required: 150,
            is_active: true,
            min_order_halalas: None,
            max_usage_per_user: None,
            expiry_days: None,
            created_at: now,
            updated_at: now,
        },
        Reward {
            id: "rwd_bonus50".to_string(),
            name: BilingualText::new("50 Bonus Points", "٥٠ نقطة إضافية"),
            description: None,
            kind: RewardKind::Points,
            value: 50,
            points_required: 25,
            is_active: true,
            min_order_halalas: None,
            max_usage_per_user: None,
            expiry_days: None,
            created_at: now,
            updated_at: now,
        },
        Reward {
            id: "rwd_vip".to_string(),
            name: BilingualText::new("VIP 25 SR Off", "خصم ٢٥ ريال لكبار العملاء"),
            description: None,
            kind: RewardKind::Discount,
            value: 2500,
            points_required: 200,
            is_active: false,
            min_order_halalas: None,
            max_usage_per_user: None,
            expiry_days: None,
            created_at: now,
            updated_at: now,
        },
        Reward {
            id: "rwd_weekly_free".to_string(),
            name: BilingualText::new("Weekly Free Drink", "مشروب أسبوعي مجاني"),
            description: None,
            kind: RewardKind::FreeItem,
            value: 0,
            points_required: 50,
            is_active: true,
            min_order_halalas: None,
            max_usage_per_user: Some(1),
            expiry_days: Some(7),
            created_at: now,
            updated_at: now,
        },
    ]);

    // ----- Customers -----
    c.users.extend([
        User {
            id: "user_aisha".to_string(),
            name: "Aisha Al-Harbi".to_string(),
            phone: "0501234567".to_string(),
            email: Some("aisha@example.com".to_string()),
            loyalty_points: 250,
            total_spent_halalas: 18500,
            points_expire_at: Some(now + Duration::days(30)),
            created_at: now,
            updated_at: now,
        },
        User {
            id: "user_omar".to_string(),
            name: "Omar Al-Qahtani".to_string(),
            phone: "0559876543".to_string(),
            email: None,
            loyalty_points: 50,
            total_spent_halalas: 4200,
            points_expire_at: Some(now + Duration::days(30)),
            created_at: now,
            updated_at: now,
        },
    ]);

    // ----- Back of house -----
    c.inventory.extend([
        inventory_item(
            "inv_arabica_beans",
            "Arabica Beans",
            "حبوب أرابيكا",
            "beans",
            25,
            5,
            60,
            "kg",
            4500,
            6000,
            Some(3),
            now,
        ),
        inventory_item(
            "inv_whole_milk",
            "Whole Milk",
            "حليب كامل الدسم",
            "dairy",
            20,
            8,
            40,
            "liter",
            600,
            0,
            Some(1),
            now,
        ),
        inventory_item(
            "inv_oat_milk",
            "Oat Milk",
            "حليب الشوفان",
            "dairy",
            4,
            6,
            24,
            "liter",
            1100,
            0,
            Some(9),
            now,
        ),
        inventory_item(
            "inv_almond_milk",
            "Almond Milk",
            "حليب اللوز",
            "dairy",
            0,
            6,
            24,
            "liter",
            1200,
            0,
            None,
            now,
        ),
        inventory_item(
            "inv_paper_cups",
            "Paper Cups 12oz",
            "أكواب ورقية ١٢ أونصة",
            "packaging",
            800,
            200,
            2000,
            "piece",
            35,
            0,
            Some(14),
            now,
        ),
    ]);

    info!(
        products = c.products.len(),
        branches = c.branches.len(),
        rewards = c.rewards.len(),
        users = c.users.len(),
        inventory = c.inventory.len(),
        "Demo data seeded"
    );
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_references_hold() {
        let mut c = Collections::default();
        populate(&mut c);

        // Ids the walkthroughs lean on
        for id in ["prod_espresso", "prod_latte", "prod_croissant"] {
            assert!(c.products.iter().any(|p| p.id == id), "missing {id}");
        }
        assert!(c.branches.iter().any(|b| b.id == "branch_olaya" && b.is_open));
        assert!(c.branches.iter().any(|b| b.id == "branch_airport" && !b.is_open));
        assert!(c.users.iter().any(|u| u.phone == "0501234567"));
        assert!(c.rewards.iter().any(|r| r.id == "rwd_discount10"));
    }

    #[test]
    fn test_seed_is_internally_consistent() {
        let mut c = Collections::default();
        populate(&mut c);

        // Every product is orderable and priced
        assert!(c.products.iter().all(|p| p.is_active() && p.price_halalas > 0));

        // Exactly one inactive catalog entry (the VIP tier)
        assert_eq!(c.rewards.iter().filter(|r| !r.is_active).count(), 1);

        // Inventory spans all three stock buckets
        use qahwa_core::StockStatus;
        for status in [
            StockStatus::InStock,
            StockStatus::LowStock,
            StockStatus::OutOfStock,
        ] {
            assert!(
                c.inventory.iter().any(|i| i.stock_status() == status),
                "no item in {status:?}"
            );
        }

        // Fresh carts, no history
        assert!(c.cart_items.is_empty());
        assert!(c.orders.is_empty());
        assert!(c.redemptions.is_empty());
    }
}
