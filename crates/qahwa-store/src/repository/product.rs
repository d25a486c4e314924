//! # Product Repository
//!
//! Menu CRUD, bilingual search, and stock adjustments.
//!
//! ## Snapshot Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart and order lines copy the product's name and price at add time.   │
//! │  Editing or deleting a product afterwards therefore never rewrites     │
//! │  what a customer already has in their cart or on a receipt.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use qahwa_core::validation::{
    validate_bilingual, validate_category, validate_price_halalas, validate_search_query,
    validate_stock,
};
use qahwa_core::{BilingualText, CoreError, CoreResult, Product, ProductStatus};

use crate::ids::entity_id;
use crate::store::Shared;

// =============================================================================
// Input Types
// =============================================================================

/// Payload for creating a product. New products start `Active`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: BilingualText,
    #[serde(default)]
    pub description: Option<BilingualText>,
    pub category: String,
    pub price_halalas: i64,
    #[serde(default)]
    pub stock: i64,
}

/// Option-field patch. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductUpdate {
    #[serde(default)]
    pub name: Option<BilingualText>,
    #[serde(default)]
    pub description: Option<BilingualText>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price_halalas: Option<i64>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub status: Option<ProductStatus>,
}

/// List filter; set fields are AND-combined.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductFilter {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<ProductStatus>,
    /// Substring match against name and description, both languages.
    #[serde(default)]
    pub search: Option<String>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for menu products.
pub struct ProductRepository {
    shared: Arc<Shared>,
}

impl ProductRepository {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Lists products matching the filter, in insertion order.
    pub fn list(&self, filter: &ProductFilter) -> Vec<Product> {
        self.shared.read(|c| {
            c.products
                .iter()
                .filter(|p| {
                    filter
                        .category
                        .as_deref()
                        .map_or(true, |category| p.category == category)
                })
                .filter(|p| filter.status.map_or(true, |status| p.status == status))
                .filter(|p| match filter.search.as_deref() {
                    Some(query) => {
                        p.name.matches(query)
                            || p.description.as_ref().map_or(false, |d| d.matches(query))
                    }
                    None => true,
                })
                .cloned()
                .collect()
        })
    }

    /// Searches the active menu by name or description, both languages.
    ///
    /// ## Fallback Behavior
    /// An empty (or all-whitespace) query returns the whole active menu,
    /// so a cleared search box still shows products.
    pub fn search(&self, query: &str) -> CoreResult<Vec<Product>> {
        let query = validate_search_query(query)?;

        let results = self.shared.read(|c| {
            c.products
                .iter()
                .filter(|p| p.is_active())
                .filter(|p| {
                    query.is_empty()
                        || p.name.matches(&query)
                        || p.description.as_ref().map_or(false, |d| d.matches(&query))
                })
                .cloned()
                .collect()
        });

        Ok(results)
    }

    /// Fetches a product by id.
    pub fn get(&self, id: &str) -> Option<Product> {
        self.shared
            .read(|c| c.products.iter().find(|p| p.id == id).cloned())
    }

    /// Creates a product.
    pub fn create(&self, new: NewProduct) -> CoreResult<Product> {
        validate_bilingual("name", &new.name)?;
        if let Some(ref description) = new.description {
            validate_bilingual("description", description)?;
        }
        validate_category(&new.category)?;
        validate_price_halalas(new.price_halalas)?;
        validate_stock(new.stock)?;

        let now = Utc::now();
        let product = Product {
            id: entity_id("prod"),
            name: new.name,
            description: new.description,
            category: new.category,
            price_halalas: new.price_halalas,
            stock: new.stock,
            status: ProductStatus::Active,
            created_at: now,
            updated_at: now,
        };

        self.shared.write(|c| c.products.push(product.clone()));
        debug!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Applies a patch to a product.
    pub fn update(&self, id: &str, patch: ProductUpdate) -> CoreResult<Product> {
        if let Some(ref name) = patch.name {
            validate_bilingual("name", name)?;
        }
        if let Some(ref description) = patch.description {
            validate_bilingual("description", description)?;
        }
        if let Some(ref category) = patch.category {
            validate_category(category)?;
        }
        if let Some(price) = patch.price_halalas {
            validate_price_halalas(price)?;
        }
        if let Some(stock) = patch.stock {
            validate_stock(stock)?;
        }

        let updated = self.shared.write(|c| -> CoreResult<Product> {
            let product = c
                .products
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| CoreError::not_found("Product", id))?;

            if let Some(name) = patch.name {
                product.name = name;
            }
            if let Some(description) = patch.description {
                product.description = Some(description);
            }
            if let Some(category) = patch.category {
                product.category = category;
            }
            if let Some(price) = patch.price_halalas {
                product.price_halalas = price;
            }
            if let Some(stock) = patch.stock {
                product.stock = stock;
            }
            if let Some(status) = patch.status {
                product.status = status;
            }
            product.updated_at = Utc::now();

            Ok(product.clone())
        })?;

        debug!(product_id = %id, "Product updated");
        Ok(updated)
    }

    /// Adjusts stock by a signed delta.
    ///
    /// ## Rules
    /// - Positive delta restocks, negative delta consumes
    /// - The result may not drop below zero (`InsufficientStock`)
    pub fn update_stock(&self, id: &str, delta: i64) -> CoreResult<Product> {
        let updated = self.shared.write(|c| {
            let product = c
                .products
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| CoreError::not_found("Product", id))?;

            let next = product.stock + delta;
            if next < 0 {
                return Err(CoreError::InsufficientStock {
                    id: product.id.clone(),
                    available: product.stock,
                    requested: -delta,
                });
            }

            product.stock = next;
            product.updated_at = Utc::now();
            Ok(product.clone())
        })?;

        debug!(product_id = %id, delta, stock = updated.stock, "Product stock adjusted");
        Ok(updated)
    }

    /// Removes a product from the menu.
    ///
    /// Existing cart and order lines keep their snapshots.
    pub fn delete(&self, id: &str) -> CoreResult<()> {
        self.shared.write(|c| {
            let before = c.products.len();
            c.products.retain(|p| p.id != id);
            if c.products.len() == before {
                return Err(CoreError::not_found("Product", id));
            }
            Ok(())
        })?;

        debug!(product_id = %id, "Product deleted");
        Ok(())
    }

    /// Total number of products, any status.
    pub fn count(&self) -> usize {
        self.shared.read(|c| c.products.len())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    fn sample_product() -> NewProduct {
        NewProduct {
            name: BilingualText::new("Latte", "لاتيه"),
            description: Some(BilingualText::new(
                "Espresso with steamed milk",
                "إسبريسو مع حليب مبخر",
            )),
            category: "espresso".to_string(),
            price_halalas: 1700,
            stock: 50,
        }
    }

    #[test]
    fn test_create_and_get() {
        let repo = Store::empty().products();
        let created = repo.create(sample_product()).unwrap();

        assert!(created.id.starts_with("prod_"));
        assert_eq!(created.status, ProductStatus::Active);
        assert_eq!(created.price_halalas, 1700);

        let fetched = repo.get(&created.id).unwrap();
        assert_eq!(fetched.name.en, "Latte");
        assert_eq!(fetched.name.ar, "لاتيه");
    }

    #[test]
    fn test_get_unknown_returns_none() {
        let repo = Store::empty().products();
        assert!(repo.get("prod_missing").is_none());
    }

    #[test]
    fn test_create_rejects_blank_name() {
        let repo = Store::empty().products();
        let mut new = sample_product();
        new.name = BilingualText::new("", "لاتيه");
        assert!(repo.create(new).is_err());
    }

    #[test]
    fn test_create_rejects_negative_price() {
        let repo = Store::empty().products();
        let mut new = sample_product();
        new.price_halalas = -100;
        assert!(repo.create(new).is_err());
    }

    #[test]
    fn test_list_filters_by_category_and_status() {
        let repo = Store::empty().products();
        let latte = repo.create(sample_product()).unwrap();

        let mut pastry = sample_product();
        pastry.name = BilingualText::new("Croissant", "كرواسون");
        pastry.category = "pastry".to_string();
        let croissant = repo.create(pastry).unwrap();

        repo.update(
            &croissant.id,
            ProductUpdate {
                status: Some(ProductStatus::Inactive),
                ..Default::default()
            },
        )
        .unwrap();

        let espresso_only = repo.list(&ProductFilter {
            category: Some("espresso".to_string()),
            ..Default::default()
        });
        assert_eq!(espresso_only.len(), 1);
        assert_eq!(espresso_only[0].id, latte.id);

        let active_only = repo.list(&ProductFilter {
            status: Some(ProductStatus::Active),
            ..Default::default()
        });
        assert_eq!(active_only.len(), 1);
        assert_eq!(active_only[0].id, latte.id);
    }

    #[test]
    fn test_search_matches_both_languages() {
        let repo = Store::empty().products();
        repo.create(sample_product()).unwrap();

        // English is case-insensitive
        assert_eq!(repo.search("LATTE").unwrap().len(), 1);
        // Arabic matches raw
        assert_eq!(repo.search("لاتيه").unwrap().len(), 1);
        // Description text is searched too
        assert_eq!(repo.search("steamed").unwrap().len(), 1);
        assert!(repo.search("cortado").unwrap().is_empty());
    }

    #[test]
    fn test_search_empty_query_returns_active_menu() {
        let repo = Store::empty().products();
        let latte = repo.create(sample_product()).unwrap();
        repo.update(
            &latte.id,
            ProductUpdate {
                status: Some(ProductStatus::Inactive),
                ..Default::default()
            },
        )
        .unwrap();

        let mut other = sample_product();
        other.name = BilingualText::new("Flat White", "فلات وايت");
        repo.create(other).unwrap();

        let results = repo.search("   ").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name.en, "Flat White");
    }

    #[test]
    fn test_update_patches_only_given_fields() {
        let repo = Store::empty().products();
        let created = repo.create(sample_product()).unwrap();

        let updated = repo
            .update(
                &created.id,
                ProductUpdate {
                    price_halalas: Some(1850),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.price_halalas, 1850);
        assert_eq!(updated.name.en, "Latte");
        assert_eq!(updated.category, "espresso");
        assert!(updated.updated_at >= created.updated_at);
    }

    #[test]
    fn test_update_unknown_is_not_found() {
        let repo = Store::empty().products();
        let err = repo
            .update("prod_missing", ProductUpdate::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn test_update_stock_applies_delta() {
        let repo = Store::empty().products();
        let created = repo.create(sample_product()).unwrap();

        assert_eq!(repo.update_stock(&created.id, -20).unwrap().stock, 30);
        assert_eq!(repo.update_stock(&created.id, 5).unwrap().stock, 35);
    }

    #[test]
    fn test_update_stock_rejects_below_zero() {
        let repo = Store::empty().products();
        let created = repo.create(sample_product()).unwrap();

        let err = repo.update_stock(&created.id, -51).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { available: 50, .. }));

        // Stock unchanged after the failed adjustment
        assert_eq!(repo.get(&created.id).unwrap().stock, 50);
    }

    #[test]
    fn test_delete_removes_product() {
        let repo = Store::empty().products();
        let created = repo.create(sample_product()).unwrap();

        repo.delete(&created.id).unwrap();
        assert!(repo.get(&created.id).is_none());
        assert!(matches!(
            repo.delete(&created.id),
            Err(CoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_count() {
        let repo = Store::empty().products();
        assert_eq!(repo.count(), 0);
        repo.create(sample_product()).unwrap();
        assert_eq!(repo.count(), 1);
    }
}
