//! # Store Configuration
//!
//! Configuration for the entity store and its policies.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     QAHWA_POINTS_PER_RIYAL=2                                           │
//! │     QAHWA_SEED_DEMO_DATA=false                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/qahwa/store.toml (Linux)                                 │
//! │     ~/Library/Application Support/app.qahwa.qahwa/store.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     1 point per riyal, 30-day expiry, 5 + 3×qty prep estimate          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # store.toml
//! [cafe]
//! name = "Qahwa"
//! currency = "SAR"
//!
//! [seed]
//! demo_data = true
//!
//! [loyalty]
//! points_per_riyal = 1
//! expiry_days = 30
//!
//! [orders]
//! base_prep_minutes = 5
//! prep_minutes_per_item = 3
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use qahwa_core::{
    CoreError, CoreResult, BASE_PREP_MINUTES, POINTS_EXPIRY_DAYS, PREP_MINUTES_PER_ITEM,
};

// =============================================================================
// Café Settings
// =============================================================================

/// Branding and currency for the café this store serves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CafeSettings {
    /// Display name shown on receipts and the demo banner.
    #[serde(default = "default_cafe_name")]
    pub name: String,

    /// ISO currency code. Money math is currency-agnostic; this is
    /// display-only metadata for the UI layer.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_cafe_name() -> String {
    "Qahwa".to_string()
}

fn default_currency() -> String {
    "SAR".to_string()
}

impl Default for CafeSettings {
    fn default() -> Self {
        CafeSettings {
            name: default_cafe_name(),
            currency: default_currency(),
        }
    }
}

// =============================================================================
// Seed Settings
// =============================================================================

/// Controls whether `Store::new` populates the demo dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedSettings {
    /// Insert the bilingual demo menu, branches, rewards, users, and
    /// inventory on startup.
    #[serde(default = "default_demo_data")]
    pub demo_data: bool,
}

fn default_demo_data() -> bool {
    true
}

impl Default for SeedSettings {
    fn default() -> Self {
        SeedSettings {
            demo_data: default_demo_data(),
        }
    }
}

// =============================================================================
// Loyalty Settings
// =============================================================================

/// Points accrual and expiry policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoyaltySettings {
    /// Points earned per whole riyal charged at order placement.
    /// Zero disables earning entirely.
    #[serde(default = "default_points_per_riyal")]
    pub points_per_riyal: i64,

    /// Rolling expiry window in days. Every credit pushes the user's
    /// expiry horizon to now + this window.
    #[serde(default = "default_expiry_days")]
    pub expiry_days: i64,
}

fn default_points_per_riyal() -> i64 {
    1
}

fn default_expiry_days() -> i64 {
    POINTS_EXPIRY_DAYS
}

impl Default for LoyaltySettings {
    fn default() -> Self {
        LoyaltySettings {
            points_per_riyal: default_points_per_riyal(),
            expiry_days: default_expiry_days(),
        }
    }
}

// =============================================================================
// Order Settings
// =============================================================================

/// Preparation-time estimate model: `base + per_item × total_quantity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSettings {
    #[serde(default = "default_base_prep_minutes")]
    pub base_prep_minutes: i64,

    #[serde(default = "default_prep_minutes_per_item")]
    pub prep_minutes_per_item: i64,
}

fn default_base_prep_minutes() -> i64 {
    BASE_PREP_MINUTES
}

fn default_prep_minutes_per_item() -> i64 {
    PREP_MINUTES_PER_ITEM
}

impl Default for OrderSettings {
    fn default() -> Self {
        OrderSettings {
            base_prep_minutes: default_base_prep_minutes(),
            prep_minutes_per_item: default_prep_minutes_per_item(),
        }
    }
}

// =============================================================================
// Main Store Configuration
// =============================================================================

/// Complete store configuration.
///
/// ## Example Config File
/// ```toml
/// [cafe]
/// name = "Qahwa"
/// currency = "SAR"
///
/// [seed]
/// demo_data = true
///
/// [loyalty]
/// points_per_riyal = 1
/// expiry_days = 30
///
/// [orders]
/// base_prep_minutes = 5
/// prep_minutes_per_item = 3
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Café branding.
    #[serde(default)]
    pub cafe: CafeSettings,

    /// Demo data seeding.
    #[serde(default)]
    pub seed: SeedSettings,

    /// Loyalty accrual and expiry policy.
    #[serde(default)]
    pub loyalty: LoyaltySettings,

    /// Prep-time estimate model.
    #[serde(default)]
    pub orders: OrderSettings,
}

impl StoreConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (store.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CoreResult<Self> {
        let mut config = Self::default();

        // Try to load from config file
        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading store config from file");
                let contents = std::fs::read_to_string(&path).map_err(|e| CoreError::Config {
                    message: format!("cannot read {}: {}", path.display(), e),
                })?;
                config = toml::from_str(&contents).map_err(|e| CoreError::Config {
                    message: format!("cannot parse {}: {}", path.display(), e),
                })?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        // Override with environment variables
        config.apply_env_overrides();

        // Validate the configuration
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load store config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> CoreResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| CoreError::Config {
                message: "no config path available".to_string(),
            })?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CoreError::Config {
                message: format!("cannot create {}: {}", parent.display(), e),
            })?;
        }

        let contents = toml::to_string_pretty(self).map_err(|e| CoreError::Config {
            message: format!("cannot serialize config: {}", e),
        })?;
        std::fs::write(&path, contents).map_err(|e| CoreError::Config {
            message: format!("cannot write {}: {}", path.display(), e),
        })?;

        info!(?path, "Store config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CoreResult<()> {
        if self.cafe.name.trim().is_empty() {
            return Err(CoreError::Config {
                message: "cafe.name must not be empty".to_string(),
            });
        }

        if self.loyalty.points_per_riyal < 0 {
            return Err(CoreError::Config {
                message: "loyalty.points_per_riyal must be >= 0".to_string(),
            });
        }

        if self.loyalty.expiry_days < 1 {
            return Err(CoreError::Config {
                message: "loyalty.expiry_days must be at least 1".to_string(),
            });
        }

        if self.orders.base_prep_minutes < 0 || self.orders.prep_minutes_per_item < 0 {
            return Err(CoreError::Config {
                message: "orders prep minutes must be >= 0".to_string(),
            });
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(name) = std::env::var("QAHWA_CAFE_NAME") {
            debug!(name = %name, "Overriding cafe name from environment");
            self.cafe.name = name;
        }

        if let Ok(value) = std::env::var("QAHWA_SEED_DEMO_DATA") {
            match value.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.seed.demo_data = true,
                "0" | "false" | "no" => self.seed.demo_data = false,
                other => warn!(value = %other, "Unknown QAHWA_SEED_DEMO_DATA value"),
            }
        }

        if let Ok(value) = std::env::var("QAHWA_POINTS_PER_RIYAL") {
            if let Ok(rate) = value.parse::<i64>() {
                debug!(points_per_riyal = rate, "Overriding loyalty rate from environment");
                self.loyalty.points_per_riyal = rate;
            }
        }

        if let Ok(value) = std::env::var("QAHWA_POINTS_EXPIRY_DAYS") {
            if let Ok(days) = value.parse::<i64>() {
                debug!(expiry_days = days, "Overriding points expiry from environment");
                self.loyalty.expiry_days = days;
            }
        }

        if let Ok(value) = std::env::var("QAHWA_BASE_PREP_MINUTES") {
            if let Ok(minutes) = value.parse::<i64>() {
                self.orders.base_prep_minutes = minutes;
            }
        }

        if let Ok(value) = std::env::var("QAHWA_PREP_MINUTES_PER_ITEM") {
            if let Ok(minutes) = value.parse::<i64>() {
                self.orders.prep_minutes_per_item = minutes;
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("app", "qahwa", "qahwa")
            .map(|dirs| dirs.config_dir().join("store.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns the café display name.
    pub fn cafe_name(&self) -> &str {
        &self.cafe.name
    }

    /// Returns the points earned per whole riyal.
    pub fn points_per_riyal(&self) -> i64 {
        self.loyalty.points_per_riyal
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
