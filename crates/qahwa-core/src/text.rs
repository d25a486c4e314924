//! # Bilingual Text Module
//!
//! Every customer-facing string in Qahwa carries both an Arabic and an
//! English rendition. Rather than scattering `name_en`/`name_ar` field pairs
//! across the domain types, `BilingualText` bundles them into one value.
//!
//! ```rust
//! use qahwa_core::text::{BilingualText, Lang};
//!
//! let name = BilingualText::new("Spanish Latte", "لاتيه اسباني");
//! assert_eq!(name.get(Lang::En), "Spanish Latte");
//! assert_eq!(name.get(Lang::Ar), "لاتيه اسباني");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Language Selector
// =============================================================================

/// The two languages Qahwa ships with.
///
/// Serialized as `"en"` / `"ar"` so API clients can pass a plain string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    En,
    Ar,
}

impl Default for Lang {
    fn default() -> Self {
        Lang::En
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lang::En => write!(f, "en"),
            Lang::Ar => write!(f, "ar"),
        }
    }
}

// =============================================================================
// Bilingual Text
// =============================================================================

/// A string carried in both English and Arabic.
///
/// Both renditions are required. Validation rejects entities that leave
/// either language blank; see `validation::validate_bilingual`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BilingualText {
    pub en: String,
    pub ar: String,
}

impl BilingualText {
    pub fn new(en: impl Into<String>, ar: impl Into<String>) -> Self {
        BilingualText {
            en: en.into(),
            ar: ar.into(),
        }
    }

    /// Returns the rendition for the requested language.
    pub fn get(&self, lang: Lang) -> &str {
        match lang {
            Lang::En => &self.en,
            Lang::Ar => &self.ar,
        }
    }

    /// Case-insensitive substring match against either rendition.
    ///
    /// Used by catalog search. Arabic has no case distinction, so the
    /// lowercasing only affects the English side.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return true;
        }
        let q = query.to_lowercase();
        self.en.to_lowercase().contains(&q) || self.ar.contains(query)
    }
}

/// Display shows the English rendition (log output is English).
impl fmt::Display for BilingualText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.en)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_by_language() {
        let name = BilingualText::new("Espresso", "اسبريسو");
        assert_eq!(name.get(Lang::En), "Espresso");
        assert_eq!(name.get(Lang::Ar), "اسبريسو");
    }

    #[test]
    fn test_matches_english_case_insensitive() {
        let name = BilingualText::new("Spanish Latte", "لاتيه اسباني");
        assert!(name.matches("spanish"));
        assert!(name.matches("LATTE"));
        assert!(!name.matches("mocha"));
    }

    #[test]
    fn test_matches_arabic_substring() {
        let name = BilingualText::new("Spanish Latte", "لاتيه اسباني");
        assert!(name.matches("لاتيه"));
        assert!(!name.matches("موكا"));
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let name = BilingualText::new("Espresso", "اسبريسو");
        assert!(name.matches(""));
        assert!(name.matches("   "));
    }

    #[test]
    fn test_display_uses_english() {
        let name = BilingualText::new("Espresso", "اسبريسو");
        assert_eq!(name.to_string(), "Espresso");
    }
}
