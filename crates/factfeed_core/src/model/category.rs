//! Static category registry.
//!
//! # Responsibility
//! - Own the fixed list of categories a fact may belong to.
//! - Parse feed filter selections (`all` or one category name).
//!
//! # Invariants
//! - The registry has exactly 8 entries in a stable display order.
//! - Category names are unique, lowercase and case-sensitive on lookup.

use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Filter selection value meaning "no category constraint".
pub const ALL_CATEGORIES: &str = "all";

/// One registry entry: a category name and its display color token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Category {
    pub name: &'static str,
    pub color: &'static str,
}

const CATEGORIES: [Category; 8] = [
    Category {
        name: "technology",
        color: "#3b82f6",
    },
    Category {
        name: "science",
        color: "#16a34a",
    },
    Category {
        name: "finance",
        color: "#ef4444",
    },
    Category {
        name: "society",
        color: "#eab308",
    },
    Category {
        name: "entertainment",
        color: "#db2777",
    },
    Category {
        name: "health",
        color: "#14b8a6",
    },
    Category {
        name: "history",
        color: "#f97316",
    },
    Category {
        name: "news",
        color: "#8b5cf6",
    },
];

/// Returns all known categories in display order.
pub fn list_categories() -> &'static [Category] {
    &CATEGORIES
}

/// Returns whether `name` is a known category.
pub fn is_valid_category(name: &str) -> bool {
    find_category(name).is_some()
}

/// Looks up one category by exact name.
pub fn find_category(name: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|category| category.name == name)
}

/// Active category filter of the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    /// No category constraint.
    #[default]
    All,
    /// Restrict the feed to one registry category.
    Only(&'static Category),
}

impl CategoryFilter {
    /// Parses a filter selection.
    ///
    /// Returns `None` when `value` is neither `all` nor a known category.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed == ALL_CATEGORIES {
            return Some(Self::All);
        }
        find_category(trimmed).map(Self::Only)
    }

    /// Category name used as the store query constraint, if any.
    pub fn category_name(&self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Only(category) => Some(category.name),
        }
    }
}

impl Display for CategoryFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.category_name().unwrap_or(ALL_CATEGORIES))
    }
}
