//! Common data types for persistence
//!
//! Shared types used across the store modules.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

// =============================================================================
// FavoriteItem - a favorited recipe
// =============================================================================

/// A favorited recipe
///
/// `meal_id` is the external recipe identifier (non-empty) and is unique
/// within the favorites list. Wire names keep the app's established envelope
/// (`mealId` / `addedAt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteItem {
    /// External recipe identifier
    pub meal_id: String,
    /// When the favorite was added (epoch milliseconds)
    pub added_at: u64,
}

impl FavoriteItem {
    /// Create an item stamped with the current time
    pub fn new(meal_id: impl Into<String>) -> Self {
        Self {
            meal_id: meal_id.into(),
            added_at: now_millis(),
        }
    }
}

// =============================================================================
// Search history
// =============================================================================

/// How a search was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    /// Search by ingredient
    Ingredient,
    /// Browse by recipe category
    Category,
    /// "Surprise me" random pick
    Random,
}

/// One remembered search
///
/// Entries are unique per `(query, kind)` pair; repeating a search refreshes
/// its timestamp instead of adding a second entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHistoryItem {
    /// The search text as the user entered it
    pub query: String,
    /// How the search was issued (persisted as `type`)
    #[serde(rename = "type")]
    pub kind: SearchKind,
    /// When the search ran (epoch milliseconds)
    pub timestamp: u64,
}

impl SearchHistoryItem {
    /// Create an entry stamped with the current time
    pub fn new(query: impl Into<String>, kind: SearchKind) -> Self {
        Self {
            query: query.into(),
            kind,
            timestamp: now_millis(),
        }
    }
}

// =============================================================================
// Theme
// =============================================================================

/// Theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    /// Light palette
    #[default]
    Light,
    /// Dark palette
    Dark,
}

impl ThemePreference {
    /// The opposite preference
    pub fn flipped(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }

    /// Check if this preference selects the dark palette
    pub fn is_dark(self) -> bool {
        matches!(self, ThemePreference::Dark)
    }
}
