//! Filter state for the search page.
//!
//! Two instances of [`FilterState`] exist at runtime: the *pending* state
//! edited inside the filter drawer, and the *applied* state the current
//! results were fetched with. Promotion from pending to applied happens
//! only through an explicit apply.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Radius choices offered in the drawer, in kilometers.
pub const RADIUS_STEPS_KM: [u32; 5] = [8, 16, 40, 80, 160];

/// Radius assumed when the user locates themselves without picking one.
pub const DEFAULT_RADIUS_KM: u32 = 40;

/// Result ordering for a search.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    PriceLow,
    PriceHigh,
}

impl SortOrder {
    /// Server-side name of this ordering.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::PriceLow => "price_low",
            SortOrder::PriceHigh => "price_high",
        }
    }

    /// Whether this is the ordering used when none is chosen.
    pub fn is_default(&self) -> bool {
        *self == SortOrder::Newest
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            SortOrder::Newest,
            SortOrder::Oldest,
            SortOrder::PriceLow,
            SortOrder::PriceHigh,
        ]
        .into_iter()
        .find(|order| order.as_str() == s)
        .ok_or(())
    }
}

/// Listing categories. The set is closed on both client and server.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Electronics,
    Clothing,
    Furniture,
    Art,
    Books,
    Sports,
    Toys,
    Home,
    Auto,
    Other,
}

impl Category {
    /// All categories, in drawer display order.
    pub const ALL: [Category; 10] = [
        Category::Electronics,
        Category::Clothing,
        Category::Furniture,
        Category::Art,
        Category::Books,
        Category::Sports,
        Category::Toys,
        Category::Home,
        Category::Auto,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "electronics",
            Category::Clothing => "clothing",
            Category::Furniture => "furniture",
            Category::Art => "art",
            Category::Books => "books",
            Category::Sports => "sports",
            Category::Toys => "toys",
            Category::Home => "home",
            Category::Auto => "auto",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or(())
    }
}

/// Listing condition. Server names keep the original spacing ("like new").
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Condition {
    #[serde(rename = "new")]
    New,
    #[serde(rename = "like new")]
    LikeNew,
    #[serde(rename = "used")]
    Used,
    #[serde(rename = "fair")]
    Fair,
}

impl Condition {
    /// All conditions, in drawer display order.
    pub const ALL: [Condition; 4] = [
        Condition::New,
        Condition::LikeNew,
        Condition::Used,
        Condition::Fair,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::LikeNew => "like new",
            Condition::Used => "used",
            Condition::Fair => "fair",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Condition::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or(())
    }
}

/// A located position. Latitude and longitude always travel together,
/// so a lone coordinate cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// One filter configuration: everything the drawer can edit.
///
/// `min_price`/`max_price` hold the raw input text; numeric
/// interpretation (and min/max ordering) is the server's job.
/// `radius_km` may hold a leftover value while `location` is unset -
/// the query builder ignores it in that case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub sort: SortOrder,
    pub category: Option<Category>,
    pub condition: Option<Condition>,
    #[serde(default)]
    pub min_price: String,
    #[serde(default)]
    pub max_price: String,
    #[serde(default)]
    pub zip: String,
    pub location: Option<Coordinates>,
    pub radius_km: Option<u32>,
    #[serde(default)]
    pub safe_meet_only: bool,
}

impl FilterState {
    /// Store a ZIP entry, keeping only digits and at most five of them.
    pub fn set_zip(&mut self, raw: &str) {
        self.zip = raw.chars().filter(|c| c.is_ascii_digit()).take(5).collect();
    }

    /// Whether a device position has been captured.
    pub fn has_location(&self) -> bool {
        self.location.is_some()
    }

    /// Number of non-default dimensions, shown as the drawer badge.
    pub fn active_count(&self) -> usize {
        let mut count = 0;
        if self.category.is_some() {
            count += 1;
        }
        if self.condition.is_some() {
            count += 1;
        }
        if !self.min_price.is_empty() {
            count += 1;
        }
        if !self.max_price.is_empty() {
            count += 1;
        }
        if !self.zip.is_empty() {
            count += 1;
        }
        if self.radius_km.is_some() {
            count += 1;
        }
        if self.safe_meet_only {
            count += 1;
        }
        if !self.sort.is_default() {
            count += 1;
        }
        count
    }

    /// Reset every dimension to its default.
    pub fn clear(&mut self) {
        *self = FilterState::default();
    }
}
