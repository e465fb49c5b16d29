//! Core types for the stoop marketplace client.
//!
//! This crate contains shared data structures that are used across all stoop crates:
//! - Listing types for search results
//! - Filter state and the fixed category/condition/sort sets
//! - The outbound search query projection
//! - Configuration types
//! - Error types

mod config;
mod error;
mod filter;
mod listing;
mod query;

pub use config::{config_dir, config_path, ApiConfig, AppConfig, SearchConfig};
pub use error::{ConfigError, GeoError, SearchError};
pub use filter::{
    Category, Condition, Coordinates, FilterState, SortOrder, DEFAULT_RADIUS_KM, RADIUS_STEPS_KM,
};
pub use listing::{money, time_ago, Listing};
pub use query::SearchQuery;
