//! Search and filter engine for the stoop marketplace client.
//!
//! This crate holds the logic behind the search page:
//! - [`engine::SearchEngine`] - pending/applied filter state, debounced
//!   preview counts, and stale-result cancellation
//! - [`service`] - the `SearchService` and `GeolocationProvider` seams
//!   plus the HTTP implementation
//! - [`query_string`] - the shareable address-bar representation
//! - [`store`] - device-local recently-viewed / tab-preference state

pub mod engine;
pub mod query_string;
pub mod service;
pub mod store;

pub use engine::{EngineState, SearchEngine, DEFAULT_DEBOUNCE};
pub use query_string::{page_params, PageQuery};
pub use service::{GeolocationProvider, HttpSearchService, SearchResults, SearchService};
pub use store::{KeyValueStore, MemoryStore, RecentEntry, RecentlyViewed};
