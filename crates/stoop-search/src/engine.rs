//! The search engine.
//!
//! `SearchEngine` owns the two filter states of the search page: the
//! *pending* state edited in the filter drawer and the *applied* state
//! behind the current results. It builds outbound queries, debounces
//! the drawer's live preview count, and drops stale async results via
//! generation counters.
//!
//! ## Reactive State
//!
//! Results, busy flags, the preview count, and user notices are
//! broadcast as [`EngineState`] snapshots via `tokio::sync::watch`.
//! The UI subscribes and re-renders on change; it never mutates filter
//! state directly.
//!
//! ## Cancellation
//!
//! Every pending edit aborts the previous debounce timer outright, so
//! a burst of edits issues exactly one request. A request already in
//! flight is not aborted: it carries a generation number and its result
//! is dropped at resolution time if a newer request was issued since.
//!
//! The engine spawns its timers on the ambient tokio runtime, so it
//! must be created and driven inside one.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use stoop_core::{
    Category, Condition, FilterState, GeoError, Listing, SearchQuery, SortOrder, DEFAULT_RADIUS_KM,
};

use crate::query_string::page_params;
use crate::service::{GeolocationProvider, SearchService};

/// Quiet period before a preview request fires.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(350);

// =============================================================================
// Engine State (Broadcast Snapshot)
// =============================================================================

/// Snapshot of everything the search page renders.
#[derive(Debug, Clone, Default)]
pub struct EngineState {
    /// Results of the last completed full search.
    pub listings: Vec<Listing>,

    /// A full search is in flight.
    pub busy: bool,

    /// At least one full search has been committed.
    pub searched: bool,

    /// The filter drawer is open.
    pub drawer_open: bool,

    /// A geolocation request is in flight.
    pub locating: bool,

    /// Result count for the pending filters, once a preview resolves.
    /// `None` means no count is available and the apply button shows a
    /// generic label.
    pub preview_count: Option<usize>,

    /// Latest user-facing notice. Replaced on each event; cleared when
    /// a new full search starts.
    pub notice: Option<String>,

    /// Shareable address-bar pairs for the last committed search.
    pub page_query: Vec<(String, String)>,
}

// =============================================================================
// Search Engine
// =============================================================================

struct EngineInner {
    term: String,
    pending: FilterState,
    applied: FilterState,
    drawer_open: bool,
    searched: bool,
    locating: bool,
    /// Generation of the latest issued full search.
    search_generation: u64,
    /// Generation of the latest issued preview request.
    preview_generation: u64,
    /// Armed debounce timer. Aborted on every new edit; once it fires,
    /// the request it spawns is on its own and answers to generations.
    preview_timer: Option<JoinHandle<()>>,
}

/// State shared with spawned preview tasks.
struct Shared {
    service: Arc<dyn SearchService>,
    inner: Mutex<EngineInner>,
    state_tx: watch::Sender<EngineState>,
    state_rx: watch::Receiver<EngineState>,
}

/// Handle to the search engine. Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct SearchEngine {
    geo: Arc<dyn GeolocationProvider>,
    debounce: Duration,
    default_radius_km: u32,
    shared: Arc<Shared>,
}

impl SearchEngine {
    /// Create an engine over the given collaborators.
    pub fn new(service: Arc<dyn SearchService>, geo: Arc<dyn GeolocationProvider>) -> Self {
        let (state_tx, state_rx) = watch::channel(EngineState::default());
        Self {
            geo,
            debounce: DEFAULT_DEBOUNCE,
            default_radius_km: DEFAULT_RADIUS_KM,
            shared: Arc::new(Shared {
                service,
                inner: Mutex::new(EngineInner {
                    term: String::new(),
                    pending: FilterState::default(),
                    applied: FilterState::default(),
                    drawer_open: false,
                    searched: false,
                    locating: false,
                    search_generation: 0,
                    preview_generation: 0,
                    preview_timer: None,
                }),
                state_tx,
                state_rx,
            }),
        }
    }

    /// Override the preview debounce delay.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Override the radius assumed on first geolocation.
    pub fn with_default_radius(mut self, radius_km: u32) -> Self {
        self.default_radius_km = radius_km;
        self
    }

    // -------------------------------------------------------------------------
    // State Access
    // -------------------------------------------------------------------------

    /// Subscribe to state changes. Clone the receiver per subscriber.
    pub fn subscribe(&self) -> watch::Receiver<EngineState> {
        self.shared.state_rx.clone()
    }

    /// Current state snapshot.
    pub fn state(&self) -> EngineState {
        self.shared.state_rx.borrow().clone()
    }

    /// The filter state currently being edited in the drawer.
    pub fn pending_filters(&self) -> FilterState {
        self.shared.inner.lock().pending.clone()
    }

    /// The filter state behind the current results.
    pub fn applied_filters(&self) -> FilterState {
        self.shared.inner.lock().applied.clone()
    }

    /// The free-text term as typed.
    pub fn term(&self) -> String {
        self.shared.inner.lock().term.clone()
    }

    // -------------------------------------------------------------------------
    // Term & Drawer Lifecycle
    // -------------------------------------------------------------------------

    /// Store the search input text as typed. No side effects.
    pub fn set_term(&self, term: impl Into<String>) {
        self.shared.inner.lock().term = term.into();
    }

    /// Open the filter drawer.
    ///
    /// Pending state is re-snapshotted from applied, so edits abandoned
    /// in a previous drawer session are discarded here.
    pub fn open_drawer(&self) {
        {
            let mut inner = self.shared.inner.lock();
            inner.pending = inner.applied.clone();
            inner.drawer_open = true;
        }
        self.shared.state_tx.send_modify(|state| {
            state.drawer_open = true;
            state.preview_count = None;
        });
        Shared::schedule_preview(&self.shared, self.debounce);
    }

    /// Dismiss the drawer without applying.
    pub fn close_drawer(&self) {
        {
            let mut inner = self.shared.inner.lock();
            inner.drawer_open = false;
            if let Some(timer) = inner.preview_timer.take() {
                timer.abort();
            }
        }
        self.shared.state_tx.send_modify(|state| {
            state.drawer_open = false;
            state.preview_count = None;
        });
    }

    // -------------------------------------------------------------------------
    // Pending Edits
    // -------------------------------------------------------------------------

    pub fn set_pending_sort(&self, sort: SortOrder) {
        self.edit_pending(|pending| pending.sort = sort);
    }

    pub fn set_pending_category(&self, category: Option<Category>) {
        self.edit_pending(|pending| pending.category = category);
    }

    pub fn set_pending_condition(&self, condition: Option<Condition>) {
        self.edit_pending(|pending| pending.condition = condition);
    }

    pub fn set_pending_min_price(&self, raw: impl Into<String>) {
        let raw = raw.into();
        self.edit_pending(|pending| pending.min_price = raw);
    }

    pub fn set_pending_max_price(&self, raw: impl Into<String>) {
        let raw = raw.into();
        self.edit_pending(|pending| pending.max_price = raw);
    }

    /// ZIP entry. Stripped to at most five digits.
    pub fn set_pending_zip(&self, raw: &str) {
        self.edit_pending(|pending| pending.set_zip(raw));
    }

    pub fn set_pending_radius(&self, radius_km: Option<u32>) {
        self.edit_pending(|pending| pending.radius_km = radius_km);
    }

    pub fn toggle_pending_safe_meet(&self) {
        self.edit_pending(|pending| pending.safe_meet_only = !pending.safe_meet_only);
    }

    /// Reset pending to the all-default state.
    ///
    /// Takes effect only once filters are applied; no request is made
    /// and the applied state is untouched.
    pub fn clear_filters(&self) {
        {
            let mut inner = self.shared.inner.lock();
            inner.pending.clear();
            if let Some(timer) = inner.preview_timer.take() {
                timer.abort();
            }
        }
        self.shared
            .state_tx
            .send_modify(|state| state.preview_count = None);
    }

    fn edit_pending(&self, edit: impl FnOnce(&mut FilterState)) {
        {
            let mut inner = self.shared.inner.lock();
            edit(&mut inner.pending);
        }
        Shared::schedule_preview(&self.shared, self.debounce);
    }

    // -------------------------------------------------------------------------
    // Geolocation
    // -------------------------------------------------------------------------

    /// Capture the device position into the pending filters.
    ///
    /// Guarded by a busy flag: a call while another is in flight is a
    /// no-op, so overlapping requests cannot corrupt pending state. On
    /// success, the default radius is filled in if none was chosen yet.
    pub async fn use_my_location(&self) {
        {
            let mut inner = self.shared.inner.lock();
            if inner.locating {
                return;
            }
            inner.locating = true;
        }
        self.shared
            .state_tx
            .send_modify(|state| state.locating = true);

        match self.geo.current_position().await {
            Ok(position) => {
                {
                    let mut inner = self.shared.inner.lock();
                    inner.locating = false;
                    inner.pending.location = Some(position);
                    if inner.pending.radius_km.is_none() {
                        inner.pending.radius_km = Some(self.default_radius_km);
                    }
                }
                tracing::debug!("located at {:.3},{:.3}", position.lat, position.lng);
                self.shared
                    .state_tx
                    .send_modify(|state| state.locating = false);
                Shared::schedule_preview(&self.shared, self.debounce);
            }
            Err(err) => {
                tracing::debug!("geolocation failed: {}", err);
                let message = match err {
                    GeoError::Unsupported => "Geolocation not supported",
                    _ => "Could not get location",
                };
                self.shared.inner.lock().locating = false;
                self.shared.state_tx.send_modify(|state| {
                    state.locating = false;
                    state.notice = Some(message.to_string());
                });
            }
        }
    }

    // -------------------------------------------------------------------------
    // Committing
    // -------------------------------------------------------------------------

    /// Commit a free-text term against the applied filters and run the
    /// full search. An empty term is a no-op.
    pub async fn submit_search(&self, term: &str) {
        let trimmed = term.trim().to_string();
        if trimmed.is_empty() {
            return;
        }

        let (generation, query, page) = {
            let mut inner = self.shared.inner.lock();
            inner.term = trimmed.clone();
            inner.searched = true;
            inner.search_generation += 1;
            (
                inner.search_generation,
                SearchQuery::build(&trimmed, &inner.applied),
                page_params(&trimmed, &inner.applied),
            )
        };

        self.shared.state_tx.send_modify(|state| {
            state.busy = true;
            state.searched = true;
            state.notice = None;
        });

        self.shared.run_search(generation, query, Some(page)).await;
    }

    /// Promote pending filters to applied and close the drawer.
    ///
    /// When a term has been committed, the full search re-runs with the
    /// new filters. Promotion happens first and is never rolled back,
    /// even if that search fails.
    pub async fn apply_filters(&self) {
        let committed = {
            let mut inner = self.shared.inner.lock();
            if let Some(timer) = inner.preview_timer.take() {
                timer.abort();
            }
            inner.applied = inner.pending.clone();
            inner.drawer_open = false;

            let term = inner.term.trim().to_string();
            if term.is_empty() {
                None
            } else {
                inner.searched = true;
                inner.search_generation += 1;
                Some((
                    inner.search_generation,
                    SearchQuery::build(&term, &inner.applied),
                ))
            }
        };

        let searching = committed.is_some();
        self.shared.state_tx.send_modify(|state| {
            state.drawer_open = false;
            state.preview_count = None;
            if searching {
                state.busy = true;
                state.searched = true;
                state.notice = None;
            }
        });

        if let Some((generation, query)) = committed {
            self.shared.run_search(generation, query, None).await;
        }
    }

    /// Save the committed term as a saved search.
    pub async fn save_search(&self) {
        let term = self.shared.inner.lock().term.trim().to_string();
        if term.is_empty() {
            return;
        }

        let notice = match self.shared.service.save_search(term).await {
            Ok(()) => "Search saved!".to_string(),
            Err(err) => err.to_string(),
        };
        self.shared
            .state_tx
            .send_modify(|state| state.notice = Some(notice));
    }
}

impl Shared {
    /// Run a full search and publish its outcome, unless a newer search
    /// has been issued in the meantime.
    async fn run_search(
        &self,
        generation: u64,
        query: SearchQuery,
        page: Option<Vec<(String, String)>>,
    ) {
        tracing::debug!("search {} issued for {:?}", generation, query.q);
        let result = self.service.search(query).await;

        {
            let inner = self.inner.lock();
            if inner.search_generation != generation {
                tracing::debug!("search {} superseded, dropping", generation);
                return;
            }
        }

        match result {
            Ok(results) => {
                tracing::debug!(
                    "search {} resolved with {} listings",
                    generation,
                    results.listings.len()
                );
                self.state_tx.send_modify(|state| {
                    state.busy = false;
                    state.listings = results.listings;
                    if let Some(page) = page {
                        state.page_query = page;
                    }
                });
            }
            Err(err) => {
                tracing::warn!("search {} failed: {}", generation, err);
                self.state_tx.send_modify(|state| {
                    state.busy = false;
                    state.notice = Some(err.to_string());
                });
            }
        }
    }

    /// (Re)arm the preview debounce timer.
    ///
    /// Previews only run while the drawer is open and a search has been
    /// committed at least once. The timer spawns the actual request as
    /// a detached task, so aborting the timer never cancels a request
    /// already issued - those are settled by generation instead.
    fn schedule_preview(shared: &Arc<Shared>, delay: Duration) {
        let mut inner = shared.inner.lock();
        if let Some(timer) = inner.preview_timer.take() {
            timer.abort();
        }
        if !inner.drawer_open || !inner.searched {
            return;
        }

        let shared = Arc::clone(shared);
        inner.preview_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(Shared::run_preview(shared));
        }));
    }

    /// Issue one preview request and publish its count, unless it is
    /// stale by the time it resolves.
    async fn run_preview(shared: Arc<Shared>) {
        let (generation, query) = {
            let mut inner = shared.inner.lock();
            if inner.term.trim().is_empty() {
                return;
            }
            inner.preview_generation += 1;
            (
                inner.preview_generation,
                SearchQuery::build(&inner.term, &inner.pending),
            )
        };

        tracing::debug!("preview {} issued", generation);
        let result = shared.service.search(query).await;

        {
            let inner = shared.inner.lock();
            if inner.preview_generation != generation || !inner.drawer_open {
                tracing::debug!("preview {} superseded, dropping", generation);
                return;
            }
        }

        // Preview failures degrade to "no count"; they are never surfaced.
        let count = match result {
            Ok(results) => Some(results.listings.len()),
            Err(err) => {
                tracing::debug!("preview {} failed: {}", generation, err);
                None
            }
        };
        shared
            .state_tx
            .send_modify(|state| state.preview_count = count);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::mock::{MockGeolocation, MockSearchService};

    const TICK: Duration = Duration::from_millis(20);

    fn listings(n: usize) -> Vec<Listing> {
        (0..n)
            .map(|i| Listing::new(i as i64, format!("Item {}", i), 1000 + i as i64))
            .collect()
    }

    fn engine_with(service: &MockSearchService, geo: &MockGeolocation) -> SearchEngine {
        SearchEngine::new(Arc::new(service.clone()), Arc::new(geo.clone())).with_debounce(TICK)
    }

    async fn settle() {
        tokio::time::sleep(TICK * 4).await;
    }

    #[tokio::test]
    async fn test_empty_term_is_a_no_op() {
        let service = MockSearchService::new();
        let engine = engine_with(&service, &MockGeolocation::new());

        engine.submit_search("").await;
        engine.submit_search("   ").await;

        assert_eq!(service.query_count(), 0);
        assert!(!engine.state().searched);
        assert!(!engine.state().busy);
    }

    #[tokio::test]
    async fn test_submit_search_publishes_results() {
        let service = MockSearchService::new().with_results(listings(3));
        let engine = engine_with(&service, &MockGeolocation::new());

        engine.submit_search("bike").await;

        let state = engine.state();
        assert!(state.searched);
        assert!(!state.busy);
        assert_eq!(state.listings.len(), 3);
        assert_eq!(state.page_query, vec![("q".to_string(), "bike".to_string())]);
        assert_eq!(service.last_query().unwrap().q, "bike");
    }

    #[tokio::test]
    async fn test_submit_failure_surfaces_notice() {
        let service = MockSearchService::new();
        service.set_failing(true);
        let engine = engine_with(&service, &MockGeolocation::new());

        engine.submit_search("bike").await;

        let state = engine.state();
        assert!(state.searched);
        assert!(!state.busy);
        assert!(state.listings.is_empty());
        assert!(state.notice.is_some());
    }

    #[tokio::test]
    async fn test_page_query_carries_applied_category() {
        let service = MockSearchService::new();
        let engine = engine_with(&service, &MockGeolocation::new());

        engine.open_drawer();
        engine.set_pending_category(Some(Category::Books));
        engine.apply_filters().await;
        engine.submit_search("atlas").await;

        assert_eq!(
            engine.state().page_query,
            vec![
                ("q".to_string(), "atlas".to_string()),
                ("category".to_string(), "books".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_drawer_snapshot_discards_abandoned_edits() {
        let service = MockSearchService::new();
        let engine = engine_with(&service, &MockGeolocation::new());

        engine.open_drawer();
        engine.set_pending_category(Some(Category::Auto));
        engine.set_pending_zip("01826");
        engine.close_drawer();

        engine.open_drawer();
        assert_eq!(engine.pending_filters(), engine.applied_filters());
        assert!(engine.pending_filters().category.is_none());
    }

    #[tokio::test]
    async fn test_clear_filters_touches_only_pending() {
        let service = MockSearchService::new();
        let engine = engine_with(&service, &MockGeolocation::new());

        engine.open_drawer();
        engine.set_pending_category(Some(Category::Books));
        engine.apply_filters().await;

        engine.open_drawer();
        engine.clear_filters();

        assert_eq!(engine.pending_filters(), FilterState::default());
        assert_eq!(engine.applied_filters().category, Some(Category::Books));
        // No term was ever committed, so nothing hit the network.
        assert_eq!(service.query_count(), 0);
    }

    #[tokio::test]
    async fn test_apply_promotes_and_re_searches() {
        let service = MockSearchService::new().with_results(listings(2));
        let engine = engine_with(&service, &MockGeolocation::new());

        engine.submit_search("bike").await;
        assert_eq!(service.query_count(), 1);

        engine.open_drawer();
        engine.set_pending_sort(SortOrder::PriceLow);
        engine.set_pending_category(Some(Category::Sports));
        engine.apply_filters().await;

        assert_eq!(engine.applied_filters().sort, SortOrder::PriceLow);
        assert!(!engine.state().drawer_open);

        let last = service.last_query().unwrap();
        assert_eq!(last.q, "bike");
        assert_eq!(last.sort, Some(SortOrder::PriceLow));
        assert_eq!(last.category, Some(Category::Sports));
    }

    #[tokio::test]
    async fn test_apply_without_term_promotes_silently() {
        let service = MockSearchService::new();
        let engine = engine_with(&service, &MockGeolocation::new());

        engine.open_drawer();
        engine.toggle_pending_safe_meet();
        engine.apply_filters().await;

        assert!(engine.applied_filters().safe_meet_only);
        assert_eq!(service.query_count(), 0);
        assert!(!engine.state().busy);
    }

    #[tokio::test]
    async fn test_apply_is_not_rolled_back_on_search_failure() {
        let service = MockSearchService::new().with_results(listings(4));
        let engine = engine_with(&service, &MockGeolocation::new());

        engine.submit_search("bike").await;
        assert_eq!(engine.state().listings.len(), 4);

        service.set_failing(true);
        engine.open_drawer();
        engine.set_pending_condition(Some(Condition::LikeNew));
        engine.apply_filters().await;

        let state = engine.state();
        // Promotion sticks; the failure only produces a notice.
        assert_eq!(engine.applied_filters().condition, Some(Condition::LikeNew));
        assert!(state.notice.is_some());
        // The old results are kept rather than cleared.
        assert_eq!(state.listings.len(), 4);
    }

    #[tokio::test]
    async fn test_debounce_coalesces_rapid_edits() {
        let service = MockSearchService::new().with_results(listings(1));
        let engine = engine_with(&service, &MockGeolocation::new());

        engine.submit_search("bike").await;
        assert_eq!(service.query_count(), 1);

        engine.open_drawer();
        engine.set_pending_min_price("5");
        engine.set_pending_min_price("50");
        engine.set_pending_min_price("500");
        settle().await;

        // One preview for the whole burst, reflecting the last edit.
        assert_eq!(service.query_count(), 2);
        assert_eq!(
            service.last_query().unwrap().min_price.as_deref(),
            Some("500")
        );
        assert_eq!(engine.state().preview_count, Some(1));
    }

    #[tokio::test]
    async fn test_preview_requires_a_prior_search() {
        let service = MockSearchService::new();
        let engine = engine_with(&service, &MockGeolocation::new());

        engine.open_drawer();
        engine.set_pending_zip("01826");
        settle().await;

        assert_eq!(service.query_count(), 0);
        assert!(engine.state().preview_count.is_none());
    }

    #[tokio::test]
    async fn test_preview_requires_open_drawer() {
        let service = MockSearchService::new();
        let engine = engine_with(&service, &MockGeolocation::new());

        engine.submit_search("bike").await;
        engine.set_pending_zip("01826");
        settle().await;

        assert_eq!(service.query_count(), 1);
    }

    #[tokio::test]
    async fn test_close_drawer_cancels_scheduled_preview() {
        let service = MockSearchService::new();
        let engine = engine_with(&service, &MockGeolocation::new());

        engine.submit_search("bike").await;
        engine.open_drawer();
        engine.set_pending_zip("01826");
        engine.close_drawer();
        settle().await;

        assert_eq!(service.query_count(), 1);
        assert!(engine.state().preview_count.is_none());
    }

    #[tokio::test]
    async fn test_stale_preview_is_discarded() {
        let service = MockSearchService::new().with_results(listings(3));
        let engine = engine_with(&service, &MockGeolocation::new());

        engine.submit_search("bike").await;
        engine.open_drawer();

        // First preview resolves slowly with 5 listings, the superseding
        // one instantly with 2. Last-issued wins regardless of arrival order.
        service.queue_response(TICK * 8, listings(5));
        service.queue_response(Duration::ZERO, listings(2));

        engine.set_pending_zip("01826");
        tokio::time::sleep(TICK * 2).await; // first preview is now in flight
        engine.set_pending_zip("01827");
        tokio::time::sleep(TICK * 12).await; // both have resolved

        assert_eq!(service.query_count(), 3);
        assert_eq!(engine.state().preview_count, Some(2));
    }

    #[tokio::test]
    async fn test_stale_full_search_is_discarded() {
        let service = MockSearchService::new();
        let engine = engine_with(&service, &MockGeolocation::new());

        service.queue_response(TICK * 6, listings(5));
        service.queue_response(Duration::ZERO, listings(2));

        let slow = engine.submit_search("bike");
        let fast = engine.submit_search("lamp");
        tokio::join!(slow, fast);
        settle().await;

        // The later-issued search owns the results.
        assert_eq!(engine.state().listings.len(), 2);
        assert_eq!(engine.term(), "lamp");
    }

    #[tokio::test]
    async fn test_use_my_location_fills_pending() {
        let service = MockSearchService::new();
        let geo = MockGeolocation::new().with_position(42.1, -71.3);
        let engine = engine_with(&service, &geo);

        engine.open_drawer();
        engine.use_my_location().await;

        let pending = engine.pending_filters();
        let location = pending.location.unwrap();
        assert_eq!(location.lat, 42.1);
        assert_eq!(location.lng, -71.3);
        assert_eq!(pending.radius_km, Some(DEFAULT_RADIUS_KM));
        assert!(!engine.state().locating);
    }

    #[tokio::test]
    async fn test_use_my_location_keeps_chosen_radius() {
        let service = MockSearchService::new();
        let geo = MockGeolocation::new().with_position(42.1, -71.3);
        let engine = engine_with(&service, &geo);

        engine.open_drawer();
        engine.set_pending_radius(Some(80));
        engine.use_my_location().await;

        assert_eq!(engine.pending_filters().radius_km, Some(80));
    }

    #[tokio::test]
    async fn test_use_my_location_failure_leaves_pending() {
        let service = MockSearchService::new();
        let geo = MockGeolocation::new();
        let engine = engine_with(&service, &geo);

        engine.open_drawer();
        engine.use_my_location().await;

        let state = engine.state();
        assert!(engine.pending_filters().location.is_none());
        assert!(engine.pending_filters().radius_km.is_none());
        assert!(!state.locating);
        assert_eq!(state.notice.as_deref(), Some("Could not get location"));
    }

    #[tokio::test]
    async fn test_overlapping_location_requests_collapse() {
        let service = MockSearchService::new();
        let geo = MockGeolocation::new()
            .with_position(42.1, -71.3)
            .with_delay(TICK * 2);
        let engine = engine_with(&service, &geo);

        tokio::join!(engine.use_my_location(), engine.use_my_location());

        assert_eq!(geo.call_count(), 1);
        assert!(engine.pending_filters().location.is_some());
    }

    #[tokio::test]
    async fn test_save_search_records_term() {
        let service = MockSearchService::new();
        let engine = engine_with(&service, &MockGeolocation::new());

        engine.save_search().await;
        assert!(service.saved.lock().is_empty());

        engine.submit_search("bike").await;
        engine.save_search().await;

        assert_eq!(service.saved.lock().clone(), vec!["bike".to_string()]);
        assert_eq!(engine.state().notice.as_deref(), Some("Search saved!"));
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let service = MockSearchService::new().with_results(listings(2));
        let engine = engine_with(&service, &MockGeolocation::new());
        let mut rx = engine.subscribe();

        engine.submit_search("bike").await;

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().listings.len(), 2);
    }
}
