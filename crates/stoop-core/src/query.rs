//! The outbound search query.
//!
//! [`SearchQuery`] is the minimal server-bound projection of a free-text
//! term plus a [`FilterState`]: only non-empty dimensions appear, the
//! default sort is left out, and the radius travels only alongside a
//! location. Building it is pure - equal inputs always produce an equal
//! query, which keeps shareable representations canonical.

use serde::Serialize;

use crate::filter::{Category, Condition, FilterState, SortOrder};

/// Query parameters sent to the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_safe_meet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_km: Option<u32>,
}

impl SearchQuery {
    /// Project a term and a filter state into the minimal query.
    ///
    /// The term is trimmed here; callers are expected not to submit an
    /// empty search in the first place.
    pub fn build(term: &str, filters: &FilterState) -> Self {
        let non_empty = |raw: &str| {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };

        let mut query = SearchQuery {
            q: term.trim().to_string(),
            category: filters.category,
            condition: filters.condition,
            min_price: non_empty(&filters.min_price),
            max_price: non_empty(&filters.max_price),
            zip: non_empty(&filters.zip),
            sort: (!filters.sort.is_default()).then_some(filters.sort),
            has_safe_meet: filters.safe_meet_only.then(|| "1".to_string()),
            lat: None,
            lng: None,
            radius_km: None,
        };

        if let Some(location) = filters.location {
            query.lat = Some(location.lat);
            query.lng = Some(location.lng);
            query.radius_km = filters.radius_km;
        }

        query
    }

    /// Flatten into ordered key/value pairs for the HTTP layer.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("q", self.q.clone())];
        if let Some(category) = self.category {
            pairs.push(("category", category.to_string()));
        }
        if let Some(condition) = self.condition {
            pairs.push(("condition", condition.to_string()));
        }
        if let Some(min_price) = &self.min_price {
            pairs.push(("min_price", min_price.clone()));
        }
        if let Some(max_price) = &self.max_price {
            pairs.push(("max_price", max_price.clone()));
        }
        if let Some(zip) = &self.zip {
            pairs.push(("zip", zip.clone()));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.to_string()));
        }
        if let Some(flag) = &self.has_safe_meet {
            pairs.push(("has_safe_meet", flag.clone()));
        }
        if let Some(lat) = self.lat {
            pairs.push(("lat", lat.to_string()));
        }
        if let Some(lng) = self.lng {
            pairs.push(("lng", lng.to_string()));
        }
        if let Some(radius_km) = self.radius_km {
            pairs.push(("radius_km", radius_km.to_string()));
        }
        pairs
    }
}
