//! Listing types for search results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A marketplace listing as rendered on the search page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    /// Server-side identifier.
    pub id: i64,

    /// Listing title.
    pub title: String,

    /// Asking price in cents.
    pub price_cents: i64,

    /// When the listing was posted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Image paths, relative to the API base.
    #[serde(default)]
    pub images: Vec<String>,

    /// Marked sold by the seller.
    #[serde(default)]
    pub is_sold: bool,

    /// Seller has a verified public meetup location set.
    #[serde(default)]
    pub safe_meet: bool,

    /// Seller holds a pro subscription.
    #[serde(default)]
    pub is_pro_seller: bool,
}

impl Listing {
    /// Create a listing with required fields.
    pub fn new(id: i64, title: impl Into<String>, price_cents: i64) -> Self {
        Self {
            id,
            title: title.into(),
            price_cents,
            created_at: None,
            images: Vec::new(),
            is_sold: false,
            safe_meet: false,
            is_pro_seller: false,
        }
    }

    /// First image path, if any.
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Formatted price, e.g. `$12` or `$12.50`.
    pub fn price_label(&self) -> String {
        money(self.price_cents)
    }
}

/// Format a cent amount as dollars, dropping the fraction when whole.
pub fn money(cents: i64) -> String {
    if cents % 100 == 0 {
        format!("${}", cents / 100)
    } else {
        format!("${:.2}", cents as f64 / 100.0)
    }
}

/// Relative age label for a listing timestamp.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    if secs < 60 {
        "just now".to_string()
    } else if secs < 3_600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86_400 {
        format!("{}h ago", secs / 3_600)
    } else if secs < 604_800 {
        format!("{}d ago", secs / 86_400)
    } else {
        format!("{}w ago", secs / 604_800)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_money_whole_dollars() {
        assert_eq!(money(1200), "$12");
        assert_eq!(money(0), "$0");
    }

    #[test]
    fn test_money_with_cents() {
        assert_eq!(money(1250), "$12.50");
        assert_eq!(money(199), "$1.99");
    }

    #[test]
    fn test_time_ago_buckets() {
        let now = Utc::now();
        assert_eq!(time_ago(now - Duration::seconds(30), now), "just now");
        assert_eq!(time_ago(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(time_ago(now - Duration::hours(3), now), "3h ago");
        assert_eq!(time_ago(now - Duration::days(2), now), "2d ago");
        assert_eq!(time_ago(now - Duration::weeks(3), now), "3w ago");
    }

    #[test]
    fn test_time_ago_future_timestamp() {
        let now = Utc::now();
        assert_eq!(time_ago(now + Duration::minutes(5), now), "just now");
    }

    #[test]
    fn test_listing_decode_with_defaults() {
        let listing: Listing = serde_json::from_str(
            r#"{"id": 7, "title": "Desk lamp", "price_cents": 1250}"#,
        )
        .unwrap();

        assert_eq!(listing.id, 7);
        assert_eq!(listing.price_label(), "$12.50");
        assert!(listing.images.is_empty());
        assert!(listing.cover_image().is_none());
        assert!(!listing.is_sold);
        assert!(!listing.safe_meet);
    }
}
