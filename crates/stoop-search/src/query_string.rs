//! Shareable address-bar representation of a committed search.
//!
//! Only the term and the category survive into the page query, so a
//! bookmarked search stays short and stable. URL escaping is the host
//! shell's job; this module deals in decoded key/value pairs.

use stoop_core::{Category, FilterState};

/// Page query parsed from the address bar on arrival.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageQuery {
    /// Free-text term to seed the initial search with.
    pub term: Option<String>,

    /// Category to pre-select. Unknown names are ignored.
    pub category: Option<Category>,
}

impl PageQuery {
    /// Parse from decoded key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = PageQuery::default();
        for (key, value) in pairs {
            match key.as_ref() {
                "q" => {
                    let term = value.as_ref().trim();
                    if !term.is_empty() {
                        query.term = Some(term.to_string());
                    }
                }
                "category" => {
                    query.category = value.as_ref().parse().ok();
                }
                _ => {}
            }
        }
        query
    }
}

/// Pairs written back to the address bar after a committed search.
pub fn page_params(term: &str, filters: &FilterState) -> Vec<(String, String)> {
    let mut params = vec![("q".to_string(), term.to_string())];
    if let Some(category) = filters.category {
        params.push(("category".to_string(), category.to_string()));
    }
    params
}
