//! stoop - one-shot marketplace search from the command line.
//!
//! Loads the user config, builds a search query from the arguments, and
//! runs it against the configured server.

use clap::{Arg, ArgAction, Command};
use std::sync::Arc;

use stoop_core::{AppConfig, Category, Condition, FilterState, SearchQuery, SortOrder};
use stoop_search::{HttpSearchService, SearchService};

fn cli() -> Command {
    Command::new("stoop")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Search a stoop marketplace server")
        .arg(
            Arg::new("term")
                .value_name("TERM")
                .help("Free-text search term")
                .required(true),
        )
        .arg(
            Arg::new("category")
                .short('c')
                .long("category")
                .value_name("CATEGORY")
                .help("Limit to one category (e.g. books, furniture)"),
        )
        .arg(
            Arg::new("condition")
                .long("condition")
                .value_name("CONDITION")
                .help("Limit to one condition: new, \"like new\", used, fair"),
        )
        .arg(
            Arg::new("min-price")
                .long("min-price")
                .value_name("DOLLARS")
                .help("Minimum price"),
        )
        .arg(
            Arg::new("max-price")
                .long("max-price")
                .value_name("DOLLARS")
                .help("Maximum price"),
        )
        .arg(
            Arg::new("zip")
                .short('z')
                .long("zip")
                .value_name("ZIP")
                .help("Near this ZIP code"),
        )
        .arg(
            Arg::new("sort")
                .short('s')
                .long("sort")
                .value_name("ORDER")
                .help("newest, oldest, price_low, or price_high"),
        )
        .arg(
            Arg::new("safe-meet")
                .long("safe-meet")
                .help("Safe meetup sellers only")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .value_name("URL")
                .help("Override the configured server"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Show request logging")
                .action(ArgAction::SetTrue),
        )
}

/// Build the filter state from parsed arguments.
///
/// Unknown category/condition/sort names are hard errors - the sets are
/// closed, and a typo silently dropped would surprise more than it helps.
fn filters_from_args(matches: &clap::ArgMatches) -> Result<FilterState, String> {
    let mut filters = FilterState::default();

    if let Some(raw) = matches.get_one::<String>("category") {
        filters.category = Some(
            raw.parse::<Category>()
                .map_err(|_| format!("unknown category '{}'", raw))?,
        );
    }
    if let Some(raw) = matches.get_one::<String>("condition") {
        filters.condition = Some(
            raw.parse::<Condition>()
                .map_err(|_| format!("unknown condition '{}'", raw))?,
        );
    }
    if let Some(raw) = matches.get_one::<String>("sort") {
        filters.sort = raw
            .parse::<SortOrder>()
            .map_err(|_| format!("unknown sort order '{}'", raw))?;
    }
    if let Some(raw) = matches.get_one::<String>("min-price") {
        filters.min_price = raw.clone();
    }
    if let Some(raw) = matches.get_one::<String>("max-price") {
        filters.max_price = raw.clone();
    }
    if let Some(raw) = matches.get_one::<String>("zip") {
        filters.set_zip(raw);
    }
    filters.safe_meet_only = matches.get_flag("safe-meet");

    Ok(filters)
}

fn main() {
    let matches = cli().get_matches();

    let level = if matches.get_flag("verbose") {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let timeout = config.api.timeout();
    let base_url = matches
        .get_one::<String>("base-url")
        .cloned()
        .unwrap_or(config.api.base_url);
    tracing::debug!("server: {}", base_url);

    let filters = match filters_from_args(&matches) {
        Ok(filters) => filters,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let term = matches
        .get_one::<String>("term")
        .map(String::as_str)
        .unwrap_or_default();
    if term.trim().is_empty() {
        eprintln!("Error: empty search term");
        std::process::exit(1);
    }
    let query = SearchQuery::build(term, &filters);

    let service = match HttpSearchService::with_timeout(base_url, timeout) {
        Ok(service) => Arc::new(service),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to create tokio runtime");

    match rt.block_on(service.search(query)) {
        Ok(results) => {
            if results.listings.is_empty() {
                println!("No results for \"{}\"", term.trim());
                return;
            }
            println!(
                "{} result{}",
                results.listings.len(),
                if results.listings.len() == 1 { "" } else { "s" }
            );
            for listing in &results.listings {
                let mut line = format!("{:>9}  {}", listing.price_label(), listing.title);
                if listing.is_sold {
                    line.push_str("  [sold]");
                }
                if listing.safe_meet {
                    line.push_str("  [safe meetup]");
                }
                println!("{}", line);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches_for(args: &[&str]) -> clap::ArgMatches {
        cli().try_get_matches_from(args).unwrap()
    }

    #[test]
    fn test_filters_from_args_full() {
        let matches = matches_for(&[
            "stoop",
            "lamp",
            "--category",
            "furniture",
            "--condition",
            "like new",
            "--min-price",
            "5",
            "--max-price",
            "50",
            "--zip",
            "01826",
            "--sort",
            "price_low",
            "--safe-meet",
        ]);

        let filters = filters_from_args(&matches).unwrap();
        assert_eq!(filters.category, Some(Category::Furniture));
        assert_eq!(filters.condition, Some(Condition::LikeNew));
        assert_eq!(filters.sort, SortOrder::PriceLow);
        assert_eq!(filters.zip, "01826");
        assert!(filters.safe_meet_only);

        let query = SearchQuery::build("lamp", &filters);
        assert_eq!(query.min_price.as_deref(), Some("5"));
        assert_eq!(query.has_safe_meet.as_deref(), Some("1"));
    }

    #[test]
    fn test_filters_from_args_rejects_unknown_category() {
        let matches = matches_for(&["stoop", "lamp", "--category", "gadgets"]);
        assert!(filters_from_args(&matches).is_err());
    }

    #[test]
    fn test_filters_from_args_defaults() {
        let matches = matches_for(&["stoop", "lamp"]);
        let filters = filters_from_args(&matches).unwrap();
        assert_eq!(filters, FilterState::default());
    }
}
