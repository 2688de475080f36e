//! Catalog product search.
//!
//! # Scoring
//!
//! The query is split on whitespace into lowercase terms; surrounding
//! punctuation is stripped and terms shorter than two characters are
//! dropped. Each term contributes to a product's score when it occurs as a
//! whole word in a field:
//!
//! | Field | Points per term |
//! |-------|-----------------|
//! | title | 10 |
//! | any tag | 5 |
//! | product type | 3 |
//! | vendor | 2 |
//!
//! Products scoring zero are dropped. The rest are stable-sorted by score
//! descending, so ties keep catalog order, and truncated to
//! `min(limit, max_limit)`.

use anyhow::Result;
use regex::Regex;

use crate::catalog::{product_url, Catalog, CatalogState};
use crate::config::Config;
use crate::models::{Product, ProductMatch};

pub const TITLE_WEIGHT: u32 = 10;
pub const TAG_WEIGHT: u32 = 5;
pub const PRODUCT_TYPE_WEIGHT: u32 = 3;
pub const VENDOR_WEIGHT: u32 = 2;

/// Result-size parameters, decoupled from application config.
#[derive(Debug, Clone, Copy)]
pub struct SearchParams {
    /// Requested number of results.
    pub limit: usize,
    /// Hard cap applied to `limit`.
    pub max_limit: usize,
}

impl SearchParams {
    pub fn effective_limit(&self) -> usize {
        self.limit.min(self.max_limit)
    }
}

/// A query term with its compiled whole-word matcher.
#[derive(Debug, Clone)]
pub struct Term {
    pub text: String,
    pattern: Regex,
}

impl Term {
    fn matches(&self, field: &str) -> bool {
        self.pattern.is_match(field)
    }
}

/// Splits a raw query into scoring terms.
pub fn tokenize(query: &str) -> Vec<Term> {
    query
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| w.chars().count() >= 2)
        .filter_map(|w| {
            let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(&w))).ok()?;
            Some(Term { text: w, pattern })
        })
        .collect()
}

/// Scores one product against pre-tokenized terms.
pub fn score_product(product: &Product, terms: &[Term]) -> u32 {
    let title = product.title.to_lowercase();
    let product_type = product.product_type.to_lowercase();
    let vendor = product.vendor.to_lowercase();
    let tags: Vec<String> = product.tags.iter().map(|t| t.to_lowercase()).collect();

    let mut score = 0;
    for term in terms {
        if term.matches(&title) {
            score += TITLE_WEIGHT;
        }
        if tags.iter().any(|tag| term.matches(tag)) {
            score += TAG_WEIGHT;
        }
        if term.matches(&product_type) {
            score += PRODUCT_TYPE_WEIGHT;
        }
        if term.matches(&vendor) {
            score += VENDOR_WEIGHT;
        }
    }
    score
}

/// Ranks the catalog for `query`, best first.
pub fn rank<'a>(catalog: &'a Catalog, query: &str, params: SearchParams) -> Vec<(&'a Product, u32)> {
    let terms = tokenize(query);
    if terms.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(&Product, u32)> = catalog
        .products()
        .iter()
        .map(|p| (p, score_product(p, &terms)))
        .filter(|(_, score)| *score > 0)
        .collect();

    // sort_by is stable: equal scores stay in catalog order
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.truncate(params.effective_limit());
    scored
}

/// What a product search produced. An unavailable catalog is never reported
/// as an empty match list.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Matches(Vec<ProductMatch>),
    CatalogUnavailable,
}

/// Searches the loaded catalog and builds client-facing matches.
pub fn search_products(
    state: &CatalogState,
    storefront_domain: &str,
    query: &str,
    params: SearchParams,
) -> SearchOutcome {
    let Some(catalog) = state.catalog() else {
        return SearchOutcome::CatalogUnavailable;
    };

    let matches = rank(catalog, query, params)
        .into_iter()
        .map(|(p, score)| ProductMatch {
            title: p.title.clone(),
            handle: p.handle.clone(),
            url: product_url(storefront_domain, &p.handle),
            price: p.price.clone(),
            image: p.image.clone(),
            score,
        })
        .collect();

    SearchOutcome::Matches(matches)
}

/// `sbot search` entry point: prints ranked products.
pub fn run_search(config: &Config, query: &str, limit: Option<usize>) -> Result<()> {
    if limit == Some(0) {
        anyhow::bail!("--limit must be >= 1");
    }

    if query.trim().is_empty() {
        println!("No results.");
        return Ok(());
    }

    let state = CatalogState::load(&config.content.catalog_path);
    let params = SearchParams {
        limit: limit.unwrap_or(config.search.default_limit),
        max_limit: config.search.max_limit,
    };

    let matches = match search_products(&state, &config.server.storefront_domain, query, params) {
        SearchOutcome::CatalogUnavailable => {
            anyhow::bail!(
                "catalog unavailable: {}",
                config.content.catalog_path.display()
            );
        }
        SearchOutcome::Matches(m) => m,
    };

    if matches.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, m) in matches.iter().enumerate() {
        println!("{}. [{}] {}", i + 1, m.score, m.title);
        if let Some(ref price) = m.price {
            println!("    price: {}", price);
        }
        println!("    url: {}", m.url);
        println!();
    }

    Ok(())
}
