//! Reply generation.
//!
//! [`Assistant`] owns everything a reply depends on: the intent router, the
//! FAQ document, and the catalog. It is built once at startup and shared
//! read-only, so concurrent requests need no coordination.

use std::fmt::Write as _;

use anyhow::Result;
use tracing::debug;

use crate::catalog::CatalogState;
use crate::config::Config;
use crate::faq::FaqDocument;
use crate::intent::{Intent, IntentRouter};
use crate::models::{ChatResponse, ProductMatch, UiDirective};
use crate::search::{search_products, SearchOutcome, SearchParams};

pub const ESCALATION_REPLY: &str = "I understand you'd like to speak with someone from our team. \
Please fill in the form below and we'll get back to you as soon as possible, usually within one business day.";

pub const GENERAL_REPLY: &str = "Hi there! I can help you with questions about shipping, returns & refunds, \
or washing & care instructions, and I can help you find products. \
You can also type 'contact' if you'd like to reach our support team.";

pub const CATALOG_UNAVAILABLE_REPLY: &str = "Sorry, our product catalog isn't available right now, \
so I can't search for products. Please browse the shop directly or try again later.";

pub const NO_PRODUCTS_REPLY: &str = "I couldn't find any products matching that. \
Try describing the item differently, for example \"silk onesie\" or \"wool hat\".";

pub struct Assistant {
    router: IntentRouter,
    faq: FaqDocument,
    catalog: CatalogState,
    storefront_domain: String,
    search: SearchParams,
}

impl Assistant {
    pub fn new(
        router: IntentRouter,
        faq: FaqDocument,
        catalog: CatalogState,
        storefront_domain: impl Into<String>,
        search: SearchParams,
    ) -> Self {
        Self {
            router,
            faq,
            catalog,
            storefront_domain: storefront_domain.into(),
            search,
        }
    }

    /// Loads FAQ and catalog from the configured paths. Missing content
    /// degrades the affected replies but never fails construction.
    pub fn from_config(config: &Config) -> Self {
        Self::with_faq(config, FaqDocument::load_or_empty(config.content.faq_path()))
    }

    /// Startup loader for `serve`: an FAQ path set in the config file must
    /// be readable. Without one, the default path degrades like
    /// [`from_config`](Self::from_config).
    pub fn load(config: &Config) -> Result<Self> {
        let faq = match &config.content.faq_path {
            Some(path) => FaqDocument::load(path)?,
            None => FaqDocument::load_or_empty(config.content.faq_path()),
        };
        Ok(Self::with_faq(config, faq))
    }

    fn with_faq(config: &Config, faq: FaqDocument) -> Self {
        Self::new(
            IntentRouter::from_config(&config.router),
            faq,
            CatalogState::load(&config.content.catalog_path),
            config.server.storefront_domain.clone(),
            SearchParams {
                limit: config.search.default_limit,
                max_limit: config.search.max_limit,
            },
        )
    }

    pub fn faq(&self) -> &FaqDocument {
        &self.faq
    }

    pub fn catalog(&self) -> &CatalogState {
        &self.catalog
    }

    pub fn classify(&self, message: &str) -> Intent {
        self.router.classify(&message.to_lowercase())
    }

    /// Searches the catalog with an explicit limit (capped by config).
    pub fn search(&self, query: &str, limit: Option<usize>) -> SearchOutcome {
        let params = SearchParams {
            limit: limit.unwrap_or(self.search.limit),
            ..self.search
        };
        search_products(&self.catalog, &self.storefront_domain, query, params)
    }

    /// Builds the reply for one user message.
    pub fn reply(&self, message: &str) -> ChatResponse {
        self.answer(message).1
    }

    /// Like [`reply`](Self::reply), also returning the routed intent.
    pub fn answer(&self, message: &str) -> (Intent, ChatResponse) {
        let intent = self.classify(message);
        debug!(intent = %intent, "message classified");

        let response = match intent {
            Intent::Escalation => ChatResponse {
                reply: ESCALATION_REPLY.to_string(),
                ui: Some(UiDirective::escalation_form()),
                products: Vec::new(),
            },
            Intent::Shipping | Intent::Returns | Intent::Care => {
                let text = intent
                    .faq_section()
                    .map(|s| self.faq.section(s))
                    .unwrap_or_default();
                if text.is_empty() {
                    debug!(intent = %intent, "FAQ section missing; replying with empty text");
                }
                ChatResponse::text(text)
            }
            Intent::Product => self.product_reply(message),
            Intent::General => ChatResponse::text(GENERAL_REPLY),
        };
        (intent, response)
    }

    fn product_reply(&self, message: &str) -> ChatResponse {
        match self.search(message, None) {
            SearchOutcome::CatalogUnavailable => ChatResponse::text(CATALOG_UNAVAILABLE_REPLY),
            SearchOutcome::Matches(matches) if matches.is_empty() => {
                ChatResponse::text(NO_PRODUCTS_REPLY)
            }
            SearchOutcome::Matches(matches) => ChatResponse {
                reply: format_product_list(&matches),
                ui: Some(UiDirective::product_list()),
                products: matches,
            },
        }
    }
}

fn format_product_list(matches: &[ProductMatch]) -> String {
    let mut out = String::from("Here are some products I found:");
    for (i, m) in matches.iter().enumerate() {
        let _ = write!(out, "\n{}. {}", i + 1, m.title);
        if let Some(ref price) = m.price {
            let _ = write!(out, " ({})", price);
        }
        let _ = write!(out, "\n   {}", m.url);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::models::Product;

    const FAQ: &str = "# Policies\n\n## Shipping\n\nWe ship within 2 business days.\n\n\
        ## Returns & Refunds\n\n30 day returns.\n\n## Washing & Care\n\nWash cold.\n";

    fn product(title: &str, tags: &[&str]) -> Product {
        Product {
            title: title.to_string(),
            handle: title.to_lowercase().replace(' ', "-"),
            vendor: "Little Llama".to_string(),
            product_type: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            price: Some("29.00".to_string()),
            image: None,
        }
    }

    fn assistant(catalog: CatalogState) -> Assistant {
        Assistant::new(
            IntentRouter::default(),
            FaqDocument::new(FAQ),
            catalog,
            "shop.example",
            SearchParams {
                limit: 5,
                max_limit: 10,
            },
        )
    }

    fn ready(products: Vec<Product>) -> CatalogState {
        CatalogState::Ready(Catalog::from_products(products))
    }

    #[test]
    fn test_shipping_reply_is_faq_section() {
        let a = assistant(ready(vec![]));
        let resp = a.reply("when will my order ship");
        assert_eq!(resp.reply, "We ship within 2 business days.");
        assert!(resp.ui.is_none());
    }

    #[test]
    fn test_escalation_sets_form_directive() {
        let a = assistant(ready(vec![]));
        let resp = a.reply("I want to speak to a HUMAN about shipping");
        assert_eq!(resp.reply, ESCALATION_REPLY);
        assert_eq!(resp.ui, Some(UiDirective::escalation_form()));
    }

    #[test]
    fn test_missing_faq_section_degrades_to_empty() {
        let a = Assistant::new(
            IntentRouter::default(),
            FaqDocument::new("## Shipping\n\nFast.\n"),
            ready(vec![]),
            "shop.example",
            SearchParams {
                limit: 5,
                max_limit: 10,
            },
        );
        let resp = a.reply("how do I wash this");
        assert_eq!(resp.reply, "");
    }

    #[test]
    fn test_product_reply_ranks_title_match_first() {
        let a = assistant(ready(vec![
            product("Cotton Romper", &["silk"]),
            product("Silk Onesie", &[]),
        ]));
        let resp = a.reply("I want a silk onesie");
        assert_eq!(resp.ui, Some(UiDirective::product_list()));
        assert_eq!(resp.products[0].title, "Silk Onesie");
        assert_eq!(resp.products.len(), 2);
        assert!(resp.reply.contains("1. Silk Onesie (29.00)"));
        assert!(resp
            .reply
            .contains("https://shop.example/en-eu/products/silk-onesie"));
    }

    #[test]
    fn test_catalog_unavailable_differs_from_no_matches() {
        let missing = assistant(CatalogState::Unavailable("gone".to_string()));
        assert_eq!(missing.reply("silk onesie").reply, CATALOG_UNAVAILABLE_REPLY);

        let empty = assistant(ready(vec![product("Wool Hat", &[])]));
        assert_eq!(empty.reply("silk onesie").reply, NO_PRODUCTS_REPLY);
    }

    #[test]
    fn test_general_fallback_reply() {
        let a = assistant(ready(vec![]));
        let resp = a.reply("");
        assert_eq!(resp.reply, GENERAL_REPLY);
        assert!(resp.products.is_empty());
    }

    #[test]
    fn test_load_requires_explicit_faq_path_to_exist() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut config = Config::minimal();
        config.content.catalog_path = tmp.path().join("products.json");
        config.content.faq_path = Some(tmp.path().join("missing.md"));

        let err = Assistant::load(&config).err().unwrap();
        assert!(format!("{:#}", err).contains("Failed to read FAQ file"));

        // The lenient constructor still starts with an empty FAQ.
        assert!(Assistant::from_config(&config).faq().is_empty());
    }

    #[test]
    fn test_load_reads_explicit_faq_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let faq_path = tmp.path().join("faq.md");
        std::fs::write(&faq_path, FAQ).unwrap();

        let mut config = Config::minimal();
        config.content.catalog_path = tmp.path().join("products.json");
        config.content.faq_path = Some(faq_path);

        let a = Assistant::load(&config).unwrap();
        assert_eq!(a.reply("when will my order ship").reply, "We ship within 2 business days.");
        assert!(!a.catalog().is_available());
    }
}
