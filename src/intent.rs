//! Keyword-based intent routing.
//!
//! A message is checked against fixed keyword lists in a fixed order and the
//! first intent with a matching keyword wins:
//!
//! | Order | Intent | Match |
//! |-------|--------|-------|
//! | 1 | [`Intent::Escalation`] | substring |
//! | 2 | [`Intent::Shipping`] | substring |
//! | 3 | [`Intent::Returns`] | substring |
//! | 4 | [`Intent::Care`] | substring |
//! | 5 | [`Intent::Product`] | whole word |
//! | - | [`Intent::General`] | fallback |
//!
//! The order is the contract: "can support help with shipping?" is an
//! escalation, not a shipping question.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::RouterConfig;
use crate::faq::FaqSection;

pub const ESCALATION_KEYWORDS: &[&str] = &["human", "agent", "support", "contact", "email", "call"];
pub const SHIPPING_KEYWORDS: &[&str] = &["ship"];
pub const RETURNS_KEYWORDS: &[&str] = &["return", "refund", "exchange"];
pub const CARE_KEYWORDS: &[&str] = &["wash", "care", "clean", "laundry", "iron"];
pub const PRODUCT_KEYWORDS: &[&str] = &[
    "product",
    "products",
    "buy",
    "shop",
    "looking",
    "find",
    "recommend",
    "gift",
    "onesie",
    "onesies",
    "romper",
    "rompers",
    "bodysuit",
    "sleepsuit",
    "dress",
    "dresses",
    "shirt",
    "shirts",
    "pants",
    "trousers",
    "leggings",
    "cardigan",
    "sweater",
    "jumper",
    "hat",
    "hats",
    "socks",
    "blanket",
    "bib",
    "bibs",
    "clothes",
    "outfit",
    "silk",
    "wool",
    "merino",
    "cotton",
    "linen",
];

/// The category of help a message is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Escalation,
    Shipping,
    Returns,
    Care,
    Product,
    General,
}

impl Intent {
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Escalation => "escalation",
            Intent::Shipping => "shipping",
            Intent::Returns => "returns",
            Intent::Care => "care",
            Intent::Product => "product",
            Intent::General => "general",
        }
    }

    /// FAQ section answering this intent, if it is a policy question.
    pub fn faq_section(&self) -> Option<FaqSection> {
        match self {
            Intent::Shipping => Some(FaqSection::Shipping),
            Intent::Returns => Some(FaqSection::Returns),
            Intent::Care => Some(FaqSection::Care),
            _ => None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Classifies lowercased messages into an [`Intent`].
#[derive(Debug, Clone)]
pub struct IntentRouter {
    escalation: Vec<String>,
    shipping: Vec<String>,
    returns: Vec<String>,
    care: Vec<String>,
    product: Vec<Regex>,
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self::from_config(&RouterConfig::default())
    }
}

impl IntentRouter {
    /// Builds a router, replacing built-in keyword lists with any overrides.
    pub fn from_config(config: &RouterConfig) -> Self {
        let pick = |custom: &Option<Vec<String>>, builtin: &[&str]| -> Vec<String> {
            match custom {
                Some(list) => list.iter().map(|k| k.trim().to_lowercase()).collect(),
                None => builtin.iter().map(|k| k.to_string()).collect(),
            }
        };

        let product = pick(&config.product, PRODUCT_KEYWORDS)
            .iter()
            .filter_map(|kw| Regex::new(&format!(r"\b{}\b", regex::escape(kw))).ok())
            .collect();

        Self {
            escalation: pick(&config.escalation, ESCALATION_KEYWORDS),
            shipping: pick(&config.shipping, SHIPPING_KEYWORDS),
            returns: pick(&config.returns, RETURNS_KEYWORDS),
            care: pick(&config.care, CARE_KEYWORDS),
            product,
        }
    }

    /// Classifies a message that has already been lowercased.
    pub fn classify(&self, message: &str) -> Intent {
        let ordered: [(&[String], Intent); 4] = [
            (self.escalation.as_slice(), Intent::Escalation),
            (self.shipping.as_slice(), Intent::Shipping),
            (self.returns.as_slice(), Intent::Returns),
            (self.care.as_slice(), Intent::Care),
        ];

        for (keywords, intent) in ordered {
            if contains_any(message, keywords) {
                return intent;
            }
        }

        if self.product.iter().any(|re| re.is_match(message)) {
            return Intent::Product;
        }

        Intent::General
    }
}

fn contains_any(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|kw| text.contains(kw.as_str()))
}
