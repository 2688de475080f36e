//! Core data models shared by the assistant, the HTTP server, and the chat
//! frontends.
//!
//! The request/response types here are the wire format of `POST /api/chat`;
//! [`Product`] is the normalized, read-only form of a catalog export entry.

use serde::{Deserialize, Serialize};

/// A catalog product after normalization. Entries without a title or a
/// handle never become a `Product`.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub title: String,
    pub handle: String,
    pub vendor: String,
    pub product_type: String,
    pub tags: Vec<String>,
    /// Price of the first variant, as exported (e.g. `"29.00"`).
    pub price: Option<String>,
    /// Source URL of the first image.
    pub image: Option<String>,
}

/// A scored search hit, as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMatch {
    pub title: String,
    pub handle: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub score: u32,
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// Rendering hint attached to an assistant reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiDirective {
    pub kind: String,
}

impl UiDirective {
    pub const ESCALATION_FORM: &'static str = "escalation_form";
    pub const PRODUCT_LIST: &'static str = "product_list";

    pub fn escalation_form() -> Self {
        Self {
            kind: Self::ESCALATION_FORM.to_string(),
        }
    }

    pub fn product_list() -> Self {
        Self {
            kind: Self::PRODUCT_LIST.to_string(),
        }
    }
}

/// Response of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<UiDirective>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<ProductMatch>,
}

impl ChatResponse {
    pub fn text(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            ui: None,
            products: Vec::new(),
        }
    }
}

/// Body of `POST /api/contact`, submitted by the escalation form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}
