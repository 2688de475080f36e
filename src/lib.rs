//! # Storefront Bot
//!
//! A keyword-routed support assistant for a small online storefront.
//!
//! A chat widget posts free-text messages to the backend, which routes each
//! message to an intent by keyword and answers with a section of the policy
//! FAQ, an escalation form, or a ranked list of catalog products.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌──────────────────────┐
//! │ Chat widget  │──▶│ POST /api/chat │──▶│    IntentRouter      │
//! │ browser/term │   └───────────────┘   └──────────┬───────────┘
//! └──────────────┘                                  │
//!                       ┌───────────────────────────┼──────────────┐
//!                       ▼                           ▼              ▼
//!                 ┌───────────┐              ┌────────────┐  ┌───────────┐
//!                 │    FAQ    │              │  Product   │  │  canned   │
//!                 │ sections  │              │  scorer    │  │  replies  │
//!                 └───────────┘              └────────────┘  └───────────┘
//! ```
//!
//! FAQ text and the catalog are loaded from disk once at startup and shared
//! read-only by every request.
//!
//! ## Quick Start
//!
//! ```bash
//! sbot check                       # verify FAQ sections and catalog
//! sbot ask "when will my order ship"
//! sbot search "silk onesie"
//! sbot serve                       # HTTP API + widget on [server].bind
//! sbot chat                        # terminal chat against the server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Wire and catalog data types |
//! | [`intent`] | Keyword intent routing |
//! | [`faq`] | FAQ section extraction |
//! | [`catalog`] | Catalog export loading |
//! | [`search`] | Product scoring and ranking |
//! | [`assistant`] | Reply assembly |
//! | [`widget`] | Chat widget state machine |
//! | [`client`] | HTTP transport for the widget |
//! | [`server`] | HTTP server |

pub mod assistant;
pub mod catalog;
pub mod chat_cmd;
pub mod check;
pub mod client;
pub mod config;
pub mod faq;
pub mod intent;
pub mod models;
pub mod search;
pub mod server;
pub mod widget;
