//! Policy FAQ lookup.
//!
//! The FAQ is a single markdown document whose `## ` headings delimit
//! sections. A section's text runs from the end of its heading to the next
//! `\n## ` marker (or end of document) and is returned trimmed.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// FAQ sections the assistant can answer from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaqSection {
    Shipping,
    Returns,
    Care,
}

impl FaqSection {
    pub const ALL: [FaqSection; 3] = [FaqSection::Shipping, FaqSection::Returns, FaqSection::Care];

    /// The exact heading line marking this section in the document.
    pub fn heading(&self) -> &'static str {
        match self {
            FaqSection::Shipping => "## Shipping",
            FaqSection::Returns => "## Returns & Refunds",
            FaqSection::Care => "## Washing & Care",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FaqSection::Shipping => "shipping",
            FaqSection::Returns => "returns",
            FaqSection::Care => "care",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "shipping" => Some(FaqSection::Shipping),
            "returns" | "refunds" => Some(FaqSection::Returns),
            "care" | "washing" => Some(FaqSection::Care),
            _ => None,
        }
    }
}

impl fmt::Display for FaqSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The FAQ document, read once and never modified.
#[derive(Debug, Clone, Default)]
pub struct FaqDocument {
    text: String,
}

impl FaqDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read FAQ file: {}", path.display()))?;
        info!(path = %path.display(), bytes = text.len(), "FAQ loaded");
        Ok(Self { text })
    }

    /// Like [`load`](Self::load), but a missing or unreadable file yields an
    /// empty document so every section degrades to empty text.
    pub fn load_or_empty(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!(error = %format!("{:#}", e), "FAQ unavailable; policy answers will be empty");
            Self::default()
        })
    }

    /// Text of `section`, without its heading, trimmed. Empty when the
    /// heading does not occur.
    pub fn section(&self, section: FaqSection) -> String {
        let heading = section.heading();
        let Some(start) = self.text.find(heading) else {
            return String::new();
        };
        let body_start = start + heading.len();
        let rest = &self.text[body_start..];
        let body = match rest.find("\n## ") {
            Some(end) => &rest[..end],
            None => rest,
        };
        body.trim().to_string()
    }

    pub fn has_section(&self, section: FaqSection) -> bool {
        self.text.contains(section.heading())
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}
