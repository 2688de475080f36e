use anyhow::Result;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::faq::{FaqDocument, FaqSection};

/// `sbot check`: reports whether the FAQ sections and the catalog the
/// assistant answers from can be loaded. Problems are reported, not raised.
pub fn check_content(config: &Config) -> Result<()> {
    println!("{:<24} {:<40} HEALTHY", "CONTENT", "STATUS");

    match FaqDocument::load(config.content.faq_path()) {
        Ok(faq) => {
            for section in FaqSection::ALL {
                let (status, healthy) = if !faq.has_section(section) {
                    ("MISSING HEADING".to_string(), false)
                } else if faq.section(section).is_empty() {
                    ("EMPTY".to_string(), false)
                } else {
                    ("OK".to_string(), true)
                };
                println!("{:<24} {:<40} {}", format!("faq:{}", section), status, healthy);
            }
        }
        Err(e) => {
            println!("{:<24} {:<40} {}", "faq", format!("NOT AVAILABLE ({:#})", e), false);
        }
    }

    match Catalog::load(&config.content.catalog_path) {
        Ok(catalog) => {
            let status = format!("OK ({} products)", catalog.len());
            println!("{:<24} {:<40} {}", "catalog", status, !catalog.is_empty());
        }
        Err(e) => {
            println!("{:<24} {:<40} {}", "catalog", format!("UNAVAILABLE ({})", e), false);
        }
    }

    Ok(())
}
