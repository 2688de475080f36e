use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub router: RouterConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
    /// Host used to build product links: `https://<domain>/en-eu/products/<handle>`.
    #[serde(default = "default_storefront_domain")]
    pub storefront_domain: String,
}

fn default_storefront_domain() -> String {
    "littlellama.example".to_string()
}

const DEFAULT_FAQ_PATH: &str = "./content/policy-faq.md";

#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    /// Set only when the file names it. An explicit path must exist for
    /// `serve`; the default path may be missing.
    #[serde(default)]
    pub faq_path: Option<PathBuf>,
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            faq_path: None,
            catalog_path: default_catalog_path(),
        }
    }
}

impl ContentConfig {
    /// The FAQ path in effect, explicit or default.
    pub fn faq_path(&self) -> &Path {
        self.faq_path
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_FAQ_PATH))
    }
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("./content/products.json")
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_limit() -> usize {
    5
}
fn default_max_limit() -> usize {
    10
}

/// Optional per-intent keyword overrides. Unset lists fall back to the
/// built-in vocabulary; the order intents are checked in never changes.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RouterConfig {
    pub escalation: Option<Vec<String>>,
    pub shipping: Option<Vec<String>>,
    pub returns: Option<Vec<String>>,
    pub care: Option<Vec<String>>,
    pub product: Option<Vec<String>>,
}

impl Config {
    /// Defaults used when no config file is present (`ask`, `chat --local`, ...).
    pub fn minimal() -> Self {
        Self {
            server: ServerConfig {
                bind: "127.0.0.1:8787".to_string(),
                storefront_domain: default_storefront_domain(),
            },
            content: ContentConfig::default(),
            search: SearchConfig::default(),
            router: RouterConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;

    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    if config.server.storefront_domain.trim().is_empty() {
        anyhow::bail!("server.storefront_domain must not be empty");
    }

    if config.search.max_limit == 0 {
        anyhow::bail!("search.max_limit must be >= 1");
    }

    if config.search.default_limit == 0 || config.search.default_limit > config.search.max_limit {
        anyhow::bail!(
            "search.default_limit must be in [1, {}]",
            config.search.max_limit
        );
    }

    let overrides = [
        ("escalation", &config.router.escalation),
        ("shipping", &config.router.shipping),
        ("returns", &config.router.returns),
        ("care", &config.router.care),
        ("product", &config.router.product),
    ];
    for (name, list) in overrides {
        if let Some(keywords) = list {
            if keywords.iter().any(|k| k.trim().is_empty()) {
                anyhow::bail!("router.{} must not contain empty keywords", name);
            }
        }
    }

    Ok(())
}
