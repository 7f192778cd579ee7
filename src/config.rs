//! TOML configuration.
//!
//! Every section except `[data]` is optional and falls back to production
//! defaults. Relative paths are resolved against the working directory.
//! See `config/forestal.example.toml` for a complete file.

use anyhow::{Context, Result};
use forestal_core::jsonld::Site;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    pub data: DataConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub shop: ShopConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub contact: ContactConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    #[serde(default = "default_site_url")]
    pub url: String,
    #[serde(default = "default_site_name")]
    pub name: String,
    #[serde(default = "default_country")]
    pub country_of_origin: String,
    #[serde(default = "default_price_valid_until")]
    pub price_valid_until: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: default_site_url(),
            name: default_site_name(),
            country_of_origin: default_country(),
            price_valid_until: default_price_valid_until(),
        }
    }
}

impl SiteConfig {
    pub fn to_site(&self) -> Site {
        Site {
            url: self.url.trim_end_matches('/').to_string(),
            name: self.name.clone(),
            country_of_origin: self.country_of_origin.clone(),
            price_valid_until: self.price_valid_until.clone(),
        }
    }
}

fn default_site_url() -> String {
    "https://forestal-mt.com".to_string()
}
fn default_site_name() -> String {
    "Forestal MT".to_string()
}
fn default_country() -> String {
    "Honduras".to_string()
}
fn default_price_valid_until() -> String {
    "2026-12-31".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// `products.json`, shaped `{"products": [...]}`.
    pub products: PathBuf,
    /// Directory holding the JSON-LD fixture files.
    pub fixtures_dir: PathBuf,
    /// Directory of page manifests.
    pub pages_dir: PathBuf,
    #[serde(default = "default_page_glob")]
    pub page_glob: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_page_glob() -> String {
    "**/*.toml".to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./dist")
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
        }
    }
}

fn default_max_results() -> usize {
    forestal_core::search::DEFAULT_MAX_RESULTS
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShopConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    forestal_core::catalog::PAGE_SIZE
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8787".to_string()
}
fn default_allowed_origins() -> Vec<String> {
    vec![
        "https://forestal-mt.com".to_string(),
        "http://localhost:4321".to_string(),
    ]
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContactConfig {
    /// Transactional mail endpoint (Resend-compatible `POST /emails`).
    #[serde(default = "default_mail_api_url")]
    pub api_url: String,
    /// Environment variable holding the mail API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Environment variable holding the Turnstile secret. Bot verification
    /// is skipped when unset.
    #[serde(default)]
    pub turnstile_secret_env: Option<String>,
    #[serde(default = "default_turnstile_url")]
    pub turnstile_url: String,
    #[serde(default = "default_contact_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_sales")]
    pub sales: String,
    #[serde(default = "default_support")]
    pub support: String,
    #[serde(default = "default_admin")]
    pub admin: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            api_url: default_mail_api_url(),
            api_key_env: default_api_key_env(),
            turnstile_secret_env: None,
            turnstile_url: default_turnstile_url(),
            timeout_secs: default_contact_timeout(),
            sales: default_sales(),
            support: default_support(),
            admin: default_admin(),
        }
    }
}

fn default_mail_api_url() -> String {
    "https://api.resend.com/emails".to_string()
}
fn default_api_key_env() -> String {
    "RESEND_API_KEY".to_string()
}
fn default_turnstile_url() -> String {
    "https://challenges.cloudflare.com/turnstile/v0/siteverify".to_string()
}
fn default_contact_timeout() -> u64 {
    10
}
fn default_sales() -> String {
    "sales@forestal-mt.com".to_string()
}
fn default_support() -> String {
    "support@forestal-mt.com".to_string()
}
fn default_admin() -> String {
    "admin@forestal-mt.com".to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    let url = &config.site.url;
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        anyhow::bail!("site.url must be an http(s) URL, got '{}'", url);
    }
    if chrono::NaiveDate::parse_from_str(&config.site.price_valid_until, "%Y-%m-%d").is_err() {
        anyhow::bail!(
            "site.price_valid_until must be a YYYY-MM-DD date, got '{}'",
            config.site.price_valid_until
        );
    }

    if config.search.max_results == 0 {
        anyhow::bail!("search.max_results must be >= 1");
    }
    if config.shop.page_size == 0 {
        anyhow::bail!("shop.page_size must be >= 1");
    }

    if globset::Glob::new(&config.data.page_glob).is_err() {
        anyhow::bail!("data.page_glob is not a valid glob: '{}'", config.data.page_glob);
    }

    if config.contact.timeout_secs == 0 {
        anyhow::bail!("contact.timeout_secs must be > 0");
    }
    for (key, mailbox) in [
        ("sales", &config.contact.sales),
        ("support", &config.contact.support),
        ("admin", &config.contact.admin),
    ] {
        if !mailbox.contains('@') {
            anyhow::bail!("contact.{} must be an email address, got '{}'", key, mailbox);
        }
    }

    Ok(())
}
