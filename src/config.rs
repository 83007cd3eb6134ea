//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by the user's `config.toml` in the content root; the user file
//! only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! base_url = "https://odontoa.com"   # Absolute origin, no trailing path
//! name = "Odontoa"                   # Publisher organization name
//! language = "sr"                    # WebPage.inLanguage
//! home_label = "Početna"             # First breadcrumb entry
//! default_image = "/images/og-default.jpg"
//! logo = "/images/logo.png"
//! image_cdn = "https://cdn.sanity.io/images/odontoa/production"
//!
//! [validation]
//! mode = "advisory"                  # "advisory" (fail open) or "blocking" (fail closed)
//!
//! [faq]
//! auto_generate = false              # Derive FAQs from body text when a record has none
//! max_entries = 10
//! answer_window = 300
//! intro_window = 200
//!
//! [processing]
//! max_processes = 4                  # Max parallel render workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! The loaded [`SiteConfig`] is constructed once in `main` and handed down
//! explicitly. Nothing in the library reads the environment or keeps a
//! global copy.

use crate::faq::{MAX_ENTRIES, MIN_ENTRIES};
use crate::validate::ValidationMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity and URL settings used by the structured-data builder.
    pub site: SiteSettings,
    /// How structural validation failures affect emission.
    pub validation: ValidationConfig,
    /// FAQ auto-generation settings.
    pub faq: FaqConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = &self.site.base_url;
        if !(base.starts_with("https://") || base.starts_with("http://")) {
            return Err(ConfigError::Validation(format!(
                "site.base_url must be an absolute http(s) URL, got {base:?}"
            )));
        }
        if base.contains('?') || base.contains('#') {
            return Err(ConfigError::Validation(
                "site.base_url must not carry a query or fragment".into(),
            ));
        }
        if self.site.language.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.language must not be empty".into(),
            ));
        }
        if !(MIN_ENTRIES..=MAX_ENTRIES).contains(&self.faq.max_entries) {
            return Err(ConfigError::Validation(format!(
                "faq.max_entries must be {MIN_ENTRIES}-{MAX_ENTRIES}"
            )));
        }
        if self.faq.answer_window == 0 || self.faq.intro_window == 0 {
            return Err(ConfigError::Validation(
                "faq.answer_window and faq.intro_window must be non-zero".into(),
            ));
        }
        let templates = [
            ("faq.intro_question", &self.faq.intro_question),
            ("faq.how_question", &self.faq.how_question),
            ("faq.safety_question", &self.faq.safety_question),
        ];
        for (key, template) in templates {
            if !template.contains("{title}") {
                return Err(ConfigError::Validation(format!(
                    "{key} must contain the {{title}} placeholder"
                )));
            }
        }
        Ok(())
    }
}

/// Site identity settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSettings {
    /// Absolute site origin, e.g. `https://odontoa.com`.
    pub base_url: String,
    /// Organization name used as publisher (and as author fallback).
    pub name: String,
    /// Language tag emitted as `WebPage.inLanguage` and `<html lang>`.
    pub language: String,
    /// Label of the first breadcrumb entry.
    pub home_label: String,
    /// Site-relative path of the placeholder social image.
    pub default_image: String,
    /// Site-relative path of the publisher logo.
    pub logo: String,
    /// Base URL that CMS image asset references resolve against.
    pub image_cdn: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            base_url: "https://odontoa.com".to_string(),
            name: "Odontoa".to_string(),
            language: "sr".to_string(),
            home_label: "Početna".to_string(),
            default_image: "/images/og-default.jpg".to_string(),
            logo: "/images/logo.png".to_string(),
            image_cdn: "https://cdn.sanity.io/images/odontoa/production".to_string(),
        }
    }
}

/// Structural validation behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    /// `advisory` logs and still emits; `blocking` suppresses malformed output.
    pub mode: ValidationMode,
}

/// FAQ auto-generation settings.
///
/// The question templates use `{title}` as a placeholder for the record
/// title or glossary term.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FaqConfig {
    /// Generate FAQs for records that carry none.
    pub auto_generate: bool,
    /// Upper bound on generated entries (at most 10).
    pub max_entries: usize,
    /// Characters after a question considered for its answer.
    pub answer_window: usize,
    /// Characters of body text used to answer the intro question.
    pub intro_window: usize,
    pub intro_question: String,
    pub how_question: String,
    pub how_answer: String,
    pub safety_question: String,
    pub safety_answer: String,
}

impl Default for FaqConfig {
    fn default() -> Self {
        Self {
            auto_generate: false,
            max_entries: 10,
            answer_window: 300,
            intro_window: 200,
            intro_question: "Šta je {title}?".to_string(),
            how_question: "Kako funkcioniše {title}?".to_string(),
            how_answer: "Vaš stomatolog će vam objasniti ceo postupak tokom pregleda i \
                         prilagoditi ga vašim potrebama."
                .to_string(),
            safety_question: "Da li je {title} bezbedan postupak?".to_string(),
            safety_answer: "Kada ga sprovodi stručno osoblje uz savremenu opremu, postupak \
                            se smatra bezbednim. Za lične savete obratite se svom stomatologu."
                .to_string(),
        }
    }
}

/// Parallel rendering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, never less than one
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Odontoa SEO Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
# Absolute origin every structured-data URL is built from.
base_url = "https://odontoa.com"

# Organization name, emitted as the publisher of every article.
name = "Odontoa"

# Language tag for WebPage.inLanguage and <html lang>.
language = "sr"

# Label of the first breadcrumb entry.
home_label = "Početna"

# Placeholder image (site-relative, 1200x630) used when a record has no
# cover image.
default_image = "/images/og-default.jpg"

# Publisher logo (site-relative).
logo = "/images/logo.png"

# CMS image CDN that asset references ("image-<id>-<w>x<h>-<ext>") resolve against.
image_cdn = "https://cdn.sanity.io/images/odontoa/production"

# ---------------------------------------------------------------------------
# Structured-data validation
# ---------------------------------------------------------------------------
[validation]
# "advisory": log structural problems and still emit the JSON-LD (production).
# "blocking": log and drop the malformed JSON-LD from the page (development).
mode = "advisory"

# ---------------------------------------------------------------------------
# FAQ auto-generation
# ---------------------------------------------------------------------------
[faq]
# Derive question/answer pairs from the body when a record has no FAQs.
auto_generate = false

# Maximum number of generated entries (3-10).
max_entries = 10

# Characters after a question considered for its answer.
answer_window = 300

# Characters of body text used to answer the introductory question.
intro_window = 200

# Question templates; {title} is replaced with the post title or term.
intro_question = "Šta je {title}?"
how_question = "Kako funkcioniše {title}?"
how_answer = "Vaš stomatolog će vam objasniti ceo postupak tokom pregleda i prilagoditi ga vašim potrebama."
safety_question = "Da li je {title} bezbedan postupak?"
safety_answer = "Kada ga sprovodi stručno osoblje uz savremenu opremu, postupak se smatra bezbednim. Za lične savete obratite se svom stomatologu."

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel page-rendering workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
