//! `sitemap.xml` and `robots.txt` for the built site.
//!
//! The sitemap lists the home page, each section index and every indexable
//! content page. `lastmod` is the record's last modification time; home and
//! section entries take the newest time among the pages beneath them.

use crate::schema::SiteContext;
use crate::types::ContentType;
use chrono::{DateTime, SecondsFormat, Utc};
use maud::{PreEscaped, html};

pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
pub const SITEMAP_FILE: &str = "sitemap.xml";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: Option<DateTime<Utc>>,
}

impl SitemapEntry {
    pub fn new(loc: impl Into<String>, lastmod: Option<DateTime<Utc>>) -> Self {
        Self {
            loc: loc.into(),
            lastmod,
        }
    }
}

/// Home, then each section followed by its pages sorted by URL.
pub fn site_entries(
    site: &SiteContext,
    pages: impl IntoIterator<Item = (ContentType, SitemapEntry)>,
) -> Vec<SitemapEntry> {
    let mut by_section: Vec<(ContentType, Vec<SitemapEntry>)> =
        ContentType::ALL.iter().map(|ct| (*ct, Vec::new())).collect();
    for (content_type, entry) in pages {
        if let Some((_, list)) = by_section.iter_mut().find(|(ct, _)| *ct == content_type) {
            list.push(entry);
        }
    }

    let newest = |entries: &[SitemapEntry]| entries.iter().filter_map(|e| e.lastmod).max();
    let home_lastmod = by_section.iter().filter_map(|(_, list)| newest(list.as_slice())).max();

    let mut out = vec![SitemapEntry::new(format!("{}/", site.base_url), home_lastmod)];
    for (content_type, mut list) in by_section {
        list.sort_by(|a, b| a.loc.cmp(&b.loc));
        out.push(SitemapEntry::new(site.section_url(content_type), newest(list.as_slice())));
        out.extend(list);
    }
    out
}

pub fn render_sitemap(entries: &[SitemapEntry]) -> String {
    html! {
        (PreEscaped(XML_DECLARATION))
        urlset xmlns=(SITEMAP_NS) {
            @for entry in entries {
                url {
                    loc { (entry.loc) }
                    @if let Some(lastmod) = entry.lastmod {
                        lastmod { (lastmod.to_rfc3339_opts(SecondsFormat::Secs, true)) }
                    }
                }
            }
        }
    }
    .into_string()
}

pub fn render_robots(site: &SiteContext) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}/{SITEMAP_FILE}\n",
        site.base_url
    )
}
