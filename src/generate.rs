//! HTML site generation.
//!
//! Renders every content record to a static page carrying its JSON-LD set,
//! plus section listings, a home page, `sitemap.xml` and `robots.txt`.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                      # Home: links to both sections
//! ├── blogovi/
//! │   ├── index.html                  # Blog listing, newest first
//! │   └── kako-odabrati-cetkicu/
//! │       └── index.html              # Post page
//! ├── recnik/
//! │   ├── index.html                  # Glossary listing, A–Z
//! │   └── plomba/
//! │       └── index.html              # Term page
//! ├── sitemap.xml
//! └── robots.txt
//! ```
//!
//! ## Per-page Flow
//!
//! 1. FAQ entries: the record's own, or generated ones when `faq.auto_generate`
//!    is on and the record has none.
//! 2. Build the four-object set. A record the builder rejects still gets a
//!    minimal title/description page; a record without a usable slug is skipped.
//! 3. Render the visible body, then validate the set against it.
//! 4. Embed the JSON-LD unless the validation mode suppresses it.
//!
//! Pages render in parallel on the rayon pool; each render owns its data.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Interpolated text is escaped; the JSON-LD payload and the markdown body
//! are inserted pre-escaped.

use crate::config::{ConfigError, SiteConfig};
use crate::content::{ContentError, ContentRecord};
use crate::faq::FaqGenerator;
use crate::schema::{self, SET_LEN, SchemaBuilder, SchemaError, SiteContext, StructuredData};
use crate::sitemap::{self, SitemapEntry};
use crate::text;
use crate::types::ContentType;
use crate::validate::{self, Emission, ValidationMode, ValidationReport};
use chrono::{DateTime, Utc};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rayon::prelude::*;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

const CSS: &str = include_str!("../static/style.css");
const FAQ_HEADING: &str = "Česta pitanja";
const INDEX_FILE: &str = "index.html";
const ROBOTS_FILE: &str = "robots.txt";

// ============================================================================
// Page results
// ============================================================================

/// What happened to one record.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// Full page. `emission` says whether the JSON-LD was embedded.
    Rendered {
        report: ValidationReport,
        emission: Emission,
    },
    /// The builder rejected the record; a minimal page was written.
    Minimal(SchemaError),
    /// No usable slug, so no URL; nothing was written.
    Skipped(SchemaError),
}

/// Summary of one rendered record, without its HTML.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSummary {
    pub content_type: ContentType,
    pub slug: String,
    pub title: String,
    /// Canonical URL; empty when skipped.
    pub url: String,
    pub noindex: bool,
    pub last_modified: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub summary: String,
    pub outcome: PageOutcome,
}

impl PageSummary {
    fn of(record: &ContentRecord, url: String, outcome: PageOutcome) -> Self {
        Self {
            content_type: record.content_type(),
            slug: record.slug().to_string(),
            title: record.title().to_string(),
            url,
            noindex: record.noindex(),
            last_modified: record.last_modified(),
            published_at: record.published_at(),
            summary: schema::describe(record),
            outcome,
        }
    }

    /// Whether the page exists in the output.
    pub fn is_written(&self) -> bool {
        !matches!(self.outcome, PageOutcome::Skipped(_))
    }

    /// Structural failures and builder errors. Sync warnings don't count.
    pub fn has_errors(&self) -> bool {
        match &self.outcome {
            PageOutcome::Rendered { report, .. } => report.structure.is_err(),
            PageOutcome::Minimal(_) | PageOutcome::Skipped(_) => true,
        }
    }

    pub fn warning_count(&self) -> usize {
        match &self.outcome {
            PageOutcome::Rendered { report, .. } => report.warnings.len(),
            _ => 0,
        }
    }

    /// Path of the page relative to the output root.
    pub fn relative_path(&self) -> PathBuf {
        Path::new(self.content_type.path_segment())
            .join(&self.slug)
            .join(INDEX_FILE)
    }
}

/// A summary plus the page HTML (absent when skipped).
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub page: PageSummary,
    pub html: Option<String>,
}

// ============================================================================
// Renderer
// ============================================================================

/// Renders content records for one site configuration.
#[derive(Debug, Clone)]
pub struct Renderer {
    builder: SchemaBuilder,
    mode: ValidationMode,
    faq: Option<FaqGenerator>,
}

impl Renderer {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            builder: SchemaBuilder::new(SiteContext::from_settings(&config.site)),
            mode: config.validation.mode,
            faq: config
                .faq
                .auto_generate
                .then(|| FaqGenerator::new(&config.faq)),
        }
    }

    pub fn site(&self) -> &SiteContext {
        self.builder.site()
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// The record as it will be rendered. Explicit FAQs always win; generated
    /// ones fill in only for records that have none.
    pub fn prepare<'a>(&self, record: &'a ContentRecord) -> Cow<'a, ContentRecord> {
        match &self.faq {
            Some(generator) if record.faqs().is_empty() => {
                let faqs = generator.generate(record.title(), record.body());
                Cow::Owned(record.clone().with_faqs(faqs))
            }
            _ => Cow::Borrowed(record),
        }
    }

    /// The set a record's page carries.
    pub fn structured_data(
        &self,
        record: &ContentRecord,
    ) -> Result<[StructuredData; SET_LEN], SchemaError> {
        self.builder.build(&self.prepare(record))
    }

    /// Render one record to HTML.
    pub fn render(&self, record: &ContentRecord) -> Result<RenderedPage, GenerateError> {
        let record = self.prepare(record);
        let site = self.site();
        let content_type = record.content_type();

        if let Err(error) = schema::check_slug(&record) {
            tracing::warn!(id = record.id(), %content_type, "skipping record: {error}");
            return Ok(RenderedPage {
                page: PageSummary::of(&record, String::new(), PageOutcome::Skipped(error)),
                html: None,
            });
        }
        let url = site.page_url(content_type, record.slug());

        let set = match self.builder.build(&record) {
            Ok(set) => set,
            Err(error) => {
                tracing::warn!(page = %url, "rendering minimal page: {error}");
                let page = PageSummary::of(&record, url, PageOutcome::Minimal(error));
                let html = render_minimal_page(site, &page).into_string();
                return Ok(RenderedPage {
                    page,
                    html: Some(html),
                });
            }
        };

        let main = render_content(site, &record);
        let visible = text::visible_text(&main.0);
        let report = validate::validate_page(&set, &visible);
        report.log(&url);

        let emission = validate::decide_emission(self.mode, &report.structure);
        let page = PageSummary::of(&record, url, PageOutcome::Rendered { report, emission });
        let json_ld = match emission {
            Emission::Emit => Some(schema::to_json_ld(&set)?),
            Emission::Suppress => None,
        };
        let head = PageHead {
            title: &page.title,
            description: &page.summary,
            url: &page.url,
            image: Some(site.cover_url(&record)),
            noindex: page.noindex,
            json_ld,
        };
        let breadcrumb = breadcrumb(site, &[
            (site.section_url(content_type), content_type.section_label()),
            (page.url.clone(), page.title.as_str()),
        ]);
        let html = base_document(site, &head, breadcrumb, main).into_string();

        tracing::debug!(page = %page.url, ?emission, "rendered page");
        Ok(RenderedPage {
            page,
            html: Some(html),
        })
    }
}

// ============================================================================
// Build
// ============================================================================

/// Result of a full site build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub output_dir: PathBuf,
    pub pages: Vec<PageSummary>,
    pub sitemap_urls: usize,
}

impl BuildReport {
    pub fn written(&self) -> usize {
        self.pages.iter().filter(|p| p.is_written()).count()
    }
}

/// Render every record and write the site into `output_dir`.
pub fn build_site(
    records: &[ContentRecord],
    config: &SiteConfig,
    output_dir: &Path,
) -> Result<BuildReport, GenerateError> {
    let renderer = Renderer::new(config);
    fs::create_dir_all(output_dir)?;

    let pages = records
        .par_iter()
        .map(|record| -> Result<PageSummary, GenerateError> {
            let rendered = renderer.render(record)?;
            if let Some(html) = &rendered.html {
                let path = output_dir.join(rendered.page.relative_path());
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&path, html)?;
            }
            Ok(rendered.page)
        })
        .collect::<Result<Vec<_>, GenerateError>>()?;

    let site = renderer.site();
    for content_type in ContentType::ALL {
        let dir = output_dir.join(content_type.path_segment());
        fs::create_dir_all(&dir)?;
        let listing = render_section_page(site, content_type, &pages);
        fs::write(dir.join(INDEX_FILE), listing.into_string())?;
    }
    fs::write(
        output_dir.join(INDEX_FILE),
        render_home_page(site, &pages).into_string(),
    )?;

    let entries = sitemap::site_entries(
        site,
        pages
            .iter()
            .filter(|p| p.is_written() && !p.noindex)
            .map(|p| {
                (
                    p.content_type,
                    SitemapEntry::new(p.url.clone(), p.last_modified),
                )
            }),
    );
    fs::write(
        output_dir.join(sitemap::SITEMAP_FILE),
        sitemap::render_sitemap(&entries),
    )?;
    fs::write(output_dir.join(ROBOTS_FILE), sitemap::render_robots(site))?;

    tracing::info!(
        pages = pages.len(),
        output = %output_dir.display(),
        "site generated"
    );
    Ok(BuildReport {
        output_dir: output_dir.to_path_buf(),
        sitemap_urls: entries.len(),
        pages,
    })
}

/// Render and validate every record without writing anything.
pub fn check_records(
    records: &[ContentRecord],
    config: &SiteConfig,
) -> Result<Vec<PageSummary>, GenerateError> {
    let renderer = Renderer::new(config);
    records
        .par_iter()
        .map(|record| renderer.render(record).map(|r| r.page))
        .collect()
}

// ============================================================================
// HTML Components
// ============================================================================

/// Head metadata for one page.
struct PageHead<'a> {
    title: &'a str,
    description: &'a str,
    url: &'a str,
    image: Option<String>,
    noindex: bool,
    json_ld: Option<String>,
}

/// Renders the base HTML document structure
fn base_document(
    site: &SiteContext,
    head: &PageHead<'_>,
    breadcrumb: Markup,
    content: Markup,
) -> Markup {
    let full_title = if head.title.is_empty() || head.title == site.site_name {
        site.site_name.clone()
    } else {
        format!("{} | {}", head.title, site.site_name)
    };
    html! {
        (DOCTYPE)
        html lang=(site.language) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (full_title) }
                meta name="description" content=(head.description);
                link rel="canonical" href=(head.url);
                @if head.noindex {
                    meta name="robots" content="noindex, nofollow";
                }
                meta property="og:title" content=(head.title);
                meta property="og:description" content=(head.description);
                meta property="og:url" content=(head.url);
                @if let Some(image) = &head.image {
                    meta property="og:image" content=(image);
                }
                style { (PreEscaped(CSS)) }
                @if let Some(json) = &head.json_ld {
                    script type="application/ld+json" { (PreEscaped(json)) }
                }
            }
            body {
                header.site-header {
                    nav.breadcrumb aria-label="breadcrumb" { (breadcrumb) }
                }
                (content)
            }
        }
    }
}

/// Home link followed by `(url, label)` pairs; the last one is the current page.
fn breadcrumb(site: &SiteContext, trail: &[(String, &str)]) -> Markup {
    html! {
        ol {
            li { a href={ (site.base_url) "/" } { (site.home_label) } }
            @for (i, (url, label)) in trail.iter().enumerate() {
                @if i + 1 == trail.len() {
                    li aria-current="page" { (label) }
                } @else {
                    li { a href=(url) { (label) } }
                }
            }
        }
    }
}

/// Visible FAQ list. Mirrors the FAQPage entries one for one.
fn faq_section(record: &ContentRecord) -> Markup {
    html! {
        @if !record.faqs().is_empty() {
            section.faq {
                h2 { (FAQ_HEADING) }
                @for faq in record.faqs() {
                    details open {
                        summary { (faq.question.trim()) }
                        p { (faq.answer.trim()) }
                    }
                }
            }
        }
    }
}

fn format_date(date: DateTime<Utc>) -> String {
    date.format("%d.%m.%Y.").to_string()
}

// ============================================================================
// Page Renderers
// ============================================================================

/// The visible `<main>` of a content page.
fn render_content(site: &SiteContext, record: &ContentRecord) -> Markup {
    let body_html = text::markdown_to_html(record.body());
    let cover = record
        .cover_image()
        .and_then(|c| c.resolve(&site.base_url, &site.image_cdn).map(|url| (url, c.alt())));

    html! {
        main.content-page {
            article {
                h1 { (record.title()) }
                @if let Some(published) = record.published_at() {
                    p.meta {
                        time datetime=(published.to_rfc3339()) { (format_date(published)) }
                        @if let Some(author) = record.author() {
                            " · " (author.name)
                        }
                    }
                }
                @if let Some((url, alt)) = &cover {
                    img.cover src=(url) alt=(alt.unwrap_or(record.title())) loading="lazy";
                }
                @if record.content_type() == ContentType::Glossary
                    && !record.summary().is_empty()
                    && record.body() != record.summary()
                {
                    p.definition { strong { (record.summary()) } }
                }
                div.body { (PreEscaped(body_html)) }
                @if !record.tags().is_empty() {
                    ul.tags {
                        @for tag in record.tags() {
                            li { (tag.title) }
                        }
                    }
                }
            }
            (faq_section(record))
        }
    }
}

/// Title and description only, for records the builder rejects.
fn render_minimal_page(site: &SiteContext, page: &PageSummary) -> Markup {
    let title = if page.title.is_empty() {
        page.slug.as_str()
    } else {
        page.title.as_str()
    };
    let head = PageHead {
        title,
        description: &page.summary,
        url: &page.url,
        image: None,
        noindex: page.noindex,
        json_ld: None,
    };
    let crumbs = breadcrumb(site, &[
        (site.section_url(page.content_type), page.content_type.section_label()),
        (page.url.clone(), title),
    ]);
    let content = html! {
        main.content-page {
            h1 { (title) }
            @if !page.summary.is_empty() && page.summary != title {
                p { (page.summary) }
            }
        }
    };
    base_document(site, &head, crumbs, content)
}

/// Section listing: blog newest first, glossary alphabetical.
fn render_section_page(
    site: &SiteContext,
    content_type: ContentType,
    pages: &[PageSummary],
) -> Markup {
    let mut listed: Vec<&PageSummary> = pages
        .iter()
        .filter(|p| p.content_type == content_type && p.is_written() && !p.noindex)
        .collect();
    match content_type {
        ContentType::Blog => listed.sort_by(|a, b| b.published_at.cmp(&a.published_at)),
        ContentType::Glossary => listed.sort_by_key(|p| p.title.to_lowercase()),
    }

    let url = site.section_url(content_type);
    let label = content_type.section_label();
    let head = PageHead {
        title: label,
        description: label,
        url: &url,
        image: None,
        noindex: false,
        json_ld: None,
    };
    let crumbs = breadcrumb(site, &[(url.clone(), label)]);
    let content = html! {
        main.section-page {
            h1 { (label) }
            ul.listing {
                @for page in &listed {
                    li {
                        a href=(page.url) { (page.title) }
                        @if !page.summary.is_empty() && page.summary != page.title {
                            p { (page.summary) }
                        }
                    }
                }
            }
        }
    };
    base_document(site, &head, crumbs, content)
}

/// Home page linking both sections.
fn render_home_page(site: &SiteContext, pages: &[PageSummary]) -> Markup {
    let url = format!("{}/", site.base_url);
    let head = PageHead {
        title: &site.site_name,
        description: &site.site_name,
        url: &url,
        image: Some(site.default_image.clone()),
        noindex: false,
        json_ld: None,
    };
    let content = html! {
        main.index-page {
            h1 { (site.site_name) }
            ul.listing {
                @for content_type in ContentType::ALL {
                    @let count = pages
                        .iter()
                        .filter(|p| p.content_type == content_type && p.is_written() && !p.noindex)
                        .count();
                    li {
                        a href=(site.section_url(content_type)) { (content_type.section_label()) }
                        " (" (count) ")"
                    }
                }
            }
        }
    };
    base_document(site, &head, breadcrumb(site, &[]), content)
}
