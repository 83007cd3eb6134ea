//! # Odontoa SEO
//!
//! Static pages for a dental clinic's blog and glossary (rečnik), each
//! carrying a validated set of schema.org structured data.
//!
//! # Architecture
//!
//! Content records come in as CMS exports, go through a pure builder, are
//! checked by a validator, and are rendered to static HTML:
//!
//! ```text
//! content/*.json ──load──▶ ContentRecord ──build──▶ [StructuredData; 4]
//!                                │                         │
//!                                └──render body──▶ visible text ──validate──▶ report
//!                                                                       │
//!                          dist/{segment}/{slug}/index.html ◀──emit or suppress
//! ```
//!
//! The builder and validator are pure functions with no I/O, so they are
//! tested directly against canned records. File loading, rendering and the
//! site build sit around them.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`content`] | Blog post and glossary term records, loaded from JSON exports |
//! | [`schema`] | Builds the fixed four-object JSON-LD set for a record |
//! | [`validate`] | Structural checks, FAQ/content sync checks, emission policy, HTML inspection |
//! | [`faq`] | Heuristic FAQ extraction for records without explicit FAQs |
//! | [`generate`] | Renders pages with Maud and writes the site in parallel |
//! | [`sitemap`] | `sitemap.xml` and `robots.txt` |
//! | [`config`] | `config.toml` loading, merging with stock defaults, validation |
//! | [`types`] | Shared value types: content type, author, tag, FAQ, cover image |
//! | [`text`] | Markdown/HTML to plain text, sentence splitting, slugs |
//! | [`output`] | CLI output formatting for build, check and inspect |
//!
//! # Design Decisions
//!
//! ## Fixed Four-Object Set
//!
//! Every content page emits `WebPage`, `BreadcrumbList`, `Article` or
//! `DefinedTerm`, and `FAQPage`, in that order, even when the FAQ list is
//! empty. [`schema::SchemaBuilder::build`] returns a `[StructuredData; 4]`;
//! [`validate::validate_json_ld`] applies the same contract to JSON read back
//! from rendered pages.
//!
//! ## Fail Open in Production
//!
//! Structural problems are always logged. In `advisory` mode the JSON-LD is
//! still emitted; in `blocking` mode (or with `--strict`) it is dropped from
//! the page. FAQ/content mismatches are warnings only and never block.
//!
//! ## Maud for HTML and XML
//!
//! Pages and the sitemap are generated with [Maud](https://maud.lambda.xyz/):
//! templates are checked at compile time and interpolation is escaped. The
//! JSON-LD payload is serialized with `</` escaped so it cannot end its
//! `<script>` element early.

pub mod config;
pub mod content;
pub mod faq;
pub mod generate;
pub mod output;
pub mod schema;
pub mod sitemap;
pub mod text;
pub mod types;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
