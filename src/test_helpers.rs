//! Shared test utilities for the odontoa-seo test suite.
//!
//! Provides canned records, a site context built from stock settings, and
//! fixture setup for tests that need a content tree on disk.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let set = SchemaBuilder::new(test_site()).build(&plomba()).unwrap();
//! assert_eq!(set[3].as_faq_page().unwrap().main_entity.len(), 1);
//!
//! let tmp = setup_fixtures();
//! let records = load_records(tmp.path()).unwrap();
//! find(&records, ContentType::Glossary, "plomba");
//! ```

use chrono::{DateTime, Utc};
use std::path::Path;
use tempfile::TempDir;

use crate::config::SiteSettings;
use crate::content::{BlogPost, ContentRecord, GlossaryTerm};
use crate::schema::SiteContext;
use crate::types::{AssetRef, ContentType, CoverImage, Faq, Tag};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Canned records
// =========================================================================

/// Parse an RFC 3339 timestamp. Panics on malformed input.
pub fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .unwrap_or_else(|e| panic!("bad timestamp {s:?}: {e}"))
        .with_timezone(&Utc)
}

/// Site context from stock settings (`https://odontoa.com`, `sr`).
pub fn test_site() -> SiteContext {
    SiteContext::from_settings(&SiteSettings::default())
}

/// The "Plomba" glossary term: one FAQ, no update, no author, no cover.
pub fn plomba() -> ContentRecord {
    ContentRecord::Glossary(GlossaryTerm {
        id: "term-plomba".to_string(),
        slug: "plomba".to_string(),
        term: "Plomba".to_string(),
        definition: "Plomba je ispuna kojom se nadoknađuje oštećeni deo zuba.".to_string(),
        published_at: Some(ts("2024-01-10T00:00:00Z")),
        faqs: vec![Faq::new("Šta je plomba?", "Plomba je...")],
        ..GlossaryTerm::default()
    })
}

/// A blog post with distinct update date, two tags and a CMS cover asset.
pub fn blog_post() -> ContentRecord {
    ContentRecord::Blog(BlogPost {
        id: "post-cetkica".to_string(),
        slug: "kako-odabrati-cetkicu".to_string(),
        title: "Kako odabrati četkicu za zube".to_string(),
        excerpt: "Mekana ili tvrda vlakna, ručna ili električna: vodič za izbor.".to_string(),
        content: "## Mekana ili tvrda?\n\nZa većinu ljudi mekana vlakna su najbolji izbor.\n"
            .to_string(),
        published_at: Some(ts("2024-03-01T09:00:00Z")),
        updated_at: Some(ts("2024-03-05T12:30:00Z")),
        tags: vec![
            Tag {
                title: "Higijena".to_string(),
                slug: "higijena".to_string(),
            },
            Tag {
                title: "Prevencija".to_string(),
                slug: "prevencija".to_string(),
            },
        ],
        faqs: vec![Faq::new(
            "Koliko često menjati četkicu?",
            "Četkicu treba menjati na svaka tri meseca.",
        )],
        cover_image: Some(CoverImage::Asset {
            asset: AssetRef {
                reference: "image-abc123-1600x900-jpg".to_string(),
            },
            alt: Some("Četkice za zube".to_string()),
        }),
        ..BlogPost::default()
    })
}

// =========================================================================
// Lookups: panics with a clear message on miss
// =========================================================================

/// Find a record by type and slug. Panics if not found.
pub fn find<'a>(records: &'a [ContentRecord], content_type: ContentType, slug: &str) -> &'a ContentRecord {
    crate::content::find_record(records, content_type, slug).unwrap_or_else(|| {
        let slugs: Vec<String> = records
            .iter()
            .map(|r| format!("{}/{}", r.content_type(), r.slug()))
            .collect();
        panic!("{content_type} '{slug}' not found. Available: {slugs:?}")
    })
}
