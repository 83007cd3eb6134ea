//! Content records and the content-fetching boundary.
//!
//! Records arrive as JSON exports from the content backends: one document
//! (or an array of documents) per `.json` file under the content directory.
//!
//! ```text
//! content/
//! ├── config.toml              # Site config (optional)
//! ├── blog/                    # Blog posts
//! │   ├── kako-odabrati-cetkicu.json
//! │   └── ...
//! └── glossary/                # Glossary terms (rečnik)
//!     ├── plomba.json
//!     └── ...
//! ```
//!
//! The content type comes from an explicit `"_type"` field when present,
//! otherwise from the name of the directory holding the file. Each kind
//! deserializes into its own struct ([`BlogPost`], [`GlossaryTerm`]) and is
//! wrapped in [`ContentRecord`], so downstream code never inspects loose
//! JSON.
//!
//! Both camelCase (CMS) and snake_case (database) field names are accepted,
//! and `null` is treated like a missing field. `title`/`term` and `slug`
//! default to empty strings here; the schema builder is the single place
//! that rejects them when blank.

use crate::types::{Author, ContentType, CoverImage, Faq, SlugRepr, Tag};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Cannot tell content type of {path}: {kind:?} (expected blog or glossary)")]
    UnknownType { path: PathBuf, kind: String },
}

/// `null`-tolerant field: deserializes `null` as the type's default.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Slug field: bare string, `{ "current": ... }` object, or `null`.
fn slug_field<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<SlugRepr>::deserialize(deserializer)?
        .map(SlugRepr::into_string)
        .unwrap_or_default())
}

/// A blog post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(alias = "_id", deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "slug_field")]
    pub slug: String,
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub excerpt: String,
    /// Markdown body, possibly with embedded HTML from the rich-text editor.
    #[serde(alias = "body", deserialize_with = "nullable")]
    pub content: String,
    pub author: Option<Author>,
    #[serde(alias = "published_at")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(alias = "updated_at", alias = "_updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "nullable")]
    pub tags: Vec<Tag>,
    #[serde(deserialize_with = "nullable")]
    pub faqs: Vec<Faq>,
    #[serde(alias = "cover_image", alias = "mainImage", alias = "image_url")]
    pub cover_image: Option<CoverImage>,
    #[serde(deserialize_with = "nullable")]
    pub noindex: bool,
}

/// A glossary (rečnik) term.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlossaryTerm {
    #[serde(alias = "_id", deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "slug_field")]
    pub slug: String,
    #[serde(alias = "title", deserialize_with = "nullable")]
    pub term: String,
    #[serde(deserialize_with = "nullable")]
    pub definition: String,
    /// Long-form explanation; falls back to `definition` when empty.
    #[serde(alias = "full_article", alias = "content", deserialize_with = "nullable")]
    pub full_article: String,
    pub author: Option<Author>,
    #[serde(alias = "published_at", alias = "_createdAt")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(alias = "updated_at", alias = "_updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "nullable")]
    pub tags: Vec<Tag>,
    #[serde(deserialize_with = "nullable")]
    pub faqs: Vec<Faq>,
    #[serde(alias = "cover_image", alias = "image")]
    pub cover_image: Option<CoverImage>,
    #[serde(deserialize_with = "nullable")]
    pub noindex: bool,
}

/// A blog post or glossary term, as consumed by the structured-data core.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentRecord {
    Blog(BlogPost),
    Glossary(GlossaryTerm),
}

impl ContentRecord {
    pub fn content_type(&self) -> ContentType {
        match self {
            ContentRecord::Blog(_) => ContentType::Blog,
            ContentRecord::Glossary(_) => ContentType::Glossary,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ContentRecord::Blog(p) => &p.id,
            ContentRecord::Glossary(t) => &t.id,
        }
    }

    pub fn slug(&self) -> &str {
        match self {
            ContentRecord::Blog(p) => p.slug.trim(),
            ContentRecord::Glossary(t) => t.slug.trim(),
        }
    }

    /// Post title or glossary term.
    pub fn title(&self) -> &str {
        match self {
            ContentRecord::Blog(p) => p.title.trim(),
            ContentRecord::Glossary(t) => t.term.trim(),
        }
    }

    /// Excerpt or definition. May be empty.
    pub fn summary(&self) -> &str {
        match self {
            ContentRecord::Blog(p) => p.excerpt.trim(),
            ContentRecord::Glossary(t) => t.definition.trim(),
        }
    }

    /// Full body (markdown/HTML). Glossary terms without an article use the
    /// definition.
    pub fn body(&self) -> &str {
        match self {
            ContentRecord::Blog(p) => &p.content,
            ContentRecord::Glossary(t) if t.full_article.trim().is_empty() => &t.definition,
            ContentRecord::Glossary(t) => &t.full_article,
        }
    }

    /// Author with a non-blank name, if any.
    pub fn author(&self) -> Option<&Author> {
        let author = match self {
            ContentRecord::Blog(p) => p.author.as_ref(),
            ContentRecord::Glossary(t) => t.author.as_ref(),
        };
        author.filter(|a| !a.name.trim().is_empty())
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        match self {
            ContentRecord::Blog(p) => p.published_at,
            ContentRecord::Glossary(t) => t.published_at,
        }
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        match self {
            ContentRecord::Blog(p) => p.updated_at,
            ContentRecord::Glossary(t) => t.updated_at,
        }
    }

    /// Latest known modification time: update time, else publish time.
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.updated_at().or(self.published_at())
    }

    pub fn tags(&self) -> &[Tag] {
        match self {
            ContentRecord::Blog(p) => &p.tags,
            ContentRecord::Glossary(t) => &t.tags,
        }
    }

    pub fn faqs(&self) -> &[Faq] {
        match self {
            ContentRecord::Blog(p) => &p.faqs,
            ContentRecord::Glossary(t) => &t.faqs,
        }
    }

    pub fn cover_image(&self) -> Option<&CoverImage> {
        match self {
            ContentRecord::Blog(p) => p.cover_image.as_ref(),
            ContentRecord::Glossary(t) => t.cover_image.as_ref(),
        }
    }

    pub fn noindex(&self) -> bool {
        match self {
            ContentRecord::Blog(p) => p.noindex,
            ContentRecord::Glossary(t) => t.noindex,
        }
    }

    /// The same record with its FAQ list replaced.
    pub fn with_faqs(mut self, faqs: Vec<Faq>) -> Self {
        match &mut self {
            ContentRecord::Blog(p) => p.faqs = faqs,
            ContentRecord::Glossary(t) => t.faqs = faqs,
        }
        self
    }

    /// Deserialize a record of a known type from a JSON value.
    pub fn from_json(
        content_type: ContentType,
        value: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        Ok(match content_type {
            ContentType::Blog => ContentRecord::Blog(serde_json::from_value(value)?),
            ContentType::Glossary => ContentRecord::Glossary(serde_json::from_value(value)?),
        })
    }
}

/// Load every record under `root`.
///
/// Walks the tree for `.json` files, resolves each document's content type
/// and returns the records sorted by content type, then slug.
pub fn load_records(root: &Path) -> Result<Vec<ContentRecord>, ContentError> {
    let mut records = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        let is_json = entry.file_type().is_file()
            && path
                .extension()
                .map(|e| e.eq_ignore_ascii_case("json"))
                .unwrap_or(false);
        if !is_json {
            continue;
        }
        records.extend(load_file(path)?);
    }

    records.sort_by(|a, b| {
        a.content_type()
            .cmp(&b.content_type())
            .then_with(|| a.slug().cmp(b.slug()))
    });
    tracing::debug!(count = records.len(), root = %root.display(), "loaded content records");
    Ok(records)
}

/// Load one export file, which holds a single document or an array of them.
pub fn load_file(path: &Path) -> Result<Vec<ContentRecord>, ContentError> {
    let raw = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&raw).map_err(|source| ContentError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let documents = match value {
        serde_json::Value::Array(items) => items,
        other => vec![other],
    };

    let dir_type = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .and_then(ContentType::from_name);

    documents
        .into_iter()
        .map(|doc| {
            let declared = doc.get("_type").and_then(|t| t.as_str()).map(str::to_string);
            let content_type = match &declared {
                Some(kind) => ContentType::from_name(kind),
                None => dir_type,
            }
            .ok_or_else(|| ContentError::UnknownType {
                path: path.to_path_buf(),
                kind: declared.unwrap_or_default(),
            })?;
            ContentRecord::from_json(content_type, doc).map_err(|source| ContentError::Json {
                path: path.to_path_buf(),
                source,
            })
        })
        .collect()
}

/// Find a record by type and slug.
pub fn find_record<'a>(
    records: &'a [ContentRecord],
    content_type: ContentType,
    slug: &str,
) -> Option<&'a ContentRecord> {
    records
        .iter()
        .find(|r| r.content_type() == content_type && r.slug() == slug)
}
