//! Shared types used by content records, the schema builder and the renderer.
//!
//! These mirror the shapes the content backends export. Deserialization is
//! forgiving about representation (plain strings vs CMS objects, `null` vs
//! missing) so that the typed records behind it can be strict.

use serde::{Deserialize, Serialize};

/// Width of the social/structured-data image every cover is resolved to.
pub const SOCIAL_IMAGE_WIDTH: u32 = 1200;
/// Height of the social/structured-data image every cover is resolved to.
pub const SOCIAL_IMAGE_HEIGHT: u32 = 630;

/// Kind of content page. Determines URLs and breadcrumb labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Blog,
    Glossary,
}

impl ContentType {
    pub const ALL: [ContentType; 2] = [ContentType::Blog, ContentType::Glossary];

    /// URL path segment: `/blogovi/{slug}` or `/recnik/{slug}`.
    pub fn path_segment(self) -> &'static str {
        match self {
            ContentType::Blog => "blogovi",
            ContentType::Glossary => "recnik",
        }
    }

    /// Breadcrumb label of the section page.
    pub fn section_label(self) -> &'static str {
        match self {
            ContentType::Blog => "Blog",
            ContentType::Glossary => "Rečnik",
        }
    }

    /// Parse the discriminator used in exports and on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "blog" | "blogovi" | "post" => Some(ContentType::Blog),
            "glossary" | "recnik" | "glossaryterm" => Some(ContentType::Glossary),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Blog => f.write_str("blog"),
            ContentType::Glossary => f.write_str("glossary"),
        }
    }
}

/// Author of a post or term.
///
/// Accepts either a bare name string or an object with optional profile
/// URL and avatar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "AuthorRepr")]
pub struct Author {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AuthorRepr {
    Name(String),
    Full {
        #[serde(default)]
        name: String,
        #[serde(default)]
        url: Option<String>,
        #[serde(default, alias = "image")]
        avatar: Option<String>,
    },
}

impl From<AuthorRepr> for Author {
    fn from(repr: AuthorRepr) -> Self {
        match repr {
            AuthorRepr::Name(name) => Author {
                name,
                url: None,
                avatar: None,
            },
            AuthorRepr::Full { name, url, avatar } => Author { name, url, avatar },
        }
    }
}

/// A tag attached to a post. Plain strings get a slug derived from the title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "TagRepr")]
pub struct Tag {
    pub title: String,
    pub slug: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagRepr {
    Title(String),
    Full {
        title: String,
        #[serde(default)]
        slug: Option<SlugRepr>,
    },
}

impl From<TagRepr> for Tag {
    fn from(repr: TagRepr) -> Self {
        match repr {
            TagRepr::Title(title) => Tag {
                slug: crate::text::slugify(&title),
                title,
            },
            TagRepr::Full { title, slug } => Tag {
                slug: slug
                    .map(SlugRepr::into_string)
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| crate::text::slugify(&title)),
                title,
            },
        }
    }
}

/// A single explicit question/answer pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

impl Faq {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Slug as exported: a bare string or a CMS `{ "current": "..." }` object.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum SlugRepr {
    Plain(String),
    Cms { current: String },
}

impl SlugRepr {
    pub(crate) fn into_string(self) -> String {
        match self {
            SlugRepr::Plain(s) | SlugRepr::Cms { current: s } => s,
        }
    }
}

/// Reference to a cover image.
///
/// Either a CMS asset reference (`image-<id>-<w>x<h>-<ext>`) that resolves
/// against the image CDN, or a URL (absolute, protocol-relative or
/// site-relative) from object storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoverImage {
    Url(String),
    Asset {
        asset: AssetRef,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
}

/// CMS asset reference object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRef {
    #[serde(rename = "_ref")]
    pub reference: String,
}

impl CoverImage {
    /// Alt text, when the CMS supplied one.
    pub fn alt(&self) -> Option<&str> {
        match self {
            CoverImage::Asset { alt, .. } => alt.as_deref().filter(|a| !a.trim().is_empty()),
            CoverImage::Url(_) => None,
        }
    }

    /// Resolve to an absolute URL sized for social cards (1200×630).
    ///
    /// Returns `None` when the reference is empty or malformed so callers
    /// can substitute the placeholder image.
    pub fn resolve(&self, base_url: &str, image_cdn: &str) -> Option<String> {
        match self {
            CoverImage::Url(url) => absolute_url(base_url, url),
            CoverImage::Asset { asset, .. } => {
                let (id, width, height, ext) = parse_asset_ref(&asset.reference)?;
                Some(format!(
                    "{}/{id}-{width}x{height}.{ext}?w={SOCIAL_IMAGE_WIDTH}&h={SOCIAL_IMAGE_HEIGHT}&fit=crop",
                    image_cdn.trim_end_matches('/')
                ))
            }
        }
    }
}

/// Split `image-<id>-<w>x<h>-<ext>` into its parts.
fn parse_asset_ref(reference: &str) -> Option<(&str, u32, u32, &str)> {
    let rest = reference.strip_prefix("image-")?;
    let mut parts = rest.rsplitn(3, '-');
    let ext = parts.next()?;
    let dims = parts.next()?;
    let id = parts.next()?;
    let (w, h) = dims.split_once('x')?;
    let width = w.parse().ok()?;
    let height = h.parse().ok()?;
    if id.is_empty() || ext.is_empty() {
        return None;
    }
    Some((id, width, height, ext))
}

/// Make `url` absolute against `base_url`.
///
/// Absolute URLs pass through, protocol-relative ones get `https:`, and
/// anything else is treated as a site path. Blank input yields `None`.
pub fn absolute_url(base_url: &str, url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    if url.starts_with("https://") || url.starts_with("http://") {
        return Some(url.to_string());
    }
    if let Some(rest) = url.strip_prefix("//") {
        return Some(format!("https://{rest}"));
    }
    Some(format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        url.trim_start_matches('/')
    ))
}

/// Whether a string is an absolute http(s) URL.
pub fn is_absolute_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}
