//! Structured-data (JSON-LD) builder.
//!
//! Every content page carries exactly four schema.org objects, always in
//! this order:
//!
//! | # | `@type` | Source |
//! |---|---------|--------|
//! | 0 | `WebPage` | title, page URL, summary, site language |
//! | 1 | `BreadcrumbList` | Home → section (Blog / Rečnik) → page |
//! | 2 | `Article` (blog) or `DefinedTerm` (glossary) | the record itself |
//! | 3 | `FAQPage` | the record's FAQ list, possibly empty |
//!
//! The set is returned as `[StructuredData; 4]` so the count is enforced by
//! the type. The validator in [`crate::validate`] checks the same contract
//! on arbitrary arrays, including JSON pulled back out of rendered HTML.
//!
//! Building is pure: the only timestamps in the output are the record's own
//! `published_at`/`updated_at`. Two builds of the same record produce
//! byte-identical JSON.

use crate::config::SiteSettings;
use crate::content::ContentRecord;
use crate::text;
use crate::types::{
    ContentType, CoverImage, Faq, SOCIAL_IMAGE_HEIGHT, SOCIAL_IMAGE_WIDTH, absolute_url,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Value of every top-level `@context`.
pub const SCHEMA_CONTEXT: &str = "https://schema.org";

/// Number of objects in a content page's structured-data set.
pub const SET_LEN: usize = 4;

/// Longest generated description when a record has no summary.
const DESCRIPTION_MAX_CHARS: usize = 160;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("{content_type} record {id:?} is missing required field `{field}`")]
    MissingRequiredField {
        content_type: ContentType,
        id: String,
        field: &'static str,
    },
    #[error("{content_type} record {id:?} has slug {slug:?}, which is not a single path segment")]
    InvalidSlug {
        content_type: ContentType,
        id: String,
        slug: String,
    },
}

/// Reject records whose slug cannot become `/{segment}/{slug}`.
pub fn check_slug(record: &ContentRecord) -> Result<(), SchemaError> {
    let slug = record.slug();
    if slug.is_empty() {
        return Err(SchemaError::MissingRequiredField {
            content_type: record.content_type(),
            id: record.id().to_string(),
            field: "slug",
        });
    }
    if !text::is_path_safe_slug(slug) {
        return Err(SchemaError::InvalidSlug {
            content_type: record.content_type(),
            id: record.id().to_string(),
            slug: slug.to_string(),
        });
    }
    Ok(())
}

/// One top-level schema.org object, tagged by `@type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum StructuredData {
    WebPage(WebPage),
    BreadcrumbList(BreadcrumbList),
    Article(Article),
    DefinedTerm(DefinedTerm),
    #[serde(rename = "FAQPage")]
    FaqPage(FaqPage),
}

impl StructuredData {
    /// The `@type` this object serializes with.
    pub fn type_name(&self) -> &'static str {
        match self {
            StructuredData::WebPage(_) => "WebPage",
            StructuredData::BreadcrumbList(_) => "BreadcrumbList",
            StructuredData::Article(_) => "Article",
            StructuredData::DefinedTerm(_) => "DefinedTerm",
            StructuredData::FaqPage(_) => "FAQPage",
        }
    }

    pub fn as_faq_page(&self) -> Option<&FaqPage> {
        match self {
            StructuredData::FaqPage(faq) => Some(faq),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebPage {
    #[serde(rename = "@context")]
    pub context: String,
    pub name: String,
    pub url: String,
    pub description: String,
    pub in_language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbList {
    #[serde(rename = "@context")]
    pub context: String,
    pub item_list_element: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    #[serde(rename = "@type")]
    pub kind: String,
    pub position: u32,
    pub name: String,
    pub item: String,
}

impl ListItem {
    pub fn new(position: u32, name: impl Into<String>, item: impl Into<String>) -> Self {
        Self {
            kind: "ListItem".to_string(),
            position,
            name: name.into(),
            item: item.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageObject {
    #[serde(rename = "@type")]
    pub kind: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl ImageObject {
    /// An image at the social card size.
    pub fn social(url: impl Into<String>) -> Self {
        Self {
            kind: "ImageObject".to_string(),
            url: url.into(),
            width: Some(SOCIAL_IMAGE_WIDTH),
            height: Some(SOCIAL_IMAGE_HEIGHT),
        }
    }

    /// An image with unknown dimensions (logos).
    pub fn plain(url: impl Into<String>) -> Self {
        Self {
            kind: "ImageObject".to_string(),
            url: url.into(),
            width: None,
            height: None,
        }
    }
}

/// Author or publisher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum Agent {
    Person {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    Organization {
        name: String,
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        logo: Option<ImageObject>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(rename = "@context")]
    pub context: String,
    pub headline: String,
    pub description: String,
    pub image: ImageObject,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_published: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<DateTime<Utc>>,
    pub author: Agent,
    pub publisher: Agent,
    pub main_entity_of_page: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinedTerm {
    #[serde(rename = "@context")]
    pub context: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub in_defined_term_set: String,
    pub image: ImageObject,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_published: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<DateTime<Utc>>,
    pub author: Agent,
    pub publisher: Agent,
    pub main_entity_of_page: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqPage {
    #[serde(rename = "@context")]
    pub context: String,
    pub main_entity: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
    pub accepted_answer: Answer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(rename = "@type")]
    pub kind: String,
    pub text: String,
}

impl From<&Faq> for Question {
    fn from(faq: &Faq) -> Self {
        Question {
            kind: "Question".to_string(),
            name: faq.question.trim().to_string(),
            accepted_answer: Answer {
                kind: "Answer".to_string(),
                text: faq.answer.trim().to_string(),
            },
        }
    }
}

/// Site-level inputs to the builder, resolved once from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteContext {
    /// Absolute origin without trailing slash.
    pub base_url: String,
    pub site_name: String,
    pub language: String,
    pub home_label: String,
    /// Absolute URL of the placeholder image.
    pub default_image: String,
    /// Absolute URL of the publisher logo.
    pub logo: String,
    pub image_cdn: String,
}

impl SiteContext {
    pub fn from_settings(settings: &SiteSettings) -> Self {
        let base_url = settings.base_url.trim().trim_end_matches('/').to_string();
        let default_image = absolute_url(&base_url, &settings.default_image)
            .unwrap_or_else(|| format!("{base_url}/"));
        let logo = absolute_url(&base_url, &settings.logo).unwrap_or_else(|| format!("{base_url}/"));
        Self {
            site_name: settings.name.clone(),
            language: settings.language.clone(),
            home_label: settings.home_label.clone(),
            image_cdn: settings.image_cdn.clone(),
            default_image,
            logo,
            base_url,
        }
    }

    /// `${base_url}/{segment}`
    pub fn section_url(&self, content_type: ContentType) -> String {
        format!("{}/{}", self.base_url, content_type.path_segment())
    }

    /// `${base_url}/{segment}/{slug}`, the one canonical URL of a record.
    pub fn page_url(&self, content_type: ContentType, slug: &str) -> String {
        format!("{}/{}", self.section_url(content_type), slug)
    }

    /// Social-card image for a record: its cover, or the placeholder when the
    /// cover is absent or cannot be resolved.
    ///
    /// CDN assets are cropped to 1200×630 and the placeholder is expected at
    /// that size. Plain URLs are served as stored, so their size is unknown
    /// and left out.
    pub fn cover_image(&self, record: &ContentRecord) -> ImageObject {
        let resolved = record
            .cover_image()
            .and_then(|c| Some((c, c.resolve(&self.base_url, &self.image_cdn)?)));
        match resolved {
            Some((CoverImage::Asset { .. }, url)) => ImageObject::social(url),
            Some((CoverImage::Url(_), url)) => ImageObject::plain(url),
            None => ImageObject::social(self.default_image.clone()),
        }
    }

    pub fn cover_url(&self, record: &ContentRecord) -> String {
        self.cover_image(record).url
    }

    fn publisher(&self) -> Agent {
        Agent::Organization {
            name: self.site_name.clone(),
            url: self.base_url.clone(),
            logo: Some(ImageObject::plain(self.logo.clone())),
        }
    }
}

/// Maps content records to their structured-data set.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    site: SiteContext,
}

impl SchemaBuilder {
    pub fn new(site: SiteContext) -> Self {
        Self { site }
    }

    pub fn site(&self) -> &SiteContext {
        &self.site
    }

    /// Build the four-object set for a record.
    ///
    /// Fails only when the title/term or slug is blank; every other field
    /// degrades to a default.
    pub fn build(&self, record: &ContentRecord) -> Result<[StructuredData; SET_LEN], SchemaError> {
        let content_type = record.content_type();
        let missing = |field| SchemaError::MissingRequiredField {
            content_type,
            id: record.id().to_string(),
            field,
        };
        let title = record.title();
        if title.is_empty() {
            return Err(missing(match content_type {
                ContentType::Blog => "title",
                ContentType::Glossary => "term",
            }));
        }
        check_slug(record)?;
        let slug = record.slug();

        let url = self.site.page_url(content_type, slug);
        let description = describe(record);

        let web_page = StructuredData::WebPage(WebPage {
            context: SCHEMA_CONTEXT.to_string(),
            name: title.to_string(),
            url: url.clone(),
            description: description.clone(),
            in_language: self.site.language.clone(),
        });

        let breadcrumbs = StructuredData::BreadcrumbList(BreadcrumbList {
            context: SCHEMA_CONTEXT.to_string(),
            item_list_element: vec![
                ListItem::new(1, self.site.home_label.clone(), self.site.base_url.clone()),
                ListItem::new(
                    2,
                    content_type.section_label(),
                    self.site.section_url(content_type),
                ),
                ListItem::new(3, title, url.clone()),
            ],
        });

        let image = self.site.cover_image(record);
        let author = match record.author() {
            Some(a) => Agent::Person {
                name: a.name.trim().to_string(),
                url: a.url.clone().filter(|u| !u.trim().is_empty()),
            },
            None => self.site.publisher(),
        };
        let date_published = record.published_at();
        let date_modified = modified_date(date_published, record.updated_at());

        let main_entity = match content_type {
            ContentType::Blog => StructuredData::Article(Article {
                context: SCHEMA_CONTEXT.to_string(),
                headline: title.to_string(),
                description,
                image,
                date_published,
                date_modified,
                author,
                publisher: self.site.publisher(),
                main_entity_of_page: url,
                keywords: record.tags().iter().map(|t| t.title.clone()).collect(),
            }),
            ContentType::Glossary => StructuredData::DefinedTerm(DefinedTerm {
                context: SCHEMA_CONTEXT.to_string(),
                name: title.to_string(),
                description,
                url: url.clone(),
                in_defined_term_set: self.site.section_url(content_type),
                image,
                date_published,
                date_modified,
                author,
                publisher: self.site.publisher(),
                main_entity_of_page: url,
            }),
        };

        let faq_page = StructuredData::FaqPage(FaqPage {
            context: SCHEMA_CONTEXT.to_string(),
            main_entity: record.faqs().iter().map(Question::from).collect(),
        });

        Ok([web_page, breadcrumbs, main_entity, faq_page])
    }
}

/// `dateModified`: the update time when it differs from the publish time,
/// otherwise the publish time.
pub fn modified_date(
    published: Option<DateTime<Utc>>,
    updated: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    match (published, updated) {
        (Some(p), Some(u)) if u != p => Some(u),
        (Some(p), _) => Some(p),
        (None, u) => u,
    }
}

/// Summary, else the opening of the body, else the title.
pub fn describe(record: &ContentRecord) -> String {
    let summary = record.summary();
    if !summary.is_empty() {
        return text::collapse_whitespace(summary);
    }
    let body = text::plain_text(record.body());
    if !body.is_empty() {
        return text::truncate_chars(&body, DESCRIPTION_MAX_CHARS);
    }
    record.title().to_string()
}

/// Serialize a set for embedding inside `<script type="application/ld+json">`.
///
/// `</` is escaped as `<\/` (still valid JSON) so no string value can close
/// the script element.
pub fn to_json_ld(data: &[StructuredData]) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(data)?.replace("</", "<\\/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::types::Author;

    fn builder() -> SchemaBuilder {
        SchemaBuilder::new(test_site())
    }

    fn types_of(set: &[StructuredData]) -> Vec<&'static str> {
        set.iter().map(StructuredData::type_name).collect()
    }

    #[test]
    fn blog_set_has_fixed_order() {
        let set = builder().build(&blog_post()).unwrap();
        assert_eq!(
            types_of(&set),
            vec!["WebPage", "BreadcrumbList", "Article", "FAQPage"]
        );
    }

    #[test]
    fn glossary_set_uses_defined_term() {
        let set = builder().build(&plomba()).unwrap();
        assert_eq!(
            types_of(&set),
            vec!["WebPage", "BreadcrumbList", "DefinedTerm", "FAQPage"]
        );
    }

    #[test]
    fn plomba_breadcrumb_and_faq() {
        let set = builder().build(&plomba()).unwrap();
        let StructuredData::BreadcrumbList(crumbs) = &set[1] else {
            panic!("expected BreadcrumbList at index 1, got {}", set[1].type_name());
        };
        let items = &crumbs.item_list_element;
        assert_eq!(items.len(), 3);
        assert_eq!(items[2].name, "Plomba");
        assert_eq!(items[2].item, "https://odontoa.com/recnik/plomba");
        assert_eq!(items[1].name, "Rečnik");
        assert_eq!(items[1].item, "https://odontoa.com/recnik");
        assert_eq!(items[0].item, "https://odontoa.com");

        let faq = set[3].as_faq_page().expect("FAQPage at index 3");
        assert_eq!(faq.main_entity.len(), 1);
        assert_eq!(faq.main_entity[0].name, "Šta je plomba?");
    }

    #[test]
    fn breadcrumb_positions_are_one_two_three() {
        for record in [blog_post(), plomba()] {
            let set = builder().build(&record).unwrap();
            let StructuredData::BreadcrumbList(crumbs) = &set[1] else {
                panic!("expected BreadcrumbList");
            };
            let positions: Vec<u32> = crumbs.item_list_element.iter().map(|i| i.position).collect();
            assert_eq!(positions, vec![1, 2, 3]);
        }
    }

    #[test]
    fn web_page_url_matches_main_entity_of_page() {
        let set = builder().build(&blog_post()).unwrap();
        let StructuredData::WebPage(page) = &set[0] else {
            panic!("expected WebPage");
        };
        let StructuredData::Article(article) = &set[2] else {
            panic!("expected Article");
        };
        assert_eq!(page.url, article.main_entity_of_page);
        assert_eq!(page.url, "https://odontoa.com/blogovi/kako-odabrati-cetkicu");
    }

    #[test]
    fn trailing_slash_on_base_url_is_trimmed() {
        let mut settings = SiteSettings::default();
        settings.base_url = "https://odontoa.com/".to_string();
        let builder = SchemaBuilder::new(SiteContext::from_settings(&settings));
        let set = builder.build(&plomba()).unwrap();
        let StructuredData::WebPage(page) = &set[0] else {
            panic!("expected WebPage");
        };
        assert_eq!(page.url, "https://odontoa.com/recnik/plomba");
    }

    #[test]
    fn building_twice_is_byte_identical() {
        let record = blog_post();
        let first = to_json_ld(&builder().build(&record).unwrap()).unwrap();
        let second = to_json_ld(&builder().build(&record).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn date_modified_falls_back_to_published() {
        let set = builder().build(&plomba()).unwrap();
        let StructuredData::DefinedTerm(term) = &set[2] else {
            panic!("expected DefinedTerm");
        };
        assert_eq!(term.date_published, Some(ts("2024-01-10T00:00:00Z")));
        assert_eq!(term.date_modified, term.date_published);
    }

    #[test]
    fn date_modified_equal_update_uses_published() {
        let published = ts("2024-01-10T00:00:00Z");
        assert_eq!(modified_date(Some(published), Some(published)), Some(published));
    }

    #[test]
    fn date_modified_uses_distinct_update() {
        let set = builder().build(&blog_post()).unwrap();
        let StructuredData::Article(article) = &set[2] else {
            panic!("expected Article");
        };
        assert_eq!(article.date_modified, Some(ts("2024-03-05T12:30:00Z")));
        assert_ne!(article.date_modified, article.date_published);
    }

    #[test]
    fn no_dates_without_published_at() {
        assert_eq!(modified_date(None, None), None);
    }

    #[test]
    fn timestamps_serialize_as_rfc3339() {
        let json = to_json_ld(&builder().build(&plomba()).unwrap()).unwrap();
        assert!(json.contains(r#""datePublished":"2024-01-10T00:00:00Z""#));
    }

    #[test]
    fn missing_cover_uses_placeholder() {
        let set = builder().build(&plomba()).unwrap();
        let StructuredData::DefinedTerm(term) = &set[2] else {
            panic!("expected DefinedTerm");
        };
        assert_eq!(term.image.url, "https://odontoa.com/images/og-default.jpg");
        assert_eq!(term.image.width, Some(1200));
        assert_eq!(term.image.height, Some(630));
    }

    #[test]
    fn malformed_cover_uses_placeholder() {
        let record = match blog_post() {
            ContentRecord::Blog(mut p) => {
                p.cover_image = Some(CoverImage::Url(String::new()));
                ContentRecord::Blog(p)
            }
            other => other,
        };
        let set = builder().build(&record).unwrap();
        let StructuredData::Article(article) = &set[2] else {
            panic!("expected Article");
        };
        assert_eq!(article.image.url, "https://odontoa.com/images/og-default.jpg");
    }

    #[test]
    fn cover_asset_resolves_through_cdn() {
        let set = builder().build(&blog_post()).unwrap();
        let StructuredData::Article(article) = &set[2] else {
            panic!("expected Article");
        };
        assert!(article.image.url.starts_with("https://cdn.sanity.io/images/"));
        assert!(article.image.url.ends_with("?w=1200&h=630&fit=crop"));
        assert_eq!(article.image.width, Some(1200));
        assert_eq!(article.image.height, Some(630));
    }

    #[test]
    fn stored_cover_url_carries_no_dimensions() {
        let record = match blog_post() {
            ContentRecord::Blog(mut p) => {
                p.cover_image = Some(CoverImage::Url(
                    "https://storage.odontoa.com/blog/cetkica.jpg".to_string(),
                ));
                ContentRecord::Blog(p)
            }
            other => other,
        };
        let set = builder().build(&record).unwrap();
        let StructuredData::Article(article) = &set[2] else {
            panic!("expected Article");
        };
        assert_eq!(article.image.url, "https://storage.odontoa.com/blog/cetkica.jpg");
        assert_eq!(article.image.width, None);
        let json = to_json_ld(&set).unwrap();
        assert!(!json.contains(r#""width""#));
    }

    #[test]
    fn empty_faqs_keep_faq_page_with_empty_list() {
        let record = blog_post().with_faqs(Vec::new());
        let set = builder().build(&record).unwrap();
        assert_eq!(set[3].as_faq_page().map(|f| f.main_entity.len()), Some(0));
        let json = to_json_ld(&set).unwrap();
        assert!(json.contains(r#""mainEntity":[]"#));
    }

    #[test]
    fn faqs_are_mapped_in_source_order() {
        let record = blog_post().with_faqs(vec![
            Faq::new("Prvo?", "Jedan."),
            Faq::new("Drugo?", "Dva."),
        ]);
        let set = builder().build(&record).unwrap();
        let names: Vec<&str> = set[3]
            .as_faq_page()
            .unwrap()
            .main_entity
            .iter()
            .map(|q| q.name.as_str())
            .collect();
        assert_eq!(names, vec!["Prvo?", "Drugo?"]);
    }

    #[test]
    fn author_falls_back_to_publisher_organization() {
        let set = builder().build(&plomba()).unwrap();
        let StructuredData::DefinedTerm(term) = &set[2] else {
            panic!("expected DefinedTerm");
        };
        assert!(matches!(&term.author, Agent::Organization { name, .. } if name == "Odontoa"));
    }

    #[test]
    fn named_author_becomes_person() {
        let record = match blog_post() {
            ContentRecord::Blog(mut p) => {
                p.author = Some(Author {
                    name: "Dr Marko Jović".to_string(),
                    url: Some("https://odontoa.com/tim/marko".to_string()),
                    avatar: None,
                });
                ContentRecord::Blog(p)
            }
            other => other,
        };
        let json = to_json_ld(&builder().build(&record).unwrap()).unwrap();
        assert!(json.contains(
            r#""author":{"@type":"Person","name":"Dr Marko Jović","url":"https://odontoa.com/tim/marko"}"#
        ));
    }

    #[test]
    fn tags_become_keywords() {
        let set = builder().build(&blog_post()).unwrap();
        let StructuredData::Article(article) = &set[2] else {
            panic!("expected Article");
        };
        assert_eq!(article.keywords, vec!["Higijena", "Prevencija"]);
    }

    #[test]
    fn description_falls_back_to_body_text() {
        let record = match plomba() {
            ContentRecord::Glossary(mut t) => {
                t.definition = String::new();
                t.full_article = "**Plomba** je ispuna zuba.".to_string();
                ContentRecord::Glossary(t)
            }
            other => other,
        };
        let set = builder().build(&record).unwrap();
        let StructuredData::WebPage(page) = &set[0] else {
            panic!("expected WebPage");
        };
        assert_eq!(page.description, "Plomba je ispuna zuba.");
    }

    #[test]
    fn description_falls_back_to_title_when_no_text() {
        let record = match plomba() {
            ContentRecord::Glossary(mut t) => {
                t.definition = String::new();
                t.full_article = String::new();
                ContentRecord::Glossary(t)
            }
            other => other,
        };
        let set = builder().build(&record).unwrap();
        let StructuredData::WebPage(page) = &set[0] else {
            panic!("expected WebPage");
        };
        assert_eq!(page.description, "Plomba");
    }

    #[test]
    fn missing_term_is_an_error() {
        let record = match plomba() {
            ContentRecord::Glossary(mut t) => {
                t.term = "   ".to_string();
                ContentRecord::Glossary(t)
            }
            other => other,
        };
        let err = builder().build(&record).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::MissingRequiredField { field: "term", .. }
        ));
    }

    #[test]
    fn missing_slug_is_an_error() {
        let record = match blog_post() {
            ContentRecord::Blog(mut p) => {
                p.slug = String::new();
                ContentRecord::Blog(p)
            }
            other => other,
        };
        let err = builder().build(&record).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::MissingRequiredField { field: "slug", .. }
        ));
    }

    #[test]
    fn traversal_slug_is_an_error() {
        let record = match blog_post() {
            ContentRecord::Blog(mut p) => {
                p.slug = "../../escaped".to_string();
                ContentRecord::Blog(p)
            }
            other => other,
        };
        let err = builder().build(&record).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidSlug { ref slug, .. } if slug == "../../escaped"
        ));
    }

    #[test]
    fn json_ld_escapes_script_close() {
        let record = blog_post().with_faqs(vec![Faq::new("Šta je </script>?", "Ništa.")]);
        let json = to_json_ld(&builder().build(&record).unwrap()).unwrap();
        assert!(!json.contains("</script>"));
        assert!(json.contains(r"<\/script>"));
        // Still valid JSON with the original text
        let parsed: Vec<StructuredData> = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed[3].as_faq_page().unwrap().main_entity[0].name,
            "Šta je </script>?"
        );
    }

    #[test]
    fn serialized_objects_carry_type_and_context() {
        let json = to_json_ld(&builder().build(&plomba()).unwrap()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 4);
        for object in array {
            assert_eq!(object["@context"], "https://schema.org");
            assert!(object["@type"].is_string());
        }
        assert_eq!(array[3]["@type"], "FAQPage");
        assert_eq!(array[3]["mainEntity"][0]["acceptedAnswer"]["@type"], "Answer");
    }
}
