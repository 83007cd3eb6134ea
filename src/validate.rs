//! Structured-data validation.
//!
//! Two independent checks run on every rendered page:
//!
//! - **Structural**: the set must hold exactly four objects, one each of
//!   `WebPage`, `BreadcrumbList`, `Article`-or-`DefinedTerm` and `FAQPage`,
//!   with well-formed breadcrumbs, absolute URLs and a main entity that
//!   points at the same URL as the page. Failures are collected into a
//!   [`StructuralMismatch`] listing every issue.
//! - **Content sync**: every FAQ entry in the structured data should also be
//!   readable on the page. This is a substring heuristic and only ever
//!   produces [`ContentSyncWarning`]s. Rich-text rendering can reformat
//!   punctuation or whitespace, so a warning may be a false positive; that
//!   is accepted and the check never blocks a page.
//!
//! Neither check raises. [`validate_page`] returns a [`ValidationReport`]
//! and [`decide_emission`] turns the structural result into an emit/suppress
//! decision according to the [`ValidationMode`]:
//!
//! | Mode | Structural failure |
//! |------|--------------------|
//! | `Advisory` (production) | logged, JSON-LD still emitted (fail open) |
//! | `Blocking` (development/test) | logged, JSON-LD dropped (fail closed) |

use crate::schema::{FaqPage, SET_LEN, StructuredData};
use crate::text;
use crate::types::is_absolute_url;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static JSON_LD_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script\b[^>]*\btype\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script\s*>"#)
        .expect("JSON-LD script pattern is valid")
});

/// Index of the FAQPage within a well-formed set.
pub const FAQ_INDEX: usize = 3;

/// Leading answer words that must be visible on the page.
pub const ANSWER_PREFIX_WORDS: usize = 5;

/// Expected breadcrumb depth on content detail pages.
const BREADCRUMB_LEN: usize = 3;

/// What a structural failure does to the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Log and still emit the JSON-LD.
    #[default]
    Advisory,
    /// Log and omit the JSON-LD.
    Blocking,
}

/// Required position in the set. `Article` and `DefinedTerm` share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    WebPage,
    BreadcrumbList,
    MainEntity,
    FaqPage,
}

impl Slot {
    pub const ALL: [Slot; SET_LEN] = [
        Slot::WebPage,
        Slot::BreadcrumbList,
        Slot::MainEntity,
        Slot::FaqPage,
    ];

    /// Slot for a schema.org `@type` name, if it is one of the required ones.
    pub fn of(type_name: &str) -> Option<Slot> {
        match type_name {
            "WebPage" => Some(Slot::WebPage),
            "BreadcrumbList" => Some(Slot::BreadcrumbList),
            "Article" | "DefinedTerm" => Some(Slot::MainEntity),
            "FAQPage" => Some(Slot::FaqPage),
            _ => None,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Slot::WebPage => "WebPage",
            Slot::BreadcrumbList => "BreadcrumbList",
            Slot::MainEntity => "Article/DefinedTerm",
            Slot::FaqPage => "FAQPage",
        })
    }
}

/// One structural problem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralIssue {
    #[error("expected {} objects, found {found}", SET_LEN)]
    WrongLength { found: usize },
    #[error("missing {0}")]
    Missing(Slot),
    #[error("{slot} appears {count} times")]
    Duplicated { slot: Slot, count: usize },
    #[error("unexpected @type {0:?}")]
    UnexpectedType(String),
    #[error("object {index} is malformed: {reason}")]
    InvalidShape { index: usize, reason: String },
    #[error("breadcrumb has {found} items, expected {}", BREADCRUMB_LEN)]
    BreadcrumbLength { found: usize },
    #[error("breadcrumb positions {0:?} are not 1..n")]
    BreadcrumbPositions(Vec<u32>),
    #[error("WebPage.url {page} differs from mainEntityOfPage {main_entity}")]
    UrlMismatch { page: String, main_entity: String },
    #[error("{field} is not an absolute URL: {url:?}")]
    RelativeUrl { field: &'static str, url: String },
}

/// Every structural problem found in one set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed structured data: {}", join_issues(.issues))]
pub struct StructuralMismatch {
    pub issues: Vec<StructuralIssue>,
}

fn join_issues(issues: &[StructuralIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn finish(issues: Vec<StructuralIssue>) -> Result<(), StructuralMismatch> {
    if issues.is_empty() {
        Ok(())
    } else {
        Err(StructuralMismatch { issues })
    }
}

/// Count/type check shared by the typed and JSON validators.
fn check_types<'a>(names: &[Option<&'a str>], issues: &mut Vec<StructuralIssue>) {
    if names.len() != SET_LEN {
        issues.push(StructuralIssue::WrongLength { found: names.len() });
    }
    let mut counts = [0usize; SET_LEN];
    for name in names {
        match name.and_then(Slot::of) {
            Some(slot) => counts[slot as usize] += 1,
            None => issues.push(StructuralIssue::UnexpectedType(
                name.unwrap_or("<none>").to_string(),
            )),
        }
    }
    for (slot, count) in Slot::ALL.iter().zip(counts) {
        match count {
            0 => issues.push(StructuralIssue::Missing(*slot)),
            1 => {}
            n => issues.push(StructuralIssue::Duplicated {
                slot: *slot,
                count: n,
            }),
        }
    }
}

fn require_absolute(field: &'static str, url: &str, issues: &mut Vec<StructuralIssue>) {
    if !is_absolute_url(url) {
        issues.push(StructuralIssue::RelativeUrl {
            field,
            url: url.to_string(),
        });
    }
}

/// Field-shape checks on typed objects.
fn check_shapes(data: &[StructuredData], issues: &mut Vec<StructuralIssue>) {
    let mut page_url = None;
    let mut entity_url = None;

    for object in data {
        match object {
            StructuredData::WebPage(page) => {
                require_absolute("WebPage.url", &page.url, issues);
                page_url.get_or_insert(page.url.as_str());
            }
            StructuredData::BreadcrumbList(list) => {
                let items = &list.item_list_element;
                if items.len() != BREADCRUMB_LEN {
                    issues.push(StructuralIssue::BreadcrumbLength { found: items.len() });
                }
                let positions: Vec<u32> = items.iter().map(|i| i.position).collect();
                let in_order = positions.iter().zip(1u32..).all(|(p, expected)| *p == expected);
                if !in_order {
                    issues.push(StructuralIssue::BreadcrumbPositions(positions));
                }
                for item in items {
                    require_absolute("BreadcrumbList.item", &item.item, issues);
                }
            }
            StructuredData::Article(article) => {
                require_absolute("Article.image", &article.image.url, issues);
                require_absolute("Article.mainEntityOfPage", &article.main_entity_of_page, issues);
                entity_url.get_or_insert(article.main_entity_of_page.as_str());
            }
            StructuredData::DefinedTerm(term) => {
                require_absolute("DefinedTerm.image", &term.image.url, issues);
                require_absolute(
                    "DefinedTerm.mainEntityOfPage",
                    &term.main_entity_of_page,
                    issues,
                );
                entity_url.get_or_insert(term.main_entity_of_page.as_str());
            }
            StructuredData::FaqPage(_) => {}
        }
    }

    if let (Some(page), Some(entity)) = (page_url, entity_url) {
        if page != entity {
            issues.push(StructuralIssue::UrlMismatch {
                page: page.to_string(),
                main_entity: entity.to_string(),
            });
        }
    }
}

/// Validate a typed structured-data set.
pub fn validate_structure(data: &[StructuredData]) -> Result<(), StructuralMismatch> {
    let names: Vec<Option<&str>> = data.iter().map(|d| Some(d.type_name())).collect();
    let mut issues = Vec::new();
    check_types(&names, &mut issues);
    check_shapes(data, &mut issues);
    finish(issues)
}

/// Validate untyped JSON-LD, e.g. the payload of an already-rendered page.
///
/// A single object is treated as a one-element set. Objects that don't
/// deserialize into a known shape are reported individually; field-shape
/// checks run only when every object parsed.
pub fn validate_json_ld(value: &serde_json::Value) -> Result<(), StructuralMismatch> {
    let objects: Vec<&serde_json::Value> = match value {
        serde_json::Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };
    let names: Vec<Option<&str>> = objects
        .iter()
        .map(|o| o.get("@type").and_then(|t| t.as_str()))
        .collect();

    let mut issues = Vec::new();
    check_types(&names, &mut issues);

    let mut typed = Vec::with_capacity(objects.len());
    for (index, object) in objects.iter().enumerate() {
        if names[index].and_then(Slot::of).is_none() {
            continue;
        }
        match serde_json::from_value::<StructuredData>((*object).clone()) {
            Ok(data) => typed.push(data),
            Err(e) => issues.push(StructuralIssue::InvalidShape {
                index,
                reason: e.to_string(),
            }),
        }
    }
    if typed.len() == objects.len() {
        check_shapes(&typed, &mut issues);
    }
    finish(issues)
}

/// An FAQ entry whose text could not be found on the page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentSyncWarning {
    #[error("FAQ #{} question not visible on page: {question:?}", .index + 1)]
    QuestionNotVisible { index: usize, question: String },
    #[error(
        "FAQ #{} answer to {question:?} not visible on page (looked for {answer_start:?})",
        .index + 1
    )]
    AnswerNotVisible {
        index: usize,
        question: String,
        answer_start: String,
    },
}

/// Compare FAQ structured data with the page's visible text.
///
/// `visible_text` is the plain text of the rendered body (see
/// [`text::visible_text`]). Matching is case-insensitive with whitespace
/// collapsed; the trailing `?` of a question is ignored and only the first
/// [`ANSWER_PREFIX_WORDS`] words of each answer are looked for.
pub fn check_content_sync(faq: &FaqPage, visible_text: &str) -> Vec<ContentSyncWarning> {
    if faq.main_entity.is_empty() {
        return Vec::new();
    }
    let haystack = text::normalize_for_match(visible_text);
    let mut warnings = Vec::new();

    for (index, question) in faq.main_entity.iter().enumerate() {
        let needle = text::normalize_for_match(question.name.trim().trim_end_matches('?'));
        if !needle.is_empty() && !haystack.contains(&needle) {
            warnings.push(ContentSyncWarning::QuestionNotVisible {
                index,
                question: question.name.clone(),
            });
        }

        let answer_start = text::first_words(&question.accepted_answer.text, ANSWER_PREFIX_WORDS);
        let needle = text::normalize_for_match(&answer_start);
        if !needle.is_empty() && !haystack.contains(&needle) {
            warnings.push(ContentSyncWarning::AnswerNotVisible {
                index,
                question: question.name.clone(),
                answer_start,
            });
        }
    }
    warnings
}

/// Locate the FAQPage: its fixed position first, then anywhere in the set.
pub fn find_faq_page(data: &[StructuredData]) -> Option<&FaqPage> {
    data.get(FAQ_INDEX)
        .and_then(StructuredData::as_faq_page)
        .or_else(|| data.iter().find_map(StructuredData::as_faq_page))
}

/// Outcome of validating one page.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub structure: Result<(), StructuralMismatch>,
    pub warnings: Vec<ContentSyncWarning>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.structure.is_ok() && self.warnings.is_empty()
    }

    /// Emit the report through `tracing`. Structural problems and sync
    /// warnings are both logged at `warn`.
    pub fn log(&self, page: &str) {
        if let Err(mismatch) = &self.structure {
            tracing::warn!(page, "{mismatch}");
        }
        for warning in &self.warnings {
            tracing::warn!(page, "content sync: {warning}");
        }
    }
}

/// Run both checks on a page's set and visible text.
pub fn validate_page(data: &[StructuredData], visible_text: &str) -> ValidationReport {
    let warnings = find_faq_page(data)
        .map(|faq| check_content_sync(faq, visible_text))
        .unwrap_or_default();
    ValidationReport {
        structure: validate_structure(data),
        warnings,
    }
}

/// Whether the JSON-LD script goes on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission {
    Emit,
    Suppress,
}

/// Apply the validation mode to a structural result.
pub fn decide_emission(
    mode: ValidationMode,
    structure: &Result<(), StructuralMismatch>,
) -> Emission {
    match (mode, structure) {
        (_, Ok(())) => Emission::Emit,
        (ValidationMode::Advisory, Err(_)) => Emission::Emit,
        (ValidationMode::Blocking, Err(_)) => Emission::Suppress,
    }
}

// ============================================================================
// Rendered HTML
// ============================================================================

/// Parse every `<script type="application/ld+json">` block in a page.
///
/// Blocks are returned in document order; each parses independently.
pub fn extract_json_ld(html: &str) -> Vec<Result<serde_json::Value, serde_json::Error>> {
    JSON_LD_SCRIPT
        .captures_iter(html)
        .filter_map(|cap| cap.get(1))
        .map(|m| serde_json::from_str(m.as_str().trim()))
        .collect()
}

/// Validation of structured data pulled back out of a rendered page.
#[derive(Debug)]
pub struct InspectReport {
    /// JSON-LD script blocks found.
    pub scripts: usize,
    /// Blocks that were not valid JSON.
    pub parse_errors: Vec<String>,
    pub structure: Result<(), StructuralMismatch>,
    pub warnings: Vec<ContentSyncWarning>,
}

impl InspectReport {
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && self.warnings.is_empty()
    }

    /// Unparseable blocks or a broken set. Sync warnings don't count.
    pub fn has_errors(&self) -> bool {
        !self.parse_errors.is_empty() || self.structure.is_err()
    }
}

/// Extract, merge and validate a page's JSON-LD, then check its FAQ entries
/// against the page's visible text.
///
/// Objects from all blocks are merged into one set, so a page that splits
/// the four objects across scripts is still judged as a whole.
pub fn inspect_html(html: &str) -> InspectReport {
    let blocks = extract_json_ld(html);
    let scripts = blocks.len();
    let mut parse_errors = Vec::new();
    let mut objects = Vec::new();
    for block in blocks {
        match block {
            Ok(serde_json::Value::Array(items)) => objects.extend(items),
            Ok(other) => objects.push(other),
            Err(e) => parse_errors.push(e.to_string()),
        }
    }

    let faq = objects
        .iter()
        .find(|o| o.get("@type").and_then(|t| t.as_str()) == Some("FAQPage"))
        .and_then(|o| serde_json::from_value::<FaqPage>(o.clone()).ok());
    let warnings = faq
        .map(|faq| check_content_sync(&faq, &text::visible_text(html)))
        .unwrap_or_default();

    InspectReport {
        scripts,
        parse_errors,
        structure: validate_json_ld(&serde_json::Value::Array(objects)),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SchemaBuilder, to_json_ld};
    use crate::test_helpers::*;
    use crate::types::Faq;

    fn plomba_set() -> Vec<StructuredData> {
        SchemaBuilder::new(test_site()).build(&plomba()).unwrap().to_vec()
    }

    fn blog_set() -> Vec<StructuredData> {
        SchemaBuilder::new(test_site()).build(&blog_post()).unwrap().to_vec()
    }

    // =========================================================================
    // Structural validation
    // =========================================================================

    #[test]
    fn builder_output_is_valid() {
        assert_eq!(validate_structure(&plomba_set()), Ok(()));
        assert_eq!(validate_structure(&blog_set()), Ok(()));
    }

    #[test]
    fn missing_faq_page_is_invalid() {
        let mut set = plomba_set();
        set.pop();
        let err = validate_structure(&set).unwrap_err();
        assert!(err.issues.contains(&StructuralIssue::WrongLength { found: 3 }));
        assert!(err.issues.contains(&StructuralIssue::Missing(Slot::FaqPage)));
    }

    #[test]
    fn duplicated_type_is_reported() {
        let mut set = plomba_set();
        set[3] = set[0].clone();
        let err = validate_structure(&set).unwrap_err();
        assert_eq!(
            err.issues,
            vec![
                StructuralIssue::Duplicated {
                    slot: Slot::WebPage,
                    count: 2
                },
                StructuralIssue::Missing(Slot::FaqPage),
            ]
        );
    }

    #[test]
    fn article_and_defined_term_share_a_slot() {
        let mut set = blog_set();
        set.push(plomba_set()[2].clone());
        let err = validate_structure(&set).unwrap_err();
        assert!(err.issues.contains(&StructuralIssue::Duplicated {
            slot: Slot::MainEntity,
            count: 2
        }));
    }

    #[test]
    fn breadcrumb_positions_out_of_order_are_reported() {
        let mut set = plomba_set();
        if let StructuredData::BreadcrumbList(list) = &mut set[1] {
            list.item_list_element[1].position = 3;
            list.item_list_element[2].position = 2;
        }
        let err = validate_structure(&set).unwrap_err();
        assert_eq!(err.issues, vec![StructuralIssue::BreadcrumbPositions(vec![1, 3, 2])]);
    }

    #[test]
    fn diverging_page_and_entity_urls_are_reported() {
        let mut set = blog_set();
        if let StructuredData::Article(article) = &mut set[2] {
            article.main_entity_of_page = "https://odontoa.com/blog/drugo".to_string();
        }
        let err = validate_structure(&set).unwrap_err();
        assert!(matches!(err.issues[0], StructuralIssue::UrlMismatch { .. }));
    }

    #[test]
    fn relative_urls_are_reported() {
        let mut set = plomba_set();
        if let StructuredData::WebPage(page) = &mut set[0] {
            page.url = "/recnik/plomba".to_string();
        }
        let err = validate_structure(&set).unwrap_err();
        assert!(err.issues.iter().any(|i| matches!(
            i,
            StructuralIssue::RelativeUrl {
                field: "WebPage.url",
                ..
            }
        )));
    }

    #[test]
    fn mismatch_display_lists_every_issue() {
        let err = validate_structure(&[]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("expected 4 objects, found 0"));
        assert!(message.contains("missing WebPage"));
        assert!(message.contains("missing FAQPage"));
    }

    // =========================================================================
    // JSON-level validation
    // =========================================================================

    #[test]
    fn json_from_builder_is_valid() {
        let json = to_json_ld(&plomba_set()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(validate_json_ld(&value), Ok(()));
    }

    #[test]
    fn json_single_object_is_wrong_length() {
        let value = serde_json::json!({"@context": "https://schema.org", "@type": "Organization"});
        let err = validate_json_ld(&value).unwrap_err();
        assert!(err.issues.contains(&StructuralIssue::WrongLength { found: 1 }));
        assert!(err
            .issues
            .contains(&StructuralIssue::UnexpectedType("Organization".to_string())));
    }

    #[test]
    fn json_object_without_type_is_reported() {
        let value = serde_json::json!([{}]);
        let err = validate_json_ld(&value).unwrap_err();
        assert!(err
            .issues
            .contains(&StructuralIssue::UnexpectedType("<none>".to_string())));
    }

    #[test]
    fn json_with_malformed_object_reports_shape() {
        let json = to_json_ld(&plomba_set()).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value[0].as_object_mut().unwrap().remove("url");
        let err = validate_json_ld(&value).unwrap_err();
        assert!(matches!(
            err.issues.as_slice(),
            [StructuralIssue::InvalidShape { index: 0, .. }]
        ));
    }

    // =========================================================================
    // Content sync
    // =========================================================================

    fn faq_page(faqs: &[Faq]) -> FaqPage {
        let record = plomba().with_faqs(faqs.to_vec());
        let set = SchemaBuilder::new(test_site()).build(&record).unwrap();
        set[3].as_faq_page().unwrap().clone()
    }

    #[test]
    fn empty_faq_page_produces_no_warnings() {
        assert!(check_content_sync(&faq_page(&[]), "").is_empty());
        assert!(check_content_sync(&faq_page(&[]), "bilo šta").is_empty());
    }

    #[test]
    fn visible_faq_produces_no_warnings() {
        let faq = faq_page(&[Faq::new(
            "Šta je plomba?",
            "Plomba je ispuna kojom se nadoknađuje oštećeni deo zuba.",
        )]);
        let visible = "Česta pitanja ŠTA JE PLOMBA? Plomba je   ispuna kojom se nadoknađuje deo.";
        assert!(check_content_sync(&faq, visible).is_empty());
    }

    #[test]
    fn hidden_question_warns() {
        let faq = faq_page(&[Faq::new("Koliko traje plomba?", "Plomba traje godinama.")]);
        let warnings = check_content_sync(&faq, "Plomba traje godinama.");
        assert_eq!(
            warnings,
            vec![ContentSyncWarning::QuestionNotVisible {
                index: 0,
                question: "Koliko traje plomba?".to_string()
            }]
        );
    }

    #[test]
    fn hidden_answer_warns_with_its_opening_words() {
        let faq = faq_page(&[Faq::new(
            "Koliko traje plomba?",
            "Kompozitna plomba obično traje između pet i deset godina.",
        )]);
        let warnings = check_content_sync(&faq, "Koliko traje plomba");
        assert_eq!(
            warnings,
            vec![ContentSyncWarning::AnswerNotVisible {
                index: 0,
                question: "Koliko traje plomba?".to_string(),
                answer_start: "Kompozitna plomba obično traje između".to_string(),
            }]
        );
    }

    #[test]
    fn sync_warnings_number_entries_from_one() {
        let warning = ContentSyncWarning::QuestionNotVisible {
            index: 1,
            question: "Boli li?".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            r#"FAQ #2 question not visible on page: "Boli li?""#
        );
        let err: &dyn std::error::Error = &validate_structure(&[]).unwrap_err();
        assert!(err.to_string().starts_with("malformed structured data: expected 4 objects"));
    }

    #[test]
    fn reformatted_punctuation_is_a_known_false_positive() {
        // The page renders a typographic apostrophe; the data has a plain one.
        let faq = faq_page(&[Faq::new("Šta je 'krunica'?", "Navlaka za zub.")]);
        let warnings = check_content_sync(&faq, "Šta je ’krunica’? Navlaka za zub.");
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn validate_page_combines_both_checks() {
        let set = plomba_set();
        let report = validate_page(&set, "Šta je plomba? Plomba je...");
        assert!(report.is_clean());

        let report = validate_page(&set, "Nešto sasvim drugo.");
        assert!(report.structure.is_ok());
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn find_faq_page_falls_back_to_search() {
        let mut set = plomba_set();
        set.swap(0, 3);
        assert!(find_faq_page(&set).is_some());
    }

    // =========================================================================
    // Emission policy
    // =========================================================================

    #[test]
    fn valid_structure_always_emits() {
        assert_eq!(decide_emission(ValidationMode::Advisory, &Ok(())), Emission::Emit);
        assert_eq!(decide_emission(ValidationMode::Blocking, &Ok(())), Emission::Emit);
    }

    #[test]
    fn advisory_mode_fails_open() {
        let broken = validate_structure(&[]);
        assert_eq!(decide_emission(ValidationMode::Advisory, &broken), Emission::Emit);
    }

    #[test]
    fn blocking_mode_fails_closed() {
        let broken = validate_structure(&[]);
        assert_eq!(decide_emission(ValidationMode::Blocking, &broken), Emission::Suppress);
    }

    #[test]
    fn validation_mode_serde_names() {
        assert_eq!(
            serde_json::to_string(&ValidationMode::Blocking).unwrap(),
            r#""blocking""#
        );
    }

    // =========================================================================
    // Rendered HTML
    // =========================================================================

    fn page_with(scripts: &str, body: &str) -> String {
        format!("<html><head>{scripts}</head><body>{body}</body></html>")
    }

    #[test]
    fn extract_handles_both_quote_styles() {
        let html = page_with(
            r#"<script type="application/ld+json">{"a":1}</script>
               <SCRIPT type='application/ld+json'>[{"b":2}]</SCRIPT>
               <script>var x = 1;</script>"#,
            "",
        );
        let blocks = extract_json_ld(&html);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].as_ref().unwrap()["a"], 1);
        assert!(blocks[1].as_ref().unwrap().is_array());
    }

    #[test]
    fn inspect_accepts_rendered_set_with_visible_faq() {
        let json = to_json_ld(&plomba_set()).unwrap();
        let html = page_with(
            &format!(r#"<script type="application/ld+json">{json}</script>"#),
            "<h2>Šta je plomba?</h2><p>Plomba je...</p>",
        );
        let report = inspect_html(&html);
        assert_eq!(report.scripts, 1);
        assert!(report.is_clean(), "{report:?}");
    }

    #[test]
    fn inspect_flags_hidden_faq() {
        let json = to_json_ld(&plomba_set()).unwrap();
        let html = page_with(
            &format!(r#"<script type="application/ld+json">{json}</script>"#),
            "<p>Bez pitanja.</p>",
        );
        let report = inspect_html(&html);
        assert!(report.structure.is_ok());
        assert_eq!(report.warnings.len(), 2);
        assert!(!report.has_errors());
    }

    #[test]
    fn inspect_page_without_json_ld_is_invalid() {
        let report = inspect_html(&page_with("", "<p>Ništa</p>"));
        assert_eq!(report.scripts, 0);
        assert!(report.has_errors());
        let err = report.structure.unwrap_err();
        assert!(err.issues.contains(&StructuralIssue::WrongLength { found: 0 }));
    }

    #[test]
    fn inspect_reports_unparseable_block() {
        let html = page_with(r#"<script type="application/ld+json">{oops</script>"#, "");
        let report = inspect_html(&html);
        assert_eq!(report.parse_errors.len(), 1);
        assert!(!report.is_clean());
        assert!(report.has_errors());
    }
}
