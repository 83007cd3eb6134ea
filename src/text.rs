//! Plain-text extraction and matching helpers.
//!
//! Record bodies arrive as markdown (which may embed raw HTML, as CMS rich
//! text exports often do), and rendered pages are HTML. The structured-data
//! code only ever reasons about the *visible* words, so everything funnels
//! through the same pipeline:
//!
//! ```text
//! markdown ──pulldown-cmark──▶ HTML ──strip <script>/<style>──▶ strip tags
//!          ──decode entities──▶ collapse whitespace ──▶ plain text
//! ```
//!
//! Sentence splitting is deliberately simple: a sentence ends at `.`, `!` or
//! `?` followed by whitespace or end of text. Abbreviations such as "dr."
//! split early; the FAQ heuristic tolerates that.

use pulldown_cmark::{Parser, html as md_html};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static SCRIPT_OR_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
        .expect("script/style pattern is valid")
});

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]{1,6}|#[0-9]{1,7}|[a-zA-Z]{2,8});")
        .expect("entity pattern is valid")
});

/// Render markdown (or markdown with embedded HTML) to HTML.
pub fn markdown_to_html(body: &str) -> String {
    let parser = Parser::new(body);
    let mut out = String::with_capacity(body.len() + body.len() / 2);
    md_html::push_html(&mut out, parser);
    out
}

/// Plain text of a markdown/HTML record body.
pub fn plain_text(body: &str) -> String {
    visible_text(&markdown_to_html(body))
}

/// Text a visitor would see on an HTML page.
///
/// Drops `<script>` and `<style>` elements with their contents (the JSON-LD
/// payload must never count as visible), removes tags, decodes entities and
/// collapses whitespace.
pub fn visible_text(html: &str) -> String {
    let without_code = SCRIPT_OR_STYLE.replace_all(html, " ");
    let stripped = strip_tags(&without_code);
    collapse_whitespace(&decode_entities(&stripped))
}

/// Inline elements that sit inside a word run and must not split it.
const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "code", "del", "em", "i", "ins", "mark", "s", "small", "span", "strong",
    "sub", "sup", "u",
];

/// Strip HTML tags from a string (simple angle-bracket stripping).
///
/// Block-level tags become a space so adjacent blocks don't glue words;
/// inline tags vanish so `<strong>Ne</strong>,` stays `Ne,`.
pub fn strip_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut tag = String::new();
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' if !in_tag => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                if !is_inline_tag(&tag) {
                    result.push(' ');
                }
            }
            _ if in_tag => tag.push(c),
            _ => result.push(c),
        }
    }
    result
}

fn is_inline_tag(tag: &str) -> bool {
    let name: String = tag
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    INLINE_TAGS.contains(&name.as_str())
}

/// Decode named and numeric HTML character references.
///
/// Unknown named references are left untouched.
pub fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            let decoded = if let Some(hex) = name.strip_prefix("#x").or(name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match name {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    "ndash" => Some('–'),
                    "mdash" => Some('—'),
                    "hellip" => Some('…'),
                    _ => None,
                }
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Collapse every run of whitespace into a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercased, whitespace-collapsed form used for substring matching.
pub fn normalize_for_match(text: &str) -> String {
    collapse_whitespace(&text.to_lowercase())
}

/// First `n` whitespace-separated words of `text`, joined by single spaces.
pub fn first_words(text: &str, n: usize) -> String {
    text.split_whitespace().take(n).collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max_chars` characters, preferring a word boundary.
///
/// Text that already fits is returned unchanged (trimmed). A single word
/// longer than the limit is cut mid-word.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, next)) => {
            let head = &text[..cut];
            if next.is_whitespace() {
                return head.trim_end().to_string();
            }
            match head.rfind(char::is_whitespace) {
                Some(pos) if pos > 0 => head[..pos].trim_end().to_string(),
                _ => head.to_string(),
            }
        }
    }
}

/// Whether `slug` can stand alone as one URL path segment and one output
/// directory name.
pub fn is_path_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug
            .chars()
            .any(|c| matches!(c, '/' | '\\') || c.is_control())
}

/// URL slug for a title: lowercase ASCII, Serbian diacritics transliterated,
/// every other run of non-alphanumerics collapsed into one dash.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars().flat_map(char::to_lowercase) {
        let mapped = match c {
            'č' | 'ć' => "c",
            'š' => "s",
            'ž' => "z",
            'đ' => "dj",
            c if c.is_ascii_alphanumeric() => {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(c);
                continue;
            }
            _ => {
                pending_dash = true;
                continue;
            }
        };
        if pending_dash && !slug.is_empty() {
            slug.push('-');
        }
        pending_dash = false;
        slug.push_str(mapped);
    }
    slug
}

/// A sentence located in a larger text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    /// Sentence text including its terminal punctuation.
    pub text: &'a str,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Sentence<'_> {
    pub fn is_question(&self) -> bool {
        self.text.ends_with('?')
    }
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Split text into sentences.
///
/// A sentence ends at a run of `.`, `!` or `?` followed by whitespace or
/// end of input. Trailing text without terminal punctuation is returned as
/// a final sentence.
pub fn sentences(text: &str) -> Vec<Sentence<'_>> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if start.is_none() {
            if c.is_whitespace() {
                continue;
            }
            start = Some(idx);
        }
        if !is_terminator(c) {
            continue;
        }
        let mut end = idx + c.len_utf8();
        while let Some(&(next_idx, next)) = chars.peek() {
            if is_terminator(next) {
                end = next_idx + next.len_utf8();
                chars.next();
            } else {
                break;
            }
        }
        let at_boundary = chars.peek().is_none_or(|&(_, next)| next.is_whitespace());
        if !at_boundary {
            continue;
        }
        if let Some(s) = start.take() {
            out.push(Sentence {
                text: &text[s..end],
                start: s,
                end,
            });
        }
    }

    if let Some(s) = start {
        let tail = text[s..].trim_end();
        if !tail.is_empty() {
            out.push(Sentence {
                text: tail,
                start: s,
                end: s + tail.len(),
            });
        }
    }
    out
}
