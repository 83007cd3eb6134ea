//! Heuristic FAQ extraction for records that carry no explicit FAQ entries.
//!
//! Output order is fixed: the synthesized "what is" question first, then
//! questions found in the body in document order, then filler questions
//! until there are at least [`MIN_ENTRIES`]. The list never exceeds
//! [`MAX_ENTRIES`].
//!
//! ```text
//! "Da li je bezbedno? Da, potpuno je bezbedno i testirano."
//!  └── question ─────┘ └── answer (next sentence, ≤ window) ──┘
//! ```

use crate::config::FaqConfig;
use crate::text;
use crate::types::Faq;
use std::collections::HashSet;

/// Hard cap on generated entries.
pub const MAX_ENTRIES: usize = 10;

/// Entries guaranteed when the generator runs at all.
pub const MIN_ENTRIES: usize = 3;

/// Extracted questions shorter than this (without `?`) are ignored.
const MIN_QUESTION_CHARS: usize = 3;

const TITLE_PLACEHOLDER: &str = "{title}";

/// FAQ generator configured from the `[faq]` section.
#[derive(Debug, Clone)]
pub struct FaqGenerator {
    config: FaqConfig,
}

impl FaqGenerator {
    pub fn new(config: &FaqConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn limit(&self) -> usize {
        self.config.max_entries.clamp(MIN_ENTRIES, MAX_ENTRIES)
    }

    /// Derive question/answer pairs from a record's title and markdown body.
    pub fn generate(&self, title: &str, body: &str) -> Vec<Faq> {
        let title = title.trim();
        let plain = text::plain_text(body);
        let mut faqs = FaqList::new(self.limit());

        let intro_answer = match text::truncate_chars(&plain, self.config.intro_window) {
            a if a.is_empty() => title.to_string(),
            a => a,
        };
        faqs.push(Faq::new(
            fill_title(&self.config.intro_question, title),
            intro_answer,
        ));

        for faq in extract_questions(&plain, self.config.answer_window) {
            faqs.push(faq);
        }

        let fillers = [
            (&self.config.how_question, &self.config.how_answer),
            (&self.config.safety_question, &self.config.safety_answer),
        ];
        for (question, answer) in fillers {
            if faqs.len() >= MIN_ENTRIES {
                break;
            }
            faqs.push(Faq::new(fill_title(question, title), answer.clone()));
        }

        let faqs = faqs.into_vec();
        tracing::debug!(title, count = faqs.len(), "generated FAQ entries");
        faqs
    }
}

fn fill_title(template: &str, title: &str) -> String {
    template.replace(TITLE_PLACEHOLDER, title)
}

/// Question sentences paired with the sentence that follows them.
fn extract_questions(plain: &str, window: usize) -> Vec<Faq> {
    let sentences = text::sentences(plain);
    sentences
        .iter()
        .zip(sentences.iter().skip(1))
        .filter(|(question, answer)| question.is_question() && !answer.is_question())
        .filter(|(question, _)| {
            question.text.trim_end_matches('?').trim().chars().count() >= MIN_QUESTION_CHARS
        })
        .filter_map(|(question, answer)| {
            let answer = text::truncate_chars(answer.text, window);
            (!answer.is_empty()).then(|| Faq::new(question.text.trim(), answer))
        })
        .collect()
}

/// Bounded list that drops questions it has already seen.
struct FaqList {
    entries: Vec<Faq>,
    seen: HashSet<String>,
    limit: usize,
}

impl FaqList {
    fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            seen: HashSet::new(),
            limit,
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn push(&mut self, faq: Faq) {
        if self.entries.len() >= self.limit {
            return;
        }
        let key = text::normalize_for_match(faq.question.trim_end_matches('?'));
        if self.seen.insert(key) {
            self.entries.push(faq);
        }
    }

    fn into_vec(self) -> Vec<Faq> {
        self.entries
    }
}
