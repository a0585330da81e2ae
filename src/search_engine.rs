use log::debug;
use regex::{Regex, RegexBuilder};

use crate::content_index::ContentIndex;

/// Minimum query length (in characters, after trimming) before a search runs.
const MIN_QUERY_CHARS: usize = 2;
/// Characters of context kept on each side of the first match.
const EXCERPT_RADIUS: usize = 80;
const ELLIPSIS: &str = "...";

/// Outcome of one search invocation. An empty result list is a valid
/// "no results" answer, distinct from a query that was too short to run.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    InsufficientQuery,
    Results(Vec<SearchResult>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub section_id: String,
    pub section_title: String,
    pub excerpt: Excerpt,
    /// Byte offset of the first match within the section body.
    pub match_offset: usize,
}

/// Plain excerpt text plus the byte ranges to render highlighted.
/// Ranges cover every case-insensitive occurrence of the query within
/// the excerpt text, ellipsis markers included.
#[derive(Debug, Clone, PartialEq)]
pub struct Excerpt {
    pub text: String,
    pub highlights: Vec<(usize, usize)>,
}

#[derive(Debug, Clone)]
struct IndexedSection {
    id: String,
    title: String,
    body: String,
}

/// Literal substring search over the article's sections. Results come
/// back in document order; no relevance ranking.
pub struct SearchEngine {
    sections: Vec<IndexedSection>,
}

impl SearchEngine {
    pub fn from_index(index: &ContentIndex) -> Self {
        let sections = index
            .sections()
            .iter()
            .map(|s| IndexedSection {
                id: s.id.clone(),
                title: s.title.clone(),
                body: s.body.clone(),
            })
            .collect();
        Self { sections }
    }

    /// Pure function of the query and the indexed content: no side
    /// effects, fresh results on every call.
    pub fn search(&self, query: &str) -> SearchOutcome {
        let trimmed = query.trim();
        if trimmed.chars().count() < MIN_QUERY_CHARS {
            return SearchOutcome::InsufficientQuery;
        }

        // The query is escaped so metacharacters match only literally.
        // User input must never alter the pattern's meaning.
        let pattern = match RegexBuilder::new(&regex::escape(trimmed))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => pattern,
            Err(e) => {
                log::error!("Failed to compile search pattern for {trimmed:?}: {e}");
                return SearchOutcome::Results(Vec::new());
            }
        };

        let mut results = Vec::new();
        for section in &self.sections {
            let Some(first) = pattern.find(&section.body) else {
                continue;
            };
            let excerpt = extract_excerpt(&section.body, first.start(), first.end(), &pattern);
            results.push(SearchResult {
                section_id: section.id.clone(),
                section_title: section.title.clone(),
                excerpt,
                match_offset: first.start(),
            });
        }

        debug!("Search for {trimmed:?} matched {} sections", results.len());
        SearchOutcome::Results(results)
    }
}

/// Cut a window of `EXCERPT_RADIUS` characters around the first match,
/// clamped to the text bounds, with ellipsis markers where the window
/// does not reach an edge. Highlights are recomputed against the final
/// excerpt text so every visible occurrence is covered.
fn extract_excerpt(body: &str, match_start: usize, match_end: usize, pattern: &Regex) -> Excerpt {
    let mut boundaries: Vec<usize> = body.char_indices().map(|(i, _)| i).collect();
    boundaries.push(body.len());

    // Match offsets from the regex always fall on char boundaries.
    let start_char = boundaries.partition_point(|&b| b < match_start);
    let end_char = boundaries.partition_point(|&b| b < match_end);

    let window_start_char = start_char.saturating_sub(EXCERPT_RADIUS);
    let window_end_char = (end_char + EXCERPT_RADIUS).min(boundaries.len() - 1);

    let window_start = boundaries[window_start_char];
    let window_end = boundaries[window_end_char];

    let leading = window_start > 0;
    let trailing = window_end < body.len();

    let mut text = String::new();
    if leading {
        text.push_str(ELLIPSIS);
    }
    text.push_str(body[window_start..window_end].trim());
    if trailing {
        text.push_str(ELLIPSIS);
    }

    let highlights = pattern
        .find_iter(&text)
        .map(|m| (m.start(), m.end()))
        .collect();

    Excerpt { text, highlights }
}
