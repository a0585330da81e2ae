use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::content_index::{ContentIndex, Section};

/// A parsed article: display title, optional canonical URL for share
/// actions, the section snapshot, and in-article cross-references.
#[derive(Debug, Clone)]
pub struct Article {
    pub title: String,
    pub url: Option<String>,
    pub index: ContentIndex,
    pub cross_refs: Vec<CrossRef>,
}

/// An anchor link found in a section body, pointing at another section.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossRef {
    pub section_id: String,
    pub target_id: String,
}

#[derive(Debug, Default, Deserialize)]
struct FrontMatter {
    title: Option<String>,
    url: Option<String>,
}

static LINK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]*)\)").expect("link pattern is valid"));

static EXPLICIT_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)\s*\{#([A-Za-z0-9_-]+)\}\s*$").expect("id pattern is valid"));

impl Article {
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read article from {}", path.display()))?;
        Self::from_markdown(&source)
    }

    pub fn from_markdown(source: &str) -> Result<Self> {
        let (front_matter, body) = split_front_matter(source);

        let mut title = front_matter.title.unwrap_or_default();
        let mut sections: Vec<Section> = Vec::new();
        let mut cross_refs = Vec::new();
        let mut slugs: HashMap<String, usize> = HashMap::new();

        let mut current: Option<(String, String, Vec<String>)> = None; // (id, title, body lines)

        for line in body.lines() {
            if let Some(heading) = line.strip_prefix("## ") {
                if let Some(section) = current.take() {
                    push_section(&mut sections, &mut cross_refs, section);
                }
                let (section_title, id) = heading_title_and_id(heading, &mut slugs);
                current = Some((id, section_title, Vec::new()));
            } else if let Some(heading) = line.strip_prefix("# ") {
                if title.is_empty() {
                    title = heading.trim().to_string();
                } else {
                    debug!("Ignoring extra top-level heading {heading:?}");
                }
            } else if let Some((_, _, lines)) = current.as_mut() {
                lines.push(line.to_string());
            } else if !line.trim().is_empty() {
                debug!("Ignoring prose before the first section heading");
            }
        }
        if let Some(section) = current.take() {
            push_section(&mut sections, &mut cross_refs, section);
        }

        Ok(Self {
            title,
            url: front_matter.url,
            index: ContentIndex::new(sections),
            cross_refs,
        })
    }

    /// Cross-references originating in the given section, in order.
    pub fn refs_from(&self, section_id: &str) -> impl Iterator<Item = &CrossRef> {
        self.cross_refs
            .iter()
            .filter(move |r| r.section_id == section_id)
    }
}

fn split_front_matter(source: &str) -> (FrontMatter, &str) {
    let Some(rest) = source.strip_prefix("---\n") else {
        return (FrontMatter::default(), source);
    };
    let Some(end) = rest.find("\n---") else {
        return (FrontMatter::default(), source);
    };
    let yaml = &rest[..end];
    let body = rest[end + 4..].trim_start_matches('\n');
    match serde_yaml::from_str::<FrontMatter>(yaml) {
        Ok(front_matter) => (front_matter, body),
        Err(e) => {
            log::error!("Failed to parse article front matter: {e}");
            (FrontMatter::default(), body)
        }
    }
}

fn heading_title_and_id(heading: &str, slugs: &mut HashMap<String, usize>) -> (String, String) {
    let heading = heading.trim();
    let (title, explicit) = match EXPLICIT_ID_PATTERN.captures(heading) {
        Some(captures) => (
            captures.get(1).map_or("", |m| m.as_str()).to_string(),
            Some(captures.get(2).map_or("", |m| m.as_str()).to_string()),
        ),
        None => (heading.to_string(), None),
    };
    let base = explicit.unwrap_or_else(|| slugify(&title));
    let id = dedup_slug(base, slugs);
    (title, id)
}

fn slugify(title: &str) -> String {
    let mut slug = String::new();
    let mut pending_separator = false;
    for c in title.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_separator = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("section");
    }
    slug
}

fn dedup_slug(base: String, slugs: &mut HashMap<String, usize>) -> String {
    let count = slugs.entry(base.clone()).or_insert(0);
    *count += 1;
    if *count == 1 {
        base
    } else {
        format!("{base}-{count}")
    }
}

fn push_section(
    sections: &mut Vec<Section>,
    cross_refs: &mut Vec<CrossRef>,
    (id, title, lines): (String, String, Vec<String>),
) {
    let raw_body = lines.join("\n");
    let body = strip_links(&raw_body, &id, cross_refs);
    sections.push(Section {
        id,
        title,
        body: body.trim().to_string(),
    });
}

/// Replace markdown link syntax with its text. Anchor targets become
/// cross-references; the literal empty anchor is dropped so it can
/// never reach the navigator.
fn strip_links(body: &str, section_id: &str, cross_refs: &mut Vec<CrossRef>) -> String {
    LINK_PATTERN
        .replace_all(body, |captures: &regex::Captures| {
            let text = captures.get(1).map_or("", |m| m.as_str());
            let target = captures.get(2).map_or("", |m| m.as_str());
            if let Some(anchor) = target.strip_prefix('#') {
                if !anchor.is_empty() {
                    cross_refs.push(CrossRef {
                        section_id: section_id.to_string(),
                        target_id: anchor.to_string(),
                    });
                }
            }
            text.to_string()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
---
title: Trends Report
url: https://example.com/trends
---

## Introduction

Hello world of agents. See [the outlook](#outlook) for more.

## Deep Dive {#custom-dive}

Body of the dive, with an [external link](https://example.com) and
a [broken](#) anchor.

## Deep Dive

Same heading again.

## Outlook

Closing thoughts.
";

    #[test]
    fn test_front_matter_title_and_url() {
        let article = Article::from_markdown(SAMPLE).unwrap();
        assert_eq!(article.title, "Trends Report");
        assert_eq!(article.url.as_deref(), Some("https://example.com/trends"));
    }

    #[test]
    fn test_title_from_heading_without_front_matter() {
        let article = Article::from_markdown("# Plain Title\n\n## One\n\nBody.\n").unwrap();
        assert_eq!(article.title, "Plain Title");
        assert_eq!(article.url, None);
    }

    #[test]
    fn test_sections_and_slugs() {
        let article = Article::from_markdown(SAMPLE).unwrap();
        let ids: Vec<&str> = article
            .index
            .sections()
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["introduction", "custom-dive", "deep-dive", "outlook"]);
        assert_eq!(article.index.get("custom-dive").unwrap().title, "Deep Dive");
    }

    #[test]
    fn test_duplicate_headings_get_unique_slugs() {
        let article =
            Article::from_markdown("## Setup\n\na\n\n## Setup\n\nb\n\n## Setup\n\nc\n").unwrap();
        let ids: Vec<&str> = article
            .index
            .sections()
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["setup", "setup-2", "setup-3"]);
    }

    #[test]
    fn test_link_markup_is_stripped_from_bodies() {
        let article = Article::from_markdown(SAMPLE).unwrap();
        let intro = article.index.get("introduction").unwrap();
        assert!(intro.body.contains("See the outlook for more."));
        assert!(!intro.body.contains('['));

        let dive = article.index.get("custom-dive").unwrap();
        assert!(dive.body.contains("an external link and"));
    }

    #[test]
    fn test_anchor_refs_recorded_and_empty_anchor_dropped() {
        let article = Article::from_markdown(SAMPLE).unwrap();
        let refs: Vec<&CrossRef> = article.refs_from("introduction").collect();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].target_id, "outlook");

        // The `(#)` link in custom-dive is discarded; the external
        // https link is not a cross-reference either.
        assert_eq!(article.refs_from("custom-dive").count(), 0);
    }

    #[test]
    fn test_slugify_handles_punctuation_and_case() {
        let mut slugs = HashMap::new();
        let (title, id) = heading_title_and_id("AI & Agents: 2026!", &mut slugs);
        assert_eq!(title, "AI & Agents: 2026!");
        assert_eq!(id, "ai-agents-2026");
    }
}
