//! Glossary anchors: linking the first use of each term and rendering the
//! glossary section the links point at.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::slugify::LabelAllocator;

/// Fragment prefix shared by in-text links and section anchors.
pub const ANCHOR_PREFIX: &str = "glossary-";

/// Inline code spans, Markdown links/images and HTML anchors.
static PROTECTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)`(?:\\`|[^`])*`|!?\[[^\]]*\]\([^)]*\)|<a\b[^>]*>.*?</a>").unwrap()
});

/// A glossary term with its anchor label and Markdown body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryPair {
    pub term: String,
    /// Anchor label; left empty in input files to have one generated.
    #[serde(default)]
    pub label: String,
    #[serde(alias = "body")]
    pub markdown: String,
}

impl GlossaryPair {
    /// Build a pair whose label is allocated from `term`.
    pub fn new(
        term: impl Into<String>,
        markdown: impl Into<String>,
        labels: &mut LabelAllocator,
    ) -> Self {
        let term = term.into();
        let label = labels.allocate(&term);
        Self {
            term,
            label,
            markdown: markdown.into(),
        }
    }

    /// `#glossary-{label}`.
    pub fn href(&self) -> String {
        format!("#{ANCHOR_PREFIX}{}", self.label)
    }
}

/// Fill in missing labels, keeping the ones already present unique.
pub fn assign_labels(pairs: &mut [GlossaryPair]) {
    let mut labels = LabelAllocator::new();
    for pair in pairs.iter().filter(|p| !p.label.is_empty()) {
        labels.reserve(pair.label.clone());
    }
    for pair in pairs.iter_mut().filter(|p| p.label.is_empty()) {
        pair.label = labels.allocate(&pair.term);
    }
}

#[derive(Debug)]
struct Segment {
    text: String,
    fenced: bool,
}

/// Split Markdown into prose and fenced-code segments.
fn split_segments(markdown: &str) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut fence: Option<&'static str> = None;

    for line in markdown.split_inclusive('\n') {
        let marker = ["```", "~~~"].into_iter().find(|m| line.starts_with(m));
        let fenced = match (fence, marker) {
            (None, Some(m)) => {
                fence = Some(m);
                true
            }
            (Some(open), Some(m)) if open == m => {
                fence = None;
                true
            }
            (Some(_), _) => true,
            (None, None) => false,
        };

        match segments.last_mut() {
            Some(last) if last.fenced == fenced => last.text.push_str(line),
            _ => segments.push(Segment {
                text: line.to_string(),
                fenced,
            }),
        }
    }

    segments
}

fn is_term_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// First whole-word occurrence of `term` outside protected spans.
fn find_term(text: &str, term: &str) -> Option<Range<usize>> {
    let protected: Vec<Range<usize>> = PROTECTED.find_iter(text).map(|m| m.range()).collect();

    text.match_indices(term).map(|(start, _)| start..start + term.len()).find(|range| {
        let before = text[..range.start].chars().next_back();
        let after = text[range.end..].chars().next();
        !before.is_some_and(is_term_char)
            && !after.is_some_and(is_term_char)
            && !protected
                .iter()
                .any(|p| p.start < range.end && range.start < p.end)
    })
}

/// Link the first prose occurrence of each term to its glossary anchor.
///
/// Fenced code is never touched, and neither is text that is already
/// inline code, a link or an anchor. Each label is linked at most once.
///
/// # Examples
///
/// ```
/// use leetdown::markdown::{GlossaryPair, LabelAllocator, inject_anchors};
///
/// let mut labels = LabelAllocator::new();
/// let pairs = vec![GlossaryPair::new("subarray", "A contiguous part.", &mut labels)];
/// let out = inject_anchors("Find a subarray. Any subarray.", &pairs);
/// assert_eq!(out, "Find a [subarray](#glossary-subarray). Any subarray.");
/// ```
pub fn inject_anchors(markdown: &str, pairs: &[GlossaryPair]) -> String {
    let mut segments = split_segments(markdown);
    let mut linked: HashSet<&str> = HashSet::new();

    for pair in pairs {
        if pair.term.is_empty() || linked.contains(pair.label.as_str()) {
            continue;
        }

        for segment in segments.iter_mut().filter(|s| !s.fenced) {
            let Some(range) = find_term(&segment.text, &pair.term) else {
                continue;
            };
            let link = format!("[{}]({})", pair.term, pair.href());
            segment.text.replace_range(range, &link);
            linked.insert(pair.label.as_str());
            break;
        }
    }

    log::debug!("glossary: linked {}/{} terms", linked.len(), pairs.len());
    segments.into_iter().map(|s| s.text).collect()
}

/// Render the `## Glossary` section for every pair.
///
/// An empty pair list renders as an empty string.
pub fn build_section(pairs: &[GlossaryPair]) -> String {
    if pairs.is_empty() {
        return String::new();
    }

    let entries: Vec<String> = pairs
        .iter()
        .map(|pair| {
            let mut entry = format!(
                "<a id=\"{ANCHOR_PREFIX}{}\"></a>\n**{}**",
                pair.label,
                pair.term.trim()
            );
            let body = hard_breaks(&pair.markdown);
            if !body.is_empty() {
                entry.push_str("  \n");
                entry.push_str(&body);
            }
            entry
        })
        .collect();

    format!("## Glossary\n\n{}\n", entries.join("\n\n"))
}

/// Link terms in `markdown` and append the glossary section.
pub fn append_glossary(markdown: &str, pairs: &[GlossaryPair]) -> String {
    let linked = inject_anchors(markdown, pairs);
    let section = build_section(pairs);
    if section.is_empty() {
        return linked;
    }
    let body = linked.trim_end();
    if body.is_empty() {
        return section;
    }
    format!("{body}\n\n{section}")
}

fn hard_breaks(text: &str) -> String {
    text.trim()
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("  \n")
}
