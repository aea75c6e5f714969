//! Slug generation for glossary anchors.

use std::collections::HashSet;

/// Label used when a term has no slug-able characters.
pub const DEFAULT_LABEL: &str = "term";

/// Generate an anchor slug from a term.
///
/// Lowercases, turns each whitespace run into one dash, drops everything
/// outside `[a-z0-9-]` and trims dashes from both ends. Existing dashes are
/// kept as they are.
///
/// # Examples
///
/// ```
/// use leetdown::markdown::slugify;
///
/// assert_eq!(slugify("Binary Search"), "binary-search");
/// assert_eq!(slugify("  Sub-array (contiguous)  "), "sub-array-contiguous");
/// assert_eq!(slugify("¿?"), "term");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut in_space = false;

    for c in text.trim().chars().flat_map(char::to_lowercase) {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            slug.push(c);
        }
    }

    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        DEFAULT_LABEL.to_string()
    } else {
        slug.to_string()
    }
}

/// Hands out unique labels, suffixing `-2`, `-3`, ... on collision.
#[derive(Debug, Clone, Default)]
pub struct LabelAllocator {
    used: HashSet<String>,
}

impl LabelAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slugify `term` and make the result unique.
    pub fn allocate(&mut self, term: &str) -> String {
        let base = slugify(term);
        if self.used.insert(base.clone()) {
            return base;
        }

        let mut n = 2;
        loop {
            let candidate = format!("{base}-{n}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Mark a label as taken without allocating it.
    pub fn reserve(&mut self, label: impl Into<String>) {
        self.used.insert(label.into());
    }

    pub fn contains(&self, label: &str) -> bool {
        self.used.contains(label)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}
