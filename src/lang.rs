//! Editor language ids → display labels and code-fence info strings.

use std::sync::LazyLock;

use regex::Regex;

static PYTHON_LABEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^python").unwrap());

/// A known language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// Canonical editor id.
    pub id: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Code-fence info string.
    pub fence: &'static str,
    pub aliases: &'static [&'static str],
}

const fn lang(
    id: &'static str,
    label: &'static str,
    fence: &'static str,
    aliases: &'static [&'static str],
) -> Language {
    Language {
        id,
        label,
        fence,
        aliases,
    }
}

pub const LANGUAGES: &[Language] = &[
    lang("python", "Python", "python", &["py", "python3", "py3", "python2"]),
    lang("cpp", "C++", "cpp", &["c++", "cc", "cxx"]),
    lang("java", "Java", "java", &[]),
    lang("javascript", "JavaScript", "javascript", &["js", "node", "nodejs"]),
    lang("typescript", "TypeScript", "typescript", &["ts"]),
    lang("csharp", "C#", "csharp", &["c#", "cs"]),
    lang("go", "Go", "go", &["golang"]),
    lang("kotlin", "Kotlin", "kotlin", &["kt"]),
    lang("swift", "Swift", "swift", &[]),
    lang("php", "PHP", "php", &[]),
    lang("ruby", "Ruby", "ruby", &["rb"]),
    lang("rust", "Rust", "rust", &["rs"]),
    lang("scala", "Scala", "scala", &[]),
    lang("r", "R", "r", &[]),
    lang("sql", "SQL", "sql", &["mysql", "mssql", "oraclesql", "postgresql"]),
    lang("bash", "Bash", "bash", &["sh", "shell", "zsh"]),
    lang("text", "Text", "text", &["plaintext", "txt"]),
];

/// Look a language up by canonical id (case-insensitive).
pub fn by_id(id: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.id.eq_ignore_ascii_case(id))
}

/// Look a language up by alias (case-insensitive).
pub fn by_alias(alias: &str) -> Option<&'static Language> {
    LANGUAGES
        .iter()
        .find(|l| l.aliases.iter().any(|a| a.eq_ignore_ascii_case(alias)))
}

fn by_label(label: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.label.eq_ignore_ascii_case(label))
}

/// Resolves display labels, aware of which snippet languages the problem offers.
#[derive(Debug, Clone, Default)]
pub struct LanguageResolver {
    snippet_slugs: Vec<String>,
}

impl LanguageResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver that knows the problem's code-snippet language slugs.
    pub fn with_snippets<I, S>(slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            snippet_slugs: slugs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn add_snippet(&mut self, slug: impl Into<String>) {
        self.snippet_slugs.push(slug.into());
    }

    /// Display label for an editor language.
    ///
    /// A non-empty `explicit` label always wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use leetdown::lang::LanguageResolver;
    ///
    /// let resolver = LanguageResolver::with_snippets(["cpp", "python3"]);
    /// assert_eq!(resolver.resolve_label("python", None), "Python3");
    /// assert_eq!(resolver.resolve_label("csharp", None), "C#");
    /// assert_eq!(resolver.resolve_label("elixir", None), "Elixir");
    /// assert_eq!(resolver.resolve_label("go", Some("Go 1.21")), "Go 1.21");
    /// ```
    pub fn resolve_label(&self, editor_id: &str, explicit: Option<&str>) -> String {
        if let Some(label) = explicit.map(str::trim).filter(|l| !l.is_empty()) {
            return label.to_string();
        }

        let id = editor_id.trim();
        if id.is_empty() {
            return "Text".to_string();
        }
        if id.eq_ignore_ascii_case("python3") {
            return "Python3".to_string();
        }
        if id.eq_ignore_ascii_case("python") {
            let has_python3 = self.snippet_slugs.iter().any(|s| s == "python3");
            return if has_python3 { "Python3" } else { "Python" }.to_string();
        }

        match by_id(id).or_else(|| by_alias(id)) {
            Some(lang) => lang.label.to_string(),
            None => capitalize(id),
        }
    }
}

/// Fence info string for a label or editor id.
///
/// Anything labelled Python fences as `python`; unknown names fence as
/// themselves, lowercased.
///
/// ```
/// use leetdown::lang::fence_for;
///
/// assert_eq!(fence_for("Python3"), "python");
/// assert_eq!(fence_for("C++"), "cpp");
/// assert_eq!(fence_for("Elixir"), "elixir");
/// assert_eq!(fence_for(""), "text");
/// ```
pub fn fence_for(label_or_id: &str) -> String {
    let name = label_or_id.trim();
    if name.is_empty() {
        return "text".to_string();
    }
    if PYTHON_LABEL.is_match(name) {
        return "python".to_string();
    }

    match by_id(name).or_else(|| by_label(name)).or_else(|| by_alias(name)) {
        Some(lang) => lang.fence.to_string(),
        None => name.to_lowercase(),
    }
}

fn capitalize(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
