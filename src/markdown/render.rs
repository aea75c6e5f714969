//! Markup tree → Markdown rendering.
//!
//! Each node renders to a string and sibling strings are combined with
//! [`push_joined`]. Code is the exception: `pre` blocks are rendered from
//! their raw text so indentation and line breaks survive untouched.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::dom::{MarkupDom, NodeData, NodeId, parse_html};

use super::escape::{
    calculate_fence_length, collapse_blank_lines, collapse_whitespace, escape_inline_code,
    escape_table_cell,
};
use super::image::{ImageEmbedResult, ImageFetcher, ImageStats, embed_image, resolve_url};
use super::join::push_joined;
use super::tag::Tag;

/// Default per-image fetch timeout.
pub const DEFAULT_IMAGE_TIMEOUT: Duration = Duration::from_secs(20);

/// Configuration for a conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Base for resolving relative `href`/`src` values.
    pub base_url: Option<Url>,
    /// Replace image sources with base64 data URLs.
    pub inline_images: bool,
    /// Budget handed to the fetcher for each image.
    pub image_timeout: Duration,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            inline_images: false,
            image_timeout: DEFAULT_IMAGE_TIMEOUT,
        }
    }
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn with_inline_images(mut self, inline_images: bool) -> Self {
        self.inline_images = inline_images;
        self
    }

    pub fn with_image_timeout(mut self, timeout: Duration) -> Self {
        self.image_timeout = timeout;
        self
    }
}

/// Output of a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResult {
    pub markdown: String,
    pub image_stats: ImageStats,
    /// One record per `<img>` with a source, in document order.
    pub image_details: Vec<ImageEmbedResult>,
}

/// Renders nodes of one tree, remembering image results across runs.
///
/// The side map is keyed by [`NodeId`], so converting the same subtree twice
/// fetches each image only once.
pub struct Converter<'a, F: ImageFetcher + ?Sized> {
    dom: &'a MarkupDom,
    options: ConvertOptions,
    fetcher: &'a mut F,
    embeds: HashMap<NodeId, ImageEmbedResult>,
    pass_images: Vec<NodeId>,
}

impl<'a, F: ImageFetcher + ?Sized> Converter<'a, F> {
    pub fn new(dom: &'a MarkupDom, options: ConvertOptions, fetcher: &'a mut F) -> Self {
        Self {
            dom,
            options,
            fetcher,
            embeds: HashMap::new(),
            pass_images: Vec::new(),
        }
    }

    /// Image results recorded so far, keyed by `<img>` node.
    pub fn embeds(&self) -> &HashMap<NodeId, ImageEmbedResult> {
        &self.embeds
    }

    /// Convert the subtree rooted at `node`.
    pub fn convert(&mut self, node: NodeId) -> ConvertResult {
        self.pass_images.clear();
        let raw = self.render(node, 0);
        let markdown = collapse_blank_lines(raw.trim());

        let mut image_stats = ImageStats::default();
        let image_details: Vec<ImageEmbedResult> = self
            .pass_images
            .iter()
            .filter_map(|id| self.embeds.get(id).cloned())
            .collect();
        for detail in &image_details {
            image_stats.record(detail);
        }
        if image_stats.total > 0 {
            log::debug!("{image_stats}");
        }

        ConvertResult {
            markdown,
            image_stats,
            image_details,
        }
    }

    fn render(&mut self, id: NodeId, depth: usize) -> String {
        let Some(node) = self.dom.get(id) else {
            return String::new();
        };

        match &node.data {
            NodeData::Text(text) => render_text(text),
            NodeData::Comment(_) => String::new(),
            NodeData::Document => self.render_children(id, depth),
            NodeData::Element { tag, .. } => self.render_element(id, Tag::from_name(tag), depth),
        }
    }

    fn render_children(&mut self, id: NodeId, depth: usize) -> String {
        let dom = self.dom;
        let mut out = String::new();
        for child in dom.children(id) {
            let fragment = self.render(child, depth);
            push_joined(&mut out, &fragment);
        }
        out
    }

    fn render_element(&mut self, id: NodeId, tag: Tag, depth: usize) -> String {
        match tag {
            Tag::Heading(level) => {
                let text = self.render_children(id, depth);
                let text = text.trim();
                if text.is_empty() {
                    return String::new();
                }
                format!("\n{} {}\n\n", "#".repeat(level as usize), text)
            }

            Tag::Block => {
                let dom = self.dom;
                let mut element_tags = dom
                    .element_children(id)
                    .map(|c| Tag::from_name(dom.tag(c).unwrap_or_default()))
                    .peekable();
                let only_blocks =
                    element_tags.peek().is_some() && element_tags.all(Tag::is_block_child);

                let inner = self.render_children(id, depth);
                if only_blocks {
                    return inner;
                }
                wrap_nonempty(inner.trim(), "", "\n\n")
            }

            Tag::Strong => {
                let inner = self.render_children(id, depth);
                wrap_nonempty(inner.trim(), "**", "**")
            }

            Tag::Emphasis => {
                let inner = self.render_children(id, depth);
                wrap_nonempty(inner.trim(), "*", "*")
            }

            Tag::Code if self.dom.has_ancestor(id, "pre") => self.render_code_block(id),

            Tag::Code => {
                let content = self.code_text(id);
                if content.trim().is_empty() {
                    return String::new();
                }
                format!("`{}`", escape_inline_code(&content))
            }

            Tag::Pre => self.render_code_block(id),

            Tag::Sup => self.render_script(id, '^'),

            Tag::Sub => self.render_script(id, '_'),

            Tag::UnorderedList => self.render_list(id, false, depth),

            Tag::OrderedList => self.render_list(id, true, depth),

            Tag::Link => {
                let text = self.render_children(id, depth);
                let text = text.trim();
                let href = self.dom.attr(id, "href").map(str::trim).unwrap_or_default();
                if href.is_empty() {
                    return text.to_string();
                }
                let url = resolve_url(self.options.base_url.as_ref(), href);
                let text = if text.is_empty() { url.as_str() } else { text };
                format!("[{text}]({url})")
            }

            Tag::Image => self.render_image(id),

            Tag::BlockQuote => {
                let inner = self.render_children(id, depth);
                let inner = inner.trim();
                if inner.is_empty() {
                    return String::new();
                }
                let quoted: Vec<String> = inner.lines().map(|line| format!("> {line}")).collect();
                format!("\n{}\n\n", quoted.join("\n"))
            }

            Tag::Rule => "\n---\n\n".to_string(),

            Tag::Table => self.render_table(id, depth),

            Tag::Hidden => String::new(),

            Tag::ListItem | Tag::Other => self.render_children(id, depth),
        }
    }

    fn render_script(&self, id: NodeId, marker: char) -> String {
        let mut text = String::new();
        for child in self.dom.children(id) {
            self.collect_code_text(child, &mut text);
        }
        text.retain(|c| !c.is_whitespace());
        if text.is_empty() {
            return String::new();
        }
        format!("{marker}{text}")
    }

    fn render_code_block(&self, id: NodeId) -> String {
        let text = self.code_text(id);
        let code = text.trim_end_matches(['\n', '\r']);
        if code.trim().is_empty() {
            return String::new();
        }

        let fence = "`".repeat(calculate_fence_length(code, '`'));
        let lang = self.code_language(id).unwrap_or_default();
        format!("\n{fence}{lang}\n{code}\n{fence}\n\n")
    }

    /// `language-X` / `lang-X` class on the block or on its `code` child.
    fn code_language(&self, id: NodeId) -> Option<&'a str> {
        let dom = self.dom;
        std::iter::once(id)
            .chain(dom.element_children(id).filter(|&c| dom.tag(c) == Some("code")))
            .flat_map(|n| dom.classes(n))
            .find_map(|class| {
                class
                    .strip_prefix("language-")
                    .or_else(|| class.strip_prefix("lang-"))
            })
            .filter(|lang| !lang.is_empty())
    }

    /// Plain text of a subtree, keeping `^`/`_` markers for sup/sub.
    fn code_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_code_text(id, &mut out);
        out
    }

    fn collect_code_text(&self, id: NodeId, out: &mut String) {
        let dom = self.dom;
        let Some(node) = dom.get(id) else {
            return;
        };
        let marker = match &node.data {
            NodeData::Text(text) => {
                out.push_str(text);
                return;
            }
            NodeData::Comment(_) => return,
            NodeData::Document => None,
            NodeData::Element { tag, .. } => match Tag::from_name(tag) {
                Tag::Sup => Some('^'),
                Tag::Sub => Some('_'),
                Tag::Hidden => return,
                _ => None,
            },
        };

        match marker {
            Some(marker) => {
                let mut inner = String::new();
                for child in dom.children(id) {
                    self.collect_code_text(child, &mut inner);
                }
                inner.retain(|c| !c.is_whitespace());
                if !inner.is_empty() {
                    out.push(marker);
                    out.push_str(&inner);
                }
            }
            None => {
                for child in dom.children(id) {
                    self.collect_code_text(child, out);
                }
            }
        }
    }

    fn render_list(&mut self, id: NodeId, ordered: bool, depth: usize) -> String {
        let dom = self.dom;
        let indent = "  ".repeat(depth);
        let mut lines = Vec::new();

        for (index, item) in dom
            .element_children(id)
            .filter(|&c| dom.tag(c) == Some("li"))
            .enumerate()
        {
            let content = self.render_children(item, depth + 1);
            let content = collapse_blank_lines(content.trim());
            if ordered {
                lines.push(format!("{indent}{}. {content}", index + 1));
            } else {
                lines.push(format!("{indent}- {content}"));
            }
        }

        if lines.is_empty() {
            return String::new();
        }
        let body = lines.join("\n");
        if depth == 0 {
            format!("\n{body}\n\n")
        } else {
            format!("\n{body}\n")
        }
    }

    fn render_image(&mut self, id: NodeId) -> String {
        let dom = self.dom;
        let Some(src) = dom.attr(id, "src").map(str::trim).filter(|s| !s.is_empty()) else {
            return String::new();
        };

        let result = match self.embeds.get(&id) {
            Some(existing) => existing.clone(),
            None => {
                let url = resolve_url(self.options.base_url.as_ref(), src);
                let result = if self.options.inline_images || url.starts_with("data:") {
                    embed_image(&mut *self.fetcher, &url, self.options.image_timeout)
                } else {
                    ImageEmbedResult::skipped(&url)
                };
                self.embeds.insert(id, result.clone());
                result
            }
        };
        self.pass_images.push(id);

        let alt = dom.attr(id, "alt").map(str::trim).unwrap_or_default();
        let alt = match result.alt_warning() {
            Some(warning) if alt.is_empty() => warning.to_string(),
            Some(warning) => format!("{alt} {warning}"),
            None => alt.to_string(),
        };
        format!("![{alt}]({})", result.source())
    }

    fn render_table(&mut self, id: NodeId, depth: usize) -> String {
        let dom = self.dom;
        let mut rows: Vec<(bool, Vec<String>)> = Vec::new();

        for row in table_rows(dom, id) {
            let mut has_header_cell = false;
            let mut cells = Vec::new();
            for cell in dom.element_children(row) {
                match dom.tag(cell) {
                    Some("th") => has_header_cell = true,
                    Some("td") => {}
                    _ => continue,
                }
                let content = self.render_children(cell, depth);
                cells.push(escape_table_cell(&content));
            }
            rows.push((has_header_cell, cells));
        }

        let (mut header, synthesized) = match rows.iter().position(|(th, _)| *th) {
            Some(pos) => (rows.remove(pos).1, false),
            None => match rows.first() {
                Some((_, first)) => ((1..=first.len()).map(|n| format!("Col {n}")).collect(), true),
                None => return String::new(),
            },
        };

        let width = rows.iter().map(|(_, cells)| cells.len()).fold(header.len(), usize::max);
        if width == 0 {
            return String::new();
        }
        while header.len() < width {
            header.push(if synthesized {
                format!("Col {}", header.len() + 1)
            } else {
                String::new()
            });
        }

        let mut out = String::from("\n");
        out.push_str(&table_line(&header));
        out.push_str(&table_line(&vec!["---".to_string(); width]));
        for (_, mut cells) in rows {
            cells.resize(width, String::new());
            out.push_str(&table_line(&cells));
        }
        out.push('\n');
        out
    }
}

/// Convert the subtree rooted at `node`.
///
/// This is the one-shot form of [`Converter`].
pub fn convert<F: ImageFetcher + ?Sized>(
    dom: &MarkupDom,
    node: NodeId,
    options: &ConvertOptions,
    fetcher: &mut F,
) -> ConvertResult {
    Converter::new(dom, options.clone(), fetcher).convert(node)
}

/// Parse an HTML string and convert its body.
///
/// # Examples
///
/// ```
/// use leetdown::markdown::{ConvertOptions, NoFetch, convert_html};
///
/// let html = "<p>Given an array <code>nums</code>, return <strong>the sum</strong>.</p>";
/// let result = convert_html(html, &ConvertOptions::default(), &mut NoFetch);
/// assert_eq!(result.markdown, "Given an array `nums`, return **the sum**.");
/// ```
pub fn convert_html<F: ImageFetcher + ?Sized>(
    html: &str,
    options: &ConvertOptions,
    fetcher: &mut F,
) -> ConvertResult {
    let dom = parse_html(html);
    convert(&dom, dom.body(), options, fetcher)
}

fn render_text(text: &str) -> String {
    if text.trim().is_empty() {
        // Whitespace between blocks is layout, not content.
        if text.is_empty() || text.contains('\n') {
            return String::new();
        }
        return " ".to_string();
    }
    collapse_whitespace(text)
}

fn wrap_nonempty(inner: &str, open: &str, close: &str) -> String {
    if inner.is_empty() {
        return String::new();
    }
    format!("{open}{inner}{close}")
}

/// Rows of a table, looking through `thead`/`tbody`/`tfoot`.
fn table_rows(dom: &MarkupDom, table: NodeId) -> Vec<NodeId> {
    let mut rows = Vec::new();
    for child in dom.element_children(table) {
        match dom.tag(child) {
            Some("tr") => rows.push(child),
            Some("thead" | "tbody" | "tfoot") => rows.extend(
                dom.element_children(child)
                    .filter(|&r| dom.tag(r) == Some("tr")),
            ),
            _ => {}
        }
    }
    rows
}

fn table_line(cells: &[String]) -> String {
    format!("| {} |\n", cells.join(" | "))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::dom::Attribute;
    use crate::markdown::image::{FetchError, FetchedImage, NoFetch};

    fn md(html: &str) -> String {
        convert_html(html, &ConvertOptions::default(), &mut NoFetch).markdown
    }

    #[test]
    fn test_simple_paragraph() {
        assert_eq!(md("<p>Hello, World!</p>"), "Hello, World!");
    }

    #[test]
    fn test_paragraphs_are_separated() {
        assert_eq!(md("<p>First</p>\n<p>Second</p>"), "First\n\nSecond");
    }

    #[test]
    fn test_heading() {
        assert_eq!(md("<h2>Constraints</h2><p>x</p>"), "## Constraints\n\nx");
    }

    #[test]
    fn test_inline_markup() {
        assert_eq!(
            md("<p>Return <em>any</em> index <b>or</b> <code>-1</code>.</p>"),
            "Return *any* index **or** `-1`."
        );
    }

    #[test]
    fn test_empty_emphasis_is_dropped() {
        assert_eq!(md("<p>a<strong> </strong>b</p>"), "a b");
        assert!(!md("<p><em></em>x</p>").contains("**"));
    }

    #[test]
    fn test_inline_code_escapes_backticks() {
        assert_eq!(md("<p><code>a`b</code></p>"), "`a\\`b`");
    }

    #[test]
    fn test_sup_and_sub() {
        assert_eq!(
            md("<p>1 &lt;= n &lt;= 10<sup> 4 </sup>.</p>"),
            "1 <= n <= 10^4."
        );
        assert_eq!(md("<pre>a<sub> i </sub></pre>"), "```\na_i\n```");
    }

    #[test]
    fn test_prose_scripts_get_one_marker() {
        assert_eq!(md("<p>x<sub>i</sub> and a<sup>2</sup></p>"), "x _i and a^2");
        assert_eq!(md("<p>2<sup>3<sup>4</sup></sup></p>"), "2^3^4");
    }

    #[test]
    fn test_code_block_is_verbatim() {
        let out = md("<pre><code>line1\n  line2\n</code></pre>");
        assert_eq!(out, "```\nline1\n  line2\n```");
    }

    #[test]
    fn test_example_pre_keeps_markers_and_drops_tags() {
        let out = md(
            "<pre><strong>Input:</strong> n = 2<sup>31</sup>\n<strong>Output:</strong> true\n</pre>",
        );
        assert_eq!(out, "```\nInput: n = 2^31\nOutput: true\n```");
    }

    #[test]
    fn test_code_block_language_class() {
        let out = md(r#"<pre><code class="language-python">print(1)</code></pre>"#);
        assert_eq!(out, "```python\nprint(1)\n```");
    }

    #[test]
    fn test_code_inside_pre_converted_directly() {
        let mut dom = MarkupDom::new();
        let pre = dom.create_element("pre", vec![]);
        let code = dom.create_element("code", vec![]);
        dom.append(dom.document(), pre);
        dom.append(pre, code);
        dom.append_text(code, "a  b\n");

        let result = convert(&dom, code, &ConvertOptions::default(), &mut NoFetch);
        assert_eq!(result.markdown, "```\na  b\n```");
    }

    #[test]
    fn test_unordered_list() {
        assert_eq!(md("<ul><li>one</li><li>two</li></ul>"), "- one\n- two");
    }

    #[test]
    fn test_ordered_nested_list() {
        let out = md("<ol><li>first<ul><li>inner</li></ul></li><li>second</li></ol>");
        assert_eq!(out, "1. first\n  - inner\n2. second");
    }

    #[test]
    fn test_list_item_paragraphs_are_trimmed() {
        let out = md("<ul><li><p>a</p></li><li><p>b</p>\n\n\n<p>c</p></li></ul>");
        assert_eq!(out, "- a\n- b\n\nc");
    }

    #[test]
    fn test_block_container_passthrough() {
        let out = md("<div><h3>Title</h3><ul><li>x</li></ul></div><p>after</p>");
        assert_eq!(out, "### Title\n\n- x\n\nafter");
    }

    #[test]
    fn test_link_resolution() {
        let options = ConvertOptions::default()
            .with_base_url(Url::parse("https://leetcode.com/problems/two-sum/").unwrap());
        let result = convert_html(
            r#"<p>See <a href="/tag/array/">arrays</a> and <a href="hint"></a></p>"#,
            &options,
            &mut NoFetch,
        );
        assert_eq!(
            result.markdown,
            "See [arrays](https://leetcode.com/tag/array/) and \
             [https://leetcode.com/problems/two-sum/hint](https://leetcode.com/problems/two-sum/hint)"
        );
    }

    #[test]
    fn test_anchor_without_href_is_text() {
        assert_eq!(md("<p><a name=\"x\">plain</a></p>"), "plain");
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(md("<blockquote><p>a</p><p>b</p></blockquote>"), "> a\n> \n> b");
    }

    #[test]
    fn test_horizontal_rule() {
        assert_eq!(md("<p>a</p><hr><p>b</p>"), "a\n\n---\n\nb");
    }

    #[test]
    fn test_table_with_header() {
        let out = md(
            "<table><thead><tr><th>op</th><th>cost</th></tr></thead>\
             <tbody><tr><td>a|b</td><td>1</td></tr><tr><td>c</td></tr></tbody></table>",
        );
        assert_eq!(out, "| op | cost |\n| --- | --- |\n| a\\|b | 1 |\n| c |  |");
    }

    #[test]
    fn test_table_without_header() {
        let out = md("<table><tr><td>1</td><td>2</td></tr><tr><td>3</td><td>4</td></tr></table>");
        assert_eq!(out, "| Col 1 | Col 2 |\n| --- | --- |\n| 1 | 2 |\n| 3 | 4 |");
    }

    #[test]
    fn test_hidden_and_unknown_tags() {
        assert_eq!(
            md("<style>p{}</style><p><span>kept</span><script>x()</script></p>"),
            "kept"
        );
    }

    #[test]
    fn test_image_without_inlining() {
        let result = convert_html(
            r#"<p><img src="a.png" alt="graph"></p>"#,
            &ConvertOptions::default(),
            &mut NoFetch,
        );
        assert_eq!(result.markdown, "![graph](a.png)");
        assert_eq!(result.image_stats.total, 1);
        assert_eq!(result.image_stats.failed, 0);
    }

    #[test]
    fn test_image_embedding_success() {
        let mut fetcher = |_: &str, _: Duration| -> Result<FetchedImage, FetchError> {
            Ok(FetchedImage::from_bytes("image/png", b"png"))
        };
        let options = ConvertOptions::default().with_inline_images(true);
        let result = convert_html(r#"<img src="a.png" alt="x">"#, &options, &mut fetcher);
        assert_eq!(result.markdown, "![x](data:image/png;base64,cG5n)");
        assert_eq!(result.image_stats.embedded, 1);
        assert_eq!(result.image_details[0].size_bytes, Some(3));
    }

    #[test]
    fn test_image_failure_annotates_alt() {
        let mut fetcher = |_: &str, _: Duration| -> Result<FetchedImage, FetchError> {
            Err(FetchError::Timeout(Duration::from_secs(20)))
        };
        let options = ConvertOptions::default()
            .with_inline_images(true)
            .with_base_url(Url::parse("https://assets.leetcode.com/").unwrap());
        let result = convert_html(r#"<img src="u/a.png" alt="tree">"#, &options, &mut fetcher);
        assert_eq!(
            result.markdown,
            "![tree ⚠️ not embedded (remote)](https://assets.leetcode.com/u/a.png)"
        );
        assert_eq!(result.image_stats.failed, 1);
    }

    #[test]
    fn test_all_images_failing_still_converts() {
        let mut fetcher = |url: &str, _: Duration| -> Result<FetchedImage, FetchError> {
            Err(FetchError::Io(format!("{url}: connection refused")))
        };
        let options = ConvertOptions::default().with_inline_images(true);
        let html = r#"<img src="https://x/1.png"><p>text</p><img src="https://x/2.png"><img src="https://x/3.png">"#;
        let result = convert_html(html, &options, &mut fetcher);
        assert_eq!(
            result.image_stats,
            ImageStats {
                total: 3,
                embedded: 0,
                failed: 3
            }
        );
        assert!(result.markdown.contains("text"));
        assert!(result.image_details.iter().all(|d| !d.embedded && d.reason.is_some()));
    }

    #[test]
    fn test_converter_reuses_side_map() {
        let mut dom = MarkupDom::new();
        let img = dom.create_element("img", vec![Attribute::new("src", "https://x/a.png")]);
        dom.append(dom.document(), img);

        let mut calls = 0;
        let mut fetcher = |_: &str, _: Duration| -> Result<FetchedImage, FetchError> {
            calls += 1;
            Ok(FetchedImage::from_bytes("image/gif", b"GIF89a"))
        };
        let options = ConvertOptions::default().with_inline_images(true);
        let mut converter = Converter::new(&dom, options, &mut fetcher);
        let first = converter.convert(dom.document());
        let second = converter.convert(dom.document());
        assert_eq!(first, second);
        assert_eq!(converter.embeds().len(), 1);
        drop(converter);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_whitespace_only_document() {
        assert_eq!(md("  \n  "), "");
    }
}
