//! Maps HTML element names to rendering rules.

/// How an element is rendered.
///
/// Every tag the renderer knows gets a variant; everything else is
/// [`Tag::Other`] and renders as its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// `h1`..`h6`.
    Heading(u8),
    /// `p`, `section`, `div`, `article`.
    Block,
    /// `strong`, `b`.
    Strong,
    /// `em`, `i`.
    Emphasis,
    Code,
    Pre,
    Sup,
    Sub,
    UnorderedList,
    OrderedList,
    ListItem,
    Link,
    Image,
    BlockQuote,
    Rule,
    Table,
    /// Content that is never shown (`head`, `script`, `style`, `template`).
    Hidden,
    Other,
}

impl Tag {
    /// Classify a lowercase tag name.
    pub fn from_name(name: &str) -> Tag {
        match name {
            "h1" => Tag::Heading(1),
            "h2" => Tag::Heading(2),
            "h3" => Tag::Heading(3),
            "h4" => Tag::Heading(4),
            "h5" => Tag::Heading(5),
            "h6" => Tag::Heading(6),
            "p" | "section" | "div" | "article" => Tag::Block,
            "strong" | "b" => Tag::Strong,
            "em" | "i" => Tag::Emphasis,
            "code" => Tag::Code,
            "pre" => Tag::Pre,
            "sup" => Tag::Sup,
            "sub" => Tag::Sub,
            "ul" => Tag::UnorderedList,
            "ol" => Tag::OrderedList,
            "li" => Tag::ListItem,
            "a" => Tag::Link,
            "img" => Tag::Image,
            "blockquote" => Tag::BlockQuote,
            "hr" => Tag::Rule,
            "table" => Tag::Table,
            "head" | "script" | "style" | "template" => Tag::Hidden,
            _ => Tag::Other,
        }
    }

    /// Block-level children that let a [`Tag::Block`] container pass its
    /// content through without paragraph wrapping.
    pub fn is_block_child(self) -> bool {
        matches!(
            self,
            Tag::Pre
                | Tag::Table
                | Tag::BlockQuote
                | Tag::UnorderedList
                | Tag::OrderedList
                | Tag::Heading(_)
                | Tag::Image
        )
    }
}
