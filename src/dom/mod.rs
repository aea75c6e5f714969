//! Markup tree for problem-description HTML.
//!
//! - [`MarkupDom`]: arena-allocated tree addressed by [`NodeId`]
//! - [`parse_html`]: html5ever front end building a [`MarkupDom`]

mod arena;
mod tree_sink;

pub use arena::{Attribute, Children, MarkupDom, Node, NodeData, NodeId};
pub use tree_sink::MarkupSink;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

/// Parse an HTML document or fragment.
///
/// Fragments are wrapped by the parser in the usual `html`/`head`/`body`
/// scaffolding; use [`MarkupDom::body`] to get at the content.
pub fn parse_html(html: &str) -> MarkupDom {
    parse_document(MarkupSink::new(), ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}

impl MarkupDom {
    /// The `<body>` element, or the document root if there is none.
    pub fn body(&self) -> NodeId {
        self.find_by_tag("body").unwrap_or_else(|| self.document())
    }
}
