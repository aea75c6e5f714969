//! HTML → Markdown conversion for problem descriptions.
//!
//! - [`render`]: the tree transducer ([`convert`], [`convert_html`], [`Converter`])
//! - [`join`]: smart-join of sibling fragments
//! - [`image`]: image URL resolution and optional base64 embedding
//! - [`glossary`]: first-use glossary links and the glossary section
//! - [`escape`]: escaping, fence sizing and whitespace helpers
//! - [`slugify`]: anchor labels
//!
//! ## Design Notes
//!
//! - **No prose escaping**: descriptions are rendered for reading, so
//!   characters like `*` or `_` in text are emitted as-is
//! - **Verbatim code**: `pre` content comes from a text-only extractor, so
//!   joining never touches source code
//! - **Images never fail a conversion**: every fetch problem becomes a
//!   recorded reason plus a warning in the alt text

mod escape;
mod glossary;
mod image;
mod join;
mod render;
mod slugify;
mod tag;

pub use escape::{
    calculate_fence_length, collapse_blank_lines, collapse_whitespace, escape_inline_code,
    escape_table_cell,
};
pub use glossary::{
    ANCHOR_PREFIX, GlossaryPair, append_glossary, assign_labels, build_section, inject_anchors,
};
pub use image::{
    CachingFetcher, EmbedOutcome, FetchError, FetchedImage, FileFetcher, ImageEmbedResult,
    ImageFetcher, ImageStats, NoFetch, WARN_ERROR, WARN_REMOTE, embed_image, resolve_url,
};
pub use join::{needs_space, push_joined, smart_join};
pub use render::{
    ConvertOptions, ConvertResult, Converter, DEFAULT_IMAGE_TIMEOUT, convert, convert_html,
};
pub use slugify::{DEFAULT_LABEL, LabelAllocator, slugify};
pub use tag::Tag;
