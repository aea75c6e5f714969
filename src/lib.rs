//! # leetdown
//!
//! Turns scraped coding-problem pages into Markdown.
//!
//! ## Features
//!
//! - HTML → Markdown with smart joining of inline fragments, verbatim code
//!   fences and pipe tables
//! - Optional image inlining as base64 data URLs through a pluggable fetcher
//! - Glossary links on the first use of each term, plus a glossary section
//! - Testcase blob segmentation, deduplication and table/JSON rendering
//! - Editor language id → display label and code-fence resolution
//!
//! ## Quick Start
//!
//! ```
//! use leetdown::markdown::{ConvertOptions, NoFetch, convert_html};
//! use leetdown::testcase::{render_table, segment};
//!
//! let html = "<p>Return the <em>sum</em> of <code>a</code> and <code>b</code>.</p>";
//! let result = convert_html(html, &ConvertOptions::default(), &mut NoFetch);
//! assert_eq!(result.markdown, "Return the *sum* of `a` and `b`.");
//!
//! let cases = segment("1\n2", &["a", "b"]).cases;
//! assert!(render_table(&cases, &["a", "b"]).starts_with("| # | a | b |"));
//! ```
//!
//! ## Images
//!
//! Image embedding is driven by an [`ImageFetcher`](markdown::ImageFetcher).
//! Any `FnMut(&str, Duration) -> Result<FetchedImage, FetchError>` closure
//! works, and [`FileFetcher`](markdown::FileFetcher) reads local files.
//! Failures never abort a conversion; they show up in
//! [`ConvertResult::image_details`](markdown::ConvertResult).

pub mod dom;
pub mod error;
pub mod lang;
pub mod markdown;
pub mod testcase;
pub(crate) mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Error, Result};
pub use lang::{LanguageResolver, fence_for};
pub use markdown::{ConvertOptions, ConvertResult, GlossaryPair, convert_html};
pub use testcase::{TestCase, combine_unique, segment};
pub use util::decode_html;
