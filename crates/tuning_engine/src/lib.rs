//! Tuning engine: fetch the FreeBSD network tuning page, pull the marked
//! code blocks and write them to their configuration files.
mod decode;
mod document;
mod extract;
mod fetch;
mod persist;
mod pipeline;
mod rules;
mod types;

pub use decode::{decode_html, DecodedHtml};
pub use document::{element_text, find_next_of_tag, Document};
pub use extract::{
    split_lines_keep_ends, CodeBlock, ExtractError, ExtractedSection, SectionExtractor, Sections,
};
pub use fetch::{FetchSettings, Fetcher, FileFetcher, HttpFetcher};
pub use persist::{Materializer, PersistError};
pub use pipeline::{apply_document, run_update, UpdateConfig, UpdateError};
pub use rules::{MarkerRule, CODE_BLOCK_TAG, DEFAULT_SOURCE_URL, HEADING_TAG, MARKER_RULES};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput, UpdateReport, WrittenFile};
