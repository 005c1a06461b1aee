use std::path::PathBuf;

use engine_logging::{engine_info, engine_warn};

use crate::decode::decode_html;
use crate::document::Document;
use crate::extract::{ExtractError, SectionExtractor};
use crate::persist::{Materializer, PersistError};
use crate::rules::{MarkerRule, DEFAULT_SOURCE_URL, HEADING_TAG, MARKER_RULES};
use crate::{FetchError, Fetcher, UpdateReport, WrittenFile};

#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("fetch failed")]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("could not write output")]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone)]
pub struct UpdateConfig {
    pub url: String,
    pub output_root: PathBuf,
    pub rules: &'static [MarkerRule],
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            output_root: PathBuf::from("."),
            rules: MARKER_RULES,
        }
    }
}

/// Fetch, parse, then write each matched section before extracting the next.
///
/// Stops at the first error. Files written before the error stay on disk.
pub async fn run_update(
    fetcher: &dyn Fetcher,
    config: &UpdateConfig,
) -> Result<UpdateReport, UpdateError> {
    let fetched = fetcher.fetch(&config.url).await?;
    let decoded = decode_html(&fetched.bytes, fetched.metadata.content_type.as_deref());
    engine_info!("decoded document as {}", decoded.encoding_label);

    apply_document(&decoded.html, config)
}

/// Extraction and materialisation over an already decoded document.
pub fn apply_document(html: &str, config: &UpdateConfig) -> Result<UpdateReport, UpdateError> {
    let document = Document::parse(html);
    let extractor = SectionExtractor::new(config.rules);
    let materializer = Materializer::new(&config.output_root);

    let mut report = UpdateReport {
        headings_scanned: document.elements_by_tag(HEADING_TAG).count(),
        written: Vec::new(),
    };

    for section in extractor.sections(&document) {
        let section = section?;
        let (path, bytes_written) =
            materializer.materialize(section.rule.destination, &section.block)?;
        if report.written.iter().any(|file| file.path == path) {
            engine_warn!(
                "{} written again from heading {:?}; earlier content replaced",
                path.display(),
                section.heading.trim()
            );
        }
        report.written.push(WrittenFile {
            marker: section.rule.marker,
            path,
            bytes_written,
        });
    }

    engine_info!(
        "scanned {} headings, wrote {} files",
        report.headings_scanned,
        report.distinct_paths().len()
    );
    Ok(report)
}
