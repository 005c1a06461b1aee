use engine_logging::{engine_debug, engine_trace};
use scraper::ElementRef;

use crate::document::{element_text, find_next_of_tag, Document};
use crate::rules::{MarkerRule, CODE_BLOCK_TAG, HEADING_TAG};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("heading {heading:?} matches {marker:?} but no <pre> block follows it")]
    MissingCodeBlock { heading: String, marker: &'static str },
}

/// Text of a `<pre>` block split into lines, each keeping its terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub lines: Vec<String>,
}

impl CodeBlock {
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: split_lines_keep_ends(text),
        }
    }

    /// Everything after the first line. The first line is the label the page
    /// prints above each snippet and is always dropped, even when it is the
    /// only line.
    pub fn body(&self) -> String {
        self.lines.iter().skip(1).map(String::as_str).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSection {
    pub rule: MarkerRule,
    pub heading: String,
    pub block: CodeBlock,
}

/// Splits on `\n`, `\r\n` and `\r`. The last line keeps no terminator if the
/// text does not end with one; empty text yields no lines.
pub fn split_lines_keep_ends(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(text[start..=i].to_string());
                start = i + 1;
            }
            b'\r' => {
                let end = if bytes.get(i + 1) == Some(&b'\n') { i + 1 } else { i };
                lines.push(text[start..=end].to_string());
                i = end;
                start = end + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < bytes.len() {
        lines.push(text[start..].to_string());
    }
    lines
}

/// Matches level-3 headings against a rule table and pulls the code block
/// that follows each match.
#[derive(Debug, Clone, Copy)]
pub struct SectionExtractor<'r> {
    rules: &'r [MarkerRule],
}

impl<'r> SectionExtractor<'r> {
    pub fn new(rules: &'r [MarkerRule]) -> Self {
        Self { rules }
    }

    /// Lazily yields one item per (heading, matching rule) pair in document
    /// order, rules in table order within a heading.
    pub fn sections<'d>(&self, document: &'d Document) -> Sections<'d, 'r> {
        Sections {
            headings: Box::new(document.elements_by_tag(HEADING_TAG)),
            rules: self.rules,
            current: None,
            next_rule: 0,
        }
    }
}

pub struct Sections<'d, 'r> {
    headings: Box<dyn Iterator<Item = ElementRef<'d>> + 'd>,
    rules: &'r [MarkerRule],
    current: Option<(ElementRef<'d>, String)>,
    next_rule: usize,
}

impl<'d, 'r> Iterator for Sections<'d, 'r> {
    type Item = Result<ExtractedSection, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current.is_none() {
                let heading = self.headings.next()?;
                let text = element_text(heading);
                engine_debug!("scanning heading {:?}", text.trim());
                self.current = Some((heading, text));
                self.next_rule = 0;
            }

            if let Some((heading, text)) = &self.current {
                while let Some(rule) = self.rules.get(self.next_rule) {
                    self.next_rule += 1;
                    if rule.matches(text) {
                        return Some(extract_section(*heading, text, *rule));
                    }
                    engine_trace!("no {:?} in heading", rule.marker);
                }
            }
            self.current = None;
        }
    }
}

fn extract_section(
    heading: ElementRef<'_>,
    heading_text: &str,
    rule: MarkerRule,
) -> Result<ExtractedSection, ExtractError> {
    let pre = find_next_of_tag(*heading, CODE_BLOCK_TAG).ok_or_else(|| {
        ExtractError::MissingCodeBlock {
            heading: heading_text.trim().to_string(),
            marker: rule.marker,
        }
    })?;
    let block = CodeBlock::from_text(&element_text(pre));
    engine_debug!(
        "{:?} -> {} ({} lines)",
        rule.marker,
        rule.destination,
        block.lines.len()
    );
    Ok(ExtractedSection {
        rule,
        heading: heading_text.to_string(),
        block,
    })
}
