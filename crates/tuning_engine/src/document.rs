use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html};

use crate::rules::CODE_BLOCK_TAG;

// html5ever folds `\r\n` and lone `\r` into `\n` and drops a newline that
// directly follows `<pre>`. Inside `<pre>` both are shielded with private-use
// marks before parsing and restored by `element_text`.
const CR_MARK: char = '\u{E000}';
const PRE_LEAD_MARK: char = '\u{E001}';

/// Parsed page. Immutable once built.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(&shield_raw_text(html)),
        }
    }

    /// All elements named `tag`, in document order.
    pub fn elements_by_tag<'a>(
        &'a self,
        tag: &'a str,
    ) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.html
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(move |element| element.value().name().eq_ignore_ascii_case(tag))
    }
}

/// Concatenated text of every text node below `element`, with carriage
/// returns and the newline after `<pre>` as they appear in the source.
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::chars)
        .filter_map(|c| match c {
            CR_MARK => Some('\r'),
            PRE_LEAD_MARK => None,
            other => Some(other),
        })
        .collect()
}

fn shield_raw_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut chars = html.char_indices().peekable();
    // Start offset of the markup being scanned, and whether it is an element tag.
    let mut tag: Option<(usize, bool)> = None;
    let mut quote: Option<char> = None;
    let mut in_pre = false;

    while let Some((i, c)) = chars.next() {
        let Some((start, is_element)) = tag else {
            match c {
                '<' => {
                    let next = chars.peek().map(|&(_, n)| n);
                    match next {
                        Some(n) if n.is_ascii_alphabetic() => tag = Some((i, true)),
                        Some('/' | '!' | '?') => tag = Some((i, false)),
                        _ => {}
                    }
                    out.push(c);
                }
                '\r' if in_pre => out.push(CR_MARK),
                _ => out.push(c),
            }
            continue;
        };

        out.push(c);
        match (quote, c) {
            (Some(q), _) if q == c => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') if is_element => quote = Some(c),
            (None, '>') => {
                tag = None;
                match pre_tag(&html[start..=i]) {
                    Some(PreTag::Open) => {
                        in_pre = true;
                        if matches!(chars.peek(), Some(&(_, '\n' | '\r'))) {
                            out.push(PRE_LEAD_MARK);
                        }
                    }
                    Some(PreTag::Close) => in_pre = false,
                    None => {}
                }
            }
            _ => {}
        }
    }
    out
}

#[derive(Debug, PartialEq, Eq)]
enum PreTag {
    Open,
    Close,
}

fn pre_tag(markup: &str) -> Option<PreTag> {
    let rest = markup.strip_prefix('<')?;
    let (kind, rest) = match rest.strip_prefix('/') {
        Some(rest) => (PreTag::Close, rest),
        None => (PreTag::Open, rest),
    };
    let name: String = rest.chars().take_while(char::is_ascii_alphanumeric).collect();
    name.eq_ignore_ascii_case(CODE_BLOCK_TAG).then_some(kind)
}

/// First element named `tag` that comes after `node` in document order.
///
/// Descendants of `node` count as following it, nesting depth is ignored, and
/// anything in between is skipped.
pub fn find_next_of_tag<'a>(node: NodeRef<'a, Node>, tag: &str) -> Option<ElementRef<'a>> {
    let mut cursor = next_in_document_order(node);
    while let Some(current) = cursor {
        if let Some(element) = ElementRef::wrap(current) {
            if element.value().name().eq_ignore_ascii_case(tag) {
                return Some(element);
            }
        }
        cursor = next_in_document_order(current);
    }
    None
}

// Pre-order successor: first child, else the nearest next sibling of self or an ancestor.
fn next_in_document_order(node: NodeRef<'_, Node>) -> Option<NodeRef<'_, Node>> {
    if let Some(child) = node.first_child() {
        return Some(child);
    }
    let mut current = node;
    loop {
        if let Some(sibling) = current.next_sibling() {
            return Some(sibling);
        }
        current = current.parent()?;
    }
}
