use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use engine_logging::engine_warn;

/// How far into the document to look for a `<meta charset>` declaration.
const META_PRESCAN_BYTES: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHtml {
    pub html: String,
    pub encoding_label: String,
    /// Some byte sequences were invalid and became U+FFFD.
    pub replaced_malformed: bool,
}

/// Decode raw page bytes to UTF-8. Never fails.
///
/// The declared encoding (BOM, Content-Type charset, `<meta charset>` in the
/// first KiB) is tried first, then a chardetng guess. If neither decodes
/// cleanly, the declared one is used with replacement characters.
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> DecodedHtml {
    let declared = declared_encoding(bytes, content_type);

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let guessed = detector.guess(None, true);

    let mut candidates = declared.into_iter().chain(Some(guessed));
    let primary = declared.unwrap_or(guessed);
    if let Some(decoded) = candidates.find_map(|enc| decode_strict(bytes, enc)) {
        if decoded.encoding_label != primary.name() {
            engine_warn!(
                "document is not valid {}; decoded as {}",
                primary.name(),
                decoded.encoding_label
            );
        }
        return decoded;
    }

    let (text, _, _) = primary.decode(bytes);
    engine_warn!(
        "document is not valid {}; invalid bytes replaced",
        primary.name()
    );
    DecodedHtml {
        html: text.into_owned(),
        encoding_label: primary.name().to_string(),
        replaced_malformed: true,
    }
}

fn declared_encoding(bytes: &[u8], content_type: Option<&str>) -> Option<&'static Encoding> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return Some(encoding);
    }
    let from_label = |label: String| Encoding::for_label(label.as_bytes());
    content_type
        .and_then(charset_param)
        .and_then(from_label)
        .or_else(|| meta_charset(bytes).and_then(from_label))
}

fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim_matches([' ', '"', '\''].as_ref()).to_string())
    })
}

fn meta_charset(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(META_PRESCAN_BYTES)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();
    let start = head.find("charset=")? + "charset=".len();
    let label: String = head[start..]
        .trim_start_matches(['"', '\''])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        .collect();
    (!label.is_empty()).then_some(label)
}

fn decode_strict(bytes: &[u8], enc: &'static Encoding) -> Option<DecodedHtml> {
    let (text, actual, had_errors) = enc.decode(bytes);
    (!had_errors).then(|| DecodedHtml {
        html: text.into_owned(),
        encoding_label: actual.name().to_string(),
        replaced_malformed: false,
    })
}
