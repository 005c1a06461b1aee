/// Page that documents the recommended tuning snippets.
pub const DEFAULT_SOURCE_URL: &str = "https://calomel.org/freebsd_network_tuning.html";

/// Heading tag whose text is matched against the markers.
pub const HEADING_TAG: &str = "h3";

/// Tag of the block that follows a matched heading.
pub const CODE_BLOCK_TAG: &str = "pre";

/// Pairs a heading-text marker with the file its code block is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerRule {
    pub marker: &'static str,
    /// Relative to the output root.
    pub destination: &'static str,
}

impl MarkerRule {
    /// Case-sensitive substring test, no normalisation.
    pub fn matches(&self, heading_text: &str) -> bool {
        heading_text.contains(self.marker)
    }
}

pub const MARKER_RULES: &[MarkerRule] = &[
    MarkerRule {
        marker: "/boot/loader.conf",
        destination: "boot/loader.conf",
    },
    MarkerRule {
        marker: "/etc/sysctl.conf",
        destination: "etc/sysctl.conf",
    },
    MarkerRule {
        marker: "OPTIONAL: Enable the Pf firewall",
        destination: "etc/rc.conf",
    },
];
