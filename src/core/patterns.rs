/// Pattern definitions for the macro analyzer
///
/// This module holds the MIME types worth scanning and the rule table applied
/// to olevba output. Rules are compiled once into a `RuleSet` that callers
/// construct and share.

use regex::{Regex, RegexBuilder};

/// MIME types whose documents are handed to olevba
pub const MIME_TYPES_TO_CHECK: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/msword",
    "application/vnd.ms-excel",
    "application/vnd.ms-office",
];

/// Prefix of the MIME type reported for flat (container-less) Office XML
pub const XML_MIME_PREFIX: &str = "application/xml";

/// Processing instruction present in Office 2003 XML documents
pub const OFFICE_XML_MARKER: &[u8] = b"<?mso-application";

/// Rule table as (pattern, flag). Order decides the order of reported flags.
pub const MACRO_FLAGS: &[(&str, &str)] = &[
    (r"^\|\s*AutoExec", "executes automatically"),
    (r"^\|\s*Suspicious\s*\|\s*Shell", "executes file(s)"),
    (r"^\|\s*Suspicious\s*\|\s*User-Agent", "download file(s)"),
    (r"^\|\s*Suspicious", "have suspicious strings"),
];

/// True if a lower-cased MIME string names a document type worth scanning
pub fn is_checked_mime_type(document_type: &str) -> bool {
    MIME_TYPES_TO_CHECK
        .iter()
        .any(|mime_type| document_type.contains(mime_type))
}

/// One compiled line-anchored rule
#[derive(Debug, Clone)]
pub struct RuleEntry {
    pattern: Regex,
    flag: String,
}

impl RuleEntry {
    /// Compile `pattern` in multi-line mode so `^` anchors at every line
    pub fn new(pattern: &str, flag: &str) -> Result<Self, regex::Error> {
        let pattern = RegexBuilder::new(pattern).multi_line(true).build()?;
        Ok(Self {
            pattern,
            flag: flag.to_string(),
        })
    }

    pub fn flag(&self) -> &str {
        &self.flag
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn is_match(&self, output: &str) -> bool {
        self.pattern.is_match(output)
    }
}

/// Ordered, immutable list of rules
#[derive(Debug, Clone)]
pub struct RuleSet {
    entries: Vec<RuleEntry>,
}

impl RuleSet {
    /// Compile the built-in macro rule table
    pub fn builtin() -> Result<Self, regex::Error> {
        Self::from_table(MACRO_FLAGS)
    }

    /// Compile an arbitrary (pattern, flag) table, keeping its order
    pub fn from_table(table: &[(&str, &str)]) -> Result<Self, regex::Error> {
        let entries = table
            .iter()
            .map(|(pattern, flag)| RuleEntry::new(pattern, flag))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flags of every rule matching `output`, in table order.
    ///
    /// Each rule is tested on its own, so one line can raise several flags.
    /// A flag text is reported at most once.
    pub fn matching_flags(&self, output: &str) -> Vec<String> {
        let mut flags: Vec<String> = Vec::new();

        for entry in &self.entries {
            if entry.is_match(output) && !flags.iter().any(|flag| flag == entry.flag()) {
                flags.push(entry.flag().to_string());
            }
        }

        flags
    }
}
