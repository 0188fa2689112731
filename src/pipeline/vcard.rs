//! vCard 3.0 serialisation of a [`ContactRecord`].
//!
//! Field order is fixed by [`FIELD_LINES`], not by the input file, so the
//! same record always yields the same bytes and therefore the same QR code.
//! Lines are CRLF-terminated as RFC 2426 requires; phone scanners accept both,
//! but strict importers do not.

use crate::pipeline::record::ContactRecord;
use std::fmt;

/// Line terminator used between vCard properties.
pub const LINE_BREAK: &str = "\r\n";

/// Optional record fields and the property prefix each one maps to.
///
/// `name` is not listed: it is required and emits both `FN` and `N`.
pub const FIELD_LINES: [(&str, &str); 8] = [
    ("title", "TITLE"),
    ("company", "ORG"),
    ("phone", "TEL;TYPE=WORK"),
    ("email", "EMAIL;TYPE=INTERNET"),
    ("website", "URL"),
    ("linkedin", "URL;X-LABEL=LinkedIn"),
    ("github", "URL;X-LABEL=GitHub"),
    ("twitter", "URL;X-LABEL=Twitter"),
];

/// A serialised vCard block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VCardText(String);

impl VCardText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Byte length, which is what QR capacity is measured in.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for VCardText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VCardText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Serialise `record` as a vCard 3.0 block.
pub fn to_vcard(record: &ContactRecord) -> VCardText {
    let name = escape_value(&record.name);
    let mut lines = vec![
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("FN:{name}"),
        format!("N:{name};;;"),
    ];

    for (field, property) in FIELD_LINES {
        if let Some(value) = field_value(record, field) {
            lines.push(format!("{property}:{}", escape_value(value)));
        }
    }

    lines.push("END:VCARD".to_string());
    VCardText(lines.join(LINE_BREAK))
}

/// Escape a property value: backslash, semicolon, comma and line breaks.
pub fn escape_value(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out
}

fn field_value<'a>(record: &'a ContactRecord, field: &str) -> Option<&'a str> {
    match field {
        "title" => record.title.as_deref(),
        "company" => record.company.as_deref(),
        "phone" => record.phone.as_deref(),
        "email" => record.email.as_deref(),
        "website" => record.website.as_deref(),
        "linkedin" => record.linkedin.as_deref(),
        "github" => record.github.as_deref(),
        "twitter" => record.twitter.as_deref(),
        _ => None,
    }
}
