//! Page rendering: [`ContactRecord`] + [`CodePayload`] → HTML document.
//!
//! Rendering is a single left-to-right pass over the template that replaces
//! `{{slot}}` markers. Substituted text is never rescanned, so a field value
//! containing `{{name}}` stays literal. Unknown slots are left untouched.
//!
//! ## Slots
//!
//! | Slot | Content |
//! |------|---------|
//! | `{{name}}` … `{{twitter}}` | HTML-escaped field value, empty when absent |
//! | `{{headline}}` | `<p class="headline">` with title and company, omitted when both absent |
//! | `{{contact_links}}` | one `<li>` per present contact field |
//! | `{{qr_code}}` | the payload data-URI, verbatim |
//!
//! Absent fields hide their element: no empty list items or headline.

use crate::error::CardGenError;
use crate::pipeline::encode::CodePayload;
use crate::pipeline::record::ContactRecord;
use std::path::Path;

const BUILTIN_TEMPLATE: &str = include_str!("../../templates/card.html");

/// An HTML template with `{{slot}}` markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardTemplate {
    source: String,
}

impl CardTemplate {
    /// The self-contained template shipped with the crate.
    pub fn builtin() -> Self {
        Self::from_source(BUILTIN_TEMPLATE)
    }

    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Read a custom template from disk.
    pub fn from_file(path: &Path) -> Result<Self, CardGenError> {
        std::fs::read_to_string(path)
            .map(Self::from_source)
            .map_err(|e| CardGenError::TemplateUnreadable {
                path: path.to_path_buf(),
                source: e,
            })
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Default for CardTemplate {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Render a complete HTML document for `record`.
pub fn render_page(record: &ContactRecord, payload: &CodePayload, template: &CardTemplate) -> String {
    let src = template.source();
    let mut out = String::with_capacity(src.len() + payload.data_uri.len() + 1024);
    let mut rest = src;

    while let Some(open) = rest.find("{{") {
        let Some(close) = rest[open + 2..].find("}}") else {
            break;
        };
        let key = rest[open + 2..open + 2 + close].trim();
        out.push_str(&rest[..open]);
        match slot_value(key, record, payload) {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &rest[open + 2 + close + 2..];
    }
    out.push_str(rest);
    out
}

fn slot_value(key: &str, record: &ContactRecord, payload: &CodePayload) -> Option<String> {
    let field = |v: &Option<String>| v.as_deref().map(escape_html).unwrap_or_default();
    let value = match key {
        "name" => escape_html(&record.name),
        "title" => field(&record.title),
        "company" => field(&record.company),
        "email" => field(&record.email),
        "phone" => field(&record.phone),
        "website" => field(&record.website),
        "linkedin" => field(&record.linkedin),
        "github" => field(&record.github),
        "twitter" => field(&record.twitter),
        "headline" => headline(record),
        "contact_links" => contact_links(record),
        "qr_code" => payload.data_uri.clone(),
        _ => return None,
    };
    Some(value)
}

fn headline(record: &ContactRecord) -> String {
    let parts: Vec<String> = [&record.title, &record.company]
        .into_iter()
        .flatten()
        .map(|s| escape_html(s))
        .collect();
    if parts.is_empty() {
        String::new()
    } else {
        format!("<p class=\"headline\">{}</p>", parts.join(" · "))
    }
}

fn contact_links(record: &ContactRecord) -> String {
    let rows: [(&str, &str, &Option<String>, fn(&str) -> String); 6] = [
        ("email", "Email", &record.email, |v| format!("mailto:{v}")),
        ("phone", "Phone", &record.phone, tel_href),
        ("website", "Website", &record.website, web_href),
        ("linkedin", "LinkedIn", &record.linkedin, web_href),
        ("github", "GitHub", &record.github, web_href),
        ("twitter", "Twitter", &record.twitter, web_href),
    ];

    let mut html = String::new();
    for (class, label, value, href) in rows {
        let Some(value) = value.as_deref() else {
            continue;
        };
        html.push_str(&format!(
            "    <li class=\"contact-item contact-{class}\"><span class=\"label\">{label}</span>\
             <a href=\"{}\">{}</a></li>\n",
            escape_html(&href(value)),
            escape_html(value),
        ));
    }
    html.truncate(html.trim_end().len());
    html
}

/// `tel:` link keeping only digits and a leading `+`.
fn tel_href(phone: &str) -> String {
    let trimmed = phone.trim();
    let mut digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if trimmed.starts_with('+') {
        digits.insert(0, '+');
    }
    format!("tel:{digits}")
}

/// Bare hosts such as `github.com/jane` get an `https://` scheme.
fn web_href(url: &str) -> String {
    let url = url.trim();
    if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Escape text for use in HTML content and double- or single-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CodePayload {
        CodePayload {
            data_uri: "data:image/png;base64,AAAA".into(),
            modules: 21,
            edge_px: 203,
        }
    }

    fn jane() -> ContactRecord {
        let mut r = ContactRecord::new("Jane Doe");
        r.title = Some("Engineer".into());
        r.company = Some("Acme".into());
        r.email = Some("jane@example.com".into());
        r.phone = Some("+1 (555) 010-0100".into());
        r.github = Some("github.com/jane".into());
        r
    }

    #[test]
    fn test_simple_slots_are_substituted() {
        let t = CardTemplate::from_source("<h1>{{name}}</h1><i>{{ title }}</i><b>{{twitter}}</b>");
        assert_eq!(
            render_page(&jane(), &payload(), &t),
            "<h1>Jane Doe</h1><i>Engineer</i><b></b>"
        );
    }

    #[test]
    fn test_payload_embedded_verbatim() {
        let t = CardTemplate::from_source(r#"<img src="{{qr_code}}">"#);
        assert_eq!(
            render_page(&jane(), &payload(), &t),
            r#"<img src="data:image/png;base64,AAAA">"#
        );
    }

    #[test]
    fn test_values_are_html_escaped() {
        let mut r = ContactRecord::new("<script>alert('x')</script> & \"co\"");
        r.company = Some("A&B".into());
        let t = CardTemplate::from_source("{{name}}|{{company}}");
        assert_eq!(
            render_page(&r, &payload(), &t),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; &quot;co&quot;|A&amp;B"
        );
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let r = ContactRecord::new("{{qr_code}}");
        let t = CardTemplate::from_source("{{name}}");
        assert_eq!(render_page(&r, &payload(), &t), "{{qr_code}}");
    }

    #[test]
    fn test_unknown_and_unterminated_slots_kept() {
        let t = CardTemplate::from_source("{{nope}} {{name}} {{broken");
        assert_eq!(
            render_page(&jane(), &payload(), &t),
            "{{nope}} Jane Doe {{broken"
        );
    }

    #[test]
    fn test_headline_hidden_when_absent() {
        let t = CardTemplate::from_source("[{{headline}}]");
        assert_eq!(
            render_page(&ContactRecord::new("A"), &payload(), &t),
            "[]"
        );
        assert_eq!(
            render_page(&jane(), &payload(), &t),
            "[<p class=\"headline\">Engineer · Acme</p>]"
        );
    }

    #[test]
    fn test_contact_links_only_for_present_fields() {
        let t = CardTemplate::from_source("{{contact_links}}");
        let html = render_page(&jane(), &payload(), &t);
        assert_eq!(html.matches("<li").count(), 3);
        assert_eq!(html.lines().count(), 3);
        assert!(!html.ends_with('\n'));
        assert!(html.contains(r#"href="mailto:jane@example.com""#));
        assert!(html.contains(r#"href="tel:+15550100100""#));
        assert!(html.contains(r#"href="https://github.com/jane""#));
        assert!(!html.contains("contact-website"));
        assert!(!html.contains("contact-twitter"));

        assert_eq!(render_page(&ContactRecord::new("A"), &payload(), &t), "");
    }

    #[test]
    fn test_builtin_template_is_self_contained() {
        let html = render_page(&jane(), &payload(), &CardTemplate::builtin());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Jane Doe</h1>"));
        assert!(html.contains(r#"src="data:image/png;base64,AAAA""#));
        assert!(!html.contains("{{"), "unfilled slot in: {html}");
        for remote in ["<link", "<script", "@import", "src=\"http", "url("] {
            assert!(!html.contains(remote), "external reference {remote:?}");
        }
    }

    #[test]
    fn test_rendering_is_pure() {
        let t = CardTemplate::builtin();
        assert_eq!(
            render_page(&jane(), &payload(), &t),
            render_page(&jane(), &payload(), &t)
        );
    }

    #[test]
    fn test_from_file_reports_missing_template() {
        let err = CardTemplate::from_file(Path::new("/no/such/card.html")).unwrap_err();
        assert!(matches!(err, CardGenError::TemplateUnreadable { .. }));
    }
}
