//! Document import: turn an uploaded file into HTML for the Studio editor.
//!
//! Supported inputs are Word (`.docx`), HTML, Markdown and plain text. The
//! conversion is structural: headings, paragraphs, lists, bold/italic and
//! links survive; layout and styling do not. Markdown goes through
//! `pulldown-cmark`; the other formats are handled here.

use std::io::{Cursor, Read};
use std::sync::LazyLock;

use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use serde::Serialize;

use crate::error::CoreError;

/// Maximum uncompressed size of `word/document.xml` we are willing to read.
const MAX_DOCX_XML_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Docx,
    Html,
    Markdown,
    Text,
}

impl ImportFormat {
    /// Detect the format from a filename extension.
    pub fn from_filename(filename: &str) -> Result<Self, CoreError> {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, e)| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "docx" => Ok(ImportFormat::Docx),
            "html" | "htm" => Ok(ImportFormat::Html),
            "md" | "markdown" => Ok(ImportFormat::Markdown),
            "txt" => Ok(ImportFormat::Text),
            _ => Err(CoreError::Validation(format!(
                "Cannot import '{filename}'. Supported formats: .docx, .html, .htm, .md, .markdown, .txt"
            ))),
        }
    }
}

/// Result of an import, returned to the Studio editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportedDocument {
    pub title: Option<String>,
    pub html: String,
    pub word_count: usize,
}

/// Convert raw file bytes to HTML.
pub fn convert_to_html(format: ImportFormat, bytes: &[u8]) -> Result<ImportedDocument, CoreError> {
    let (title, html) = match format {
        ImportFormat::Docx => docx_to_html(bytes)?,
        ImportFormat::Html => clean_html(utf8(bytes)?),
        ImportFormat::Markdown => markdown_to_html(utf8(bytes)?),
        ImportFormat::Text => (None, text_to_html(utf8(bytes)?)),
    };
    let word_count = count_words(&html);
    Ok(ImportedDocument {
        title,
        html,
        word_count,
    })
}

fn utf8(bytes: &[u8]) -> Result<&str, CoreError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| CoreError::Validation("File is not valid UTF-8 text".into()))?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

/// Escape text for inclusion in HTML element content or attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Count whitespace-separated words in the text content of an HTML fragment.
pub fn count_words(html: &str) -> usize {
    TAG_RE.replace_all(html, " ").split_whitespace().count()
}

// ---------------------------------------------------------------------------
// Word (.docx)
// ---------------------------------------------------------------------------

static PARAGRAPH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<w:p(?:\s[^>]*)?>(.*?)</w:p>").expect("valid regex")
});
static STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<w:pStyle\s+w:val="([^"]*)""#).expect("valid regex")
});
static RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<w:r(?:\s[^>]*)?>(.*?)</w:r>").expect("valid regex")
});
static RUN_PROPS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<w:rPr>(.*?)</w:rPr>").expect("valid regex")
});
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<w:b(?:\s+w:val="(true|1|on)")?\s*/>"#).expect("valid regex")
});
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<w:i(?:\s+w:val="(true|1|on)")?\s*/>"#).expect("valid regex")
});
static RUN_CONTENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<w:t(?:\s[^>]*)?>(.*?)</w:t>|<w:tab\s*/>|<w:br\s*/>").expect("valid regex")
});

fn docx_to_html(bytes: &[u8]) -> Result<(Option<String>, String), CoreError> {
    let corrupt = |e: zip::result::ZipError| {
        CoreError::Validation(format!("Could not read .docx file: {e}"))
    };
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(corrupt)?;
    let entry = archive.by_name("word/document.xml").map_err(corrupt)?;
    if entry.size() > MAX_DOCX_XML_BYTES {
        return Err(CoreError::Validation("Document is too large to import".into()));
    }
    let mut xml = String::new();
    entry
        .take(MAX_DOCX_XML_BYTES)
        .read_to_string(&mut xml)
        .map_err(|e| CoreError::Validation(format!("Could not read .docx file: {e}")))?;

    Ok(docx_xml_to_html(&xml))
}

/// Convert the body of `word/document.xml` to HTML.
fn docx_xml_to_html(xml: &str) -> (Option<String>, String) {
    let mut html = String::new();
    let mut title = None;
    let mut in_list = false;

    for para in PARAGRAPH_RE.captures_iter(xml) {
        let body = &para[1];
        let content = docx_runs(body);
        let is_list = body.contains("<w:numPr>");

        if in_list && !is_list {
            html.push_str("</ul>\n");
            in_list = false;
        }
        if content.trim().is_empty() {
            continue;
        }

        let heading = STYLE_RE
            .captures(body)
            .and_then(|c| heading_level(&c[1]));

        if let Some(level) = heading {
            if title.is_none() {
                title = Some(plain_text(&content));
            }
            html.push_str(&format!("<h{level}>{content}</h{level}>\n"));
        } else if is_list {
            if !in_list {
                html.push_str("<ul>\n");
                in_list = true;
            }
            html.push_str(&format!("<li>{content}</li>\n"));
        } else {
            html.push_str(&format!("<p>{content}</p>\n"));
        }
    }
    if in_list {
        html.push_str("</ul>\n");
    }
    (title, html)
}

/// Map a Word paragraph style id to a heading level.
fn heading_level(style: &str) -> Option<u8> {
    if style.eq_ignore_ascii_case("Title") {
        return Some(1);
    }
    let level = style
        .strip_prefix("Heading")
        .or_else(|| style.strip_prefix("heading"))?
        .trim()
        .parse::<u8>()
        .ok()?;
    (1..=6).contains(&level).then_some(level)
}

fn docx_runs(paragraph: &str) -> String {
    let mut out = String::new();
    for run in RUN_RE.captures_iter(paragraph) {
        let body = &run[1];
        let props = RUN_PROPS_RE
            .captures(body)
            .map(|c| c.get(1).map_or("", |m| m.as_str()).to_string())
            .unwrap_or_default();
        let bold = BOLD_RE.is_match(&props);
        let italic = ITALIC_RE.is_match(&props);

        let mut text = String::new();
        for piece in RUN_CONTENT_RE.captures_iter(body) {
            match piece.get(1) {
                Some(t) => text.push_str(&escape_html(&decode_xml_entities(t.as_str()))),
                None if piece[0].starts_with("<w:tab") => text.push(' '),
                None => text.push_str("<br>"),
            }
        }
        if text.is_empty() {
            continue;
        }
        match (bold, italic) {
            (true, true) => out.push_str(&format!("<strong><em>{text}</em></strong>")),
            (true, false) => out.push_str(&format!("<strong>{text}</strong>")),
            (false, true) => out.push_str(&format!("<em>{text}</em>")),
            (false, false) => out.push_str(&text),
        }
    }
    out
}

fn decode_xml_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn plain_text(html: &str) -> String {
    let stripped = TAG_RE.replace_all(html, "");
    decode_xml_entities(&stripped.replace("&#39;", "'"))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// HTML
// ---------------------------------------------------------------------------

static BODY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<body[^>]*>(.*)</body\s*>").expect("valid regex"));
static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b.*?</script\s*>").expect("valid regex"));
static STYLE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b.*?</style\s*>").expect("valid regex"));
static HANDLER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(\s+|/|["'])on[a-z]+\s*=\s*("[^"]*"|'[^']*'|[^\s>]*)"#).expect("valid regex")
});
static JS_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\b(href|src|action|formaction)\s*=\s*("\s*(?:javascript|vbscript):[^"]*"|'\s*(?:javascript|vbscript):[^']*'|(?:javascript|vbscript):[^\s>]*)"#,
    )
    .expect("valid regex")
});
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title\s*>").expect("valid regex"));
static H1_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1\s*>").expect("valid regex"));

fn clean_html(source: &str) -> (Option<String>, String) {
    let title = TITLE_RE
        .captures(source)
        .or_else(|| H1_RE.captures(source))
        .map(|c| plain_text(&c[1]))
        .filter(|t| !t.is_empty());

    let body = BODY_RE
        .captures(source)
        .and_then(|c| c.get(1))
        .map_or(source, |m| m.as_str());
    let without_scripts = SCRIPT_RE.replace_all(body, "");
    let without_styles = STYLE_BLOCK_RE.replace_all(&without_scripts, "");
    // A quote or slash before the handler belongs to the surrounding markup.
    let without_handlers = HANDLER_RE.replace_all(&without_styles, |c: &regex::Captures| {
        let sep = &c[1];
        if sep.trim().is_empty() {
            String::new()
        } else {
            sep.to_string()
        }
    });
    let cleaned = JS_URL_RE.replace_all(&without_handlers, r##"$1="#""##);

    (title, cleaned.trim().to_string())
}

// ---------------------------------------------------------------------------
// Markdown
// ---------------------------------------------------------------------------

const MD_OPTIONS: Options = Options::ENABLE_TABLES.union(Options::ENABLE_STRIKETHROUGH);

/// Link and image targets kept on import; anything else loses its URL and
/// keeps only its text.
fn is_safe_url(url: &str) -> bool {
    let url = url.trim().to_ascii_lowercase();
    ["http://", "https://", "mailto:", "/", "#"]
        .iter()
        .any(|prefix| url.starts_with(prefix))
}

fn markdown_to_html(source: &str) -> (Option<String>, String) {
    let mut title: Option<String> = None;
    let mut heading: Option<String> = None;
    // One entry per open link or image: whether its end tag is dropped too.
    let mut dropped: Vec<bool> = Vec::new();

    let events = Parser::new_ext(source, MD_OPTIONS).filter_map(|event| match event {
        Event::Start(Tag::Heading { .. }) if title.is_none() => {
            heading = Some(String::new());
            Some(event)
        }
        Event::End(TagEnd::Heading(_)) => {
            if let Some(text) = heading.take() {
                let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
                if !text.is_empty() {
                    title = Some(text);
                }
            }
            Some(event)
        }
        Event::Text(ref text) | Event::Code(ref text) => {
            if let Some(h) = heading.as_mut() {
                h.push_str(text);
            }
            Some(event)
        }
        Event::Start(Tag::Link { ref dest_url, .. })
        | Event::Start(Tag::Image { ref dest_url, .. }) => {
            let safe = is_safe_url(dest_url);
            dropped.push(!safe);
            safe.then_some(event)
        }
        Event::End(TagEnd::Link) | Event::End(TagEnd::Image) => {
            let drop = dropped.pop().unwrap_or(false);
            (!drop).then_some(event)
        }
        // Raw HTML in Markdown is shown as text, never rendered.
        Event::Html(raw) | Event::InlineHtml(raw) => Some(Event::Text(raw)),
        other => Some(other),
    });

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, events);
    (title, out)
}

// ---------------------------------------------------------------------------
// Plain text
// ---------------------------------------------------------------------------

fn text_to_html(source: &str) -> String {
    let normalized = source.replace("\r\n", "\n");
    normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            let lines: Vec<String> = p.lines().map(|l| escape_html(l.trim())).collect();
            format!("<p>{}</p>\n", lines.join("<br>"))
        })
        .collect()
}
