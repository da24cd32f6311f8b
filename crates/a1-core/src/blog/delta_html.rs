//! Editor op log to HTML
//!
//! Walks the ops once, collecting inline fragments into a line buffer. Each
//! newline ends a line, and the block attributes on the op holding that
//! newline decide which element the line becomes. Adjacent list lines of the
//! same kind share one container.

use serde::Deserialize;

use crate::models::{Attributes, Block, Insert, ListKind, Op};

/// Convert an op sequence to HTML. Never fails; malformed ops are skipped.
pub fn convert(ops: &[Op]) -> String {
    let mut writer = HtmlWriter::default();

    for op in ops {
        match &op.insert {
            Insert::Text(text) => {
                let mut segments = text.split('\n');
                if let Some(first) = segments.next() {
                    writer.push_text(first, &op.attributes);
                }
                for segment in segments {
                    writer.end_line(&op.attributes);
                    writer.push_text(segment, &op.attributes);
                }
            }
            Insert::Image(src) => writer.push_image(src),
            Insert::Unsupported => {}
        }
    }

    writer.finish()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OpLog {
    Document { ops: Vec<Op> },
    Ops(Vec<Op>),
}

/// Parse an editor op log (`{"ops": [...]}` or a bare array) and convert it.
pub fn convert_json(json: &str) -> Result<String, serde_json::Error> {
    Ok(convert(&parse_ops(json)?))
}

pub fn parse_ops(json: &str) -> Result<Vec<Op>, serde_json::Error> {
    let log: OpLog = serde_json::from_str(json)?;
    Ok(match log {
        OpLog::Document { ops } => ops,
        OpLog::Ops(ops) => ops,
    })
}

/// Escape the five HTML special characters.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[derive(Default)]
struct HtmlWriter {
    out: String,
    line: String,
    open_list: Option<ListKind>,
}

impl HtmlWriter {
    fn push_text(&mut self, text: &str, attributes: &Attributes) {
        if text.is_empty() {
            return;
        }
        self.line.push_str(&wrap_inline(escape_html(text), attributes));
    }

    fn push_image(&mut self, src: &str) {
        self.line.push_str(&format!("<img src=\"{}\">", escape_html(src)));
    }

    fn end_line(&mut self, attributes: &Attributes) {
        let line = std::mem::take(&mut self.line);
        match Block::resolve(attributes) {
            Block::Header(level) => {
                self.close_list();
                self.out.push_str(&format!("<h{level}>{line}</h{level}>\n"));
            }
            Block::Blockquote => {
                self.close_list();
                self.out.push_str(&format!("<blockquote>{line}</blockquote>\n"));
            }
            Block::List(kind) => {
                if self.open_list != Some(kind) {
                    self.close_list();
                    self.out.push_str(&format!("<{}>\n", kind.container_tag()));
                    self.open_list = Some(kind);
                }
                self.out.push_str(&format!("<li>{line}</li>\n"));
            }
            Block::Align(value) => {
                self.close_list();
                self.out
                    .push_str(&format!("<p style=\"text-align:{value}\">{line}</p>\n"));
            }
            Block::Paragraph => {
                self.close_list();
                // Empty plain lines produce nothing
                if !line.is_empty() {
                    self.out.push_str(&format!("<p>{line}</p>\n"));
                }
            }
        }
    }

    fn close_list(&mut self) {
        if let Some(kind) = self.open_list.take() {
            self.out.push_str(&format!("</{}>\n", kind.container_tag()));
        }
    }

    fn finish(mut self) -> String {
        if !self.line.is_empty() {
            self.end_line(&Attributes::default());
        }
        self.close_list();
        self.out
    }
}

/// Apply inline formatting to already-escaped text. Link is innermost, then
/// bold, italic, underline, strike.
fn wrap_inline(escaped: String, attributes: &Attributes) -> String {
    let mut html = escaped;
    if let Some(href) = &attributes.link {
        html = format!("<a href=\"{}\">{}</a>", escape_html(href), html);
    }
    if attributes.bold {
        html = format!("<strong>{html}</strong>");
    }
    if attributes.italic {
        html = format!("<em>{html}</em>");
    }
    if attributes.underline {
        html = format!("<u>{html}</u>");
    }
    if attributes.strike {
        html = format!("<s>{html}</s>");
    }
    html
}
