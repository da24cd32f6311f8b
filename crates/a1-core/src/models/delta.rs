//! Rich-text editor operation log
//!
//! The blog editor keeps its document as an ordered list of
//! `{insert, attributes}` operations. Text inserts carry inline formatting;
//! the newline that ends a line carries the block formatting for that line.

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Ordered,
}

impl ListKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "bullet" => Some(ListKind::Bullet),
            "ordered" => Some(ListKind::Ordered),
            _ => None,
        }
    }

    pub fn container_tag(&self) -> &'static str {
        match self {
            ListKind::Bullet => "ul",
            ListKind::Ordered => "ol",
        }
    }
}

/// Alignment values the editor produces. Anything else is ignored so the
/// value can go into a style attribute unescaped.
const ALIGNMENTS: [&str; 4] = ["left", "center", "right", "justify"];

/// Formatting attached to an op. Inline keys apply to the text run, block
/// keys apply to the line ended by a newline in this op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    pub link: Option<String>,
    pub header: Option<u8>,
    pub list: Option<ListKind>,
    pub blockquote: bool,
    pub align: Option<String>,
}

impl Attributes {
    /// Permissive conversion from the editor's attribute map. Unknown keys
    /// and values of the wrong shape are dropped.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let flag = |key: &str| map.get(key).and_then(Value::as_bool).unwrap_or(false);

        let header = map
            .get("header")
            .and_then(|v| match v {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.parse().ok(),
                _ => None,
            })
            .filter(|level| (1..=6).contains(level))
            .map(|level| level as u8);

        Self {
            bold: flag("bold"),
            italic: flag("italic"),
            underline: flag("underline"),
            strike: flag("strike"),
            link: map
                .get("link")
                .and_then(Value::as_str)
                .filter(|href| !href.is_empty())
                .map(str::to_string),
            header,
            list: map.get("list").and_then(Value::as_str).and_then(ListKind::parse),
            blockquote: flag("blockquote"),
            align: map
                .get("align")
                .and_then(Value::as_str)
                .filter(|value| ALIGNMENTS.contains(value))
                .map(str::to_string),
        }
    }
}

/// What an op inserts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insert {
    Text(String),
    Image(String),
    /// Neither text nor a recognized embed; skipped by the converter
    Unsupported,
}

/// One entry of the operation log.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawOp")]
pub struct Op {
    pub insert: Insert,
    pub attributes: Attributes,
}

#[derive(Deserialize)]
struct RawOp {
    #[serde(default)]
    insert: Value,
    #[serde(default)]
    attributes: Option<Map<String, Value>>,
}

impl From<RawOp> for Op {
    fn from(raw: RawOp) -> Self {
        let insert = match raw.insert {
            Value::String(text) => Insert::Text(text),
            Value::Object(embed) => match embed.get("image").and_then(Value::as_str) {
                Some(src) => Insert::Image(src.to_string()),
                None => Insert::Unsupported,
            },
            _ => Insert::Unsupported,
        };
        Self {
            insert,
            attributes: raw
                .attributes
                .as_ref()
                .map(Attributes::from_map)
                .unwrap_or_default(),
        }
    }
}

impl Op {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            insert: Insert::Text(text.into()),
            attributes: Attributes::default(),
        }
    }

    pub fn newline() -> Self {
        Self::text("\n")
    }

    pub fn image(src: impl Into<String>) -> Self {
        Self {
            insert: Insert::Image(src.into()),
            attributes: Attributes::default(),
        }
    }

    pub fn bold(mut self) -> Self {
        self.attributes.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.attributes.italic = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.attributes.underline = true;
        self
    }

    pub fn strike(mut self) -> Self {
        self.attributes.strike = true;
        self
    }

    pub fn link(mut self, href: impl Into<String>) -> Self {
        self.attributes.link = Some(href.into());
        self
    }

    pub fn header(mut self, level: u8) -> Self {
        self.attributes.header = Some(level);
        self
    }

    pub fn list(mut self, kind: ListKind) -> Self {
        self.attributes.list = Some(kind);
        self
    }

    pub fn blockquote(mut self) -> Self {
        self.attributes.blockquote = true;
        self
    }

    pub fn align(mut self, value: impl Into<String>) -> Self {
        self.attributes.align = Some(value.into());
        self
    }
}

/// Block element a finished line turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Header(u8),
    Blockquote,
    List(ListKind),
    Align(String),
    Paragraph,
}

impl Block {
    /// Precedence: header > blockquote > list > alignment > paragraph.
    pub fn resolve(attributes: &Attributes) -> Self {
        match attributes {
            Attributes {
                header: Some(level),
                ..
            } => Block::Header(*level),
            Attributes {
                blockquote: true, ..
            } => Block::Blockquote,
            Attributes {
                list: Some(kind), ..
            } => Block::List(*kind),
            Attributes {
                align: Some(value),
                ..
            } => Block::Align(value.clone()),
            _ => Block::Paragraph,
        }
    }
}
