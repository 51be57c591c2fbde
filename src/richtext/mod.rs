//! Rich-text document model.
//!
//! Documents are produced by the admin editor as a JSON tree and stored either
//! as JSON (section content) or as JSON-encoded text (page and section
//! descriptions). Every node kind is a variant of a sum type so renderers are
//! checked for exhaustiveness at compile time.
//!
//! ```text
//! {"type": "doc", "content": [
//!   {"type": "heading", "attrs": {"level": 2}, "content": [{"type": "text", "text": "Hi"}]},
//!   {"type": "image", "attrs": {"src": "...", "width": "50%", "height": "200px", "alignment": "left"}}
//! ]}
//! ```

mod image;
mod render;

pub use image::{Alignment, ImageAttrs, SizePreset};
pub use render::{escape_html, render_html};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Root of a rich-text tree.
///
/// The `"type": "doc"` tag is required, so arbitrary JSON objects are not
/// mistaken for an empty document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "type")]
    kind: DocTag,
    #[serde(default)]
    pub content: Vec<Block>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
enum DocTag {
    #[default]
    #[serde(rename = "doc")]
    Doc,
}

/// Block-level node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    Paragraph {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        content: Vec<Inline>,
    },
    Heading {
        attrs: HeadingAttrs,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        content: Vec<Inline>,
    },
    BulletList {
        #[serde(default)]
        content: Vec<ListItem>,
    },
    OrderedList {
        #[serde(default)]
        attrs: OrderedListAttrs,
        #[serde(default)]
        content: Vec<ListItem>,
    },
    Blockquote {
        #[serde(default)]
        content: Vec<Block>,
    },
    CodeBlock {
        #[serde(default)]
        attrs: CodeBlockAttrs,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        content: Vec<Inline>,
    },
    HorizontalRule,
    Image {
        attrs: ImageAttrs,
    },
}

/// Item of a bullet or ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListItem {
    #[serde(rename = "type", default)]
    kind: ListItemTag,
    #[serde(default)]
    pub content: Vec<Block>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
enum ListItemTag {
    #[default]
    #[serde(rename = "listItem")]
    ListItem,
}

impl ListItem {
    pub fn new(content: Vec<Block>) -> Self {
        Self {
            kind: ListItemTag::ListItem,
            content,
        }
    }
}

/// Inline node inside paragraphs, headings and code blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Inline {
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        marks: Vec<Mark>,
    },
    HardBreak,
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text {
            text: text.into(),
            marks: Vec::new(),
        }
    }
}

/// Formatting applied to a text run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mark {
    Bold,
    Italic,
    Strike,
    Code,
    Link { attrs: LinkAttrs },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkAttrs {
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingAttrs {
    pub level: HeadingLevel,
}

/// Heading level, restricted to 1..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        if (1..=3).contains(&level) {
            Ok(HeadingLevel(level))
        } else {
            Err(format!("heading level must be 1-3, got {}", level))
        }
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> u8 {
        level.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedListAttrs {
    #[serde(default = "default_start")]
    pub start: u32,
}

impl Default for OrderedListAttrs {
    fn default() -> Self {
        Self {
            start: default_start(),
        }
    }
}

fn default_start() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CodeBlockAttrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Document {
    pub fn new(content: Vec<Block>) -> Self {
        Self {
            kind: DocTag::Doc,
            content,
        }
    }

    /// A document holding `text` as a single paragraph.
    pub fn plain(text: &str) -> Self {
        let content = if text.is_empty() {
            Vec::new()
        } else {
            vec![Inline::text(text)]
        };
        Self::new(vec![Block::Paragraph { content }])
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Load a document persisted as text.
    ///
    /// Absent or blank text yields `None`. Text that is not a valid document is
    /// kept readable by wrapping it in a single paragraph.
    pub fn from_stored(text: Option<&str>) -> Option<Self> {
        let text = text?;
        if text.trim().is_empty() {
            return None;
        }

        match Self::from_json_str(text) {
            Ok(doc) => Some(doc),
            Err(e) => {
                debug!("Stored rich text is not a document ({}), using plain text", e);
                Some(Self::plain(text))
            }
        }
    }

    /// Load a document persisted as JSON, which may itself be a JSON string.
    pub fn from_stored_value(value: Option<&Value>) -> Option<Self> {
        match value? {
            Value::Null => None,
            Value::String(text) => Self::from_stored(Some(text.as_str())),
            Value::Object(map) if map.is_empty() => None,
            other @ Value::Object(_) => match serde_json::from_value(other.clone()) {
                Ok(doc) => Some(doc),
                Err(e) => {
                    debug!("Stored rich text is not a document ({}), using plain text", e);
                    Some(Self::plain(&other.to_string()))
                }
            },
            other => Some(Self::plain(&other.to_string())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Text content with one line per block, without markup.
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::new();
        for block in &self.content {
            collect_block_text(block, &mut lines);
        }
        lines.join("\n")
    }

    /// Visit every image node, depth first.
    pub fn for_each_image_mut(&mut self, mut f: impl FnMut(&mut ImageAttrs)) {
        fn walk(blocks: &mut [Block], f: &mut dyn FnMut(&mut ImageAttrs)) {
            for block in blocks {
                match block {
                    Block::Image { attrs } => f(attrs),
                    Block::Blockquote { content } => walk(content, f),
                    Block::BulletList { content } | Block::OrderedList { content, .. } => {
                        for item in content {
                            walk(&mut item.content, f);
                        }
                    }
                    Block::Paragraph { .. }
                    | Block::Heading { .. }
                    | Block::CodeBlock { .. }
                    | Block::HorizontalRule => {}
                }
            }
        }
        walk(&mut self.content, &mut f);
    }

    /// Resize every image with the given `src`. Returns how many changed.
    pub fn resize_image(
        &mut self,
        src: &str,
        preset: SizePreset,
        container_width: f64,
        aspect_ratio: f64,
    ) -> usize {
        let mut changed = 0;
        self.for_each_image_mut(|attrs| {
            if attrs.src == src && attrs.resize(preset, container_width, aspect_ratio) {
                changed += 1;
            }
        });
        changed
    }

    /// Align every image with the given `src`. Returns how many changed.
    pub fn align_image(&mut self, src: &str, alignment: Alignment) -> usize {
        let mut changed = 0;
        self.for_each_image_mut(|attrs| {
            if attrs.src == src {
                attrs.align(alignment);
                changed += 1;
            }
        });
        changed
    }
}

fn inline_text(content: &[Inline]) -> String {
    content
        .iter()
        .map(|inline| match inline {
            Inline::Text { text, .. } => text.as_str(),
            Inline::HardBreak => "\n",
        })
        .collect()
}

fn collect_block_text(block: &Block, lines: &mut Vec<String>) {
    match block {
        Block::Paragraph { content }
        | Block::Heading { content, .. }
        | Block::CodeBlock { content, .. } => {
            let text = inline_text(content);
            if !text.is_empty() {
                lines.push(text);
            }
        }
        Block::BulletList { content } | Block::OrderedList { content, .. } => {
            for item in content {
                for child in &item.content {
                    collect_block_text(child, lines);
                }
            }
        }
        Block::Blockquote { content } => {
            for child in content {
                collect_block_text(child, lines);
            }
        }
        Block::Image { attrs } => {
            if let Some(alt) = attrs.alt.as_deref().filter(|a| !a.is_empty()) {
                lines.push(alt.to_string());
            }
        }
        Block::HorizontalRule => {}
    }
}
