/// Paragraph text styles; sizes and colours come from [`super::style::ReportStyle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Title,
    Subtitle,
    Heading,
    Subheading,
    Body,
    Caption,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Renderable unit produced by the section builders.
///
/// Paragraph text is sanitized markup; table cells are plain text.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph {
        style: TextStyle,
        align: Align,
        markup: String,
    },
    /// Vertical space in millimetres.
    Spacer(f32),
    PageBreak,
    /// Encoded PNG or JPEG bytes with their display size.
    Image {
        data: Vec<u8>,
        width_mm: f32,
        height_mm: f32,
    },
    /// Two-column label/value listing.
    KeyValueTable(Vec<(String, String)>),
    DataTable {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
        /// Column widths in millimetres.
        widths: Vec<f32>,
    },
}

impl Block {
    pub fn paragraph(style: TextStyle, markup: impl Into<String>) -> Self {
        Block::Paragraph {
            style,
            align: Align::Left,
            markup: markup.into(),
        }
    }

    pub fn centered(style: TextStyle, markup: impl Into<String>) -> Self {
        Block::Paragraph {
            style,
            align: Align::Center,
            markup: markup.into(),
        }
    }

    pub fn heading(markup: impl Into<String>) -> Self {
        Self::paragraph(TextStyle::Heading, markup)
    }

    pub fn body(markup: impl Into<String>) -> Self {
        Self::paragraph(TextStyle::Body, markup)
    }

    /// Markup of a paragraph, `None` for other blocks.
    pub fn markup(&self) -> Option<&str> {
        match self {
            Block::Paragraph { markup, .. } => Some(markup),
            _ => None,
        }
    }
}

/// Ordered blocks of one report, ready for the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportDocument {
    blocks: Vec<Block>,
}

impl ReportDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn extend(&mut self, blocks: impl IntoIterator<Item = Block>) {
        self.blocks.extend(blocks);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn page_breaks(&self) -> usize {
        self.blocks.iter().filter(|b| matches!(b, Block::PageBreak)).count()
    }

    /// Whether any heading block carries `text`.
    pub fn has_heading(&self, text: &str) -> bool {
        self.blocks.iter().any(|b| match b {
            Block::Paragraph {
                style: TextStyle::Heading,
                markup,
                ..
            } => markup.contains(text),
            _ => false,
        })
    }
}
