//! Flow layout: places document blocks on A4 pages.
//!
//! Coordinates are millimetres from the bottom-left corner of the page, the
//! way the PDF writer expects them. Text width is estimated from the
//! character count, which is close enough for Helvetica at body sizes.

use crate::markup::{Run, parse_lines};
use crate::model::RenderError;
use crate::report::block::{Align, Block, ReportDocument, TextStyle};
use crate::report::style::{ReportStyle, Rgb};

pub const PT_TO_MM: f32 = 0.3528;
const LINE_SPACING: f32 = 1.35;
const KEEP_WITH_NEXT_MM: f32 = 20.0;
const KEY_COLUMN_MM: f32 = 55.0;
const CELL_PADDING_MM: f32 = 1.5;
const IMAGE_GAP_MM: f32 = 3.0;

pub fn text_width_mm(text: &str, size_pt: f32, bold: bool) -> f32 {
    let em = if bold { 0.55 } else { 0.5 };
    text.chars().count() as f32 * size_pt * em * PT_TO_MM
}

#[derive(Debug, Clone, PartialEq)]
pub enum Placed<'a> {
    Text {
        text: String,
        x_mm: f32,
        baseline_mm: f32,
        size_pt: f32,
        bold: bool,
        color: Rgb,
    },
    /// `y_mm` is the bottom edge.
    Image {
        data: &'a [u8],
        x_mm: f32,
        y_mm: f32,
        width_mm: f32,
        height_mm: f32,
    },
    Rule {
        from: (f32, f32),
        to: (f32, f32),
        color: Rgb,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout<'a> {
    pub items: Vec<Placed<'a>>,
}

impl PageLayout<'_> {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            Placed::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

struct TextSpec {
    size: f32,
    color: Rgb,
    bold: bool,
    space_after: f32,
}

impl TextSpec {
    fn of(text_style: TextStyle, style: &ReportStyle) -> Self {
        let fonts = &style.fonts;
        let (size, color, bold, space_after) = match text_style {
            TextStyle::Title => (fonts.title, style.primary, true, 4.0),
            TextStyle::Subtitle => (fonts.subtitle, style.text, true, 3.0),
            TextStyle::Heading => (fonts.heading, style.primary, true, 5.0),
            TextStyle::Subheading => (fonts.subheading, style.text, true, 1.5),
            TextStyle::Body => (fonts.body, style.text, false, 2.5),
            TextStyle::Caption => (fonts.caption, style.muted, false, 4.0),
        };
        Self {
            size,
            color,
            bold,
            space_after,
        }
    }

    fn line_height(&self) -> f32 {
        self.size * PT_TO_MM * LINE_SPACING
    }
}

/// Greedy word wrap of one logical line. Runs keep their own emphasis;
/// `force_bold` only affects the width estimate.
pub fn wrap(line: &[Run], size_pt: f32, force_bold: bool, max_width_mm: f32) -> Vec<Vec<Run>> {
    let mut lines = Vec::new();
    let mut current: Vec<Run> = Vec::new();
    let mut width = 0.0;

    for run in line {
        let bold = force_bold || run.bold;
        for token in run.text.split_inclusive(' ') {
            let word = text_width_mm(token.trim_end(), size_pt, bold);
            if !current.is_empty() && width + word > max_width_mm {
                trim_line_end(&mut current);
                lines.push(std::mem::take(&mut current));
                width = 0.0;
            }
            let token = if current.is_empty() { token.trim_start() } else { token };
            if token.is_empty() {
                continue;
            }
            width += text_width_mm(token, size_pt, bold);
            match current.last_mut() {
                Some(last) if last.bold == run.bold => last.text.push_str(token),
                _ => current.push(Run {
                    text: token.to_string(),
                    bold: run.bold,
                }),
            }
        }
    }
    trim_line_end(&mut current);
    lines.push(current);
    lines
}

fn trim_line_end(line: &mut Vec<Run>) {
    while let Some(last) = line.last_mut() {
        let trimmed = last.text.trim_end().len();
        last.text.truncate(trimmed);
        if !last.text.is_empty() {
            break;
        }
        line.pop();
    }
}

struct Paginator<'a, 's> {
    style: &'s ReportStyle,
    pages: Vec<PageLayout<'a>>,
    y: f32,
    touched: bool,
}

impl<'a, 's> Paginator<'a, 's> {
    fn new(style: &'s ReportStyle) -> Self {
        Self {
            style,
            pages: vec![PageLayout::default()],
            y: style.page.content_top(),
            touched: false,
        }
    }

    fn left(&self) -> f32 {
        self.style.page.margin_mm
    }

    fn width(&self) -> f32 {
        self.style.page.content_width()
    }

    fn new_page(&mut self) {
        self.pages.push(PageLayout::default());
        self.y = self.style.page.content_top();
        self.touched = false;
    }

    /// Starts a new page when `height` does not fit below the cursor.
    /// An untouched page takes whatever comes.
    fn ensure(&mut self, height: f32) -> bool {
        if self.touched && self.y - height < self.style.page.content_bottom() {
            self.new_page();
            return true;
        }
        false
    }

    fn place(&mut self, item: Placed<'a>) {
        if let Some(page) = self.pages.last_mut() {
            page.items.push(item);
        }
        self.touched = true;
    }

    fn rule(&mut self, y: f32, width: f32, color: Rgb) {
        let left = self.left();
        self.place(Placed::Rule {
            from: (left, y),
            to: (left + width, y),
            color,
        });
    }

    fn block(&mut self, block: &'a Block) -> Result<(), RenderError> {
        match block {
            Block::Paragraph { style, align, markup } => self.paragraph(*style, *align, markup)?,
            Block::Spacer(mm) => self.spacer(*mm),
            Block::PageBreak => {
                if self.touched {
                    self.new_page();
                }
            }
            Block::Image {
                data,
                width_mm,
                height_mm,
            } => self.image(data, *width_mm, *height_mm),
            Block::KeyValueTable(rows) => self.key_values(rows),
            Block::DataTable { header, rows, widths } => self.data_table(header, rows, widths),
        }
        Ok(())
    }

    fn spacer(&mut self, mm: f32) {
        if self.y - mm < self.style.page.content_bottom() {
            if self.touched {
                self.new_page();
            }
        } else {
            self.y -= mm;
        }
    }

    fn paragraph(&mut self, text_style: TextStyle, align: Align, markup: &str) -> Result<(), RenderError> {
        let spec = TextSpec::of(text_style, self.style);
        let line_height = spec.line_height();
        let width = self.width();
        let lines: Vec<Vec<Run>> = parse_lines(markup)?
            .iter()
            .flat_map(|line| wrap(line, spec.size, spec.bold, width))
            .collect();

        let is_heading = matches!(text_style, TextStyle::Heading | TextStyle::Subheading);
        if is_heading {
            self.ensure(line_height * lines.len() as f32 + KEEP_WITH_NEXT_MM);
        }
        for line in &lines {
            self.ensure(line_height);
            self.text_line(line, &spec, align);
            self.y -= line_height;
        }
        if text_style == TextStyle::Heading {
            let y = self.y + 1.0;
            self.rule(y, width, self.style.primary);
        }
        self.y -= spec.space_after;
        Ok(())
    }

    fn text_line(&mut self, runs: &[Run], spec: &TextSpec, align: Align) {
        let line_width: f32 = runs
            .iter()
            .map(|r| text_width_mm(&r.text, spec.size, spec.bold || r.bold))
            .sum();
        let mut x = match align {
            Align::Left => self.left(),
            Align::Center => self.left() + ((self.width() - line_width) / 2.0).max(0.0),
        };
        let baseline = self.y - spec.size * PT_TO_MM;
        for run in runs {
            let bold = spec.bold || run.bold;
            self.place(Placed::Text {
                text: run.text.clone(),
                x_mm: x,
                baseline_mm: baseline,
                size_pt: spec.size,
                bold,
                color: spec.color,
            });
            x += text_width_mm(&run.text, spec.size, bold);
        }
        // an empty line still occupies the page
        self.touched = true;
    }

    fn image(&mut self, data: &'a [u8], width_mm: f32, height_mm: f32) {
        let max_width = self.width();
        let (width, height) = if width_mm > max_width {
            (max_width, height_mm * max_width / width_mm)
        } else {
            (width_mm, height_mm)
        };
        self.ensure(height);
        let x = self.left() + (max_width - width) / 2.0;
        let y = self.y - height;
        self.place(Placed::Image {
            data,
            x_mm: x,
            y_mm: y,
            width_mm: width,
            height_mm: height,
        });
        self.y -= height + IMAGE_GAP_MM;
    }

    fn key_values(&mut self, rows: &[(String, String)]) {
        let size = self.style.fonts.body;
        let line_height = size * PT_TO_MM * LINE_SPACING;
        let value_width = self.width() - KEY_COLUMN_MM;
        let (text, rule) = (self.style.text, self.style.rule);

        for (key, value) in rows {
            let value = [Run {
                text: value.clone(),
                bold: false,
            }];
            let lines = wrap(&value, size, false, value_width);
            let height = lines.len() as f32 * line_height + 2.0;
            self.ensure(height);

            let baseline = self.y - size * PT_TO_MM;
            let left = self.left();
            self.place(Placed::Text {
                text: key.clone(),
                x_mm: left,
                baseline_mm: baseline,
                size_pt: size,
                bold: true,
                color: text,
            });
            for (i, line) in lines.iter().enumerate() {
                let line_text: String = line.iter().map(|r| r.text.as_str()).collect();
                self.place(Placed::Text {
                    text: line_text,
                    x_mm: left + KEY_COLUMN_MM,
                    baseline_mm: baseline - i as f32 * line_height,
                    size_pt: size,
                    bold: false,
                    color: text,
                });
            }
            self.y -= height;
            let y = self.y + 0.8;
            let width = self.width();
            self.rule(y, width, rule);
        }
        self.y -= 3.0;
    }

    fn data_table(&mut self, header: &[String], rows: &[Vec<String>], widths: &[f32]) {
        let size = self.style.fonts.table;
        let row_height = size * PT_TO_MM * 1.8;

        self.ensure(row_height * 2.0);
        self.table_row(header, widths, size, true, row_height);
        for row in rows {
            if self.ensure(row_height) {
                self.table_row(header, widths, size, true, row_height);
            }
            self.table_row(row, widths, size, false, row_height);
        }
        self.y -= 3.0;
    }

    fn table_row(&mut self, cells: &[String], widths: &[f32], size: f32, header: bool, row_height: f32) {
        let baseline = self.y - row_height * 0.7;
        let mut x = self.left();
        let color = self.style.text;
        for (cell, width) in cells.iter().zip(widths) {
            self.place(Placed::Text {
                text: cell.clone(),
                x_mm: x + CELL_PADDING_MM,
                baseline_mm: baseline,
                size_pt: size,
                bold: header,
                color,
            });
            x += width;
        }
        self.y -= row_height;
        let total: f32 = widths.iter().sum();
        let rule = if header { self.style.text } else { self.style.rule };
        let y = self.y;
        self.rule(y, total, rule);
    }
}

/// Lays the document out page by page. Fails only on malformed markup.
pub fn paginate<'a>(document: &'a ReportDocument, style: &ReportStyle) -> Result<Vec<PageLayout<'a>>, RenderError> {
    let mut paginator = Paginator::new(style);
    for block in document.blocks() {
        paginator.block(block)?;
    }
    Ok(paginator.pages)
}
