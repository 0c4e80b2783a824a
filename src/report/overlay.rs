use crate::model::RenderError;
use crate::report::assets::BrandingImage;
use crate::report::style::{ReportStyle, Rgb};
use crate::utils::format_date;
use chrono::NaiveDate;
use tracing::debug;

const MARK_HEIGHT_MM: f32 = 8.0;
const MARK_GAP_MM: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Drawing surface of one physical page. Coordinates in millimetres from the
/// bottom-left corner.
pub trait PageCanvas {
    fn text(&mut self, text: &str, size_pt: f32, x_mm: f32, y_mm: f32, align: TextAlign, color: Rgb);

    fn image(&mut self, image: &BrandingImage, x_mm: f32, y_mm: f32, height_mm: f32) -> Result<(), RenderError>;

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb);
}

/// Header and footer drawn on every page, the first one included.
pub struct PaginationOverlay<'a> {
    style: &'a ReportStyle,
    mark: Option<&'a BrandingImage>,
    date: NaiveDate,
}

impl<'a> PaginationOverlay<'a> {
    pub fn new(style: &'a ReportStyle, mark: Option<&'a BrandingImage>, date: NaiveDate) -> Self {
        Self { style, mark, date }
    }

    pub fn draw(&self, canvas: &mut dyn PageCanvas, page_number: usize) {
        let page = &self.style.page;
        let left = page.margin_mm;
        let right = page.width_mm - page.margin_mm;
        let header_y = page.height_mm - page.margin_mm;

        let mut title_x = left;
        if let Some(mark) = self.mark {
            match canvas.image(mark, left, header_y - MARK_HEIGHT_MM / 2.0, MARK_HEIGHT_MM) {
                Ok(()) => title_x += mark.width_for_height(MARK_HEIGHT_MM) + MARK_GAP_MM,
                Err(e) => debug!("Header mark skipped on page {}: {}", page_number, e),
            }
        }
        canvas.text(
            &self.style.header_title,
            self.style.fonts.header,
            title_x,
            header_y,
            TextAlign::Left,
            self.style.primary,
        );
        canvas.line(
            (left, header_y - MARK_HEIGHT_MM / 2.0 - 1.5),
            (right, header_y - MARK_HEIGHT_MM / 2.0 - 1.5),
            self.style.rule,
        );

        let footer_y = page.margin_mm - 8.0;
        canvas.text(
            &format!("Página {}", page_number),
            self.style.fonts.header,
            page.width_mm / 2.0,
            footer_y,
            TextAlign::Center,
            self.style.muted,
        );
        canvas.text(
            &format_date(self.date),
            self.style.fonts.header,
            right,
            footer_y,
            TextAlign::Right,
            self.style.muted,
        );
    }
}
