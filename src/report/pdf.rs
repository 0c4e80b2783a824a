use crate::model::RenderError;
use crate::report::assets::BrandingImage;
use crate::report::block::ReportDocument;
use crate::report::layout::{self, PageLayout, Placed, text_width_mm};
use crate::report::overlay::{PageCanvas, PaginationOverlay, TextAlign};
use crate::report::style::{ReportStyle, Rgb};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point,
};
use std::io::{BufWriter, Write};
use tracing::debug;

const IMAGE_DPI: f32 = 300.0;
const LAYER: &str = "Contenido";

fn pdf_error<E: std::fmt::Debug>(e: E) -> RenderError {
    RenderError::Pdf(format!("{:?}", e))
}

fn pdf_color(rgb: Rgb) -> Color {
    let (r, g, b) = rgb.unit();
    Color::Rgb(printpdf::Rgb::new(r, g, b, None))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// printpdf layer wrapped as a [`PageCanvas`].
struct PdfCanvas<'a> {
    layer: PdfLayerReference,
    fonts: &'a Fonts,
}

impl PdfCanvas<'_> {
    fn write_text(&self, text: &str, size_pt: f32, x_mm: f32, y_mm: f32, bold: bool, color: Rgb) {
        let font = if bold { &self.fonts.bold } else { &self.fonts.regular };
        self.layer.set_fill_color(pdf_color(color));
        self.layer.use_text(text, size_pt, Mm(x_mm), Mm(y_mm), font);
    }

    fn embed(&self, data: &[u8], x_mm: f32, y_mm: f32, width_mm: f32, height_mm: f32) -> Result<(), RenderError> {
        let decoded =
            printpdf::image_crate::load_from_memory(data).map_err(|e| RenderError::Image(e.to_string()))?;
        let (width_px, height_px) = (decoded.width() as f32, decoded.height() as f32);
        if width_px == 0.0 || height_px == 0.0 {
            return Err(RenderError::Image("empty image".into()));
        }
        let natural_width = width_px / IMAGE_DPI * 25.4;
        let natural_height = height_px / IMAGE_DPI * 25.4;

        Image::from_dynamic_image(&decoded).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x_mm)),
                translate_y: Some(Mm(y_mm)),
                scale_x: Some(width_mm / natural_width),
                scale_y: Some(height_mm / natural_height),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
        Ok(())
    }

    fn paint(&mut self, page: &PageLayout<'_>) -> Result<(), RenderError> {
        for item in &page.items {
            match item {
                Placed::Text {
                    text,
                    x_mm,
                    baseline_mm,
                    size_pt,
                    bold,
                    color,
                } => self.write_text(text, *size_pt, *x_mm, *baseline_mm, *bold, *color),
                Placed::Image {
                    data,
                    x_mm,
                    y_mm,
                    width_mm,
                    height_mm,
                } => self.embed(data, *x_mm, *y_mm, *width_mm, *height_mm)?,
                Placed::Rule { from, to, color } => self.line(*from, *to, *color),
            }
        }
        Ok(())
    }
}

impl PageCanvas for PdfCanvas<'_> {
    fn text(&mut self, text: &str, size_pt: f32, x_mm: f32, y_mm: f32, align: TextAlign, color: Rgb) {
        let width = text_width_mm(text, size_pt, false);
        let x = match align {
            TextAlign::Left => x_mm,
            TextAlign::Center => x_mm - width / 2.0,
            TextAlign::Right => x_mm - width,
        };
        self.write_text(text, size_pt, x, y_mm, false, color);
    }

    fn image(&mut self, image: &BrandingImage, x_mm: f32, y_mm: f32, height_mm: f32) -> Result<(), RenderError> {
        let width_mm = image.width_for_height(height_mm);
        self.embed(&image.data, x_mm, y_mm, width_mm, height_mm)
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb) {
        self.layer.set_outline_color(pdf_color(color));
        self.layer.set_outline_thickness(0.5);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(from.0), Mm(from.1)), false),
                (Point::new(Mm(to.0), Mm(to.1)), false),
            ],
            is_closed: false,
        });
    }
}

/// Lays out `document`, paints every page plus the overlay and writes the
/// PDF to `writer`. Returns the page count.
pub fn render_pdf<W: Write>(
    document: &ReportDocument,
    style: &ReportStyle,
    overlay: &PaginationOverlay<'_>,
    title: &str,
    writer: W,
) -> Result<usize, RenderError> {
    let pages = layout::paginate(document, style)?;
    let (width, height) = (Mm(style.page.width_mm), Mm(style.page.height_mm));

    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, LAYER);
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?,
    };

    for (i, page) in pages.iter().enumerate() {
        let (page_index, layer_index) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, LAYER)
        };
        let mut canvas = PdfCanvas {
            layer: doc.get_page(page_index).get_layer(layer_index),
            fonts: &fonts,
        };
        canvas.paint(page)?;
        overlay.draw(&mut canvas, i + 1);
    }

    debug!("PDF laid out on {} pages", pages.len());
    let mut writer = BufWriter::new(writer);
    doc.save(&mut writer).map_err(pdf_error)?;
    writer.flush()?;
    Ok(pages.len())
}
