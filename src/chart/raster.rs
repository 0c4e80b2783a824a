use crate::chart::glyphs;
use crate::chart::plot::{ComparativePlot, TimeSeriesPlot};
use crate::model::{ChartError, VegetationIndex};
use crate::report::style::{IndexPalette, Rgb};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use plotters::coord::Shift;
use plotters::prelude::*;

const GRID_LINES: usize = 5;
const LABEL_SCALE: i32 = 4;
const TICK_SCALE: i32 = 3;
const MAX_TICKS: usize = 12;
/// Room under the plot area for the period ticks.
const TICK_BAND: u32 = 60;

fn drawing<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Drawing(e.to_string())
}

fn color(rgb: Rgb) -> RGBColor {
    RGBColor(rgb.0, rgb.1, rgb.2)
}

fn grid_color() -> RGBColor {
    RGBColor(215, 215, 215)
}

/// Draws the per-index line chart into a fresh RGB buffer.
pub fn time_series_pixels(
    plot: &TimeSeriesPlot,
    palette: &IndexPalette,
    (width, height): (u32, u32),
) -> Result<Vec<u8>, ChartError> {
    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(drawing)?;

        let (lo, hi) = plot.value_range();
        let x_max = plot.periods.len().saturating_sub(1).max(1) as f64;
        let mut chart = ChartBuilder::on(&root)
            .margin(40)
            .margin_bottom(40 + TICK_BAND)
            .build_cartesian_2d(-0.3..x_max + 0.3, lo..hi)
            .map_err(drawing)?;

        for step in 0..=GRID_LINES {
            let y = lo + (hi - lo) * step as f64 / GRID_LINES as f64;
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(-0.3, y), (x_max + 0.3, y)],
                    grid_color().stroke_width(1),
                )))
                .map_err(drawing)?;
        }
        for i in 0..plot.periods.len() {
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(i as f64, lo), (i as f64, hi)],
                    grid_color().mix(0.6).stroke_width(1),
                )))
                .map_err(drawing)?;
        }
        for (i, tick) in plot.tick_labels(MAX_TICKS) {
            let (px, py) = chart.backend_coord(&(i as f64, lo));
            let baseline = py + 16 + glyphs::GLYPH_HEIGHT * TICK_SCALE;
            draw_scaled_label(&root, tick, px, baseline, TICK_SCALE, &BLACK)?;
        }
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(-0.3, 0.0), (x_max + 0.3, 0.0)],
                BLACK.mix(0.5).stroke_width(2),
            )))
            .map_err(drawing)?;

        for line in &plot.lines {
            let stroke = color(palette.color(line.index));
            for segment in line.segments() {
                let points: Vec<(f64, f64)> = segment.iter().map(|(i, v)| (*i as f64, *v)).collect();
                chart
                    .draw_series(std::iter::once(PathElement::new(points, stroke.stroke_width(4))))
                    .map_err(drawing)?;
            }
            let coords = line.points.iter().map(|(i, v)| (*i as f64, *v));
            match line.index {
                VegetationIndex::Ndvi => chart
                    .draw_series(coords.map(|c| Circle::new(c, 7, stroke.filled())))
                    .map(|_| ()),
                VegetationIndex::Ndmi => chart
                    .draw_series(coords.map(|c| {
                        EmptyElement::at(c) + Rectangle::new([(-6, -6), (6, 6)], stroke.filled())
                    }))
                    .map(|_| ()),
                VegetationIndex::Savi => chart
                    .draw_series(coords.map(|c| TriangleMarker::new(c, 8, stroke.filled())))
                    .map(|_| ()),
            }
            .map_err(drawing)?;
        }

        root.present().map_err(drawing)?;
    }
    Ok(buffer)
}

/// Draws the mean-per-index bar chart with numeric labels into a fresh RGB buffer.
pub fn comparative_pixels(
    plot: &ComparativePlot,
    palette: &IndexPalette,
    (width, height): (u32, u32),
) -> Result<Vec<u8>, ChartError> {
    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(drawing)?;

        let (lo, hi) = plot.value_range();
        let slots = plot.bars.len().max(1) as f64;
        let mut chart = ChartBuilder::on(&root)
            .margin(40)
            .build_cartesian_2d(-0.5..slots - 0.5, lo..hi)
            .map_err(drawing)?;

        for step in 0..=GRID_LINES {
            let y = lo + (hi - lo) * step as f64 / GRID_LINES as f64;
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(-0.5, y), (slots - 0.5, y)],
                    grid_color().stroke_width(1),
                )))
                .map_err(drawing)?;
        }

        for (i, bar) in plot.bars.iter().enumerate() {
            let x = i as f64;
            let fill = color(palette.color(bar.index));
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(x - 0.3, 0.0), (x + 0.3, bar.mean)],
                    fill.mix(0.85).filled(),
                )))
                .map_err(drawing)?;
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(x - 0.3, 0.0), (x + 0.3, bar.mean)],
                    BLACK.stroke_width(2),
                )))
                .map_err(drawing)?;

            let (px, py) = chart.backend_coord(&(x, bar.mean.max(0.0)));
            draw_label(&root, &bar.label, px, py - 12, &BLACK)?;
        }

        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(-0.5, 0.0), (slots - 0.5, 0.0)],
                BLACK.stroke_width(2),
            )))
            .map_err(drawing)?;

        root.present().map_err(drawing)?;
    }
    Ok(buffer)
}

fn draw_label<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    text: &str,
    center_x: i32,
    bottom_y: i32,
    ink: &RGBColor,
) -> Result<(), ChartError> {
    draw_scaled_label(area, text, center_x, bottom_y, LABEL_SCALE, ink)
}

/// Draws `text` centred on `center_x` with its baseline at `bottom_y`.
fn draw_scaled_label<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    text: &str,
    center_x: i32,
    bottom_y: i32,
    scale: i32,
    ink: &RGBColor,
) -> Result<(), ChartError> {
    let left = center_x - glyphs::width(text) * scale / 2;
    let top = bottom_y - glyphs::GLYPH_HEIGHT * scale;
    for (col, row) in glyphs::dots(text) {
        let x = left + col * scale;
        let y = top + row * scale;
        area.draw(&Rectangle::new([(x, y), (x + scale, y + scale)], ink.filled()))
            .map_err(drawing)?;
    }
    Ok(())
}

/// Encodes an RGB buffer as PNG.
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ChartError> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(pixels, width, height, ColorType::Rgb8)
        .map_err(|e| ChartError::Encoding(e.to_string()))?;
    Ok(png)
}
