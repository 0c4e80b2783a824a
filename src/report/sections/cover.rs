use crate::markup::escape;
use crate::model::{Parcel, PeriodRange};
use crate::report::assets::BrandingImage;
use crate::report::block::{Block, TextStyle};
use crate::report::style::ReportStyle;
use crate::utils::format_date;
use chrono::NaiveDateTime;

const LOGO_WIDTH_MM: f32 = 60.0;
const LOGO_MAX_HEIGHT_MM: f32 = 45.0;

pub fn render(
    parcel: &Parcel,
    range: &PeriodRange,
    generated_at: NaiveDateTime,
    logo: Option<&BrandingImage>,
    style: &ReportStyle,
) -> Vec<Block> {
    let mut blocks = vec![Block::Spacer(25.0)];

    match logo {
        Some(image) => {
            let mut width = LOGO_WIDTH_MM;
            let mut height = image.height_for_width(width);
            if height > LOGO_MAX_HEIGHT_MM {
                height = LOGO_MAX_HEIGHT_MM;
                width = image.width_for_height(height);
            }
            blocks.push(Block::Image {
                data: image.data.clone(),
                width_mm: width,
                height_mm: height,
            });
        }
        None => blocks.push(Block::centered(TextStyle::Title, escape(&style.brand_title))),
    }

    blocks.push(Block::Spacer(10.0));
    blocks.push(Block::centered(TextStyle::Title, "Informe de Análisis Satelital"));
    blocks.push(Block::centered(TextStyle::Subtitle, escape(&parcel.name)));
    blocks.push(Block::Spacer(15.0));

    blocks.push(Block::KeyValueTable(vec![
        ("Propietario".into(), parcel.owner.clone()),
        (
            "Cultivo".into(),
            parcel
                .crop_type
                .clone()
                .unwrap_or_else(|| style.unspecified_label.clone()),
        ),
        ("Superficie".into(), format!("{:.2} ha", parcel.area_hectares)),
        (
            "Período analizado".into(),
            format!("{} - {}", format_date(range.start), format_date(range.end)),
        ),
        (
            "Fecha de generación".into(),
            generated_at.format("%d/%m/%Y %H:%M").to_string(),
        ),
    ]));

    blocks.push(Block::Spacer(20.0));
    blocks.push(Block::centered(
        TextStyle::Caption,
        "Índices de vegetación NDVI, NDMI y SAVI obtenidos de imágenes satelitales.",
    ));
    blocks
}
