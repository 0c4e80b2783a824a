use crate::config::ReportConfig;
use crate::model::VegetationIndex;

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn from_hex(hex: u32) -> Self {
        Self((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Components scaled to `0.0..=1.0`.
    pub fn unit(&self) -> (f32, f32, f32) {
        (self.0 as f32 / 255.0, self.1 as f32 / 255.0, self.2 as f32 / 255.0)
    }
}

/// Fixed colour per index, shared by every chart and caption of a document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexPalette {
    pub ndvi: Rgb,
    pub ndmi: Rgb,
    pub savi: Rgb,
}

impl IndexPalette {
    pub fn color(&self, index: VegetationIndex) -> Rgb {
        match index {
            VegetationIndex::Ndvi => self.ndvi,
            VegetationIndex::Ndmi => self.ndmi,
            VegetationIndex::Savi => self.savi,
        }
    }

    pub fn color_name(&self, index: VegetationIndex) -> &'static str {
        match index {
            VegetationIndex::Ndvi => "verde",
            VegetationIndex::Ndmi => "azul",
            VegetationIndex::Savi => "naranja",
        }
    }
}

impl Default for IndexPalette {
    fn default() -> Self {
        Self {
            ndvi: Rgb::from_hex(0x2E8B57),
            ndmi: Rgb::from_hex(0x17A2B8),
            savi: Rgb::from_hex(0xFF7A00),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
    /// Extra top space reserved for the page header.
    pub header_mm: f32,
    /// Extra bottom space reserved for the page footer.
    pub footer_mm: f32,
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.width_mm - 2.0 * self.margin_mm
    }

    pub fn content_top(&self) -> f32 {
        self.height_mm - self.margin_mm - self.header_mm
    }

    pub fn content_bottom(&self) -> f32 {
        self.margin_mm + self.footer_mm
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        // A4
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 20.0,
            header_mm: 10.0,
            footer_mm: 5.0,
        }
    }
}

/// Point sizes of the text styles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSizes {
    pub title: f32,
    pub subtitle: f32,
    pub heading: f32,
    pub subheading: f32,
    pub body: f32,
    pub caption: f32,
    pub table: f32,
    pub header: f32,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            title: 26.0,
            subtitle: 16.0,
            heading: 17.0,
            subheading: 13.0,
            body: 11.0,
            caption: 9.0,
            table: 9.0,
            header: 9.0,
        }
    }
}

/// Immutable formatting configuration, built once and passed to every builder.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportStyle {
    pub page: PageGeometry,
    pub fonts: FontSizes,
    pub palette: IndexPalette,
    pub primary: Rgb,
    pub text: Rgb,
    pub muted: Rgb,
    pub rule: Rgb,
    pub brand_title: String,
    pub header_title: String,
    pub unspecified_label: String,
    pub unavailable_label: String,
    pub no_data_marker: String,
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self {
            page: PageGeometry::default(),
            fonts: FontSizes::default(),
            palette: IndexPalette::default(),
            primary: Rgb::from_hex(0x2E8B57),
            text: Rgb::from_hex(0x2C3E50),
            muted: Rgb(128, 128, 128),
            rule: Rgb(190, 190, 190),
            brand_title: "AgroTech Histórico".into(),
            header_title: "AgroTech - Análisis Satelital Agrícola".into(),
            unspecified_label: "No especificado".into(),
            unavailable_label: "No disponible".into(),
            no_data_marker: "N/D".into(),
        }
    }
}

impl ReportStyle {
    pub fn from_config(config: &ReportConfig) -> Self {
        let mut style = Self::default();
        if let Some(title) = &config.brand_title {
            style.brand_title = title.clone();
        }
        if let Some(title) = &config.header_title {
            style.header_title = title.clone();
        }
        style
    }
}
