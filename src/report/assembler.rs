use crate::chart::ReportCharts;
use crate::model::{AnalysisBundle, MonthlyRecord, Parcel, PeriodRange};
use crate::report::assets::BrandingImage;
use crate::report::block::{Block, ReportDocument};
use crate::report::sections::Section;
use crate::report::style::ReportStyle;
use chrono::NaiveDateTime;
use tracing::debug;

const PARCEL_INFO_SPACING_MM: f32 = 8.0;

/// Everything one report is built from. Borrowed for the duration of assembly.
pub struct ReportContext<'a> {
    pub parcel: &'a Parcel,
    pub range: PeriodRange,
    pub generated_at: NaiveDateTime,
    pub records: &'a [MonthlyRecord],
    pub analysis: &'a AnalysisBundle,
    pub charts: &'a ReportCharts,
    pub cover_logo: Option<&'a BrandingImage>,
}

impl ReportContext<'_> {
    /// Sections in document order. SAVI appears only when it was analyzed.
    pub fn sections(&self) -> Vec<Section<'_>> {
        let mut sections = vec![
            Section::Cover {
                parcel: self.parcel,
                range: &self.range,
                generated_at: self.generated_at,
                logo: self.cover_logo,
            },
            Section::Summary(self.analysis),
            Section::ParcelInfo(self.parcel),
            Section::Index(&self.analysis.ndvi),
            Section::Index(&self.analysis.ndmi),
        ];
        if let Some(savi) = &self.analysis.savi {
            sections.push(Section::Index(savi));
        }
        sections.push(Section::Trends {
            trend: &self.analysis.trend,
            charts: self.charts,
            has_savi: self.analysis.savi.is_some(),
        });
        sections.push(Section::Recommendations(&self.analysis.recommendations));
        sections.push(Section::DataTable(self.records));
        sections
    }
}

/// Concatenates the sections with a page break between them, except for the
/// spacing after the parcel info and nothing after the data table.
pub fn assemble(context: &ReportContext<'_>, style: &ReportStyle) -> ReportDocument {
    let sections = context.sections();
    let last = sections.len().saturating_sub(1);
    let mut document = ReportDocument::new();

    for (i, section) in sections.iter().enumerate() {
        let blocks = section.render(style);
        debug!("Section {}: {} blocks", section.name(), blocks.len());
        document.extend(blocks);

        if i == last {
            continue;
        }
        match section {
            Section::ParcelInfo(_) => document.push(Block::Spacer(PARCEL_INFO_SPACING_MM)),
            _ => document.push(Block::PageBreak),
        }
    }
    document
}
