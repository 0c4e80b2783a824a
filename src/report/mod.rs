// Report module: section builders, document assembly, layout and PDF output.

pub mod assembler;
pub mod assets;
pub mod block;
pub mod generator;
pub mod layout;
pub mod overlay;
pub mod pdf;
pub mod sections;
pub mod style;

pub use assembler::{ReportContext, assemble};
pub use assets::{AssetLoader, BrandingImage};
pub use block::{Block, ReportDocument};
pub use generator::{ReportGenerator, ReportRequest};
pub use style::ReportStyle;
