pub mod analyzer;
pub mod chart;
pub mod config;
pub mod markup;
pub mod model;
pub mod normalizer;
pub mod report;
pub mod storage;
pub mod utils;
