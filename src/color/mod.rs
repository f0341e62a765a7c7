//! Color analysis module
//!
//! Exact-color histograms, luma/distance/hex primitives, and the flat
//! icon classifier built on top of them.

pub mod analysis;
pub mod conversion;
pub mod histogram;

pub use analysis::{IconColorAnalyzer, IconStatistics};
pub use conversion::{ColorConverter, ColorKey};
pub use histogram::ColorHistogram;
