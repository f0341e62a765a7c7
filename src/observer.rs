//! Diagnostic hooks for icon analysis
//!
//! Per-image statistics are instrumentation, not part of the analysis
//! contract. The analyzer reports them to an [`AnalysisObserver`]; the
//! default [`TracingObserver`] forwards them to `tracing` and
//! [`NoopObserver`] discards them.

use tracing::debug;

use crate::color::{ColorConverter, IconStatistics};
use crate::error::InsufficientSignal;

/// Receives the outcome of every analysis call
pub trait AnalysisObserver: Send + Sync {
    /// Called after both passes completed, with the final verdict
    fn on_statistics(&self, _stats: &IconStatistics, _is_simple_icon: bool) {}

    /// Called when the buffer was rejected before classification
    fn on_insufficient_signal(&self, _reason: &InsufficientSignal) {}
}

/// Emits one aggregated `debug` event per analyzed icon
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl AnalysisObserver for TracingObserver {
    fn on_statistics(&self, stats: &IconStatistics, is_simple_icon: bool) {
        let main_color = ColorConverter::new().to_hex(stats.dominant);
        let tone = if stats.is_dark { "dark" } else { "light" };
        let verdict = if is_simple_icon { "flat" } else { "complex" };
        let transparency = format!("{:.0}%", stats.transparency_ratio * 100.0);
        let similarity = format!("{:.0}%", stats.similarity_ratio * 100.0);
        debug!(
            colors = stats.distinct_colors,
            %transparency,
            %similarity,
            main_color = %main_color,
            tone,
            verdict,
            "icon analyzed"
        );
    }

    fn on_insufficient_signal(&self, reason: &InsufficientSignal) {
        debug!(%reason, "icon skipped");
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl AnalysisObserver for NoopObserver {}
