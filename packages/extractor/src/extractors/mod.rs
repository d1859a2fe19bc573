//! Built-in extractors and pipeline presets.

mod component;
mod grid;
mod layout;
mod text;
mod visuals;

pub use component::ComponentExtractor;
pub use grid::{AmbientGridExtractor, GridSpanExtractor, ResolvedGridSpanExtractor};
pub use layout::{LayoutExtractor, SimplifiedLayout};
pub use text::{SimplifiedTextStyle, TextExtractor};
pub use visuals::{
    convert_effects, convert_paints, format_color, SimplifiedEffects, SimplifiedFill,
    SimplifiedStroke, VisualsExtractor,
};

use crate::extractor::ExtractorPipeline;

/// Layout, text, visuals and component linkage
pub fn all_extractors() -> ExtractorPipeline {
    ExtractorPipeline::empty()
        .with(LayoutExtractor)
        .with(TextExtractor)
        .with(VisualsExtractor)
        .with(ComponentExtractor)
}

pub fn layout_and_text() -> ExtractorPipeline {
    ExtractorPipeline::empty()
        .with(LayoutExtractor)
        .with(TextExtractor)
}

/// Text content and component linkage, no styling
pub fn content_only() -> ExtractorPipeline {
    ExtractorPipeline::empty()
        .with(TextExtractor)
        .with(ComponentExtractor)
}

pub fn visuals_only() -> ExtractorPipeline {
    ExtractorPipeline::empty().with(VisualsExtractor)
}

pub fn layout_only() -> ExtractorPipeline {
    ExtractorPipeline::empty().with(LayoutExtractor)
}

/// Round to two decimals so float noise does not defeat deduplication
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn px(value: f64) -> String {
    format!("{}px", round2(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for pipeline in [
            all_extractors(),
            layout_and_text(),
            content_only(),
            visuals_only(),
            layout_only(),
        ] {
            assert!(pipeline.validate().is_ok(), "{:?}", pipeline);
        }
    }

    #[test]
    fn test_px_formatting() {
        assert_eq!(px(16.0), "16px");
        assert_eq!(px(12.346), "12.35px");
        assert_eq!(px(0.5), "0.5px");
    }
}
