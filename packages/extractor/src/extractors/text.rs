use super::{px, round2};
use crate::context::TraversalContext;
use crate::error::ExtractResult;
use crate::extractor::Extractor;
use designlens_model::{NodeKind, RawNode, SimplifiedNode, TypeStyle};
use serde::Serialize;

/// Text style registered under the `style` kind
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedTextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<&'static str>,
    /// Relative to the font size, e.g. `1.5em`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_case: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align_horizontal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align_vertical: Option<String>,
}

impl SimplifiedTextStyle {
    pub fn from_type_style(style: &TypeStyle) -> Self {
        let line_height = match (style.line_height_px, style.font_size) {
            (Some(line_height), Some(size)) if size > 0.0 => {
                Some(format!("{}em", round2(line_height / size)))
            }
            _ => None,
        };

        Self {
            font_family: style.font_family.clone(),
            font_weight: style.font_weight,
            font_size: style.font_size,
            font_style: style.italic.filter(|italic| *italic).map(|_| "italic"),
            line_height,
            letter_spacing: style
                .letter_spacing
                .filter(|spacing| *spacing != 0.0)
                .map(px),
            text_case: style
                .text_case
                .clone()
                .filter(|case| case != "ORIGINAL"),
            text_decoration: style
                .text_decoration
                .clone()
                .filter(|decoration| decoration != "NONE"),
            text_align_horizontal: style.text_align_horizontal.clone(),
            text_align_vertical: style.text_align_vertical.clone(),
        }
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Extracts text content and registers its text style
pub struct TextExtractor;

impl Extractor for TextExtractor {
    fn name(&self) -> &'static str {
        "text"
    }

    fn apply(
        &self,
        node: &RawNode,
        output: &mut SimplifiedNode,
        context: &mut TraversalContext<'_>,
    ) -> ExtractResult<()> {
        if node.kind != NodeKind::Text && node.characters.is_none() {
            return Ok(());
        }

        if let Some(characters) = &node.characters {
            output.text = Some(characters.clone());
        }

        if let Some(style) = &node.style {
            let text_style = SimplifiedTextStyle::from_type_style(style);
            if !text_style.is_empty() {
                output.text_style = Some(context.globals.find_or_create(&text_style, "style")?);
            }
        }

        Ok(())
    }
}
