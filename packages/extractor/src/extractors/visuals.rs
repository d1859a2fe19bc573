use super::{px, round2};
use crate::context::TraversalContext;
use crate::error::ExtractResult;
use crate::extractor::Extractor;
use designlens_model::{Color, Effect, EffectType, Paint, PaintType, RawNode, SimplifiedNode};
use serde::Serialize;

/// A fill or stroke paint, registered under the `fill` kind as a list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SimplifiedFill {
    /// `#RRGGBB` or `rgba(r, g, b, a)`
    Color(String),
    #[serde(rename_all = "camelCase")]
    Gradient {
        #[serde(rename = "type")]
        kind: &'static str,
        gradient_stops: Vec<GradientStop>,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        #[serde(rename = "type")]
        kind: &'static str,
        image_ref: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        scale_mode: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradientStop {
    pub position: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedStroke {
    pub colors: Vec<SimplifiedFill>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_weight: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedEffects {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_shadow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backdrop_filter: Option<String>,
}

/// Extracts fills, strokes, effects, opacity and corner radius
pub struct VisualsExtractor;

impl Extractor for VisualsExtractor {
    fn name(&self) -> &'static str {
        "visuals"
    }

    fn apply(
        &self,
        node: &RawNode,
        output: &mut SimplifiedNode,
        context: &mut TraversalContext<'_>,
    ) -> ExtractResult<()> {
        let fills = convert_paints(&node.fills);
        if !fills.is_empty() {
            output.fills = Some(context.globals.find_or_create(&fills, "fill")?);
        }

        let stroke_colors = convert_paints(&node.strokes);
        if !stroke_colors.is_empty() {
            let stroke = SimplifiedStroke {
                colors: stroke_colors,
                stroke_weight: node.stroke_weight.filter(|w| *w > 0.0).map(px),
            };
            output.strokes = Some(context.globals.find_or_create(&stroke, "stroke")?);
        }

        let effects = convert_effects(&node.effects);
        if effects != SimplifiedEffects::default() {
            output.effects = Some(context.globals.find_or_create(&effects, "effect")?);
        }

        output.opacity = node.opacity.filter(|opacity| *opacity < 1.0).map(round2);
        output.border_radius = border_radius(node);
        Ok(())
    }
}

/// Format a color, folding an extra paint opacity into the alpha channel
pub fn format_color(color: &Color, opacity: f64) -> String {
    let alpha = round2(color.a * opacity);
    let channel = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;

    if alpha >= 1.0 {
        format!(
            "#{:02X}{:02X}{:02X}",
            channel(color.r),
            channel(color.g),
            channel(color.b)
        )
    } else {
        format!(
            "rgba({}, {}, {}, {})",
            channel(color.r),
            channel(color.g),
            channel(color.b),
            alpha
        )
    }
}

pub fn convert_paints(paints: &[Paint]) -> Vec<SimplifiedFill> {
    paints
        .iter()
        .filter(|paint| paint.visible)
        .filter_map(convert_paint)
        .collect()
}

fn convert_paint(paint: &Paint) -> Option<SimplifiedFill> {
    let opacity = paint.opacity.unwrap_or(1.0);
    let gradient = |kind: &'static str| SimplifiedFill::Gradient {
        kind,
        gradient_stops: paint
            .gradient_stops
            .iter()
            .map(|stop| GradientStop {
                position: round2(stop.position),
                color: format_color(&stop.color, opacity),
            })
            .collect(),
    };

    match paint.kind {
        PaintType::Solid => paint
            .color
            .as_ref()
            .map(|color| SimplifiedFill::Color(format_color(color, opacity))),
        PaintType::GradientLinear => Some(gradient("GRADIENT_LINEAR")),
        PaintType::GradientRadial => Some(gradient("GRADIENT_RADIAL")),
        PaintType::GradientAngular => Some(gradient("GRADIENT_ANGULAR")),
        PaintType::GradientDiamond => Some(gradient("GRADIENT_DIAMOND")),
        PaintType::Image => paint.image_ref.as_ref().map(|image_ref| SimplifiedFill::Image {
            kind: "IMAGE",
            image_ref: image_ref.clone(),
            scale_mode: paint.scale_mode.clone(),
        }),
        PaintType::Other => None,
    }
}

pub fn convert_effects(effects: &[Effect]) -> SimplifiedEffects {
    let mut shadows = Vec::new();
    let mut filters = Vec::new();
    let mut backdrop_filters = Vec::new();

    for effect in effects.iter().filter(|effect| effect.visible) {
        match effect.kind {
            EffectType::DropShadow | EffectType::InnerShadow => {
                let offset = effect.offset.unwrap_or_default();
                let color = effect
                    .color
                    .as_ref()
                    .map(|color| format_color(color, 1.0))
                    .unwrap_or_else(|| "rgba(0, 0, 0, 0.25)".to_string());
                let inset = if effect.kind == EffectType::InnerShadow {
                    "inset "
                } else {
                    ""
                };
                shadows.push(format!(
                    "{}{} {} {} {} {}",
                    inset,
                    px(offset.x),
                    px(offset.y),
                    px(effect.radius),
                    px(effect.spread.unwrap_or(0.0)),
                    color
                ));
            }
            EffectType::LayerBlur => filters.push(format!("blur({})", px(effect.radius / 2.0))),
            EffectType::BackgroundBlur => {
                backdrop_filters.push(format!("blur({})", px(effect.radius / 2.0)))
            }
            EffectType::Other => {}
        }
    }

    let join = |parts: Vec<String>, separator: &str| {
        (!parts.is_empty()).then(|| parts.join(separator))
    };

    SimplifiedEffects {
        box_shadow: join(shadows, ", "),
        filter: join(filters, " "),
        backdrop_filter: join(backdrop_filters, " "),
    }
}

fn border_radius(node: &RawNode) -> Option<String> {
    if let Some(radii) = node.rectangle_corner_radii {
        if radii.iter().any(|radius| *radius != radii[0]) {
            return Some(
                radii
                    .iter()
                    .map(|radius| px(*radius))
                    .collect::<Vec<_>>()
                    .join(" "),
            );
        }
    }
    node.corner_radius
        .filter(|radius| *radius > 0.0)
        .map(px)
}
