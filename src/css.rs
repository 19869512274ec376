//! CSS property derivation engine.
//!
//! Pure functions computing a complete presentation-property set from one
//! source node's raw geometry, paint, effect, typography, and transform
//! fields. Every property is gated on its preconditions and simply omitted
//! when they do not hold; nothing here can fail.
//!
//! The numeric contracts are exact and deliberate: gradient angles use
//! `(90 − atan2(dy, dx)·180/π) mod 360`, letter spacing converts to `em`
//! with three decimals, line height to a unitless two-decimal ratio, and
//! rotation to degrees with two decimals.

use serde::Serialize;
use smallvec::SmallVec;

use crate::paint::{format_rgba, parse_paint, SimplifiedFill};
use crate::source::{Effect, Paint, SourceNode};

// =============================================================================
// CssProperties
// =============================================================================

/// Derived presentation properties for one node.
///
/// Each field holds a formatted CSS value string; absent preconditions leave
/// the field unset and it never serializes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CssProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_repeat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_shadow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backdrop_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_transform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
}

impl CssProperties {
    /// Whether no property was derived at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// =============================================================================
// Derivation
// =============================================================================

/// Compute the full property set for one node.
///
/// Side-effect free; may be called any number of times per node.
pub fn extract_css_properties(node: &SourceNode) -> CssProperties {
    let mut css = CssProperties::default();

    if let Some(bounds) = &node.absolute_bounding_box {
        css.width = Some(format!("{}px", bounds.width));
        css.height = Some(format!("{}px", bounds.height));
    }

    if let Some(opacity) = node.opacity {
        css.opacity = Some(opacity.to_string());
    }

    derive_background(node, &mut css);
    derive_border(node, &mut css);
    css.border_radius = format_border_radius(node);

    css.box_shadow = box_shadow_css(&node.effects);
    css.filter = layer_blur_css(&node.effects);
    css.backdrop_filter = backdrop_blur_css(&node.effects);

    derive_typography(node, &mut css);
    css.transform = extract_transforms(node);

    css
}

// =============================================================================
// Background
// =============================================================================

fn derive_background(node: &SourceNode, css: &mut CssProperties) {
    let visible = node.visible_fills();
    let Some(top) = visible.last() else { return };

    // Later fills paint over earlier ones; the top-most is the last visible.
    if top.paint_type == "SOLID" {
        if let SimplifiedFill::Color(color) = parse_paint(top) {
            css.background_color = Some(color);
        }
    } else if top.is_gradient() {
        css.background_image = Some(gradient_css(top));
    } else if top.paint_type == "IMAGE" {
        css.background_image = Some(format!(
            "url({})",
            top.image_ref.as_deref().unwrap_or_default()
        ));
        match top.scale_mode.as_deref() {
            Some("FILL") => css.background_size = Some("cover".to_string()),
            Some("FIT") => css.background_size = Some("contain".to_string()),
            _ => {}
        }
        css.background_repeat = Some("no-repeat".to_string());
        css.background_position = Some("center".to_string());
    }

    // Two or more visible fills become one composited value. Reversing the
    // list turns bottom-to-top paint order into left-to-right layer order.
    if visible.len() > 1 {
        let mut layers: SmallVec<[String; 4]> =
            visible.iter().map(|paint| layer_css(paint)).collect();
        layers.reverse();
        css.background_image = Some(layers.join(", "));
    }
}

/// One composited background layer for a paint.
fn layer_css(paint: &Paint) -> String {
    if paint.paint_type == "SOLID" {
        match parse_paint(paint) {
            SimplifiedFill::Color(color) => color,
            _ => "transparent".to_string(),
        }
    } else if paint.is_gradient() {
        gradient_css(paint)
    } else if paint.paint_type == "IMAGE" {
        format!("url({})", paint.image_ref.as_deref().unwrap_or_default())
    } else {
        "transparent".to_string()
    }
}

// =============================================================================
// Gradients
// =============================================================================

/// Format a gradient paint as a CSS gradient function.
///
/// Fewer than two stops yields the literal `transparent`. A gradient whose
/// handle count fails its kind's precondition falls back to
/// `linear-gradient(to bottom, ...)`.
pub fn gradient_css(paint: &Paint) -> String {
    if paint.gradient_stops.len() < 2 {
        return "transparent".to_string();
    }

    let stops = paint
        .gradient_stops
        .iter()
        .map(|stop| {
            format!(
                "{} {}%",
                format_rgba(&stop.color, stop.color.a),
                (stop.position * 100.0).round()
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    let handles = &paint.gradient_handle_positions;
    match paint.paint_type.as_str() {
        "GRADIENT_LINEAR" if handles.len() >= 2 => {
            let angle = gradient_angle(&handles[0], &handles[1]);
            format!("linear-gradient({angle}deg, {stops})")
        }
        // Handle geometry beyond presence is not used for these two; the
        // shape is a deliberate approximation.
        "GRADIENT_RADIAL" if handles.len() >= 3 => {
            format!("radial-gradient(circle, {stops})")
        }
        "GRADIENT_ANGULAR" if handles.len() >= 3 => {
            format!("conic-gradient(from 0deg, {stops})")
        }
        _ => format!("linear-gradient(to bottom, {stops})"),
    }
}

/// CSS gradient angle from the first two handle positions.
///
/// CSS angles grow clockwise from pointing up, so the atan2 result is
/// subtracted from 90 and normalized to [0, 360).
fn gradient_angle(start: &crate::source::Vector, end: &crate::source::Vector) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let angle = 90.0 - dy.atan2(dx).to_degrees();
    (angle + 360.0) % 360.0
}

// =============================================================================
// Border & radius
// =============================================================================

fn derive_border(node: &SourceNode, css: &mut CssProperties) {
    let visible = node.visible_strokes();
    // Only the first visible stroke paint is used; strokes are not composited.
    let Some(first) = visible.first() else { return };

    let color = match parse_paint(first) {
        SimplifiedFill::Color(color) => color,
        _ => String::new(),
    };

    let width = match node.stroke_weight {
        Some(weight) => format!("{weight}px"),
        None => "1px".to_string(),
    };

    let style = if node.stroke_dashes.is_empty() {
        "solid"
    } else {
        "dashed"
    };

    css.border_width = Some(width);
    css.border_style = Some(style.to_string());
    css.border_color = Some(color);
}

/// Border-radius string for a node, if any.
///
/// A uniform radius > 0 wins; otherwise a per-corner array of exactly four
/// values formats in raw array order, without remapping.
pub fn format_border_radius(node: &SourceNode) -> Option<String> {
    if let Some(radius) = node.corner_radius {
        if radius > 0.0 {
            return Some(format!("{radius}px"));
        }
    }
    if let Some(radii) = &node.rectangle_corner_radii {
        if radii.len() == 4 {
            return Some(format!(
                "{}px {}px {}px {}px",
                radii[0], radii[1], radii[2], radii[3]
            ));
        }
    }
    None
}

// =============================================================================
// Effects
// =============================================================================

/// Box-shadow value over the visible shadow effects, if any.
///
/// Spread is always 0; the source format provides none. Inner shadows are
/// prefixed `inset `.
pub fn box_shadow_css(effects: &[Effect]) -> Option<String> {
    let shadows: Vec<String> = effects
        .iter()
        .filter(|effect| effect.is_shadow() && effect.is_visible())
        .map(|effect| {
            let offset_x = effect.offset.map(|o| o.x).unwrap_or(0.0);
            let offset_y = effect.offset.map(|o| o.y).unwrap_or(0.0);
            let blur = effect.radius.unwrap_or(0.0);
            let color = effect
                .color
                .map(|c| format_rgba(&c, c.a))
                .unwrap_or_else(|| "rgba(0,0,0,0.1)".to_string());
            let inset = if effect.effect_type == "INNER_SHADOW" {
                "inset "
            } else {
                ""
            };
            format!("{inset}{offset_x}px {offset_y}px {blur}px 0px {color}")
        })
        .collect();

    if shadows.is_empty() {
        None
    } else {
        Some(shadows.join(", "))
    }
}

/// Foreground filter value over the visible layer blurs, if any.
pub fn layer_blur_css(effects: &[Effect]) -> Option<String> {
    blur_css(effects, "LAYER_BLUR")
}

/// Backdrop filter value over the visible background blurs, if any.
pub fn backdrop_blur_css(effects: &[Effect]) -> Option<String> {
    blur_css(effects, "BACKGROUND_BLUR")
}

fn blur_css(effects: &[Effect], kind: &str) -> Option<String> {
    let blurs: Vec<String> = effects
        .iter()
        .filter(|effect| effect.effect_type == kind && effect.is_visible())
        .map(|effect| format!("blur({}px)", effect.radius.unwrap_or(0.0)))
        .collect();

    if blurs.is_empty() {
        None
    } else {
        Some(blurs.join(" "))
    }
}

// =============================================================================
// Typography
// =============================================================================

fn derive_typography(node: &SourceNode, css: &mut CssProperties) {
    let Some(style) = &node.style else { return };

    if let Some(family) = &style.font_family {
        css.font_family = Some(format!("\"{family}\", sans-serif"));
    }
    if let Some(size) = style.font_size {
        css.font_size = Some(format!("{size}px"));
    }
    if let Some(weight) = style.font_weight {
        css.font_weight = Some(weight.to_string());
    }

    if let Some(spacing) = style.letter_spacing {
        css.letter_spacing = match style.font_size {
            Some(size) if size > 0.0 => Some(format!("{:.3}em", spacing / size)),
            _ => Some(format!("{spacing}px")),
        };
    }

    if let Some(line_height_px) = style.line_height_px {
        css.line_height = match style.font_size {
            Some(size) if size > 0.0 => Some(format!("{:.2}", line_height_px / size)),
            _ => Some(format!("{line_height_px}px")),
        };
    } else if let Some(percent) = style.line_height_percent {
        css.line_height = Some((percent / 100.0).to_string());
    }

    if let Some(align) = &style.text_align_horizontal {
        css.text_align = Some(
            match align.as_str() {
                "LEFT" => "left",
                "CENTER" => "center",
                "RIGHT" => "right",
                "JUSTIFIED" => "justify",
                _ => "left",
            }
            .to_string(),
        );
    }

    if let Some(case) = &style.text_case {
        css.text_transform = Some(
            match case.as_str() {
                "UPPER" => "uppercase",
                "LOWER" => "lowercase",
                "TITLE" => "capitalize",
                "ORIGINAL" => "none",
                "SMALL_CAPS" | "SMALL_CAPS_FORCED" => "small-caps",
                _ => "none",
            }
            .to_string(),
        );
    }
}

// =============================================================================
// Transforms
// =============================================================================

/// Rotation and scale segments, rotation first, space-joined.
fn extract_transforms(node: &SourceNode) -> Option<String> {
    let mut transforms: SmallVec<[String; 2]> = SmallVec::new();

    if let Some(rotation) = node.rotation {
        // Rotation arrives in radians.
        if rotation != 0.0 {
            transforms.push(format!("rotate({:.2}deg)", rotation.to_degrees()));
        }
    }

    if let Some(matrix) = &node.relative_transform {
        if matrix.len() >= 2 && matrix[0].len() >= 2 && matrix[1].len() >= 2 {
            let scale_x = matrix[0][0];
            let scale_y = matrix[1][1];
            if scale_x != 1.0 || scale_y != 1.0 {
                transforms.push(format!("scale({scale_x:.2}, {scale_y:.2})"));
            }
        }
    }

    if transforms.is_empty() {
        None
    } else {
        Some(transforms.join(" "))
    }
}

// =============================================================================
// Tests
// =============================================================================
