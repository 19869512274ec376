//! Paint normalization.
//!
//! Converts raw paint descriptors into their simplified forms: a plain CSS
//! color string for solids, a stop/handle descriptor for gradients, and a
//! reference for images. Color-space conversion (0–1 channels to 0–255) and
//! hex/rgba formatting live here.

use serde::Serialize;

use crate::source::{Color, Paint, Vector};

// =============================================================================
// Simplified fill
// =============================================================================

/// A normalized fill or stroke paint.
///
/// Solid paints collapse to a bare color string (`#RRGGBB` or `rgba(...)`),
/// matching the wire shape consumers expect; gradients and images keep a
/// small structured record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SimplifiedFill {
    /// Hex or rgba color string. Unknown paint kinds normalize to
    /// `"transparent"` rather than erroring.
    Color(String),
    /// Gradient with its handle geometry and converted stops.
    Gradient {
        #[serde(rename = "type")]
        fill_type: String,
        #[serde(rename = "gradientHandlePositions", skip_serializing_if = "Vec::is_empty")]
        handle_positions: Vec<Vector>,
        #[serde(rename = "gradientStops", skip_serializing_if = "Vec::is_empty")]
        stops: Vec<SimplifiedGradientStop>,
    },
    /// Image reference plus scale mode.
    Image {
        #[serde(rename = "type")]
        fill_type: String,
        #[serde(rename = "imageRef", skip_serializing_if = "Option::is_none")]
        image_ref: Option<String>,
        #[serde(rename = "scaleMode", skip_serializing_if = "Option::is_none")]
        scale_mode: Option<String>,
    },
}

/// Gradient stop with its color already converted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimplifiedGradientStop {
    pub position: f64,
    pub color: ColorValue,
}

/// Hex color plus effective opacity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorValue {
    pub hex: String,
    pub opacity: f64,
}

// =============================================================================
// Color formatting
// =============================================================================

/// Format as uppercase `#RRGGBB`, dropping alpha.
pub fn format_hex(color: &Color) -> String {
    format!(
        "#{:02X}{:02X}{:02X}",
        channel(color.r),
        channel(color.g),
        channel(color.b)
    )
}

/// Format as `rgba(r, g, b, a)` with 0–255 channels and the given alpha.
pub fn format_rgba(color: &Color, alpha: f64) -> String {
    format!(
        "rgba({}, {}, {}, {})",
        channel(color.r),
        channel(color.g),
        channel(color.b),
        alpha
    )
}

#[inline]
fn channel(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

// =============================================================================
// Paint parsing
// =============================================================================

/// Normalize one paint descriptor.
///
/// Total over all inputs: a solid paint without a color, or a paint of an
/// unknown kind, normalizes to the `"transparent"` color string.
pub fn parse_paint(paint: &Paint) -> SimplifiedFill {
    if paint.paint_type == "SOLID" {
        let Some(color) = &paint.color else {
            return SimplifiedFill::Color("transparent".to_string());
        };
        // Paint-level opacity multiplies the color's own alpha.
        let alpha = color.a * paint.opacity.unwrap_or(1.0);
        if alpha == 1.0 {
            SimplifiedFill::Color(format_hex(color))
        } else {
            SimplifiedFill::Color(format_rgba(color, alpha))
        }
    } else if paint.is_gradient() {
        SimplifiedFill::Gradient {
            fill_type: paint.paint_type.clone(),
            handle_positions: paint.gradient_handle_positions.clone(),
            stops: paint
                .gradient_stops
                .iter()
                .map(|stop| SimplifiedGradientStop {
                    position: stop.position,
                    color: ColorValue {
                        hex: format_hex(&stop.color),
                        opacity: stop.color.a,
                    },
                })
                .collect(),
        }
    } else if paint.paint_type == "IMAGE" {
        SimplifiedFill::Image {
            fill_type: paint.paint_type.clone(),
            image_ref: paint.image_ref.clone(),
            scale_mode: paint.scale_mode.clone(),
        }
    } else {
        SimplifiedFill::Color("transparent".to_string())
    }
}

// =============================================================================
// Tests
// =============================================================================
