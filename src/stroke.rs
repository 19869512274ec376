//! Stroke bundle builder.
//!
//! Collects a node's visible stroke paints together with weight, dash, and
//! per-edge weight data into the interned `STROKE` payload.

use serde::Serialize;

use crate::paint::{parse_paint, SimplifiedFill};
use crate::source::{SourceNode, StrokeWeights};

/// Normalized border treatment for one node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedStroke {
    pub colors: Vec<SimplifiedFill>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_weight: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stroke_dashes: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_weights: Option<String>,
}

/// Build the stroke bundle for a node.
///
/// Hidden stroke paints are excluded. Per-edge weights, when present, are
/// carried alongside the uniform weight as a CSS shorthand.
pub fn build_simplified_strokes(node: &SourceNode) -> SimplifiedStroke {
    let mut stroke = SimplifiedStroke::default();

    if !node.strokes.is_empty() {
        stroke.colors = node.visible_strokes().into_iter().map(parse_paint).collect();
    }

    if let Some(weight) = node.stroke_weight {
        if weight > 0.0 {
            stroke.stroke_weight = Some(format!("{weight}px"));
        }
    }

    if !node.stroke_dashes.is_empty() {
        stroke.stroke_dashes = node.stroke_dashes.clone();
    }

    if let Some(weights) = &node.individual_stroke_weights {
        stroke.stroke_weights = Some(css_shorthand(weights));
    }

    stroke
}

/// Collapse per-edge values into the shortest CSS shorthand (1, 2, or 4
/// space-separated `px` values).
pub fn css_shorthand(weights: &StrokeWeights) -> String {
    let StrokeWeights { top, right, bottom, left } = *weights;
    if top == right && right == bottom && bottom == left {
        format!("{top}px")
    } else if top == bottom && left == right {
        format!("{top}px {right}px")
    } else {
        format!("{top}px {right}px {bottom}px {left}px")
    }
}
