//! Layout descriptor builder.
//!
//! Computes a node's box-model placement relative to its parent: flex
//! direction from the source's auto-layout mode, axis alignment, gap,
//! wrapping, padding, and position within the parent's bounding box.
//!
//! A descriptor that carries nothing beyond `mode: none` is the trivial
//! marker and is never interned.

use serde::Serialize;

use crate::source::{SourceNode, StrokeWeights};
use crate::stroke::css_shorthand;

/// Flex direction derived from the auto-layout mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    None,
    Row,
    Column,
}

/// Position of a node relative to its parent's origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RelativePosition {
    pub x: f64,
    pub y: f64,
}

/// Box-model placement descriptor for one node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedLayout {
    pub mode: LayoutMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justify_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_items: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_relative_to_parent: Option<RelativePosition>,
}

impl SimplifiedLayout {
    /// Whether this descriptor is the trivial "no layout" marker.
    pub fn is_trivial(&self) -> bool {
        *self == Self::default()
    }
}

/// Build the layout descriptor for a node, relative to an optional parent.
pub fn build_simplified_layout(
    node: &SourceNode,
    parent: Option<&SourceNode>,
) -> SimplifiedLayout {
    let mut layout = SimplifiedLayout {
        mode: match node.layout_mode.as_deref() {
            Some("HORIZONTAL") => LayoutMode::Row,
            Some("VERTICAL") => LayoutMode::Column,
            _ => LayoutMode::None,
        },
        ..SimplifiedLayout::default()
    };

    if layout.mode != LayoutMode::None {
        layout.justify_content = node
            .primary_axis_align_items
            .as_deref()
            .and_then(axis_alignment)
            .map(str::to_string);
        layout.align_items = node
            .counter_axis_align_items
            .as_deref()
            .and_then(axis_alignment)
            .map(str::to_string);

        if node.layout_wrap.as_deref() == Some("WRAP") {
            layout.wrap = Some(true);
        }

        if let Some(spacing) = node.item_spacing {
            if spacing > 0.0 {
                layout.gap = Some(format!("{spacing}px"));
            }
        }

        layout.padding = padding_shorthand(node);
    }

    if let (Some(bounds), Some(parent_bounds)) = (
        &node.absolute_bounding_box,
        parent.and_then(|p| p.absolute_bounding_box.as_ref()),
    ) {
        layout.location_relative_to_parent = Some(RelativePosition {
            x: bounds.x - parent_bounds.x,
            y: bounds.y - parent_bounds.y,
        });
    }

    layout
}

fn axis_alignment(value: &str) -> Option<&'static str> {
    match value {
        "MIN" => Some("flex-start"),
        "CENTER" => Some("center"),
        "MAX" => Some("flex-end"),
        "SPACE_BETWEEN" => Some("space-between"),
        "BASELINE" => Some("baseline"),
        _ => None,
    }
}

fn padding_shorthand(node: &SourceNode) -> Option<String> {
    let weights = StrokeWeights {
        top: node.padding_top.unwrap_or(0.0),
        right: node.padding_right.unwrap_or(0.0),
        bottom: node.padding_bottom.unwrap_or(0.0),
        left: node.padding_left.unwrap_or(0.0),
    };
    let any_set = weights.top != 0.0
        || weights.right != 0.0
        || weights.bottom != 0.0
        || weights.left != 0.0;
    any_set.then(|| css_shorthand(&weights))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: serde_json::Value) -> SourceNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_no_layout_is_trivial() {
        let n = node(json!({ "id": "1:1", "name": "x", "type": "FRAME" }));
        let layout = build_simplified_layout(&n, None);
        assert_eq!(layout.mode, LayoutMode::None);
        assert!(layout.is_trivial());
    }

    #[test]
    fn test_auto_layout_fields() {
        let n = node(json!({
            "id": "1:1", "name": "x", "type": "FRAME",
            "layoutMode": "HORIZONTAL",
            "primaryAxisAlignItems": "SPACE_BETWEEN",
            "counterAxisAlignItems": "CENTER",
            "layoutWrap": "WRAP",
            "itemSpacing": 8,
            "paddingTop": 16, "paddingRight": 24,
            "paddingBottom": 16, "paddingLeft": 24,
        }));

        let layout = build_simplified_layout(&n, None);
        assert_eq!(layout.mode, LayoutMode::Row);
        assert_eq!(layout.justify_content.as_deref(), Some("space-between"));
        assert_eq!(layout.align_items.as_deref(), Some("center"));
        assert_eq!(layout.wrap, Some(true));
        assert_eq!(layout.gap.as_deref(), Some("8px"));
        assert_eq!(layout.padding.as_deref(), Some("16px 24px"));
        assert!(!layout.is_trivial());
    }

    #[test]
    fn test_location_relative_to_parent() {
        let parent = node(json!({
            "id": "1:1", "name": "p", "type": "FRAME",
            "absoluteBoundingBox": { "x": 100, "y": 50, "width": 400, "height": 300 },
        }));
        let child = node(json!({
            "id": "1:2", "name": "c", "type": "RECTANGLE",
            "absoluteBoundingBox": { "x": 120, "y": 80, "width": 100, "height": 40 },
        }));

        let layout = build_simplified_layout(&child, Some(&parent));
        assert_eq!(
            layout.location_relative_to_parent,
            Some(RelativePosition { x: 20.0, y: 30.0 })
        );
        // Position alone makes the descriptor non-trivial.
        assert!(!layout.is_trivial());
    }

    #[test]
    fn test_mode_serializes_lowercase() {
        let layout = SimplifiedLayout { mode: LayoutMode::Column, ..Default::default() };
        assert_eq!(
            serde_json::to_value(&layout).unwrap(),
            json!({ "mode": "column" })
        );
    }
}
