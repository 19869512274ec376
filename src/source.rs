//! Source document model.
//!
//! Typed view of a design-tool file response. Every style and geometry field
//! is an explicit `Option` (or possibly-empty `Vec`), so presence checks
//! happen once, at the deserialization boundary, instead of at every read.
//!
//! Deserialization is deliberately lenient: a field whose value has the wrong
//! shape is treated as absent, never as an error. A node's type tag decides
//! which fields are meaningful; everything else is simply ignored.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

// =============================================================================
// Lenient field deserialization
// =============================================================================

/// Deserialize an optional field, mapping any type mismatch to `None`.
fn opt<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(de)?;
    Ok(T::deserialize(value).ok())
}

/// Deserialize a sequence field, dropping malformed elements.
///
/// A non-array value yields an empty sequence.
fn seq<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(de)? {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| T::deserialize(item).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

// =============================================================================
// File response
// =============================================================================

/// A design file response, in either of its two wire forms: a full document
/// tree, or a keyed subset of node responses.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FileResponse {
    /// Full-file form: top-level nodes are `document.children`.
    File(FileData),
    /// Subset form: one document per requested node id.
    Nodes(NodesData),
}

/// Full-file response body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub last_modified: String,
    #[serde(default, deserialize_with = "opt")]
    pub thumbnail_url: Option<String>,
    pub document: SourceNode,
}

/// Node-subset response body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodesData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub last_modified: String,
    #[serde(default, deserialize_with = "opt")]
    pub thumbnail_url: Option<String>,
    pub nodes: BTreeMap<String, NodeResponse>,
}

/// One entry of the node-subset form.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeResponse {
    pub document: SourceNode,
}

impl FileResponse {
    /// Document name.
    pub fn name(&self) -> &str {
        match self {
            FileResponse::File(data) => &data.name,
            FileResponse::Nodes(data) => &data.name,
        }
    }

    /// Last-modified timestamp, as provided upstream.
    pub fn last_modified(&self) -> &str {
        match self {
            FileResponse::File(data) => &data.last_modified,
            FileResponse::Nodes(data) => &data.last_modified,
        }
    }

    /// Thumbnail URL, if the upstream response carried one.
    pub fn thumbnail_url(&self) -> Option<&str> {
        match self {
            FileResponse::File(data) => data.thumbnail_url.as_deref(),
            FileResponse::Nodes(data) => data.thumbnail_url.as_deref(),
        }
    }

    /// Normalize both wire forms to a flat sequence of top-level nodes.
    pub fn top_level_nodes(&self) -> Vec<&SourceNode> {
        match self {
            FileResponse::File(data) => data.document.children.iter().collect(),
            FileResponse::Nodes(data) => {
                data.nodes.values().map(|entry| &entry.document).collect()
            }
        }
    }
}

// =============================================================================
// Source node
// =============================================================================

/// One node of the source tree.
///
/// A single record type covers every node kind; the `node_type` tag decides
/// which of the optional fields carry meaning.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(deserialize_with = "opt")]
    pub visible: Option<bool>,
    #[serde(deserialize_with = "opt")]
    pub opacity: Option<f64>,
    #[serde(deserialize_with = "opt")]
    pub absolute_bounding_box: Option<Rect>,
    #[serde(deserialize_with = "opt")]
    pub characters: Option<String>,
    #[serde(deserialize_with = "opt")]
    pub style: Option<TypeStyle>,
    #[serde(deserialize_with = "seq")]
    pub fills: Vec<Paint>,
    #[serde(deserialize_with = "seq")]
    pub strokes: Vec<Paint>,
    #[serde(deserialize_with = "opt")]
    pub stroke_weight: Option<f64>,
    #[serde(deserialize_with = "seq")]
    pub stroke_dashes: Vec<f64>,
    #[serde(deserialize_with = "opt")]
    pub individual_stroke_weights: Option<StrokeWeights>,
    #[serde(deserialize_with = "seq")]
    pub effects: Vec<Effect>,
    #[serde(deserialize_with = "opt")]
    pub corner_radius: Option<f64>,
    #[serde(deserialize_with = "opt")]
    pub rectangle_corner_radii: Option<Vec<f64>>,
    #[serde(deserialize_with = "opt")]
    pub rotation: Option<f64>,
    #[serde(deserialize_with = "opt")]
    pub relative_transform: Option<Vec<Vec<f64>>>,
    #[serde(deserialize_with = "opt")]
    pub style_override_table: Option<Value>,
    #[serde(deserialize_with = "opt")]
    pub layout_mode: Option<String>,
    #[serde(deserialize_with = "opt")]
    pub primary_axis_align_items: Option<String>,
    #[serde(deserialize_with = "opt")]
    pub counter_axis_align_items: Option<String>,
    #[serde(deserialize_with = "opt")]
    pub layout_wrap: Option<String>,
    #[serde(deserialize_with = "opt")]
    pub item_spacing: Option<f64>,
    #[serde(deserialize_with = "opt")]
    pub padding_top: Option<f64>,
    #[serde(deserialize_with = "opt")]
    pub padding_right: Option<f64>,
    #[serde(deserialize_with = "opt")]
    pub padding_bottom: Option<f64>,
    #[serde(deserialize_with = "opt")]
    pub padding_left: Option<f64>,
    #[serde(deserialize_with = "seq")]
    pub children: Vec<SourceNode>,
}

impl SourceNode {
    /// Absence of the visibility flag means visible.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }

    /// Fill paints with hidden entries excluded.
    pub fn visible_fills(&self) -> Vec<&Paint> {
        self.fills.iter().filter(|p| p.is_visible()).collect()
    }

    /// Stroke paints with hidden entries excluded.
    pub fn visible_strokes(&self) -> Vec<&Paint> {
        self.strokes.iter().filter(|p| p.is_visible()).collect()
    }

    /// Effects with hidden entries excluded.
    pub fn visible_effects(&self) -> Vec<&Effect> {
        self.effects.iter().filter(|e| e.is_visible()).collect()
    }
}

// =============================================================================
// Geometry & color primitives
// =============================================================================

/// Axis-aligned bounding rectangle in the source's length unit.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// 2D point; used for gradient handle positions and shadow offsets.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, serde::Serialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

/// Color with channels in the 0.0–1.0 range.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

/// Per-edge stroke weights.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct StrokeWeights {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

// =============================================================================
// Paint
// =============================================================================

/// One fill or stroke descriptor: solid color, gradient, or image.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Paint {
    #[serde(rename = "type")]
    pub paint_type: String,
    #[serde(deserialize_with = "opt")]
    pub visible: Option<bool>,
    #[serde(deserialize_with = "opt")]
    pub opacity: Option<f64>,
    #[serde(deserialize_with = "opt")]
    pub color: Option<Color>,
    #[serde(deserialize_with = "opt")]
    pub image_ref: Option<String>,
    #[serde(deserialize_with = "opt")]
    pub scale_mode: Option<String>,
    #[serde(deserialize_with = "seq")]
    pub gradient_handle_positions: Vec<Vector>,
    #[serde(deserialize_with = "seq")]
    pub gradient_stops: Vec<GradientStop>,
}

impl Paint {
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }

    /// Whether this paint is any of the gradient kinds.
    #[inline]
    pub fn is_gradient(&self) -> bool {
        matches!(
            self.paint_type.as_str(),
            "GRADIENT_LINEAR" | "GRADIENT_RADIAL" | "GRADIENT_ANGULAR" | "GRADIENT_DIAMOND"
        )
    }
}

/// One gradient stop as it appears in the source document.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GradientStop {
    pub position: f64,
    pub color: Color,
}

// =============================================================================
// Effect
// =============================================================================

/// One visual effect: drop/inner shadow or layer/background blur.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Effect {
    #[serde(rename = "type")]
    pub effect_type: String,
    #[serde(deserialize_with = "opt")]
    pub visible: Option<bool>,
    #[serde(deserialize_with = "opt")]
    pub radius: Option<f64>,
    #[serde(deserialize_with = "opt")]
    pub offset: Option<Vector>,
    #[serde(deserialize_with = "opt")]
    pub color: Option<Color>,
}

impl Effect {
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }

    #[inline]
    pub fn is_shadow(&self) -> bool {
        matches!(self.effect_type.as_str(), "DROP_SHADOW" | "INNER_SHADOW")
    }
}

// =============================================================================
// Typography style
// =============================================================================

/// Typography style record attached to text nodes.
///
/// Also serves as the interned `TEXT_STYLE` payload, so it serializes back
/// out in camelCase with absent fields skipped.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypeStyle {
    #[serde(deserialize_with = "opt", skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(deserialize_with = "opt", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(deserialize_with = "opt", skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<f64>,
    #[serde(deserialize_with = "opt", skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    #[serde(deserialize_with = "opt", skip_serializing_if = "Option::is_none")]
    pub line_height_px: Option<f64>,
    #[serde(deserialize_with = "opt", skip_serializing_if = "Option::is_none")]
    pub line_height_percent: Option<f64>,
    #[serde(deserialize_with = "opt", skip_serializing_if = "Option::is_none")]
    pub text_align_horizontal: Option<String>,
    #[serde(deserialize_with = "opt", skip_serializing_if = "Option::is_none")]
    pub text_align_vertical: Option<String>,
    #[serde(deserialize_with = "opt", skip_serializing_if = "Option::is_none")]
    pub text_case: Option<String>,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lenient_field_mismatch_is_absent() {
        let node: SourceNode = serde_json::from_value(json!({
            "id": "1:1",
            "name": "Frame",
            "type": "FRAME",
            "opacity": "not a number",
            "cornerRadius": [1, 2],
            "fills": "nope",
        }))
        .unwrap();

        assert_eq!(node.opacity, None);
        assert_eq!(node.corner_radius, None);
        assert!(node.fills.is_empty());
    }

    #[test]
    fn test_malformed_sequence_element_dropped() {
        let node: SourceNode = serde_json::from_value(json!({
            "id": "1:2",
            "name": "Rect",
            "type": "RECTANGLE",
            "fills": [
                { "type": "SOLID", "color": { "r": 1, "g": 0, "b": 0, "a": 1 } },
                42,
            ],
        }))
        .unwrap();

        assert_eq!(node.fills.len(), 1);
        assert_eq!(node.fills[0].paint_type, "SOLID");
    }

    #[test]
    fn test_visibility_defaults_to_visible() {
        let node = SourceNode::default();
        assert!(node.is_visible());

        let hidden: SourceNode = serde_json::from_value(json!({
            "id": "1:3", "name": "x", "type": "FRAME", "visible": false,
        }))
        .unwrap();
        assert!(!hidden.is_visible());
    }

    #[test]
    fn test_file_response_forms() {
        let full: FileResponse = serde_json::from_value(json!({
            "name": "Doc",
            "lastModified": "2024-01-01T00:00:00Z",
            "document": {
                "id": "0:0", "name": "Document", "type": "DOCUMENT",
                "children": [
                    { "id": "0:1", "name": "Page 1", "type": "CANVAS" },
                ],
            },
        }))
        .unwrap();
        assert_eq!(full.name(), "Doc");
        assert_eq!(full.top_level_nodes().len(), 1);
        assert_eq!(full.thumbnail_url(), None);

        let subset: FileResponse = serde_json::from_value(json!({
            "name": "Doc",
            "lastModified": "2024-01-01T00:00:00Z",
            "thumbnailUrl": "https://example.com/t.png",
            "nodes": {
                "1:2": { "document": { "id": "1:2", "name": "Card", "type": "FRAME" } },
            },
        }))
        .unwrap();
        assert_eq!(subset.top_level_nodes()[0].name, "Card");
        assert_eq!(subset.thumbnail_url(), Some("https://example.com/t.png"));
    }

    #[test]
    fn test_visible_filters() {
        let node: SourceNode = serde_json::from_value(json!({
            "id": "1:4", "name": "x", "type": "RECTANGLE",
            "fills": [
                { "type": "SOLID", "visible": false, "color": { "r": 0, "g": 0, "b": 0, "a": 1 } },
                { "type": "SOLID", "color": { "r": 1, "g": 1, "b": 1, "a": 1 } },
            ],
            "effects": [
                { "type": "DROP_SHADOW", "visible": false, "radius": 4 },
            ],
        }))
        .unwrap();

        assert_eq!(node.visible_fills().len(), 1);
        assert!(node.visible_effects().is_empty());
    }
}
