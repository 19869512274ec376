//! Node simplification walker.
//!
//! Recursive pre-order descent over the source tree. Each visited node
//! becomes one simplified node: identity fields are copied, text extracted,
//! non-trivial style payloads interned into the shared table, the full CSS
//! property set attached, and children simplified in turn. Hidden nodes
//! vanish, and empty fields are pruned from the output.
//!
//! Each simplified node exclusively owns its children; the source tree is a
//! tree, not a graph, so plain recursion with a read-only parent reference
//! is all the state there is.

use serde::Serialize;

use crate::css::{extract_css_properties, format_border_radius, CssProperties};
use crate::effects::build_simplified_effects;
use crate::error::DesignResult;
use crate::intern::{StyleTable, StyleValue};
use crate::layout::build_simplified_layout;
use crate::paint::parse_paint;
use crate::source::{FileResponse, SourceNode};
use crate::stroke::build_simplified_strokes;

// =============================================================================
// Output types
// =============================================================================

/// Bounding box in the source's length unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One simplified node.
///
/// Style fields hold interned-table keys rather than payloads; `css` is
/// node-specific and attached in full. Unset fields never serialize.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fills: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styles: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strokes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effects: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css: Option<CssProperties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<SimplifiedNode>>,
}

impl SimplifiedNode {
    fn new(source: &SourceNode) -> Self {
        Self {
            id: source.id.clone(),
            name: source.name.clone(),
            node_type: source.node_type.clone(),
            bounding_box: None,
            text: None,
            text_style: None,
            fills: None,
            styles: None,
            strokes: None,
            effects: None,
            opacity: None,
            border_radius: None,
            layout: None,
            css: None,
            children: None,
        }
    }

    /// Find a node by id in this subtree.
    pub fn find_by_id(&self, id: &str) -> Option<&SimplifiedNode> {
        if self.id == id {
            return Some(self);
        }
        self.children
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find_map(|child| child.find_by_id(id))
    }
}

/// Shared style table, keyed by generated `PREFIX_n` ids.
#[derive(Debug, Default, Serialize)]
pub struct GlobalVars {
    pub styles: StyleTable,
}

/// The simplified design: a forest of simplified nodes plus the completed
/// interning table.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedDesign {
    pub name: String,
    pub last_modified: String,
    pub thumbnail_url: String,
    pub nodes: Vec<SimplifiedNode>,
    pub global_vars: GlobalVars,
}

impl SimplifiedDesign {
    /// Find a node by id across the whole forest.
    pub fn find_by_id(&self, id: &str) -> Option<&SimplifiedNode> {
        self.nodes.iter().find_map(|node| node.find_by_id(id))
    }
}

// =============================================================================
// Entry points
// =============================================================================

/// Simplify a full design file response.
///
/// Both wire forms are normalized to a flat sequence of top-level nodes;
/// only nodes not explicitly hidden are walked. Each call uses a fresh
/// interning table.
pub fn simplify_response(response: &FileResponse) -> SimplifiedDesign {
    let mut table = StyleTable::new();

    let nodes = response
        .top_level_nodes()
        .into_iter()
        .filter(|node| node.is_visible())
        .filter_map(|node| simplify_node(&mut table, node, None))
        .collect();

    SimplifiedDesign {
        name: response.name().to_string(),
        last_modified: response.last_modified().to_string(),
        thumbnail_url: response.thumbnail_url().unwrap_or_default().to_string(),
        nodes,
        global_vars: GlobalVars { styles: table },
    }
}

/// Parse a raw JSON file response and simplify it.
pub fn parse_design_str(json: &str) -> DesignResult<SimplifiedDesign> {
    let response: FileResponse = serde_json::from_str(json)?;
    Ok(simplify_response(&response))
}

// =============================================================================
// Walker
// =============================================================================

/// Simplify one source node, registering style payloads in `table`.
///
/// Returns `None` for nodes whose visibility flag is explicitly false;
/// absence of the flag means visible.
pub fn simplify_node(
    table: &mut StyleTable,
    source: &SourceNode,
    parent: Option<&SourceNode>,
) -> Option<SimplifiedNode> {
    if !source.is_visible() {
        return None;
    }

    let mut node = SimplifiedNode::new(source);

    if let Some(bounds) = &source.absolute_bounding_box {
        node.bounding_box = Some(BoundingBox {
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
        });
    }

    if let Some(text) = &source.characters {
        if !text.is_empty() {
            node.text = Some(text.clone());
        }
    }

    if let Some(style) = &source.style {
        node.text_style = Some(table.intern(StyleValue::TextStyle(style.clone()), "TEXT_STYLE"));
    }

    if !source.fills.is_empty() {
        let visible = source.visible_fills();
        if !visible.is_empty() {
            let fills = visible.into_iter().map(parse_paint).collect();
            node.fills = Some(table.intern(StyleValue::Fills(fills), "FILL"));
        }
    }

    if let Some(overrides) = &source.style_override_table {
        if overrides.is_object() {
            node.styles =
                Some(table.intern(StyleValue::Overrides(overrides.clone()), "STYLE_TABLE"));
        }
    }

    if !source.strokes.is_empty() {
        let stroke = build_simplified_strokes(source);
        if !stroke.colors.is_empty() {
            node.strokes = Some(table.intern(StyleValue::Stroke(stroke), "STROKE"));
        }
    }

    if !source.effects.is_empty() && !source.visible_effects().is_empty() {
        let effects = build_simplified_effects(source);
        node.effects = Some(table.intern(StyleValue::Effects(effects), "EFFECT"));
    }

    node.opacity = source.opacity;
    node.border_radius = format_border_radius(source);

    let layout = build_simplified_layout(source, parent);
    if !layout.is_trivial() {
        node.layout = Some(table.intern(StyleValue::Layout(layout), "LAYOUT"));
    }

    let css = extract_css_properties(source);
    if !css.is_empty() {
        node.css = Some(css);
    }

    if !source.children.is_empty() {
        let children: Vec<SimplifiedNode> = source
            .children
            .iter()
            .filter_map(|child| simplify_node(table, child, Some(source)))
            .collect();
        if !children.is_empty() {
            node.children = Some(children);
        }
    }

    Some(node)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn source(value: serde_json::Value) -> SourceNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_hidden_node_simplifies_to_none() {
        let mut table = StyleTable::new();
        let node = source(json!({
            "id": "1:1", "name": "Hidden", "type": "FRAME",
            "visible": false,
            "fills": [
                { "type": "SOLID", "color": { "r": 1, "g": 0, "b": 0, "a": 1 } },
            ],
        }));

        assert!(simplify_node(&mut table, &node, None).is_none());
        // Nothing reached the table either.
        assert!(table.is_empty());
    }

    #[test]
    fn test_hidden_child_excluded_from_children() {
        let mut table = StyleTable::new();
        let node = source(json!({
            "id": "1:1", "name": "Frame", "type": "FRAME",
            "children": [
                { "id": "1:2", "name": "Shown", "type": "RECTANGLE" },
                { "id": "1:3", "name": "Hidden", "type": "RECTANGLE", "visible": false },
            ],
        }));

        let simplified = simplify_node(&mut table, &node, None).unwrap();
        let children = simplified.children.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, "1:2");
    }

    #[test]
    fn test_all_children_hidden_prunes_field() {
        let mut table = StyleTable::new();
        let node = source(json!({
            "id": "1:1", "name": "Frame", "type": "FRAME",
            "children": [
                { "id": "1:2", "name": "Hidden", "type": "RECTANGLE", "visible": false },
            ],
        }));

        let simplified = simplify_node(&mut table, &node, None).unwrap();
        assert!(simplified.children.is_none());
    }

    #[test]
    fn test_shared_fill_interned_once() {
        let mut table = StyleTable::new();
        let red = json!([{ "type": "SOLID", "color": { "r": 1, "g": 0, "b": 0, "a": 1 } }]);
        let node = source(json!({
            "id": "1:1", "name": "Frame", "type": "FRAME",
            "children": [
                { "id": "1:2", "name": "A", "type": "RECTANGLE", "fills": red },
                { "id": "1:3", "name": "B", "type": "RECTANGLE", "fills": red },
            ],
        }));

        let simplified = simplify_node(&mut table, &node, None).unwrap();
        let children = simplified.children.unwrap();
        assert_eq!(children[0].fills, children[1].fills);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_border_radius_on_node_and_css() {
        let mut table = StyleTable::new();
        let uniform = source(json!({
            "id": "1:1", "name": "x", "type": "RECTANGLE", "cornerRadius": 10,
        }));
        let simplified = simplify_node(&mut table, &uniform, None).unwrap();
        assert_eq!(simplified.border_radius.as_deref(), Some("10px"));
        assert_eq!(
            simplified.css.unwrap().border_radius.as_deref(),
            Some("10px")
        );

        let per_corner = source(json!({
            "id": "1:2", "name": "x", "type": "RECTANGLE",
            "rectangleCornerRadii": [1, 2, 3, 4],
        }));
        let simplified = simplify_node(&mut table, &per_corner, None).unwrap();
        assert_eq!(simplified.border_radius.as_deref(), Some("1px 2px 3px 4px"));
    }

    #[test]
    fn test_layout_interned_only_when_non_trivial() {
        let mut table = StyleTable::new();
        let plain = source(json!({ "id": "1:1", "name": "x", "type": "GROUP" }));
        let simplified = simplify_node(&mut table, &plain, None).unwrap();
        assert!(simplified.layout.is_none());

        let flex = source(json!({
            "id": "1:2", "name": "x", "type": "FRAME",
            "layoutMode": "VERTICAL", "itemSpacing": 8,
        }));
        let simplified = simplify_node(&mut table, &flex, None).unwrap();
        assert_eq!(simplified.layout.as_deref(), Some("LAYOUT_0"));
    }

    #[test]
    fn test_empty_fields_pruned_from_serialization() {
        let mut table = StyleTable::new();
        let node = source(json!({ "id": "1:1", "name": "Group", "type": "GROUP" }));
        let simplified = simplify_node(&mut table, &node, None).unwrap();

        assert_eq!(
            serde_json::to_value(&simplified).unwrap(),
            json!({ "id": "1:1", "name": "Group", "type": "GROUP" })
        );
    }

    #[test]
    fn test_end_to_end_rectangle() {
        let design = parse_design_str(
            &json!({
                "name": "Test Doc",
                "lastModified": "2024-06-01T12:00:00Z",
                "document": {
                    "id": "0:0", "name": "Document", "type": "DOCUMENT",
                    "children": [{
                        "id": "1:1", "name": "Rect", "type": "RECTANGLE",
                        "absoluteBoundingBox": { "x": 10, "y": 20, "width": 300, "height": 150 },
                        "fills": [
                            { "type": "SOLID", "color": { "r": 1, "g": 0, "b": 0, "a": 1 } },
                        ],
                        "opacity": 0.8,
                        "cornerRadius": 10,
                    }],
                },
            })
            .to_string(),
        )
        .unwrap();

        assert_eq!(design.name, "Test Doc");
        assert_eq!(design.thumbnail_url, "");
        assert_eq!(design.nodes.len(), 1);

        let node = &design.nodes[0];
        assert_eq!(
            node.bounding_box,
            Some(BoundingBox { x: 10.0, y: 20.0, width: 300.0, height: 150.0 })
        );
        assert_eq!(node.opacity, Some(0.8));
        assert_eq!(node.border_radius.as_deref(), Some("10px"));

        let fills_key = node.fills.as_deref().unwrap();
        assert!(design.global_vars.styles.get(fills_key).is_some());

        let css = node.css.as_ref().unwrap();
        assert_eq!(css.width.as_deref(), Some("300px"));
        assert_eq!(css.height.as_deref(), Some("150px"));
        assert_eq!(css.opacity.as_deref(), Some("0.8"));
        assert_eq!(css.border_radius.as_deref(), Some("10px"));
        assert!(css.background_color.is_some());
    }

    #[test]
    fn test_node_subset_response() {
        let design = parse_design_str(
            &json!({
                "name": "Subset",
                "lastModified": "2024-06-01T12:00:00Z",
                "nodes": {
                    "1:2": { "document": {
                        "id": "1:2", "name": "Card", "type": "FRAME",
                        "children": [
                            { "id": "1:3", "name": "Label", "type": "TEXT",
                              "characters": "Hi" },
                        ],
                    }},
                },
            })
            .to_string(),
        )
        .unwrap();

        assert_eq!(design.nodes.len(), 1);
        let label = design.find_by_id("1:3").unwrap();
        assert_eq!(label.text.as_deref(), Some("Hi"));
    }

    #[test]
    fn test_text_style_interned() {
        let mut table = StyleTable::new();
        let node = source(json!({
            "id": "1:1", "name": "Text", "type": "TEXT",
            "characters": "Hello",
            "style": { "fontFamily": "Inter", "fontSize": 16 },
        }));

        let simplified = simplify_node(&mut table, &node, None).unwrap();
        let key = simplified.text_style.unwrap();
        assert!(key.starts_with("TEXT_STYLE_"));
        assert!(matches!(table.get(&key), Some(StyleValue::TextStyle(_))));
    }
}
