//! Design-token extraction and emission.
//!
//! Read-only collaborator over a [`SimplifiedDesign`]: scans node names
//! (case-insensitive keyword match per category) and the interned style
//! table for color, typography, spacing, radius, shadow, opacity, and
//! gradient tokens, then emits them as JSON, CSS custom properties, or
//! SCSS variables and mixins.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::error::{DesignError, DesignResult};
use crate::intern::StyleValue;
use crate::paint::SimplifiedFill;
use crate::simplify::{SimplifiedDesign, SimplifiedNode};

// =============================================================================
// Token types
// =============================================================================

/// Token category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Color,
    Typography,
    Spacing,
    Radius,
    Shadow,
    Opacity,
    Gradient,
}

/// A token's value: a plain string, a number, or a composite record
/// (typography tokens carry several properties at once).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TokenValue {
    Text(String),
    Number(f64),
    Composite(BTreeMap<String, String>),
}

/// One extracted design token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesignToken {
    pub value: TokenValue,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DesignToken {
    fn new(value: TokenValue, kind: TokenKind, description: String) -> Self {
        Self { value, kind, description: Some(description) }
    }
}

/// All extracted tokens, grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DesignTokens {
    pub colors: BTreeMap<String, DesignToken>,
    pub typography: BTreeMap<String, DesignToken>,
    pub spacing: BTreeMap<String, DesignToken>,
    pub radii: BTreeMap<String, DesignToken>,
    pub shadows: BTreeMap<String, DesignToken>,
    pub opacity: BTreeMap<String, DesignToken>,
    pub gradients: BTreeMap<String, DesignToken>,
}

/// Supported emission formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFormat {
    Json,
    Css,
    Scss,
}

// =============================================================================
// Extraction
// =============================================================================

/// Extract all token categories from a simplified design.
pub fn generate_design_tokens(design: &SimplifiedDesign) -> DesignTokens {
    DesignTokens {
        colors: extract_colors(design),
        typography: extract_typography(design),
        spacing: extract_spacing(design),
        radii: extract_radii(design),
        shadows: extract_shadows(design),
        opacity: extract_opacity(design),
        gradients: extract_gradients(design),
    }
}

/// Normalize a node or style name into a token name: strip special
/// characters, collapse whitespace to dashes, lowercase, and prefix
/// non-letter-leading names with `token-`.
pub fn normalize_token_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.chars() {
        if c.is_whitespace() {
            in_space = true;
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            if in_space && !normalized.is_empty() {
                normalized.push('-');
            }
            in_space = false;
            normalized.push(c.to_ascii_lowercase());
        }
    }
    if !normalized.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        normalized.insert_str(0, "token-");
    }
    normalized
}

fn name_contains(node: &SimplifiedNode, keywords: &[&str]) -> bool {
    let name = node.name.to_lowercase();
    keywords.iter().any(|kw| name.contains(kw))
}

/// Walk a node and its descendants.
fn for_each_node<'a>(nodes: &'a [SimplifiedNode], f: &mut impl FnMut(&'a SimplifiedNode)) {
    for node in nodes {
        f(node);
        if let Some(children) = &node.children {
            for_each_node(children, f);
        }
    }
}

fn extract_colors(design: &SimplifiedDesign) -> BTreeMap<String, DesignToken> {
    let mut tokens = BTreeMap::new();

    // Solid colors from the interned fill lists.
    for (style_id, value) in design.global_vars.styles.iter() {
        if let StyleValue::Fills(fills) = value {
            for fill in fills {
                if let SimplifiedFill::Color(color) = fill {
                    if color != "transparent" {
                        tokens.insert(
                            normalize_token_name(&format!("color-{style_id}")),
                            DesignToken::new(
                                TokenValue::Text(color.clone()),
                                TokenKind::Color,
                                format!("Color extracted from style {style_id}"),
                            ),
                        );
                    }
                }
            }
        }
    }

    // Top-level nodes explicitly named as colors.
    for node in &design.nodes {
        if name_contains(node, &["color"]) {
            if let Some(background) = node.css.as_ref().and_then(|c| c.background_color.as_ref()) {
                tokens.insert(
                    normalize_token_name(&format!("color-{}", node.name)),
                    DesignToken::new(
                        TokenValue::Text(background.clone()),
                        TokenKind::Color,
                        format!("Color extracted from node {}", node.name),
                    ),
                );
            }
        }
    }

    tokens
}

fn extract_typography(design: &SimplifiedDesign) -> BTreeMap<String, DesignToken> {
    let mut tokens = BTreeMap::new();
    for_each_node(&design.nodes, &mut |node| {
        if node.node_type != "TEXT" {
            return;
        }
        let Some(css) = &node.css else { return };
        // A token needs at least family and size.
        let (Some(family), Some(size)) = (&css.font_family, &css.font_size) else {
            return;
        };

        let mut value = BTreeMap::new();
        value.insert("fontFamily".to_string(), family.clone());
        value.insert("fontSize".to_string(), size.clone());
        if let Some(weight) = &css.font_weight {
            value.insert("fontWeight".to_string(), weight.clone());
        }
        if let Some(line_height) = &css.line_height {
            value.insert("lineHeight".to_string(), line_height.clone());
        }
        if let Some(spacing) = &css.letter_spacing {
            value.insert("letterSpacing".to_string(), spacing.clone());
        }

        tokens.insert(
            normalize_token_name(&format!("typography-{}", node.name)),
            DesignToken::new(
                TokenValue::Composite(value),
                TokenKind::Typography,
                format!("Typography style extracted from node {}", node.name),
            ),
        );
    });
    tokens
}

fn extract_spacing(design: &SimplifiedDesign) -> BTreeMap<String, DesignToken> {
    let mut tokens = BTreeMap::new();
    for node in &design.nodes {
        if !name_contains(node, &["spacing", "space", "gap"]) {
            continue;
        }
        let Some(bounds) = &node.bounding_box else { continue };
        // The smaller side of the swatch is the spacing value.
        let value = bounds.width.min(bounds.height);
        tokens.insert(
            normalize_token_name(&format!("spacing-{}", node.name)),
            DesignToken::new(
                TokenValue::Text(format!("{value}px")),
                TokenKind::Spacing,
                format!("Spacing value extracted from node {}", node.name),
            ),
        );
    }
    tokens
}

fn extract_radii(design: &SimplifiedDesign) -> BTreeMap<String, DesignToken> {
    let mut tokens = BTreeMap::new();
    for_each_node(&design.nodes, &mut |node| {
        if !name_contains(node, &["radius", "corner", "rounded"]) {
            return;
        }
        let Some(radius) = node.css.as_ref().and_then(|c| c.border_radius.as_ref()) else {
            return;
        };
        tokens.insert(
            normalize_token_name(&format!("radius-{}", node.name)),
            DesignToken::new(
                TokenValue::Text(radius.clone()),
                TokenKind::Radius,
                format!("Border radius extracted from node {}", node.name),
            ),
        );
    });
    tokens
}

fn extract_shadows(design: &SimplifiedDesign) -> BTreeMap<String, DesignToken> {
    let mut tokens = BTreeMap::new();
    for_each_node(&design.nodes, &mut |node| {
        if !name_contains(node, &["shadow", "elevation"]) {
            return;
        }
        let Some(shadow) = node.css.as_ref().and_then(|c| c.box_shadow.as_ref()) else {
            return;
        };
        tokens.insert(
            normalize_token_name(&format!("shadow-{}", node.name)),
            DesignToken::new(
                TokenValue::Text(shadow.clone()),
                TokenKind::Shadow,
                format!("Box shadow extracted from node {}", node.name),
            ),
        );
    });
    tokens
}

fn extract_opacity(design: &SimplifiedDesign) -> BTreeMap<String, DesignToken> {
    let mut tokens = BTreeMap::new();
    for_each_node(&design.nodes, &mut |node| {
        if !name_contains(node, &["opacity"]) {
            return;
        }
        let Some(opacity) = node.opacity else { return };
        tokens.insert(
            normalize_token_name(&format!("opacity-{}", node.name)),
            DesignToken::new(
                TokenValue::Number(opacity),
                TokenKind::Opacity,
                format!("Opacity value extracted from node {}", node.name),
            ),
        );
    });
    tokens
}

fn extract_gradients(design: &SimplifiedDesign) -> BTreeMap<String, DesignToken> {
    let mut tokens = BTreeMap::new();
    for_each_node(&design.nodes, &mut |node| {
        if !name_contains(node, &["gradient", "background"]) {
            return;
        }
        let Some(image) = node.css.as_ref().and_then(|c| c.background_image.as_ref()) else {
            return;
        };
        let is_gradient = image.contains("linear-gradient")
            || image.contains("radial-gradient")
            || image.contains("conic-gradient");
        if !is_gradient {
            return;
        }
        tokens.insert(
            normalize_token_name(&format!("gradient-{}", node.name)),
            DesignToken::new(
                TokenValue::Text(image.clone()),
                TokenKind::Gradient,
                format!("Gradient extracted from node {}", node.name),
            ),
        );
    });
    tokens
}

// =============================================================================
// Emission
// =============================================================================

impl DesignTokens {
    /// Emit in the requested format. `prefix` is prepended to every
    /// variable name.
    pub fn emit(&self, format: TokenFormat, prefix: &str) -> String {
        match format {
            TokenFormat::Json => self.to_json(),
            TokenFormat::Css => self.to_css(prefix),
            TokenFormat::Scss => self.to_scss(prefix),
        }
    }

    /// Pretty-printed JSON form.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// CSS custom properties under `:root`.
    pub fn to_css(&self, prefix: &str) -> String {
        let mut css = String::from(":root {\n");
        let groups: [&BTreeMap<String, DesignToken>; 7] = [
            &self.colors,
            &self.spacing,
            &self.radii,
            &self.shadows,
            &self.opacity,
            &self.gradients,
            &self.typography,
        ];
        for group in groups {
            for (name, token) in group {
                match &token.value {
                    TokenValue::Composite(props) => {
                        for (prop, value) in props {
                            css.push_str(&format!("  --{prefix}{name}-{prop}: {value};\n"));
                        }
                    }
                    TokenValue::Text(value) => {
                        css.push_str(&format!("  --{prefix}{name}: {value};\n"));
                    }
                    TokenValue::Number(value) => {
                        css.push_str(&format!("  --{prefix}{name}: {value};\n"));
                    }
                }
            }
        }
        css.push_str("}\n");
        css
    }

    /// SCSS variables, with composite tokens emitted as mixins.
    pub fn to_scss(&self, prefix: &str) -> String {
        let mut scss = String::new();
        let groups: [(&str, &BTreeMap<String, DesignToken>); 7] = [
            ("Colors", &self.colors),
            ("Spacing", &self.spacing),
            ("Border Radius", &self.radii),
            ("Shadows", &self.shadows),
            ("Opacity", &self.opacity),
            ("Gradients", &self.gradients),
            ("Typography", &self.typography),
        ];
        for (heading, group) in groups {
            scss.push_str(&format!("// {heading}\n"));
            for (name, token) in group {
                match &token.value {
                    TokenValue::Composite(props) => {
                        scss.push_str(&format!("@mixin {prefix}{name} {{\n"));
                        for (prop, value) in props {
                            scss.push_str(&format!("  {}: {value};\n", kebab_case(prop)));
                        }
                        scss.push_str("}\n\n");
                    }
                    TokenValue::Text(value) => {
                        scss.push_str(&format!(
                            "${prefix}{name}: {value}; // {}\n",
                            token.description.as_deref().unwrap_or_default()
                        ));
                    }
                    TokenValue::Number(value) => {
                        scss.push_str(&format!(
                            "${prefix}{name}: {value}; // {}\n",
                            token.description.as_deref().unwrap_or_default()
                        ));
                    }
                }
            }
            scss.push('\n');
        }
        scss
    }

    /// Emit and write to a file, creating parent directories as needed.
    pub fn write_to(&self, path: &Path, format: TokenFormat, prefix: &str) -> DesignResult<()> {
        let output = self.emit(format, prefix);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .map_err(|e| DesignError::token_write(path.display().to_string(), e))?;
        }
        std::fs::write(path, output)
            .map_err(|e| DesignError::token_write(path.display().to_string(), e))
    }
}

/// camelCase → kebab-case for CSS property names.
fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

// =============================================================================
// Tests
// =============================================================================
