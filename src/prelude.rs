//! Prelude module for common imports.
//!
//! ```ignore
//! use figtree::prelude::*;
//! ```

// Source model
pub use crate::source::{
    Color, Effect, FileResponse, GradientStop, Paint, Rect, SourceNode, StrokeWeights, TypeStyle,
    Vector,
};

// Simplified output
pub use crate::simplify::{
    parse_design_str, simplify_node, simplify_response, BoundingBox, GlobalVars, SimplifiedDesign,
    SimplifiedNode,
};

// Style interning
pub use crate::intern::{StyleTable, StyleValue};

// Paint conversion
pub use crate::paint::{parse_paint, ColorValue, SimplifiedFill, SimplifiedGradientStop};

// CSS derivation
pub use crate::css::{extract_css_properties, CssProperties};

// Strokes, effects, layout
pub use crate::effects::{build_simplified_effects, SimplifiedEffects};
pub use crate::layout::{build_simplified_layout, LayoutMode, RelativePosition, SimplifiedLayout};
pub use crate::stroke::{build_simplified_strokes, SimplifiedStroke};

// Design tokens
pub use crate::tokens::{
    generate_design_tokens, DesignToken, DesignTokens, TokenFormat, TokenKind, TokenValue,
};

// Error
pub use crate::error::{DesignError, DesignResult};
