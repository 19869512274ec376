//! figtree - Design-file simplification and CSS derivation
//!
//! Converts raw design-tool file responses (deeply nested node trees with
//! verbose styling payloads) into a compact simplified form: a forest of
//! nodes whose repeated style payloads are interned once into a shared
//! table, with ready-to-use CSS properties attached per node.
//!
//! ## Modules
//! - `source`: lenient wire model for raw file responses
//! - `simplify`: the recursive walker and simplified output types
//! - `intern`: content-addressed style table
//! - `paint`: fill and gradient conversion
//! - `css`: per-node CSS property derivation
//! - `stroke`, `effects`, `layout`: style payload builders
//! - `tokens`: design-token extraction and emission
//!
//! ## Usage
//!
//! ```ignore
//! use figtree::prelude::*;
//!
//! let design = parse_design_str(&raw_json)?;
//! let tokens = generate_design_tokens(&design);
//! println!("{}", tokens.emit(TokenFormat::Css, ""));
//! ```

// =============================================================================
// Core modules
// =============================================================================

/// Lenient source model for raw file responses
pub mod source;

/// Node simplification walker
pub mod simplify;

/// Style interning table
pub mod intern;

/// Fill and gradient conversion
pub mod paint;

/// CSS property derivation
pub mod css;

/// Stroke payload builder
pub mod stroke;

/// Effect payload builder
pub mod effects;

/// Layout payload builder
pub mod layout;

/// Design-token extraction and emission
pub mod tokens;

/// Error types
pub mod error;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

// Source model
pub use source::{FileResponse, Paint, SourceNode, TypeStyle};

// Simplified output
pub use simplify::{
    parse_design_str, simplify_response, BoundingBox, GlobalVars, SimplifiedDesign, SimplifiedNode,
};

// Style interning
pub use intern::{StyleTable, StyleValue};

// Paint conversion
pub use paint::SimplifiedFill;

// CSS derivation
pub use css::{extract_css_properties, CssProperties};

// Style payload builders
pub use effects::SimplifiedEffects;
pub use layout::SimplifiedLayout;
pub use stroke::SimplifiedStroke;

// Design tokens
pub use tokens::{generate_design_tokens, DesignTokens, TokenFormat};

// Error types
pub use error::{DesignError, DesignResult};

// =============================================================================
// Tests
// =============================================================================
