//! Effect bundle builder.
//!
//! Collapses a node's visible effects into the interned `EFFECT` payload,
//! reusing the same shadow and blur formatting as the CSS derivation engine.

use serde::Serialize;

use crate::css::{backdrop_blur_css, box_shadow_css, layer_blur_css};
use crate::source::SourceNode;

/// Normalized visual effects for one node.
///
/// Shadow and blur passes are independent; any subset may be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedEffects {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_shadow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backdrop_filter: Option<String>,
}

impl SimplifiedEffects {
    pub fn is_empty(&self) -> bool {
        self.box_shadow.is_none() && self.filter.is_none() && self.backdrop_filter.is_none()
    }
}

/// Build the effect bundle for a node.
pub fn build_simplified_effects(node: &SourceNode) -> SimplifiedEffects {
    SimplifiedEffects {
        box_shadow: box_shadow_css(&node.effects),
        filter: layer_blur_css(&node.effects),
        backdrop_filter: backdrop_blur_css(&node.effects),
    }
}
