//! Standard node types: text and image display nodes.
//!
//! These are consumers of the factory-registration interface; nothing
//! in the core builder depends on them. They exercise the full
//! extension surface: key recognition with skip-everything-else, named
//! font/resource lookup through the construction context, and base
//! layer styling.

use std::any::Any;

use phf::phf_map;

use crate::layer::LayerId;
use crate::layout::{Builder, Layout};
use crate::registry::{LayerFactory, LayerNode};
use crate::stream::TokenStream;
use crate::token::Token;
use crate::value::Color;

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Behavior when text exceeds its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    TrailingEllipsis,
    WordWrap,
    Fill,
}

/// Image placement within its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Center,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

static ALIGNMENTS: phf::Map<&'static str, TextAlign> = phf_map! {
    "left" => TextAlign::Left,
    "center" => TextAlign::Center,
    "right" => TextAlign::Right,
};

static OVERFLOWS: phf::Map<&'static str, Overflow> = phf_map! {
    "ellipsis" => Overflow::TrailingEllipsis,
    "wrap" => Overflow::WordWrap,
    "fill" => Overflow::Fill,
};

static PLACEMENTS: phf::Map<&'static str, Placement> = phf_map! {
    "center" => Placement::Center,
    "top" => Placement::Top,
    "bottom" => Placement::Bottom,
    "left" => Placement::Left,
    "right" => Placement::Right,
    "top-left" => Placement::TopLeft,
    "top-right" => Placement::TopRight,
    "bottom-left" => Placement::BottomLeft,
    "bottom-right" => Placement::BottomRight,
};

/// A text display node.
#[derive(Debug)]
pub struct TextNode {
    layer: LayerId,
    pub text: String,
    pub color: Option<Color>,
    pub alignment: TextAlign,
    pub overflow: Overflow,
    /// Resolved font, when the document named one the layout knows.
    pub font: Option<String>,
}

impl LayerNode for TextNode {
    fn layer(&self) -> LayerId {
        self.layer
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Factory for `"text"` nodes.
///
/// Keys: `text`, `color`, `background`, `alignment`
/// (left/center/right), `overflow` (ellipsis/wrap/fill), `font` (name
/// resolved through the layout's font registry). Unrecognized keyword
/// values keep the default.
pub struct TextFactory;

impl LayerFactory for TextFactory {
    fn create(
        &self,
        cx: &mut Builder<'_>,
        json: &mut TokenStream<'_>,
        obj: Token,
    ) -> Box<dyn LayerNode> {
        let layer = cx.layers().alloc();
        let mut node = TextNode {
            layer,
            text: String::new(),
            color: None,
            alignment: TextAlign::Left,
            overflow: Overflow::TrailingEllipsis,
            font: None,
        };
        for _ in 0..obj.size {
            let Some(key) = json.next() else { break };
            if json.token_eq(key, "text") {
                if let Some(text) = json.next_str() {
                    node.text = text.to_string();
                }
            } else if json.token_eq(key, "color") {
                node.color = json.next_color();
            } else if json.token_eq(key, "background") {
                cx.layers().get_mut(layer).background = json.next_color();
            } else if json.token_eq(key, "alignment") {
                if let Some(name) = json.next_str() {
                    if let Some(&alignment) = ALIGNMENTS.get(name) {
                        node.alignment = alignment;
                    }
                }
            } else if json.token_eq(key, "overflow") {
                if let Some(name) = json.next_str() {
                    if let Some(&overflow) = OVERFLOWS.get(name) {
                        node.overflow = overflow;
                    }
                }
            } else if json.token_eq(key, "font") {
                if let Some(name) = json.next_str() {
                    node.font = cx.font(name).map(str::to_string);
                }
            } else {
                json.skip_subtree();
            }
        }
        Box::new(node)
    }
}

/// An image display node.
#[derive(Debug)]
pub struct ImageNode {
    layer: LayerId,
    /// Resolved resource id, when the document named one the layout
    /// knows.
    pub resource: Option<u32>,
    pub placement: Placement,
}

impl LayerNode for ImageNode {
    fn layer(&self) -> LayerId {
        self.layer
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Factory for `"image"` nodes.
///
/// Keys: `image` (resource name resolved through the layout's resource
/// registry), `background`, `alignment` (nine-way placement).
pub struct ImageFactory;

impl LayerFactory for ImageFactory {
    fn create(
        &self,
        cx: &mut Builder<'_>,
        json: &mut TokenStream<'_>,
        obj: Token,
    ) -> Box<dyn LayerNode> {
        let layer = cx.layers().alloc();
        let mut node = ImageNode {
            layer,
            resource: None,
            placement: Placement::Center,
        };
        for _ in 0..obj.size {
            let Some(key) = json.next() else { break };
            if json.token_eq(key, "image") {
                if let Some(name) = json.next_str() {
                    node.resource = cx.resource(name);
                }
            } else if json.token_eq(key, "background") {
                cx.layers().get_mut(layer).background = json.next_color();
            } else if json.token_eq(key, "alignment") {
                if let Some(name) = json.next_str() {
                    if let Some(&placement) = PLACEMENTS.get(name) {
                        node.placement = placement;
                    }
                }
            } else {
                json.skip_subtree();
            }
        }
        Box::new(node)
    }
}

/// Register the standard `"text"` and `"image"` types on a layout.
pub fn register_standard_types(layout: &mut Layout) {
    layout.add_type("text", TextFactory);
    layout.add_type("image", ImageFactory);
}
