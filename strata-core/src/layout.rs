//! Declarative layer-tree construction from JSON documents.
//!
//! A [`Layout`] owns everything a parsed document materializes: the
//! layer arena, the factory-created node objects, the id index, and the
//! type registry. Construction is one synchronous pass; teardown runs
//! in exact reverse creation order regardless of tree shape.
//!
//! The builder and registered factories are mutually recursive: the
//! builder dispatches an object to a factory, and factories building
//! nested `layers` arrays call back into [`Builder::build_node`] for
//! each element.

use std::rc::Rc;

use crate::kv::KvStore;
use crate::layer::{Layer, LayerId, LayerTree};
use crate::registry::{LayerFactory, LayerNode, Registry, DEFAULT_TYPE};
use crate::stream::TokenStream;
use crate::token::{Token, TokenKind, TokenizeError};
use crate::value::Rect;

/// One constructed node and the factory that owns its teardown.
struct OwnedNode {
    factory: Rc<dyn LayerFactory>,
    node: Box<dyn LayerNode>,
}

/// A materialized document: layer tree, node objects, id index.
pub struct Layout {
    display: Rect,
    layers: LayerTree,
    /// Creation-ordered node arena; the sole lifetime authority.
    nodes: Vec<OwnedNode>,
    ids: KvStore<LayerId>,
    types: Registry,
    fonts: KvStore<String>,
    resources: KvStore<u32>,
    root: Option<LayerId>,
}

impl Layout {
    /// Create an empty layout. `display` is substituted for the root
    /// frame when the document leaves it zero or absent.
    pub fn new(display: Rect) -> Self {
        Layout {
            display,
            layers: LayerTree::new(),
            nodes: Vec::new(),
            ids: KvStore::new(),
            types: Registry::new(Rc::new(DefaultFactory)),
            fonts: KvStore::new(),
            resources: KvStore::new(),
            root: None,
        }
    }

    /// Register a node type. Registering an existing name replaces it.
    pub fn add_type(&mut self, name: &str, factory: impl LayerFactory + 'static) {
        self.types.register(name, Rc::new(factory));
    }

    /// Register a named font for factories to look up.
    pub fn add_font(&mut self, name: impl Into<String>, font: impl Into<String>) {
        self.fonts.put(name, font.into());
    }

    /// Register a named resource id for factories to look up.
    pub fn add_resource(&mut self, name: impl Into<String>, id: u32) {
        self.resources.put(name, id);
    }

    /// Tokenize a document and materialize its node tree.
    pub fn parse(&mut self, text: &str) -> Result<(), TokenizeError> {
        let mut json = TokenStream::new(text)?;
        log::debug!("layout: building from {} tokens", json.len());
        self.parse_stream(&mut json);
        Ok(())
    }

    /// Materialize a node tree from an already-tokenized stream.
    ///
    /// Builds from the token at the cursor; anything past the root
    /// subtree is left unconsumed. A non-Object root leaves the layout
    /// without a root and the cursor untouched.
    pub fn parse_stream(&mut self, json: &mut TokenStream<'_>) {
        if !json.has_next() {
            return;
        }

        let sp = json.savepoint();
        let is_object = matches!(json.next(), Some(tok) if tok.kind == TokenKind::Object);
        json.rewind(sp);
        if !is_object {
            log::debug!("layout: document root is not an object");
            return;
        }

        let mut builder = Builder {
            layers: &mut self.layers,
            nodes: &mut self.nodes,
            ids: &mut self.ids,
            types: &self.types,
            fonts: &self.fonts,
            resources: &self.resources,
        };
        self.root = builder.build_node(json);

        // A root left at the zero rectangle gets the display bounds,
        // whether the frame was absent or explicitly zero.
        if let Some(root) = self.root {
            if self.layers.frame(root).is_zero() {
                self.layers.set_frame(root, self.display);
            }
        }
    }

    /// Root layer handle, when the document produced one.
    pub fn root(&self) -> Option<LayerId> {
        self.root
    }

    /// Earliest layer registered under `id`, if any.
    pub fn find_by_id(&self, id: &str) -> Option<LayerId> {
        self.ids.get(id).copied()
    }

    pub fn layer(&self, id: LayerId) -> &Layer {
        self.layers.get(id)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> &mut Layer {
        self.layers.get_mut(id)
    }

    pub fn layers(&self) -> &LayerTree {
        &self.layers
    }

    /// The factory-created node whose base layer is `layer`.
    pub fn node_for(&self, layer: LayerId) -> Option<&dyn LayerNode> {
        self.nodes
            .iter()
            .map(|owned| owned.node.as_ref())
            .find(|node| node.layer() == layer)
    }
}

impl Drop for Layout {
    /// Tear down every constructed node in reverse creation order.
    /// Teardown never walks the layer tree; parent/child links carry no
    /// lifetime claim.
    fn drop(&mut self) {
        log::trace!("layout: tearing down {} nodes", self.nodes.len());
        self.ids.clear();
        for entry in self.nodes.drain(..).rev() {
            entry.factory.destroy(entry.node);
        }
    }
}

/// Construction context handed to factories.
///
/// Borrows the layout's mutable state for the duration of one parse;
/// factories use it to allocate layers, look up named resources, and
/// recurse into child objects.
pub struct Builder<'a> {
    layers: &'a mut LayerTree,
    nodes: &'a mut Vec<OwnedNode>,
    ids: &'a mut KvStore<LayerId>,
    types: &'a Registry,
    fonts: &'a KvStore<String>,
    resources: &'a KvStore<u32>,
}

impl Builder<'_> {
    /// Layer arena access for factories.
    pub fn layers(&mut self) -> &mut LayerTree {
        self.layers
    }

    /// Font registered under `name`.
    pub fn font(&self, name: &str) -> Option<&str> {
        self.fonts.get(name).map(String::as_str)
    }

    /// Resource id registered under `name`.
    pub fn resource(&self, name: &str) -> Option<u32> {
        self.resources.get(name).copied()
    }

    /// Build one node from the object at the cursor.
    ///
    /// The same `size` pairs are interpreted three times from one
    /// savepoint: a type-discovery scan, the factory's construction
    /// scan, and the core-fields scan (`id`, `frame`) whose cursor
    /// advance is the one kept. Net advance always equals one
    /// [`TokenStream::skip_subtree`] from the same position.
    ///
    /// Anything that is not an Object yields no node; its subtree is
    /// consumed whole so sibling elements stay aligned.
    pub fn build_node(&mut self, json: &mut TokenStream<'_>) -> Option<LayerId> {
        let start = json.savepoint();
        let obj = json.next()?;
        if obj.kind != TokenKind::Object {
            json.rewind(start);
            json.skip_subtree();
            return None;
        }

        // Pass 1: discover the node type without keeping any cursor
        // movement.
        let fields = json.savepoint();
        let mut type_name = None;
        for _ in 0..obj.size {
            let key = json.next()?;
            if json.token_eq(key, "type") {
                type_name = json.next_str();
                break;
            }
            json.skip_subtree();
        }
        json.rewind(fields);
        let factory = self.types.resolve(type_name.unwrap_or(DEFAULT_TYPE));
        log::trace!("layout: creating node type '{}'", type_name.unwrap_or(DEFAULT_TYPE));

        // Pass 2: the factory interprets the same pairs. The node joins
        // the arena immediately so teardown covers it even if the rest
        // of the build fails.
        let node = factory.create(self, json, obj);
        let handle = node.layer();
        let index = self.nodes.len();
        self.nodes.push(OwnedNode { factory, node });
        json.rewind(fields);

        // Pass 3: core fields. This scan's cursor advance is the one
        // kept; it leaves the stream positioned past the whole object.
        for _ in 0..obj.size {
            let key = json.next()?;
            if json.token_eq(key, "id") {
                if let Some(id) = json.next_str() {
                    self.ids.put(id, handle);
                }
            } else if json.token_eq(key, "frame") {
                if let Some(frame) = json.next_rect() {
                    self.nodes[index].node.set_frame(self.layers, frame);
                }
            } else {
                json.skip_subtree();
            }
        }

        Some(handle)
    }
}

/// Node produced by the default factory: a plain container layer.
struct ContainerNode {
    layer: LayerId,
}

impl LayerNode for ContainerNode {
    fn layer(&self) -> LayerId {
        self.layer
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Fallback factory building a plain container: optional `background`
/// fill, optional `clips` flag, optional nested `layers` array.
struct DefaultFactory;

impl LayerFactory for DefaultFactory {
    fn create(
        &self,
        cx: &mut Builder<'_>,
        json: &mut TokenStream<'_>,
        obj: Token,
    ) -> Box<dyn LayerNode> {
        let layer = cx.layers().alloc();
        for _ in 0..obj.size {
            let Some(key) = json.next() else { break };
            if json.token_eq(key, "background") {
                cx.layers().get_mut(layer).background = json.next_color();
            } else if json.token_eq(key, "clips") {
                if let Some(clips) = json.next_bool() {
                    cx.layers().get_mut(layer).clips = clips;
                }
            } else if json.token_eq(key, "layers") {
                let Some(list) = json.next() else { break };
                if list.kind == TokenKind::Array {
                    for _ in 0..list.size {
                        if let Some(child) = cx.build_node(json) {
                            cx.layers().add_child(layer, child);
                        }
                    }
                } else {
                    json.skip_children(list);
                }
            } else {
                json.skip_subtree();
            }
        }
        Box::new(ContainerNode { layer })
    }
}
