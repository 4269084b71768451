//! Pluggable node construction.
//!
//! A node "type" integrates with the tree builder through two traits:
//! [`LayerFactory`] materializes and tears down nodes, and the
//! [`LayerNode`] objects it produces expose the base layer handle and
//! frame assignment. The [`Registry`] maps type names to factories and
//! always holds a `"default"` entry to fall back on.

use std::any::Any;
use std::rc::Rc;

use crate::kv::KvStore;
use crate::layer::{LayerId, LayerTree};
use crate::layout::Builder;
use crate::stream::TokenStream;
use crate::token::Token;
use crate::value::Rect;

/// Name of the fallback factory seeded at layout construction.
pub const DEFAULT_TYPE: &str = "default";

/// A node materialized by a [`LayerFactory`].
pub trait LayerNode: Any {
    /// Base layer handle used to link this node into its parent.
    fn layer(&self) -> LayerId;

    /// Apply an explicit frame. The default forwards to the base layer.
    fn set_frame(&mut self, layers: &mut LayerTree, frame: Rect) {
        layers.set_frame(self.layer(), frame);
    }

    /// Concrete-type access for post-parse inspection.
    fn as_any(&self) -> &dyn Any;
}

/// Factory for one registered node kind.
pub trait LayerFactory {
    /// Materialize a node from an object's key/value pairs.
    ///
    /// `obj` is the already-consumed Object token; the stream is
    /// positioned at its first key. The factory must consume or skip
    /// exactly `obj.size` pairs, recognizing the keys meaningful to it
    /// and skipping everything else (including `type`, `id`, and
    /// `frame`, which the builder applies itself). Child objects under
    /// a `layers` key are built by calling back into
    /// [`Builder::build_node`].
    fn create(
        &self,
        cx: &mut Builder<'_>,
        json: &mut TokenStream<'_>,
        obj: Token,
    ) -> Box<dyn LayerNode>;

    /// Tear down a node. The default just drops it.
    fn destroy(&self, node: Box<dyn LayerNode>) {
        drop(node);
    }
}

/// Name -> factory dispatch, open for extension.
pub struct Registry {
    entries: KvStore<Rc<dyn LayerFactory>>,
}

impl Registry {
    /// Create a registry seeded with `default` under [`DEFAULT_TYPE`].
    pub fn new(default: Rc<dyn LayerFactory>) -> Self {
        let mut entries = KvStore::new();
        entries.put(DEFAULT_TYPE, default);
        Registry { entries }
    }

    /// Insert or replace: registering an existing name replaces it, so
    /// the last registration wins.
    pub fn register(&mut self, name: &str, factory: Rc<dyn LayerFactory>) {
        log::debug!("registry: registered node type '{}'", name);
        self.entries.remove(name);
        self.entries.put(name, factory);
    }

    /// Factory registered under `name`, or the default when unknown.
    pub fn resolve(&self, name: &str) -> Rc<dyn LayerFactory> {
        self.entries
            .get(name)
            .or_else(|| self.entries.get(DEFAULT_TYPE))
            .cloned()
            .expect("default factory is always registered")
    }
}
