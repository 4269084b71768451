//! Strata Core
//!
//! Declarative layer trees from JSON documents. A document describes a
//! hierarchy of visual elements; each node is materialized by a
//! registered factory, wired to its parent, given a frame, and indexed
//! by id for later lookup.
//!
//! # Architecture
//!
//! - **token.rs** - single-pass JSON tokenizer, flat token array
//! - **stream.rs** - sequential token cursor with savepoint rewind
//! - **value.rs** - scalar value types (colors, rectangles)
//! - **kv.rs** - insertion-ordered key/value store
//! - **layer.rs** - layer arena with non-owning parent/child links
//! - **registry.rs** - factory traits and name dispatch
//! - **layout.rs** - the tree builder and node ownership
//! - **types.rs** - standard text/image node types
//!
//! # Example
//!
//! ```
//! use strata_core::{Layout, Rect};
//!
//! let mut layout = Layout::new(Rect::new(0, 0, 200, 200));
//! layout
//!     .parse(r##"{
//!         "background": "#000000",
//!         "layers": [
//!             {"id": "badge", "frame": [10, 10, 40, 40], "background": "ff0000"}
//!         ]
//!     }"##)
//!     .unwrap();
//!
//! let badge = layout.find_by_id("badge").unwrap();
//! assert_eq!(layout.layer(badge).frame, Rect::new(10, 10, 40, 40));
//! ```

pub mod kv;
pub mod layer;
pub mod layout;
pub mod registry;
pub mod stream;
pub mod token;
pub mod types;
pub mod value;

pub use kv::KvStore;
pub use layer::{Layer, LayerId, LayerTree};
pub use layout::{Builder, Layout};
pub use registry::{LayerFactory, LayerNode, Registry, DEFAULT_TYPE};
pub use stream::{Savepoint, TokenStream};
pub use token::{tokenize, Token, TokenKind, TokenizeError};
pub use value::{Color, Rect};
