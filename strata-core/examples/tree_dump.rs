//! Build a layout from an inline document and print the layer tree.

use strata_core::types::register_standard_types;
use strata_core::{Layout, LayerId, Rect};

const DOCUMENT: &str = r##"{
    "id": "screen",
    "background": "#1c1c1c",
    "layers": [
        {
            "type": "text",
            "id": "title",
            "frame": [0, 8, 144, 28],
            "text": "Strata",
            "color": "#ffffff",
            "alignment": "center",
            "font": "title"
        },
        {
            "id": "body",
            "frame": [8, 44, 128, 100],
            "clips": true,
            "layers": [
                {"type": "image", "id": "icon", "frame": [4, 4, 24, 24], "image": "icon"},
                {"type": "text", "id": "caption", "frame": [32, 4, 92, 24], "text": "hello"}
            ]
        }
    ]
}"##;

fn dump(layout: &Layout, id: LayerId, indent: usize) {
    let layer = layout.layer(id);
    println!(
        "{}{:?} frame={:?} bg={:?} clips={}",
        "  ".repeat(indent),
        id,
        layer.frame,
        layer.background,
        layer.clips
    );
    for &child in layer.children() {
        dump(layout, child, indent + 1);
    }
}

fn main() {
    let mut layout = Layout::new(Rect::new(0, 0, 144, 168));
    register_standard_types(&mut layout);
    layout.add_font("title", "gothic-28-bold");
    layout.add_resource("icon", 7);

    if let Err(err) = layout.parse(DOCUMENT) {
        eprintln!("parse failed: {}", err);
        return;
    }

    match layout.root() {
        Some(root) => dump(&layout, root, 0),
        None => println!("no root"),
    }

    for id in ["title", "icon", "missing"] {
        println!("find_by_id({:?}) -> {:?}", id, layout.find_by_id(id));
    }
}
