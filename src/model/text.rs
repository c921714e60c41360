use html5ever::tendril::TendrilSink as _;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Text content of an HTML fragment, as a browser would report it for the
/// fragment wrapped in a `<div>`: markup and comments dropped, character
/// references decoded, script and style bodies skipped.
pub fn strip_html(html: &str) -> String {
    let dom = parse_document(RcDom::default(), ParseOpts::default())
        .one(format!("<div>{html}</div>"));
    let mut text = String::with_capacity(html.len());
    collect_text(&dom.document, &mut text);
    text
}

fn collect_text(handle: &Handle, text: &mut String) {
    match &handle.data {
        NodeData::Text { contents } => text.push_str(&contents.borrow()),
        NodeData::Element { name, .. }
            if matches!(&*name.local, "script" | "style" | "template") => {}
        NodeData::Document | NodeData::Element { .. } => {
            for child in handle.children.borrow().iter() {
                collect_text(child, text);
            }
        }
        _ => {}
    }
}
