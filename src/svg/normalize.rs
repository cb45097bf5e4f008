//! SVG normalizer.
//!
//! The document is parsed once with `roxmltree` and the root element's
//! subtree is written back through a `quick-xml` writer. Working from the
//! parsed tree means entity references (including internal DTD entities)
//! and character references are already resolved; the writer re-escapes
//! everything it emits. Anything outside the root element (declaration,
//! doctype, outer comments) is dropped, as are processing instructions.
//!
//! Element indices count every element in document order with the root at
//! zero, so the first child of the root is `el-1`.

use std::collections::HashSet;

use quick_xml::Writer;
use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use roxmltree::{Edge, Node};

use super::{SVG_NS, SvgError, parse_document};

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Canonicalize `svg`.
///
/// - root `svg` without `viewBox` gets one from numeric `width`/`height`
///   (truncated to integers), else `0 0 <fallback_grid> <fallback_grid>`;
/// - root `svg` without a resolved namespace gets `xmlns`;
/// - `style` is removed everywhere, `transform` too when `strip_transforms`;
/// - every non-root element without an `id` gets `el-<index>`.
///
/// Existing ids are never rewritten. A generated id that collides with an
/// existing one gets a numeric suffix.
///
/// # Errors
///
/// Returns [`SvgError::Parse`] when `svg` is not well-formed XML.
pub fn normalize(svg: &str, fallback_grid: u32, strip_transforms: bool) -> Result<String, SvgError> {
    let doc = parse_document(svg)?;
    let root = doc.root_element();

    let taken_ids = doc
        .descendants()
        .filter(Node::is_element)
        .filter_map(|n| n.attribute("id"))
        .map(str::to_string)
        .collect();
    let mut rewriter = Rewriter {
        root_facts: RootFacts::read(root, fallback_grid),
        strip_transforms,
        taken_ids,
        index: 0,
    };
    let mut writer = Writer::new(Vec::with_capacity(svg.len() + 64));

    for edge in root.traverse() {
        match edge {
            Edge::Open(node) if node.is_element() => {
                let start = rewriter.element(node);
                if node.has_children() {
                    write(&mut writer, Event::Start(start))?;
                } else {
                    write(&mut writer, Event::Empty(start))?;
                }
            }
            Edge::Open(node) if node.is_text() => {
                let text = escape_text(node.text().unwrap_or_default());
                write(&mut writer, Event::Text(BytesText::from_escaped(text)))?;
            }
            Edge::Open(node) if node.is_comment() => {
                let text = node.text().unwrap_or_default();
                write(&mut writer, Event::Comment(BytesText::from_escaped(text)))?;
            }
            Edge::Close(node) if node.is_element() && node.has_children() => {
                write(&mut writer, Event::End(BytesEnd::new(qualified_name(node))))?;
            }
            _ => {}
        }
    }

    String::from_utf8(writer.into_inner()).map_err(parse_err)
}

// =============================================================================
// ROOT FACTS
// =============================================================================

struct RootFacts {
    is_svg: bool,
    needs_xmlns: bool,
    view_box: Option<String>,
}

impl RootFacts {
    fn read(root: Node<'_, '_>, fallback_grid: u32) -> Self {
        let is_svg = root.tag_name().name() == "svg";

        let view_box = if is_svg && root.attribute("viewBox").is_none() {
            let size = root
                .attribute("width")
                .and_then(parse_dimension)
                .zip(root.attribute("height").and_then(parse_dimension));
            Some(match size {
                Some((w, h)) => format!("0 0 {w} {h}"),
                None => format!("0 0 {fallback_grid} {fallback_grid}"),
            })
        } else {
            None
        };

        Self {
            is_svg,
            needs_xmlns: is_svg && root.tag_name().namespace().is_none(),
            view_box,
        }
    }
}

/// Plain non-negative numeric length, truncated toward zero. Units and
/// percentages are not dimensions here.
#[allow(clippy::cast_possible_truncation)]
fn parse_dimension(raw: &str) -> Option<i64> {
    let value = raw.trim().parse::<f64>().ok()?;
    let truncated = value.trunc();
    (truncated.is_finite() && (0.0..1e9).contains(&truncated)).then_some(truncated as i64)
}

// =============================================================================
// REWRITE
// =============================================================================

struct Rewriter {
    root_facts: RootFacts,
    strip_transforms: bool,
    taken_ids: HashSet<String>,
    index: usize,
}

impl Rewriter {
    fn element(&mut self, node: Node<'_, '_>) -> BytesStart<'static> {
        let index = self.index;
        self.index += 1;
        let is_root = index == 0;

        let mut out = BytesStart::new(qualified_name(node));

        if is_root && self.root_facts.needs_xmlns {
            push_escaped(&mut out, "xmlns", SVG_NS);
        }
        for (prefix, uri) in declared_namespaces(node) {
            match prefix {
                Some(prefix) => push_escaped(&mut out, &format!("xmlns:{prefix}"), uri),
                None => push_escaped(&mut out, "xmlns", uri),
            }
        }

        let mut has_id = false;
        for attr in node.attributes() {
            match (attr.namespace(), attr.name()) {
                (None, "style") => continue,
                (None, "transform") if self.strip_transforms => continue,
                (None, "id") => has_id = true,
                _ => {}
            }
            let key = match attr.namespace() {
                Some(uri) => match prefix_for(node, uri) {
                    Some(prefix) => format!("{prefix}:{}", attr.name()),
                    None => attr.name().to_string(),
                },
                None => attr.name().to_string(),
            };
            push_escaped(&mut out, &key, attr.value());
        }

        if is_root {
            if let Some(view_box) = self.root_facts.view_box.as_deref().filter(|_| self.root_facts.is_svg) {
                push_escaped(&mut out, "viewBox", view_box);
            }
        } else if !has_id {
            let id = self.fresh_id(index);
            push_escaped(&mut out, "id", &id);
        }

        out
    }

    fn fresh_id(&mut self, index: usize) -> String {
        let base = format!("el-{index}");
        let mut candidate = base.clone();
        let mut suffix = 1;
        while self.taken_ids.contains(&candidate) {
            candidate = format!("{base}-{suffix}");
            suffix += 1;
        }
        self.taken_ids.insert(candidate.clone());
        candidate
    }
}

// =============================================================================
// NAMES
// =============================================================================

/// Namespaces in scope on `node` that its parent element did not already
/// bind the same way.
fn declared_namespaces<'a>(node: Node<'a, '_>) -> Vec<(Option<&'a str>, &'a str)> {
    let inherited: Vec<(Option<&str>, &str)> = node
        .parent_element()
        .map(|p| p.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
        .unwrap_or_default();
    node.namespaces()
        .map(|ns| (ns.name(), ns.uri()))
        .filter(|&(name, _)| name != Some("xml"))
        .filter(|binding| !inherited.contains(binding))
        .collect()
}

/// Prefix bound to `uri` on `node`. `None` means the default namespace.
fn prefix_for<'a>(node: Node<'a, '_>, uri: &str) -> Option<&'a str> {
    if uri == XML_NS {
        return Some("xml");
    }
    node.namespaces()
        .find(|ns| ns.uri() == uri && ns.name().is_some())
        .and_then(|ns| ns.name())
}

fn qualified_name(node: Node<'_, '_>) -> String {
    let tag = node.tag_name();
    let Some(uri) = tag.namespace() else {
        return tag.name().to_string();
    };
    let default_matches = node.namespaces().any(|ns| ns.name().is_none() && ns.uri() == uri);
    match prefix_for(node, uri) {
        Some(prefix) if !default_matches => format!("{prefix}:{}", tag.name()),
        _ => tag.name().to_string(),
    }
}

// =============================================================================
// ESCAPING
// =============================================================================

/// Attribute values keep tabs and line breaks as character references so a
/// re-parse does not fold them into spaces.
fn escape_attribute(value: &str) -> String {
    escape_whitespace(&escape(value))
}

fn escape_text(value: &str) -> String {
    escape_whitespace_cr(&partial_escape(value))
}

fn escape_whitespace(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            c => out.push(c),
        }
    }
    out
}

/// Text keeps tabs and newlines literally; only `\r` would be lost.
fn escape_whitespace_cr(value: &str) -> String {
    value.replace('\r', "&#13;")
}

fn push_escaped(out: &mut BytesStart<'static>, key: &str, value: &str) {
    let escaped = escape_attribute(value);
    out.push_attribute((key.as_bytes(), escaped.as_bytes()));
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), SvgError> {
    writer.write_event(event).map_err(parse_err)
}

fn parse_err(err: impl std::fmt::Display) -> SvgError {
    SvgError::Parse(err.to_string())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
