//! SVG validator: the acceptance gate every returned icon passes.

use super::{SVG_NS, SvgError, parse_document};

/// Check that `svg` is well-formed XML whose root is an `svg` element in the
/// SVG namespace carrying a `viewBox`.
///
/// # Errors
///
/// [`SvgError::Parse`] for malformed XML, otherwise the first structural
/// failure in the order root name, `viewBox`, namespace.
pub fn validate(svg: &str) -> Result<(), SvgError> {
    let doc = parse_document(svg)?;
    let root = doc.root_element();
    let tag = root.tag_name();

    if tag.name() != "svg" {
        return Err(SvgError::WrongRoot { found: tag.name().to_string() });
    }
    if root.attribute("viewBox").is_none() {
        return Err(SvgError::MissingViewBox);
    }
    match tag.namespace() {
        Some(SVG_NS) => Ok(()),
        other => Err(SvgError::WrongNamespace { found: other.map(str::to_string) }),
    }
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
