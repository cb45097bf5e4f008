//! SVG: canonicalization and structural acceptance of rendered icons.
//!
//! DESIGN
//! ======
//! Two strictly separated steps. [`normalize`] rewrites well-formed markup
//! into canonical form (namespace and `viewBox` on the root, no inline
//! `style`, an `id` on every non-root element). [`validate`] is the gate:
//! well-formed XML, `svg` root in the SVG namespace, `viewBox` present.
//!
//! Parsing failures are reported separately from structural failures so the
//! pipeline can tell malformed markup from markup of the wrong shape.

pub mod normalize;
pub mod validate;

pub use normalize::normalize;
pub use validate::validate;

use crate::pipeline::Stage;

/// Canonical SVG namespace URI.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Fallback grid used when no caller grid applies.
pub const DEFAULT_GRID: u32 = 24;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SvgError {
    #[error("malformed XML: {0}")]
    Parse(String),
    #[error("root element must be <svg> (found <{found}>)")]
    WrongRoot { found: String },
    #[error("svg root must declare a viewBox")]
    MissingViewBox,
    #[error("svg root must be in namespace http://www.w3.org/2000/svg (found {})", .found.as_deref().unwrap_or("none"))]
    WrongNamespace { found: Option<String> },
}

impl SvgError {
    /// Pipeline stage this failure belongs to.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::Parse(_) => Stage::XmlParse,
            _ => Stage::Structural,
        }
    }
}

impl crate::error::ErrorCode for SvgError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "E_SVG_PARSE",
            Self::WrongRoot { .. } => "E_SVG_ROOT",
            Self::MissingViewBox => "E_SVG_VIEWBOX",
            Self::WrongNamespace { .. } => "E_SVG_NAMESPACE",
        }
    }
}

/// Strict XML parse shared by both steps. DTDs are tolerated because some
/// exporters still emit an SVG 1.1 doctype.
pub(crate) fn parse_document(text: &str) -> Result<roxmltree::Document<'_>, SvgError> {
    let options = roxmltree::ParsingOptions { allow_dtd: true, ..roxmltree::ParsingOptions::default() };
    roxmltree::Document::parse_with_options(text, options).map_err(|e| SvgError::Parse(e.to_string()))
}
