//! Dotted tool paths such as `WebTools.BraveSearch`.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use mcp_primitives::PATH_DELIMITER;
use tracing::debug;

use crate::error::{ToolError, ToolResult};
use crate::registry::ToolRegistry;
use crate::tool::Tool;

/// Parsed dotted path addressing a node in the tool tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolPath<'a> {
    raw: &'a str,
    segments: Vec<&'a str>,
}

impl<'a> ToolPath<'a> {
    /// Splits `raw` on the path delimiter.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidPath`] if the path is empty or any segment
    /// is empty (leading, trailing, or doubled delimiters).
    pub fn parse(raw: &'a str) -> ToolResult<Self> {
        let segments: Vec<&str> = raw.split(PATH_DELIMITER).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(ToolError::InvalidPath {
                path: raw.to_owned(),
            });
        }
        Ok(Self { raw, segments })
    }

    /// The path exactly as supplied.
    #[must_use]
    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// Top-level tool name.
    #[must_use]
    pub fn root(&self) -> &'a str {
        self.segments[0]
    }

    /// Segments below the top-level tool.
    #[must_use]
    pub fn descendants(&self) -> &[&'a str] {
        &self.segments[1..]
    }

    /// All segments in order.
    #[must_use]
    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    /// Walks the registry and nested children down to the addressed tool.
    ///
    /// The returned tool may be a leaf or a composite.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::ToolNotFound`] when the root is not registered and
    /// [`ToolError::SubToolNotFound`] when a later segment does not match a
    /// child. The walk stops at the first failure.
    pub fn resolve(&self, registry: &ToolRegistry) -> ToolResult<Arc<dyn Tool>> {
        let mut current = registry
            .lookup(self.root())
            .ok_or_else(|| ToolError::ToolNotFound {
                name: self.root().to_owned(),
            })?;

        for segment in self.descendants() {
            let next = current.children().get(*segment).cloned().ok_or_else(|| {
                ToolError::SubToolNotFound {
                    path: self.raw.to_owned(),
                    segment: (*segment).to_owned(),
                }
            })?;
            current = next;
        }

        debug!(path = self.raw, tool = current.name(), "resolved tool path");
        Ok(current)
    }
}

impl Display for ToolPath<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_segments_in_order() {
        let path = ToolPath::parse("WebTools.BraveSearch").unwrap();
        assert_eq!(path.root(), "WebTools");
        assert_eq!(path.descendants(), ["BraveSearch"]);
        assert_eq!(path.segments().len(), 2);
        assert_eq!(path.to_string(), "WebTools.BraveSearch");
    }

    #[test]
    fn single_segment_has_no_descendants() {
        let path = ToolPath::parse("WebTools").unwrap();
        assert_eq!(path.root(), "WebTools");
        assert!(path.descendants().is_empty());
    }

    #[test]
    fn empty_segments_are_invalid() {
        for raw in ["", ".", "WebTools.", ".BraveSearch", "WebTools..BraveSearch"] {
            let err = ToolPath::parse(raw).expect_err(raw);
            assert!(matches!(err, ToolError::InvalidPath { path } if path == raw));
        }
    }
}
