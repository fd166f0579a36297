//! Validated tool names.

use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const MAX_NAME_LEN: usize = 64;

/// Separator between segments of a dotted tool path.
pub const PATH_DELIMITER: char = '.';

/// Name of a tool, unique among its siblings.
///
/// Names are matched exactly and case-sensitively. They may not contain the
/// path delimiter, otherwise a dotted path could not address them.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolName(String);

impl ToolName {
    /// Creates a tool name after validating its format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidToolName`] if the name is empty, too long, or
    /// contains characters other than ASCII alphanumerics, `_` and `-`.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ToolName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ToolName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ToolName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ToolName> for String {
    fn from(value: ToolName) -> Self {
        value.0
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidToolName {
            name: String::new(),
            reason: "name cannot be empty".into(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(Error::InvalidToolName {
            name: name.into(),
            reason: format!("name length must be <= {MAX_NAME_LEN}"),
        });
    }

    if name.contains(PATH_DELIMITER) {
        return Err(Error::InvalidToolName {
            name: name.into(),
            reason: format!("name cannot contain the path delimiter `{PATH_DELIMITER}`"),
        });
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
    {
        return Err(Error::InvalidToolName {
            name: name.into(),
            reason: "name must contain ASCII alphanumerics, dash, or underscore".into(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_mixed_case_names() {
        let name = ToolName::new("BraveSearch").expect("name");
        assert_eq!(name.as_str(), "BraveSearch");
        assert_eq!(name.to_string(), "BraveSearch");
    }

    #[test]
    fn rejects_delimiter() {
        let err = ToolName::new("Web.Tools").expect_err("dotted name");
        assert!(matches!(err, Error::InvalidToolName { name, .. } if name == "Web.Tools"));
    }

    #[test]
    fn rejects_empty_and_oversized() {
        assert!(ToolName::new("").is_err());
        assert!(ToolName::new("x".repeat(MAX_NAME_LEN + 1)).is_err());
        assert!(ToolName::new("has space").is_err());
    }
}
