//! Parameter schema types advertised by tools during discovery.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Type tag of a single tool parameter.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// UTF-8 string.
    String,
    /// Integer number.
    Int,
    /// Floating point number.
    Float,
    /// Boolean flag.
    Bool,
}

impl Display for ParamType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
        };
        f.write_str(tag)
    }
}

/// Declaration of one parameter accepted by a tool.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    #[serde(rename = "type")]
    kind: ParamType,
    required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl ParamSpec {
    /// Declares a parameter the caller must supply.
    #[must_use]
    pub const fn required(kind: ParamType) -> Self {
        Self {
            kind,
            required: true,
            description: None,
        }
    }

    /// Declares a parameter the caller may omit.
    #[must_use]
    pub const fn optional(kind: ParamType) -> Self {
        Self {
            kind,
            required: false,
            description: None,
        }
    }

    /// Attaches a human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the type tag.
    #[must_use]
    pub const fn kind(&self) -> ParamType {
        self.kind
    }

    /// Returns whether the parameter is mandatory.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Mapping from parameter name to its declaration.
///
/// Entries are kept sorted by name so serialized schemas are stable.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSchema(BTreeMap<String, ParamSpec>);

impl ParameterSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts building a schema.
    #[must_use]
    pub fn builder() -> ParameterSchemaBuilder {
        ParameterSchemaBuilder {
            params: BTreeMap::new(),
        }
    }

    /// Returns the declaration for `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamSpec> {
        self.0.get(name)
    }

    /// Returns whether `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Inserts or replaces a declaration, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, spec: ParamSpec) -> Option<ParamSpec> {
        self.0.insert(name.into(), spec)
    }

    /// Removes a declaration, returning it if it was present.
    pub fn remove(&mut self, name: &str) -> Option<ParamSpec> {
        self.0.remove(name)
    }

    /// Number of declared parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no parameters are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over declarations in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, ParamSpec> {
        self.0.iter()
    }

    /// Iterates over the names of required parameters.
    pub fn required_names(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, spec)| spec.required)
            .map(|(name, _)| name.as_str())
    }
}

impl<'a> IntoIterator for &'a ParameterSchema {
    type Item = (&'a String, &'a ParamSpec);
    type IntoIter = btree_map::Iter<'a, String, ParamSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Builder for [`ParameterSchema`].
#[derive(Debug)]
pub struct ParameterSchemaBuilder {
    params: BTreeMap<String, ParamSpec>,
}

impl ParameterSchemaBuilder {
    /// Declares a parameter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the name is blank or was already
    /// declared.
    pub fn param(mut self, name: impl Into<String>, spec: ParamSpec) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidParameter {
                name,
                reason: "parameter name cannot be empty".into(),
            });
        }
        if self.params.contains_key(&name) {
            return Err(Error::InvalidParameter {
                name,
                reason: "parameter declared twice".into(),
            });
        }
        self.params.insert(name, spec);
        Ok(self)
    }

    /// Finalises the schema.
    #[must_use]
    pub fn build(self) -> ParameterSchema {
        ParameterSchema(self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_type_tag_and_skips_missing_description() {
        let schema = ParameterSchema::builder()
            .param("query", ParamSpec::required(ParamType::String))
            .and_then(|b| {
                b.param(
                    "count",
                    ParamSpec::optional(ParamType::Int).with_description("Number of results"),
                )
            })
            .map(ParameterSchemaBuilder::build)
            .expect("schema");

        let value = serde_json::to_value(&schema).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "count": { "type": "int", "required": false, "description": "Number of results" },
                "query": { "type": "string", "required": true },
            })
        );
    }

    #[test]
    fn duplicate_parameter_is_rejected() {
        let err = ParameterSchema::builder()
            .param("ticker", ParamSpec::required(ParamType::String))
            .and_then(|b| b.param("ticker", ParamSpec::optional(ParamType::String)))
            .expect_err("duplicate");

        assert!(matches!(err, Error::InvalidParameter { name, .. } if name == "ticker"));
    }

    #[test]
    fn required_names_lists_only_mandatory() {
        let mut schema = ParameterSchema::new();
        schema.insert("ticker", ParamSpec::required(ParamType::String));
        schema.insert("period", ParamSpec::optional(ParamType::String));

        let required: Vec<_> = schema.required_names().collect();
        assert_eq!(required, ["ticker"]);
    }
}
