//! Typed access to invocation parameters.

use serde::Deserialize;
use serde::de::{DeserializeOwned, Deserializer};
use serde_json::Value;

use crate::error::{ToolError, ToolResult};
use crate::tool::Params;

/// Deserializes the parameter map into a tool-specific input type.
///
/// Unknown keys are ignored unless `T` opts into `deny_unknown_fields`, which
/// tools must not do since composites forward their selector unchanged.
///
/// # Errors
///
/// Returns [`ToolError::Execution`] describing the first field that failed to
/// deserialize.
pub fn parse_params<T>(params: &Params) -> ToolResult<T>
where
    T: DeserializeOwned,
{
    serde_json::from_value(Value::Object(params.clone()))
        .map_err(|err| ToolError::execution(format!("invalid parameters: {err}")))
}

/// Deserializes an optional field, treating a value of the wrong type as
/// absent.
///
/// Use with `#[serde(default, deserialize_with = "lenient_optional")]` on
/// `Option<T>` fields a tool can fall back on.
///
/// # Errors
///
/// Only fails if the underlying input is not valid JSON.
pub fn lenient_optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
