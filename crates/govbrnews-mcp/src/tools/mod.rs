//! MCP tools.
//!
//! - [`NewsTools`]: `search_news`, `get_facets`, `similar_news`
//! - [`TemporalTools`]: `analyze_temporal`
//!
//! Tools answer in Markdown. Backend failures become Markdown error blocks
//! in a successful result; only arguments that fail to deserialize are
//! reported as MCP errors.

pub mod news;
pub mod temporal;

pub use news::NewsTools;
pub use temporal::TemporalTools;

use std::sync::Arc;

use rmcp::ErrorData;
use rmcp::model::{CallToolResult, Content, Tool};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Convert a `serde_json::Value::Object` to an `Arc<serde_json::Map>`.
fn json_schema(value: Value) -> Arc<serde_json::Map<String, Value>> {
    match value {
        Value::Object(map) => Arc::new(map),
        _ => Arc::new(serde_json::Map::new()),
    }
}

/// Build a `Tool` whose input schema is derived from `T`.
fn make_tool<T: JsonSchema>(name: &str, description: &str) -> Tool {
    let schema = serde_json::to_value(schemars::schema_for!(T)).unwrap_or_default();
    Tool::new(
        name.to_string(),
        description.to_string(),
        json_schema(schema),
    )
}

/// Deserialize tool arguments, mapping failures to `invalid_params`.
fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ErrorData> {
    let args = if args.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| ErrorData::invalid_params(e.to_string(), None))
}

/// Wrap Markdown in a successful `CallToolResult`.
fn markdown(text: String) -> Result<CallToolResult, ErrorData> {
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Clamp a caller-supplied integer into `min..=max`, logging adjustments.
fn clamp_arg(name: &str, value: i64, min: i64, max: i64) -> u32 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        log::warn!("{name} ajustado para {clamped}");
    }
    u32::try_from(clamped).unwrap_or(u32::MAX)
}
