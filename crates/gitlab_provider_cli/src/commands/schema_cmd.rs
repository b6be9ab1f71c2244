use super::Session;
use crate::errors::Error;

#[cfg(test)]
#[path = "schema_cmd_tests.rs"]
mod tests;

/// Renders the schema of the session's resource type as pretty-printed JSON.
pub fn render_schema(session: &Session) -> Result<String, Error> {
    let schema = session.schema()?;
    Ok(serde_json::to_string_pretty(&schema)?)
}
