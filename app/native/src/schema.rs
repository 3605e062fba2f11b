//! JSON Schema generation for the configuration file.

use crate::config::WallthumbConfig;

/// Generates a JSON Schema for the Wallthumb configuration.
#[must_use]
pub fn generate_schema() -> schemars::Schema {
    let mut schema = schemars::schema_for!(WallthumbConfig);

    if let Some(obj) = schema.as_object_mut() {
        obj.insert(
            "$id".to_string(),
            serde_json::json!(
                "https://raw.githubusercontent.com/marcosmoura/wallthumb/main/wallthumb.schema.json"
            ),
        );
    }

    schema
}

/// Returns the schema as pretty-printed JSON.
#[must_use]
pub fn print_schema() -> String {
    serde_json::to_string_pretty(&generate_schema()).unwrap_or_default()
}
