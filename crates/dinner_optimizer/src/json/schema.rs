use schemars::schema_for;

use crate::json::types;

pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(types::JsonDinnerInstance))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_names_input_fields() {
        let schema = generate_json_schema().unwrap();

        for field in ["country_code", "events", "groups", "host_event", "after_party"] {
            assert!(schema.contains(field), "{field} missing from schema");
        }
    }
}
