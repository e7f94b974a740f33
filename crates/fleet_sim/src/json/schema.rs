use schemars::schema_for;

use crate::json::types;

pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(types::JsonScenario))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_names_scenario_parts() {
        let schema = generate_json_schema().unwrap();

        assert!(schema.contains("\"Scenario\""));
        assert!(schema.contains("timeline"));
        assert!(schema.contains("add_vehicle"));
    }
}
