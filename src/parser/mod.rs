use serde_json::Value;
use tracing::debug;

use crate::config::ConverterConfig;
use crate::error::{GenerateError, GenerateResult};
use crate::model::ParsedCode;

/// Parse a serialised `ParsedCode` document.
///
/// The document must be an object whose `events` and `components` fields
/// are arrays; anything else is reported as invalid input before any
/// deserialisation happens.
pub fn load_ir_from_json(json: &str) -> GenerateResult<ParsedCode> {
    let root: Value = serde_json::from_str(json)?;

    if !root.is_object() {
        return Err(GenerateError::InvalidInput("document is not an object".into()));
    }
    let events = require_array(&root, "events")?;
    let components = require_array(&root, "components")?;
    debug!(events = events.len(), components = components.len(), "IR document loaded");

    Ok(serde_json::from_value(root)?)
}

/// Parse a configuration file; missing sections keep their defaults.
pub fn load_config_from_json(json: &str) -> GenerateResult<ConverterConfig> {
    Ok(serde_json::from_str(json)?)
}

fn require_array<'a>(root: &'a Value, field: &str) -> GenerateResult<&'a Vec<Value>> {
    root.get(field)
        .and_then(|v| v.as_array())
        .ok_or_else(|| GenerateError::InvalidInput(format!("`{field}` must be an array")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::{Action, parse_pseudo_code};

    #[test]
    fn test_ir_round_trip_through_json() {
        let ir = parse_pseudo_code(
            "On Button1.Click do\n    If score > 3 then\n        Set Label1.Text to \"win\"",
        );
        let json = serde_json::to_string(&ir).unwrap();
        assert!(json.contains("\"type\":\"if\""));
        assert!(json.contains("\"elseActions\""));
        assert_eq!(load_ir_from_json(&json).unwrap(), ir);
    }

    #[test]
    fn test_missing_sequences_are_input_errors() {
        for doc in [
            r#"{"components": []}"#,
            r#"{"events": [], "components": "Button1"}"#,
            "null",
            "[]",
        ] {
            let err = load_ir_from_json(doc).unwrap_err();
            assert!(err.is_input_error(), "{doc}: {err}");
        }
    }

    #[test]
    fn test_optional_sections_default_to_empty() {
        let ir = load_ir_from_json(
            r#"{"events": [{"component": "Button1", "event": "Click",
                 "actions": [{"type": "call", "component": "Player1", "method": "Start"}]}],
                "components": ["Button1", "Player1"]}"#,
        )
        .unwrap();
        assert!(ir.variables.is_empty());
        assert!(ir.errors.is_empty());
        assert!(matches!(
            &ir.events[0].actions[0],
            Action::Call { parameters, .. } if parameters.is_empty()
        ));
    }

    #[test]
    fn test_malformed_json_is_not_an_input_error() {
        let err = load_ir_from_json("{").unwrap_err();
        assert!(matches!(err, GenerateError::Json(_)));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = load_config_from_json(r#"{"project": {"name": "Demo"}}"#).unwrap();
        assert_eq!(config.project.name, "Demo");
        assert_eq!(config.project.screen, "Screen1");
        assert_eq!(config.default_kind, ConverterConfig::default().default_kind);
    }
}
