//! Check tool call arguments against the advertised schema before execution.

use serde_json::Value;

/// Top-level schema check: object shape, required fields, property types.
///
/// Returns a message describing the first violation. Fields the schema does
/// not mention are allowed through.
pub fn validate_arguments(args: &Value, schema: &Value) -> Result<(), String> {
    let expects_object = schema.get("type").and_then(Value::as_str) == Some("object");
    let Some(obj) = args.as_object() else {
        if expects_object {
            return Err(format!("expected object arguments, got {}", json_type_name(args)));
        }
        return Ok(());
    };

    let mut required = schema
        .get("required")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str);
    if let Some(missing) = required.find(|name| !obj.contains_key(*name)) {
        return Err(format!("missing required field '{missing}'"));
    }

    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Ok(());
    };
    for (key, value) in obj {
        let expected = properties
            .get(key)
            .and_then(|p| p.get("type"))
            .and_then(Value::as_str);
        if let Some(expected) = expected {
            if !value_matches_type(value, expected) {
                return Err(format!(
                    "field '{key}' expected type '{expected}', got {}",
                    json_type_name(value)
                ));
            }
        }
    }

    Ok(())
}

fn value_matches_type(value: &Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn email_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "to": { "type": "string" },
                "subject": { "type": "string" },
                "body": { "type": "string" },
            },
            "required": ["to", "subject", "body"],
        })
    }

    #[test]
    fn accepts_complete_email_arguments() {
        let args = json!({ "to": "expenses@contoso.com", "subject": "Expense Claim", "body": "" });

        assert!(validate_arguments(&args, &email_schema()).is_ok());
    }

    #[test]
    fn reports_first_missing_required_field() {
        let args = json!({ "to": "expenses@contoso.com" });

        let err = validate_arguments(&args, &email_schema()).unwrap_err();

        assert_eq!(err, "missing required field 'subject'");
    }

    #[test]
    fn rejects_non_string_body() {
        let args = json!({ "to": "x", "subject": "y", "body": 42 });

        let err = validate_arguments(&args, &email_schema()).unwrap_err();

        assert!(err.contains("field 'body'"));
        assert!(err.contains("expected type 'string', got number"));
    }

    #[test]
    fn rejects_non_object_when_schema_wants_object() {
        let err = validate_arguments(&json!("to=x"), &email_schema()).unwrap_err();

        assert!(err.contains("expected object arguments, got string"));
    }

    #[test]
    fn extra_fields_pass() {
        let args = json!({ "to": "x", "subject": "y", "body": "z", "cc": ["a"] });

        assert!(validate_arguments(&args, &email_schema()).is_ok());
    }

    #[test]
    fn empty_schema_accepts_anything() {
        assert!(validate_arguments(&Value::Null, &json!({})).is_ok());
        assert!(validate_arguments(&json!({"n": 1}), &json!({})).is_ok());
    }
}
