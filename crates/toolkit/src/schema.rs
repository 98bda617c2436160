//! Declarative argument schemas for tools.
//!
//! A `ToolSchema` describes the arguments a tool accepts. It is used twice:
//! to validate incoming `tools/call` arguments before a handler runs, and to
//! render the JSON Schema object advertised through `tools/list`.

use indexmap::IndexMap;
use serde_json::{json, Value};

/// The type of a single tool argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgType {
    String,
    Number,
    Boolean,
    /// A string restricted to a fixed set of values.
    Enum(Vec<String>),
}

impl ArgType {
    fn json_type(&self) -> &'static str {
        match self {
            ArgType::String | ArgType::Enum(_) => "string",
            ArgType::Number => "number",
            ArgType::Boolean => "boolean",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            ArgType::String => value.is_string(),
            ArgType::Number => value.is_number(),
            ArgType::Boolean => value.is_boolean(),
            ArgType::Enum(allowed) => value
                .as_str()
                .is_some_and(|s| allowed.iter().any(|a| a == s)),
        }
    }
}

/// Description of one named argument.
#[derive(Debug, Clone)]
pub struct ArgSpec {
    pub ty: ArgType,
    pub description: String,
}

/// An object-shaped argument schema: named, typed properties plus a list of
/// required names. Property order is preserved for advertisement.
#[derive(Debug, Clone, Default)]
pub struct ToolSchema {
    properties: IndexMap<String, ArgSpec>,
    required: Vec<String>,
}

impl ToolSchema {
    /// Create an empty object schema.
    pub fn object() -> Self {
        Self::default()
    }

    /// Add a required argument.
    pub fn required(mut self, name: impl Into<String>, ty: ArgType, description: impl Into<String>) -> Self {
        let name = name.into();
        self.required.push(name.clone());
        self.properties.insert(
            name,
            ArgSpec {
                ty,
                description: description.into(),
            },
        );
        self
    }

    /// Add an optional argument.
    pub fn optional(mut self, name: impl Into<String>, ty: ArgType, description: impl Into<String>) -> Self {
        self.properties.insert(
            name.into(),
            ArgSpec {
                ty,
                description: description.into(),
            },
        );
        self
    }

    /// Validate an argument mapping against this schema.
    ///
    /// Unknown arguments are ignored; missing required arguments and type
    /// mismatches fail with a descriptive error.
    pub fn validate(&self, args: &Value) -> Result<(), SchemaError> {
        let Some(map) = args.as_object() else {
            return Err(SchemaError::NotAnObject(json_type_name(args)));
        };

        for name in &self.required {
            if !map.contains_key(name) {
                return Err(SchemaError::MissingArgument(name.clone()));
            }
        }

        for (name, value) in map {
            let Some(spec) = self.properties.get(name) else {
                continue;
            };
            if !spec.ty.matches(value) {
                return Err(match &spec.ty {
                    ArgType::Enum(allowed) => SchemaError::NotInEnum {
                        name: name.clone(),
                        allowed: allowed.join(", "),
                    },
                    ty => SchemaError::TypeMismatch {
                        name: name.clone(),
                        expected: ty.json_type(),
                        actual: json_type_name(value),
                    },
                });
            }
        }

        Ok(())
    }

    /// Render as a JSON Schema object (`type`, `properties`, `required`).
    pub fn to_json_schema(&self) -> Value {
        let mut properties = serde_json::Map::new();
        for (name, spec) in &self.properties {
            let mut prop = serde_json::Map::new();
            prop.insert("type".to_string(), json!(spec.ty.json_type()));
            if let ArgType::Enum(allowed) = &spec.ty {
                prop.insert("enum".to_string(), json!(allowed));
            }
            if !spec.description.is_empty() {
                prop.insert("description".to_string(), json!(spec.description));
            }
            properties.insert(name.clone(), Value::Object(prop));
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": self.required,
        })
    }
}

/// Validation failure, phrased for direct use as a JSON-RPC error message.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SchemaError {
    #[error("arguments must be an object, got {0}")]
    NotAnObject(&'static str),

    #[error("missing required argument '{0}'")]
    MissingArgument(String),

    #[error("argument '{name}': expected {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("argument '{name}': must be one of: {allowed}")]
    NotInEnum { name: String, allowed: String },
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

    fn sample() -> ToolSchema {
        ToolSchema::object()
            .required("url", ArgType::String, "The URL to fetch")
            .optional("raw", ArgType::Boolean, "Skip HTML conversion")
            .optional("mode", ArgType::Enum(vec!["fast".into(), "full".into()]), "")
    }

    #[test]
    fn test_valid_arguments() {
        let schema = sample();
        assert!(schema.validate(&json!({"url": "https://example.com"})).is_ok());
        assert!(schema
            .validate(&json!({"url": "https://example.com", "raw": true}))
            .is_ok());
        assert!(schema
            .validate(&json!({"url": "x", "mode": "fast"}))
            .is_ok());
    }

    #[test]
    fn test_missing_required() {
        let err = sample().validate(&json!({})).unwrap_err();
        assert!(matches!(err, SchemaError::MissingArgument(_)));
        assert_eq!(err.to_string(), "missing required argument 'url'");
    }

    #[test]
    fn test_type_mismatch() {
        let err = sample().validate(&json!({"url": 42})).unwrap_err();
        assert_eq!(err.to_string(), "argument 'url': expected string, got number");
    }

    #[test]
    fn test_enum_rejects_unknown_value() {
        let err = sample()
            .validate(&json!({"url": "x", "mode": "slow"}))
            .unwrap_err();
        assert!(matches!(err, SchemaError::NotInEnum { .. }));
        assert!(err.to_string().contains("fast"));
    }

    #[test]
    fn test_unknown_arguments_ignored() {
        assert!(sample()
            .validate(&json!({"url": "x", "extra": [1, 2]}))
            .is_ok());
    }

    #[test]
    fn test_non_object_arguments() {
        let err = sample().validate(&json!([1, 2])).unwrap_err();
        assert_eq!(err.to_string(), "arguments must be an object, got array");
    }

    #[test]
    fn test_json_schema_rendering() {
        let rendered = sample().to_json_schema();
        assert_eq!(rendered["type"], "object");
        assert_eq!(rendered["properties"]["url"]["type"], "string");
        assert_eq!(rendered["properties"]["url"]["description"], "The URL to fetch");
        assert_eq!(rendered["properties"]["raw"]["type"], "boolean");
        assert_eq!(rendered["properties"]["mode"]["enum"], json!(["fast", "full"]));
        assert_eq!(rendered["required"], json!(["url"]));
    }

    #[test]
    fn test_property_order_preserved() {
        let rendered = sample().to_json_schema();
        let keys: Vec<&String> = rendered["properties"].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["url", "raw", "mode"]);
    }
}
