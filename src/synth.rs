// Example value synthesis for apirecon
// Produces representative JSON values for schema fragments, following $ref
// indirection with a depth cap so cyclic schema graphs still terminate

use serde_json::{json, Map, Value};

pub const DEFAULT_MAX_DEPTH: usize = 5;
pub const PLACEHOLDER: &str = "example";

const SAMPLE_NUMBER: i64 = 123;

/// The shape of a schema fragment, decided once per node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaKind<'a> {
    /// Non-empty `enum`; carries the first listed value.
    Enum(&'a Value),
    Ref(&'a str),
    String,
    Integer,
    Number,
    Boolean,
    Array(Option<&'a Value>),
    Object(Option<&'a Map<String, Value>>),
    Untyped,
}

impl<'a> SchemaKind<'a> {
    pub fn of(schema: &'a Value) -> Self {
        if let Some(first) = schema
            .get("enum")
            .and_then(|e| e.as_array())
            .and_then(|e| e.first())
        {
            return SchemaKind::Enum(first);
        }
        if let Some(r) = schema.get("$ref").and_then(|r| r.as_str()) {
            return SchemaKind::Ref(r);
        }
        match schema.get("type").and_then(|t| t.as_str()) {
            Some("string") => SchemaKind::String,
            Some("integer") => SchemaKind::Integer,
            Some("number") => SchemaKind::Number,
            Some("boolean") => SchemaKind::Boolean,
            Some("array") => SchemaKind::Array(schema.get("items")),
            Some("object") => SchemaKind::Object(properties(schema)),
            _ => SchemaKind::Untyped,
        }
    }
}

fn properties(schema: &Value) -> Option<&Map<String, Value>> {
    schema.get("properties").and_then(|p| p.as_object())
}

fn required_names(schema: &Value) -> impl Iterator<Item = &str> {
    schema
        .get("required")
        .and_then(|r| r.as_array())
        .into_iter()
        .flatten()
        .filter_map(|r| r.as_str())
}

fn is_empty_schema(schema: &Value) -> bool {
    match schema {
        Value::Object(m) => m.is_empty(),
        _ => true,
    }
}

// `example` wins over `default`; explicit nulls count as absent
fn declared_value(schema: &Value) -> Option<Value> {
    schema
        .get("example")
        .filter(|v| !v.is_null())
        .or_else(|| schema.get("default").filter(|v| !v.is_null()))
        .cloned()
}

// Example mode yields generic placeholders; Sample mode yields name-derived
// ones and fills in required fields, for request bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Example,
    Sample,
}

/// Synthesizes example values against a registry of named schemas.
///
/// `$ref` strings resolve by their final path segment, so
/// `#/definitions/User` and `#/components/schemas/User` both look up `User`.
#[derive(Debug, Clone, Copy)]
pub struct Synthesizer<'a> {
    registry: Option<&'a Map<String, Value>>,
    max_depth: usize,
}

impl<'a> Synthesizer<'a> {
    pub fn new(registry: Option<&'a Map<String, Value>>) -> Self {
        Self {
            registry,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn resolve(&self, reference: &str) -> Option<&'a Value> {
        let name = reference.rsplit('/').next()?;
        self.registry?.get(name)
    }

    /// Representative value for `schema`, e.g. for a query or path parameter.
    pub fn example_value(&self, schema: &Value) -> Value {
        self.synthesize(schema, 0)
    }

    /// Same as [`example_value`](Self::example_value) but starting at `depth`.
    pub fn synthesize(&self, schema: &Value, depth: usize) -> Value {
        self.value_at(schema, None, depth, Mode::Example)
    }

    /// Sample request body for `schema`.
    ///
    /// Every name in `required` (and in the schema's own `required` list) is
    /// present in the output, with a `sample_<name>` placeholder when the
    /// schema never defines that property.
    pub fn sample_body(&self, schema: &Value, required: &[String]) -> Value {
        if is_empty_schema(schema) {
            let mut obj = Map::new();
            fill_required(&mut obj, required.iter().map(|s| s.as_str()));
            return Value::Object(obj);
        }
        let mut body = self.value_at(schema, None, 0, Mode::Sample);
        if let Value::Object(obj) = &mut body {
            fill_required(obj, required.iter().map(|s| s.as_str()));
        }
        body
    }

    fn value_at(&self, schema: &Value, field: Option<&str>, depth: usize, mode: Mode) -> Value {
        if depth > self.max_depth {
            return Value::Object(Map::new());
        }
        if is_empty_schema(schema) {
            return placeholder_string(field, mode);
        }

        match SchemaKind::of(schema) {
            SchemaKind::Enum(first) => first.clone(),
            SchemaKind::Ref(reference) => match self.resolve(reference) {
                Some(resolved) => self.value_at(resolved, field, depth + 1, mode),
                None if mode == Mode::Sample && field.is_none() => Value::Object(Map::new()),
                None => placeholder_string(field, mode),
            },
            SchemaKind::String => {
                declared_value(schema).unwrap_or_else(|| placeholder_string(field, mode))
            }
            SchemaKind::Integer => declared_value(schema).unwrap_or_else(|| match mode {
                Mode::Example => json!(0),
                Mode::Sample => json!(SAMPLE_NUMBER),
            }),
            SchemaKind::Number => declared_value(schema).unwrap_or_else(|| match mode {
                Mode::Example => json!(0.0),
                Mode::Sample => json!(SAMPLE_NUMBER),
            }),
            SchemaKind::Boolean => declared_value(schema).unwrap_or(Value::Bool(true)),
            SchemaKind::Array(items) => {
                let item_field = field.map(|f| format!("{}_item", f));
                let item = match items {
                    Some(items) => self.value_at(items, item_field.as_deref(), depth + 1, mode),
                    None => placeholder_string(item_field.as_deref(), mode),
                };
                Value::Array(vec![item])
            }
            SchemaKind::Object(props) => self.object_at(schema, props, depth, mode),
            // bodies often omit `type: object` on schemas that only list properties
            SchemaKind::Untyped
                if mode == Mode::Sample
                    && (properties(schema).is_some()
                        || schema.get("required").map_or(false, |r| r.is_array())) =>
            {
                self.object_at(schema, properties(schema), depth, mode)
            }
            SchemaKind::Untyped => placeholder_string(field, mode),
        }
    }

    fn object_at(
        &self,
        schema: &Value,
        props: Option<&Map<String, Value>>,
        depth: usize,
        mode: Mode,
    ) -> Value {
        let mut obj = Map::new();
        for (name, prop) in props.into_iter().flatten() {
            obj.insert(name.clone(), self.value_at(prop, Some(name.as_str()), depth + 1, mode));
        }
        if mode == Mode::Sample {
            fill_required(&mut obj, required_names(schema));
        }
        Value::Object(obj)
    }
}

fn placeholder_string(field: Option<&str>, mode: Mode) -> Value {
    match (mode, field) {
        (Mode::Sample, Some(name)) => Value::String(format!("sample_{}", name)),
        _ => Value::String(PLACEHOLDER.to_string()),
    }
}

fn fill_required<'n>(obj: &mut Map<String, Value>, names: impl Iterator<Item = &'n str>) {
    for name in names {
        if !obj.contains_key(name) {
            obj.insert(name.to_string(), Value::String(format!("sample_{}", name)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_prefers_enum_over_ref() {
        let schema = json!({"enum": ["x"], "$ref": "#/definitions/A"});
        assert_eq!(SchemaKind::of(&schema), SchemaKind::Enum(&json!("x")));
    }

    #[test]
    fn empty_enum_falls_through_to_type() {
        let schema = json!({"enum": [], "type": "integer"});
        assert_eq!(SchemaKind::of(&schema), SchemaKind::Integer);
    }

    #[test]
    fn resolve_uses_last_segment() {
        let registry = json!({"User": {"type": "string"}});
        let synth = Synthesizer::new(registry.as_object());
        assert!(synth.resolve("#/components/schemas/User").is_some());
        assert!(synth.resolve("#/definitions/User").is_some());
        assert!(synth.resolve("#/definitions/Nope").is_none());
    }
}
