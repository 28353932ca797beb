// OpenAPI/Swagger operation extraction for apirecon
// Walks paths -> methods -> operation objects of a decoded document

use crate::models::{
    ApiDocument, BodyEncoding, Method, Operation, Parameter, ParameterLocation, RequestBody,
};
use log::debug;
use serde_json::Value;

// Preference order when an operation offers several request media types
const BODY_MEDIA_TYPES: &[(&str, BodyEncoding)] = &[
    ("application/json", BodyEncoding::Json),
    ("application/x-www-form-urlencoded", BodyEncoding::FormUrlEncoded),
    ("multipart/form-data", BodyEncoding::Multipart),
];

pub struct OpenApiParser;

impl OpenApiParser {
    /// Extract every operation on a recognised HTTP verb, in declaration order.
    ///
    /// Keys that are not verbs (`parameters`, `summary`, `x-*`) are skipped, as
    /// are operation entries that are not objects.
    pub fn operations(doc: &ApiDocument) -> Vec<Operation> {
        let mut operations = Vec::new();
        let paths = match doc.paths() {
            Some(p) => p,
            None => return operations,
        };

        for (path, path_item) in paths {
            let methods = match path_item.as_object() {
                Some(m) => m,
                None => continue,
            };
            let path_level_params = path_item.get("parameters").and_then(|p| p.as_array());

            for (method, details) in methods {
                let method_enum = match method.parse::<Method>() {
                    Ok(m) => m,
                    Err(_) => continue,
                };
                if !details.is_object() {
                    debug!("skipping {} {}: operation is not an object", method, path);
                    continue;
                }

                let parameters =
                    OpenApiParser::collect_parameters(doc, details, path_level_params);
                let request_body = OpenApiParser::request_body(doc, details, &parameters);

                operations.push(Operation {
                    method: method_enum,
                    path: path.clone(),
                    operation_id: details
                        .get("operationId")
                        .and_then(|s| s.as_str())
                        .map(|s| s.to_string()),
                    summary: details
                        .get("summary")
                        .and_then(|s| s.as_str())
                        .map(|s| s.to_string()),
                    security: details.get("security").filter(|s| !s.is_null()).map(|s| match s.as_array() {
                        Some(arr) => arr.clone(),
                        // a non-list `security` still declares something
                        None => vec![s.clone()],
                    }),
                    parameters,
                    request_body,
                });
            }
        }
        operations
    }

    /// Resolve local JSON Pointer refs like "#/components/schemas/Foo"
    pub fn resolve_local_ref<'a>(root: &'a Value, reference: &str) -> Option<&'a Value> {
        let pointer = reference.strip_prefix('#')?;
        if pointer.is_empty() {
            return Some(root);
        }
        if !pointer.starts_with('/') {
            return None;
        }
        let mut cur = root;
        for part in pointer[1..].split('/') {
            let part = part.replace("~1", "/").replace("~0", "~");
            cur = match cur {
                Value::Array(arr) => arr.get(part.parse::<usize>().ok()?)?,
                _ => cur.get(&part)?,
            };
        }
        Some(cur)
    }

    // Follows `$ref` on a parameter or request body object; unresolvable refs yield None
    fn deref<'a>(doc: &'a ApiDocument, value: &'a Value) -> Option<&'a Value> {
        match value.get("$ref").and_then(|r| r.as_str()) {
            Some(r) => OpenApiParser::resolve_local_ref(doc.root(), r),
            None => Some(value),
        }
    }

    fn parse_parameter(doc: &ApiDocument, raw: &Value) -> Option<Parameter> {
        let p = OpenApiParser::deref(doc, raw)?;
        let name = p.get("name")?.as_str()?.to_string();
        let location = ParameterLocation::parse(p.get("in")?.as_str()?)?;
        let required = p
            .get("required")
            .and_then(|r| r.as_bool())
            .unwrap_or(location == ParameterLocation::Path);
        let schema = match p.get("schema") {
            Some(s) => s.clone(),
            None => p.clone(),
        };
        Some(Parameter {
            name,
            location,
            required,
            schema,
        })
    }

    // Operation-level parameters override path-level ones with the same name and location
    fn collect_parameters(
        doc: &ApiDocument,
        details: &Value,
        path_level: Option<&Vec<Value>>,
    ) -> Vec<Parameter> {
        let mut params: Vec<Parameter> = details
            .get("parameters")
            .and_then(|p| p.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|p| OpenApiParser::parse_parameter(doc, p))
                    .collect()
            })
            .unwrap_or_default();

        if let Some(shared) = path_level {
            for p in shared.iter().filter_map(|p| OpenApiParser::parse_parameter(doc, p)) {
                let overridden = params
                    .iter()
                    .any(|existing| existing.name == p.name && existing.location == p.location);
                if !overridden {
                    params.push(p);
                }
            }
        }
        params
    }

    fn request_body(
        doc: &ApiDocument,
        details: &Value,
        parameters: &[Parameter],
    ) -> Option<RequestBody> {
        // v2: a single `in: body` parameter
        if let Some(body_param) = parameters
            .iter()
            .find(|p| p.location == ParameterLocation::Body)
        {
            return Some(RequestBody {
                encoding: BodyEncoding::Json,
                schema: body_param.schema.clone(),
            });
        }

        // v2: formData parameters become the properties of a form body
        let form_fields: Vec<&Parameter> = parameters
            .iter()
            .filter(|p| p.location == ParameterLocation::FormData)
            .collect();
        if !form_fields.is_empty() {
            let multipart = details
                .get("consumes")
                .and_then(|c| c.as_array())
                .map(|arr| arr.iter().any(|c| c.as_str() == Some("multipart/form-data")))
                .unwrap_or(false);
            let mut properties = serde_json::Map::new();
            let mut required = Vec::new();
            for field in form_fields {
                properties.insert(field.name.clone(), form_field_schema(&field.schema));
                if field.required {
                    required.push(Value::String(field.name.clone()));
                }
            }
            return Some(RequestBody {
                encoding: if multipart {
                    BodyEncoding::Multipart
                } else {
                    BodyEncoding::FormUrlEncoded
                },
                schema: serde_json::json!({
                    "type": "object",
                    "properties": properties,
                    "required": required,
                }),
            });
        }

        // v3: requestBody.content, possibly behind a $ref
        let rb = OpenApiParser::deref(doc, details.get("requestBody")?)?;
        let content = rb.get("content")?.as_object()?;
        for (media_type, encoding) in BODY_MEDIA_TYPES {
            if let Some(media) = content.get(*media_type) {
                return Some(RequestBody {
                    encoding: *encoding,
                    schema: media.get("schema").cloned().unwrap_or(Value::Null),
                });
            }
        }
        // anything else (application/xml, text/plain, vendor json) is sampled as JSON
        let (media_type, media) = content.iter().next()?;
        debug!("rendering unsupported media type {} as JSON", media_type);
        Some(RequestBody {
            encoding: BodyEncoding::Json,
            schema: media.get("schema").cloned().unwrap_or(Value::Null),
        })
    }
}

// A v2 formData parameter doubles as its own schema; drop the parameter-only keys
// so a boolean `required` is not mistaken for a schema's required list
fn form_field_schema(param: &Value) -> Value {
    match param.as_object() {
        Some(obj) => Value::Object(
            obj.iter()
                .filter(|(k, _)| !matches!(k.as_str(), "name" | "in" | "required"))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        None => param.clone(),
    }
}
