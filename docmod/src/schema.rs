use crate::common::Value;
use crate::errors::DocmodResult;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// A coercion function rewrites a caller-supplied value into the canonical
/// representation required by a declared field.
pub type CoercionFn = Arc<dyn Fn(Value) -> DocmodResult<Value> + Send + Sync>;

/// Read-only view of a document type's declared fields.
///
/// The engine consults the schema only on the `set` path; every other
/// operator bypasses coercion entirely. Fields may have independent,
/// field-specific coercion rules with no shared base type, so the schema is
/// a capability lookup rather than a type hierarchy.
pub trait SchemaProvider {
    /// Checks whether the schema declares a field with this name.
    fn has_field(&self, name: &str) -> bool;

    /// Applies the declared field's coercion function to the value.
    ///
    /// Undeclared fields pass the value through unchanged; a declared
    /// field's coercion function may reject the value, and that error
    /// propagates unmodified.
    fn coerce(&self, name: &str, value: Value) -> DocmodResult<Value>;
}

/// A field registry mapping declared field names to coercion functions.
///
/// # Examples
///
/// ```rust,ignore
/// use docmod::common::Value;
/// use docmod::schema::FieldSchema;
///
/// let schema = FieldSchema::empty()
///     .with_field("title", |value| Ok(Value::String(value.to_string())));
/// assert!(schema.has_field("title"));
/// ```
#[derive(Clone, Default)]
pub struct FieldSchema {
    coercions: BTreeMap<String, CoercionFn>,
}

impl FieldSchema {
    /// Creates a schema that declares no fields; every value passes through
    /// the coercion gate unchanged.
    pub fn empty() -> Self {
        FieldSchema {
            coercions: BTreeMap::new(),
        }
    }

    /// Declares a field with its coercion function.
    pub fn with_field<F>(mut self, name: &str, coercion: F) -> Self
    where
        F: Fn(Value) -> DocmodResult<Value> + Send + Sync + 'static,
    {
        self.coercions.insert(name.to_string(), Arc::new(coercion));
        self
    }

    /// Returns the declared field names in sorted order.
    pub fn declared_fields(&self) -> SmallVec<[String; 8]> {
        self.coercions.keys().cloned().collect()
    }
}

impl Debug for FieldSchema {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSchema")
            .field("declared_fields", &self.declared_fields())
            .finish()
    }
}

impl SchemaProvider for FieldSchema {
    fn has_field(&self, name: &str) -> bool {
        self.coercions.contains_key(name)
    }

    fn coerce(&self, name: &str, value: Value) -> DocmodResult<Value> {
        match self.coercions.get(name) {
            Some(coercion) => coercion(value),
            None => Ok(value),
        }
    }
}

/// The coercion gate for `set` payloads.
///
/// If the schema declares `name`, the value is rewritten by that field's
/// coercion function; otherwise it passes through unchanged and no error is
/// raised. Applied independently to every field of a `set` call's payload,
/// since different fields may have different or no coercion rules.
pub fn coerce_field(
    schema: &dyn SchemaProvider,
    name: &str,
    value: Value,
) -> DocmodResult<Value> {
    if schema.has_field(name) {
        schema.coerce(name, value)
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{DocmodError, ErrorKind};

    fn stringifying_schema() -> FieldSchema {
        FieldSchema::empty().with_field("title", |value| {
            Ok(Value::String(match value {
                Value::String(s) => s,
                other => other.to_string(),
            }))
        })
    }

    #[test]
    fn test_empty_schema_declares_nothing() {
        let schema = FieldSchema::empty();
        assert!(!schema.has_field("anything"));
        assert!(schema.declared_fields().is_empty());
    }

    #[test]
    fn test_declared_field_is_coerced() {
        let schema = stringifying_schema();
        let coerced = coerce_field(&schema, "title", Value::I32(42)).unwrap();
        assert_eq!(coerced, Value::from("42"));
    }

    #[test]
    fn test_undeclared_field_passes_through() {
        let schema = stringifying_schema();
        let value = coerce_field(&schema, "colors", Value::from(vec!["red", "green"])).unwrap();
        assert_eq!(value, Value::from(vec!["red", "green"]));
    }

    #[test]
    fn test_coercion_failure_propagates() {
        let schema = FieldSchema::empty().with_field("count", |value| match value {
            Value::I32(_) | Value::I64(_) => Ok(value),
            _ => Err(DocmodError::new(
                "count must be an integer",
                ErrorKind::ValidationError,
            )),
        });

        let result = coerce_field(&schema, "count", Value::from("ten"));
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::ValidationError);
    }

    #[test]
    fn test_declared_fields_sorted() {
        let schema = stringifying_schema().with_field("author", |v| Ok(v));
        assert_eq!(schema.declared_fields().as_slice(), ["author", "title"]);
    }
}
