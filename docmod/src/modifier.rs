use crate::common::{
    Value, OP_ADD_TO_SET, OP_INC, OP_POP, OP_PULL, OP_PULL_ALL, OP_PUSH, OP_PUSH_ALL, OP_SET,
    OP_UNSET, UNSET_MARKER,
};
use crate::document::Document;
use crate::errors::{DocmodError, DocmodResult, ErrorKind};
use crate::schema::{coerce_field, SchemaProvider};

/// The modifier accumulator for one bulk update session.
///
/// A `BulkModifier` receives one operation at a time and folds it into a
/// growing operator document, keyed by operator name. Same-kind operations
/// merge field by field: a later call's value wins for a repeated field,
/// while fields from earlier calls to the same operator all survive. The
/// accumulator never talks to the store itself; persistence happens only
/// through the session's final driver call.
///
/// # Examples
///
/// ```rust,ignore
/// use docmod::doc;
/// use docmod::modifier::BulkModifier;
/// use docmod::schema::FieldSchema;
///
/// let schema = FieldSchema::empty();
/// let mut modifier = BulkModifier::new(&schema);
/// modifier.increment(doc!{ day_count: 1 })?;
/// modifier.increment(doc!{ week_count: 2 })?;
/// modifier.set(doc!{ author: "quentin" })?;
/// // => {$inc: {day_count: 1, week_count: 2}, $set: {author: "quentin"}}
/// let update = modifier.into_modifiers();
/// ```
pub struct BulkModifier<'a> {
    schema: &'a dyn SchemaProvider,
    modifiers: Document,
}

impl<'a> BulkModifier<'a> {
    /// Creates an empty accumulator bound to the schema collaborator.
    pub fn new(schema: &'a dyn SchemaProvider) -> Self {
        BulkModifier {
            schema,
            modifiers: Document::new(),
        }
    }

    /// Adds each field's delta under `$inc`. Values are added as given; the
    /// caller is responsible for sign.
    pub fn increment(&mut self, fields: Document) -> DocmodResult<()> {
        self.merge(OP_INC, fields)
    }

    /// Subtracts each field's magnitude under `$inc`, sharing the operator
    /// bucket with [BulkModifier::increment].
    ///
    /// The delta is always `-|magnitude|`: a decrement decreases the field
    /// whether the caller passes a positive or a negative number.
    pub fn decrement(&mut self, fields: Document) -> DocmodResult<()> {
        let mut deltas = Document::new();
        for (field, value) in fields.iter() {
            deltas.put(field, negated_magnitude(field, value)?)?;
        }
        self.merge(OP_INC, deltas)
    }

    /// Assigns each field's value under `$set`.
    ///
    /// Every field is routed through the schema's coercion gate first:
    /// declared fields are rewritten by their coercion function, unknown
    /// fields pass through unchanged. A coercion failure propagates and
    /// leaves the accumulator untouched.
    pub fn set(&mut self, fields: Document) -> DocmodResult<()> {
        let mut coerced = Document::new();
        for (field, value) in fields.iter() {
            coerced.put(field, coerce_field(self.schema, field, value.clone())?)?;
        }
        self.merge(OP_SET, coerced)
    }

    /// Marks each named field for removal under `$unset`.
    pub fn unset(&mut self, fields: &[&str]) -> DocmodResult<()> {
        let mut markers = Document::new();
        for field in fields {
            markers.put(*field, UNSET_MARKER)?;
        }
        self.merge(OP_UNSET, markers)
    }

    /// Appends each field's value to its array under `$push`.
    pub fn push(&mut self, fields: Document) -> DocmodResult<()> {
        self.merge(OP_PUSH, fields)
    }

    /// Appends each field's list of values to its array under `$pushAll`.
    pub fn push_all(&mut self, fields: Document) -> DocmodResult<()> {
        self.merge(OP_PUSH_ALL, fields)
    }

    /// Appends each field's value to its array under `$addToSet`, unless
    /// already present.
    pub fn add_to_set(&mut self, fields: Document) -> DocmodResult<()> {
        self.merge(OP_ADD_TO_SET, fields)
    }

    /// Alias of [BulkModifier::add_to_set].
    pub fn push_uniq(&mut self, fields: Document) -> DocmodResult<()> {
        self.add_to_set(fields)
    }

    /// Removes each field's value from its array under `$pull`.
    pub fn pull(&mut self, fields: Document) -> DocmodResult<()> {
        self.merge(OP_PULL, fields)
    }

    /// Removes each field's list of values from its array under `$pullAll`.
    pub fn pull_all(&mut self, fields: Document) -> DocmodResult<()> {
        self.merge(OP_PULL_ALL, fields)
    }

    /// Removes the first (`-1`) or last (`1`) element of each field's array
    /// under `$pop`.
    pub fn pop(&mut self, fields: Document) -> DocmodResult<()> {
        self.merge(OP_POP, fields)
    }

    /// The accumulated operator document so far.
    pub fn modifiers(&self) -> &Document {
        &self.modifiers
    }

    /// Freezes the accumulator and hands back the merged operator document.
    pub fn into_modifiers(self) -> Document {
        self.modifiers
    }

    /// Folds an incoming field map into the operator's bucket.
    ///
    /// The overlay is explicit and per-field: an operator already present
    /// keeps every previously recorded field that the incoming map does not
    /// repeat, and the incoming value wins on a repeated field. A wholesale
    /// reassignment of the bucket would drop earlier entries.
    fn merge(&mut self, operator: &str, incoming: Document) -> DocmodResult<()> {
        let merged = match self.modifiers.get(operator) {
            Value::Document(existing) => {
                let mut merged = existing;
                for (field, value) in incoming.iter() {
                    merged.put(field, value.clone())?;
                }
                merged
            }
            _ => incoming,
        };
        self.modifiers.put(operator, merged)
    }
}

/// Derives the sign-normalized delta for one decrement field.
fn negated_magnitude(field: &str, value: &Value) -> DocmodResult<Value> {
    match value {
        // saturating_abs keeps i32::MIN / i64::MIN from overflowing
        Value::I32(v) => Ok(Value::I32(-v.saturating_abs())),
        Value::I64(v) => Ok(Value::I64(-v.saturating_abs())),
        Value::U64(v) => Ok(Value::I64(-(i64::try_from(*v).unwrap_or(i64::MAX)))),
        Value::F64(v) => Ok(Value::F64(-v.abs())),
        other => {
            log::error!(
                "Decrement magnitude for field '{}' must be numeric, got {}",
                field,
                other
            );
            Err(DocmodError::new(
                &format!("Decrement magnitude for field '{}' must be numeric", field),
                ErrorKind::InvalidDataType,
            ))
        }
    }
}
