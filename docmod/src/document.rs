use im::OrdMap;
use itertools::Itertools;
use smallvec::SmallVec;

use crate::common::Value;
use crate::errors::{DocmodResult, DocmodError, ErrorKind};
use std::fmt::{Debug, Display};

type FieldVec = SmallVec<[String; 8]>;

/// An ordered map of field names to [Value]s, using a lock-free persistent
/// data structure.
///
/// A document is the engine's universal payload shape: selection criteria,
/// per-operator field-update maps, and the final merged operator document are
/// all `Document`s. The key is always a [String] and the value is a [Value].
///
/// ## Lock-Free Design
///
/// This struct uses `im::OrdMap` (a persistent ordered map):
/// - O(1) cloning via internal Arc sharing
/// - Mutations create new maps via structural sharing
/// - Each mutated document is completely independent
#[derive(Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    data: OrdMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let doc = Document::new();
    /// assert!(doc.is_empty());
    /// assert_eq!(doc.size(), 0);
    /// ```
    pub fn new() -> Self {
        Document {
            data: OrdMap::new(),
        }
    }

    /// Checks if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Associates the specified [Value] with the specified key in this
    /// document. If the key already exists, its value is replaced.
    ///
    /// # Arguments
    ///
    /// * `key` - The field name. Cannot be empty.
    /// * `value` - Any type that implements `Into<Value>` (primitives,
    ///   strings, documents, arrays, etc.).
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let mut doc = Document::new();
    /// doc.put("name", "Alice")?;
    /// doc.put("age", 30)?;
    /// assert_eq!(doc.size(), 2);
    /// ```
    pub fn put<T: Into<Value>>(&mut self, key: impl AsRef<str>, value: T) -> DocmodResult<()> {
        let key = key.as_ref();
        // key cannot be empty
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(DocmodError::new(
                "Document does not support empty key",
                ErrorKind::InvalidOperation,
            ));
        }

        self.data = self.data.update(key.to_string(), value.into());
        Ok(())
    }

    /// Returns the [Value] to which the specified key is associated, or
    /// [Value::Null] if this document contains no mapping for the key.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let doc = doc!{ "name": "Alice", "age": 30 };
    /// assert_eq!(doc.get("name"), Value::String("Alice".to_string()));
    /// assert_eq!(doc.get("missing"), Value::Null);
    /// ```
    pub fn get(&self, key: &str) -> Value {
        match self.data.get(key) {
            Some(value) => value.clone(),
            None => Value::Null,
        }
    }

    /// Checks whether the document contains a mapping for the key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Removes the mapping for the key from this document if present.
    pub fn remove(&mut self, key: &str) {
        self.data = self.data.without(key);
    }

    /// Returns the number of fields in this document.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Returns the field names of this document in sorted order.
    pub fn fields(&self) -> FieldVec {
        self.data.keys().cloned().collect()
    }

    /// Iterates over the `(field, value)` entries in sorted field order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.data
                .iter()
                .map(|(key, value)| format!("{:?}: {}", key, value))
                .join(", ")
        )
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

/// Strips the surrounding quotes that `stringify!` leaves on string-literal
/// keys in the [`doc!`](crate::doc) macro.
pub fn normalize(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Creates a [Document] with JSON-like syntax.
///
/// # Examples
///
/// ```rust
/// use docmod::doc;
///
/// // Empty document
/// let empty = doc!{};
///
/// // Identifier or string-literal keys
/// let page = doc!{
///     title: "Home",
///     "day_count": 1
/// };
///
/// // Nested documents and arrays
/// let update = doc!{
///     "$set": { author: "quentin" },
///     "$pushAll": { tags: ["foo", "bar"] }
/// };
/// ```
#[macro_export]
macro_rules! doc {
    // match an empty document
    () => {
        $crate::document::Document::new()
    };

    // match a document with key value pairs
    ($($key:tt : $value:tt),* $(,)?) => {
        {
            #[allow(unused_imports)]
            use $crate::doc_value;

            let mut doc = $crate::document::Document::new();
            $(
                doc.put(&$crate::document::normalize(stringify!($key)), $crate::doc_value!($value))
                .expect(&format!("Failed to put value {} in document", stringify!($value)));
            )*
            doc
        }
    };
}

/// Helper macro to convert values for the [`doc!`](crate::doc) macro.
/// Handles nested documents, arrays, and expressions.
#[macro_export]
macro_rules! doc_value {
    // match a nested document
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        {
            $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
        }
    };

    // match an array of values
    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    // match an expression (variable, function call, literal, etc.)
    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("\"ABC\""), "ABC");
        assert_eq!(normalize("ABC"), "ABC");
    }

    #[test]
    fn test_new_is_empty() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.size(), 0);
    }

    #[test]
    fn test_put_and_get() {
        let mut doc = Document::new();
        doc.put("name", "Alice").unwrap();
        doc.put("age", 30).unwrap();

        assert_eq!(doc.size(), 2);
        assert_eq!(doc.get("name"), Value::from("Alice"));
        assert_eq!(doc.get("age"), Value::I32(30));
        assert_eq!(doc.get("missing"), Value::Null);
    }

    #[test]
    fn test_put_empty_key_fails() {
        let mut doc = Document::new();
        let result = doc.put("", 1);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().kind(),
            &ErrorKind::InvalidOperation
        );
    }

    #[test]
    fn test_put_overwrites_existing_key() {
        let mut doc = doc! { status: "inactive" };
        doc.put("status", "active").unwrap();
        assert_eq!(doc.get("status"), Value::from("active"));
        assert_eq!(doc.size(), 1);
    }

    #[test]
    fn test_contains_key_and_remove() {
        let mut doc = doc! { a: 1, b: 2 };
        assert!(doc.contains_key("a"));
        doc.remove("a");
        assert!(!doc.contains_key("a"));
        assert_eq!(doc.size(), 1);
    }

    #[test]
    fn test_fields_sorted() {
        let doc = doc! { b: 2, a: 1, c: 3 };
        let fields = doc.fields();
        assert_eq!(fields.as_slice(), ["a", "b", "c"]);
    }

    #[test]
    fn test_doc_macro_nested() {
        let doc = doc! {
            "$set": { author: "quentin" },
            "$pushAll": { tags: ["foo", "bar"] }
        };

        let set = doc.get("$set");
        let set = set.as_document().unwrap();
        assert_eq!(set.get("author"), Value::from("quentin"));

        let push_all = doc.get("$pushAll");
        let tags = push_all.as_document().unwrap().get("tags");
        assert_eq!(tags, Value::from(vec!["foo", "bar"]));
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let a = doc! { x: 1, y: 2 };
        let b = doc! { y: 2, x: 1 };
        assert_eq!(a, b);
    }

    #[test]
    fn test_display() {
        let doc = doc! { a: 1 };
        assert_eq!(doc.to_string(), "{\"a\": 1}");
    }
}
