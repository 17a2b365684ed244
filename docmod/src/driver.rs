use crate::common::Value;
use crate::document::Document;
use crate::errors::DocmodResult;

/// Options for controlling update operations handed to the store driver.
///
/// # Examples
///
/// ```rust,ignore
/// use docmod::driver::UpdateOptions;
///
/// // Affect every matching document (what sessions always use)
/// let options = UpdateOptions::multi();
///
/// // Custom options
/// let options = UpdateOptions::new(true, true);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    multi: bool,
    insert_if_absent: bool,
}

impl UpdateOptions {
    /// Creates a new `UpdateOptions` with specified behavior.
    ///
    /// # Arguments
    ///
    /// * `multi` - If true, apply the update to every matching document
    /// * `insert_if_absent` - If true, insert the update as a new document if no matches found
    pub fn new(multi: bool, insert_if_absent: bool) -> Self {
        Self {
            multi,
            insert_if_absent,
        }
    }

    /// Returns whether the update applies to every matching document.
    pub fn is_multi(&self) -> bool {
        self.multi
    }

    /// Returns whether to insert if no matching documents are found.
    pub fn is_insert_if_absent(&self) -> bool {
        self.insert_if_absent
    }
}

/// Creates `UpdateOptions` that affect every matching document.
pub fn multi() -> UpdateOptions {
    UpdateOptions::new(true, false)
}

/// The result of an update operation.
///
/// `WriteResult` carries the identifiers of the documents the store reports
/// as affected, allowing callers to track which documents were modified.
#[derive(Debug)]
pub struct WriteResult {
    affected_ids: Vec<Value>,
}

impl WriteResult {
    /// Creates a new `WriteResult` with the specified affected identifiers.
    pub fn new(affected_ids: Vec<Value>) -> Self {
        Self { affected_ids }
    }

    /// Gets the identifiers affected by the update operation.
    pub fn affected_ids(&self) -> &Vec<Value> {
        &self.affected_ids
    }

    /// Number of documents the store reports as affected.
    pub fn affected_count(&self) -> usize {
        self.affected_ids.len()
    }
}

impl Iterator for WriteResult {
    type Item = Value;

    fn next(&mut self) -> Option<Self::Item> {
        self.affected_ids.pop()
    }
}

/// The external store collaborator.
///
/// The engine compiles a session into one finished (criteria, update) pair
/// and hands it to this trait exactly once. Wire protocol, retries, and
/// atomicity guarantees all belong to the implementation; engine-side
/// failures are never translated, retried, or swallowed.
pub trait UpdateDriver {
    /// Applies the merged operator document to documents matching the
    /// criteria. Sessions always pass options with the multi flag set, even
    /// when the criteria resolves to exactly one identifier.
    fn update_many(
        &self,
        criteria: &Document,
        update: &Document,
        options: &UpdateOptions,
    ) -> DocmodResult<WriteResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_options_new() {
        let options = UpdateOptions::new(true, false);
        assert!(options.is_multi());
        assert!(!options.is_insert_if_absent());

        let options = UpdateOptions::new(false, true);
        assert!(!options.is_multi());
        assert!(options.is_insert_if_absent());
    }

    #[test]
    fn test_update_options_default() {
        let options = UpdateOptions::default();
        assert!(!options.is_multi());
        assert!(!options.is_insert_if_absent());
    }

    #[test]
    fn test_multi() {
        let options = multi();
        assert!(options.is_multi());
        assert!(!options.is_insert_if_absent());
    }

    #[test]
    fn test_write_result_new() {
        let ids = vec![Value::from(1), Value::from(2)];
        let write_result = WriteResult::new(ids.clone());
        assert_eq!(write_result.affected_ids(), &ids);
        assert_eq!(write_result.affected_count(), 2);
    }

    #[test]
    fn test_write_result_iterator() {
        let write_result = WriteResult::new(vec![Value::from("a"), Value::from("b")]);
        let drained: Vec<Value> = write_result.collect();
        assert_eq!(drained, vec![Value::from("b"), Value::from("a")]);
    }
}
