use crate::common::DOC_ID;
use crate::criteria::SelectionInput;
use crate::document::Document;
use crate::driver::{multi, UpdateDriver, WriteResult};
use crate::errors::{DocmodError, DocmodResult, ErrorKind};
use crate::modifier::BulkModifier;
use crate::schema::SchemaProvider;

/// Orchestrates one bulk update: resolve criteria, accumulate modifiers,
/// submit once.
///
/// A session is bound to a driver and a schema collaborator. Each call to
/// [`BulkUpdateSession::run`] constructs a fresh, independent accumulator,
/// so concurrent callers each running their own session never contend on
/// engine-internal state. The single driver call at the end is the only
/// suspension point; its latency and retry behavior belong to the driver.
///
/// # Examples
///
/// ```rust,ignore
/// use docmod::doc;
/// use docmod::session::BulkUpdateSession;
///
/// let session = BulkUpdateSession::new(&driver, &schema);
/// session.run(doc!{ title: "Home" }, |m| {
///     m.unset(&["title", "tags"])?;
///     m.set(doc!{ author: "quentin" })?;
///     Ok(())
/// })?;
/// ```
pub struct BulkUpdateSession<'a, D: UpdateDriver + ?Sized> {
    driver: &'a D,
    schema: &'a dyn SchemaProvider,
}

impl<'a, D: UpdateDriver + ?Sized> BulkUpdateSession<'a, D> {
    /// Creates a session bound to the driver and schema collaborators.
    pub fn new(driver: &'a D, schema: &'a dyn SchemaProvider) -> Self {
        BulkUpdateSession { driver, schema }
    }

    /// Runs one bulk update.
    ///
    /// The selection input is resolved into criteria, the block populates a
    /// fresh [BulkModifier] with any subset of operations in any order, and
    /// the merged operator document is submitted to the driver exactly once
    /// with the all-matches flag set. Block and driver errors propagate
    /// unmodified; nothing is retried or swallowed.
    pub fn run<S, F>(&self, selection: S, block: F) -> DocmodResult<WriteResult>
    where
        S: Into<SelectionInput>,
        F: FnOnce(&mut BulkModifier) -> DocmodResult<()>,
    {
        let criteria = selection.into().resolve()?;

        let mut modifier = BulkModifier::new(self.schema);
        block(&mut modifier)?;
        let update = modifier.into_modifiers();

        log::debug!("Submitting bulk update {} for criteria {}", update, criteria);
        self.driver.update_many(&criteria, &update, &multi())
    }

    /// Runs a session scoped to one already-identified document, using the
    /// document's own `_id` value as the sole selection input.
    ///
    /// # Errors
    ///
    /// Returns [ErrorKind::NotIdentifiable] if the document has no `_id`.
    pub fn run_for<F>(&self, document: &Document, block: F) -> DocmodResult<WriteResult>
    where
        F: FnOnce(&mut BulkModifier) -> DocmodResult<()>,
    {
        let id = document.get(DOC_ID);
        if id.is_null() {
            log::error!("Document has no '{}' field to scope the update to", DOC_ID);
            return Err(DocmodError::new(
                "Document has no identifier",
                ErrorKind::NotIdentifiable,
            ));
        }
        self.run(SelectionInput::Id(id), block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Value;
    use crate::doc;
    use crate::driver::UpdateOptions;
    use crate::schema::FieldSchema;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingDriver {
        calls: Mutex<Vec<(Document, Document, UpdateOptions)>>,
    }

    impl UpdateDriver for RecordingDriver {
        fn update_many(
            &self,
            criteria: &Document,
            update: &Document,
            options: &UpdateOptions,
        ) -> DocmodResult<WriteResult> {
            self.calls
                .lock()
                .push((criteria.clone(), update.clone(), options.clone()));
            Ok(WriteResult::new(vec![Value::from(1)]))
        }
    }

    struct FailingDriver;

    impl UpdateDriver for FailingDriver {
        fn update_many(
            &self,
            _criteria: &Document,
            _update: &Document,
            _options: &UpdateOptions,
        ) -> DocmodResult<WriteResult> {
            Err(DocmodError::new("store unreachable", ErrorKind::BackendError))
        }
    }

    #[test]
    fn test_run_submits_exactly_once_with_multi() {
        let driver = RecordingDriver::default();
        let schema = FieldSchema::empty();
        let session = BulkUpdateSession::new(&driver, &schema);

        session
            .run(doc! { title: "Home" }, |m| {
                m.increment(doc! { day_count: 1 })?;
                m.set(doc! { author: "q" })?;
                Ok(())
            })
            .unwrap();

        let calls = driver.calls.lock();
        assert_eq!(calls.len(), 1);
        let (criteria, update, options) = &calls[0];
        assert_eq!(criteria, &doc! { title: "Home" });
        assert_eq!(
            update,
            &doc! { "$inc": { day_count: 1 }, "$set": { author: "q" } }
        );
        assert!(options.is_multi());
        assert!(!options.is_insert_if_absent());
    }

    #[test]
    fn test_run_with_empty_block_submits_empty_update() {
        let driver = RecordingDriver::default();
        let schema = FieldSchema::empty();
        let session = BulkUpdateSession::new(&driver, &schema);

        session.run(SelectionInput::id(1), |_| Ok(())).unwrap();

        let calls = driver.calls.lock();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].1.is_empty());
    }

    #[test]
    fn test_block_error_skips_driver_call() {
        let driver = RecordingDriver::default();
        let schema = FieldSchema::empty();
        let session = BulkUpdateSession::new(&driver, &schema);

        let result = session.run(SelectionInput::id(1), |m| {
            m.decrement(doc! { count: "oops" })
        });

        assert_eq!(result.unwrap_err().kind(), &ErrorKind::InvalidDataType);
        assert!(driver.calls.lock().is_empty());
    }

    #[test]
    fn test_driver_error_propagates_unmodified() {
        let driver = FailingDriver;
        let schema = FieldSchema::empty();
        let session = BulkUpdateSession::new(&driver, &schema);

        let result = session.run(SelectionInput::id(1), |m| m.increment(doc! { n: 1 }));

        let error = result.unwrap_err();
        assert_eq!(error.kind(), &ErrorKind::BackendError);
        assert_eq!(error.message(), "store unreachable");
    }

    #[test]
    fn test_run_for_uses_document_id() {
        let driver = RecordingDriver::default();
        let schema = FieldSchema::empty();
        let session = BulkUpdateSession::new(&driver, &schema);

        let page = doc! { "_id": 42, title: "Home" };
        session
            .run_for(&page, |m| m.set(doc! { author: "q" }))
            .unwrap();

        let calls = driver.calls.lock();
        assert_eq!(calls[0].0, doc! { "_id": 42 });
        assert!(calls[0].2.is_multi());
    }

    #[test]
    fn test_run_for_without_id_fails() {
        let driver = RecordingDriver::default();
        let schema = FieldSchema::empty();
        let session = BulkUpdateSession::new(&driver, &schema);

        let page = doc! { title: "Home" };
        let result = session.run_for(&page, |_| Ok(()));

        assert_eq!(result.unwrap_err().kind(), &ErrorKind::NotIdentifiable);
        assert!(driver.calls.lock().is_empty());
    }
}
