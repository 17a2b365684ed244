use crate::common::{Value, DOC_ID, OP_IN};
use crate::document::Document;
use crate::errors::DocmodResult;

/// The caller's target-document selection, before normalization.
///
/// A session accepts three input shapes: a single identifier, several
/// identifiers, or an explicit filter document. [`SelectionInput::resolve`]
/// collapses all three into one criteria document usable by the store driver.
///
/// # Examples
///
/// ```rust,ignore
/// use docmod::criteria::SelectionInput;
/// use docmod::doc;
///
/// let one = SelectionInput::id(42).resolve()?;          // {_id: 42}
/// let many = SelectionInput::ids(vec![1, 2]).resolve()?; // {_id: {$in: [1, 2]}}
/// let raw = SelectionInput::filter(doc!{ title: "Home" }).resolve()?; // verbatim
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum SelectionInput {
    /// A single document identifier.
    Id(Value),
    /// Two or more document identifiers (a single element behaves like [SelectionInput::Id]).
    Ids(Vec<Value>),
    /// An explicit filter document, passed through verbatim.
    Filter(Document),
}

impl SelectionInput {
    /// Selects one document by its identifier.
    pub fn id<T: Into<Value>>(id: T) -> Self {
        SelectionInput::Id(id.into())
    }

    /// Selects several documents by their identifiers.
    pub fn ids<T: Into<Value>>(ids: Vec<T>) -> Self {
        SelectionInput::Ids(ids.into_iter().map(Into::into).collect())
    }

    /// Selects documents by an explicit filter document.
    pub fn filter(filter: Document) -> Self {
        SelectionInput::Filter(filter)
    }

    /// Normalizes this input into a selection criteria document.
    ///
    /// - An explicit filter is returned unchanged; it is assumed to already
    ///   be a valid filter.
    /// - Exactly one identifier produces `{_id: id}`.
    /// - More than one identifier produces `{_id: {$in: [ids...]}}`.
    ///
    /// No validation of identifier types is performed at this layer; type
    /// validity is the store driver's concern. Pure function of its input.
    pub fn resolve(self) -> DocmodResult<Document> {
        match self {
            SelectionInput::Filter(filter) => Ok(filter),
            SelectionInput::Id(id) => {
                let mut criteria = Document::new();
                criteria.put(DOC_ID, id)?;
                Ok(criteria)
            }
            SelectionInput::Ids(mut ids) => {
                let mut criteria = Document::new();
                if ids.len() == 1 {
                    criteria.put(DOC_ID, ids.remove(0))?;
                } else {
                    let mut constraint = Document::new();
                    constraint.put(OP_IN, Value::Array(ids))?;
                    criteria.put(DOC_ID, constraint)?;
                }
                Ok(criteria)
            }
        }
    }
}

impl From<Document> for SelectionInput {
    fn from(filter: Document) -> Self {
        SelectionInput::Filter(filter)
    }
}

impl From<Value> for SelectionInput {
    fn from(id: Value) -> Self {
        SelectionInput::Id(id)
    }
}

impl From<Vec<Value>> for SelectionInput {
    fn from(ids: Vec<Value>) -> Self {
        SelectionInput::Ids(ids)
    }
}
