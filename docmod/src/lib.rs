//! # Docmod - Bulk Modifier Engine for Document Stores
//!
//! Docmod compiles a short sequence of named update operations (increment,
//! decrement, set, unset, push, pull, pop and friends) into one consolidated
//! update command, executed exactly once against a document store through a
//! pluggable driver.
//!
//! ## Key Features
//!
//! - **Modifier merging**: repeated operations of the same kind fold into a
//!   single operator payload, field by field, without losing earlier entries
//! - **Criteria resolution**: a single identifier, several identifiers, or an
//!   explicit filter document all normalize into one selection criteria
//! - **Schema-aware coercion**: `set` values pass through the schema's
//!   per-field coercion functions before the payload is finalized
//! - **Driver seam**: the store itself stays behind the [`driver::UpdateDriver`]
//!   trait; the engine only hands over a finished (criteria, update) pair
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docmod::doc;
//! use docmod::schema::FieldSchema;
//! use docmod::session::BulkUpdateSession;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = FieldSchema::empty();
//! let session = BulkUpdateSession::new(&driver, &schema);
//!
//! // All pages titled "Home" get their counters bumped and a new author.
//! session.run(doc!{ "title": "Home" }, |m| {
//!     m.increment(doc!{ "day_count": 1, "week_count": 2 })?;
//!     m.set(doc!{ "author": "quentin" })?;
//!     Ok(())
//! })?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`common`] - `Value` data model, constants, and type utilities
//! - [`criteria`] - Selection input normalization
//! - [`document`] - Ordered document map and the `doc!` macro
//! - [`driver`] - Store driver trait, update options, and write results
//! - [`errors`] - Error types and result definitions
//! - [`modifier`] - The modifier accumulator and merge algorithm
//! - [`schema`] - Schema collaborator trait and field coercion gate
//! - [`session`] - One-shot bulk update orchestration

pub mod common;
pub mod criteria;
pub mod document;
pub mod driver;
pub mod errors;
pub mod modifier;
pub mod schema;
pub mod session;
