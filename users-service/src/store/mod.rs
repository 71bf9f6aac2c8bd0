//! Document store adapter
//!
//! The service talks to its collection only through [`DocumentStore`]. A
//! document is a JSON object whose `_id` field holds the 24-character hex
//! form of an [`ObjectId`]; the store assigns it on insert.
//!
//! [`MemoryCollection`] is the bundled implementation. It keeps documents in
//! insertion order, which is the natural order reported by unsorted finds.

mod error;
mod filter;
mod memory;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::ids::ObjectId;

pub use error::{StoreError, StoreErrorKind, StoreOperation};
pub use filter::{
    compare_documents, DocumentMatcher, FilterCondition, FilterOperator, FindOptions,
    OrderDirection,
};
pub use memory::MemoryCollection;

/// A stored document
pub type Document = Map<String, Value>;

/// Field holding the store-assigned identifier
pub const ID_FIELD: &str = "_id";

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Opaque collection supporting the operations the service needs
///
/// Each method is one round trip. Implementations must be safe to share
/// across tasks.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document, returning the identifier the store assigned
    ///
    /// Any `_id` already present in `document` is replaced.
    async fn insert(&self, document: Document) -> StoreResult<ObjectId>;

    /// Documents matching every condition, after sort, skip and limit
    async fn find(
        &self,
        filter: &[FilterCondition],
        options: FindOptions,
    ) -> StoreResult<Vec<Document>>;

    /// Number of documents matching every condition
    async fn count(&self, filter: &[FilterCondition]) -> StoreResult<u64>;

    /// The document with the given id, if any
    async fn find_by_id(&self, id: &ObjectId) -> StoreResult<Option<Document>>;

    /// Overwrite the fields in `set` on the document with the given id
    ///
    /// Returns the number of documents matched (0 or 1).
    async fn update_by_id(&self, id: &ObjectId, set: Document) -> StoreResult<u64>;

    /// Remove the document with the given id
    ///
    /// Returns the number of documents deleted (0 or 1).
    async fn delete_by_id(&self, id: &ObjectId) -> StoreResult<u64>;
}
