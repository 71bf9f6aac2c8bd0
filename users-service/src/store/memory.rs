//! In-process document collection

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{
    compare_documents, Document, DocumentMatcher, DocumentStore, FilterCondition, FindOptions,
    StoreError, StoreOperation, StoreResult, ID_FIELD,
};
use crate::ids::ObjectId;

/// Document collection held in memory
///
/// Documents are kept in insertion order. Sorting is stable, so documents
/// with equal sort keys keep that order.
#[derive(Debug, Default)]
pub struct MemoryCollection {
    documents: RwLock<Vec<Document>>,
}

impl MemoryCollection {
    /// Empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Whether the collection holds no documents
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    /// Store a document verbatim, bypassing id assignment
    ///
    /// Used to seed records, including malformed ones.
    pub async fn insert_raw(&self, document: Document) {
        self.documents.write().await.push(document);
    }
}

fn has_id(document: &Document, id: &str) -> bool {
    matches!(document.get(ID_FIELD), Some(Value::String(s)) if s == id)
}

fn matcher(operation: StoreOperation, filter: &[FilterCondition]) -> StoreResult<DocumentMatcher> {
    DocumentMatcher::new(filter).map_err(|e| StoreError::invalid_query(operation, e))
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

#[async_trait]
impl DocumentStore for MemoryCollection {
    async fn insert(&self, mut document: Document) -> StoreResult<ObjectId> {
        let id = ObjectId::new();
        document.insert(ID_FIELD.to_string(), Value::String(id.to_hex()));
        self.documents.write().await.push(document);
        Ok(id)
    }

    async fn find(
        &self,
        filter: &[FilterCondition],
        options: FindOptions,
    ) -> StoreResult<Vec<Document>> {
        let matcher = matcher(StoreOperation::Find, filter)?;
        let documents = self.documents.read().await;

        let mut found: Vec<&Document> = documents.iter().filter(|d| matcher.matches(d)).collect();
        if let Some((field, direction)) = &options.sort {
            found.sort_by(|a, b| compare_documents(a, b, field, *direction));
        }

        let limit = options.limit.map_or(usize::MAX, to_usize);
        Ok(found
            .into_iter()
            .skip(to_usize(options.skip))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &[FilterCondition]) -> StoreResult<u64> {
        let matcher = matcher(StoreOperation::Count, filter)?;
        let documents = self.documents.read().await;
        Ok(documents.iter().filter(|d| matcher.matches(d)).count() as u64)
    }

    async fn find_by_id(&self, id: &ObjectId) -> StoreResult<Option<Document>> {
        let id = id.to_hex();
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|d| has_id(d, &id)).cloned())
    }

    async fn update_by_id(&self, id: &ObjectId, set: Document) -> StoreResult<u64> {
        if set.contains_key(ID_FIELD) {
            return Err(StoreError::invalid_query(
                StoreOperation::Update,
                "the _id field is immutable",
            ));
        }

        let id = id.to_hex();
        let mut documents = self.documents.write().await;
        match documents.iter_mut().find(|d| has_id(d, &id)) {
            Some(document) => {
                document.extend(set);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_by_id(&self, id: &ObjectId) -> StoreResult<u64> {
        let id = id.to_hex();
        let mut documents = self.documents.write().await;
        match documents.iter().position(|d| has_id(d, &id)) {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FilterCondition, OrderDirection};
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("test documents must be objects"),
        }
    }

    async fn seeded(names: &[&str]) -> MemoryCollection {
        let store = MemoryCollection::new();
        for name in names {
            let email = format!("{}@example.com", name.to_lowercase());
            store
                .insert(doc(json!({"name": name, "email": email})))
                .await
                .unwrap();
        }
        store
    }

    fn names(documents: &[Document]) -> Vec<&str> {
        documents
            .iter()
            .map(|d| d["name"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_insert_assigns_id() {
        let store = MemoryCollection::new();
        let id = store
            .insert(doc(json!({"_id": "caller-chosen", "name": "Alice"})))
            .await
            .unwrap();

        let stored = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored[ID_FIELD], json!(id.to_hex()));
        assert_eq!(stored["name"], "Alice");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_find_natural_order() {
        let store = seeded(&["Carol", "Alice", "Bob"]).await;
        let all = store.find(&[], FindOptions::default()).await.unwrap();
        assert_eq!(names(&all), ["Carol", "Alice", "Bob"]);
    }

    #[tokio::test]
    async fn test_find_sorted_skip_limit() {
        let store = seeded(&["Carol", "Alice", "Bob", "Dave"]).await;

        let asc = store
            .find(&[], FindOptions::default().sort_by("name", OrderDirection::Ascending))
            .await
            .unwrap();
        assert_eq!(names(&asc), ["Alice", "Bob", "Carol", "Dave"]);

        let page = store
            .find(
                &[],
                FindOptions::default()
                    .sort_by("name", OrderDirection::Descending)
                    .skip(1)
                    .limit(2),
            )
            .await
            .unwrap();
        assert_eq!(names(&page), ["Carol", "Bob"]);

        let beyond = store
            .find(&[], FindOptions::default().skip(10).limit(2))
            .await
            .unwrap();
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn test_filter_and_count() {
        let store = seeded(&["Alice", "Alicia", "Bob"]).await;
        let filter = vec![FilterCondition::contains_ignore_case("name", "ALI")];

        assert_eq!(store.count(&filter).await.unwrap(), 2);
        assert_eq!(store.count(&[]).await.unwrap(), 3);

        let found = store.find(&filter, FindOptions::default()).await.unwrap();
        assert_eq!(names(&found), ["Alice", "Alicia"]);
    }

    #[tokio::test]
    async fn test_update_by_id() {
        let store = MemoryCollection::new();
        let id = store
            .insert(doc(json!({"name": "Bob", "email": "bob@example.com"})))
            .await
            .unwrap();

        let matched = store
            .update_by_id(&id, doc(json!({"name": "Robert"})))
            .await
            .unwrap();
        assert_eq!(matched, 1);

        let stored = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored["name"], "Robert");
        assert_eq!(stored["email"], "bob@example.com");

        let missing = store
            .update_by_id(&ObjectId::new(), doc(json!({"name": "x"})))
            .await
            .unwrap();
        assert_eq!(missing, 0);
    }

    #[tokio::test]
    async fn test_update_rejects_id_change() {
        let store = MemoryCollection::new();
        let id = store.insert(doc(json!({"name": "Bob"}))).await.unwrap();

        let err = store
            .update_by_id(&id, doc(json!({"_id": "other"})))
            .await
            .unwrap_err();
        assert_eq!(err.operation, StoreOperation::Update);
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let store = seeded(&["Alice", "Bob"]).await;
        let all = store.find(&[], FindOptions::default()).await.unwrap();
        let id: ObjectId = all[0][ID_FIELD].as_str().unwrap().parse().unwrap();

        assert_eq!(store.delete_by_id(&id).await.unwrap(), 1);
        assert_eq!(store.delete_by_id(&id).await.unwrap(), 0);
        assert!(store.find_by_id(&id).await.unwrap().is_none());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_insert_raw_keeps_document() {
        let store = MemoryCollection::new();
        store.insert_raw(doc(json!({"name": 42}))).await;
        assert!(!store.is_empty().await);
        let all = store.find(&[], FindOptions::default()).await.unwrap();
        assert_eq!(all[0]["name"], 42);
    }
}
