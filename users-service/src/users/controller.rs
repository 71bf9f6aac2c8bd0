//! CRUD operations on the user collection
//!
//! Each operation validates its input, makes its store calls under the
//! configured deadline and classifies the outcome. Store details are logged
//! here and never reach the client.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::ids::ObjectId;
use crate::responses::PageEnvelope;
use crate::store::{
    Document, DocumentStore, FindOptions, StoreError, StoreOperation, StoreResult,
};

use super::model::{self, User};
use super::query::UserQueryParams;

pub const ID_REQUIRED: &str = "ID is required";
pub const INVALID_ID: &str = "Invalid ID format";
pub const USER_NOT_FOUND: &str = "User not found";
pub const CREATE_FAILED: &str = "Error creating user";
pub const UPDATE_FAILED: &str = "Error updating user or user not found";
pub const DELETE_FAILED: &str = "Error deleting user or user not found";
pub const FETCH_FAILED: &str = "Error fetching users";
pub const COUNT_FAILED: &str = "Error counting users";
pub const DECODE_FAILED: &str = "Error decoding user";

/// Stateless controller over a shared store
#[derive(Clone)]
pub struct UserController {
    store: Arc<dyn DocumentStore>,
    deadline: Duration,
}

impl UserController {
    /// Controller whose store calls each get `deadline` to complete
    pub fn new(store: Arc<dyn DocumentStore>, deadline: Duration) -> Self {
        Self { store, deadline }
    }

    /// Per-call store deadline
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Every user, in natural order
    pub async fn list_all(&self) -> Result<Vec<User>> {
        let records = self
            .bounded(
                StoreOperation::Find,
                self.store.find(&[], FindOptions::default()),
            )
            .await
            .map_err(|e| internal("list_users", &e, FETCH_FAILED))?;

        let users = decode_all(records)?;
        tracing::debug!(action = "list_users", count = users.len(), "Listed users");
        Ok(users)
    }

    /// Insert a user built from a JSON body
    pub async fn create(&self, body: &[u8]) -> Result<ObjectId> {
        let new_user = model::decode_create(body)?;
        let record = model::apply_timestamps_on_create(new_user);

        let id = self
            .bounded(StoreOperation::Insert, self.store.insert(record))
            .await
            .map_err(|e| internal("create_user", &e, CREATE_FAILED))?;

        tracing::info!(action = "create_user", status = "success", user_id = %id, "User created");
        Ok(id)
    }

    /// One user by id
    pub async fn get(&self, raw_id: Option<&str>) -> Result<User> {
        let id = parse_id(raw_id)?;

        let record = self
            .bounded(StoreOperation::FindById, self.store.find_by_id(&id))
            .await
            .map_err(|e| internal("get_user", &e, FETCH_FAILED))?;

        let Some(record) = record else {
            tracing::debug!(action = "get_user", user_id = %id, "No such user");
            return Err(Error::NotFound(USER_NOT_FOUND.to_string()));
        };

        model::decode_record(record).map_err(|e| {
            tracing::error!(
                action = "get_user",
                user_id = %id,
                error = %e,
                "Stored user is malformed"
            );
            Error::Internal(DECODE_FAILED.to_string())
        })
    }

    /// Apply a partial update
    ///
    /// A missing user and a failing store produce the same 500 outcome. Only
    /// the log tells them apart.
    pub async fn update(&self, raw_id: Option<&str>, body: &[u8]) -> Result<()> {
        let id = parse_id(raw_id)?;
        let update = model::decode_update(body)?;
        let set = model::apply_update_stamp(update);

        match self
            .bounded(StoreOperation::Update, self.store.update_by_id(&id, set))
            .await
        {
            Ok(0) => {
                tracing::warn!(
                    action = "update_user",
                    status = "not_found",
                    user_id = %id,
                    "No user matched"
                );
                Err(Error::Internal(UPDATE_FAILED.to_string()))
            }
            Ok(_) => {
                tracing::info!(
                    action = "update_user",
                    status = "success",
                    user_id = %id,
                    "User updated"
                );
                Ok(())
            }
            Err(e) => Err(internal("update_user", &e, UPDATE_FAILED)),
        }
    }

    /// Hard delete
    ///
    /// Same merged failure outcome as [`UserController::update`].
    pub async fn delete(&self, raw_id: Option<&str>) -> Result<()> {
        let id = parse_id(raw_id)?;

        match self
            .bounded(StoreOperation::Delete, self.store.delete_by_id(&id))
            .await
        {
            Ok(0) => {
                tracing::warn!(
                    action = "delete_user",
                    status = "not_found",
                    user_id = %id,
                    "No user matched"
                );
                Err(Error::Internal(DELETE_FAILED.to_string()))
            }
            Ok(_) => {
                tracing::info!(
                    action = "delete_user",
                    status = "success",
                    user_id = %id,
                    "User deleted"
                );
                Ok(())
            }
            Err(e) => Err(internal("delete_user", &e, DELETE_FAILED)),
        }
    }

    /// One page of users matching the query parameters
    ///
    /// Count and fetch are separate store calls; writes landing between
    /// them can make `totalUsers` disagree with the page contents.
    pub async fn filtered_list(&self, params: &UserQueryParams) -> Result<PageEnvelope<User>> {
        let query = params.build();

        let total = self
            .bounded(StoreOperation::Count, self.store.count(&query.filter))
            .await
            .map_err(|e| internal("filter_users", &e, COUNT_FAILED))?;

        let records = self
            .bounded(
                StoreOperation::Find,
                self.store.find(&query.filter, query.find_options()),
            )
            .await
            .map_err(|e| internal("filter_users", &e, FETCH_FAILED))?;

        let users = decode_all(records)?;
        tracing::debug!(
            action = "filter_users",
            page = query.page,
            limit = query.page_size,
            total,
            returned = users.len(),
            "Filtered users"
        );

        Ok(PageEnvelope::new(
            query.page,
            query.page_size,
            total,
            query.total_pages(total),
            users,
        ))
    }

    async fn bounded<T, F>(&self, operation: StoreOperation, call: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        tokio::time::timeout(self.deadline, call)
            .await
            .unwrap_or_else(|_| {
                Err(StoreError::timeout(
                    operation,
                    format!("no answer within {:?}", self.deadline),
                ))
            })
    }
}

fn parse_id(raw: Option<&str>) -> Result<ObjectId> {
    match raw {
        None | Some("") => Err(Error::InvalidInput(ID_REQUIRED.to_string())),
        Some(raw) => raw
            .parse()
            .map_err(|_| Error::InvalidInput(INVALID_ID.to_string())),
    }
}

fn decode_all(records: Vec<Document>) -> Result<Vec<User>> {
    records
        .into_iter()
        .map(|record| {
            model::decode_record(record).map_err(|e| {
                tracing::error!(error = %e, "Stored user is malformed");
                Error::Internal(DECODE_FAILED.to_string())
            })
        })
        .collect()
}

fn internal(action: &'static str, err: &StoreError, message: &str) -> Error {
    tracing::error!(
        action,
        status = "store_error",
        operation = %err.operation,
        kind = %err.kind,
        transient = err.is_transient(),
        error = %err,
        "Store call failed"
    );
    Error::Internal(message.to_string())
}
