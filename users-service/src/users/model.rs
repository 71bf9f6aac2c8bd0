//! User resource and its codec
//!
//! Two shapes exist for a user:
//!
//! - the wire shape, `{id, name, email, created_at, updated_at}`;
//! - the store record, where the identifier lives in `_id`.
//!
//! Request bodies are parsed loosely as JSON first and then projected into
//! [`NewUser`] or [`UserUpdate`]. Both stages report the same error class.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::ids::ObjectId;
use crate::store::Document;

/// Client-facing message for every body decoding failure
pub const INVALID_INPUT: &str = "Invalid input data";

const NAME: &str = "name";
const EMAIL: &str = "email";
const CREATED_AT: &str = "created_at";
const UPDATED_AT: &str = "updated_at";

/// A fully decoded user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Store-assigned identifier, immutable
    pub id: ObjectId,
    /// Display name
    pub name: String,
    /// Contact address, not unique
    pub email: String,
    /// Set once when the user is created
    pub created_at: DateTime<Utc>,
    /// Refreshed on every successful update
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted on create
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

/// Fields accepted on update; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserUpdate {
    /// Whether the update changes no user field
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

/// A store record that could not be decoded into a [`User`]
#[derive(Debug, thiserror::Error)]
#[error("malformed user record: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

#[derive(Deserialize)]
struct StoredUser {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn invalid_input() -> Error {
    Error::InvalidInput(INVALID_INPUT.to_string())
}

fn parse_json(body: &[u8]) -> Result<Value> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "Request body is not JSON");
        invalid_input()
    })
}

fn timestamp(at: DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

/// Parse a create body
///
/// `name` and `email` must be present strings. Everything else, including
/// any caller-supplied id or timestamps, is ignored.
pub fn decode_create(body: &[u8]) -> Result<NewUser> {
    let value = parse_json(body)?;
    serde_json::from_value(value).map_err(|e| {
        tracing::debug!(error = %e, "Create body does not describe a user");
        invalid_input()
    })
}

/// Parse an update body
///
/// The body must be a JSON object. `name` and `email` must be strings when
/// present. A caller-supplied `updated_at` is discarded since the service
/// stamps it. Identifier fields, `created_at` and unknown fields are refused.
pub fn decode_update(body: &[u8]) -> Result<UserUpdate> {
    let Value::Object(fields) = parse_json(body)? else {
        tracing::debug!("Update body is not a JSON object");
        return Err(invalid_input());
    };

    let mut update = UserUpdate::default();
    for (key, value) in fields {
        match (key.as_str(), value) {
            (NAME, Value::String(name)) => update.name = Some(name),
            (EMAIL, Value::String(email)) => update.email = Some(email),
            (UPDATED_AT, _) => {}
            (field, _) => {
                tracing::debug!(field, "Update body carries a field that cannot be set");
                return Err(invalid_input());
            }
        }
    }
    Ok(update)
}

/// Store record for a new user, both timestamps set to the same instant
pub fn apply_timestamps_on_create(new_user: NewUser) -> Document {
    let now = timestamp(Utc::now());

    let mut record = Document::new();
    record.insert(NAME.to_string(), Value::String(new_user.name));
    record.insert(EMAIL.to_string(), Value::String(new_user.email));
    record.insert(CREATED_AT.to_string(), now.clone());
    record.insert(UPDATED_AT.to_string(), now);
    record
}

/// Set-document for an update, always refreshing `updated_at`
pub fn apply_update_stamp(update: UserUpdate) -> Document {
    let mut set = Document::new();
    if let Some(name) = update.name {
        set.insert(NAME.to_string(), Value::String(name));
    }
    if let Some(email) = update.email {
        set.insert(EMAIL.to_string(), Value::String(email));
    }
    set.insert(UPDATED_AT.to_string(), timestamp(Utc::now()));
    set
}

/// Decode a store record; every field must be present and well typed
pub fn decode_record(record: Document) -> std::result::Result<User, DecodeError> {
    let stored: StoredUser = serde_json::from_value(Value::Object(record))?;
    Ok(User {
        id: stored.id,
        name: stored.name,
        email: stored.email,
        created_at: stored.created_at,
        updated_at: stored.updated_at,
    })
}

/// Wire representation of a user
pub fn encode(user: &User) -> Value {
    json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
        "created_at": timestamp(user.created_at),
        "updated_at": timestamp(user.updated_at),
    })
}
