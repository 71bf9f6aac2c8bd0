//! Identifiers used by the service
//!
//! Two kinds of identifiers live here:
//!
//! - [`ObjectId`]: the 12-byte document identifier assigned by the store on
//!   insert, backed by `bson::oid::ObjectId` and exposed on the wire as 24
//!   lowercase hex characters.
//! - [`RequestId`]: a TypeID (`req_<base32 uuidv7>`) attached to every
//!   inbound HTTP request for log correlation.
//!
//! ```rust
//! use users_service::ids::ObjectId;
//! use std::str::FromStr;
//!
//! let id = ObjectId::new();
//! let parsed = ObjectId::from_str(&id.to_hex()).unwrap();
//! assert_eq!(id, parsed);
//! ```

use http::Request;
use mti::prelude::*;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tower_http::request_id::{MakeRequestId, RequestId as TowerRequestId};

/// Document identifier assigned by the store.
///
/// Serializes as a bare hex string rather than bson's `{"$oid": ...}` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(bson::oid::ObjectId);

impl ObjectId {
    /// Generates a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(bson::oid::ObjectId::new())
    }

    /// Builds an identifier from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bson::oid::ObjectId::from_bytes(bytes))
    }

    /// Lowercase hex rendering (24 characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(bson::oid::ObjectId::parse_str(s)?))
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ObjectId::from_str(&raw).map_err(de::Error::custom)
    }
}

/// A string that is not 24 hex characters.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ObjectIdError(#[from] bson::oid::Error);

/// A type-safe request identifier for distributed tracing.
///
/// Request IDs follow the TypeID format: `req_<base32-encoded-uuidv7>`,
/// e.g. `req_01h455vb4pex5vsknk084sn02q`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(MagicTypeId);

impl RequestId {
    /// The prefix used for request IDs
    pub const PREFIX: &'static str = "req";

    /// Creates a new request ID with a UUIDv7 (time-sortable).
    #[must_use]
    pub fn new() -> Self {
        Self(Self::PREFIX.create_type_id::<V7>())
    }

    /// Returns the request ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A `MakeRequestId` implementation that generates `RequestId`s for tower-http.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeTypedRequestId;

impl MakeRequestId for MakeTypedRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<TowerRequestId> {
        let id = RequestId::new();
        let header_value = http::HeaderValue::from_str(id.as_str()).ok()?;
        Some(TowerRequestId::new(header_value))
    }
}
