//! Typed UUID wrappers for the catalog's primary keys.
//!
//! `Id<T>` wraps a `uuid::Uuid` with a marker type so the compiler keeps
//! different entities' ids apart: an `AppId` cannot be passed where a
//! `TagId` was expected. Every id is UUID v7, so ids sort in creation
//! order and break ties when listings order by `(created_at, id)`.
//!
//! # Example
//!
//! ```rust
//! use catalog_core::common::id::Id;
//!
//! // Entity marker types
//! pub struct App;
//! pub struct Tag;
//!
//! pub type AppId = Id<App>;
//! pub type TagId = Id<Tag>;
//!
//! let app_id = AppId::new();
//! let tag_id = TagId::new();
//!
//! // This would be a compile error:
//! // let wrong: TagId = app_id;
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use uuid::Uuid;

/// A typed wrapper around `Uuid`.
///
/// The marker `T` names the entity the id belongs to and never exists at
/// runtime; `fn() -> T` keeps the wrapper `Send + Sync` without requiring
/// either of `T`.
#[repr(transparent)]
pub struct Id<T>(Uuid, PhantomData<fn() -> T>);

impl<T> Id<T> {
    /// Creates a new time-ordered id.
    #[inline]
    pub fn new() -> Self {
        Self(Uuid::now_v7(), PhantomData)
    }

    /// Wraps a raw `Uuid`, e.g. one read back from the database.
    #[inline]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, PhantomData)
    }

    /// Returns the inner `Uuid`.
    #[inline]
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

// The impls below are written out by hand: deriving them would put an
// unnecessary bound on `T`, and marker types carry no data to compare.

impl<T> Clone for Id<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(&format!("Id<{}>", std::any::type_name::<T>()))
            .field(&self.0)
            .finish()
    }
}

impl<T> Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<T> PartialEq for Id<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T> Hash for Id<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

// Ids serialize as plain UUID strings, indistinguishable from an untyped
// Uuid in a JSON payload.

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Uuid::deserialize(deserializer).map(Self::from_uuid)
    }
}

// sqlx integration: ids bind and decode as plain UUID columns.

use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef, Postgres};
use sqlx::{Decode, Encode, Type};

impl<T> Type<Postgres> for Id<T> {
    fn type_info() -> PgTypeInfo {
        <Uuid as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <Uuid as Type<Postgres>>::compatible(ty)
    }
}

impl<T> Encode<'_, Postgres> for Id<T> {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        <Uuid as Encode<Postgres>>::encode_by_ref(&self.0, buf)
    }
}

impl<T> Decode<'_, Postgres> for Id<T> {
    fn decode(value: PgValueRef<'_>) -> Result<Self, BoxDynError> {
        <Uuid as Decode<Postgres>>::decode(value).map(Self::from_uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Record;

    type RecordId = Id<Record>;

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(RecordId::new(), RecordId::new());
    }

    #[test]
    fn test_ids_follow_creation_order() {
        // Listings order by (created_at, id); the tie-break only works
        // because v7 ids are time-ordered.
        let first = RecordId::new();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let second = RecordId::new();
        assert!(first < second);
    }

    #[test]
    fn test_serializes_as_a_plain_uuid_string() {
        let id = RecordId::new();
        let json = serde_json::to_value(id).unwrap();
        let text = json.as_str().unwrap();
        assert_eq!(Uuid::parse_str(text).unwrap(), id.into_uuid());
    }

    #[test]
    fn test_serde_roundtrip() {
        let id = RecordId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_debug_names_the_entity() {
        let id = RecordId::new();
        assert!(format!("{:?}", id).contains("Record"));
    }
}
