use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// The three kinds of record in the ownership chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    University,
    Faculty,
    Specialty,
}

impl EntityKind {
    /// Returns the lowercase name used in cache keys and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::University => "university",
            EntityKind::Faculty => "faculty",
            EntityKind::Specialty => "specialty",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record stored by a repository and cached by identity.
///
/// `FIELDS` is the whitelist of column names a filter clause may reference.
/// The serialized form of an entity is its full flat field set, which is what
/// the cache stores.
pub trait Entity:
    fmt::Debug + Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Payload used to create a new record (no identity yet).
    type Create: fmt::Debug + Clone + DeserializeOwned + Send + Sync + 'static;
    /// Partial overwrite of mutable fields; `None` leaves a field unchanged.
    type Update: fmt::Debug + Clone + DeserializeOwned + Send + Sync + 'static;

    const KIND: EntityKind;
    const FIELDS: &'static [&'static str];

    /// The store-assigned identity.
    fn id(&self) -> i64;
}
