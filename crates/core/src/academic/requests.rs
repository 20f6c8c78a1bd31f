//! Create and update payloads for the academic entities.
//!
//! Create payloads carry everything except the identity, which the store
//! assigns. Update payloads only hold mutable fields: a `None` keeps the stored
//! value, and the owning reference (`university_id` / `faculty_id`) can never be
//! changed after creation.
//!
//! Optional columns use `Option<Option<String>>` in update payloads: an absent
//! key keeps the stored value, an explicit `null` clears it, and a string sets it.

use serde::{Deserialize, Deserializer, Serialize};

/// Reads a present key of an optional column as `Some(value)`, so a JSON
/// `null` becomes `Some(None)`. Absent keys fall back to `#[serde(default)]`.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Request payload for creating a university.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUniversity {
    pub name: String,
    pub abbreviation: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl CreateUniversity {
    pub fn new(
        name: impl Into<String>,
        abbreviation: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            abbreviation: abbreviation.into(),
            kind: kind.into(),
        }
    }
}

/// Request payload for updating a university.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUniversity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Request payload for creating a faculty under an existing university.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFaculty {
    pub university_id: i64,
    pub name: String,
    pub abbreviation: String,
    pub acronym: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl CreateFaculty {
    pub fn new(
        university_id: i64,
        name: impl Into<String>,
        abbreviation: impl Into<String>,
        acronym: impl Into<String>,
    ) -> Self {
        Self {
            university_id,
            name: name.into(),
            abbreviation: abbreviation.into(),
            acronym: acronym.into(),
            directory: None,
            postal_code: None,
            city: None,
            address: None,
            phone: None,
            contact: None,
            email: None,
        }
    }

    /// Set the postal code and city.
    pub fn with_location(mut self, postal_code: impl Into<String>, city: impl Into<String>) -> Self {
        self.postal_code = Some(postal_code.into());
        self.city = Some(city.into());
        self
    }

    /// Set the contact email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Request payload for updating a faculty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateFaculty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acronym: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub directory: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub city: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub contact: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
}

/// Request payload for creating a specialty under an existing faculty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSpecialty {
    pub faculty_id: i64,
    pub name: String,
    pub letter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CreateSpecialty {
    pub fn new(faculty_id: i64, name: impl Into<String>, letter: impl Into<String>) -> Self {
        Self {
            faculty_id,
            name: name.into(),
            letter: letter.into(),
            note: None,
        }
    }

    /// Set the free-text note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Request payload for updating a specialty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSpecialty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub note: Option<Option<String>>,
}
