use serde::{Deserialize, Serialize};

use super::requests::{
    CreateFaculty, CreateSpecialty, CreateUniversity, UpdateFaculty, UpdateSpecialty,
    UpdateUniversity,
};
use super::{Entity, EntityKind};

/// Top of the ownership chain. Owns zero or more faculties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct University {
    pub id: i64,
    pub name: String,
    pub abbreviation: String,
    /// Free-form classification (public, private, ...).
    #[serde(rename = "type")]
    pub kind: String,
}

impl Entity for University {
    type Create = CreateUniversity;
    type Update = UpdateUniversity;

    const KIND: EntityKind = EntityKind::University;
    const FIELDS: &'static [&'static str] = &["id", "name", "abbreviation", "type"];

    fn id(&self) -> i64 {
        self.id
    }
}

/// A faculty belonging to exactly one university.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    pub id: i64,
    pub name: String,
    pub abbreviation: String,
    pub acronym: String,
    pub directory: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub university_id: i64,
}

impl Entity for Faculty {
    type Create = CreateFaculty;
    type Update = UpdateFaculty;

    const KIND: EntityKind = EntityKind::Faculty;
    const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "abbreviation",
        "acronym",
        "directory",
        "postal_code",
        "city",
        "address",
        "phone",
        "contact",
        "email",
        "university_id",
    ];

    fn id(&self) -> i64 {
        self.id
    }
}

/// A specialty offered by exactly one faculty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialty {
    pub id: i64,
    pub name: String,
    /// Short code identifying the specialty within its faculty.
    pub letter: String,
    pub note: Option<String>,
    pub faculty_id: i64,
}

impl Entity for Specialty {
    type Create = CreateSpecialty;
    type Update = UpdateSpecialty;

    const KIND: EntityKind = EntityKind::Specialty;
    const FIELDS: &'static [&'static str] = &["id", "name", "letter", "note", "faculty_id"];

    fn id(&self) -> i64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_university_serializes_kind_as_type() {
        let university = University {
            id: 1,
            name: "Universidad Tecnologica".to_string(),
            abbreviation: "UTN".to_string(),
            kind: "public".to_string(),
        };

        let json = serde_json::to_value(&university).unwrap();

        assert_eq!(json["type"], "public");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn test_fields_match_serialized_keys() {
        let faculty = Faculty {
            id: 3,
            name: "Facultad Regional".to_string(),
            abbreviation: "FR".to_string(),
            acronym: "FRSR".to_string(),
            directory: None,
            postal_code: Some("5600".to_string()),
            city: Some("San Rafael".to_string()),
            address: None,
            phone: None,
            contact: None,
            email: Some("info@frsr.edu".to_string()),
            university_id: 1,
        };

        let json = serde_json::to_value(&faculty).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), Faculty::FIELDS.len());
        for field in Faculty::FIELDS {
            assert!(object.contains_key(*field), "missing {field}");
        }
    }

    #[test]
    fn test_specialty_id() {
        let specialty = Specialty {
            id: 42,
            name: "Ingenieria en Sistemas".to_string(),
            letter: "K".to_string(),
            note: None,
            faculty_id: 7,
        };

        assert_eq!(specialty.id(), 42);
        assert_eq!(Specialty::KIND, EntityKind::Specialty);
    }
}
