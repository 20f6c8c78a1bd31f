//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use academia_core::academic::{
    CreateFaculty, CreateSpecialty, CreateUniversity, Faculty, Specialty, University,
    UpdateFaculty, UpdateSpecialty, UpdateUniversity,
};
use rusqlite::types::Value;
use rusqlite::Row;

// ============================================================================
// University conversions
// ============================================================================

/// Convert a SQLite row to a University.
///
/// Expected columns: id, name, abbreviation, type
pub fn row_to_university(row: &Row) -> rusqlite::Result<University> {
    Ok(University {
        id: row.get(0)?,
        name: row.get(1)?,
        abbreviation: row.get(2)?,
        kind: row.get(3)?,
    })
}

/// Parameters for `INSERT_UNIVERSITY`.
pub fn university_insert_params(request: &CreateUniversity) -> Vec<Value> {
    vec![
        text(&request.name),
        text(&request.abbreviation),
        text(&request.kind),
    ]
}

/// Parameters for `UPDATE_UNIVERSITY`. `?1` is the identity.
pub fn university_update_params(id: i64, request: &UpdateUniversity) -> Vec<Value> {
    vec![
        Value::Integer(id),
        opt_text(&request.name),
        opt_text(&request.abbreviation),
        opt_text(&request.kind),
    ]
}

// ============================================================================
// Faculty conversions
// ============================================================================

/// Convert a SQLite row to a Faculty.
///
/// Expected columns: id, name, abbreviation, acronym, directory, postal_code,
/// city, address, phone, contact, email, university_id
pub fn row_to_faculty(row: &Row) -> rusqlite::Result<Faculty> {
    Ok(Faculty {
        id: row.get(0)?,
        name: row.get(1)?,
        abbreviation: row.get(2)?,
        acronym: row.get(3)?,
        directory: row.get(4)?,
        postal_code: row.get(5)?,
        city: row.get(6)?,
        address: row.get(7)?,
        phone: row.get(8)?,
        contact: row.get(9)?,
        email: row.get(10)?,
        university_id: row.get(11)?,
    })
}

/// Parameters for `INSERT_FACULTY`.
pub fn faculty_insert_params(request: &CreateFaculty) -> Vec<Value> {
    vec![
        text(&request.name),
        text(&request.abbreviation),
        text(&request.acronym),
        opt_text(&request.directory),
        opt_text(&request.postal_code),
        opt_text(&request.city),
        opt_text(&request.address),
        opt_text(&request.phone),
        opt_text(&request.contact),
        opt_text(&request.email),
        Value::Integer(request.university_id),
    ]
}

/// Parameters for `UPDATE_FACULTY`. `?1` is the identity, followed by the
/// required columns, the optional column values, then one supplied flag per
/// optional column.
pub fn faculty_update_params(id: i64, request: &UpdateFaculty) -> Vec<Value> {
    let optional = [
        &request.directory,
        &request.postal_code,
        &request.city,
        &request.address,
        &request.phone,
        &request.contact,
        &request.email,
    ];

    let mut params = vec![
        Value::Integer(id),
        opt_text(&request.name),
        opt_text(&request.abbreviation),
        opt_text(&request.acronym),
    ];
    params.extend(optional.iter().map(|field| patch_value(field)));
    params.extend(optional.iter().map(|field| supplied(field)));
    params
}

// ============================================================================
// Specialty conversions
// ============================================================================

/// Convert a SQLite row to a Specialty.
///
/// Expected columns: id, name, letter, note, faculty_id
pub fn row_to_specialty(row: &Row) -> rusqlite::Result<Specialty> {
    Ok(Specialty {
        id: row.get(0)?,
        name: row.get(1)?,
        letter: row.get(2)?,
        note: row.get(3)?,
        faculty_id: row.get(4)?,
    })
}

/// Parameters for `INSERT_SPECIALTY`.
pub fn specialty_insert_params(request: &CreateSpecialty) -> Vec<Value> {
    vec![
        text(&request.name),
        text(&request.letter),
        opt_text(&request.note),
        Value::Integer(request.faculty_id),
    ]
}

/// Parameters for `UPDATE_SPECIALTY`. `?1` is the identity.
pub fn specialty_update_params(id: i64, request: &UpdateSpecialty) -> Vec<Value> {
    vec![
        Value::Integer(id),
        opt_text(&request.name),
        opt_text(&request.letter),
        patch_value(&request.note),
        supplied(&request.note),
    ]
}

// ============================================================================
// Helpers
// ============================================================================

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

fn opt_text(value: &Option<String>) -> Value {
    value.as_deref().map(text).unwrap_or(Value::Null)
}

/// The new value of an optional column; NULL both when clearing and when absent.
fn patch_value(patch: &Option<Option<String>>) -> Value {
    patch.as_ref().map(opt_text).unwrap_or(Value::Null)
}

fn supplied(patch: &Option<Option<String>>) -> Value {
    Value::Integer(i64::from(patch.is_some()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_university_insert_params_order() {
        let request = CreateUniversity::new("Universidad Tecnologica", "UTN", "public");

        let params = university_insert_params(&request);

        assert_eq!(
            params,
            vec![
                Value::Text("Universidad Tecnologica".to_string()),
                Value::Text("UTN".to_string()),
                Value::Text("public".to_string()),
            ]
        );
    }

    #[test]
    fn test_update_params_use_null_for_unchanged_fields() {
        let request = UpdateUniversity {
            name: Some("UTN FRSR".to_string()),
            ..Default::default()
        };

        let params = university_update_params(5, &request);

        assert_eq!(params[0], Value::Integer(5));
        assert_eq!(params[1], Value::Text("UTN FRSR".to_string()));
        assert_eq!(params[2], Value::Null);
        assert_eq!(params[3], Value::Null);
    }

    #[test]
    fn test_faculty_insert_params_end_with_owner() {
        let request = CreateFaculty::new(3, "Facultad Regional", "FR", "FRSR")
            .with_location("5600", "San Rafael");

        let params = faculty_insert_params(&request);

        assert_eq!(params.len(), 11);
        assert_eq!(params[4], Value::Text("5600".to_string()));
        assert_eq!(params[5], Value::Text("San Rafael".to_string()));
        assert_eq!(params[9], Value::Null);
        assert_eq!(params[10], Value::Integer(3));
    }

    #[test]
    fn test_faculty_update_params_len_matches_placeholders() {
        let params = faculty_update_params(1, &UpdateFaculty::default());
        assert_eq!(params.len(), 18);
        assert!(params[1..11].iter().all(|v| *v == Value::Null));
        assert!(params[11..].iter().all(|v| *v == Value::Integer(0)));
    }

    #[test]
    fn test_faculty_update_params_flag_supplied_columns() {
        let request = UpdateFaculty {
            city: Some(Some("Mendoza".to_string())),
            email: Some(None),
            ..Default::default()
        };

        let params = faculty_update_params(1, &request);

        // city is ?7 with flag ?14, email is ?11 with flag ?18
        assert_eq!(params[6], Value::Text("Mendoza".to_string()));
        assert_eq!(params[13], Value::Integer(1));
        assert_eq!(params[10], Value::Null);
        assert_eq!(params[17], Value::Integer(1));
        assert_eq!(params[15], Value::Integer(0));
    }

    #[test]
    fn test_specialty_params() {
        let request = CreateSpecialty::new(8, "Ingenieria Civil", "C").with_note("nocturno");

        let params = specialty_insert_params(&request);

        assert_eq!(params[2], Value::Text("nocturno".to_string()));
        assert_eq!(params[3], Value::Integer(8));
        assert_eq!(
            specialty_update_params(2, &UpdateSpecialty::default()).len(),
            5
        );

        let clear = UpdateSpecialty {
            note: Some(None),
            ..Default::default()
        };
        assert_eq!(
            specialty_update_params(2, &clear)[3..],
            [Value::Null, Value::Integer(1)]
        );
    }
}
