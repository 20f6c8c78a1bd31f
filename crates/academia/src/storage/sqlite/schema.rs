//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O. Column names match the serialized field names of the
//! entities, so a validated filter field is also a valid column.

/// Connection settings and all tables.
///
/// `foreign_keys` must be on for the owner references and the cascades to be
/// enforced. `case_sensitive_like` keeps `like` distinct from `ilike`.
pub const CREATE_TABLES: &str = r#"
PRAGMA foreign_keys = ON;
PRAGMA case_sensitive_like = ON;

-- Universities table
CREATE TABLE IF NOT EXISTS universities (
    "id" INTEGER PRIMARY KEY AUTOINCREMENT,
    "name" TEXT NOT NULL,
    "abbreviation" TEXT NOT NULL,
    "type" TEXT NOT NULL
);

-- Faculties table
CREATE TABLE IF NOT EXISTS faculties (
    "id" INTEGER PRIMARY KEY AUTOINCREMENT,
    "name" TEXT NOT NULL,
    "abbreviation" TEXT NOT NULL,
    "acronym" TEXT NOT NULL,
    "directory" TEXT,
    "postal_code" TEXT,
    "city" TEXT,
    "address" TEXT,
    "phone" TEXT,
    "contact" TEXT,
    "email" TEXT,
    "university_id" INTEGER NOT NULL,
    FOREIGN KEY ("university_id") REFERENCES universities("id") ON DELETE CASCADE
);

-- Specialties table
CREATE TABLE IF NOT EXISTS specialties (
    "id" INTEGER PRIMARY KEY AUTOINCREMENT,
    "name" TEXT NOT NULL,
    "letter" TEXT NOT NULL,
    "note" TEXT,
    "faculty_id" INTEGER NOT NULL,
    FOREIGN KEY ("faculty_id") REFERENCES faculties("id") ON DELETE CASCADE
);

-- Indexes for owner lookups and cascades
CREATE INDEX IF NOT EXISTS idx_faculties_university_id ON faculties("university_id");
CREATE INDEX IF NOT EXISTS idx_specialties_faculty_id ON specialties("faculty_id");
"#;

// University queries
pub const UNIVERSITY_TABLE: &str = "universities";

pub const UNIVERSITY_COLUMNS: &str = r#""id", "name", "abbreviation", "type""#;

pub const INSERT_UNIVERSITY: &str = r#"
INSERT INTO universities ("name", "abbreviation", "type")
VALUES (?1, ?2, ?3)
"#;

pub const SELECT_UNIVERSITY_BY_ID: &str = r#"
SELECT "id", "name", "abbreviation", "type"
FROM universities
WHERE "id" = ?1
"#;

pub const UPDATE_UNIVERSITY: &str = r#"
UPDATE universities
SET "name" = COALESCE(?2, "name"),
    "abbreviation" = COALESCE(?3, "abbreviation"),
    "type" = COALESCE(?4, "type")
WHERE "id" = ?1
"#;

pub const DELETE_UNIVERSITY: &str = r#"
DELETE FROM universities
WHERE "id" = ?1
"#;

// Faculty queries
pub const FACULTY_TABLE: &str = "faculties";

pub const FACULTY_COLUMNS: &str = r#""id", "name", "abbreviation", "acronym", "directory", "postal_code", "city", "address", "phone", "contact", "email", "university_id""#;

pub const INSERT_FACULTY: &str = r#"
INSERT INTO faculties ("name", "abbreviation", "acronym", "directory", "postal_code", "city", "address", "phone", "contact", "email", "university_id")
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
"#;

pub const SELECT_FACULTY_BY_ID: &str = r#"
SELECT "id", "name", "abbreviation", "acronym", "directory", "postal_code", "city", "address", "phone", "contact", "email", "university_id"
FROM faculties
WHERE "id" = ?1
"#;

/// `?2`..`?4` fall back to the stored value when NULL. Optional columns
/// `?5`..`?11` are only written when their flag `?12`..`?18` is set, so a
/// supplied NULL clears the column.
pub const UPDATE_FACULTY: &str = r#"
UPDATE faculties
SET "name" = COALESCE(?2, "name"),
    "abbreviation" = COALESCE(?3, "abbreviation"),
    "acronym" = COALESCE(?4, "acronym"),
    "directory" = CASE WHEN ?12 THEN ?5 ELSE "directory" END,
    "postal_code" = CASE WHEN ?13 THEN ?6 ELSE "postal_code" END,
    "city" = CASE WHEN ?14 THEN ?7 ELSE "city" END,
    "address" = CASE WHEN ?15 THEN ?8 ELSE "address" END,
    "phone" = CASE WHEN ?16 THEN ?9 ELSE "phone" END,
    "contact" = CASE WHEN ?17 THEN ?10 ELSE "contact" END,
    "email" = CASE WHEN ?18 THEN ?11 ELSE "email" END
WHERE "id" = ?1
"#;

pub const DELETE_FACULTY: &str = r#"
DELETE FROM faculties
WHERE "id" = ?1
"#;

pub const SELECT_FACULTY_IDS_BY_UNIVERSITY: &str = r#"
SELECT "id"
FROM faculties
WHERE "university_id" = ?1
ORDER BY "id" ASC
"#;

// Specialty queries
pub const SPECIALTY_TABLE: &str = "specialties";

pub const SPECIALTY_COLUMNS: &str = r#""id", "name", "letter", "note", "faculty_id""#;

pub const INSERT_SPECIALTY: &str = r#"
INSERT INTO specialties ("name", "letter", "note", "faculty_id")
VALUES (?1, ?2, ?3, ?4)
"#;

pub const SELECT_SPECIALTY_BY_ID: &str = r#"
SELECT "id", "name", "letter", "note", "faculty_id"
FROM specialties
WHERE "id" = ?1
"#;

pub const UPDATE_SPECIALTY: &str = r#"
UPDATE specialties
SET "name" = COALESCE(?2, "name"),
    "letter" = COALESCE(?3, "letter"),
    "note" = CASE WHEN ?5 THEN ?4 ELSE "note" END
WHERE "id" = ?1
"#;

pub const DELETE_SPECIALTY: &str = r#"
DELETE FROM specialties
WHERE "id" = ?1
"#;

pub const SELECT_SPECIALTY_IDS_BY_FACULTY: &str = r#"
SELECT "id"
FROM specialties
WHERE "faculty_id" = ?1
ORDER BY "id" ASC
"#;

pub const SELECT_SPECIALTY_IDS_BY_UNIVERSITY: &str = r#"
SELECT s."id"
FROM specialties s
INNER JOIN faculties f ON s."faculty_id" = f."id"
WHERE f."university_id" = ?1
ORDER BY s."id" ASC
"#;
