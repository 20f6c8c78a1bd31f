//! SQLite repository implementation.
//!
//! One generic implementation of `academia_core::storage::Repository` serves
//! every entity kind. The per-kind SQL and row mapping live behind
//! [`SqliteEntity`].

use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Row};
use tokio_rusqlite::Connection;

use academia_core::academic::{Entity, EntityKind, Faculty, Specialty, University};
use academia_core::storage::{
    DeleteOutcome, FilterClause, PageRequest, QueryPlan, Repository, RepositoryError, Result,
};

use super::conversions::{
    faculty_insert_params, faculty_update_params, row_to_faculty, row_to_specialty,
    row_to_university, specialty_insert_params, specialty_update_params,
    university_insert_params, university_update_params,
};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::query::{register_fold_case, render_count, render_select};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Table layout and row mapping for an entity stored in SQLite.
pub trait SqliteEntity: Entity {
    const TABLE: &'static str;
    const COLUMNS: &'static str;
    const SELECT_BY_ID: &'static str;
    const INSERT: &'static str;
    const UPDATE: &'static str;
    const DELETE: &'static str;

    fn from_row(row: &Row) -> rusqlite::Result<Self>;

    fn insert_params(request: &Self::Create) -> Vec<Value>;

    /// `?1` must be the identity.
    fn update_params(id: i64, request: &Self::Update) -> Vec<Value>;

    /// Records that the schema will cascade-delete together with `id`.
    fn dependents(_conn: &rusqlite::Connection, _id: i64) -> rusqlite::Result<Vec<(EntityKind, i64)>> {
        Ok(Vec::new())
    }
}

fn select_ids(conn: &rusqlite::Connection, sql: &str, owner_id: i64) -> rusqlite::Result<Vec<i64>> {
    let mut stmt = conn.prepare(sql)?;
    let ids = stmt
        .query_map([owner_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<i64>>>()?;
    Ok(ids)
}

impl SqliteEntity for University {
    const TABLE: &'static str = schema::UNIVERSITY_TABLE;
    const COLUMNS: &'static str = schema::UNIVERSITY_COLUMNS;
    const SELECT_BY_ID: &'static str = schema::SELECT_UNIVERSITY_BY_ID;
    const INSERT: &'static str = schema::INSERT_UNIVERSITY;
    const UPDATE: &'static str = schema::UPDATE_UNIVERSITY;
    const DELETE: &'static str = schema::DELETE_UNIVERSITY;

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        row_to_university(row)
    }

    fn insert_params(request: &Self::Create) -> Vec<Value> {
        university_insert_params(request)
    }

    fn update_params(id: i64, request: &Self::Update) -> Vec<Value> {
        university_update_params(id, request)
    }

    fn dependents(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<Vec<(EntityKind, i64)>> {
        let faculties = select_ids(conn, schema::SELECT_FACULTY_IDS_BY_UNIVERSITY, id)?;
        let specialties = select_ids(conn, schema::SELECT_SPECIALTY_IDS_BY_UNIVERSITY, id)?;

        Ok(faculties
            .into_iter()
            .map(|id| (EntityKind::Faculty, id))
            .chain(specialties.into_iter().map(|id| (EntityKind::Specialty, id)))
            .collect())
    }
}

impl SqliteEntity for Faculty {
    const TABLE: &'static str = schema::FACULTY_TABLE;
    const COLUMNS: &'static str = schema::FACULTY_COLUMNS;
    const SELECT_BY_ID: &'static str = schema::SELECT_FACULTY_BY_ID;
    const INSERT: &'static str = schema::INSERT_FACULTY;
    const UPDATE: &'static str = schema::UPDATE_FACULTY;
    const DELETE: &'static str = schema::DELETE_FACULTY;

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        row_to_faculty(row)
    }

    fn insert_params(request: &Self::Create) -> Vec<Value> {
        faculty_insert_params(request)
    }

    fn update_params(id: i64, request: &Self::Update) -> Vec<Value> {
        faculty_update_params(id, request)
    }

    fn dependents(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<Vec<(EntityKind, i64)>> {
        let specialties = select_ids(conn, schema::SELECT_SPECIALTY_IDS_BY_FACULTY, id)?;
        Ok(specialties
            .into_iter()
            .map(|id| (EntityKind::Specialty, id))
            .collect())
    }
}

impl SqliteEntity for Specialty {
    const TABLE: &'static str = schema::SPECIALTY_TABLE;
    const COLUMNS: &'static str = schema::SPECIALTY_COLUMNS;
    const SELECT_BY_ID: &'static str = schema::SELECT_SPECIALTY_BY_ID;
    const INSERT: &'static str = schema::INSERT_SPECIALTY;
    const UPDATE: &'static str = schema::UPDATE_SPECIALTY;
    const DELETE: &'static str = schema::DELETE_SPECIALTY;

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        row_to_specialty(row)
    }

    fn insert_params(request: &Self::Create) -> Vec<Value> {
        specialty_insert_params(request)
    }

    fn update_params(id: i64, request: &Self::Update) -> Vec<Value> {
        specialty_update_params(id, request)
    }
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for all entity types.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    #[cfg(test)]
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Registers SQL functions and initializes the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            register_fold_case(conn).map_err(wrap_err)?;
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

#[async_trait]
impl<E: SqliteEntity> Repository<E> for SqliteRepository {
    async fn list(&self, filters: &[FilterClause], page: PageRequest) -> Result<Vec<E>> {
        let plan = QueryPlan::page::<E>(filters, page)?;
        let query = render_select(&plan, E::TABLE, E::COLUMNS)?;

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&query.sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(params_from_iter(query.params.iter()), E::from_row)
                    .map_err(wrap_err)?;

                let mut records = Vec::new();
                for row_result in rows {
                    records.push(row_result.map_err(wrap_err)?);
                }
                Ok(records)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, E::KIND.as_str()))
    }

    async fn count(&self, filters: &[FilterClause]) -> Result<u64> {
        let plan = QueryPlan::count::<E>(filters)?;
        let query = render_count(&plan, E::TABLE)?;

        let count: i64 = self
            .conn
            .call(move |conn| {
                conn.query_row(&query.sql, params_from_iter(query.params.iter()), |row| {
                    row.get(0)
                })
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, E::KIND.as_str()))?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn create(&self, request: &E::Create) -> Result<E> {
        let params = E::insert_params(request);

        self.conn
            .call(move |conn| {
                conn.execute(E::INSERT, params_from_iter(params.iter()))
                    .map_err(wrap_err)?;
                let id = conn.last_insert_rowid();
                conn.query_row(E::SELECT_BY_ID, [id], E::from_row)
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, E::KIND.as_str()))
    }

    async fn find(&self, id: i64) -> Result<Option<E>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(E::SELECT_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([id], E::from_row) {
                    Ok(record) => Ok(Some(record)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, E::KIND.as_str(), id))
    }

    async fn update(&self, id: i64, request: &E::Update) -> Result<Option<E>> {
        let params = E::update_params(id, request);

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(E::UPDATE, params_from_iter(params.iter()))
                    .map_err(wrap_err)?;
                if rows == 0 {
                    return Ok(None);
                }
                conn.query_row(E::SELECT_BY_ID, [id], E::from_row)
                    .map(Some)
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, E::KIND.as_str(), id))
    }

    async fn delete(&self, id: i64) -> Result<DeleteOutcome> {
        let outcome = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let dependents = E::dependents(&tx, id).map_err(wrap_err)?;
                let rows = tx.execute(E::DELETE, [id]).map_err(wrap_err)?;
                if rows == 0 {
                    return Ok(DeleteOutcome::none());
                }
                tx.commit().map_err(wrap_err)?;

                let mut outcome = DeleteOutcome::new(vec![(E::KIND, id)]);
                for (kind, dependent_id) in dependents {
                    outcome.push(kind, dependent_id);
                }
                Ok(outcome)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, E::KIND.as_str(), id))?;

        if outcome.removed().len() > 1 {
            let kind = E::KIND;
            tracing::debug!(
                entity = %kind,
                id,
                cascaded = outcome.removed().len() - 1,
                "Deleted record with dependents"
            );
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use academia_core::academic::{
        CreateFaculty, CreateSpecialty, CreateUniversity, UpdateFaculty, UpdateSpecialty,
        UpdateUniversity,
    };
    use academia_core::storage::{FilterError, FilterOperator};
    use serde_json::json;

    async fn setup() -> SqliteRepository {
        SqliteRepository::new_in_memory()
            .await
            .expect("Failed to create in-memory database")
    }

    async fn seed_university(repo: &SqliteRepository, name: &str) -> University {
        repo.create(&CreateUniversity::new(name, "U", "public"))
            .await
            .expect("create university")
    }

    async fn seed_faculty(repo: &SqliteRepository, university_id: i64, name: &str) -> Faculty {
        repo.create(&CreateFaculty::new(university_id, name, "F", "FAC"))
            .await
            .expect("create faculty")
    }

    async fn seed_specialty(repo: &SqliteRepository, faculty_id: i64, name: &str) -> Specialty {
        repo.create(&CreateSpecialty::new(faculty_id, name, "K"))
            .await
            .expect("create specialty")
    }

    #[tokio::test]
    async fn test_create_assigns_identity_and_find_returns_it() {
        let repo = setup().await;

        let created = seed_university(&repo, "Universidad Tecnologica").await;
        assert!(created.id > 0);

        let found: Option<University> = repo.find(created.id).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let repo = setup().await;

        let found: Option<Faculty> = repo.find(404).await.unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_create_with_missing_owner_is_rejected() {
        let repo = setup().await;

        let result: Result<Faculty> = repo
            .create(&CreateFaculty::new(99, "Huérfana", "H", "HU"))
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidReference(_)), "{err}");
        assert_eq!(Repository::<Faculty>::count(&repo, &[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_filters_by_conjunction() {
        let repo = setup().await;
        let first = seed_university(&repo, "Primera").await;
        let second = seed_university(&repo, "Segunda").await;
        seed_faculty(&repo, first.id, "Fisica").await;
        let wanted = seed_faculty(&repo, second.id, "Fisica").await;
        seed_faculty(&repo, second.id, "Quimica").await;

        let filters = vec![
            FilterClause::eq("name", "Fisica").unwrap(),
            FilterClause::eq("university_id", second.id).unwrap(),
        ];

        let found: Vec<Faculty> = repo.list(&filters, PageRequest::default()).await.unwrap();
        assert_eq!(found, vec![wanted]);

        let total = Repository::<Faculty>::count(&repo, &filters).await.unwrap();
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_pages_are_ordered_and_disjoint() {
        let repo = setup().await;
        for n in 0..25 {
            seed_university(&repo, &format!("Universidad {n}")).await;
        }

        let third: Vec<University> = repo
            .list(&[], PageRequest::new(3, 10).unwrap())
            .await
            .unwrap();
        let second: Vec<University> = repo
            .list(&[], PageRequest::new(2, 10).unwrap())
            .await
            .unwrap();

        assert_eq!(third.len(), 5);
        assert_eq!(second.len(), 10);
        assert!(second.windows(2).all(|w| w[0].id < w[1].id));
        assert!(second.last().unwrap().id < third.first().unwrap().id);
        assert_eq!(
            Repository::<University>::count(&repo, &[]).await.unwrap(),
            25
        );
    }

    #[tokio::test]
    async fn test_zero_page_size_returns_nothing() {
        let repo = setup().await;
        seed_university(&repo, "Una").await;

        let found: Vec<University> = repo
            .list(&[], PageRequest::new(1, 0).unwrap())
            .await
            .unwrap();

        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_filter_field_is_rejected() {
        let repo = setup().await;

        let filters = vec![FilterClause::eq("letter", "K").unwrap()];
        let result: Result<Vec<University>> = repo.list(&filters, PageRequest::default()).await;

        assert!(matches!(
            result,
            Err(RepositoryError::InvalidFilter(FilterError::UnknownField { .. }))
        ));
    }

    #[tokio::test]
    async fn test_ilike_ignores_case_and_like_does_not() {
        let repo = setup().await;
        let university = seed_university(&repo, "Una").await;
        let faculty = seed_faculty(&repo, university.id, "Ingenieria").await;
        seed_specialty(&repo, faculty.id, "Ingenieria en Sistemas").await;
        seed_specialty(&repo, faculty.id, "Ingenieria Civil").await;

        let ilike = vec![FilterClause::ilike("name", "%SISTEMAS%").unwrap()];
        let like =
            vec![FilterClause::new("name", FilterOperator::Like, json!("%SISTEMAS%")).unwrap()];

        assert_eq!(Repository::<Specialty>::count(&repo, &ilike).await.unwrap(), 1);
        assert_eq!(Repository::<Specialty>::count(&repo, &like).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ilike_folds_accented_letters() {
        let repo = setup().await;
        let university = seed_university(&repo, "Una").await;
        let faculty = seed_faculty(&repo, university.id, "Ciencias").await;
        seed_specialty(&repo, faculty.id, "física").await;
        seed_specialty(&repo, faculty.id, "Química").await;

        let upper = vec![FilterClause::ilike("name", "FÍSICA").unwrap()];
        let partial = vec![FilterClause::ilike("name", "%MICA").unwrap()];

        let found: Vec<Specialty> = repo.list(&upper, PageRequest::default()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "física");
        assert_eq!(Repository::<Specialty>::count(&repo, &partial).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_null_filters_on_optional_columns() {
        let repo = setup().await;
        let university = seed_university(&repo, "Una").await;
        seed_faculty(&repo, university.id, "Sin correo").await;
        let _: Faculty = repo
            .create(
                &CreateFaculty::new(university.id, "Con correo", "C", "CC").with_email("a@b.edu"),
            )
            .await
            .unwrap();

        let missing = vec![FilterClause::new("email", FilterOperator::IsNull, json!(null)).unwrap()];
        let found: Vec<Faculty> = repo.list(&missing, PageRequest::default()).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Sin correo");
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let repo = setup().await;
        let university = seed_university(&repo, "Una").await;
        let faculty: Faculty = repo
            .create(
                &CreateFaculty::new(university.id, "Regional", "FR", "FRSR")
                    .with_location("5600", "San Rafael"),
            )
            .await
            .unwrap();

        let update = UpdateFaculty {
            name: Some("Regional San Rafael".to_string()),
            ..Default::default()
        };
        let updated: Faculty = repo.update(faculty.id, &update).await.unwrap().unwrap();

        assert_eq!(updated.name, "Regional San Rafael");
        assert_eq!(updated.city.as_deref(), Some("San Rafael"));
        assert_eq!(updated.university_id, university.id);

        let found: Option<Faculty> = repo.find(faculty.id).await.unwrap();
        assert_eq!(found, Some(updated));
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let repo = setup().await;

        let update = UpdateUniversity {
            name: Some("Nadie".to_string()),
            ..Default::default()
        };
        let result: Option<University> = repo.update(7, &update).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_null_patch_clears_optional_column() {
        let repo = setup().await;
        let university = seed_university(&repo, "Una").await;
        let faculty = seed_faculty(&repo, university.id, "Ingenieria").await;
        let specialty: Specialty = repo
            .create(&CreateSpecialty::new(faculty.id, "Civil", "C").with_note("nocturno"))
            .await
            .unwrap();
        assert_eq!(specialty.note.as_deref(), Some("nocturno"));

        // An unrelated patch leaves the note alone
        let rename: UpdateSpecialty = serde_json::from_str(r#"{"name": "Civil II"}"#).unwrap();
        let renamed: Specialty = repo.update(specialty.id, &rename).await.unwrap().unwrap();
        assert_eq!(renamed.note.as_deref(), Some("nocturno"));

        let clear: UpdateSpecialty = serde_json::from_str(r#"{"note": null}"#).unwrap();
        let cleared: Specialty = repo.update(specialty.id, &clear).await.unwrap().unwrap();
        assert_eq!(cleared.note, None);
        assert_eq!(cleared.name, "Civil II");

        let found: Option<Specialty> = repo.find(specialty.id).await.unwrap();
        assert_eq!(found, Some(cleared));
    }

    #[tokio::test]
    async fn test_faculty_patch_sets_and_clears_contact_fields() {
        let repo = setup().await;
        let university = seed_university(&repo, "Una").await;
        let faculty: Faculty = repo
            .create(
                &CreateFaculty::new(university.id, "Regional", "FR", "FRSR")
                    .with_location("5600", "San Rafael")
                    .with_email("fr@uni.edu"),
            )
            .await
            .unwrap();

        let update = UpdateFaculty {
            email: Some(None),
            phone: Some(Some("0260-4421078".to_string())),
            ..Default::default()
        };
        let updated: Faculty = repo.update(faculty.id, &update).await.unwrap().unwrap();

        assert_eq!(updated.email, None);
        assert_eq!(updated.phone.as_deref(), Some("0260-4421078"));
        assert_eq!(updated.city.as_deref(), Some("San Rafael"));
        assert_eq!(updated.postal_code.as_deref(), Some("5600"));
    }

    #[tokio::test]
    async fn test_delete_cascades_and_reports_dependents() {
        let repo = setup().await;
        let university = seed_university(&repo, "Una").await;
        let other = seed_university(&repo, "Otra").await;
        let kept_faculty = seed_faculty(&repo, other.id, "Medicina").await;
        seed_specialty(&repo, kept_faculty.id, "Enfermeria").await;

        let mut faculties = Vec::new();
        let mut specialties = Vec::new();
        for f in 0..3 {
            let faculty = seed_faculty(&repo, university.id, &format!("Facultad {f}")).await;
            for s in 0..4 {
                let specialty = seed_specialty(&repo, faculty.id, &format!("Carrera {f}.{s}")).await;
                specialties.push(specialty.id);
            }
            faculties.push(faculty.id);
        }

        let outcome = Repository::<University>::delete(&repo, university.id)
            .await
            .unwrap();

        assert!(outcome.contains(EntityKind::University, university.id));
        assert!(faculties
            .iter()
            .all(|id| outcome.contains(EntityKind::Faculty, *id)));
        assert!(specialties
            .iter()
            .all(|id| outcome.contains(EntityKind::Specialty, *id)));
        assert_eq!(outcome.removed().len(), 1 + 3 + 12);

        let owned_faculties = vec![FilterClause::eq("university_id", university.id).unwrap()];
        assert_eq!(
            Repository::<Faculty>::count(&repo, &owned_faculties).await.unwrap(),
            0
        );
        // Only the other university's records remain
        assert_eq!(Repository::<Faculty>::count(&repo, &[]).await.unwrap(), 1);
        assert_eq!(Repository::<Specialty>::count(&repo, &[]).await.unwrap(), 1);

        let kept: Option<University> = repo.find(other.id).await.unwrap();
        assert!(kept.is_some());
    }

    #[tokio::test]
    async fn test_delete_missing_is_a_noop() {
        let repo = setup().await;

        let outcome = Repository::<Specialty>::delete(&repo, 31).await.unwrap();

        assert!(outcome.is_empty());
    }

    #[tokio::test]
    async fn test_file_database_persists_between_connections() {
        let dir = std::env::temp_dir().join(format!("academia-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("persist.db");
        let path = path.to_str().unwrap();

        let created = {
            let repo = SqliteRepository::new(path).await.unwrap();
            seed_university(&repo, "Persistente").await
        };

        let repo = SqliteRepository::new(path).await.unwrap();
        let found: Option<University> = repo.find(created.id).await.unwrap();
        assert_eq!(found.map(|u| u.name), Some("Persistente".to_string()));

        drop(repo);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
