//! Postgres-backed record stores.
//!
//! Each table uses a `BIGSERIAL` primary key, which gives the same id semantics
//! as the in-memory table: a monotonically increasing sequence whose values are
//! never reused.
//!
//! ## Error Mapping
//!
//! Every SQLx error is mapped to `StoreError::Backend` with the failing
//! operation in the message. Missing rows are not errors.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use tracing::instrument;

use campus_core::{CourseId, StudentId};
use campus_students::{Course, CoursePatch, NewCourse, NewStudent, Student, StudentPatch};

use super::{CourseFilter, CourseStore, StoreError, StoreResult, StudentFilter, StudentStore};

const COURSES_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS courses (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL
    )
"#;

const STUDENTS_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS students (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        birth_date DATE NULL
    )
"#;

#[derive(Debug)]
struct CourseRow {
    id: i64,
    name: String,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for CourseRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        })
    }
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Course {
            id: CourseId::new(row.id),
            name: row.name,
        }
    }
}

#[derive(Debug)]
struct StudentRow {
    id: i64,
    name: String,
    birth_date: Option<NaiveDate>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for StudentRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            birth_date: row.try_get("birth_date")?,
        })
    }
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        Student {
            id: StudentId::new(row.id),
            name: row.name,
            birth_date: row.birth_date,
        }
    }
}

/// Postgres-backed course table.
#[derive(Debug, Clone)]
pub struct PostgresCourseStore {
    pool: Arc<PgPool>,
}

impl PostgresCourseStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the `courses` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(COURSES_SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_courses_schema", e))?;
        Ok(())
    }
}

#[async_trait]
impl CourseStore for PostgresCourseStore {
    #[instrument(skip(self, course), err)]
    async fn create(&self, course: NewCourse) -> StoreResult<Course> {
        let row = sqlx::query_as::<_, CourseRow>(
            "INSERT INTO courses (name) VALUES ($1) RETURNING id, name",
        )
        .bind(course.name())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_course", e))?;
        Ok(row.into())
    }

    #[instrument(skip(self), fields(course_id = %id), err)]
    async fn get(&self, id: CourseId) -> StoreResult<Option<Course>> {
        let row = sqlx::query_as::<_, CourseRow>("SELECT id, name FROM courses WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_course", e))?;
        Ok(row.map(Course::from))
    }

    #[instrument(skip(self), err)]
    async fn list(&self, filter: &CourseFilter) -> StoreResult<Vec<Course>> {
        let rows = sqlx::query_as::<_, CourseRow>(
            r#"
            SELECT id, name
            FROM courses
            WHERE ($1::bigint IS NULL OR id = $1)
                AND ($2::text IS NULL OR name = $2)
            ORDER BY id ASC
            "#,
        )
        .bind(filter.id.map(|id| id.get()))
        .bind(filter.name.as_deref())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_courses", e))?;
        Ok(rows.into_iter().map(Course::from).collect())
    }

    #[instrument(skip(self, patch), fields(course_id = %id), err)]
    async fn update(&self, id: CourseId, patch: CoursePatch) -> StoreResult<Option<Course>> {
        if patch.is_empty() {
            return self.get(id).await;
        }
        let row = sqlx::query_as::<_, CourseRow>(
            "UPDATE courses SET name = COALESCE($2, name) WHERE id = $1 RETURNING id, name",
        )
        .bind(id.get())
        .bind(patch.name())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_course", e))?;
        Ok(row.map(Course::from))
    }

    #[instrument(skip(self), fields(course_id = %id), err)]
    async fn delete(&self, id: CourseId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id.get())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_course", e))?;
        Ok(result.rows_affected() > 0)
    }
}

/// Postgres-backed student table.
#[derive(Debug, Clone)]
pub struct PostgresStudentStore {
    pool: Arc<PgPool>,
}

impl PostgresStudentStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the `students` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(STUDENTS_SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_students_schema", e))?;
        Ok(())
    }
}

#[async_trait]
impl StudentStore for PostgresStudentStore {
    #[instrument(skip(self, student), err)]
    async fn create(&self, student: NewStudent) -> StoreResult<Student> {
        let row = sqlx::query_as::<_, StudentRow>(
            "INSERT INTO students (name, birth_date) VALUES ($1, $2) RETURNING id, name, birth_date",
        )
        .bind(student.name())
        .bind(student.birth_date())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_student", e))?;
        Ok(row.into())
    }

    #[instrument(skip(self), fields(student_id = %id), err)]
    async fn get(&self, id: StudentId) -> StoreResult<Option<Student>> {
        let row = sqlx::query_as::<_, StudentRow>(
            "SELECT id, name, birth_date FROM students WHERE id = $1",
        )
        .bind(id.get())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_student", e))?;
        Ok(row.map(Student::from))
    }

    #[instrument(skip(self), err)]
    async fn list(&self, filter: &StudentFilter) -> StoreResult<Vec<Student>> {
        let rows = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, name, birth_date
            FROM students
            WHERE ($1::bigint IS NULL OR id = $1)
                AND ($2::text IS NULL OR name = $2)
            ORDER BY id ASC
            "#,
        )
        .bind(filter.id.map(|id| id.get()))
        .bind(filter.name.as_deref())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_students", e))?;
        Ok(rows.into_iter().map(Student::from).collect())
    }

    #[instrument(skip(self, patch), fields(student_id = %id), err)]
    async fn update(&self, id: StudentId, patch: StudentPatch) -> StoreResult<Option<Student>> {
        // $3 says whether birth_date was supplied at all, $4 carries the (nullable) value.
        let row = sqlx::query_as::<_, StudentRow>(
            r#"
            UPDATE students
            SET name = COALESCE($2, name),
                birth_date = CASE WHEN $3::boolean THEN $4::date ELSE birth_date END
            WHERE id = $1
            RETURNING id, name, birth_date
            "#,
        )
        .bind(id.get())
        .bind(patch.name())
        .bind(patch.birth_date().is_some())
        .bind(patch.birth_date().flatten())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_student", e))?;
        Ok(row.map(Student::from))
    }

    #[instrument(skip(self), fields(student_id = %id), err)]
    async fn delete(&self, id: StudentId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id.get())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_student", e))?;
        Ok(result.rows_affected() > 0)
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => StoreError::Backend(format!(
            "database error in {}: {}",
            operation,
            db_err.message()
        )),
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}
