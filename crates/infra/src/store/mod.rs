//! Record store abstractions for the course and student tables.
//!
//! Stores own id assignment: ids come from a per-table sequence that starts at 1
//! and never hands out the same value twice, even after deletes. Listing always
//! returns rows in ascending id order, which is creation order.

pub mod in_memory;
pub mod postgres;
pub mod table;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use campus_core::{CourseId, StudentId};
use campus_students::{Course, CoursePatch, NewCourse, NewStudent, Student, StudentPatch};

pub use in_memory::{InMemoryCourseStore, InMemoryStudentStore};
pub use postgres::{PostgresCourseStore, PostgresStudentStore};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure inside the persistence backend.
///
/// Unknown ids are not errors; lookups return `None`/`false` instead.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store lock poisoned")]
    Poisoned,

    #[error("backend error: {0}")]
    Backend(String),
}

/// Exact-match filters for course listings. All set fields must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseFilter {
    pub id: Option<CourseId>,
    pub name: Option<String>,
}

impl CourseFilter {
    pub fn matches(&self, course: &Course) -> bool {
        self.id.is_none_or(|id| course.id == id)
            && self.name.as_deref().is_none_or(|name| course.name == name)
    }
}

/// Exact-match filters for student listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    pub id: Option<StudentId>,
    pub name: Option<String>,
}

impl StudentFilter {
    pub fn matches(&self, student: &Student) -> bool {
        self.id.is_none_or(|id| student.id == id)
            && self.name.as_deref().is_none_or(|name| student.name == name)
    }
}

#[async_trait]
pub trait CourseStore: Send + Sync {
    /// Persist a new course under a freshly assigned id.
    async fn create(&self, course: NewCourse) -> StoreResult<Course>;

    async fn get(&self, id: CourseId) -> StoreResult<Option<Course>>;

    /// Courses matching `filter`, ascending by id.
    async fn list(&self, filter: &CourseFilter) -> StoreResult<Vec<Course>>;

    /// Apply `patch` to an existing course. Returns `None` if the id is unknown.
    async fn update(&self, id: CourseId, patch: CoursePatch) -> StoreResult<Option<Course>>;

    /// Returns `false` if the id is unknown.
    async fn delete(&self, id: CourseId) -> StoreResult<bool>;
}

#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn create(&self, student: NewStudent) -> StoreResult<Student>;

    async fn get(&self, id: StudentId) -> StoreResult<Option<Student>>;

    async fn list(&self, filter: &StudentFilter) -> StoreResult<Vec<Student>>;

    async fn update(&self, id: StudentId, patch: StudentPatch) -> StoreResult<Option<Student>>;

    async fn delete(&self, id: StudentId) -> StoreResult<bool>;
}

#[async_trait]
impl<S> CourseStore for Arc<S>
where
    S: CourseStore + ?Sized,
{
    async fn create(&self, course: NewCourse) -> StoreResult<Course> {
        (**self).create(course).await
    }

    async fn get(&self, id: CourseId) -> StoreResult<Option<Course>> {
        (**self).get(id).await
    }

    async fn list(&self, filter: &CourseFilter) -> StoreResult<Vec<Course>> {
        (**self).list(filter).await
    }

    async fn update(&self, id: CourseId, patch: CoursePatch) -> StoreResult<Option<Course>> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: CourseId) -> StoreResult<bool> {
        (**self).delete(id).await
    }
}

#[async_trait]
impl<S> StudentStore for Arc<S>
where
    S: StudentStore + ?Sized,
{
    async fn create(&self, student: NewStudent) -> StoreResult<Student> {
        (**self).create(student).await
    }

    async fn get(&self, id: StudentId) -> StoreResult<Option<Student>> {
        (**self).get(id).await
    }

    async fn list(&self, filter: &StudentFilter) -> StoreResult<Vec<Student>> {
        (**self).list(filter).await
    }

    async fn update(&self, id: StudentId, patch: StudentPatch) -> StoreResult<Option<Student>> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: StudentId) -> StoreResult<bool> {
        (**self).delete(id).await
    }
}
