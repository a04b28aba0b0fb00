//! In-memory record stores (dev/test).

use async_trait::async_trait;
use tracing::debug;

use campus_core::{CourseId, StudentId};
use campus_students::{Course, CoursePatch, NewCourse, NewStudent, Student, StudentPatch};

use super::table::InMemoryTable;
use super::{CourseFilter, CourseStore, StoreResult, StudentFilter, StudentStore};

#[derive(Debug, Default)]
pub struct InMemoryCourseStore {
    table: InMemoryTable<Course>,
}

impl InMemoryCourseStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CourseStore for InMemoryCourseStore {
    async fn create(&self, course: NewCourse) -> StoreResult<Course> {
        let created = self
            .table
            .insert_with(|id| course.into_course(CourseId::new(id)))?;
        debug!(course_id = %created.id, "course created");
        Ok(created)
    }

    async fn get(&self, id: CourseId) -> StoreResult<Option<Course>> {
        self.table.get(id.get())
    }

    async fn list(&self, filter: &CourseFilter) -> StoreResult<Vec<Course>> {
        // Primary-key lookups skip the scan.
        if let Some(id) = filter.id {
            return Ok(self
                .table
                .get(id.get())?
                .filter(|c| filter.matches(c))
                .into_iter()
                .collect());
        }
        self.table.select(|c| filter.matches(c))
    }

    async fn update(&self, id: CourseId, patch: CoursePatch) -> StoreResult<Option<Course>> {
        let updated = self.table.update_with(id.get(), |c| patch.apply(c))?;
        if updated.is_some() {
            debug!(course_id = %id, "course updated");
        }
        Ok(updated)
    }

    async fn delete(&self, id: CourseId) -> StoreResult<bool> {
        let removed = self.table.delete(id.get())?;
        if removed {
            debug!(course_id = %id, "course deleted");
        }
        Ok(removed)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStudentStore {
    table: InMemoryTable<Student>,
}

impl InMemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StudentStore for InMemoryStudentStore {
    async fn create(&self, student: NewStudent) -> StoreResult<Student> {
        let created = self
            .table
            .insert_with(|id| student.into_student(StudentId::new(id)))?;
        debug!(student_id = %created.id, "student created");
        Ok(created)
    }

    async fn get(&self, id: StudentId) -> StoreResult<Option<Student>> {
        self.table.get(id.get())
    }

    async fn list(&self, filter: &StudentFilter) -> StoreResult<Vec<Student>> {
        self.table.select(|s| filter.matches(s))
    }

    async fn update(&self, id: StudentId, patch: StudentPatch) -> StoreResult<Option<Student>> {
        let updated = self.table.update_with(id.get(), |s| patch.apply(s))?;
        if updated.is_some() {
            debug!(student_id = %id, "student updated");
        }
        Ok(updated)
    }

    async fn delete(&self, id: StudentId) -> StoreResult<bool> {
        let removed = self.table.delete(id.get())?;
        if removed {
            debug!(student_id = %id, "student deleted");
        }
        Ok(removed)
    }
}
