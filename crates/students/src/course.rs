use serde::{Deserialize, Serialize};

use campus_core::{CourseId, DomainResult, Entity};

use crate::validation::{non_blank_text, required_text};

/// A course record as persisted by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
}

impl Entity for Course {
    type Id = CourseId;

    fn id(&self) -> CourseId {
        self.id
    }
}

/// Validated input for creating a course. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourse {
    name: String,
}

impl NewCourse {
    /// `name` is required and must not be blank.
    pub fn new(name: Option<String>) -> DomainResult<Self> {
        Ok(Self {
            name: required_text("name", name)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Materialize the record once the store has assigned an id.
    pub fn into_course(self, id: CourseId) -> Course {
        Course { id, name: self.name }
    }
}

/// Validated partial update of a course. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoursePatch {
    name: Option<String>,
}

impl CoursePatch {
    pub fn new(name: Option<String>) -> DomainResult<Self> {
        Ok(Self {
            name: name.map(|n| non_blank_text("name", n)).transpose()?,
        })
    }

    /// A full replacement (PUT): every writable field is required.
    pub fn replace(name: Option<String>) -> DomainResult<Self> {
        Ok(Self {
            name: Some(required_text("name", name)?),
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }

    pub fn apply(&self, course: &mut Course) {
        if let Some(name) = &self.name {
            course.name = name.clone();
        }
    }
}
