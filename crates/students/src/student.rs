use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use campus_core::{DomainError, DomainResult, Entity, StudentId};

use crate::validation::{non_blank_text, required_text};

/// A student record as persisted by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
}

impl Entity for Student {
    type Id = StudentId;

    fn id(&self) -> StudentId {
        self.id
    }
}

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`).
pub fn parse_birth_date(raw: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| DomainError::validation(format!("birth_date: expected YYYY-MM-DD ({e})")))
}

/// Validated input for creating a student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    name: String,
    birth_date: Option<NaiveDate>,
}

impl NewStudent {
    pub fn new(name: Option<String>, birth_date: Option<NaiveDate>) -> DomainResult<Self> {
        Ok(Self {
            name: required_text("name", name)?,
            birth_date,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    pub fn into_student(self, id: StudentId) -> Student {
        Student {
            id,
            name: self.name,
            birth_date: self.birth_date,
        }
    }
}

/// Validated partial update of a student.
///
/// `birth_date` is doubly optional: `None` leaves it alone, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
    name: Option<String>,
    birth_date: Option<Option<NaiveDate>>,
}

impl StudentPatch {
    pub fn new(name: Option<String>, birth_date: Option<Option<NaiveDate>>) -> DomainResult<Self> {
        Ok(Self {
            name: name.map(|n| non_blank_text("name", n)).transpose()?,
            birth_date,
        })
    }

    /// A full replacement (PUT): `name` is required, an absent `birth_date` clears it.
    pub fn replace(name: Option<String>, birth_date: Option<NaiveDate>) -> DomainResult<Self> {
        Ok(Self {
            name: Some(required_text("name", name)?),
            birth_date: Some(birth_date),
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn birth_date(&self) -> Option<Option<NaiveDate>> {
        self.birth_date
    }

    pub fn apply(&self, student: &mut Student) {
        if let Some(name) = &self.name {
            student.name = name.clone();
        }
        if let Some(birth_date) = self.birth_date {
            student.birth_date = birth_date;
        }
    }
}
