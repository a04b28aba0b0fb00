use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use campus_core::{CourseId, DomainError, DomainResult, StudentId};
use campus_infra::{CourseFilter, StudentFilter};
use campus_students::{
    Course, CoursePatch, NewCourse, NewStudent, Student, StudentPatch, parse_birth_date,
};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

/// Body of POST/PUT/PATCH on `/courses/`. Which fields are required depends on the verb.
///
/// Fields are doubly optional so an explicit `null` can be told apart from an
/// absent field.
#[derive(Debug, Default, Deserialize)]
pub struct CourseRequest {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
}

impl CourseRequest {
    pub fn new_course(&self) -> DomainResult<NewCourse> {
        NewCourse::new(non_null("name", &self.name)?)
    }

    pub fn patch(&self) -> DomainResult<CoursePatch> {
        CoursePatch::new(non_null("name", &self.name)?)
    }

    pub fn replacement(&self) -> DomainResult<CoursePatch> {
        CoursePatch::replace(non_null("name", &self.name)?)
    }
}

/// Body of POST/PUT/PATCH on `/students/`.
///
/// `birth_date` distinguishes "absent" (`None`) from an explicit `null` or
/// empty string (`Some(None)`).
#[derive(Debug, Default, Deserialize)]
pub struct StudentRequest {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub birth_date: Option<Option<String>>,
}

impl StudentRequest {
    pub fn birth_date(&self) -> DomainResult<Option<Option<NaiveDate>>> {
        match self.birth_date.as_ref() {
            None => Ok(None),
            Some(None) => Ok(Some(None)),
            Some(Some(raw)) if raw.trim().is_empty() => Ok(Some(None)),
            Some(Some(raw)) => parse_birth_date(raw).map(|d| Some(Some(d))),
        }
    }

    pub fn new_student(&self) -> DomainResult<NewStudent> {
        NewStudent::new(non_null("name", &self.name)?, self.birth_date()?.flatten())
    }

    pub fn patch(&self) -> DomainResult<StudentPatch> {
        StudentPatch::new(non_null("name", &self.name)?, self.birth_date()?)
    }

    pub fn replacement(&self) -> DomainResult<StudentPatch> {
        StudentPatch::replace(non_null("name", &self.name)?, self.birth_date()?.flatten())
    }
}

/// A field that may be omitted but not sent as `null`.
fn non_null(field: &str, value: &Option<Option<String>>) -> DomainResult<Option<String>> {
    match value {
        None => Ok(None),
        Some(None) => Err(DomainError::validation(format!("{field}: this field may not be null"))),
        Some(Some(v)) => Ok(Some(v.clone())),
    }
}

fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// `?id=` / `?name=` exact-match filters shared by the list endpoints.
///
/// Empty values are ignored, as if the parameter were absent.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl ListQuery {
    pub fn course_filter(self) -> Result<CourseFilter, axum::response::Response> {
        Ok(CourseFilter {
            id: parse_id_filter::<CourseId>(self.id.as_deref())?,
            name: non_empty(self.name),
        })
    }

    pub fn student_filter(self) -> Result<StudentFilter, axum::response::Response> {
        Ok(StudentFilter {
            id: parse_id_filter::<StudentId>(self.id.as_deref())?,
            name: non_empty(self.name),
        })
    }
}

fn parse_id_filter<I>(raw: Option<&str>) -> Result<Option<I>, axum::response::Response>
where
    I: core::str::FromStr<Err = DomainError>,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v.parse().map(Some).map_err(errors::domain_error_to_response),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Path ids that do not parse can never name a record, so they read as 404.
pub fn parse_path_id<I>(raw: &str) -> Result<I, axum::response::Response>
where
    I: core::str::FromStr,
{
    raw.parse().map_err(|_| errors::not_found())
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn course_to_json(course: Course) -> serde_json::Value {
    serde_json::json!({
        "id": course.id.get(),
        "name": course.name,
    })
}

pub fn student_to_json(student: Student) -> serde_json::Value {
    serde_json::json!({
        "id": student.id.get(),
        "name": student.name,
        "birth_date": student.birth_date.map(|d| d.format("%Y-%m-%d").to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_request_distinguishes_null_from_absent() {
        let absent: StudentRequest = serde_json::from_str(r#"{"name":"Ada"}"#).unwrap();
        assert_eq!(absent.birth_date().unwrap(), None);

        let null: StudentRequest =
            serde_json::from_str(r#"{"name":"Ada","birth_date":null}"#).unwrap();
        assert_eq!(null.birth_date().unwrap(), Some(None));

        let set: StudentRequest =
            serde_json::from_str(r#"{"birth_date":"1815-12-10"}"#).unwrap();
        assert_eq!(
            set.birth_date().unwrap(),
            Some(NaiveDate::from_ymd_opt(1815, 12, 10))
        );
    }

    #[test]
    fn course_request_ignores_unknown_fields() {
        let req: CourseRequest = serde_json::from_str(r#"{"id":99,"name":"Python"}"#).unwrap();
        assert_eq!(req.new_course().unwrap().name(), "Python");
    }

    #[test]
    fn explicit_null_name_is_rejected() {
        let req: CourseRequest = serde_json::from_str(r#"{"name":null}"#).unwrap();
        assert!(matches!(req.new_course(), Err(DomainError::Validation(_))));
        assert!(matches!(req.patch(), Err(DomainError::Validation(_))));

        let req: StudentRequest =
            serde_json::from_str(r#"{"name":null,"birth_date":"1815-12-10"}"#).unwrap();
        assert!(matches!(req.patch(), Err(DomainError::Validation(_))));

        let absent: CourseRequest = serde_json::from_str("{}").unwrap();
        assert!(absent.patch().unwrap().is_empty());
    }

    #[test]
    fn list_query_parses_filters() {
        let q = ListQuery { id: Some("7".to_string()), name: Some(String::new()) };
        let filter = q.course_filter().unwrap();
        assert_eq!(filter.id, Some(CourseId::new(7)));
        assert_eq!(filter.name, None);

        let bad = ListQuery { id: Some("seven".to_string()), name: None };
        let res = bad.course_filter().unwrap_err();
        assert_eq!(res.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn maps_records_to_json() {
        let json = course_to_json(Course { id: CourseId::new(1), name: "Python".to_string() });
        assert_eq!(json, serde_json::json!({"id": 1, "name": "Python"}));

        let json = student_to_json(Student {
            id: StudentId::new(2),
            name: "Ada".to_string(),
            birth_date: None,
        });
        assert_eq!(json, serde_json::json!({"id": 2, "name": "Ada", "birth_date": null}));
    }
}
